//! Table reconstruction from the tokens of a table section.
//!
//! Building runs in fixed steps:
//!
//! 1. tokens are clustered into rows; row 0 is the header row
//! 2. header tokens are grouped into columns, giving initial column bounds
//! 3. every other token is matched against the header bounds and placed when
//!    exactly one column overlaps it above the confidence threshold
//! 4. if anything was deferred, column bounds are re-estimated from the placed
//!    content, stretched to tile the page, and the deferred tokens are matched
//!    again with relaxed rules
//!
//! Tokens that overlap no column even after step 4 stay in the undetected
//! bucket.

use crate::config::{TableConfig, DEFAULT_CONFIDENCE_THRESHOLD};
use crate::document::{Page, Token};
use crate::geometry::{bounds_of, vertical_overlap_ratio, BoundingBox};
use crate::layout::columns::{items_bound, maximize_column_bounds, regroup_column_headers};
use crate::layout::rows::cluster_rows;
use crate::tables::cell::{Cell, CellItem};
use serde::ser::{Serialize, Serializer};

/// A column that overlaps a token, with the overlap ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    /// Column index
    pub column: usize,
    /// `vertical_overlap_ratio(column bound, token box)`
    pub ratio: f32,
}

/// Every column whose bound overlaps `bbox` horizontally, in column order.
pub fn detect_columns(bbox: &BoundingBox, bounds: &[BoundingBox]) -> Vec<Detection> {
    bounds
        .iter()
        .enumerate()
        .filter_map(|(column, bound)| {
            let ratio = vertical_overlap_ratio(bound, bbox);
            (ratio > 0.0).then_some(Detection { column, ratio })
        })
        .collect()
}

/// Which bounds a detection was computed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Initial bounds from the header row; strict acceptance.
    HeaderBounds,
    /// Bounds re-estimated from content and maximized; relaxed acceptance.
    ContentBounds,
}

/// A table column and its current horizontal extent.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column index
    pub index: usize,
    /// Current bound; only its x-extent is meaningful
    pub bound: BoundingBox,
}

/// One row of cells; always as wide as the table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    /// Cells by column index
    pub cells: Vec<Cell>,
}

impl Row {
    fn with_width(width: usize) -> Self {
        Self {
            cells: vec![Cell::default(); width],
        }
    }

    /// Cell texts in column order.
    pub fn texts(&self) -> Vec<String> {
        self.cells.iter().map(Cell::text).collect()
    }
}

/// A token not (yet) placed in any cell.
#[derive(Debug, Clone, PartialEq)]
pub struct UndetectedToken {
    /// Row the token was clustered into
    pub row: usize,
    /// The token
    pub token: Token,
}

/// A reconstructed table.
///
/// Immutable once built. Serializes as the row-major text matrix of
/// [`Table::extract_data`].
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    rows: Vec<Row>,
    columns: Vec<Column>,
    undetected: Vec<UndetectedToken>,
    page_width: f32,
    confidence_threshold: f32,
}

impl Table {
    /// Build a table from the tokens of a table section.
    ///
    /// A `config` that fails [`TableConfig::validate`] is logged and the
    /// default confidence threshold is used instead.
    ///
    /// # Examples
    ///
    /// ```
    /// use ocr_tables::config::TableConfig;
    /// use ocr_tables::document::{Page, Token};
    /// use ocr_tables::geometry::BoundingBox;
    /// use ocr_tables::tables::Table;
    ///
    /// let cell = |text: &str, x0: f32, y0: f32, x1: f32| {
    ///     Token::new(text, BoundingBox::from_coords(x0, y0, x1, y0 + 12.0))
    /// };
    /// let tokens = vec![
    ///     cell("Item", 0.0, 0.0, 60.0),
    ///     cell("Amount", 200.0, 0.0, 260.0),
    ///     cell("Freight", 0.0, 20.0, 50.0),
    ///     cell("12.00", 210.0, 20.0, 250.0),
    /// ];
    ///
    /// let table = Table::build(tokens, &Page::new(600.0, 800.0), &TableConfig::default());
    /// assert_eq!(
    ///     table.extract_data(),
    ///     vec![vec!["Item", "Amount"], vec!["Freight", "12.00"]]
    /// );
    /// ```
    pub fn build(tokens: Vec<Token>, page: &Page, config: &TableConfig) -> Self {
        let confidence_threshold = match config.validate() {
            Ok(()) => config.confidence_threshold,
            Err(e) => {
                log::warn!("{}; using threshold {}", e, DEFAULT_CONFIDENCE_THRESHOLD);
                DEFAULT_CONFIDENCE_THRESHOLD
            },
        };

        let mut table = Self {
            rows: Vec::new(),
            columns: Vec::new(),
            undetected: Vec::new(),
            page_width: page.width,
            confidence_threshold,
        };

        let mut rows = cluster_rows(tokens).into_iter();
        let Some(header) = rows.next() else {
            log::debug!("no tokens in table section");
            return table;
        };

        table.estimate_headers(header);
        table.assign_using_header_bounds(rows.collect());

        if !table.undetected.is_empty() {
            let deferred = std::mem::take(&mut table.undetected);
            log::debug!(
                "{} tokens deferred after header alignment, re-estimating column bounds",
                deferred.len()
            );
            table.assign_using_content_bounds(deferred);
        }

        for row in &mut table.rows {
            for cell in &mut row.cells {
                cell.sort_left_to_right();
            }
        }

        log::debug!(
            "built table with {} rows, {} columns, {} undetected tokens",
            table.rows.len(),
            table.columns.len(),
            table.undetected.len()
        );

        table
    }

    /// Use the header row to create the columns and row 0.
    fn estimate_headers(&mut self, header: Vec<Token>) {
        let groups = regroup_column_headers(header);

        self.columns = groups
            .iter()
            .enumerate()
            .filter_map(|(index, group)| {
                items_bound(group).map(|bound| Column { index, bound })
            })
            .collect();

        self.rows = vec![Row {
            cells: groups.into_iter().map(|items| Cell { items }).collect(),
        }];
    }

    fn column_bounds(&self) -> Vec<BoundingBox> {
        self.columns.iter().map(|c| c.bound).collect()
    }

    /// First phase: align body tokens with the header bounds.
    fn assign_using_header_bounds(&mut self, body: Vec<Vec<Token>>) {
        let bounds = self.column_bounds();
        let width = self.columns.len();

        for tokens in body {
            self.rows.push(Row::with_width(width));
            let row = self.rows.len() - 1;

            for token in tokens {
                let detections = detect_columns(&token.bounding_box, &bounds);
                self.handle_detections(&detections, row, token, Phase::HeaderBounds);
            }
        }
    }

    /// Second phase: re-estimate bounds from content and retry deferred tokens.
    fn assign_using_content_bounds(&mut self, deferred: Vec<UndetectedToken>) {
        self.estimate_column_bounds_from_content();
        let bounds = self.column_bounds();

        for UndetectedToken { row, token } in deferred {
            let detections = detect_columns(&token.bounding_box, &bounds);
            self.handle_detections(&detections, row, token, Phase::ContentBounds);
        }
    }

    /// Recompute every column bound as the union of its placed tokens, then
    /// maximize the bounds over the page width.
    fn estimate_column_bounds_from_content(&mut self) {
        for column in &mut self.columns {
            let placed = self
                .rows
                .iter()
                .filter_map(|row| row.cells.get(column.index))
                .flat_map(|cell| cell.items.iter())
                .map(|item| &item.token.bounding_box);

            if let Some(bound) = bounds_of(placed) {
                column.bound = bound;
            }
        }

        let mut bounds = self.column_bounds();
        maximize_column_bounds(&mut bounds, self.page_width);
        for (column, bound) in self.columns.iter_mut().zip(bounds) {
            column.bound = bound;
        }
    }

    fn handle_detections(
        &mut self,
        detections: &[Detection],
        row: usize,
        token: Token,
        phase: Phase,
    ) {
        match (phase, detections) {
            // a full overlap is accepted even at threshold 1
            (_, [only]) if only.ratio > self.confidence_threshold || only.ratio == 1.0 => {
                self.assign(row, *only, token);
            },
            (Phase::HeaderBounds, _) => {
                self.undetected.push(UndetectedToken { row, token });
            },
            (Phase::ContentBounds, []) => {
                log::warn!(
                    "token '{}' in row {} overlaps no column; left undetected",
                    token.text,
                    row
                );
                self.undetected.push(UndetectedToken { row, token });
            },
            (Phase::ContentBounds, [only]) => {
                self.assign(row, *only, token);
            },
            (Phase::ContentBounds, [first, rest @ ..]) => {
                let best = rest
                    .iter()
                    .fold(*first, |best, d| if d.ratio > best.ratio { *d } else { best });
                self.assign(row, best, token);
            },
        }
    }

    fn assign(&mut self, row: usize, detection: Detection, token: Token) {
        if let Some(cell) = self
            .rows
            .get_mut(row)
            .and_then(|r| r.cells.get_mut(detection.column))
        {
            cell.push(CellItem::new(token, detection.ratio));
        }
    }

    /// All rows; row 0 holds the headers.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// The header row.
    pub fn header(&self) -> Option<&Row> {
        self.rows.first()
    }

    /// Columns with their final bounds.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Tokens that could not be placed in any column.
    pub fn undetected(&self) -> &[UndetectedToken] {
        &self.undetected
    }

    /// Number of rows, header included.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get a cell at the specified row and column.
    pub fn get_cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.cells.get(col))
    }

    /// Row-major text matrix, one string per column.
    pub fn extract_data(&self) -> Vec<Vec<String>> {
        self.rows.iter().map(Row::texts).collect()
    }

    /// The text matrix as a JSON value.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::from(self.extract_data())
    }
}

impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.extract_data().serialize(serializer)
    }
}
