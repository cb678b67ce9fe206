//! Table boundary detection.
//!
//! A table body is delimited by a start marker and an end marker found with the
//! grid scanner. The two markers define a horizontal band; every token whose
//! top or bottom edge falls strictly inside the band, and that passes the
//! direction filter, becomes a candidate for row clustering.

use crate::document::DocumentGrid;
use crate::layout::scanner::{scan, GridMatch, Matcher};
use serde::{Deserialize, Serialize};

/// Horizontal walk used when collecting the table body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    /// Keep tokens reaching to the right of the start marker's left edge.
    #[default]
    LeftRight,
    /// Keep tokens reaching to the left of the start marker's right edge.
    RightLeft,
    /// Ignore x entirely; only the band test applies.
    TotalWidth,
}

/// The resolved start and end markers of a table and the band between them.
#[derive(Debug, Clone, Copy)]
pub struct Section<'a> {
    /// Start marker
    pub start: GridMatch<'a>,
    /// End marker
    pub end: GridMatch<'a>,
    /// Upper edge of the start marker
    pub top_y: f32,
    /// Lower edge of the end marker
    pub bottom_y: f32,
}

/// Pick the bottom-most match (greatest grid y).
///
/// Ties keep the earliest match in scan order.
pub fn bottom_most<'a>(matches: &[GridMatch<'a>]) -> Option<GridMatch<'a>> {
    matches.iter().copied().fold(None, |best, candidate| match best {
        Some(current) if current.position.y >= candidate.position.y => Some(current),
        _ => Some(candidate),
    })
}

/// Locate the start and end markers of a table.
///
/// Returns `None` when either marker is missing from the grid; that is an
/// expected outcome and is only logged.
pub fn resolve_section<'a>(
    start: &Matcher,
    end: &Matcher,
    grid: &'a DocumentGrid,
) -> Option<Section<'a>> {
    let detections = scan(&[start, end], grid);

    let (Some(start), Some(end)) = (bottom_most(&detections[0]), bottom_most(&detections[1]))
    else {
        log::warn!(
            "table start/end not detected (start matches: {}, end matches: {})",
            detections[0].len(),
            detections[1].len()
        );
        return None;
    };

    log::debug!(
        "table section from {:?} '{}' to {:?} '{}'",
        start.position,
        start.token.text,
        end.position,
        end.token.text
    );

    Some(Section {
        start,
        end,
        top_y: start.token.bounding_box.top(),
        bottom_y: end.token.bounding_box.bottom(),
    })
}

/// Collect the tokens of a section, filtered by direction, in scan order.
pub fn collect_section_tokens<'a>(
    section: &Section<'_>,
    direction: Direction,
    grid: &'a DocumentGrid,
) -> Vec<GridMatch<'a>> {
    let top_y = section.top_y;
    let bottom_y = section.bottom_y;
    let start_left = section.start.token.bounding_box.left();
    let start_right = section.start.token.bounding_box.right();

    let within_band = Matcher::predicate(move |entry| {
        let bbox = &entry.token.bounding_box;
        let inside = |y: f32| y > top_y && y < bottom_y;

        let in_band = inside(bbox.top()) || inside(bbox.bottom());
        let in_direction = match direction {
            Direction::LeftRight => bbox.right() > start_left,
            Direction::RightLeft => bbox.left() < start_right,
            Direction::TotalWidth => true,
        };

        in_band && in_direction
    });

    scan(&[&within_band], grid)
        .pop()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{GridPosition, Token};
    use crate::geometry::BoundingBox;

    fn put(grid: &mut DocumentGrid, text: &str, x0: f32, y0: f32, x1: f32, y1: f32) {
        let position = GridPosition::new(x0 as i64, y0 as i64);
        grid.insert(position, Token::new(text, BoundingBox::from_coords(x0, y0, x1, y1)))
            .unwrap();
    }

    fn invoice() -> DocumentGrid {
        let mut grid = DocumentGrid::new();
        put(&mut grid, "Invoice 0001", 10.0, 0.0, 200.0, 20.0);
        put(&mut grid, "Code", 100.0, 100.0, 150.0, 120.0);
        put(&mut grid, "Price", 300.0, 100.0, 360.0, 120.0);
        put(&mut grid, "margin note", 10.0, 130.0, 60.0, 150.0);
        put(&mut grid, "A1", 100.0, 130.0, 130.0, 150.0);
        put(&mut grid, "10.50", 300.0, 130.0, 350.0, 150.0);
        put(&mut grid, "Total", 100.0, 160.0, 150.0, 180.0);
        put(&mut grid, "Thanks", 10.0, 300.0, 100.0, 320.0);
        grid
    }

    fn section(grid: &DocumentGrid) -> Section<'_> {
        let start = Matcher::text("^Code$").unwrap();
        let end = Matcher::text("^Total$").unwrap();
        resolve_section(&start, &end, grid).unwrap()
    }

    fn texts(matches: &[GridMatch<'_>]) -> Vec<String> {
        let mut texts: Vec<String> = matches.iter().map(|m| m.token.text.clone()).collect();
        texts.sort();
        texts
    }

    #[test]
    fn test_resolve_section_band() {
        let grid = invoice();
        let section = section(&grid);
        assert_eq!(section.top_y, 100.0);
        assert_eq!(section.bottom_y, 180.0);
    }

    #[test]
    fn test_missing_marker_is_undetected() {
        let grid = invoice();
        let start = Matcher::text("^Code$").unwrap();
        let end = Matcher::text("^Grand total$").unwrap();
        assert!(resolve_section(&start, &end, &grid).is_none());
    }

    #[test]
    fn test_bottom_most_marker_wins() {
        let mut grid = invoice();
        put(&mut grid, "Total", 100.0, 250.0, 150.0, 270.0);
        let section = section(&grid);
        assert_eq!(section.end.position.y, 250);
        assert_eq!(section.bottom_y, 270.0);
    }

    #[test]
    fn test_bottom_most_tie_keeps_scan_order() {
        let mut grid = DocumentGrid::new();
        put(&mut grid, "x", 0.0, 50.0, 10.0, 60.0);
        put(&mut grid, "x", 40.0, 50.0, 50.0, 60.0);
        let any = Matcher::text("x").unwrap();
        let found = scan(&[&any], &grid);
        assert_eq!(bottom_most(&found[0]).unwrap().position.x, 0);
    }

    #[test]
    fn test_collect_left_right() {
        let grid = invoice();
        let tokens = collect_section_tokens(&section(&grid), Direction::LeftRight, &grid);
        assert_eq!(texts(&tokens), vec!["10.50", "A1", "Code", "Price", "Total"]);
    }

    #[test]
    fn test_collect_total_width() {
        let grid = invoice();
        let tokens = collect_section_tokens(&section(&grid), Direction::TotalWidth, &grid);
        assert_eq!(
            texts(&tokens),
            vec!["10.50", "A1", "Code", "Price", "Total", "margin note"]
        );
    }

    #[test]
    fn test_collect_right_left() {
        let grid = invoice();
        let tokens = collect_section_tokens(&section(&grid), Direction::RightLeft, &grid);
        assert_eq!(texts(&tokens), vec!["A1", "Code", "Total", "margin note"]);
    }

    #[test]
    fn test_direction_serde_names() {
        let direction: Direction = serde_json::from_str("\"TOTAL_WIDTH\"").unwrap();
        assert_eq!(direction, Direction::TotalWidth);
        assert_eq!(Direction::default(), Direction::LeftRight);
    }
}
