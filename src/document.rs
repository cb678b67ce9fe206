//! OCR document model: words, tokens, the page and the sparse token grid.
//!
//! The grid is keyed first by an x-bucket then by a y-bucket. Those keys only
//! define a deterministic scan order; pixel geometry always comes from the
//! token bounding boxes.

use crate::error::{Error, Result};
use crate::geometry::{BoundingBox, Point};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single recognized word inside a token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    /// Word text
    pub text: String,
    /// Bounding box of the word
    pub bounding_box: BoundingBox,
    /// Character count excluding inter-word spacing
    #[serde(default)]
    pub symbols: usize,
}

impl Word {
    /// Create a word; the symbol count is taken from the text.
    pub fn new(text: impl Into<String>, bounding_box: BoundingBox) -> Self {
        let text = text.into();
        let symbols = text.chars().filter(|c| !c.is_whitespace()).count();
        Self {
            text,
            bounding_box,
            symbols,
        }
    }
}

/// An OCR-recognized line or paragraph with its bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Recognized text
    pub text: String,
    /// Bounding box of the whole token
    pub bounding_box: BoundingBox,
    /// Words making up the token, in reading order
    #[serde(default)]
    pub words: Vec<Word>,
}

impl Token {
    /// Create a token without word annotations.
    pub fn new(text: impl Into<String>, bounding_box: BoundingBox) -> Self {
        Self {
            text: text.into(),
            bounding_box,
            words: Vec::new(),
        }
    }

    /// Create a token from its words.
    ///
    /// The token box takes its left corners from the first word and its right
    /// corners from the last one; the text is the words joined by a space.
    /// Returns `None` when `words` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use ocr_tables::document::{Token, Word};
    /// use ocr_tables::geometry::BoundingBox;
    ///
    /// let token = Token::from_words(vec![
    ///     Word::new("Unit", BoundingBox::from_coords(10.0, 0.0, 40.0, 12.0)),
    ///     Word::new("price", BoundingBox::from_coords(45.0, 1.0, 80.0, 13.0)),
    /// ])
    /// .unwrap();
    ///
    /// assert_eq!(token.text, "Unit price");
    /// assert_eq!(token.bounding_box.left(), 10.0);
    /// assert_eq!(token.bounding_box.right(), 80.0);
    /// ```
    pub fn from_words(words: Vec<Word>) -> Option<Self> {
        let first = words.first()?;
        let last = words.last()?;
        let bounding_box = BoundingBox::new(
            first.bounding_box.top_left(),
            last.bounding_box.top_right(),
            last.bounding_box.bottom_right(),
            first.bounding_box.bottom_left(),
        );
        let text = words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        Some(Self {
            text,
            bounding_box,
            words,
        })
    }
}

/// Coordinate of a token in the document grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPosition {
    /// Outer (x) bucket
    pub x: i64,
    /// Inner (y) bucket
    pub y: i64,
}

impl GridPosition {
    /// Create a new grid position.
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// Sparse two-level grid of tokens.
///
/// Iteration is ascending on the x-bucket, then ascending on the y-bucket.
/// Scan order drives tie-breaking elsewhere, so this contract is relied upon.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentGrid {
    cells: BTreeMap<i64, BTreeMap<i64, Token>>,
    len: usize,
}

impl DocumentGrid {
    /// Create an empty grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a token; fails if the position is already taken.
    pub fn insert(&mut self, position: GridPosition, token: Token) -> Result<()> {
        let column = self.cells.entry(position.x).or_default();
        if column.contains_key(&position.y) {
            return Err(Error::DuplicatePosition {
                x: position.x,
                y: position.y,
            });
        }
        column.insert(position.y, token);
        self.len += 1;
        Ok(())
    }

    /// Token at a position.
    pub fn get(&self, position: GridPosition) -> Option<&Token> {
        self.cells.get(&position.x)?.get(&position.y)
    }

    /// Number of tokens in the grid.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the grid holds no tokens.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterate tokens in scan order.
    pub fn iter(&self) -> impl Iterator<Item = (GridPosition, &Token)> + '_ {
        self.cells.iter().flat_map(|(&x, column)| {
            column
                .iter()
                .map(move |(&y, token)| (GridPosition::new(x, y), token))
        })
    }
}

/// Page dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Page width
    pub width: f32,
    /// Page height
    pub height: f32,
}

impl Page {
    /// Create a new page.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Top-left corner of the page.
    pub fn begin(&self) -> Point {
        Point::new(0.0, 0.0)
    }

    /// Bottom-right corner of the page.
    pub fn end(&self) -> Point {
        Point::new(self.width, self.height)
    }
}

/// A token together with its grid position, as stored in document files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionedToken {
    /// Grid position
    pub position: GridPosition,
    /// The token itself
    #[serde(flatten)]
    pub token: Token,
}

#[derive(Deserialize)]
struct DocumentFile {
    page: Page,
    #[serde(default)]
    tokens: Vec<PositionedToken>,
}

/// An OCR'd page: its dimensions and its token grid.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "DocumentFile")]
pub struct Document {
    /// Page dimensions
    pub page: Page,
    /// Token grid
    pub grid: DocumentGrid,
}

impl TryFrom<DocumentFile> for Document {
    type Error = Error;

    fn try_from(file: DocumentFile) -> Result<Self> {
        Self::from_tokens(file.page, file.tokens)
    }
}

impl Document {
    /// Create a document with an empty grid.
    pub fn new(page: Page) -> Self {
        Self {
            page,
            grid: DocumentGrid::new(),
        }
    }

    /// Build a document from positioned tokens.
    pub fn from_tokens<I>(page: Page, tokens: I) -> Result<Self>
    where
        I: IntoIterator<Item = PositionedToken>,
    {
        let mut document = Self::new(page);
        for PositionedToken { position, token } in tokens {
            document.grid.insert(position, token)?;
        }
        Ok(document)
    }

    /// Parse a document from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
