//! Pattern and predicate matching over the document grid.
//!
//! The scanner walks the grid once in its documented order (x-bucket, then
//! y-bucket, both ascending) and tests every token against every matcher.
//! Each matcher accumulates its own match list; a token may satisfy several.

use crate::document::{DocumentGrid, GridPosition, Token};
use crate::error::{Error, Result};
use regex::Regex;
use std::fmt;

/// A token found in the grid, together with its grid position.
#[derive(Debug, Clone, Copy)]
pub struct GridMatch<'a> {
    /// The matched token
    pub token: &'a Token,
    /// Where the token sits in the grid
    pub position: GridPosition,
}

/// Structural test applied to a token and its position.
pub type Predicate = dyn Fn(&GridMatch<'_>) -> bool + Send + Sync;

/// Something a grid token can be tested against.
pub enum Matcher {
    /// A regular expression applied to the token text.
    Text(Regex),
    /// A predicate applied to the token and its grid position.
    Predicate(Box<Predicate>),
}

impl Matcher {
    /// Compile a text matcher.
    pub fn text(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(Matcher::Text)
            .map_err(|source| Error::InvalidPattern {
                label: pattern.to_string(),
                source,
            })
    }

    /// Wrap a structural predicate.
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&GridMatch<'_>) -> bool + Send + Sync + 'static,
    {
        Matcher::Predicate(Box::new(f))
    }

    /// Test a grid entry against this matcher.
    pub fn test(&self, entry: &GridMatch<'_>) -> bool {
        match self {
            Matcher::Text(regex) => regex.is_match(&entry.token.text),
            Matcher::Predicate(f) => f(entry),
        }
    }
}

impl From<Regex> for Matcher {
    fn from(regex: Regex) -> Self {
        Matcher::Text(regex)
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Text(regex) => f.debug_tuple("Text").field(&regex.as_str()).finish(),
            Matcher::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Run every matcher over the grid.
///
/// Returns one list per matcher, in matcher order; a list is empty when its
/// matcher found nothing. Matches within a list follow scan order.
///
/// # Examples
///
/// ```
/// use ocr_tables::document::{DocumentGrid, GridPosition, Token};
/// use ocr_tables::geometry::BoundingBox;
/// use ocr_tables::layout::scanner::{scan, Matcher};
///
/// let mut grid = DocumentGrid::new();
/// let bbox = BoundingBox::from_coords(0.0, 0.0, 10.0, 10.0);
/// grid.insert(GridPosition::new(0, 0), Token::new("Total 12.00", bbox)).unwrap();
/// grid.insert(GridPosition::new(0, 1), Token::new("Subtotal 10.00", bbox)).unwrap();
///
/// let total = Matcher::text(r"^Total").unwrap();
/// let any_total = Matcher::text(r"(?i)total").unwrap();
/// let found = scan(&[&total, &any_total], &grid);
///
/// assert_eq!(found[0].len(), 1);
/// assert_eq!(found[1].len(), 2);
/// ```
pub fn scan<'a>(matchers: &[&Matcher], grid: &'a DocumentGrid) -> Vec<Vec<GridMatch<'a>>> {
    let mut found: Vec<Vec<GridMatch<'a>>> = matchers.iter().map(|_| Vec::new()).collect();

    for (position, token) in grid.iter() {
        let entry = GridMatch { token, position };
        for (matcher, matches) in matchers.iter().zip(found.iter_mut()) {
            if matcher.test(&entry) {
                matches.push(entry);
            }
        }
    }

    found
}
