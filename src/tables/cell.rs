//! Table cells and the tokens placed in them.

use crate::document::Token;
use serde::Serialize;

/// A token placed in a cell, with the overlap ratio that justified it.
#[derive(Debug, Clone, PartialEq)]
pub struct CellItem {
    /// The placed token
    pub token: Token,
    /// Column overlap ratio at assignment time
    pub ratio: f32,
}

/// Plain-object view of a [`CellItem`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellItemObject<'a> {
    /// Column overlap ratio at assignment time
    pub ratio: f32,
    /// Token text
    pub text: &'a str,
}

impl CellItem {
    /// Create a new cell item.
    pub fn new(token: Token, ratio: f32) -> Self {
        Self { token, ratio }
    }

    /// Text of the placed token.
    pub fn text(&self) -> &str {
        &self.token.text
    }

    /// Plain-object view with the assignment ratio.
    pub fn to_object(&self) -> CellItemObject<'_> {
        CellItemObject {
            ratio: self.ratio,
            text: self.text(),
        }
    }
}

/// Zero or more tokens assigned to one (row, column) pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    /// Items in left-to-right order
    pub items: Vec<CellItem>,
}

impl Cell {
    /// Whether nothing was placed in this cell.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add an item at the end of the cell.
    pub fn push(&mut self, item: CellItem) {
        self.items.push(item);
    }

    /// Re-order items left to right (stable).
    pub fn sort_left_to_right(&mut self) {
        self.items.sort_by(|a, b| {
            a.token
                .bounding_box
                .left()
                .total_cmp(&b.token.bounding_box.left())
        });
    }

    /// Item texts joined by a single space; empty for an empty cell.
    pub fn text(&self) -> String {
        self.items
            .iter()
            .map(CellItem::text)
            .collect::<Vec<_>>()
            .join(" ")
    }
}
