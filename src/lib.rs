// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::enum_variant_names)]

//! # OCR Tables
//!
//! Table reconstruction and field extraction over OCR output.
//!
//! The input is a [`Document`]: a page size plus a grid of recognized text
//! tokens, each with a four-corner bounding box. Two kinds of rules run
//! against it:
//!
//! - **Table rules** locate a table between a start marker and an end marker,
//!   collect the tokens inside that band, cluster them into rows, use the first
//!   row as the column headers and assign every token to a cell. The result is
//!   a string matrix.
//! - **Field rules** search the grid with a regular expression and keep the
//!   findings selected by a filter (all of them, the top-most, the bottom-most
//!   or those inside a page section).
//!
//! ## Modules
//!
//! - [`geometry`]: points, boxes, rectification and overlap ratios
//! - [`document`]: tokens, the document grid and the JSON input format
//! - [`layout`]: grid scanning, section detection, rows and columns
//! - [`tables`]: the cell assignment engine and table rules
//! - [`rules`]: field rules and their filters
//! - [`config`]: table configuration and JSON rule sets
//! - [`extraction`]: running a rule set against a document
//!
//! ## Quick Start
//!
//! ```
//! use ocr_tables::config::TableConfig;
//! use ocr_tables::document::{Document, GridPosition, Page, Token};
//! use ocr_tables::geometry::BoundingBox;
//! use ocr_tables::tables::{build_table, TableRule};
//!
//! # fn main() -> ocr_tables::Result<()> {
//! let mut doc = Document::new(Page::new(400.0, 600.0));
//! for (text, x0, y0, x1) in [
//!     ("Code", 10.0, 100.0, 40.0),
//!     ("Price", 200.0, 100.0, 250.0),
//!     ("A1", 10.0, 120.0, 30.0),
//!     ("10.50", 205.0, 120.0, 245.0),
//!     ("Total", 10.0, 140.0, 50.0),
//! ] {
//!     let bbox = BoundingBox::from_coords(x0, y0, x1, y0 + 10.0);
//!     doc.grid.insert(GridPosition::new(x0 as i64, y0 as i64), Token::new(text, bbox))?;
//! }
//!
//! let rule = TableRule::new("items", "^Code$", "^Total$")?;
//! let table = build_table(&rule, &doc, &TableConfig::default()).unwrap();
//! assert_eq!(table.extract_data()[1], vec!["A1", "10.50"]);
//! # Ok(())
//! # }
//! ```

// Error handling
pub mod error;

// Geometry primitives
pub mod geometry;

// Input model
pub mod document;

// Layout analysis
pub mod layout;

// Table reconstruction
pub mod tables;

// Field rules
pub mod rules;

// Configuration
pub mod config;

// High-level extraction
pub mod extraction;

// Re-exports
pub use config::{CompiledRules, RuleSet, TableConfig};
pub use document::{Document, DocumentGrid, GridPosition, Page, Token, Word};
pub use error::{Error, Result};
pub use extraction::{extract, Extraction};
pub use geometry::{BoundingBox, Point};
pub use rules::{FieldRule, FilterStrategy};
pub use tables::{build_table, build_tables, Table, TableRule, TableSet};
