//! Layout analysis over the document grid.
//!
//! - [`scanner`]: grid scan with text or predicate matchers
//! - [`boundary`]: table section detection and token collection
//! - [`rows`]: row clustering by vertical overlap
//! - [`columns`]: column header grouping and bound maximization

pub mod boundary;
pub mod columns;
pub mod rows;
pub mod scanner;

pub use boundary::{collect_section_tokens, resolve_section, Direction, Section};
pub use columns::{items_bound, maximize_column_bounds, regroup_column_headers};
pub use rows::cluster_rows;
pub use scanner::{scan, GridMatch, Matcher};
