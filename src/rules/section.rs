//! Page sections used by section filters.
//!
//! A section is a box on the page given by two corners. Each corner is either a
//! document keyword or a pair of per-axis specs, and each axis is either a
//! keyword or a percentage of the page extent:
//!
//! ```json
//! {
//!   "begin": "beginOfDocument",
//!   "end": {
//!     "x": "endOfDocument",
//!     "y": { "type": "relative", "to": "endOfDocument", "percentage": 30 }
//!   }
//! }
//! ```
//!
//! Definitions are resolved against a [`Page`] when the rule is compiled; any
//! unknown keyword or type is rejected at that point.

use crate::document::Page;
use crate::error::{Error, Result};
use crate::geometry::{build_bounding_box, BoundingBox, Point};
use serde::{Deserialize, Serialize};

const BEGIN_OF_DOCUMENT: &str = "beginOfDocument";
const END_OF_DOCUMENT: &str = "endOfDocument";
const RELATIVE: &str = "relative";

/// A coordinate relative to another point of the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelativeSpec {
    /// Kind of coordinate; only `relative` is supported
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Anchor keyword; only `endOfDocument` is supported
    #[serde(default)]
    pub to: Option<String>,
    /// Percentage of the anchor's extent
    pub percentage: f32,
}

/// One axis of a corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisSpec {
    /// A document keyword
    Keyword(String),
    /// A percentage of the page
    Relative(RelativeSpec),
}

/// A section corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CoordinateSpec {
    /// A document keyword for both axes
    Keyword(String),
    /// Separate specs per axis
    Axes {
        /// Horizontal spec
        x: AxisSpec,
        /// Vertical spec
        y: AxisSpec,
    },
}

/// A section given by its top-left and bottom-right corners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionSpec {
    /// Top-left corner
    pub begin: CoordinateSpec,
    /// Bottom-right corner
    pub end: CoordinateSpec,
}

#[derive(Clone, Copy)]
enum Axis {
    X,
    Y,
}

impl Axis {
    fn of(self, point: Point) -> f32 {
        match self {
            Axis::X => point.x,
            Axis::Y => point.y,
        }
    }
}

impl SectionSpec {
    /// Resolve the section to a box on `page`.
    ///
    /// `label` names the owning rule in error messages.
    pub fn resolve(&self, page: &Page, label: &str) -> Result<BoundingBox> {
        let begin = self.begin.resolve(page, label)?;
        let end = self.end.resolve(page, label)?;
        Ok(build_bounding_box(begin, end))
    }
}

impl CoordinateSpec {
    fn resolve(&self, page: &Page, label: &str) -> Result<Point> {
        match self {
            CoordinateSpec::Keyword(keyword) => keyword_point(keyword, page, label),
            CoordinateSpec::Axes { x, y } => Ok(Point::new(
                x.resolve(Axis::X, page, label)?,
                y.resolve(Axis::Y, page, label)?,
            )),
        }
    }
}

impl AxisSpec {
    fn resolve(&self, axis: Axis, page: &Page, label: &str) -> Result<f32> {
        match self {
            AxisSpec::Keyword(keyword) => Ok(axis.of(keyword_point(keyword, page, label)?)),
            AxisSpec::Relative(spec) => spec.resolve(axis, page, label),
        }
    }
}

impl RelativeSpec {
    fn resolve(&self, axis: Axis, page: &Page, label: &str) -> Result<f32> {
        match self.kind.as_deref() {
            None => {
                return Err(invalid(
                    label,
                    "section type required, \"relative\" supported".to_string(),
                ))
            },
            Some(RELATIVE) => {},
            Some(other) => return Err(invalid(label, format!("unsupported type {}", other))),
        }

        if self.to.as_deref() != Some(END_OF_DOCUMENT) {
            return Err(invalid(
                label,
                "invalid section definition, use endOfDocument".to_string(),
            ));
        }

        Ok((axis.of(page.end()) * self.percentage / 100.0).ceil())
    }
}

fn keyword_point(keyword: &str, page: &Page, label: &str) -> Result<Point> {
    match keyword {
        BEGIN_OF_DOCUMENT => Ok(page.begin()),
        END_OF_DOCUMENT => Ok(page.end()),
        other => Err(invalid(label, format!("unknown section keyword {}", other))),
    }
}

fn invalid(label: &str, reason: String) -> Error {
    Error::InvalidRule {
        label: label.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: Page = Page {
        width: 1000.0,
        height: 1500.0,
    };

    fn spec(json: &str) -> SectionSpec {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_whole_document() {
        let bbox = spec(r#"{ "begin": "beginOfDocument", "end": "endOfDocument" }"#)
            .resolve(&PAGE, "r")
            .unwrap();
        assert_eq!(bbox, BoundingBox::from_coords(0.0, 0.0, 1000.0, 1500.0));
    }

    #[test]
    fn test_relative_top_band() {
        let bbox = spec(
            r#"{
                "begin": "beginOfDocument",
                "end": {
                    "x": "endOfDocument",
                    "y": { "type": "relative", "to": "endOfDocument", "percentage": 33.3 }
                }
            }"#,
        )
        .resolve(&PAGE, "r")
        .unwrap();
        // 1500 * 33.3 / 100 = 499.5, rounded up
        assert_eq!(bbox, BoundingBox::from_coords(0.0, 0.0, 1000.0, 500.0));
    }

    #[test]
    fn test_unsupported_type_is_rejected() {
        let err = spec(
            r#"{
                "begin": { "x": { "type": "absolute", "to": "endOfDocument", "percentage": 10 },
                           "y": "beginOfDocument" },
                "end": "endOfDocument"
            }"#,
        )
        .resolve(&PAGE, "iva")
        .unwrap_err();
        assert!(format!("{}", err).contains("unsupported type absolute"));
    }

    #[test]
    fn test_missing_type_is_rejected() {
        let err = spec(
            r#"{
                "begin": "beginOfDocument",
                "end": { "x": { "to": "endOfDocument", "percentage": 50 }, "y": "endOfDocument" }
            }"#,
        )
        .resolve(&PAGE, "r")
        .unwrap_err();
        assert!(format!("{}", err).contains("section type required"));
    }

    #[test]
    fn test_bad_anchor_and_keyword_are_rejected() {
        let anchor = spec(
            r#"{
                "begin": "beginOfDocument",
                "end": { "x": { "type": "relative", "to": "beginOfDocument", "percentage": 50 },
                         "y": "endOfDocument" }
            }"#,
        );
        assert!(anchor.resolve(&PAGE, "r").is_err());

        let keyword = spec(r#"{ "begin": "topOfPage", "end": "endOfDocument" }"#);
        assert!(matches!(
            keyword.resolve(&PAGE, "r"),
            Err(Error::InvalidRule { .. })
        ));
    }
}
