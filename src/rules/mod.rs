//! Field rules: pattern search over the document grid.
//!
//! A [`FieldRule`] tests every grid token against a regular expression,
//! extracts one capture group from the matching tokens and then narrows the
//! findings with a [`FilterStrategy`]. Strategies form a closed set; a section
//! filter carries its page box already resolved, so nothing about a rule can
//! fail once it is compiled.

pub mod section;

pub use section::{AxisSpec, CoordinateSpec, RelativeSpec, SectionSpec};

use crate::document::{Document, GridPosition, Token};
use crate::error::{Error, Result};
use crate::geometry::{intersection_ratio, BoundingBox};
use crate::layout::scanner::{scan, GridMatch, Matcher};
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Default minimum intersection ratio (exclusive) for section filters.
pub const DEFAULT_SECTION_MIN_RATIO: f32 = 0.8;

/// Keep only findings whose token lies within a page section.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionFilter {
    /// Section box in page pixels
    pub bounds: BoundingBox,
    /// Minimum intersection ratio (exclusive)
    pub min_ratio: f32,
}

/// How a rule narrows its findings.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FilterStrategy {
    /// Keep every finding.
    #[default]
    All,
    /// Keep the top-most finding.
    TopFirst,
    /// Keep the bottom-most finding.
    BottomFirst,
    /// Keep findings inside a section of the page.
    Section(SectionFilter),
}

/// A value found by a field rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Finding<'a> {
    /// Extracted value (the rule's capture group)
    pub text: String,
    /// Token the value was found in
    pub token: &'a Token,
    /// Grid position of the token
    pub position: GridPosition,
}

impl FilterStrategy {
    /// Apply the strategy to findings in scan order.
    pub fn apply<'a>(&self, mut findings: Vec<Finding<'a>>) -> Vec<Finding<'a>> {
        if findings.len() <= 1 && !matches!(self, FilterStrategy::Section(_)) {
            return findings;
        }

        match self {
            FilterStrategy::All => findings,
            FilterStrategy::TopFirst => {
                findings.sort_by_key(|f| f.position.y);
                findings.truncate(1);
                findings
            },
            FilterStrategy::BottomFirst => {
                findings.sort_by_key(|f| std::cmp::Reverse(f.position.y));
                findings.truncate(1);
                findings
            },
            FilterStrategy::Section(section) => findings
                .into_iter()
                .filter(|f| intersection_ratio(&section.bounds, &f.token.bounding_box) > section.min_ratio)
                .collect(),
        }
    }
}

/// A compiled field rule.
#[derive(Debug)]
pub struct FieldRule {
    /// Field name in the results
    pub label: String,
    /// Text matcher
    pub pattern: Regex,
    /// Capture group holding the value
    pub matching_group: usize,
    /// Selection strategy
    pub filter: FilterStrategy,
}

impl FieldRule {
    /// Create a rule extracting capture group 1 and keeping every finding.
    pub fn new(label: impl Into<String>, pattern: &str) -> Result<Self> {
        let label = label.into();
        let pattern = Regex::new(pattern).map_err(|source| Error::InvalidPattern {
            label: label.clone(),
            source,
        })?;
        Ok(Self {
            label,
            pattern,
            matching_group: 1,
            filter: FilterStrategy::All,
        })
    }

    /// Set the capture group holding the value.
    pub fn with_matching_group(mut self, group: usize) -> Self {
        self.matching_group = group;
        self
    }

    /// Set the selection strategy.
    pub fn with_filter(mut self, filter: FilterStrategy) -> Self {
        self.filter = filter;
        self
    }

    /// Whether `text` matches the pattern.
    pub fn test(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    /// Extract the configured capture group from `text`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ocr_tables::rules::FieldRule;
    ///
    /// let rule = FieldRule::new("puntoVenta", r"Punto de Venta: ([0-9]{4,5})").unwrap();
    /// assert_eq!(rule.extract("Punto de Venta: 00012"), Some("00012".to_string()));
    /// assert_eq!(rule.extract("Comp. Nro: 00001234"), None);
    /// ```
    pub fn extract(&self, text: &str) -> Option<String> {
        self.pattern
            .captures(text)?
            .get(self.matching_group)
            .map(|m| m.as_str().to_string())
    }

    /// Search the document grid and filter the findings.
    pub fn search<'a>(&self, document: &'a Document) -> Vec<Finding<'a>> {
        extract_from_grid(self, document)
    }
}

/// Search every grid token with a rule, in scan order, then apply its filter.
pub fn extract_from_grid<'a>(rule: &FieldRule, document: &'a Document) -> Vec<Finding<'a>> {
    let matcher = Matcher::Text(rule.pattern.clone());
    let findings: Vec<Finding<'a>> = scan(&[&matcher], &document.grid)
        .pop()
        .unwrap_or_default()
        .into_iter()
        .filter_map(|GridMatch { token, position }| {
            rule.extract(&token.text).map(|text| Finding {
                text,
                token,
                position,
            })
        })
        .collect();

    let found = findings.len();
    let kept = rule.filter.apply(findings);
    log::debug!(
        "field '{}': {} findings, {} kept",
        rule.label,
        found,
        kept.len()
    );
    kept
}

/// Run every field rule, keyed by label in rule order.
pub fn extract_fields<'a>(
    rules: &[FieldRule],
    document: &'a Document,
) -> IndexMap<String, Vec<Finding<'a>>> {
    rules
        .iter()
        .map(|rule| (rule.label.clone(), extract_from_grid(rule, document)))
        .collect()
}

/// JSON form of a [`FilterStrategy`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "camelCase")]
pub enum FilterDefinition {
    /// [`FilterStrategy::TopFirst`]
    TopFirst,
    /// [`FilterStrategy::BottomFirst`]
    BottomFirst,
    /// [`FilterStrategy::Section`]
    Section {
        /// Section corners
        coordinates: SectionSpec,
        /// Minimum intersection ratio; defaults to 0.8
        #[serde(default)]
        min_ratio: Option<f32>,
    },
}

/// JSON form of a [`FieldRule`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRuleDefinition {
    /// Field name
    pub label: String,
    /// Regular expression
    pub pattern: String,
    /// Capture group holding the value; defaults to 1
    #[serde(default)]
    pub matching_group: Option<usize>,
    /// Selection strategy; defaults to keeping everything
    #[serde(default)]
    pub filter: Option<FilterDefinition>,
}

impl FieldRuleDefinition {
    /// Compile the definition, resolving section filters against `page`.
    pub fn compile(&self, page: &crate::document::Page) -> Result<FieldRule> {
        let filter = match &self.filter {
            None => FilterStrategy::All,
            Some(FilterDefinition::TopFirst) => FilterStrategy::TopFirst,
            Some(FilterDefinition::BottomFirst) => FilterStrategy::BottomFirst,
            Some(FilterDefinition::Section {
                coordinates,
                min_ratio,
            }) => {
                let min_ratio = min_ratio.unwrap_or(DEFAULT_SECTION_MIN_RATIO);
                if !(0.0..=1.0).contains(&min_ratio) {
                    return Err(Error::InvalidRule {
                        label: self.label.clone(),
                        reason: format!("min_ratio must be in [0, 1], got {}", min_ratio),
                    });
                }
                FilterStrategy::Section(SectionFilter {
                    bounds: coordinates.resolve(page, &self.label)?,
                    min_ratio,
                })
            },
        };

        Ok(FieldRule::new(self.label.clone(), &self.pattern)?
            .with_matching_group(self.matching_group.unwrap_or(1))
            .with_filter(filter))
    }
}
