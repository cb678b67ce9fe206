//! Table rules and table extraction.
//!
//! A [`TableRule`] names a table and gives the matchers for its start and end
//! markers plus the horizontal walk used to collect its body. Running rules
//! against a document yields a [`TableSet`]; rules whose markers are not found
//! simply produce no table.

pub mod cell;
pub mod table;

pub use cell::{Cell, CellItem};
pub use table::{detect_columns, Column, Detection, Row, Table, UndetectedToken};

use crate::config::TableConfig;
use crate::document::Document;
use crate::error::Result;
use crate::layout::boundary::{collect_section_tokens, resolve_section, Direction};
use crate::layout::scanner::Matcher;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// How to find one table in a document.
#[derive(Debug)]
pub struct TableRule {
    /// Name of the table in the results
    pub label: String,
    /// Matcher for the start marker (usually part of the header row)
    pub start: Matcher,
    /// Matcher for the end marker (usually a totals line)
    pub end: Matcher,
    /// Horizontal walk used to collect the body
    pub direction: Direction,
}

impl TableRule {
    /// Create a rule from start and end text patterns.
    pub fn new(label: impl Into<String>, start: &str, end: &str) -> Result<Self> {
        Ok(Self::with_matchers(
            label,
            Matcher::text(start)?,
            Matcher::text(end)?,
        ))
    }

    /// Create a rule from arbitrary matchers.
    pub fn with_matchers(label: impl Into<String>, start: Matcher, end: Matcher) -> Self {
        Self {
            label: label.into(),
            start,
            end,
            direction: Direction::default(),
        }
    }

    /// Set the walk direction.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }
}

/// JSON form of a [`TableRule`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRuleDefinition {
    /// Name of the table
    pub label: String,
    /// Start marker pattern
    pub start: String,
    /// End marker pattern
    pub end: String,
    /// Walk direction (`LEFT_RIGHT`, `RIGHT_LEFT` or `TOTAL_WIDTH`)
    #[serde(default)]
    pub direction: Direction,
}

impl TableRuleDefinition {
    /// Compile the patterns into a rule.
    pub fn compile(&self) -> Result<TableRule> {
        let compile = |pattern: &str| {
            regex::Regex::new(pattern).map_err(|source| crate::error::Error::InvalidPattern {
                label: self.label.clone(),
                source,
            })
        };

        Ok(TableRule::with_matchers(
            self.label.clone(),
            Matcher::Text(compile(&self.start)?),
            Matcher::Text(compile(&self.end)?),
        )
        .with_direction(self.direction))
    }
}

/// Locate and build the table described by `rule`.
///
/// Returns `None` when the start or end marker is missing.
pub fn build_table(rule: &TableRule, document: &Document, config: &TableConfig) -> Option<Table> {
    let section = resolve_section(&rule.start, &rule.end, &document.grid)?;
    let tokens = collect_section_tokens(&section, rule.direction, &document.grid)
        .into_iter()
        .map(|entry| entry.token.clone())
        .collect::<Vec<_>>();

    log::debug!("table '{}': {} candidate tokens", rule.label, tokens.len());

    Some(Table::build(tokens, &document.page, config))
}

/// Tables built from a list of rules, keyed by rule label in rule order.
#[derive(Debug, Clone, Default)]
pub struct TableSet {
    tables: IndexMap<String, Table>,
    missing: Vec<String>,
}

impl TableSet {
    /// Table built for a label.
    pub fn get(&self, label: &str) -> Option<&Table> {
        self.tables.get(label)
    }

    /// Labels whose markers were not found.
    pub fn missing(&self) -> &[String] {
        &self.missing
    }

    /// Number of built tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether no table was built.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Built tables in rule order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Table)> {
        self.tables.iter().map(|(label, table)| (label.as_str(), table))
    }
}

impl Serialize for TableSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.tables.serialize(serializer)
    }
}

/// Run every table rule against a document.
///
/// A later rule with the same label replaces the earlier table.
pub fn build_tables(rules: &[TableRule], document: &Document, config: &TableConfig) -> TableSet {
    let mut set = TableSet::default();

    for rule in rules {
        match build_table(rule, document, config) {
            Some(table) => {
                set.tables.insert(rule.label.clone(), table);
            },
            None => {
                log::warn!("table '{}' not detected, skipping", rule.label);
                set.missing.push(rule.label.clone());
            },
        }
    }

    set
}
