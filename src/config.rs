//! Configuration for table reconstruction and rule loading.
//!
//! [`TableConfig`] tunes the cell assignment engine. [`RuleSet`] is the JSON
//! form of a complete extraction setup (field rules, table rules and the table
//! configuration); compiling it against a page validates everything up front so
//! bad definitions fail before any document is processed.

use crate::document::Page;
use crate::error::{Error, Result};
use crate::rules::{FieldRule, FieldRuleDefinition};
use crate::tables::{TableRule, TableRuleDefinition};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default minimum ratio for accepting an unambiguous header-bound assignment.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.5;

/// Table building configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Minimum overlap ratio (exclusive) for a single header-bound detection to
    /// be accepted in the first assignment phase. Must lie in `(0, 1]`.
    pub confidence_threshold: f32,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TableConfig {
    /// Create new configuration with defaults.
    pub fn new() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
        }
    }

    /// Set the confidence threshold.
    pub fn with_confidence_threshold(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    /// Check that every value is in range.
    pub fn validate(&self) -> Result<()> {
        let t = self.confidence_threshold;
        if !(t > 0.0 && t <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "confidence_threshold must be in (0, 1], got {}",
                t
            )));
        }
        Ok(())
    }
}

/// Field rules, table rules and table configuration as loaded from JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    /// Table building configuration
    pub table_config: TableConfig,
    /// Field rule definitions
    pub fields: Vec<FieldRuleDefinition>,
    /// Table rule definitions
    pub tables: Vec<TableRuleDefinition>,
}

/// A validated [`RuleSet`], ready to run against documents of one page size.
#[derive(Debug)]
pub struct CompiledRules {
    /// Table building configuration
    pub table_config: TableConfig,
    /// Compiled field rules
    pub fields: Vec<FieldRule>,
    /// Compiled table rules
    pub tables: Vec<TableRule>,
}

impl RuleSet {
    /// Parse a rule set from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a rule set file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Validate and compile every definition.
    ///
    /// Section coordinates of field filters are resolved against `page`.
    pub fn compile(&self, page: &Page) -> Result<CompiledRules> {
        self.table_config.validate()?;

        let fields = self
            .fields
            .iter()
            .map(|def| def.compile(page))
            .collect::<Result<Vec<_>>>()?;

        let tables = self
            .tables
            .iter()
            .map(TableRuleDefinition::compile)
            .collect::<Result<Vec<_>>>()?;

        log::debug!(
            "compiled {} field rules and {} table rules",
            fields.len(),
            tables.len()
        );

        Ok(CompiledRules {
            table_config: self.table_config.clone(),
            fields,
            tables,
        })
    }
}
