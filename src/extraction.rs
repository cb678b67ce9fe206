//! Running a compiled rule set against a document.

use crate::config::CompiledRules;
use crate::document::Document;
use crate::rules::extract_fields;
use crate::tables::{build_tables, TableSet};
use indexmap::IndexMap;
use serde::Serialize;

/// Everything a rule set extracted from one document.
#[derive(Debug, Clone, Serialize)]
pub struct Extraction {
    /// Field values by label, in rule order
    pub fields: IndexMap<String, Vec<String>>,
    /// Tables by label, in rule order
    pub tables: TableSet,
    /// Labels of table rules whose markers were not found
    pub missing_tables: Vec<String>,
}

impl Extraction {
    /// Serialize to JSON.
    pub fn to_json(&self, pretty: bool) -> crate::Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}

impl CompiledRules {
    /// Extract every field and table from `document`.
    pub fn apply(&self, document: &Document) -> Extraction {
        extract(self, document)
    }
}

/// Extract every field and table described by `rules` from `document`.
pub fn extract(rules: &CompiledRules, document: &Document) -> Extraction {
    let fields = extract_fields(&rules.fields, document)
        .into_iter()
        .map(|(label, findings)| (label, findings.into_iter().map(|f| f.text).collect()))
        .collect();

    let tables = build_tables(&rules.tables, document, &rules.table_config);
    let missing_tables = tables.missing().to_vec();

    log::debug!(
        "extracted {} fields and {} tables ({} missing)",
        rules.fields.len(),
        tables.len(),
        missing_tables.len()
    );

    Extraction {
        fields,
        tables,
        missing_tables,
    }
}
