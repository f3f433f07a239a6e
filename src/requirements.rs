//! Requirements document model and the rule tables built from it.
//!
//! The requirements document groups validation patterns, unit-conversion
//! tables, transform rules, and named presets. It is parsed once, flattened
//! into per-argument [`RuleTables`], and thereafter read-only: the tables
//! are threaded by reference into the assembler, overrider, and value
//! pipeline, never held as ambient state.

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::warn;

use crate::params::{ParamEntry, ParamSet};

/// Preset name substituted whole when a set is empty.
pub const DEFAULTS_PRESET: &str = "defaults";
/// Preset name forcibly merged into every non-empty set.
pub const ESSENTIALS_PRESET: &str = "essentials";

// ============================================================================
// DOCUMENT SHAPE
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequirementsDocument {
    #[serde(default)]
    pub validations: IndexMap<String, ValidationGroup>,
    #[serde(default)]
    pub units: IndexMap<String, UnitTable>,
    #[serde(default)]
    pub presets: IndexMap<String, Vec<ParamEntry>>,
}

/// `{ target-unit: { source-unit: factor expression } }`.
pub type UnitTable = IndexMap<String, IndexMap<String, String>>;

/// One validations group: the rules shared by every argument it lists.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidationGroup {
    pub args: Vec<String>,
    #[serde(default)]
    pub vals: Patterns,
    #[serde(default)]
    pub convert: Option<String>,
    #[serde(default)]
    pub transform: Option<TransformRule>,
}

/// Pattern list, accepting the backward-compatible single-string form.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Patterns {
    One(String),
    Many(Vec<String>),
}

impl Default for Patterns {
    fn default() -> Self {
        Patterns::Many(Vec::new())
    }
}

impl Patterns {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Patterns::One(pattern) => vec![pattern],
            Patterns::Many(patterns) => patterns,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransformRule {
    pub search: String,
    pub replace: String,
}

// ============================================================================
// RULE TABLES
// ============================================================================

/// Per-argument rule tables plus the presets table, flattened from the
/// requirements document.
#[derive(Debug, Default)]
pub struct RuleTables {
    /// arg -> regex patterns the value must match at least one of.
    pub validation: IndexMap<String, Vec<String>>,
    /// arg -> unit-conversion table.
    pub conversion: IndexMap<String, UnitTable>,
    /// arg -> regex search/replace.
    pub transform: IndexMap<String, TransformRule>,
    /// preset name -> entries.
    pub presets: IndexMap<String, ParamSet>,
}

impl RuleTables {
    pub fn from_document(doc: RequirementsDocument) -> Self {
        let mut tables = RuleTables {
            presets: doc.presets,
            ..RuleTables::default()
        };

        for (group_name, group) in doc.validations {
            let patterns = group.vals.into_vec();
            let unit_table = match &group.convert {
                Some(unit_group) => {
                    let table = doc.units.get(unit_group).cloned();
                    if table.is_none() {
                        warn!(
                            group = %group_name,
                            units = %unit_group,
                            "convert names an unknown units group"
                        );
                    }
                    table
                }
                None => None,
            };
            for arg in group.args {
                tables.validation.insert(arg.clone(), patterns.clone());
                if let Some(table) = unit_table.clone() {
                    tables.conversion.insert(arg.clone(), table);
                }
                if let Some(rule) = group.transform.clone() {
                    tables.transform.insert(arg.clone(), rule);
                }
            }
        }

        tables
    }

    pub fn preset(&self, name: &str) -> Option<&ParamSet> {
        self.presets.get(name)
    }

    pub fn defaults(&self) -> Option<&ParamSet> {
        self.presets.get(DEFAULTS_PRESET)
    }

    pub fn essentials(&self) -> Option<&ParamSet> {
        self.presets.get(ESSENTIALS_PRESET)
    }
}
