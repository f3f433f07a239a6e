//! Input and output document models.
//!
//! The input document historically accepts two shapes for a set
//! declaration: an object with `include` / `include-preset` / `params`
//! keys, or a legacy bare array of entries where an element carrying an
//! `include` key acts as an include directive. Both deserialize through an
//! untagged enum and normalize to one internal [`SetSpec`] before the
//! assembler runs.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::params::ParamEntry;

// ============================================================================
// INPUT DOCUMENT
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputDocument {
    #[serde(rename = "global-options", default)]
    pub global_options: Vec<OptionGroup>,
    #[serde(default)]
    pub sets: Vec<RawSetSpec>,
}

/// A named group of entries any set may pull in via `include`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionGroup {
    pub name: String,
    #[serde(default)]
    pub params: Vec<ParamEntry>,
}

/// A set declaration as it appears on the wire, before normalization.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawSetSpec {
    Spec(SetSpecBody),
    Legacy(Vec<LegacyItem>),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetSpecBody {
    #[serde(default)]
    pub include: Option<String>,
    #[serde(rename = "include-preset", default)]
    pub include_preset: Option<String>,
    #[serde(default)]
    pub params: Vec<ParamEntry>,
}

/// One element of a legacy bare-array set declaration.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LegacyItem {
    Include {
        include: String,
    },
    Param(ParamEntry),
}

/// The single internal shape every set declaration normalizes to.
#[derive(Debug, Clone, Default)]
pub struct SetSpec {
    pub include: Option<String>,
    pub include_preset: Option<String>,
    pub params: Vec<ParamEntry>,
}

impl RawSetSpec {
    pub fn normalize(self) -> SetSpec {
        match self {
            RawSetSpec::Spec(body) => SetSpec {
                include: body.include,
                include_preset: body.include_preset,
                params: body.params,
            },
            RawSetSpec::Legacy(items) => {
                let mut spec = SetSpec::default();
                for item in items {
                    match item {
                        LegacyItem::Include { include } => {
                            if spec.include.is_some() {
                                warn!(name = %include, "ignoring extra include directive in legacy set");
                            } else {
                                spec.include = Some(include);
                            }
                        }
                        LegacyItem::Param(param) => spec.params.push(param),
                    }
                }
                spec
            }
        }
    }
}

impl InputDocument {
    /// Consumes the document, yielding normalized set declarations and the
    /// global-options table.
    pub fn into_parts(self) -> (Vec<SetSpec>, Vec<OptionGroup>) {
        let specs = self.sets.into_iter().map(RawSetSpec::normalize).collect();
        (specs, self.global_options)
    }
}

// ============================================================================
// OUTPUT DOCUMENT
// ============================================================================

/// A finalized entry: the one surviving value renamed to scalar `val`.
/// Enablement flags are unrepresentable here and `vals` no longer exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputParam {
    pub arg: String,
    pub val: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

pub type OutputSet = Vec<OutputParam>;
pub type OutputDocument = Vec<OutputSet>;

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> InputDocument {
        serde_json::from_str(json).expect("document should parse")
    }

    #[test]
    fn object_form_normalizes_directly() {
        let doc = parse(
            r#"{ "sets": [ { "include": "common", "include-preset": "fast",
                             "params": [ { "arg": "mtu", "vals": ["1500"] } ] } ] }"#,
        );
        let (specs, _) = doc.into_parts();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].include.as_deref(), Some("common"));
        assert_eq!(specs[0].include_preset.as_deref(), Some("fast"));
        assert_eq!(specs[0].params.len(), 1);
    }

    #[test]
    fn legacy_array_form_extracts_include_directives() {
        let doc = parse(
            r#"{ "sets": [ [ { "include": "common-params" },
                             { "arg": "ioengine", "vals": ["sync"] } ] ] }"#,
        );
        let (specs, _) = doc.into_parts();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].include.as_deref(), Some("common-params"));
        assert!(specs[0].include_preset.is_none());
        assert_eq!(specs[0].params[0].arg, "ioengine");
    }

    #[test]
    fn legacy_array_keeps_first_include_only() {
        let doc = parse(r#"{ "sets": [ [ { "include": "a" }, { "include": "b" } ] ] }"#);
        let (specs, _) = doc.into_parts();
        assert_eq!(specs[0].include.as_deref(), Some("a"));
    }

    #[test]
    fn missing_sets_key_is_an_empty_document() {
        let doc = parse(r#"{}"#);
        let (specs, groups) = doc.into_parts();
        assert!(specs.is_empty());
        assert!(groups.is_empty());
    }

    #[test]
    fn unknown_top_level_keys_are_schema_errors() {
        let err = serde_json::from_str::<InputDocument>(r#"{ "set": [] }"#);
        assert!(err.is_err());
    }

    #[test]
    fn global_options_parse_with_params() {
        let doc = parse(
            r#"{ "global-options": [ { "name": "common",
                    "params": [ { "arg": "bs", "vals": ["4k", "8k"] } ] } ] }"#,
        );
        let (_, groups) = doc.into_parts();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "common");
        assert_eq!(groups[0].params[0].vals, vec!["4k", "8k"]);
    }

    #[test]
    fn output_param_serializes_without_absent_id() {
        let param = OutputParam {
            arg: "mtu".into(),
            val: "1500".into(),
            role: "client".into(),
            id: None,
        };
        let json = serde_json::to_string(&param).unwrap();
        assert_eq!(json, r#"{"arg":"mtu","val":"1500","role":"client"}"#);
    }
}
