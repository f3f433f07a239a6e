//! Stage orchestration: parsed documents in, output document out.
//!
//! The whole pipeline is synchronous and in-memory; the only fallible
//! stages are preset overriding (empty sets) and multiplexing (value
//! validation).

use tracing::debug;

use crate::assemble::assemble;
use crate::document::{InputDocument, OutputDocument};
use crate::errors::Result;
use crate::multiplex::{finalize, multiplex};
use crate::presets::apply_presets;
use crate::requirements::{RequirementsDocument, RuleTables};

/// Runs input document -> assembler -> preset overrider -> multiplexer ->
/// finalizer.
pub fn run(input: InputDocument, requirements: RequirementsDocument) -> Result<OutputDocument> {
    let rules = RuleTables::from_document(requirements);
    let (specs, groups) = input.into_parts();

    let assembled = assemble(specs, &groups, &rules);
    debug!(sets = assembled.len(), "assembled parameter sets");

    let overridden = apply_presets(assembled, &rules)?;
    let expanded = multiplex(&overridden, &rules)?;
    debug!(sets = expanded.len(), "multiplexed parameter sets");

    Ok(finalize(expanded))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ParamuxError;

    fn run_json(input: &str, requirements: &str) -> Result<OutputDocument> {
        let input: InputDocument = serde_json::from_str(input).expect("input should parse");
        let requirements: RequirementsDocument =
            serde_json::from_str(requirements).expect("requirements should parse");
        run(input, requirements)
    }

    #[test]
    fn end_to_end_mtu_example() {
        let out = run_json(
            r#"{ "sets": [ { "params": [ { "arg": "mtu", "vals": ["1500", "9000"] } ] } ] }"#,
            "{}",
        )
        .unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0][0].arg, "mtu");
        assert_eq!(out[0][0].val, "1500");
        assert_eq!(out[0][0].role, "client");
        assert_eq!(out[1][0].val, "9000");
    }

    #[test]
    fn global_options_presets_and_multiplexing_compose() {
        let out = run_json(
            r#"{ "global-options": [ { "name": "common", "params": [
                    { "arg": "bs", "vals": ["4k", "8k"] } ] } ],
                 "sets": [ { "include": "common", "params": [
                    { "arg": "rw", "vals": ["read", "write"] } ] } ] }"#,
            r#"{ "presets": { "essentials": [ { "arg": "runtime", "vals": ["60"] } ] } }"#,
        )
        .unwrap();
        assert_eq!(out.len(), 4);
        for set in &out {
            assert_eq!(set.len(), 3);
            assert_eq!(set[2].arg, "runtime");
            assert_eq!(set[2].val, "60");
        }
    }

    #[test]
    fn validation_failure_aborts_before_any_output() {
        let err = run_json(
            r#"{ "sets": [ { "params": [ { "arg": "mtu", "vals": ["1500", "bad"] } ] } ] }"#,
            r#"{ "validations": { "mtu": { "args": ["mtu"], "vals": ["^[0-9]+$"] } } }"#,
        )
        .unwrap_err();
        assert_eq!(err.exit_code(), 5);
    }

    #[test]
    fn empty_input_without_presets_is_an_empty_set_error() {
        let err = run_json("{}", "{}").unwrap_err();
        assert!(matches!(err, ParamuxError::EmptySet { .. }));
    }

    #[test]
    fn empty_input_with_defaults_produces_one_configuration() {
        let out = run_json(
            "{}",
            r#"{ "presets": { "defaults": [ { "arg": "mtu", "vals": ["1500"] } ] } }"#,
        )
        .unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0][0].val, "1500");
    }

    #[test]
    fn conversion_and_transform_reach_the_output() {
        let out = run_json(
            r#"{ "sets": [ { "params": [ { "arg": "size", "vals": ["2MB-4MB"] } ] } ] }"#,
            r#"{ "validations": { "mem": { "args": ["size"], "vals": [".*"],
                    "convert": "bytes",
                    "transform": { "search": "KB", "replace": "kb" } } },
                 "units": { "bytes": { "KB": { "MB": "1000" } } } }"#,
        )
        .unwrap();
        assert_eq!(out[0][0].val, "2000kb-4000kb");
    }
}
