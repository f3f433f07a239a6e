//! Unified error handling for paramux.
//!
//! Every fatal failure mode maps to exactly one variant here, and every
//! variant maps to a stable process exit code. Soft conditions (unknown
//! units, pattern misses where another pattern matches, invalid transform
//! regexes) are `tracing` warnings, not errors, and never change the exit
//! code.

use miette::Diagnostic;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ParamuxError>;

/// All fatal failure modes, each with a distinct diagnostic code and a
/// distinct exit code.
#[derive(Debug, Error, Diagnostic)]
pub enum ParamuxError {
    #[error("could not load input file {path}: {reason}")]
    #[diagnostic(
        code(paramux::input::load),
        help("check that the file exists, is readable, and contains well-formed JSON")
    )]
    InputLoad { path: String, reason: String },

    #[error("input document {path} does not have the expected shape: {reason}")]
    #[diagnostic(
        code(paramux::input::schema),
        help("the document must be an object with optional \"global-options\" and \"sets\" keys")
    )]
    InputSchema { path: String, reason: String },

    #[error("could not load requirements file {path}: {reason}")]
    #[diagnostic(
        code(paramux::requirements::load),
        help("check that the file exists, is readable, and contains well-formed JSON")
    )]
    RequirementsLoad { path: String, reason: String },

    #[error("requirements document {path} does not have the expected shape: {reason}")]
    #[diagnostic(
        code(paramux::requirements::schema),
        help("the document may carry \"validations\", \"units\", and \"presets\" keys")
    )]
    RequirementsSchema { path: String, reason: String },

    #[error("value {value:?} for parameter {arg:?} matched none of: {patterns}")]
    #[diagnostic(
        code(paramux::validation::value_rejected),
        help("every candidate value must match at least one validation pattern for its parameter")
    )]
    ValueRejected {
        arg: String,
        value: String,
        patterns: String,
    },

    #[error("no validation rule covers parameter {arg:?} (value {value:?})")]
    #[diagnostic(
        code(paramux::validation::missing_rule),
        help("add the parameter to the \"args\" list of a validations group")
    )]
    MissingRule { arg: String, value: String },

    #[error("parameter set {index} is empty after preset overrides")]
    #[diagnostic(
        code(paramux::presets::empty_set),
        help("define a \"defaults\" or \"essentials\" preset in the requirements document, or declare parameters on the set")
    )]
    EmptySet { index: usize },

    #[error("could not write output to {target}: {reason}")]
    #[diagnostic(code(paramux::output::write))]
    OutputWrite { target: String, reason: String },
}

impl ParamuxError {
    /// Stable exit code for each fatal category. Success is 0; these start
    /// at 1 and are part of the tool's external contract.
    pub const fn exit_code(&self) -> i32 {
        match self {
            ParamuxError::InputLoad { .. } => 1,
            ParamuxError::InputSchema { .. } => 2,
            ParamuxError::RequirementsLoad { .. } => 3,
            ParamuxError::RequirementsSchema { .. } => 4,
            ParamuxError::ValueRejected { .. } | ParamuxError::MissingRule { .. } => 5,
            ParamuxError::EmptySet { .. } => 6,
            ParamuxError::OutputWrite { .. } => 7,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct_per_category() {
        let errors = [
            ParamuxError::InputLoad {
                path: "a".into(),
                reason: "x".into(),
            },
            ParamuxError::InputSchema {
                path: "a".into(),
                reason: "x".into(),
            },
            ParamuxError::RequirementsLoad {
                path: "a".into(),
                reason: "x".into(),
            },
            ParamuxError::RequirementsSchema {
                path: "a".into(),
                reason: "x".into(),
            },
            ParamuxError::ValueRejected {
                arg: "a".into(),
                value: "v".into(),
                patterns: "p".into(),
            },
            ParamuxError::EmptySet { index: 0 },
            ParamuxError::OutputWrite {
                target: "-".into(),
                reason: "x".into(),
            },
        ];
        let codes: Vec<i32> = errors.iter().map(ParamuxError::exit_code).collect();
        assert_eq!(codes, vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn missing_rule_shares_the_validation_exit_code() {
        let err = ParamuxError::MissingRule {
            arg: "mtu".into(),
            value: "1500".into(),
        };
        assert_eq!(err.exit_code(), 5);
    }
}
