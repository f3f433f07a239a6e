//! The per-value pipeline: validate, convert, transform.
//!
//! `process` is a pure function of the parameter name, the raw value, and
//! the rule tables. Validation failure is fatal to the whole run; every
//! other rule degrades to a logged warning and a best-effort fallback.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{error, warn};

use crate::errors::{ParamuxError, Result};
use crate::requirements::{RuleTables, UnitTable};

/// Leading numeric magnitude with an optional trailing alphabetic unit.
static MAGNITUDE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]*\.?[0-9]+)([A-Za-z]*)$").expect("static pattern"));

/// Runs one candidate value through validate -> convert -> transform.
pub fn process(arg: &str, raw: &str, rules: &RuleTables) -> Result<String> {
    validate(arg, raw, rules)?;
    let converted = convert(arg, raw, rules);
    Ok(transform(arg, &converted, rules))
}

// ============================================================================
// VALIDATION
// ============================================================================

/// A value passes when the table is empty, or when it matches at least one
/// of its argument's patterns. A non-empty table with no entry for the
/// argument is a hard failure so typos in requirements do not pass silently.
fn validate(arg: &str, value: &str, rules: &RuleTables) -> Result<()> {
    if rules.validation.is_empty() {
        return Ok(());
    }
    let Some(patterns) = rules.validation.get(arg) else {
        error!(arg, value, "no validation rule for this parameter");
        return Err(ParamuxError::MissingRule {
            arg: arg.to_string(),
            value: value.to_string(),
        });
    };
    // An arg listed with no patterns (a convert/transform-only group) is
    // exempt from pattern matching.
    if patterns.is_empty() {
        return Ok(());
    }
    for pattern in patterns {
        match Regex::new(pattern) {
            Ok(re) if re.is_match(value) => return Ok(()),
            Ok(_) => warn!(arg, value, pattern = %pattern, "value does not match pattern"),
            Err(err) => warn!(arg, pattern = %pattern, %err, "invalid validation pattern"),
        }
    }
    Err(ParamuxError::ValueRejected {
        arg: arg.to_string(),
        value: value.to_string(),
        patterns: patterns.join(", "),
    })
}

// ============================================================================
// UNIT CONVERSION
// ============================================================================

/// Converts a value, or each side of a hyphenated `low-high` range, to the
/// argument's target unit. Sides that cannot be converted stay as-is.
fn convert(arg: &str, value: &str, rules: &RuleTables) -> String {
    let Some(table) = rules.conversion.get(arg) else {
        return value.to_string();
    };
    value
        .split('-')
        .map(|side| convert_side(arg, side, table))
        .collect::<Vec<_>>()
        .join("-")
}

fn convert_side(arg: &str, side: &str, table: &UnitTable) -> String {
    let Some(caps) = MAGNITUDE.captures(side) else {
        warn!(arg, value = side, "value has no numeric magnitude, skipping conversion");
        return side.to_string();
    };
    let magnitude: f64 = match caps[1].parse() {
        Ok(magnitude) => magnitude,
        Err(err) => {
            warn!(arg, value = side, %err, "magnitude does not parse, skipping conversion");
            return side.to_string();
        }
    };
    let source_unit = &caps[2];

    for (target_unit, factors) in table {
        let Some(expr) = factors.get(source_unit) else {
            continue;
        };
        let Some(factor) = parse_factor(expr) else {
            warn!(arg, unit = source_unit, expr = %expr, "conversion factor does not parse");
            return side.to_string();
        };
        return format!("{}{}", format_magnitude(magnitude * factor), target_unit);
    }
    warn!(arg, unit = source_unit, "unknown source unit, skipping conversion");
    side.to_string()
}

/// Factor expressions are plain numbers, with the `a/b` quotient form
/// accepted so tables can state exact ratios like `1/1000`.
fn parse_factor(expr: &str) -> Option<f64> {
    let expr = expr.trim();
    if let Ok(factor) = expr.parse::<f64>() {
        return Some(factor);
    }
    let (numerator, denominator) = expr.split_once('/')?;
    let numerator: f64 = numerator.trim().parse().ok()?;
    let denominator: f64 = denominator.trim().parse().ok()?;
    if denominator == 0.0 {
        return None;
    }
    Some(numerator / denominator)
}

/// Whole results print as integers, everything else as-is.
fn format_magnitude(result: f64) -> String {
    if result.fract() == 0.0 && result.abs() < i64::MAX as f64 {
        format!("{}", result as i64)
    } else {
        format!("{result}")
    }
}

// ============================================================================
// TRANSFORM
// ============================================================================

fn transform(arg: &str, value: &str, rules: &RuleTables) -> String {
    let Some(rule) = rules.transform.get(arg) else {
        return value.to_string();
    };
    match Regex::new(&rule.search) {
        Ok(re) => re.replace_all(value, rule.replace.as_str()).into_owned(),
        Err(err) => {
            warn!(arg, search = %rule.search, %err, "invalid transform pattern, value unchanged");
            value.to_string()
        }
    }
}
