//! The multiplexing engine: expands each parameter set over the cartesian
//! product of its candidate values, then collapses the single-valued
//! result into output records.

use crate::document::{OutputDocument, OutputParam, OutputSet};
use crate::errors::Result;
use crate::params::{take_enabled, ParamEntry, ParamSet, DEFAULT_ROLE};
use crate::pipeline;
use crate::requirements::RuleTables;

/// Expands every set into one single-valued set per combination, in input
/// order. The originals are never mutated; every emitted set is a fresh
/// copy. A validation failure inside the value pipeline aborts the whole
/// run.
pub fn multiplex(sets: &[ParamSet], rules: &RuleTables) -> Result<Vec<ParamSet>> {
    let mut expanded = Vec::new();
    for set in sets {
        expanded.extend(multiplex_set(set, rules)?);
    }
    Ok(expanded)
}

fn multiplex_set(set: &ParamSet, rules: &RuleTables) -> Result<Vec<ParamSet>> {
    let sanitized = sanitize(set);
    if sanitized.is_empty() {
        return Ok(Vec::new());
    }

    // every candidate value goes through the pipeline exactly once
    let mut value_lists = Vec::with_capacity(sanitized.len());
    for entry in &sanitized {
        let mut processed = Vec::with_capacity(entry.vals.len());
        for raw in &entry.vals {
            processed.push(pipeline::process(&entry.arg, raw, rules)?);
        }
        value_lists.push(processed);
    }

    let combinations: usize = value_lists.iter().map(Vec::len).product();
    if combinations == 0 {
        return Ok(Vec::new());
    }

    // odometer enumeration: last parameter varies fastest
    let mut expanded = Vec::with_capacity(combinations);
    let mut indices = vec![0usize; value_lists.len()];
    for _ in 0..combinations {
        let mut single = sanitized.clone();
        for (slot, entry) in single.iter_mut().enumerate() {
            entry.vals = vec![value_lists[slot][indices[slot]].clone()];
        }
        expanded.push(single);

        for slot in (0..indices.len()).rev() {
            indices[slot] += 1;
            if indices[slot] < value_lists[slot].len() {
                break;
            }
            indices[slot] = 0;
        }
    }
    Ok(expanded)
}

/// Sanitation pass: drop disabled entries, consume the flags, and default
/// the role.
fn sanitize(set: &ParamSet) -> ParamSet {
    let mut sanitized = ParamSet::new();
    for entry in set {
        let mut entry = entry.clone();
        if !take_enabled(&mut entry) {
            continue;
        }
        if entry.role.is_none() {
            entry.role = Some(DEFAULT_ROLE.to_string());
        }
        sanitized.push(entry);
    }
    sanitized
}

// ============================================================================
// FINALIZER
// ============================================================================

/// Renames each entry's one-element value list into the scalar `val`
/// field. The multiplexer guarantees exactly one element per entry.
pub fn finalize(sets: Vec<ParamSet>) -> OutputDocument {
    sets.into_iter()
        .map(|set| set.into_iter().map(finalize_entry).collect::<OutputSet>())
        .collect()
}

fn finalize_entry(mut entry: ParamEntry) -> OutputParam {
    OutputParam {
        val: entry.vals.pop().unwrap_or_default(),
        arg: entry.arg,
        role: entry.role.unwrap_or_else(|| DEFAULT_ROLE.to_string()),
        id: entry.id,
    }
}
