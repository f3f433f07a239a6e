//! Preset overriding: `defaults` substitution for empty sets and forced
//! `essentials` merging for every set.

use tracing::{debug, error};

use crate::errors::{ParamuxError, Result};
use crate::params::{find_same, ParamSet};
use crate::requirements::RuleTables;

/// Post-processes the assembled sets.
///
/// An empty collection is seeded with one empty set so a bare input
/// document can still be driven entirely by presets. Each set then goes
/// through `defaults` substitution and `essentials` merging; a set that is
/// still empty afterwards is a fatal error, so the tool never emits a
/// configuration with zero parameters.
pub fn apply_presets(mut sets: Vec<ParamSet>, rules: &RuleTables) -> Result<Vec<ParamSet>> {
    if sets.is_empty() {
        sets.push(ParamSet::new());
    }

    for (index, set) in sets.iter_mut().enumerate() {
        if set.is_empty() {
            if let Some(defaults) = rules.defaults() {
                debug!(set = index, "substituting defaults preset for empty set");
                *set = defaults.clone();
            }
        }

        if let Some(essentials) = rules.essentials() {
            merge_essentials(set, essentials);
        }

        if set.is_empty() {
            error!(set = index, "parameter set is empty after preset overrides");
            return Err(ParamuxError::EmptySet { index });
        }
    }

    Ok(sets)
}

/// Each essential overrides the entry sharing its identity key, in place,
/// and is consumed by doing so; leftovers are appended. An empty set just
/// becomes a copy of the whole essentials list.
fn merge_essentials(set: &mut ParamSet, essentials: &ParamSet) {
    if set.is_empty() {
        *set = essentials.clone();
        return;
    }
    let mut pool = essentials.clone();
    for entry in set.iter_mut() {
        if let Some(position) = find_same(&pool, entry) {
            *entry = pool.remove(position);
        }
    }
    set.extend(pool);
}
