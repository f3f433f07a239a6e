//! Set assembly: one parameter set per declared set, merging included
//! global-option groups and presets with inline parameters.
//!
//! Inclusion order matters: `include` resolves first, then
//! `include-preset`, then inline parameters, so an inline declaration can
//! override an included entry but not the other way around.

use tracing::warn;

use crate::document::{OptionGroup, SetSpec};
use crate::params::{find_same, take_enabled, ParamEntry, ParamSet};
use crate::requirements::RuleTables;

/// Builds every declared set. An input document without sets yields an
/// empty collection; the preset overrider decides whether that is fatal.
pub fn assemble(specs: Vec<SetSpec>, groups: &[OptionGroup], rules: &RuleTables) -> Vec<ParamSet> {
    specs
        .into_iter()
        .map(|spec| assemble_set(spec, groups, rules))
        .collect()
}

fn assemble_set(spec: SetSpec, groups: &[OptionGroup], rules: &RuleTables) -> ParamSet {
    let mut set = ParamSet::new();

    if let Some(name) = &spec.include {
        match groups.iter().find(|group| group.name == *name) {
            Some(group) => merge_included(&mut set, &group.params),
            None => warn!(name = %name, "include names no global-options group"),
        }
    }

    if let Some(name) = &spec.include_preset {
        match rules.preset(name) {
            Some(params) => merge_included(&mut set, params),
            None => warn!(name = %name, "include-preset names no preset"),
        }
    }

    for mut param in spec.params {
        if !take_enabled(&mut param) {
            continue;
        }
        match find_same(&set, &param) {
            // inline declarations override in place, keeping position
            Some(index) => set[index] = param,
            None => set.push(param),
        }
    }

    set
}

/// Appends copies of the group's enabled entries that are not already
/// present by identity. Entries already in the set win.
fn merge_included(set: &mut ParamSet, params: &[ParamEntry]) {
    for param in params {
        let mut param = param.clone();
        if !take_enabled(&mut param) {
            continue;
        }
        if find_same(set, &param).is_none() {
            set.push(param);
        }
    }
}
