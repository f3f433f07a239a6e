//! Parameter entries and the two leaf utilities used by every stage:
//! the enablement filter and identity lookup.

use serde::{Deserialize, Serialize};

/// Role assumed when an entry does not declare one.
pub const DEFAULT_ROLE: &str = "client";
/// Id assumed when an entry does not declare one.
pub const DEFAULT_ID: &str = "1";

/// One named argument with its candidate values and role/id metadata.
///
/// `enabled`/`disabled` are bool-like string flags ("yes"/"no",
/// case-insensitive). They are consumed during assembly or sanitation and
/// never reach output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParamEntry {
    pub arg: String,
    #[serde(default)]
    pub vals: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled: Option<String>,
}

/// Ordered collection of entries representing one configuration-in-progress.
pub type ParamSet = Vec<ParamEntry>;

impl ParamEntry {
    /// Convenience constructor used heavily in tests.
    pub fn new(arg: &str, vals: &[&str]) -> Self {
        Self {
            arg: arg.to_string(),
            vals: vals.iter().map(|v| v.to_string()).collect(),
            role: None,
            id: None,
            enabled: None,
            disabled: None,
        }
    }

    pub fn role(&self) -> &str {
        self.role.as_deref().unwrap_or(DEFAULT_ROLE)
    }

    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or(DEFAULT_ID)
    }

    /// The `(arg, role, id)` tuple that decides whether two entries denote
    /// the same logical parameter.
    pub fn identity(&self) -> (&str, &str, &str) {
        (&self.arg, self.role(), self.id())
    }

    pub fn same_identity(&self, other: &ParamEntry) -> bool {
        self.identity() == other.identity()
    }
}

/// Enablement filter. Returns whether the entry participates and consumes
/// both flag fields, so they cannot leak into later stages.
///
/// An entry is disabled by `enabled: "no"` or `disabled: "yes"`; absent
/// flags mean enabled.
pub fn take_enabled(entry: &mut ParamEntry) -> bool {
    let enabled = entry.enabled.take();
    let disabled = entry.disabled.take();
    if matches!(enabled, Some(flag) if flag.eq_ignore_ascii_case("no")) {
        return false;
    }
    if matches!(disabled, Some(flag) if flag.eq_ignore_ascii_case("yes")) {
        return false;
    }
    true
}

/// Identity resolver: position of the entry in `set` sharing `entry`'s
/// identity key, if any.
pub fn find_same(set: &[ParamEntry], entry: &ParamEntry) -> Option<usize> {
    set.iter().position(|existing| existing.same_identity(entry))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_flags_mean_enabled() {
        let mut entry = ParamEntry::new("mtu", &["1500"]);
        assert!(take_enabled(&mut entry));
    }

    #[test]
    fn enabled_no_disables_case_insensitively() {
        for flag in ["no", "No", "NO"] {
            let mut entry = ParamEntry::new("mtu", &["1500"]);
            entry.enabled = Some(flag.to_string());
            assert!(!take_enabled(&mut entry), "flag {flag:?}");
        }
    }

    #[test]
    fn disabled_yes_disables() {
        let mut entry = ParamEntry::new("mtu", &["1500"]);
        entry.disabled = Some("YES".to_string());
        assert!(!take_enabled(&mut entry));
    }

    #[test]
    fn flags_are_consumed_even_when_enabled() {
        let mut entry = ParamEntry::new("mtu", &["1500"]);
        entry.enabled = Some("yes".to_string());
        entry.disabled = Some("no".to_string());
        assert!(take_enabled(&mut entry));
        assert!(entry.enabled.is_none());
        assert!(entry.disabled.is_none());
    }

    #[test]
    fn identity_defaults_role_and_id() {
        let bare = ParamEntry::new("mtu", &["1500"]);
        let mut explicit = ParamEntry::new("mtu", &["9000"]);
        explicit.role = Some("client".to_string());
        explicit.id = Some("1".to_string());
        assert!(bare.same_identity(&explicit));
    }

    #[test]
    fn identity_distinguishes_role_and_id() {
        let base = ParamEntry::new("mtu", &["1500"]);
        let mut server = ParamEntry::new("mtu", &["1500"]);
        server.role = Some("server".to_string());
        let mut second = ParamEntry::new("mtu", &["1500"]);
        second.id = Some("2".to_string());
        assert!(!base.same_identity(&server));
        assert!(!base.same_identity(&second));
    }

    #[test]
    fn find_same_returns_first_position() {
        let set = vec![
            ParamEntry::new("bs", &["4k"]),
            ParamEntry::new("rw", &["read"]),
        ];
        let probe = ParamEntry::new("rw", &["write"]);
        assert_eq!(find_same(&set, &probe), Some(1));
        let missing = ParamEntry::new("iodepth", &["8"]);
        assert_eq!(find_same(&set, &missing), None);
    }
}
