//! Virtual prefs — host facts exposed through the preference path syntax
//!
//! A virtual pref is not stored anywhere; the host computes it when asked.
//! Conditions address virtual prefs with the reserved `[virtual]:` prefix on
//! the root segment, then descend with `|` like any stored dictionary:
//!
//! ```text
//! [virtual]:browser|version
//! [virtual]:operating_system|name
//! [virtual]:skus|production|search.brave.com|status
//! ```
//!
//! [`VirtualPrefs`] is a snapshot of those facts that a [`PrefProvider`]
//! implementation can delegate `get_virtual_pref` to.
//!
//! [`PrefProvider`]: crate::PrefProvider

use crate::PrefValue;
use std::collections::BTreeMap;

/// Reserved root-segment prefix routing a path to virtual facts.
pub const VIRTUAL_PREF_PATH_PREFIX: &str = "[virtual]:";

/// Returns `true` if the root segment addresses a virtual pref.
#[inline]
#[must_use]
pub fn is_virtual_pref_path(path: &str) -> bool {
    path.starts_with(VIRTUAL_PREF_PATH_PREFIX)
}

/// A subscription record under `[virtual]:skus|<environment>|<location>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkusOrder {
    /// Order status, e.g. `"active"` or `"canceled"`.
    pub status: String,
    /// RFC 3339 creation time.
    pub created_at: String,
    /// RFC 3339 expiry time.
    pub expires_at: String,
    /// RFC 3339 time of the last successful payment.
    pub last_paid_at: String,
}

impl SkusOrder {
    fn into_value(self) -> PrefValue {
        PrefValue::Map(BTreeMap::from([
            ("status".to_string(), PrefValue::String(self.status)),
            ("created_at".to_string(), PrefValue::String(self.created_at)),
            ("expires_at".to_string(), PrefValue::String(self.expires_at)),
            ("last_paid_at".to_string(), PrefValue::String(self.last_paid_at)),
        ]))
    }
}

/// Snapshot of computed host facts, keyed by root name.
///
/// # Example
///
/// ```
/// use prefmatch::{PrefValue, VirtualPrefs};
///
/// let facts = VirtualPrefs::new()
///     .with_browser("1.71.118", "release")
///     .with_operating_system("linux");
///
/// let browser = facts.get("[virtual]:browser").unwrap();
/// assert_eq!(
///     browser.as_map().unwrap()["version"],
///     PrefValue::String("1.71.118".into())
/// );
/// assert!(facts.get("[virtual]:unknown").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VirtualPrefs {
    facts: BTreeMap<String, PrefValue>,
}

impl VirtualPrefs {
    /// Create an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an arbitrary fact under `name` (without the reserved prefix).
    #[must_use]
    pub fn with_fact(mut self, name: impl Into<String>, value: impl Into<PrefValue>) -> Self {
        self.facts.insert(name.into(), value.into());
        self
    }

    /// `[virtual]:browser|version` and `[virtual]:browser|build_channel`.
    #[must_use]
    pub fn with_browser(self, version: &str, build_channel: &str) -> Self {
        self.with_fact(
            "browser",
            BTreeMap::from([
                ("version".to_string(), PrefValue::from(version)),
                ("build_channel".to_string(), PrefValue::from(build_channel)),
            ]),
        )
    }

    /// `[virtual]:operating_system|name`.
    #[must_use]
    pub fn with_operating_system(self, name: &str) -> Self {
        self.with_fact(
            "operating_system",
            BTreeMap::from([("name".to_string(), PrefValue::from(name))]),
        )
    }

    /// `[virtual]:search_engine|default_name`.
    #[must_use]
    pub fn with_default_search_engine(self, name: &str) -> Self {
        self.with_fact(
            "search_engine",
            BTreeMap::from([("default_name".to_string(), PrefValue::from(name))]),
        )
    }

    /// `[virtual]:locale|language` and `[virtual]:locale|region`.
    #[must_use]
    pub fn with_locale(self, language: &str, region: &str) -> Self {
        self.with_fact(
            "locale",
            BTreeMap::from([
                ("language".to_string(), PrefValue::from(language)),
                ("region".to_string(), PrefValue::from(region)),
            ]),
        )
    }

    /// `[virtual]:skus|<environment>|<location>|...`.
    ///
    /// Orders for several environments and locations accumulate. A `skus` or
    /// environment entry that is not a dictionary is replaced by one.
    #[must_use]
    pub fn with_skus_order(mut self, environment: &str, location: &str, order: SkusOrder) -> Self {
        let mut environments = take_map(&mut self.facts, "skus");
        let mut locations = take_map(&mut environments, environment);
        locations.insert(location.to_string(), order.into_value());
        environments.insert(environment.to_string(), PrefValue::Map(locations));
        self.facts.insert("skus".to_string(), PrefValue::Map(environments));
        self
    }

    /// Look up a fact by root segment, with or without the reserved prefix.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<PrefValue> {
        let name = path.strip_prefix(VIRTUAL_PREF_PATH_PREFIX).unwrap_or(path);
        self.facts.get(name).cloned()
    }

    /// Returns `true` if no facts are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

/// Remove the dictionary under `key`; a missing or non-dictionary value
/// yields an empty one.
fn take_map(map: &mut BTreeMap<String, PrefValue>, key: &str) -> BTreeMap<String, PrefValue> {
    match map.remove(key) {
        Some(PrefValue::Map(inner)) => inner,
        _ => BTreeMap::new(),
    }
}
