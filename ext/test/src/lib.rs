//! prefmatch-test: In-memory preferences for conformance testing
//!
//! Provides [`TestPrefs`], a [`PrefProvider`] backed by plain maps, and (with
//! the `fixtures` feature) a YAML fixture runner.
//!
//! # Example
//!
//! ```
//! use prefmatch_test::prelude::*;
//!
//! let prefs = TestPrefs::new()
//!     .with_profile("brave.rewards.enabled", true)
//!     .with_local_state("brave.p3a.enabled", false)
//!     .with_virtual(VirtualPrefs::new().with_operating_system("linux"));
//!
//! assert_eq!(
//!     resolve(&prefs, "[virtual]:operating_system|name"),
//!     Some(PrefValue::String("linux".into()))
//! );
//! ```

use prefmatch::prelude::*;
use std::collections::BTreeMap;

#[cfg(feature = "fixtures")]
pub mod fixture;

/// Test preferences: three string-keyed namespaces.
///
/// Used for conformance testing where we need predictable,
/// controllable preference state.
#[derive(Debug, Clone, Default)]
pub struct TestPrefs {
    profile: BTreeMap<String, PrefValue>,
    local_state: BTreeMap<String, PrefValue>,
    virtual_prefs: VirtualPrefs,
}

impl TestPrefs {
    /// Create empty preferences.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a profile pref (builder pattern).
    #[must_use]
    pub fn with_profile(mut self, path: impl Into<String>, value: impl Into<PrefValue>) -> Self {
        self.profile.insert(path.into(), value.into());
        self
    }

    /// Set a local-state pref (builder pattern).
    #[must_use]
    pub fn with_local_state(
        mut self,
        path: impl Into<String>,
        value: impl Into<PrefValue>,
    ) -> Self {
        self.local_state.insert(path.into(), value.into());
        self
    }

    /// Replace the virtual facts (builder pattern).
    #[must_use]
    pub fn with_virtual(mut self, facts: VirtualPrefs) -> Self {
        self.virtual_prefs = facts;
        self
    }
}

impl PrefProvider for TestPrefs {
    fn get_profile_pref(&self, path: &str) -> Option<PrefValue> {
        self.profile.get(path).cloned()
    }

    fn get_local_state_pref(&self, path: &str) -> Option<PrefValue> {
        self.local_state.get(path).cloned()
    }

    fn get_virtual_pref(&self, path: &str) -> Option<PrefValue> {
        self.virtual_prefs.get(path)
    }
}

/// Build a [`ConditionMatcherMap`] from string pairs.
#[must_use]
pub fn matchers(pairs: &[(&str, &str)]) -> ConditionMatcherMap {
    pairs.iter().copied().collect()
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{matchers, TestPrefs};
    pub use prefmatch::prelude::*;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefs_builder() {
        let prefs = TestPrefs::new()
            .with_profile("a", 1i64)
            .with_local_state("b", "two");

        assert_eq!(prefs.get_profile_pref("a"), Some(PrefValue::Int(1)));
        assert_eq!(prefs.get_local_state_pref("b"), Some(PrefValue::from("two")));
        assert!(!prefs.has_profile_pref("b"));
        assert!(prefs.get_virtual_pref("[virtual]:browser").is_none());
    }

    #[test]
    fn test_prefs_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TestPrefs>();
    }

    #[test]
    fn test_full_evaluation() {
        let prefs = TestPrefs::new()
            .with_profile("role", "admin")
            .with_virtual(VirtualPrefs::new().with_browser("1.2.3", "beta"));

        assert!(match_conditions(
            &prefs,
            &matchers(&[
                ("role", "admin"),
                ("[virtual]:browser|build_channel", "beta"),
            ])
        ));
        assert!(!match_conditions(&prefs, &matchers(&[("role", "viewer")])));
    }
}
