//! Config types for loading matchers and preference snapshots from JSON.
//!
//! Catalogs ship condition matchers as a list of objects:
//!
//! ```json
//! [
//!   { "prefPath": "brave.rewards.enabled", "condition": "1" },
//!   { "prefPath": "[!]:brave.new_tab_page.opted_out", "condition": "" }
//! ]
//! ```
//!
//! [`PrefSnapshot`] is a deserializable, point-in-time copy of the three
//! preference namespaces. It implements [`PrefProvider`] so a snapshot on
//! disk can be evaluated without a live host.

use crate::{ConditionMatcherMap, PrefProvider, PrefValue, VirtualPrefs};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Errors from loading config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The document is not valid JSON of the expected shape.
    InvalidJson {
        /// The underlying error message.
        source: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidJson { source } => write!(f, "invalid config: {source}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidJson {
            source: e.to_string(),
        }
    }
}

/// One `(path, condition)` pair as it appears in a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionMatcherConfig {
    /// Pref path, possibly prefixed with `[!]:`.
    pub pref_path: String,
    /// Condition string.
    pub condition: String,
}

impl ConditionMatcherMap {
    /// Parse a JSON list of `{ "prefPath", "condition" }` objects.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidJson`] if the document does not have that
    /// shape.
    ///
    /// # Example
    ///
    /// ```
    /// use prefmatch::ConditionMatcherMap;
    ///
    /// let matchers = ConditionMatcherMap::from_json(
    ///     r#"[{ "prefPath": "a|b", "condition": "[R>]:1" }]"#,
    /// ).unwrap();
    /// assert_eq!(matchers.iter().next(), Some(("a|b", "[R>]:1")));
    /// ```
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let configs: Vec<ConditionMatcherConfig> = serde_json::from_str(json)?;
        Ok(configs
            .into_iter()
            .map(|c| (c.pref_path, c.condition))
            .collect())
    }

    /// The catalog representation of this map, in insertion order.
    #[must_use]
    pub fn to_configs(&self) -> Vec<ConditionMatcherConfig> {
        self.iter()
            .map(|(pref_path, condition)| ConditionMatcherConfig {
                pref_path: pref_path.to_string(),
                condition: condition.to_string(),
            })
            .collect()
    }
}

/// A point-in-time copy of the profile, local-state and virtual namespaces.
///
/// ```json
/// {
///   "profile": { "brave.rewards.enabled": true },
///   "local_state": { "brave.stats.week_of_installation": "2024-06-10" },
///   "virtual": { "browser": { "version": "1.71.118" } }
/// }
/// ```
///
/// Virtual facts are keyed by root name without the `[virtual]:` prefix.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrefSnapshot {
    /// Per-profile preferences.
    #[serde(default)]
    pub profile: BTreeMap<String, PrefValue>,
    /// Process-wide preferences.
    #[serde(default)]
    pub local_state: BTreeMap<String, PrefValue>,
    /// Virtual facts.
    #[serde(default, rename = "virtual")]
    pub virtual_prefs: BTreeMap<String, PrefValue>,
}

impl PrefSnapshot {
    /// Parse a snapshot document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidJson`] on malformed input.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// The virtual namespace as a [`VirtualPrefs`].
    #[must_use]
    pub fn virtual_facts(&self) -> VirtualPrefs {
        self.virtual_prefs
            .iter()
            .fold(VirtualPrefs::new(), |facts, (name, value)| {
                facts.with_fact(name.clone(), value.clone())
            })
    }
}

impl PrefProvider for PrefSnapshot {
    fn get_profile_pref(&self, path: &str) -> Option<PrefValue> {
        self.profile.get(path).cloned()
    }

    fn get_local_state_pref(&self, path: &str) -> Option<PrefValue> {
        self.local_state.get(path).cloned()
    }

    fn get_virtual_pref(&self, path: &str) -> Option<PrefValue> {
        let name = path
            .strip_prefix(crate::VIRTUAL_PREF_PATH_PREFIX)
            .unwrap_or(path);
        self.virtual_prefs.get(name).cloned()
    }
}
