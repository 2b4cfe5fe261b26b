//! prefmatch - condition matching over browser preferences
//!
//! Decides whether a targeted creative (a new tab page takeover, a catalog
//! ad) may be shown, given a set of `(pref path, condition)` pairs from its
//! catalog entry and the user's current preferences.
//!
//! # Architecture
//!
//! - [`PrefValue`] — Tagged value tree (scalars, lists, dictionaries)
//! - [`PrefProvider`] — Read-only profile, local-state and virtual namespaces
//! - [`resolve_path`] — Walks a `|`-delimited path down to a value
//! - [`Condition`] — Parsed condition: epoch, numerical, pattern or regex
//! - [`match_conditions`] — AND over every pair, with `[!]:` absence semantics
//!
//! # Key Invariants
//!
//! 1. **Never fails on input**: malformed paths, conditions and regexes are
//!    non-matches, not errors. Catalogs are downloaded and may be stale or
//!    hostile.
//!
//! 2. **Absence → false, unless NOT**: an unresolved path (or one that stops
//!    on a list or dictionary) fails a plain condition and satisfies a
//!    `[!]:` condition.
//!
//! 3. **Pure**: evaluation reads the provider and nothing else; repeated
//!    calls with the same inputs agree.
//!
//! # Example
//!
//! ```
//! use prefmatch::prelude::*;
//!
//! #[derive(Debug)]
//! struct Prefs;
//!
//! impl PrefProvider for Prefs {
//!     fn get_profile_pref(&self, path: &str) -> Option<PrefValue> {
//!         match path {
//!             "brave.rewards.enabled" => Some(PrefValue::Bool(true)),
//!             "brave.new_tab_page.views" => Some(PrefValue::Int(12)),
//!             _ => None,
//!         }
//!     }
//!
//!     fn get_local_state_pref(&self, _path: &str) -> Option<PrefValue> {
//!         None
//!     }
//!
//!     fn get_virtual_pref(&self, path: &str) -> Option<PrefValue> {
//!         VirtualPrefs::new().with_browser("1.71.118", "release").get(path)
//!     }
//! }
//!
//! let matchers: ConditionMatcherMap = [
//!     ("brave.rewards.enabled", "1"),
//!     ("brave.new_tab_page.views", "[R≥]:10"),
//!     ("[virtual]:browser|version", "1.71.*"),
//!     ("[!]:brave.new_tab_page.opted_out", ""),
//! ]
//! .into_iter()
//! .collect();
//!
//! assert!(match_conditions(&Prefs, &matchers));
//! ```

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod codec;
mod condition;
mod condition_matcher;
mod operator;
mod path;
mod pattern;
mod pref_provider;
mod pref_value;
mod trace;
mod virtual_prefs;

#[cfg(feature = "serde")]
mod config;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

// Core types
pub use condition::{Condition, MatcherFamily};
pub use condition_matcher::{
    has_not_operator, match_conditions, match_conditions_at, match_conditions_with_trace,
    strip_path_prefixes, ConditionMatcherMap, NOT_OPERATOR_PREFIX,
};
pub use path::{resolve, resolve_path, PathError, PATH_SEPARATOR};
pub use pref_provider::PrefProvider;
pub use pref_value::PrefValue;
pub use virtual_prefs::{
    is_virtual_pref_path, SkusOrder, VirtualPrefs, VIRTUAL_PREF_PATH_PREFIX,
};

// Matchers
pub use operator::{
    elapsed_days, is_epoch_operator, is_numerical_operator, match_epoch_operator,
    match_epoch_operator_at, match_numerical_operator, parse_time, Comparison,
    EPOCH_OPERATOR_TAG, NUMERICAL_OPERATOR_TAG,
};
pub use pattern::{match_pattern, match_regex};

// Codec
pub use codec::{decode_condition_matchers, encode_condition_matchers};

// Trace types
pub use trace::{ConditionTrace, MatchTrace};

// Config (feature-gated)
#[cfg(feature = "serde")]
pub use config::{ConditionMatcherConfig, ConfigError, PrefSnapshot};

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use prefmatch::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Core types
        match_conditions,
        match_conditions_at,
        match_conditions_with_trace,
        resolve,
        resolve_path,
        Condition,
        ConditionMatcherMap,
        // Trace types
        ConditionTrace,
        MatchTrace,
        MatcherFamily,
        PathError,
        // Traits
        PrefProvider,
        PrefValue,
        VirtualPrefs,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════════

/// Maximum number of `|`-delimited segments in a pref path.
///
/// Paths come from downloaded catalogs; longer paths fail to resolve.
pub const MAX_PATH_SEGMENTS: usize = 32;

/// Maximum length for wildcard patterns. Longer patterns never match.
pub const MAX_PATTERN_LENGTH: usize = 8192;

/// Maximum length for regex patterns. Longer patterns never match.
///
/// Regex compilation is expensive even with the linear-time Rust `regex` crate,
/// and conditions are compiled on every evaluation.
pub const MAX_REGEX_PATTERN_LENGTH: usize = 4096;
