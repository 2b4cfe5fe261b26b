//! Condition matcher — the AND fold over `(path, condition)` pairs
//!
//! For each pair the path is resolved against a [`PrefProvider`], the value is
//! canonicalized, and the condition is matched against it. Every pair must
//! match for the set to match.
//!
//! # INV: absence and the NOT marker
//!
//! A path prefixed with `[!]:` is satisfied only by the path's absence:
//!
//! | Path resolves? | plain path | `[!]:` path |
//! |---|---|---|
//! | no (or not a scalar) | `false` | `true` |
//! | yes | condition result | `false` |
//!
//! NOT never negates a comparison.

use crate::condition::Condition;
use crate::operator::{split_operator, EPOCH_OPERATOR_TAG, NUMERICAL_OPERATOR_TAG};
use crate::path::resolve_path;
use crate::trace::{ConditionTrace, MatchTrace};
use crate::PrefProvider;
use chrono::{DateTime, Utc};
use log::debug;

/// Path prefix restricting a condition to the path's absence.
pub const NOT_OPERATOR_PREFIX: &str = "[!]:";

/// A multimap from prefixed pref path to condition string.
///
/// Duplicate paths are allowed; each pair is evaluated. Equality ignores
/// insertion order.
///
/// # Example
///
/// ```
/// use prefmatch::ConditionMatcherMap;
///
/// let matchers: ConditionMatcherMap = [
///     ("brave.rewards.enabled", "1"),
///     ("[!]:brave.stats.week_of_installation", ""),
/// ]
/// .into_iter()
/// .collect();
/// assert_eq!(matchers.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConditionMatcherMap {
    entries: Vec<(String, String)>,
}

impl ConditionMatcherMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pair. Existing pairs with the same path are kept.
    pub fn insert(&mut self, pref_path: impl Into<String>, condition: impl Into<String>) {
        self.entries.push((pref_path.into(), condition.into()));
    }

    /// Iterate pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, c)| (p.as_str(), c.as_str()))
    }

    /// Number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn sorted(&self) -> Vec<&(String, String)> {
        let mut entries: Vec<_> = self.entries.iter().collect();
        entries.sort();
        entries
    }
}

impl PartialEq for ConditionMatcherMap {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.sorted() == other.sorted()
    }
}

impl Eq for ConditionMatcherMap {}

impl<P: Into<String>, C: Into<String>> FromIterator<(P, C)> for ConditionMatcherMap {
    fn from_iter<I: IntoIterator<Item = (P, C)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<P: Into<String>, C: Into<String>> Extend<(P, C)> for ConditionMatcherMap {
    fn extend<I: IntoIterator<Item = (P, C)>>(&mut self, iter: I) {
        for (p, c) in iter {
            self.insert(p, c);
        }
    }
}

impl IntoIterator for ConditionMatcherMap {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Returns `true` if `pref_path` carries the `[!]:` marker.
#[inline]
#[must_use]
pub fn has_not_operator(pref_path: &str) -> bool {
    pref_path.starts_with(NOT_OPERATOR_PREFIX)
}

/// Strip the `[!]:` marker and any epoch/numerical operator tag from the
/// front of a path, in either order.
///
/// ```
/// use prefmatch::strip_path_prefixes;
///
/// assert_eq!(strip_path_prefixes("[!]:foo.bar"), "foo.bar");
/// assert_eq!(strip_path_prefixes("[T=]:[!]:foo"), "foo");
/// assert_eq!(strip_path_prefixes("[virtual]:browser|version"), "[virtual]:browser|version");
/// ```
#[must_use]
pub fn strip_path_prefixes(pref_path: &str) -> &str {
    let mut path = pref_path;
    loop {
        if let Some(rest) = path.strip_prefix(NOT_OPERATOR_PREFIX) {
            path = rest;
        } else if let Some((_, rest)) = split_operator(path, EPOCH_OPERATOR_TAG)
            .or_else(|| split_operator(path, NUMERICAL_OPERATOR_TAG))
        {
            path = rest;
        } else {
            return path;
        }
    }
}

/// Evaluate every pair against `provider`; `true` if all match.
///
/// An empty map matches. Malformed input is never an error, only a non-match.
///
/// # Example
///
/// ```
/// use prefmatch::{match_conditions, ConditionMatcherMap, PrefProvider, PrefValue};
///
/// #[derive(Debug)]
/// struct Prefs;
///
/// impl PrefProvider for Prefs {
///     fn get_profile_pref(&self, path: &str) -> Option<PrefValue> {
///         (path == "ntp.sponsored_images").then(|| PrefValue::Bool(true))
///     }
///     fn get_local_state_pref(&self, _: &str) -> Option<PrefValue> { None }
///     fn get_virtual_pref(&self, _: &str) -> Option<PrefValue> { None }
/// }
///
/// let matchers: ConditionMatcherMap = [
///     ("ntp.sponsored_images", "1"),
///     ("[!]:ntp.opted_out", "anything"),
/// ]
/// .into_iter()
/// .collect();
/// assert!(match_conditions(&Prefs, &matchers));
/// ```
#[must_use]
pub fn match_conditions<P: PrefProvider + ?Sized>(
    provider: &P,
    matchers: &ConditionMatcherMap,
) -> bool {
    match_conditions_at(provider, matchers, Utc::now())
}

/// [`match_conditions`] with epoch conditions evaluated against `now`.
#[must_use]
pub fn match_conditions_at<P: PrefProvider + ?Sized>(
    provider: &P,
    matchers: &ConditionMatcherMap,
    now: DateTime<Utc>,
) -> bool {
    matchers
        .iter()
        .all(|(pref_path, condition)| evaluate_pair(provider, pref_path, condition, now).matched)
}

/// Evaluate every pair without short-circuiting, recording each step.
///
/// `trace.matched` always equals [`match_conditions_at`] for the same input.
#[must_use]
pub fn match_conditions_with_trace<P: PrefProvider + ?Sized>(
    provider: &P,
    matchers: &ConditionMatcherMap,
    now: DateTime<Utc>,
) -> MatchTrace {
    let steps: Vec<ConditionTrace> = matchers
        .iter()
        .map(|(pref_path, condition)| evaluate_pair(provider, pref_path, condition, now))
        .collect();
    let matched = steps.iter().all(|step| step.matched);
    MatchTrace { matched, steps }
}

fn evaluate_pair<P: PrefProvider + ?Sized>(
    provider: &P,
    pref_path: &str,
    condition: &str,
    now: DateTime<Utc>,
) -> ConditionTrace {
    let has_not = has_not_operator(pref_path);
    let path = strip_path_prefixes(pref_path);

    let mut step = ConditionTrace {
        pref_path: pref_path.to_string(),
        condition: condition.to_string(),
        has_not,
        value: Err(String::new()),
        family: None,
        matched: has_not,
    };

    let value = match resolve_path(provider, path) {
        Ok(value) => value,
        Err(e) => {
            debug!("pref path \"{path}\" did not resolve: {e}");
            step.value = Err(e.to_string());
            return step;
        }
    };

    let Some(value) = value.to_match_string() else {
        debug!(
            "pref path \"{path}\" resolved to a {} which cannot be compared",
            value.type_name()
        );
        step.value = Err(format!("{} is not comparable", value.type_name()));
        return step;
    };

    let parsed = Condition::parse(condition);
    let matched_by = if has_not {
        None
    } else {
        parsed.matched_by(&value, now)
    };
    step.family = Some(matched_by.unwrap_or_else(|| parsed.family()));
    step.matched = matched_by.is_some();
    step.value = Ok(value);
    step
}
