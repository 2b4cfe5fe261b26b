//! Evaluation trace types for debugging condition matching.
//!
//! Use [`match_conditions_with_trace()`](crate::match_conditions_with_trace)
//! to see why a set of conditions did or did not match: which paths resolved,
//! what they resolved to, and which matcher family decided each pair.
//!
//! # Example
//!
//! ```ignore
//! let trace = match_conditions_with_trace(&prefs, &matchers, Utc::now());
//! for step in trace.failed() {
//!     println!("{step}");
//! }
//! ```

use crate::MatcherFamily;
use std::fmt;

/// Trace of one `(path, condition)` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionTrace {
    /// The raw path, including any `[!]:` marker.
    pub pref_path: String,
    /// The raw condition string.
    pub condition: String,
    /// Whether the path carried the `[!]:` marker.
    pub has_not: bool,
    /// The canonical value, or why no comparable value was found.
    pub value: Result<String, String>,
    /// The family that matched, or that claimed the condition when nothing
    /// matched. `None` when the path did not resolve to a scalar.
    pub family: Option<MatcherFamily>,
    /// This pair's contribution to the overall result.
    pub matched: bool,
}

impl fmt::Display for ConditionTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = if self.matched { "match" } else { "no match" };
        write!(f, "{verdict}: \"{}\" ~ \"{}\"", self.pref_path, self.condition)?;
        match &self.value {
            Ok(value) => write!(f, " (value \"{value}\"")?,
            Err(reason) => write!(f, " (unresolved: {reason}")?,
        }
        if let Some(family) = self.family {
            write!(f, ", {family}")?;
        }
        write!(f, ")")
    }
}

/// Trace of a full condition set.
///
/// # INV: `matched` == `match_conditions_at()` result
///
/// Every pair is evaluated, even after one fails.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchTrace {
    /// The overall result.
    pub matched: bool,
    /// One step per pair, in map order.
    pub steps: Vec<ConditionTrace>,
}

impl MatchTrace {
    /// Steps that did not match.
    pub fn failed(&self) -> impl Iterator<Item = &ConditionTrace> {
        self.steps.iter().filter(|step| !step.matched)
    }
}
