//! `Condition` — A parsed condition string
//!
//! Condition strings are a small DSL. Parsing happens once per condition and
//! yields one of the matcher families, so evaluation never re-derives the
//! family from raw prefixes.
//!
//! # Precedence
//!
//! Families are tried in [`MatcherFamily::PRECEDENCE`] order:
//!
//! 1. **Epoch** — `[T<op>]:<days>`
//! 2. **Numerical** — `[R<op>]:<real>`
//! 3. **Pattern** — any other string, as a wildcard pattern
//! 4. **Regex** — the same string as a partial regular expression, tried
//!    when the pattern does not match
//!
//! An operator tag claims the condition outright: `[T=]:soon` is a malformed
//! epoch condition that never matches, not a pattern.

use crate::operator::{
    epoch_matches, numerical_matches, parse_days, parse_real, split_operator, Comparison,
    EPOCH_OPERATOR_TAG, NUMERICAL_OPERATOR_TAG,
};
use crate::pattern::{match_pattern, match_regex};
use chrono::{DateTime, Utc};
use log::warn;
use std::fmt;

/// The matcher family a condition belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatcherFamily {
    /// Elapsed-days comparison against a timestamp.
    Epoch,
    /// Real-number comparison.
    Numerical,
    /// Wildcard pattern.
    Pattern,
    /// Partial regular expression.
    Regex,
}

impl MatcherFamily {
    /// The order in which families are tried.
    pub const PRECEDENCE: [MatcherFamily; 4] = [
        MatcherFamily::Epoch,
        MatcherFamily::Numerical,
        MatcherFamily::Pattern,
        MatcherFamily::Regex,
    ];

    /// Whether this family recognizes `condition`.
    ///
    /// Pattern and Regex recognize everything the operator families do not.
    #[must_use]
    pub fn recognizes(self, condition: &str) -> bool {
        match self {
            Self::Epoch => split_operator(condition, EPOCH_OPERATOR_TAG).is_some(),
            Self::Numerical => split_operator(condition, NUMERICAL_OPERATOR_TAG).is_some(),
            Self::Pattern | Self::Regex => {
                !Self::Epoch.recognizes(condition) && !Self::Numerical.recognizes(condition)
            }
        }
    }

    /// The first family in precedence order that recognizes `condition`.
    #[must_use]
    pub fn of(condition: &str) -> Self {
        if Self::Epoch.recognizes(condition) {
            Self::Epoch
        } else if Self::Numerical.recognizes(condition) {
            Self::Numerical
        } else {
            Self::Pattern
        }
    }

    /// Lower-case name, for traces and diagnostics.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Epoch => "epoch",
            Self::Numerical => "numerical",
            Self::Pattern => "pattern",
            Self::Regex => "regex",
        }
    }
}

impl fmt::Display for MatcherFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A parsed condition.
///
/// # Example
///
/// ```
/// use prefmatch::{Comparison, Condition, MatcherFamily};
///
/// let condition = Condition::parse("[R≥]:2.5");
/// assert_eq!(condition, Condition::Numeric { op: Comparison::Ge, value: 2.5 });
/// assert!(condition.matches("3"));
///
/// let condition = Condition::parse("[T=]:soon");
/// assert_eq!(condition.family(), MatcherFamily::Epoch);
/// assert!(!condition.matches("0"));
///
/// assert!(Condition::parse("1.*").matches("1.71.118"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Elapsed whole days since the value's timestamp, compared to `days`.
    Epoch {
        /// The comparison.
        op: Comparison,
        /// Day threshold.
        days: i64,
    },
    /// The value as a real number, compared to `value`.
    Numeric {
        /// The comparison.
        op: Comparison,
        /// Threshold.
        value: f64,
    },
    /// Wildcard pattern, with regex fallback.
    Pattern(String),
    /// Partial regular expression only, without the wildcard attempt.
    ///
    /// [`Condition::parse`] never produces this variant; unclaimed strings
    /// parse as [`Condition::Pattern`], which falls back to a regex. Construct
    /// it directly to skip wildcard matching.
    Regex(String),
    /// An operator tag with an unusable operand. Never matches.
    Malformed {
        /// The family that claimed the condition.
        family: MatcherFamily,
        /// The original condition string.
        condition: String,
    },
}

impl Condition {
    /// Parse a condition string. Never fails; see [`Condition::Malformed`].
    #[must_use]
    pub fn parse(condition: &str) -> Self {
        if let Some((op, operand)) = split_operator(condition, EPOCH_OPERATOR_TAG) {
            return match parse_days(operand) {
                Some(days) => Self::Epoch { op, days },
                None => Self::malformed(MatcherFamily::Epoch, condition),
            };
        }

        if let Some((op, operand)) = split_operator(condition, NUMERICAL_OPERATOR_TAG) {
            return match parse_real(operand) {
                Some(value) => Self::Numeric { op, value },
                None => Self::malformed(MatcherFamily::Numerical, condition),
            };
        }

        Self::Pattern(condition.to_string())
    }

    fn malformed(family: MatcherFamily, condition: &str) -> Self {
        warn!("malformed {family} operator condition \"{condition}\"");
        Self::Malformed {
            family,
            condition: condition.to_string(),
        }
    }

    /// The family this condition was claimed by.
    #[must_use]
    pub fn family(&self) -> MatcherFamily {
        match self {
            Self::Epoch { .. } => MatcherFamily::Epoch,
            Self::Numeric { .. } => MatcherFamily::Numerical,
            Self::Pattern(_) => MatcherFamily::Pattern,
            Self::Regex(_) => MatcherFamily::Regex,
            Self::Malformed { family, .. } => *family,
        }
    }

    /// Returns `true` for [`Condition::Malformed`].
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }

    /// Match a canonical value string, with epoch conditions relative to now.
    #[must_use]
    pub fn matches(&self, value: &str) -> bool {
        self.matches_at(value, Utc::now())
    }

    /// Match a canonical value string against a fixed `now`.
    #[must_use]
    pub fn matches_at(&self, value: &str, now: DateTime<Utc>) -> bool {
        self.matched_by(value, now).is_some()
    }

    /// The family whose matcher accepted `value`, if any.
    ///
    /// A `Pattern` condition reports `Regex` when only the regex fallback
    /// matched.
    #[must_use]
    pub fn matched_by(&self, value: &str, now: DateTime<Utc>) -> Option<MatcherFamily> {
        let matched = match self {
            Self::Epoch { op, days } => epoch_matches(value, *op, *days, now),
            Self::Numeric { op, value: rhs } => numerical_matches(value, *op, *rhs),
            Self::Pattern(pattern) => {
                if match_pattern(value, pattern) {
                    return Some(MatcherFamily::Pattern);
                }
                return match_regex(value, pattern).then_some(MatcherFamily::Regex);
            }
            Self::Regex(pattern) => match_regex(value, pattern),
            Self::Malformed { .. } => false,
        };
        matched.then_some(self.family())
    }

    /// Check that the condition can ever match.
    ///
    /// Malformed operators and regex-only conditions that fail to compile are
    /// reported. Pattern conditions always validate, since a pattern is
    /// matched even when its regex fallback does not compile.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Self::Malformed { family, condition } => {
                Err(format!("malformed {family} operator \"{condition}\""))
            }
            Self::Regex(pattern) => regex::Regex::new(pattern)
                .map(|_| ())
                .map_err(|e| format!("invalid regular expression \"{pattern}\": {e}")),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Epoch { op, days } => write!(f, "[{EPOCH_OPERATOR_TAG}{op}]:{days}"),
            Self::Numeric { op, value } => write!(f, "[{NUMERICAL_OPERATOR_TAG}{op}]:{value}"),
            Self::Pattern(s) | Self::Regex(s) => f.write_str(s),
            Self::Malformed { condition, .. } => f.write_str(condition),
        }
    }
}

impl From<&str> for Condition {
    fn from(condition: &str) -> Self {
        Self::parse(condition)
    }
}
