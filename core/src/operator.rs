//! Operator conditions — epoch and numerical comparisons
//!
//! An operator condition is a bracket tag followed by an operand:
//!
//! ```text
//! [T≥]:7      elapsed days since the value's timestamp is at least 7
//! [R<]:2.5    the value, read as a real number, is below 2.5
//! ```
//!
//! The first character of the tag selects the family (`T` epoch, `R`
//! numerical); the second selects the [`Comparison`]. Once a tag is
//! recognized the condition belongs to that family even if its operand is
//! malformed, so it never falls through to pattern or regex matching.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use log::{debug, warn};
use std::fmt;

/// Seconds between 1601-01-01 and 1970-01-01, both UTC.
const WINDOWS_EPOCH_OFFSET_SECONDS: f64 = 11_644_473_600.0;

const MICROSECONDS_PER_SECOND: f64 = 1_000_000.0;

const MILLISECONDS_PER_DAY: i64 = 86_400_000;

/// Family tag character for epoch operators.
pub const EPOCH_OPERATOR_TAG: char = 'T';

/// Family tag character for numerical operators.
pub const NUMERICAL_OPERATOR_TAG: char = 'R';

/// A comparison selected by the second character of an operator tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    /// `=`
    Eq,
    /// `≠`
    Ne,
    /// `>`
    Gt,
    /// `≥`
    Ge,
    /// `<`
    Lt,
    /// `≤`
    Le,
}

impl Comparison {
    /// Every comparison, in tag order.
    pub const ALL: [Comparison; 6] = [
        Comparison::Eq,
        Comparison::Ne,
        Comparison::Gt,
        Comparison::Ge,
        Comparison::Lt,
        Comparison::Le,
    ];

    /// The symbol used in operator tags.
    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            Self::Eq => '=',
            Self::Ne => '≠',
            Self::Gt => '>',
            Self::Ge => '≥',
            Self::Lt => '<',
            Self::Le => '≤',
        }
    }

    /// Parse a tag symbol.
    #[must_use]
    pub fn from_symbol(symbol: char) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.symbol() == symbol)
    }

    /// Compare whole day counts.
    #[must_use]
    pub fn compare_days(self, lhs: i64, rhs: i64) -> bool {
        match self {
            Self::Eq => lhs == rhs,
            Self::Ne => lhs != rhs,
            Self::Gt => lhs > rhs,
            Self::Ge => lhs >= rhs,
            Self::Lt => lhs < rhs,
            Self::Le => lhs <= rhs,
        }
    }

    /// Compare reals. Equality tolerates a difference of up to `f64::EPSILON`.
    #[must_use]
    pub fn compare_reals(self, lhs: f64, rhs: f64) -> bool {
        let equal = (lhs - rhs).abs() <= f64::EPSILON;
        match self {
            Self::Eq => equal,
            Self::Ne => !equal,
            Self::Gt => lhs > rhs,
            Self::Ge => lhs >= rhs,
            Self::Lt => lhs < rhs,
            Self::Le => lhs <= rhs,
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Split `[<family><symbol>]:<operand>` into its comparison and operand.
///
/// Returns `None` if the condition does not carry a tag for `family`.
pub(crate) fn split_operator(condition: &str, family: char) -> Option<(Comparison, &str)> {
    let rest = condition.strip_prefix('[')?.strip_prefix(family)?;
    let mut chars = rest.chars();
    let comparison = Comparison::from_symbol(chars.next()?)?;
    let operand = chars.as_str().strip_prefix("]:")?;
    Some((comparison, operand))
}

/// Returns `true` if `condition` carries an epoch tag (`[T=]:`, `[T≥]:`, ...).
#[must_use]
pub fn is_epoch_operator(condition: &str) -> bool {
    split_operator(condition, EPOCH_OPERATOR_TAG).is_some()
}

/// Returns `true` if `condition` carries a numerical tag (`[R=]:`, `[R<]:`, ...).
#[must_use]
pub fn is_numerical_operator(condition: &str) -> bool {
    split_operator(condition, NUMERICAL_OPERATOR_TAG).is_some()
}

/// Parse an epoch operand: a non-negative base-10 day count.
pub(crate) fn parse_days(operand: &str) -> Option<i64> {
    if operand.is_empty() || !operand.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    operand.parse().ok()
}

/// Parse a finite real number; `inf` and `NaN` are rejected.
pub(crate) fn parse_real(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Interpret a preference value as a point in time.
///
/// - Numbers in `[0, u32::MAX]` are seconds since the Unix epoch.
/// - Other finite numbers are microseconds since 1601-01-01 UTC, the
///   representation the host preference store uses for `base::Time`.
/// - Anything else is parsed as an RFC 3339 or RFC 2822 date-time, or as a
///   UTC `YYYY-MM-DD HH:MM:SS` / `YYYY-MM-DD`.
///
/// # Example
///
/// ```
/// use prefmatch::parse_time;
///
/// let unix = parse_time("1700000000").unwrap();
/// let windows = parse_time("13344473600000000").unwrap();
/// assert_eq!(unix, windows);
///
/// assert!(parse_time("2023-11-14T22:13:20Z").is_some());
/// assert!(parse_time("yesterday").is_none());
/// ```
#[must_use]
pub fn parse_time(value: &str) -> Option<DateTime<Utc>> {
    if let Some(timestamp) = parse_real(value) {
        let unix_seconds = if (0.0..=f64::from(u32::MAX)).contains(&timestamp) {
            timestamp
        } else {
            timestamp / MICROSECONDS_PER_SECOND - WINDOWS_EPOCH_OFFSET_SECONDS
        };
        return from_unix_seconds(unix_seconds);
    }

    if let Ok(time) = DateTime::parse_from_rfc3339(value) {
        return Some(time.with_timezone(&Utc));
    }
    if let Ok(time) = DateTime::parse_from_rfc2822(value) {
        return Some(time.with_timezone(&Utc));
    }
    if let Ok(time) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(time.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|time| time.and_utc())
}

#[allow(clippy::cast_possible_truncation)] // range-checked against i64 bounds below
fn from_unix_seconds(seconds: f64) -> Option<DateTime<Utc>> {
    let millis = (seconds * 1_000.0).floor();
    if !(i64::MIN as f64..=i64::MAX as f64).contains(&millis) {
        return None;
    }
    DateTime::from_timestamp_millis(millis as i64)
}

/// Whole days elapsed from `then` to `now`, rounded toward negative infinity.
#[must_use]
pub fn elapsed_days(then: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let delta: TimeDelta = now - then;
    delta.num_milliseconds().div_euclid(MILLISECONDS_PER_DAY)
}

/// Match `value` against an epoch condition such as `[T≥]:3`, relative to now.
#[must_use]
pub fn match_epoch_operator(value: &str, condition: &str) -> bool {
    match_epoch_operator_at(value, condition, Utc::now())
}

/// Match `value` against an epoch condition relative to a fixed `now`.
///
/// # Example
///
/// ```
/// use chrono::{TimeDelta, Utc};
/// use prefmatch::match_epoch_operator_at;
///
/// let now = Utc::now();
/// let three_days_ago = (now - TimeDelta::days(3)).timestamp().to_string();
///
/// assert!(match_epoch_operator_at(&three_days_ago, "[T=]:3", now));
/// assert!(!match_epoch_operator_at(&three_days_ago, "[T>]:3", now));
/// assert!(match_epoch_operator_at(&three_days_ago, "[T≥]:3", now));
/// ```
#[must_use]
pub fn match_epoch_operator_at(value: &str, condition: &str, now: DateTime<Utc>) -> bool {
    let Some((comparison, operand)) = split_operator(condition, EPOCH_OPERATOR_TAG) else {
        return false;
    };
    let Some(days) = parse_days(operand) else {
        warn!("malformed epoch operator condition \"{condition}\"");
        return false;
    };
    epoch_matches(value, comparison, days, now)
}

pub(crate) fn epoch_matches(
    value: &str,
    comparison: Comparison,
    days: i64,
    now: DateTime<Utc>,
) -> bool {
    let Some(time) = parse_time(value) else {
        debug!("\"{value}\" is not a timestamp");
        return false;
    };
    comparison.compare_days(elapsed_days(time, now), days)
}

/// Match `value` against a numerical condition such as `[R>]:3.5`.
///
/// # Example
///
/// ```
/// use prefmatch::match_numerical_operator;
///
/// assert!(match_numerical_operator("1", "[R=]:1.0"));
/// assert!(match_numerical_operator("1.0", "[R=]:1"));
/// assert!(match_numerical_operator("4", "[R>]:3.5"));
/// assert!(!match_numerical_operator("four", "[R>]:3.5"));
/// ```
#[must_use]
pub fn match_numerical_operator(value: &str, condition: &str) -> bool {
    let Some((comparison, operand)) = split_operator(condition, NUMERICAL_OPERATOR_TAG) else {
        return false;
    };
    let Some(rhs) = parse_real(operand) else {
        warn!("malformed numerical operator condition \"{condition}\"");
        return false;
    };
    numerical_matches(value, comparison, rhs)
}

pub(crate) fn numerical_matches(value: &str, comparison: Comparison, rhs: f64) -> bool {
    let Some(lhs) = parse_real(value) else {
        debug!("\"{value}\" is not a number");
        return false;
    };
    comparison.compare_reals(lhs, rhs)
}
