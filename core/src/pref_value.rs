//! `PrefValue` — The tagged value tree that preferences resolve to
//!
//! Preference stores are dynamically typed: a pref can hold a scalar, a list,
//! or a nested dictionary. `PrefValue` models that tree explicitly so that the
//! resolver and the canonicalizer handle every shape with an exhaustive match.
//!
//! # Leaves vs. containers
//!
//! Only leaves (`Bool`, `Int`, `Double`, `String`) have a canonical string
//! form. `List` and `Map` exist so that a path can descend through them; a
//! path that stops on a container cannot be compared against a condition.

use std::collections::BTreeMap;

/// A preference value.
///
/// # Example
///
/// ```
/// use prefmatch::PrefValue;
///
/// assert_eq!(PrefValue::Bool(true).to_match_string(), Some("1".to_string()));
/// assert_eq!(PrefValue::Int(-7).to_match_string(), Some("-7".to_string()));
/// assert_eq!(PrefValue::Double(2.5).to_match_string(), Some("2.5".to_string()));
/// assert_eq!(PrefValue::List(vec![]).to_match_string(), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum PrefValue {
    /// Boolean leaf. Canonicalizes to `"0"` or `"1"`.
    Bool(bool),

    /// Integer leaf.
    Int(i64),

    /// Floating point leaf. Canonicalizes with `.` as the decimal separator.
    Double(f64),

    /// String leaf. Canonicalizes to itself.
    String(String),

    /// Ordered list, addressed by base-10 index segments.
    List(Vec<PrefValue>),

    /// String-keyed dictionary, addressed by literal key segments.
    Map(BTreeMap<String, PrefValue>),
}

impl PrefValue {
    /// Returns `true` if this is the `Bool` variant.
    #[inline]
    #[must_use]
    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Bool(_))
    }

    /// Returns `true` if this is the `Int` variant.
    #[inline]
    #[must_use]
    pub fn is_int(&self) -> bool {
        matches!(self, Self::Int(_))
    }

    /// Returns `true` if this is the `Double` variant.
    #[inline]
    #[must_use]
    pub fn is_double(&self) -> bool {
        matches!(self, Self::Double(_))
    }

    /// Returns `true` if this is the `String` variant.
    #[inline]
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(_))
    }

    /// Returns `true` if this is the `List` variant.
    #[inline]
    #[must_use]
    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// Returns `true` if this is the `Map` variant.
    #[inline]
    #[must_use]
    pub fn is_map(&self) -> bool {
        matches!(self, Self::Map(_))
    }

    /// Returns `true` for values that have a canonical string form.
    #[inline]
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        !matches!(self, Self::List(_) | Self::Map(_))
    }

    /// Try to get the value as a boolean.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get the value as an integer.
    #[inline]
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get the value as a double.
    #[inline]
    #[must_use]
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Self::Double(d) => Some(*d),
            _ => None,
        }
    }

    /// Try to get the value as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Try to get the value as a list slice.
    #[inline]
    #[must_use]
    pub fn as_list(&self) -> Option<&[PrefValue]> {
        match self {
            Self::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Try to get the value as a dictionary.
    #[inline]
    #[must_use]
    pub fn as_map(&self) -> Option<&BTreeMap<String, PrefValue>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Returns a string describing the type of this value.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Double(_) => "double",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }

    /// Canonical string form used for condition matching.
    ///
    /// Returns `None` for `List` and `Map`, which cannot be compared directly.
    /// Doubles use the shortest round-trip representation, so `1.0` renders as
    /// `"1"` and `0.25` as `"0.25"` regardless of locale.
    #[must_use]
    pub fn to_match_string(&self) -> Option<String> {
        match self {
            Self::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
            Self::Int(i) => Some(i.to_string()),
            Self::Double(d) => Some(d.to_string()),
            Self::String(s) => Some(s.clone()),
            Self::List(_) | Self::Map(_) => None,
        }
    }

    /// Convert a JSON document into a value tree.
    ///
    /// JSON `null` has no counterpart and yields `None`, as does any container
    /// that holds a `null`.
    #[cfg(feature = "serde")]
    #[must_use]
    pub fn from_json(value: serde_json::Value) -> Option<Self> {
        use serde_json::Value;

        match value {
            Value::Null => None,
            Value::Bool(b) => Some(Self::Bool(b)),
            Value::Number(n) => n
                .as_i64()
                .map(Self::Int)
                .or_else(|| n.as_f64().map(Self::Double)),
            Value::String(s) => Some(Self::String(s)),
            Value::Array(items) => items
                .into_iter()
                .map(Self::from_json)
                .collect::<Option<Vec<_>>>()
                .map(Self::List),
            Value::Object(map) => map
                .into_iter()
                .map(|(k, v)| Self::from_json(v).map(|v| (k, v)))
                .collect::<Option<BTreeMap<_, _>>>()
                .map(Self::Map),
        }
    }
}

impl From<bool> for PrefValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for PrefValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for PrefValue {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for PrefValue {
    fn from(d: f64) -> Self {
        Self::Double(d)
    }
}

impl From<String> for PrefValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for PrefValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<Vec<PrefValue>> for PrefValue {
    fn from(items: Vec<PrefValue>) -> Self {
        Self::List(items)
    }
}

impl From<BTreeMap<String, PrefValue>> for PrefValue {
    fn from(map: BTreeMap<String, PrefValue>) -> Self {
        Self::Map(map)
    }
}
