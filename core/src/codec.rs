//! Compact string form of a [`ConditionMatcherMap`], for persisting matchers
//! alongside a creative in a single text column.
//!
//! Each pair is written as `base64(path):base64(condition)` and pairs are
//! joined with `;`. Base64 keeps `|`, `:` and `;` inside paths and conditions
//! from colliding with the delimiters.

use crate::ConditionMatcherMap;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use log::warn;

const PAIR_SEPARATOR: char = ';';
const FIELD_SEPARATOR: char = ':';

/// Encode `matchers` to the compact string form.
///
/// ```
/// use prefmatch::{decode_condition_matchers, encode_condition_matchers, ConditionMatcherMap};
///
/// let matchers: ConditionMatcherMap =
///     [("foo.bar|baz", "[T=]:7"), ("qux.quux", "[R<]:3")].into_iter().collect();
/// let encoded = encode_condition_matchers(&matchers);
/// assert_eq!(decode_condition_matchers(&encoded), matchers);
/// ```
#[must_use]
pub fn encode_condition_matchers(matchers: &ConditionMatcherMap) -> String {
    matchers
        .iter()
        .map(|(pref_path, condition)| {
            format!(
                "{}{FIELD_SEPARATOR}{}",
                STANDARD.encode(pref_path),
                STANDARD.encode(condition)
            )
        })
        .collect::<Vec<_>>()
        .join(&PAIR_SEPARATOR.to_string())
}

/// Decode the compact string form.
///
/// Returns an empty map if any pair is malformed.
#[must_use]
pub fn decode_condition_matchers(encoded: &str) -> ConditionMatcherMap {
    if encoded.is_empty() {
        return ConditionMatcherMap::new();
    }

    match encoded
        .split(PAIR_SEPARATOR)
        .map(decode_pair)
        .collect::<Option<ConditionMatcherMap>>()
    {
        Some(matchers) => matchers,
        None => {
            warn!("discarding malformed condition matchers \"{encoded}\"");
            ConditionMatcherMap::new()
        }
    }
}

fn decode_pair(pair: &str) -> Option<(String, String)> {
    let (pref_path, condition) = pair.split_once(FIELD_SEPARATOR)?;
    Some((decode_field(pref_path)?, decode_field(condition)?))
}

fn decode_field(field: &str) -> Option<String> {
    let bytes = STANDARD.decode(field).ok()?;
    String::from_utf8(bytes).ok()
}
