//! Path resolution — walking a `|`-delimited path through the value tree
//!
//! A path is split on `|` only. The root segment names a preference (which may
//! itself be dotted, e.g. `brave.new_tab_page.show_clock`); every later
//! segment is either a literal dictionary key or a list index. Keys are never
//! re-split on `.`, because dictionary keys legitimately contain dots
//! (`search.brave.com`).

use crate::virtual_prefs::is_virtual_pref_path;
use crate::{PrefProvider, PrefValue, MAX_PATH_SEGMENTS};
use std::fmt;

/// Segment delimiter.
pub const PATH_SEPARATOR: char = '|';

/// Why a path failed to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The path is empty.
    Empty,
    /// The first or last segment is empty (leading or trailing delimiter).
    EmptySegment {
        /// Zero-based position of the empty segment.
        index: usize,
    },
    /// The path has more segments than [`MAX_PATH_SEGMENTS`].
    TooManySegments {
        /// Actual segment count.
        count: usize,
        /// Maximum allowed.
        max: usize,
    },
    /// No namespace has the root preference.
    UnknownRoot {
        /// The root segment.
        key: String,
    },
    /// A dictionary does not contain the key.
    KeyNotFound {
        /// The missing key.
        key: String,
    },
    /// A list segment is not a base-10, non-negative integer.
    InvalidIndex {
        /// The offending segment.
        segment: String,
    },
    /// A list index is past the end of the list.
    IndexOutOfRange {
        /// The parsed index.
        index: usize,
        /// Length of the list.
        len: usize,
    },
    /// The path continues below a scalar value.
    PastLeaf {
        /// The segment that could not be applied.
        segment: String,
    },
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "path is empty"),
            Self::EmptySegment { index } => write!(f, "segment {index} is empty"),
            Self::TooManySegments { count, max } => {
                write!(f, "path has {count} segments, but maximum allowed is {max}")
            }
            Self::UnknownRoot { key } => write!(f, "no preference named \"{key}\""),
            Self::KeyNotFound { key } => write!(f, "dictionary has no key \"{key}\""),
            Self::InvalidIndex { segment } => {
                write!(f, "\"{segment}\" is not a valid list index")
            }
            Self::IndexOutOfRange { index, len } => {
                write!(f, "list index {index} is out of range for length {len}")
            }
            Self::PastLeaf { segment } => {
                write!(f, "cannot descend into \"{segment}\" below a scalar value")
            }
        }
    }
}

impl std::error::Error for PathError {}

/// Resolve `path` against `provider`, reporting why resolution failed.
///
/// The returned value may be a `List` or `Map` when the path stops on a
/// container; callers that need a comparable value should canonicalize with
/// [`PrefValue::to_match_string`].
///
/// # Errors
///
/// Returns a [`PathError`] describing the first segment that could not be
/// resolved.
///
/// # Example
///
/// ```
/// # use prefmatch::{PrefProvider, PrefValue, resolve_path, PathError};
/// # use std::collections::BTreeMap;
/// # #[derive(Debug)]
/// # struct P;
/// # impl PrefProvider for P {
/// #     fn get_profile_pref(&self, path: &str) -> Option<PrefValue> {
/// #         (path == "list").then(|| PrefValue::List(vec!["a".into(), "b".into()]))
/// #     }
/// #     fn get_local_state_pref(&self, _: &str) -> Option<PrefValue> { None }
/// #     fn get_virtual_pref(&self, _: &str) -> Option<PrefValue> { None }
/// # }
/// assert_eq!(resolve_path(&P, "list|1"), Ok(PrefValue::String("b".into())));
/// assert_eq!(
///     resolve_path(&P, "list|2"),
///     Err(PathError::IndexOutOfRange { index: 2, len: 2 })
/// );
/// ```
pub fn resolve_path<P: PrefProvider + ?Sized>(
    provider: &P,
    path: &str,
) -> Result<PrefValue, PathError> {
    if path.is_empty() {
        return Err(PathError::Empty);
    }

    let segments: Vec<&str> = path.split(PATH_SEPARATOR).collect();
    if segments.len() > MAX_PATH_SEGMENTS {
        return Err(PathError::TooManySegments {
            count: segments.len(),
            max: MAX_PATH_SEGMENTS,
        });
    }
    // Interior segments may be empty: `""` is a legal dictionary key.
    if segments[0].is_empty() {
        return Err(PathError::EmptySegment { index: 0 });
    }
    let last = segments.len() - 1;
    if segments[last].is_empty() {
        return Err(PathError::EmptySegment { index: last });
    }

    let (root, rest) = segments.split_first().ok_or(PathError::Empty)?;
    let mut value = resolve_root(provider, root)?;

    for segment in rest {
        value = descend(value, segment)?;
    }

    Ok(value)
}

/// Resolve `path` against `provider`, discarding the failure reason.
#[must_use]
pub fn resolve<P: PrefProvider + ?Sized>(provider: &P, path: &str) -> Option<PrefValue> {
    resolve_path(provider, path).ok()
}

fn resolve_root<P: PrefProvider + ?Sized>(provider: &P, key: &str) -> Result<PrefValue, PathError> {
    let value = if is_virtual_pref_path(key) {
        provider.get_virtual_pref(key)
    } else {
        provider
            .get_profile_pref(key)
            .or_else(|| provider.get_local_state_pref(key))
    };

    value.ok_or_else(|| PathError::UnknownRoot {
        key: key.to_string(),
    })
}

fn descend(value: PrefValue, segment: &str) -> Result<PrefValue, PathError> {
    match value {
        PrefValue::Map(mut map) => map.remove(segment).ok_or_else(|| PathError::KeyNotFound {
            key: segment.to_string(),
        }),
        PrefValue::List(items) => {
            let index = parse_index(segment)?;
            let len = items.len();
            items
                .into_iter()
                .nth(index)
                .ok_or(PathError::IndexOutOfRange { index, len })
        }
        PrefValue::Bool(_) | PrefValue::Int(_) | PrefValue::Double(_) | PrefValue::String(_) => {
            Err(PathError::PastLeaf {
                segment: segment.to_string(),
            })
        }
    }
}

// Digits only: `usize::from_str` would also accept a leading `+`.
fn parse_index(segment: &str) -> Result<usize, PathError> {
    let invalid = || PathError::InvalidIndex {
        segment: segment.to_string(),
    };

    if !segment.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    segment.parse().map_err(|_| invalid())
}
