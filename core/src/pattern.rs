//! Pattern and regex matching
//!
//! Conditions without an operator tag are matched as a wildcard pattern
//! first and as a partial regular expression second.
//!
//! Wildcards:
//!
//! - `*` matches zero or more characters
//! - `?` matches zero or one character
//! - `\` makes the next character literal (`\*`, `\?`, `\\`)

use crate::{MAX_PATTERN_LENGTH, MAX_REGEX_PATTERN_LENGTH};
use log::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Literal(char),
    AnyRun,
    AnyOptional,
}

fn tokenize(pattern: &str) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        tokens.push(match c {
            '\\' => Token::Literal(chars.next().unwrap_or('\\')),
            '*' => Token::AnyRun,
            '?' => Token::AnyOptional,
            other => Token::Literal(other),
        });
    }
    tokens
}

/// Glob-match `value` against `pattern`.
///
/// Runs in `O(pattern × value)` time with no backtracking, so hostile
/// patterns like `*a*a*a*a*b` stay cheap. An empty pattern only matches an
/// empty value.
///
/// # Example
///
/// ```
/// use prefmatch::match_pattern;
///
/// assert!(match_pattern("*.bar.?", r"\*.bar.\?"));
/// assert!(match_pattern("foo.baz.bar", "foo?baz.*"));
/// assert!(!match_pattern("foo.baz.bar", "bar.*.foo"));
/// ```
#[must_use]
pub fn match_pattern(value: &str, pattern: &str) -> bool {
    if pattern.len() > MAX_PATTERN_LENGTH {
        debug!("pattern of length {} exceeds limit", pattern.len());
        return false;
    }

    let value: Vec<char> = value.chars().collect();

    // reachable[i]: the tokens consumed so far can match value[..i].
    let mut reachable = vec![false; value.len() + 1];
    reachable[0] = true;

    for token in tokenize(pattern) {
        let mut next = vec![false; value.len() + 1];
        match token {
            Token::Literal(expected) => {
                for (i, c) in value.iter().enumerate() {
                    next[i + 1] = reachable[i] && *c == expected;
                }
            }
            Token::AnyRun => {
                let mut seen = false;
                for (slot, was) in next.iter_mut().zip(&reachable) {
                    seen |= *was;
                    *slot = seen;
                }
            }
            Token::AnyOptional => {
                next[0] = reachable[0];
                for i in 1..=value.len() {
                    next[i] = reachable[i] || reachable[i - 1];
                }
            }
        }
        if !next.contains(&true) {
            return false;
        }
        reachable = next;
    }

    reachable[value.len()]
}

/// Partial-match `value` against the regular expression `pattern`.
///
/// The expression is unanchored: `"bar"` matches `"foobarbaz"`. Add `^`/`$`
/// for a full match. Invalid or oversized expressions never match.
///
/// # Example
///
/// ```
/// use prefmatch::match_regex;
///
/// assert!(match_regex("foobarbaz", "bar"));
/// assert!(match_regex("version 1.71", r"\d+\.\d+"));
/// assert!(!match_regex("foobarbaz", "^bar"));
/// assert!(!match_regex("anything", "(unclosed"));
/// ```
#[must_use]
pub fn match_regex(value: &str, pattern: &str) -> bool {
    if pattern.len() > MAX_REGEX_PATTERN_LENGTH {
        debug!("regex of length {} exceeds limit", pattern.len());
        return false;
    }

    match regex::Regex::new(pattern) {
        Ok(re) => re.is_match(value),
        Err(e) => {
            warn!("invalid regular expression \"{pattern}\": {e}");
            false
        }
    }
}
