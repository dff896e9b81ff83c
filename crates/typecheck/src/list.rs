//! Validator for the `List` type tag.
//!
//! The grammar is a restricted JSON look-alike:
//!
//! ```text
//! [1, true, "text", {"key"= [1, 2], "other"= {"nested"= "12-01-2022"}}]
//! ```
//!
//! Objects separate keys and values with `=`. String-like leaves (`String`,
//! `Date`, `Email`, `UUID`, `Auth-Token`) must be double-quoted; `Int` and
//! `Boolean` leaves must be bare.
//!
//! Traversal is breadth-first over an explicit queue of borrowed slices, so
//! stack usage does not depend on how deeply the input nests.

use std::collections::VecDeque;

use crate::primitives;
use crate::registry::TypeTag;

const QUOTE: char = '"';
const ESCAPE: char = '\\';
const ELEMENT_DELIMITER: char = ',';
const PAIR_DELIMITER: char = '=';

/// Validate a bracketed list literal.
pub fn validate_list(input: &str) -> bool {
    let input = input.trim();
    if input.len() < 2 || !input.starts_with('[') || !input.ends_with(']') {
        return false;
    }

    let mut queue: VecDeque<&str> = VecDeque::new();
    queue.push_back(input);

    while let Some(item) = queue.pop_front() {
        let current = item.trim();
        if current.is_empty() {
            return false;
        }

        if let Some(rest) = current.strip_prefix('[') {
            let Some(content) = rest.strip_suffix(']') else {
                return false;
            };
            let content = content.trim();
            if content.is_empty() {
                continue;
            }
            let Some(elements) = smart_split(content, ELEMENT_DELIMITER) else {
                return false;
            };
            queue.extend(elements);
        } else if let Some(rest) = current.strip_prefix('{') {
            let Some(content) = rest.strip_suffix('}') else {
                return false;
            };
            let content = content.trim();
            if content.is_empty() {
                continue;
            }
            let Some(pairs) = smart_split(content, ELEMENT_DELIMITER) else {
                return false;
            };
            for pair in pairs {
                match smart_split(pair, PAIR_DELIMITER).as_deref() {
                    // Keys are not type-checked.
                    Some(&[_key, value]) => queue.push_back(value),
                    _ => return false,
                }
            }
        } else if !is_leaf_in_context(current) {
            return false;
        }
    }

    true
}

/// Split `s` on `delimiter` wherever it appears outside quotes and outside
/// nested `[...]` / `{...}`. Segments are trimmed.
///
/// Returns `None` when brackets are unbalanced or a quote is left open.
/// Inside quotes a backslash escapes the following character.
pub(crate) fn smart_split(s: &str, delimiter: char) -> Option<Vec<&str>> {
    let mut segments = Vec::new();
    let mut depth: i32 = 0;
    let mut in_quotes = false;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in s.char_indices() {
        if in_quotes {
            if escaped {
                escaped = false;
            } else if c == ESCAPE {
                escaped = true;
            } else if c == QUOTE {
                in_quotes = false;
            }
            continue;
        }

        match c {
            QUOTE => in_quotes = true,
            '[' | '{' => depth += 1,
            ']' | '}' => depth -= 1,
            _ if c == delimiter && depth == 0 => {
                segments.push(s[start..i].trim());
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }

    if depth != 0 || in_quotes {
        return None;
    }
    segments.push(s[start..].trim());
    Some(segments)
}

/// Leaves inside a list or object follow the quoting families: quoted text
/// must satisfy one of the quoted tags, bare text must be `Int` or `Boolean`.
fn is_leaf_in_context(item: &str) -> bool {
    if item.len() >= 2 && item.starts_with(QUOTE) && item.ends_with(QUOTE) {
        let inner = &item[1..item.len() - 1];
        return TypeTag::QUOTED.iter().any(|tag| tag.is_valid(inner));
    }
    primitives::is_int(item) || primitives::is_boolean(item)
}
