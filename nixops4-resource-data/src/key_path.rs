//! Flat key-paths.
//!
//! Nested attribute values are stored as flat string maps. A key-path is a
//! `.`-separated sequence of segments, starting with a top-level attribute
//! name:
//!
//! ```text
//! ports.#           number of elements in the list `ports`
//! ports.0           first element of `ports`
//! ingress.1.from    field `from` of the second `ingress` element
//! tags.env          value for key `env` in the map `tags`
//! ```

use std::{collections::BTreeMap, ops::Bound};

pub const SEPARATOR: char = '.';

/// The segment holding the element count of a list.
pub const COUNT: &str = "#";

/// Stands in for "any element" in schema error messages.
pub(crate) const ELEM_PLACEHOLDER: &str = "N";

/// Append a segment to a key-path. An empty prefix is the root.
pub fn join(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_owned()
    } else {
        format!("{}{}{}", prefix, SEPARATOR, segment)
    }
}

/// Whether `key` is `root` itself or lies underneath it.
pub fn is_within(key: &str, root: &str) -> bool {
    if root.is_empty() {
        return true;
    }
    match key.strip_prefix(root) {
        Some(rest) => rest.is_empty() || rest.starts_with(SEPARATOR),
        None => false,
    }
}

/// The part of `key` below `prefix`, if `key` is strictly underneath it.
pub fn strip_parent<'a>(key: &'a str, prefix: &str) -> Option<&'a str> {
    if prefix.is_empty() {
        return Some(key).filter(|k| !k.is_empty());
    }
    key.strip_prefix(prefix)?
        .strip_prefix(SEPARATOR)
        .filter(|rest| !rest.is_empty())
}

/// Parse a list index segment. Only plain decimal numbers are indices.
pub fn parse_index(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

/// Whether `key` can be stored as a map key: every segment of it must be
/// non-empty and none may be the count marker.
pub fn is_valid_map_key(key: &str) -> bool {
    key.split(SEPARATOR).all(|s| !s.is_empty() && s != COUNT)
}

/// The keys of `map` that lie strictly underneath `prefix`.
pub(crate) fn keys_under<'a, V>(
    map: &'a BTreeMap<String, V>,
    prefix: &str,
) -> impl Iterator<Item = &'a str> + 'a {
    let start = if prefix.is_empty() {
        String::new()
    } else {
        format!("{}{}", prefix, SEPARATOR)
    };
    map.range::<str, _>((Bound::Included(start.as_str()), Bound::Unbounded))
        .map(|(k, _)| k.as_str())
        .take_while(move |k| k.starts_with(start.as_str()))
}
