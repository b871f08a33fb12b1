// crates/geomerge-core/src/common.rs

//! Shared helpers used by every pipeline.

/// Values that can be "present but empty".
///
/// Used by [`first_present`] to skip candidates the same way an empty
/// string, an empty list or a JSON `null` would be skipped.
pub trait Blank {
    fn is_blank(&self) -> bool;
}

impl Blank for str {
    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }
}

impl Blank for String {
    fn is_blank(&self) -> bool {
        self.as_str().is_blank()
    }
}

impl<T> Blank for [T] {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl<T> Blank for Vec<T> {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl<T: Blank + ?Sized> Blank for &T {
    fn is_blank(&self) -> bool {
        (**self).is_blank()
    }
}

/// Returns the first candidate that exists and is not blank.
///
/// Candidates are checked in iteration order, so the caller's slice of
/// field names doubles as the priority list:
///
/// ```
/// use geomerge_core::common::first_present;
/// use std::collections::BTreeMap;
///
/// let row = BTreeMap::from([("ISO_A3", "DEU"), ("id", "276")]);
/// let key = first_present(["iso_a3", "ISO_A3", "id"].iter().map(|k| row.get(k)));
/// assert_eq!(key, Some(&"DEU"));
/// ```
pub fn first_present<T, I>(candidates: I) -> Option<T>
where
    T: Blank,
    I: IntoIterator<Item = Option<T>>,
{
    candidates
        .into_iter()
        .flatten()
        .find(|candidate| !candidate.is_blank())
}

/// Identifier normalization: trim + uppercase.
pub fn normalize_identifier(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Counts reported by a merge pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub features: usize,
    pub matched: usize,
    pub without_identifier: usize,
}

impl MergeStats {
    pub fn unmatched(&self) -> usize {
        self.features - self.matched
    }
}
