use crate::shared::error::{MatchKind, SyncError};
use std::collections::{HashMap, HashSet};

/// Entities that are joined to each other by a name or title
pub trait Keyed {
    fn key(&self) -> &str;
}

/// Name-keyed lookup built once per run from a fresh snapshot.
///
/// Every candidate for a key is kept in snapshot order, so a duplicated name
/// is detected by [`NameIndex::resolve`] instead of silently picking one.
#[derive(Debug, Clone)]
pub struct NameIndex<T> {
    entries: HashMap<String, Vec<T>>,
    len: usize,
}

impl<T: Keyed> NameIndex<T> {
    pub fn new(items: impl IntoIterator<Item = T>) -> Self {
        let mut entries: HashMap<String, Vec<T>> = HashMap::new();
        let mut len = 0;
        for item in items {
            entries.entry(item.key().to_string()).or_default().push(item);
            len += 1;
        }
        Self { entries, len }
    }

    /// Unique candidate for `key`.
    ///
    /// # Errors
    /// Returns `SyncError::AmbiguousMatch` when more than one entity shares the key
    pub fn resolve(&self, key: &str, kind: MatchKind) -> Result<Option<&T>, SyncError> {
        match self.entries.get(key).map(Vec::as_slice) {
            None | Some([]) => Ok(None),
            Some([single]) => Ok(Some(single)),
            Some(items) => Err(SyncError::AmbiguousMatch {
                kind,
                key: key.to_string(),
                count: items.len(),
            }),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn names(&self) -> HashSet<String> {
        self.entries.keys().cloned().collect()
    }

    /// Keys that have more than one candidate, with their counts, sorted by key
    pub fn duplicates(&self) -> Vec<(&str, usize)> {
        let mut dups: Vec<(&str, usize)> = self
            .entries
            .iter()
            .filter(|(_, items)| items.len() > 1)
            .map(|(key, items)| (key.as_str(), items.len()))
            .collect();
        dups.sort();
        dups
    }

    /// Total number of indexed entities, duplicates included
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<T: Keyed> FromIterator<T> for NameIndex<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter)
    }
}
