use keel_core::stmt::{Key, Row};

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Records fetched together. Lazy properties of any member are loaded for
/// every member with one query and cached here until each member asks.
#[derive(Debug)]
pub(crate) struct LoadedSet {
    keys: Vec<Key>,
    rows: Mutex<Vec<(Key, Row)>>,
}

impl LoadedSet {
    pub(crate) fn new(keys: Vec<Key>) -> Self {
        Self {
            keys,
            rows: Mutex::new(vec![]),
        }
    }

    pub(crate) fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Returns `fields` of the member at `key` if every one of them has been
    /// fetched.
    pub(crate) fn cached(&self, key: &Key, fields: &[String]) -> Option<Row> {
        let rows = self.lock();
        let (_, row) = rows.iter().find(|(member, _)| member == key)?;

        fields
            .iter()
            .map(|field| Some((field.clone(), row.get(field)?.clone())))
            .collect()
    }

    /// Merges fetched rows into the cache, matching them to members by
    /// `key_fields`.
    pub(crate) fn fill(&self, key_fields: &[String], rows: Vec<Row>) {
        let mut cache = self.lock();

        for row in rows {
            let key: Key = key_fields
                .iter()
                .map(|field| row.get(field).cloned().unwrap_or_default())
                .collect();

            match cache.iter_mut().find(|(member, _)| *member == key) {
                Some((_, existing)) => existing.extend(row),
                None => cache.push((key, row)),
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<(Key, Row)>> {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
