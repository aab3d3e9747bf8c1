use serde::{Deserialize, Serialize};

use super::Record;

/// Ordered, page-local copy of a fetched collection.
///
/// Order is fetch/insertion order. Nothing is ever re-sorted here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot<R> {
    records: Vec<R>,
}

impl<R> Default for Snapshot<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<R> From<Vec<R>> for Snapshot<R> {
    fn from(records: Vec<R>) -> Self {
        Self { records }
    }
}

impl<R: Record> Snapshot<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace everything, as after a refetch.
    pub fn replace(&mut self, records: Vec<R>) {
        self.records = records;
    }

    /// Append a freshly created record.
    pub fn on_created(&mut self, record: R) {
        self.records.push(record);
    }

    /// Replace the entry with the same id in place.
    ///
    /// Returns false (and inserts nothing) when the record is not loaded.
    pub fn on_updated(&mut self, record: R) -> bool {
        match self.records.iter_mut().find(|r| r.id() == record.id()) {
            Some(slot) => {
                *slot = record;
                true
            }
            None => false,
        }
    }

    /// Remove the entry with `id`, keeping the order of the rest.
    pub fn on_deleted(&mut self, id: &str) -> Option<R> {
        let index = self.records.iter().position(|r| r.id() == id)?;
        Some(self.records.remove(index))
    }

    pub fn get(&self, id: &str) -> Option<&R> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.id()).collect()
    }
}

impl<R> Snapshot<R> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[R] {
        &self.records
    }

    pub fn into_vec(self) -> Vec<R> {
        self.records
    }
}

impl<'a, R> IntoIterator for &'a Snapshot<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
