//! Client-side copies of backend records and the guards that keep stale
//! responses out of them.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use crate::{budget::Budget, database_id::DatabaseId, transaction::Transaction};

/// A backend record that can be cached by its ID.
pub trait Record {
    /// The ID the backend assigned, or `None` if the record was never saved.
    fn record_id(&self) -> Option<DatabaseId>;
}

impl Record for Budget {
    fn record_id(&self) -> Option<DatabaseId> {
        self.id
    }
}

impl Record for Transaction {
    fn record_id(&self) -> Option<DatabaseId> {
        self.id
    }
}

/// The client's copy of a list of backend records.
///
/// The backend is the only source of truth. The cache is only ever changed
/// by the responses of successful requests: the last response applied wins,
/// and a record is only removed once its delete has been confirmed.
#[derive(Debug, Clone)]
pub struct RecordCache<T> {
    records: Vec<T>,
}

impl<T> Default for RecordCache<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<T: Record> RecordCache<T> {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cached records with a freshly fetched list.
    pub fn replace_all(&mut self, records: Vec<T>) {
        self.records = records;
    }

    /// Insert a record returned by a create or update, replacing the cached
    /// record with the same ID.
    ///
    /// Records without an ID have not been saved and are ignored.
    pub fn upsert(&mut self, record: T) {
        let Some(id) = record.record_id() else {
            tracing::warn!("Ignoring a record without an ID, it was not returned by the server.");
            return;
        };

        match self
            .records
            .iter_mut()
            .find(|cached| cached.record_id() == Some(id))
        {
            Some(cached) => *cached = record,
            None => self.records.push(record),
        }
    }

    /// Remove the record with `id` after the backend confirmed its deletion.
    ///
    /// Returns the removed record, or `None` if it was not cached.
    pub fn remove(&mut self, id: DatabaseId) -> Option<T> {
        let position = self
            .records
            .iter()
            .position(|cached| cached.record_id() == Some(id))?;

        Some(self.records.remove(position))
    }

    /// Get the cached record with `id`.
    pub fn get(&self, id: DatabaseId) -> Option<&T> {
        self.records
            .iter()
            .find(|cached| cached.record_id() == Some(id))
    }

    /// The cached records in the order they were fetched or added.
    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// The number of cached records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the cache holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// The lifetime of a view that issues requests.
///
/// A view keeps its scope for as long as it is shown and hands out
/// [ViewHandle]s to the requests it starts. Once the scope is unmounted, or
/// dropped, the handles refuse to apply responses, so a response that
/// arrives late never touches state that no longer exists.
#[derive(Debug)]
pub struct ViewScope {
    mounted: Arc<AtomicBool>,
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewScope {
    /// Create a mounted view scope.
    pub fn new() -> Self {
        Self {
            mounted: Arc::new(AtomicBool::new(true)),
        }
    }

    /// A handle for a request started by this view.
    pub fn handle(&self) -> ViewHandle {
        ViewHandle {
            mounted: self.mounted.clone(),
        }
    }

    /// Mark the view as gone.
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::Release);
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Lets an in-flight request check that its view still exists.
#[derive(Debug, Clone)]
pub struct ViewHandle {
    mounted: Arc<AtomicBool>,
}

impl ViewHandle {
    /// Whether the view that started the request is still shown.
    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    /// Apply `value` with `apply` if the view is still mounted.
    ///
    /// Returns `None` and drops `value` if the view is gone.
    pub fn apply<T, R>(&self, value: T, apply: impl FnOnce(T) -> R) -> Option<R> {
        if self.is_mounted() {
            Some(apply(value))
        } else {
            tracing::debug!("Discarding a response for a view that is no longer mounted.");
            None
        }
    }
}
