/**
 * In-Memory Collections
 *
 * One `MemCollection` per entity kind backs the in-memory store
 * implementations. Records are kept newest-insert-first, which makes plain
 * iteration order equivalent to `ORDER BY created_at DESC` on the
 * persistent side.
 *
 * Handlers run on parallel threads, so each collection is mutex-guarded to
 * keep every operation atomic. No operation is async; the lock is never
 * held across an await point.
 */

use std::sync::{Arc, Mutex};

/// A mutex-guarded, newest-first collection of records.
#[derive(Clone)]
pub struct MemCollection<T> {
    items: Arc<Mutex<Vec<T>>>,
}

impl<T: Clone> MemCollection<T> {
    pub fn new() -> Self {
        Self {
            items: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_items(items: Vec<T>) -> Self {
        Self {
            items: Arc::new(Mutex::new(items)),
        }
    }

    /// Insert at the front, preserving newest-first order.
    pub fn insert_first(&self, item: T) {
        self.items.lock().unwrap().insert(0, item);
    }

    /// Snapshot of all records in insertion (newest-first) order.
    pub fn all(&self) -> Vec<T> {
        self.items.lock().unwrap().clone()
    }

    /// First record matching the predicate.
    pub fn find<F: Fn(&T) -> bool>(&self, pred: F) -> Option<T> {
        self.items.lock().unwrap().iter().find(|t| pred(t)).cloned()
    }

    /// Apply `mutate` to the first record matching `pred`, returning the
    /// updated record, or `None` if nothing matched.
    pub fn update_first<P, M>(&self, pred: P, mutate: M) -> Option<T>
    where
        P: Fn(&T) -> bool,
        M: FnOnce(&mut T),
    {
        let mut items = self.items.lock().unwrap();
        let item = items.iter_mut().find(|t| pred(t))?;
        mutate(item);
        Some(item.clone())
    }

    /// Remove all records matching the predicate; `true` if any were removed.
    pub fn remove_where<P: Fn(&T) -> bool>(&self, pred: P) -> bool {
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|t| !pred(t));
        items.len() != before
    }
}

impl<T: Clone> Default for MemCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}
