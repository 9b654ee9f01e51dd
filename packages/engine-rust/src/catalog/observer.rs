//! Catalog observer trait and composite implementation.
//!
//! Defines [`CatalogObserver`] for reacting to catalog changes, and
//! [`CompositeCatalogObserver`] which fans out notifications to multiple
//! observers in registration order.

use std::sync::Arc;

use super::spec::{CatalogEntry, OperationSpec};

/// Observer for catalog mutations. All methods default to no-ops.
///
/// Used as `Arc<dyn CatalogObserver>`.
pub trait CatalogObserver: Send + Sync {
    /// Called before an entry is added, with the spec as requested.
    fn before_add(&self, _spec: &OperationSpec) {}

    /// Called after an entry is added, with the stored entry and the spec as
    /// requested, before any renaming.
    fn after_add(&self, _entry: &CatalogEntry, _spec: &OperationSpec) {}

    /// Called before an entry is moved from `position`.
    fn before_reorder(&self, _entry: &CatalogEntry, _position: usize) {}

    /// Called after an entry is moved from `old_position` to `new_position`.
    fn after_reorder(&self, _entry: &CatalogEntry, _old_position: usize, _new_position: usize) {}

    /// Called before an entry is removed.
    fn before_remove(&self, _entry: &CatalogEntry) {}

    /// Called after an entry is removed, with its name.
    fn after_remove(&self, _name: &str) {}

    /// Called before all entries are cleared.
    fn before_clear(&self) {}

    /// Called after all entries are cleared and the initial entries are
    /// added back.
    fn after_clear(&self) {}
}

/// Composite observer that fans out to multiple observers.
#[derive(Default)]
pub struct CompositeCatalogObserver {
    observers: Vec<Arc<dyn CatalogObserver>>,
}

impl CompositeCatalogObserver {
    /// Creates a composite observer with the given list of observers.
    #[must_use]
    pub fn new(observers: Vec<Arc<dyn CatalogObserver>>) -> Self {
        Self { observers }
    }

    /// Adds an observer after construction.
    pub fn add(&mut self, observer: Arc<dyn CatalogObserver>) {
        self.observers.push(observer);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl CatalogObserver for CompositeCatalogObserver {
    fn before_add(&self, spec: &OperationSpec) {
        for observer in &self.observers {
            observer.before_add(spec);
        }
    }

    fn after_add(&self, entry: &CatalogEntry, spec: &OperationSpec) {
        for observer in &self.observers {
            observer.after_add(entry, spec);
        }
    }

    fn before_reorder(&self, entry: &CatalogEntry, position: usize) {
        for observer in &self.observers {
            observer.before_reorder(entry, position);
        }
    }

    fn after_reorder(&self, entry: &CatalogEntry, old_position: usize, new_position: usize) {
        for observer in &self.observers {
            observer.after_reorder(entry, old_position, new_position);
        }
    }

    fn before_remove(&self, entry: &CatalogEntry) {
        for observer in &self.observers {
            observer.before_remove(entry);
        }
    }

    fn after_remove(&self, name: &str) {
        for observer in &self.observers {
            observer.after_remove(name);
        }
    }

    fn before_clear(&self) {
        for observer in &self.observers {
            observer.before_clear();
        }
    }

    fn after_clear(&self) {
        for observer in &self.observers {
            observer.after_clear();
        }
    }
}
