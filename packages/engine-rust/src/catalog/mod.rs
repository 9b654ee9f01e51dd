//! Operation catalog: an ordered, editable list of procedures and constraints.
//!
//! A [`Catalog`] holds entries described by [`OperationSpec`]s. Entry names and
//! display names are kept unique, entries can be reordered, removed, and reset
//! to the initial set, and every change is announced to registered
//! [`CatalogObserver`]s. [`Catalog::register_into`] feeds the enabled entries
//! into an [`OperationsExecutor`] under their operation groups.

pub mod observer;
pub mod registry;
pub mod spec;

use std::sync::Arc;

use tracing::debug;

pub use observer::{CatalogObserver, CompositeCatalogObserver};
pub use registry::FunctionRegistry;
pub use spec::{Argument, CatalogEntry, OperationKind, OperationSpec};

use crate::config::EngineConfig;
use crate::error::CatalogError;
use crate::executor::OperationsExecutor;

/// Ordered collection of catalog entries.
pub struct Catalog {
    name: String,
    config: EngineConfig,
    initial: Vec<OperationSpec>,
    entries: Vec<CatalogEntry>,
    observers: CompositeCatalogObserver,
}

impl Catalog {
    /// Creates a catalog populated with `initial` entries. [`Catalog::clear`]
    /// restores exactly these entries.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::MissingField`] if an initial spec has no name.
    pub fn new(
        name: impl Into<String>,
        initial: Vec<OperationSpec>,
        config: &EngineConfig,
    ) -> Result<Self, CatalogError> {
        for spec in &initial {
            spec.validate()?;
        }

        let mut catalog = Self {
            name: name.into(),
            config: config.clone(),
            initial,
            entries: Vec::new(),
            observers: CompositeCatalogObserver::default(),
        };
        catalog.add_initial()?;
        Ok(catalog)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registers an observer notified of every subsequent change.
    pub fn add_observer(&mut self, observer: Arc<dyn CatalogObserver>) {
        self.observers.add(observer);
    }

    /// Adds an entry at the end of the catalog.
    ///
    /// If the name or display name is already taken, it is made unique by
    /// appending `_2`, `_3`, ... to the name and ` (2)`, ` (3)`, ... to the
    /// display name. The requested name is kept as `orig_name`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::MissingField`] if the spec has no name.
    pub fn add(&mut self, spec: OperationSpec) -> Result<&CatalogEntry, CatalogError> {
        spec.validate()?;
        self.observers.before_add(&spec);

        let name = uniquify(
            &spec.name,
            self.entries.iter().map(|entry| entry.name.as_str()),
            |i| format!("_{i}"),
        );
        let display_name = uniquify(
            spec.display_name.as_deref().unwrap_or(&spec.name),
            self.entries.iter().map(|entry| entry.display_name.as_str()),
            |i| format!(" ({i})"),
        );

        let entry = CatalogEntry::from_spec(&spec, name, display_name, &self.config);
        debug!(catalog = %self.name, entry = %entry.name, kind = ?entry.kind, "adding catalog entry");
        self.entries.push(entry);

        let index = self.entries.len() - 1;
        self.observers.after_add(&self.entries[index], &spec);
        Ok(&self.entries[index])
    }

    /// Moves the entry `name` to `new_position`.
    ///
    /// Negative positions count from the end: `-1` is last, `-2` second to
    /// last, and so on. Positions past either end are clamped.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if no entry is named `name`.
    pub fn reorder(&mut self, name: &str, new_position: isize) -> Result<(), CatalogError> {
        let current = self.position(name)?;
        self.observers.before_reorder(&self.entries[current], current);

        let entry = self.entries.remove(current);
        let len = self.entries.len();
        let target = if new_position < 0 {
            len.saturating_sub(new_position.unsigned_abs() - 1)
        } else {
            new_position.unsigned_abs().min(len)
        };
        self.entries.insert(target, entry);

        debug!(catalog = %self.name, entry = name, from = current, to = target, "reordered catalog entry");
        self.observers.after_reorder(&self.entries[target], current, target);
        Ok(())
    }

    /// Removes the entry `name` and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if no entry is named `name`.
    pub fn remove(&mut self, name: &str) -> Result<CatalogEntry, CatalogError> {
        let index = self.position(name)?;
        self.observers.before_remove(&self.entries[index]);

        let entry = self.entries.remove(index);

        debug!(catalog = %self.name, entry = name, "removed catalog entry");
        self.observers.after_remove(&entry.name);
        Ok(entry)
    }

    /// Removes all entries, then adds the initial entries back.
    ///
    /// # Errors
    ///
    /// Propagates errors from re-adding initial entries; they were validated
    /// on construction, so this does not fail in practice.
    pub fn clear(&mut self) -> Result<(), CatalogError> {
        self.observers.before_clear();
        self.entries.clear();
        debug!(catalog = %self.name, "cleared catalog");
        self.add_initial()?;
        self.observers.after_clear();
        Ok(())
    }

    /// Iterates entries in catalog order, optionally only those of `kind`.
    pub fn walk(&self, kind: Option<OperationKind>) -> impl Iterator<Item = &CatalogEntry> {
        self.entries
            .iter()
            .filter(move |entry| kind.map_or(true, |kind| entry.kind == kind))
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// Enables or disables the entry `name`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if no entry is named `name`.
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> Result<(), CatalogError> {
        let index = self.position(name)?;
        self.entries[index].enabled = enabled;
        Ok(())
    }

    /// Adds every enabled entry's function to `executor` under the entry's
    /// operation groups, in catalog order, with the entry's argument values
    /// bound positionally. Returns the number of entries registered.
    ///
    /// All functions are resolved before anything is registered, so a failure
    /// leaves `executor` untouched.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::MissingFunction`] if an enabled entry has no function.
    /// - [`CatalogError::UnresolvedFunction`] if `functions` has no operation
    ///   under the entry's function name.
    pub fn register_into(
        &self,
        executor: &mut OperationsExecutor,
        functions: &FunctionRegistry,
    ) -> Result<usize, CatalogError> {
        let resolved = self
            .entries
            .iter()
            .filter(|entry| entry.enabled)
            .map(|entry| -> Result<_, CatalogError> {
                let function =
                    entry
                        .function
                        .as_deref()
                        .ok_or_else(|| CatalogError::MissingFunction {
                            name: entry.name.clone(),
                        })?;
                let operation =
                    functions
                        .get(function)
                        .ok_or_else(|| CatalogError::UnresolvedFunction {
                            name: entry.name.clone(),
                            function: function.to_string(),
                        })?;
                Ok((entry, operation))
            })
            .collect::<Result<Vec<_>, _>>()?;

        for (entry, operation) in &resolved {
            executor.add_operation(&entry.operation_groups, operation, entry.call_args());
        }

        debug!(catalog = %self.name, registered = resolved.len(), "registered catalog entries");
        Ok(resolved.len())
    }

    fn position(&self, name: &str) -> Result<usize, CatalogError> {
        self.entries
            .iter()
            .position(|entry| entry.name == name)
            .ok_or_else(|| CatalogError::NotFound {
                name: name.to_string(),
                catalog: self.name.clone(),
            })
    }

    fn add_initial(&mut self) -> Result<(), CatalogError> {
        let initial = self.initial.clone();
        for spec in initial {
            self.add(spec)?;
        }
        Ok(())
    }
}

/// Returns `base`, or `base` plus the first suffix (`suffix(2)`, `suffix(3)`,
/// ...) that makes it absent from `existing`.
fn uniquify<'a>(
    base: &str,
    existing: impl Iterator<Item = &'a str>,
    suffix: impl Fn(usize) -> String,
) -> String {
    let existing: Vec<&str> = existing.collect();
    if !existing.contains(&base) {
        return base.to_string();
    }
    (2..)
        .map(|i| format!("{base}{}", suffix(i)))
        .find(|candidate| !existing.contains(&candidate.as_str()))
        .unwrap_or_else(|| base.to_string())
}
