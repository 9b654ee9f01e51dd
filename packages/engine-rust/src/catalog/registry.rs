use std::collections::HashMap;

use parking_lot::RwLock;

use crate::operation::Operation;

/// Name-based lookup of the operations catalog entries refer to.
///
/// Registering under an existing name replaces the previous operation.
/// Every lookup of one name returns a clone of the same handle, so entries
/// sharing a function share its identity in the executor.
#[derive(Default)]
pub struct FunctionRegistry {
    by_name: RwLock<HashMap<String, Operation>>,
}

impl FunctionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `operation` under its own name.
    pub fn register(&self, operation: Operation) {
        self.by_name
            .write()
            .insert(operation.name().to_string(), operation);
    }

    /// Retrieves an operation by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Operation> {
        self.by_name.read().get(name).cloned()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.read().contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.read().is_empty()
    }
}
