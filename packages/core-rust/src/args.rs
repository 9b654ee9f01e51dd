//! Call argument bundles.
//!
//! Every operation is registered together with a set of bound arguments and is
//! later invoked with extra arguments supplied at execution time. [`CallArgs`]
//! carries both halves and defines how they combine.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::Value;

/// Positional and keyword arguments for a single call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallArgs {
    /// Positional arguments in call order.
    #[serde(default)]
    pub positional: Vec<Value>,
    /// Keyword arguments by name.
    #[serde(default)]
    pub keyword: BTreeMap<String, Value>,
}

impl CallArgs {
    /// Creates an empty argument bundle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a bundle holding only positional arguments.
    #[must_use]
    pub fn positional<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            positional: values.into_iter().map(Into::into).collect(),
            keyword: BTreeMap::new(),
        }
    }

    /// Appends a positional argument.
    #[must_use]
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Sets a keyword argument, replacing any previous value under `name`.
    #[must_use]
    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keyword.insert(name.into(), value.into());
        self
    }

    /// Returns the keyword argument `name`, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.keyword.get(name)
    }

    /// Returns the positional argument at `index`, if present.
    #[must_use]
    pub fn at(&self, index: usize) -> Option<&Value> {
        self.positional.get(index)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keyword.is_empty()
    }

    /// Combines bound arguments (`self`) with arguments supplied at call time.
    ///
    /// Positional arguments from `extra` are appended after the bound ones.
    /// Keyword arguments from `extra` override bound keyword arguments of the
    /// same name.
    #[must_use]
    pub fn merged(&self, extra: &CallArgs) -> CallArgs {
        if extra.is_empty() {
            return self.clone();
        }

        let mut positional = Vec::with_capacity(self.positional.len() + extra.positional.len());
        positional.extend_from_slice(&self.positional);
        positional.extend_from_slice(&extra.positional);

        let mut keyword = self.keyword.clone();
        keyword.extend(
            extra
                .keyword
                .iter()
                .map(|(name, value)| (name.clone(), value.clone())),
        );

        CallArgs {
            positional,
            keyword,
        }
    }
}
