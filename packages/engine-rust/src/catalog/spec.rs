//! Descriptions of catalog entries.

use serde::{Deserialize, Serialize};

use opgroups_core::{CallArgs, Value};

use crate::config::EngineConfig;
use crate::error::CatalogError;

/// Kind of catalog entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// Performs work on each item (e.g. autocrop a layer).
    #[default]
    Procedure,
    /// Decides whether an item is processed at all.
    Constraint,
}

/// Named argument passed positionally to the entry's function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    pub name: String,
    #[serde(default)]
    pub value: Value,
}

impl Argument {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

/// Requested catalog entry, as supplied by a caller or a JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationSpec {
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: OperationKind,
    /// Name of the function to run, resolved through a `FunctionRegistry`.
    #[serde(default)]
    pub function: Option<String>,
    #[serde(default)]
    pub arguments: Vec<Argument>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Defaults to `name`.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Defaults to the configured group for `kind`.
    #[serde(default)]
    pub operation_groups: Option<Vec<String>>,
    /// Only meaningful for constraints.
    #[serde(default)]
    pub subfilter: Option<String>,
}

impl OperationSpec {
    /// Creates a procedure spec with all optional fields at their defaults.
    pub fn procedure(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: OperationKind::Procedure,
            function: None,
            arguments: Vec::new(),
            enabled: true,
            display_name: None,
            operation_groups: None,
            subfilter: None,
        }
    }

    /// Creates a constraint spec with all optional fields at their defaults.
    pub fn constraint(name: impl Into<String>) -> Self {
        Self {
            kind: OperationKind::Constraint,
            ..Self::procedure(name)
        }
    }

    #[must_use]
    pub fn function(mut self, function: impl Into<String>) -> Self {
        self.function = Some(function.into());
        self
    }

    #[must_use]
    pub fn argument(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.push(Argument::new(name, value));
        self
    }

    #[must_use]
    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    #[must_use]
    pub fn groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.operation_groups = Some(groups.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Parses a spec from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidSpec`] for malformed JSON, a missing
    /// `name`, or an unknown `type`.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    pub(crate) fn validate(&self) -> Result<(), CatalogError> {
        if self.name.is_empty() {
            return Err(CatalogError::MissingField { field: "name" });
        }
        Ok(())
    }
}

/// Entry stored in a catalog, with every default resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry {
    /// Unique within the catalog.
    pub name: String,
    /// Name requested when the entry was added, before uniquifying.
    pub orig_name: String,
    /// Unique within the catalog.
    pub display_name: String,
    pub kind: OperationKind,
    pub function: Option<String>,
    pub arguments: Vec<Argument>,
    pub enabled: bool,
    pub operation_groups: Vec<String>,
    pub subfilter: Option<String>,
}

impl CatalogEntry {
    /// Builds an entry from `spec`, using `name` and `display_name` as already
    /// made unique by the catalog.
    pub(crate) fn from_spec(
        spec: &OperationSpec,
        name: String,
        display_name: String,
        config: &EngineConfig,
    ) -> Self {
        let operation_groups = spec.operation_groups.clone().unwrap_or_else(|| {
            vec![match spec.kind {
                OperationKind::Procedure => config.default_procedures_group.clone(),
                OperationKind::Constraint => config.default_constraints_group.clone(),
            }]
        });
        let subfilter = match spec.kind {
            OperationKind::Constraint => spec.subfilter.clone(),
            OperationKind::Procedure => None,
        };

        Self {
            name,
            orig_name: spec.name.clone(),
            display_name,
            kind: spec.kind,
            function: spec.function.clone(),
            arguments: spec.arguments.clone(),
            enabled: spec.enabled,
            operation_groups,
            subfilter,
        }
    }

    /// Argument values in order, as positional call arguments.
    #[must_use]
    pub fn call_args(&self) -> CallArgs {
        CallArgs {
            positional: self.arguments.iter().map(|arg| arg.value.clone()).collect(),
            ..CallArgs::default()
        }
    }
}
