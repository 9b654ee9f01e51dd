//! Error types returned by the executor and the operation catalog.

/// Errors returned by [`OperationsExecutor::execute`](crate::OperationsExecutor::execute).
#[derive(Debug, thiserror::Error)]
pub enum ExecuteError {
    /// A requested group was never created by a registration call.
    #[error("operation group '{name}' does not exist")]
    UnknownGroup { name: String },
    /// An operation or for-each interceptor failed. The original error is
    /// carried unchanged and can be recovered with `downcast_ref`.
    #[error(transparent)]
    Failed(#[from] anyhow::Error),
}

impl ExecuteError {
    /// Returns the failure raised by an operation or interceptor, if any.
    #[must_use]
    pub fn as_failure(&self) -> Option<&anyhow::Error> {
        match self {
            ExecuteError::Failed(err) => Some(err),
            ExecuteError::UnknownGroup { .. } => None,
        }
    }
}

/// Errors returned by [`Catalog`](crate::catalog::Catalog) operations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("missing required field: '{field}'")]
    MissingField { field: &'static str },
    #[error("invalid operation spec: {0}")]
    InvalidSpec(#[from] serde_json::Error),
    #[error("operation '{name}' not found in operations named '{catalog}'")]
    NotFound { name: String, catalog: String },
    #[error("operation '{name}' has no function to execute")]
    MissingFunction { name: String },
    #[error("operation '{name}' refers to unknown function '{function}'")]
    UnresolvedFunction { name: String, function: String },
}
