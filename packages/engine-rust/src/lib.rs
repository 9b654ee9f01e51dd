//! `opgroups` engine: named operation groups executed in order, wrapped by
//! for-each interceptors, and fed from an editable operation catalog.
//!
//! ```
//! use opgroups_core::{CallArgs, Value};
//! use opgroups_engine::{ForEachOperation, Operation, OperationsExecutor};
//!
//! let mut executor = OperationsExecutor::new();
//! let export = Operation::new("export", |args: &CallArgs| Ok(args.at(0).cloned().unwrap_or_default()));
//! executor.add_operation(["layers"], &export, CallArgs::new());
//! executor.add_foreach_operation(["layers"], &ForEachOperation::after(|_: &CallArgs| Ok(())), CallArgs::new());
//!
//! executor.execute(["layers"], &CallArgs::new().arg("Background")).unwrap();
//! assert!(executor.has_operation("layers", &export));
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod executor;
pub mod foreach;
pub mod logging;
pub mod operation;

pub use catalog::{Catalog, CatalogEntry, CatalogObserver, FunctionRegistry, OperationKind, OperationSpec};
pub use config::EngineConfig;
pub use error::{CatalogError, ExecuteError};
pub use executor::OperationsExecutor;
pub use foreach::{ForEachOperation, ForEachRoutine, Resume, RoutineRun};
pub use operation::{Operation, OperationId};
