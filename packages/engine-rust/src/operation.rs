//! Operation handles: named callables with a stable identity.

use std::fmt;
use std::sync::Arc;

use opgroups_core::{CallArgs, Value};

/// Callable signature shared by all operations.
pub type OperationFn = dyn Fn(&CallArgs) -> anyhow::Result<Value> + Send + Sync;

/// Identity of a registered callable.
///
/// Derived from the address of the shared allocation behind a handle, so all
/// clones of one handle share an id and separately constructed handles never
/// do while both are alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperationId(usize);

impl OperationId {
    pub(crate) fn of<T: ?Sized>(ptr: &Arc<T>) -> Self {
        Self(Arc::as_ptr(ptr).cast::<()>() as usize)
    }
}

/// A callable operation registered into one or more operation groups.
///
/// Cloning is cheap and preserves identity: `has_operation` answers `true` for
/// any clone of a handle that was registered.
#[derive(Clone)]
pub struct Operation {
    name: Arc<str>,
    func: Arc<OperationFn>,
}

impl Operation {
    /// Creates an operation from a callable. The name is used for logging and
    /// for lookup in a [`FunctionRegistry`](crate::catalog::FunctionRegistry).
    pub fn new<F>(name: impl Into<Arc<str>>, func: F) -> Self
    where
        F: Fn(&CallArgs) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    /// Creates an operation from a callable that produces no value.
    pub fn unit<F>(name: impl Into<Arc<str>>, func: F) -> Self
    where
        F: Fn(&CallArgs) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self::new(name, move |args: &CallArgs| func(args).map(|()| Value::Null))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn id(&self) -> OperationId {
        OperationId::of(&self.func)
    }

    /// Invokes the operation with fully merged arguments.
    ///
    /// # Errors
    ///
    /// Returns whatever error the underlying callable returns.
    pub fn call(&self, args: &CallArgs) -> anyhow::Result<Value> {
        (self.func)(args)
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("name", &self.name)
            .field("id", &self.id())
            .finish()
    }
}
