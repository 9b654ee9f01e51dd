//! For-each interceptors that wrap every operation of a group.
//!
//! An interceptor is a resumable computation. The executor advances it once
//! before the wrapped operation runs (setup, no input), and then once after
//! each operation call, handing over the operation's result. Each advance
//! either suspends the interceptor, asking for another operation call, or
//! completes it.
//!
//! Two flavors exist:
//!
//! - [`ForEachOperation::After`]: a plain callable. It is adapted into a
//!   routine that suspends immediately and runs the callable once after the
//!   wrapped operation.
//! - [`ForEachOperation::Routine`]: a [`ForEachRoutine`] controlling its own
//!   suspension points. Suspending more than once makes the wrapped operation
//!   run more than once.

use std::fmt;
use std::sync::Arc;

use opgroups_core::{CallArgs, Value};

use crate::operation::OperationId;

/// Outcome of advancing an interceptor run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resume {
    /// The run reached a suspension point and wants the operation called.
    Suspended,
    /// The run finished; it will not be advanced again.
    Completed,
}

/// A single activation of an interceptor, wrapping one registered operation.
pub trait RoutineRun: Send {
    /// Advances the run to its next suspension point.
    ///
    /// `input` is `None` for the first advance and `Some(result)` of the latest
    /// operation call afterwards.
    ///
    /// # Errors
    ///
    /// A returned error terminates the run and is propagated to the caller of
    /// `execute` unchanged.
    fn resume(&mut self, input: Option<&Value>) -> anyhow::Result<Resume>;
}

impl<F> RoutineRun for F
where
    F: FnMut(Option<&Value>) -> anyhow::Result<Resume> + Send,
{
    fn resume(&mut self, input: Option<&Value>) -> anyhow::Result<Resume> {
        self(input)
    }
}

/// Factory for interceptor runs. One run is started per wrapped operation call
/// sequence, with the interceptor's bound arguments merged with the extra
/// arguments passed to `execute`.
pub trait ForEachRoutine: Send + Sync {
    fn start(&self, args: &CallArgs) -> Box<dyn RoutineRun>;
}

impl<F, R> ForEachRoutine for F
where
    F: Fn(&CallArgs) -> R + Send + Sync,
    R: RoutineRun + 'static,
{
    fn start(&self, args: &CallArgs) -> Box<dyn RoutineRun> {
        Box::new(self(args))
    }
}

/// Plain callable run after each wrapped operation.
pub type AfterFn = dyn Fn(&CallArgs) -> anyhow::Result<()> + Send + Sync;

/// A for-each interceptor registered into one or more operation groups.
///
/// Cloning preserves identity, see [`Operation`](crate::Operation).
#[derive(Clone)]
pub enum ForEachOperation {
    /// Plain callable executed once after each wrapped operation call.
    After(Arc<AfterFn>),
    /// Routine with its own suspension points.
    Routine(Arc<dyn ForEachRoutine>),
}

impl ForEachOperation {
    /// Wraps a plain callable; it runs once, after the wrapped operation.
    pub fn after<F>(func: F) -> Self
    where
        F: Fn(&CallArgs) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        ForEachOperation::After(Arc::new(func))
    }

    /// Wraps a routine controlling its own suspension points.
    pub fn routine<R>(routine: R) -> Self
    where
        R: ForEachRoutine + 'static,
    {
        ForEachOperation::Routine(Arc::new(routine))
    }

    /// Runs `func` before the wrapped operation, then lets it run once.
    pub fn before<F>(func: F) -> Self
    where
        F: Fn(&CallArgs) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let func: Arc<AfterFn> = Arc::new(func);
        Self::routine(move |args: &CallArgs| BeforeRun {
            func: Arc::clone(&func),
            args: args.clone(),
            started: false,
        })
    }

    /// Runs `func` once after the wrapped operation, passing it the
    /// operation's result.
    pub fn after_with_result<F>(func: F) -> Self
    where
        F: Fn(&CallArgs, &Value) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let func = Arc::new(func);
        Self::routine(move |args: &CallArgs| {
            let func = Arc::clone(&func);
            let args = args.clone();
            move |input: Option<&Value>| -> anyhow::Result<Resume> {
                match input {
                    None => Ok(Resume::Suspended),
                    Some(result) => {
                        func(&args, result)?;
                        Ok(Resume::Completed)
                    }
                }
            }
        })
    }

    #[must_use]
    pub fn id(&self) -> OperationId {
        match self {
            ForEachOperation::After(func) => OperationId::of(func),
            ForEachOperation::Routine(routine) => OperationId::of(routine),
        }
    }

    pub(crate) fn start(&self, args: &CallArgs) -> Box<dyn RoutineRun> {
        match self {
            ForEachOperation::After(func) => Box::new(AfterRun {
                func: Arc::clone(func),
                args: args.clone(),
                resumed: false,
            }),
            ForEachOperation::Routine(routine) => routine.start(args),
        }
    }
}

impl fmt::Debug for ForEachOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            ForEachOperation::After(_) => "After",
            ForEachOperation::Routine(_) => "Routine",
        };
        f.debug_struct("ForEachOperation")
            .field("kind", &kind)
            .field("id", &self.id())
            .finish()
    }
}

/// Run adapted from a plain callable: suspend, then call once and complete.
struct AfterRun {
    func: Arc<AfterFn>,
    args: CallArgs,
    resumed: bool,
}

impl RoutineRun for AfterRun {
    fn resume(&mut self, _input: Option<&Value>) -> anyhow::Result<Resume> {
        if !self.resumed {
            self.resumed = true;
            return Ok(Resume::Suspended);
        }
        (self.func)(&self.args)?;
        Ok(Resume::Completed)
    }
}

struct BeforeRun {
    func: Arc<AfterFn>,
    args: CallArgs,
    started: bool,
}

impl RoutineRun for BeforeRun {
    fn resume(&mut self, _input: Option<&Value>) -> anyhow::Result<Resume> {
        if self.started {
            return Ok(Resume::Completed);
        }
        self.started = true;
        (self.func)(&self.args)?;
        Ok(Resume::Suspended)
    }
}

// ---------------------------------------------------------------------------
// Executor-side state machine
// ---------------------------------------------------------------------------

/// Lifecycle of an interceptor run as tracked by the executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RunState {
    Created,
    Suspended,
    Completed,
}

/// A started interceptor run plus its lifecycle state.
pub(crate) struct ActiveRun {
    run: Box<dyn RoutineRun>,
    state: RunState,
}

impl ActiveRun {
    pub(crate) fn start(foreach: &ForEachOperation, args: &CallArgs) -> Self {
        Self {
            run: foreach.start(args),
            state: RunState::Created,
        }
    }

    pub(crate) fn is_completed(&self) -> bool {
        self.state == RunState::Completed
    }

    /// Advances the run. A failing run is marked completed before the error
    /// is returned, so it is never resumed again.
    pub(crate) fn advance(&mut self, input: Option<&Value>) -> anyhow::Result<RunState> {
        debug_assert_ne!(self.state, RunState::Completed, "completed run advanced");
        self.state = match self.run.resume(input) {
            Ok(Resume::Suspended) => RunState::Suspended,
            Ok(Resume::Completed) => RunState::Completed,
            Err(err) => {
                self.state = RunState::Completed;
                return Err(err);
            }
        };
        Ok(self.state)
    }
}
