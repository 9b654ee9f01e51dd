//! Named operation groups and their execution.
//!
//! [`OperationsExecutor`] keeps, per group name, an ordered list of operations
//! and an ordered list of for-each interceptors. Executing a group runs its
//! operations in registration order; when the group has interceptors, every
//! operation call is coordinated with them (see [`OperationsExecutor::execute`]).

use std::collections::{HashMap, HashSet};

use opgroups_core::{CallArgs, Value};
use tracing::{debug, trace};

use crate::error::ExecuteError;
use crate::foreach::{ActiveRun, ForEachOperation, RunState};
use crate::operation::{Operation, OperationId};

// ---------------------------------------------------------------------------
// OperationGroup
// ---------------------------------------------------------------------------

/// An operation paired with the arguments bound at registration time.
#[derive(Debug, Clone)]
struct OperationEntry {
    operation: Operation,
    args: CallArgs,
}

#[derive(Debug, Clone)]
struct ForEachEntry {
    foreach: ForEachOperation,
    args: CallArgs,
}

#[derive(Debug, Default)]
struct OperationGroup {
    /// Execution order equals registration order; duplicates allowed.
    operations: Vec<OperationEntry>,
    /// Wrap order equals registration order.
    foreach_operations: Vec<ForEachEntry>,
    operation_ids: HashSet<OperationId>,
    foreach_ids: HashSet<OperationId>,
}

// ---------------------------------------------------------------------------
// OperationsExecutor
// ---------------------------------------------------------------------------

/// Registry and executor of named operation groups.
///
/// Groups are created implicitly by the first registration into them and live
/// as long as the executor. Registration is additive only.
#[derive(Debug, Default)]
pub struct OperationsExecutor {
    groups: HashMap<String, OperationGroup>,
    /// Group creation order, for deterministic listing.
    group_order: Vec<String>,
}

impl OperationsExecutor {
    /// Creates an executor with no groups.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `operation` with bound `args` to every group in `group_names`,
    /// creating groups that do not exist yet.
    ///
    /// The same operation may be added repeatedly; each addition is executed.
    pub fn add_operation<I, S>(&mut self, group_names: I, operation: &Operation, args: CallArgs)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for group_name in group_names {
            let group_name = group_name.as_ref();
            trace!(group = group_name, operation = operation.name(), "adding operation");

            let group = self.group_entry(group_name);
            group.operations.push(OperationEntry {
                operation: operation.clone(),
                args: args.clone(),
            });
            group.operation_ids.insert(operation.id());
        }
    }

    /// Adds a for-each interceptor with bound `args` to every group in
    /// `group_names`, creating groups that do not exist yet.
    ///
    /// Interceptors wrap every operation of the group and run in the order
    /// they were added.
    pub fn add_foreach_operation<I, S>(
        &mut self,
        group_names: I,
        foreach: &ForEachOperation,
        args: CallArgs,
    ) where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for group_name in group_names {
            let group_name = group_name.as_ref();
            trace!(group = group_name, "adding for-each operation");

            let group = self.group_entry(group_name);
            group.foreach_operations.push(ForEachEntry {
                foreach: foreach.clone(),
                args: args.clone(),
            });
            group.foreach_ids.insert(foreach.id());
        }
    }

    /// Executes all operations of the given groups, group by group, in the
    /// order the names are given. A name listed twice runs twice.
    ///
    /// `extra` is merged into every operation's and interceptor's bound
    /// arguments: positional arguments are appended, keyword arguments
    /// override bound ones of the same name.
    ///
    /// For a group with interceptors, each operation runs under this protocol:
    /// every interceptor is started and advanced to its first suspension
    /// point; then, while any interceptor is still active, the operation is
    /// called once and every active interceptor is resumed with its result.
    /// Interceptors that complete drop out. An interceptor that keeps
    /// suspending therefore repeats the operation.
    ///
    /// # Errors
    ///
    /// - [`ExecuteError::UnknownGroup`] if a group was never created. Groups
    ///   listed before it have already been executed.
    /// - [`ExecuteError::Failed`] with the unchanged error of the first
    ///   operation or interceptor that fails. Nothing after it runs.
    pub fn execute<I, S>(&self, group_names: I, extra: &CallArgs) -> Result<(), ExecuteError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for group_name in group_names {
            let group_name = group_name.as_ref();
            let group = self
                .groups
                .get(group_name)
                .ok_or_else(|| ExecuteError::UnknownGroup {
                    name: group_name.to_string(),
                })?;

            debug!(
                group = group_name,
                operations = group.operations.len(),
                foreach_operations = group.foreach_operations.len(),
                "executing operation group"
            );

            for entry in &group.operations {
                let args = entry.args.merged(extra);
                trace!(group = group_name, operation = entry.operation.name(), "executing operation");

                if group.foreach_operations.is_empty() {
                    entry.operation.call(&args)?;
                } else {
                    Self::execute_with_foreach(group, &entry.operation, &args, extra)?;
                }
            }
        }
        Ok(())
    }

    /// Returns `true` if `operation` (or a clone of it) was added to
    /// `group_name`. Unknown groups yield `false`.
    #[must_use]
    pub fn has_operation(&self, group_name: &str, operation: &Operation) -> bool {
        self.groups
            .get(group_name)
            .is_some_and(|group| group.operation_ids.contains(&operation.id()))
    }

    /// Returns `true` if `foreach` (or a clone of it) was added to
    /// `group_name`. Unknown groups yield `false`.
    #[must_use]
    pub fn has_foreach_operation(&self, group_name: &str, foreach: &ForEachOperation) -> bool {
        self.groups
            .get(group_name)
            .is_some_and(|group| group.foreach_ids.contains(&foreach.id()))
    }

    #[must_use]
    pub fn has_group(&self, group_name: &str) -> bool {
        self.groups.contains_key(group_name)
    }

    /// Group names in creation order.
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.group_order.iter().map(String::as_str)
    }

    /// Number of operation entries in `group_name`, counting duplicates.
    #[must_use]
    pub fn operation_count(&self, group_name: &str) -> usize {
        self.groups
            .get(group_name)
            .map_or(0, |group| group.operations.len())
    }

    #[must_use]
    pub fn foreach_count(&self, group_name: &str) -> usize {
        self.groups
            .get(group_name)
            .map_or(0, |group| group.foreach_operations.len())
    }

    fn group_entry(&mut self, group_name: &str) -> &mut OperationGroup {
        if !self.groups.contains_key(group_name) {
            debug!(group = group_name, "creating operation group");
            self.group_order.push(group_name.to_string());
        }
        self.groups.entry(group_name.to_string()).or_default()
    }

    fn execute_with_foreach(
        group: &OperationGroup,
        operation: &Operation,
        args: &CallArgs,
        extra: &CallArgs,
    ) -> anyhow::Result<()> {
        let mut runs: Vec<ActiveRun> = group
            .foreach_operations
            .iter()
            .map(|entry| ActiveRun::start(&entry.foreach, &entry.args.merged(extra)))
            .collect();

        advance_all(&mut runs, None)?;

        while !runs.is_empty() {
            let result = operation.call(args)?;
            advance_all(&mut runs, Some(&result))?;
        }
        Ok(())
    }
}

/// Advances every run once, in order, then drops the ones that completed.
fn advance_all(runs: &mut Vec<ActiveRun>, input: Option<&Value>) -> anyhow::Result<()> {
    for run in runs.iter_mut() {
        if run.advance(input)? == RunState::Completed {
            trace!("for-each operation completed");
        }
    }
    runs.retain(|run| !run.is_completed());
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;
    use proptest::prelude::*;

    use super::*;
    use crate::foreach::Resume;

    type Log = Arc<Mutex<Vec<String>>>;

    fn new_log() -> Log {
        Arc::new(Mutex::new(Vec::new()))
    }

    /// Operation that appends `name` plus its positional args to the log and
    /// returns `result`.
    fn recording_op(name: &'static str, log: &Log, result: Value) -> Operation {
        let log = Arc::clone(log);
        Operation::new(name, move |args: &CallArgs| {
            let rendered: Vec<String> = args.positional.iter().map(ToString::to_string).collect();
            if rendered.is_empty() {
                log.lock().push(name.to_string());
            } else {
                log.lock().push(format!("{name}({})", rendered.join(",")));
            }
            Ok(result.clone())
        })
    }

    fn recording_after(name: &'static str, log: &Log) -> ForEachOperation {
        let log = Arc::clone(log);
        ForEachOperation::after(move |_: &CallArgs| {
            log.lock().push(name.to_string());
            Ok(())
        })
    }

    #[derive(Debug, thiserror::Error)]
    #[error("cannot export layer '{layer}'")]
    struct ExportFailed {
        layer: String,
    }

    #[test]
    fn operations_run_once_in_registration_order() {
        let log = new_log();
        let mut executor = OperationsExecutor::new();
        executor.add_operation(["main"], &recording_op("a", &log, Value::Null), CallArgs::new());
        executor.add_operation(["main"], &recording_op("b", &log, Value::Null), CallArgs::new());
        executor.add_operation(["main"], &recording_op("c", &log, Value::Null), CallArgs::new());

        executor.execute(["main"], &CallArgs::new()).unwrap();

        assert_eq!(*log.lock(), vec!["a", "b", "c"]);
    }

    #[test]
    fn duplicate_registration_runs_each_entry() {
        let log = new_log();
        let op = recording_op("a", &log, Value::Null);
        let mut executor = OperationsExecutor::new();
        executor.add_operation(["main"], &op, CallArgs::new().arg(1));
        executor.add_operation(["main"], &op, CallArgs::new().arg(2));

        executor.execute(["main"], &CallArgs::new()).unwrap();

        assert_eq!(*log.lock(), vec!["a(1)", "a(2)"]);
        assert_eq!(executor.operation_count("main"), 2);
    }

    #[test]
    fn add_operation_to_multiple_groups() {
        let log = new_log();
        let op = recording_op("a", &log, Value::Null);
        let mut executor = OperationsExecutor::new();
        executor.add_operation(["first", "second"], &op, CallArgs::new());

        assert!(executor.has_operation("first", &op));
        assert!(executor.has_operation("second", &op));
        assert_eq!(executor.group_names().collect::<Vec<_>>(), vec!["first", "second"]);
    }

    #[test]
    fn extra_args_are_merged_into_bound_args() {
        let seen = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&seen);
        let op = Operation::new("capture", move |args: &CallArgs| {
            *slot.lock() = Some(args.clone());
            Ok(Value::Null)
        });

        let mut executor = OperationsExecutor::new();
        executor.add_operation(["main"], &op, CallArgs::positional([1, 2]).kwarg("x", 1));
        executor
            .execute(["main"], &CallArgs::new().arg(3).kwarg("x", 9).kwarg("y", 2))
            .unwrap();

        let expected = CallArgs::positional([1, 2, 3]).kwarg("x", 9).kwarg("y", 2);
        assert_eq!(seen.lock().clone(), Some(expected));
    }

    #[test]
    fn foreach_in_other_group_does_not_affect_group() {
        let log = new_log();
        let mut executor = OperationsExecutor::new();
        executor.add_operation(["main"], &recording_op("a", &log, Value::Null), CallArgs::new());
        executor.add_foreach_operation(["other"], &recording_after("after", &log), CallArgs::new());

        executor.execute(["main"], &CallArgs::new()).unwrap();

        assert_eq!(*log.lock(), vec!["a"]);
    }

    #[test]
    fn plain_foreach_runs_after_each_operation() {
        let log = new_log();
        let mut executor = OperationsExecutor::new();
        executor.add_operation(["main"], &recording_op("a", &log, Value::Null), CallArgs::new());
        executor.add_operation(["main"], &recording_op("b", &log, Value::Null), CallArgs::new());
        executor.add_foreach_operation(["main"], &recording_after("after", &log), CallArgs::new());

        executor.execute(["main"], &CallArgs::new()).unwrap();

        assert_eq!(*log.lock(), vec!["a", "after", "b", "after"]);
    }

    #[test]
    fn foreach_registered_before_operations_still_wraps_them() {
        let log = new_log();
        let mut executor = OperationsExecutor::new();
        executor.add_foreach_operation(["main"], &recording_after("after", &log), CallArgs::new());
        executor.add_operation(["main"], &recording_op("a", &log, Value::Null), CallArgs::new());

        executor.execute(["main"], &CallArgs::new()).unwrap();

        assert_eq!(*log.lock(), vec!["a", "after"]);
    }

    #[test]
    fn plain_foreach_receives_bound_and_extra_args() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let slot = Arc::clone(&seen);
        let foreach = ForEachOperation::after(move |args: &CallArgs| {
            slot.lock().push(args.clone());
            Ok(())
        });

        let mut executor = OperationsExecutor::new();
        executor.add_operation(
            ["main"],
            &Operation::new("noop", |_: &CallArgs| Ok(Value::Null)),
            CallArgs::new(),
        );
        executor.add_foreach_operation(["main"], &foreach, CallArgs::new().arg("bound").kwarg("k", 1));
        executor
            .execute(["main"], &CallArgs::new().arg("extra").kwarg("k", 2))
            .unwrap();

        assert_eq!(
            *seen.lock(),
            vec![CallArgs::new().arg("bound").arg("extra").kwarg("k", 2)]
        );
    }

    #[test]
    fn foreach_with_result_observes_operation_result() {
        let log = new_log();
        let results = Arc::new(Mutex::new(Vec::new()));
        let slot = Arc::clone(&results);
        let foreach = ForEachOperation::after_with_result(move |_: &CallArgs, result: &Value| {
            slot.lock().push(result.clone());
            Ok(())
        });

        let mut executor = OperationsExecutor::new();
        executor.add_operation(["main"], &recording_op("a", &log, Value::from("layer-1")), CallArgs::new());
        executor.add_operation(["main"], &recording_op("b", &log, Value::from("layer-2")), CallArgs::new());
        executor.add_foreach_operation(["main"], &foreach, CallArgs::new());

        executor.execute(["main"], &CallArgs::new()).unwrap();

        assert_eq!(
            *results.lock(),
            vec![Value::from("layer-1"), Value::from("layer-2")]
        );
        assert_eq!(*log.lock(), vec!["a", "b"]);
    }

    #[test]
    fn routine_with_setup_and_teardown_wraps_operation() {
        let log = new_log();
        let routine_log = Arc::clone(&log);
        let foreach = ForEachOperation::routine(move |_: &CallArgs| {
            let log = Arc::clone(&routine_log);
            move |input: Option<&Value>| -> anyhow::Result<Resume> {
                match input {
                    None => {
                        log.lock().push("setup".to_string());
                        Ok(Resume::Suspended)
                    }
                    Some(result) => {
                        log.lock().push(format!("teardown:{result}"));
                        Ok(Resume::Completed)
                    }
                }
            }
        });

        let mut executor = OperationsExecutor::new();
        executor.add_operation(["main"], &recording_op("a", &log, Value::Int(5)), CallArgs::new());
        executor.add_foreach_operation(["main"], &foreach, CallArgs::new());

        executor.execute(["main"], &CallArgs::new()).unwrap();

        assert_eq!(*log.lock(), vec!["setup", "a", "teardown:5"]);
    }

    #[test]
    fn routine_suspending_twice_runs_operation_twice() {
        let log = new_log();
        let foreach = ForEachOperation::routine(|_: &CallArgs| {
            let mut resumes = 0;
            move |_: Option<&Value>| -> anyhow::Result<Resume> {
                resumes += 1;
                if resumes <= 2 {
                    Ok(Resume::Suspended)
                } else {
                    Ok(Resume::Completed)
                }
            }
        });

        let mut executor = OperationsExecutor::new();
        executor.add_operation(["main"], &recording_op("a", &log, Value::Null), CallArgs::new());
        executor.add_foreach_operation(["main"], &foreach, CallArgs::new());

        executor.execute(["main"], &CallArgs::new()).unwrap();

        assert_eq!(*log.lock(), vec!["a", "a"]);
    }

    #[test]
    fn routine_can_repeat_until_condition_on_result() {
        let counter = Arc::new(Mutex::new(0_i64));
        let op_counter = Arc::clone(&counter);
        let op = Operation::new("increment", move |_: &CallArgs| {
            let mut count = op_counter.lock();
            *count += 1;
            Ok(Value::Int(*count))
        });
        let foreach = ForEachOperation::routine(|args: &CallArgs| {
            let limit = args.get("limit").and_then(Value::as_int).unwrap_or(0);
            move |input: Option<&Value>| -> anyhow::Result<Resume> {
                match input.and_then(Value::as_int) {
                    Some(count) if count >= limit => Ok(Resume::Completed),
                    _ => Ok(Resume::Suspended),
                }
            }
        });

        let mut executor = OperationsExecutor::new();
        executor.add_operation(["main"], &op, CallArgs::new());
        executor.add_foreach_operation(["main"], &foreach, CallArgs::new().kwarg("limit", 4));

        executor.execute(["main"], &CallArgs::new()).unwrap();

        assert_eq!(*counter.lock(), 4);
    }

    #[test]
    fn two_plain_foreach_run_operation_once_in_registration_order() {
        let log = new_log();
        let mut executor = OperationsExecutor::new();
        executor.add_operation(["main"], &recording_op("a", &log, Value::Null), CallArgs::new());
        executor.add_foreach_operation(["main"], &recording_after("first", &log), CallArgs::new());
        executor.add_foreach_operation(["main"], &recording_after("second", &log), CallArgs::new());

        executor.execute(["main"], &CallArgs::new()).unwrap();

        assert_eq!(*log.lock(), vec!["a", "first", "second"]);
    }

    #[test]
    fn mixed_foreach_keep_running_until_all_complete() {
        let log = new_log();
        let looping = ForEachOperation::routine(|_: &CallArgs| {
            let mut resumes = 0;
            move |_: Option<&Value>| -> anyhow::Result<Resume> {
                resumes += 1;
                Ok(if resumes <= 3 {
                    Resume::Suspended
                } else {
                    Resume::Completed
                })
            }
        });

        let mut executor = OperationsExecutor::new();
        executor.add_operation(["main"], &recording_op("a", &log, Value::Null), CallArgs::new());
        executor.add_foreach_operation(["main"], &recording_after("plain", &log), CallArgs::new());
        executor.add_foreach_operation(["main"], &looping, CallArgs::new());

        executor.execute(["main"], &CallArgs::new()).unwrap();

        // The plain interceptor drops out after the first call.
        assert_eq!(*log.lock(), vec!["a", "plain", "a", "a"]);
    }

    #[test]
    fn routine_completing_during_setup_skips_operation() {
        let log = new_log();
        let skip = ForEachOperation::routine(|_: &CallArgs| {
            |_: Option<&Value>| -> anyhow::Result<Resume> { Ok(Resume::Completed) }
        });

        let mut executor = OperationsExecutor::new();
        executor.add_operation(["main"], &recording_op("a", &log, Value::Null), CallArgs::new());
        executor.add_foreach_operation(["main"], &skip, CallArgs::new());

        executor.execute(["main"], &CallArgs::new()).unwrap();

        assert!(log.lock().is_empty());
    }

    #[test]
    fn unknown_group_fails_without_running_anything() {
        let log = new_log();
        let mut executor = OperationsExecutor::new();
        executor.add_operation(["main"], &recording_op("a", &log, Value::Null), CallArgs::new());

        let err = executor
            .execute(["nonexistent_group"], &CallArgs::new())
            .unwrap_err();

        assert!(matches!(
            err,
            ExecuteError::UnknownGroup { ref name } if name == "nonexistent_group"
        ));
        assert!(log.lock().is_empty());
    }

    #[test]
    fn groups_before_unknown_group_run_to_completion() {
        let log = new_log();
        let mut executor = OperationsExecutor::new();
        executor.add_operation(["g1"], &recording_op("a", &log, Value::Null), CallArgs::new());
        executor.add_operation(["g1"], &recording_op("b", &log, Value::Null), CallArgs::new());
        executor.add_operation(["g2"], &recording_op("c", &log, Value::Null), CallArgs::new());

        let err = executor
            .execute(["g1", "nonexistent_group", "g2"], &CallArgs::new())
            .unwrap_err();

        assert!(matches!(err, ExecuteError::UnknownGroup { .. }));
        assert_eq!(*log.lock(), vec!["a", "b"]);
    }

    #[test]
    fn group_created_by_foreach_only_executes_nothing() {
        let log = new_log();
        let mut executor = OperationsExecutor::new();
        executor.add_foreach_operation(["hooks"], &recording_after("after", &log), CallArgs::new());

        executor.execute(["hooks"], &CallArgs::new()).unwrap();

        assert!(log.lock().is_empty());
        assert!(executor.has_group("hooks"));
    }

    #[test]
    fn repeated_group_name_runs_group_again() {
        let log = new_log();
        let mut executor = OperationsExecutor::new();
        executor.add_operation(["main"], &recording_op("a", &log, Value::Null), CallArgs::new());

        executor.execute(["main", "main"], &CallArgs::new()).unwrap();

        assert_eq!(*log.lock(), vec!["a", "a"]);
    }

    #[test]
    fn operation_failure_propagates_unchanged_and_stops_execution() {
        let log = new_log();
        let failing = Operation::new("fail", |_: &CallArgs| {
            Err(ExportFailed {
                layer: "Background".to_string(),
            }
            .into())
        });

        let mut executor = OperationsExecutor::new();
        executor.add_operation(["g1"], &recording_op("a", &log, Value::Null), CallArgs::new());
        executor.add_operation(["g1"], &failing, CallArgs::new());
        executor.add_operation(["g1"], &recording_op("b", &log, Value::Null), CallArgs::new());
        executor.add_operation(["g2"], &recording_op("c", &log, Value::Null), CallArgs::new());

        let err = executor.execute(["g1", "g2"], &CallArgs::new()).unwrap_err();

        assert_eq!(err.to_string(), "cannot export layer 'Background'");
        let original = err.as_failure().unwrap().downcast_ref::<ExportFailed>().unwrap();
        assert_eq!(original.layer, "Background");
        assert_eq!(*log.lock(), vec!["a"]);
    }

    #[test]
    fn foreach_failure_stops_remaining_interceptors() {
        let log = new_log();
        let failing = ForEachOperation::after(|_: &CallArgs| Err(anyhow::anyhow!("interceptor failed")));

        let mut executor = OperationsExecutor::new();
        executor.add_operation(["main"], &recording_op("a", &log, Value::Null), CallArgs::new());
        executor.add_operation(["main"], &recording_op("b", &log, Value::Null), CallArgs::new());
        executor.add_foreach_operation(["main"], &failing, CallArgs::new());
        executor.add_foreach_operation(["main"], &recording_after("after", &log), CallArgs::new());

        let err = executor.execute(["main"], &CallArgs::new()).unwrap_err();

        assert_eq!(err.to_string(), "interceptor failed");
        assert_eq!(*log.lock(), vec!["a"]);
    }

    #[test]
    fn foreach_failing_during_setup_skips_operation() {
        let log = new_log();
        let failing_setup = ForEachOperation::routine(|_: &CallArgs| {
            |_: Option<&Value>| -> anyhow::Result<Resume> { Err(anyhow::anyhow!("setup failed")) }
        });

        let mut executor = OperationsExecutor::new();
        executor.add_operation(["main"], &recording_op("a", &log, Value::Null), CallArgs::new());
        executor.add_foreach_operation(["main"], &recording_after("after", &log), CallArgs::new());
        executor.add_foreach_operation(["main"], &failing_setup, CallArgs::new());

        let err = executor.execute(["main"], &CallArgs::new()).unwrap_err();

        assert_eq!(err.to_string(), "setup failed");
        assert!(log.lock().is_empty());
    }

    #[test]
    fn has_operation_membership() {
        let log = new_log();
        let added = recording_op("a", &log, Value::Null);
        let other = recording_op("b", &log, Value::Null);
        let mut executor = OperationsExecutor::new();

        assert!(!executor.has_operation("main", &added));

        executor.add_operation(["main"], &added, CallArgs::new());

        assert!(executor.has_operation("main", &added));
        assert!(executor.has_operation("main", &added.clone()));
        assert!(!executor.has_operation("main", &other));
        assert!(!executor.has_operation("missing", &added));
    }

    #[test]
    fn has_foreach_operation_membership() {
        let log = new_log();
        let added = recording_after("x", &log);
        let other = recording_after("y", &log);
        let mut executor = OperationsExecutor::new();
        executor.add_foreach_operation(["main"], &added, CallArgs::new());

        assert!(executor.has_foreach_operation("main", &added));
        assert!(!executor.has_foreach_operation("main", &other));
        assert!(!executor.has_foreach_operation("missing", &added));
        assert_eq!(executor.foreach_count("main"), 1);
    }

    proptest! {
        #[test]
        fn execution_order_matches_registration_order(
            plan in proptest::collection::vec((0_usize..3, 0_i64..100), 0..20),
        ) {
            let log = new_log();
            let ops = [
                recording_op("a", &log, Value::Null),
                recording_op("b", &log, Value::Null),
                recording_op("c", &log, Value::Null),
            ];
            let mut executor = OperationsExecutor::new();
            executor.add_foreach_operation(["unrelated"], &recording_after("after", &log), CallArgs::new());
            for (index, arg) in &plan {
                executor.add_operation(["main"], &ops[*index], CallArgs::new().arg(*arg));
            }

            let result = executor.execute(["main"], &CallArgs::new());

            if plan.is_empty() {
                let unknown = matches!(result, Err(ExecuteError::UnknownGroup { .. }));
                prop_assert!(unknown, "expected UnknownGroup, got {:?}", result);
            } else {
                prop_assert!(result.is_ok());
                let expected: Vec<String> = plan
                    .iter()
                    .map(|(index, arg)| format!("{}({arg})", ["a", "b", "c"][*index]))
                    .collect();
                prop_assert_eq!(log.lock().clone(), expected);
            }
        }
    }
}
