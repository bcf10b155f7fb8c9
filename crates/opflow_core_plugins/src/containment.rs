//! Failure containment: letting a workflow continue past failing operations.
//!
//! [`ContinueOnFailureBehavior`] swallows any failure of the executable it
//! wraps. Which operations receive it is decided by the [`ContainmentPolicy`]
//! setting, read by [`ContinueOnFailureFactory`] at resolution time.
//!
//! # Example
//!
//! ```
//! use opflow_core_plugins::{ContainmentPolicy, ContinueOnFailureFactory};
//! use opflow_system::prelude::*;
//!
//! struct Flaky;
//!
//! impl Operation for Flaky {
//!     fn on_execute(&mut self, _ctx: &mut ExecutionContext<'_>) -> Result<(), OperationError> {
//!         Err("network unreachable".into())
//!     }
//! }
//!
//! let configuration = Configuration::new()
//!     .with_setting(ContainmentPolicy::new().contain::<Flaky>())
//!     .with_behavior_factory(ContinueOnFailureFactory);
//!
//! let mut flaky = apply_behaviors(Box::new(Flaky), &configuration);
//! assert!(flaky.run().is_ok());
//! ```

use std::sync::Arc;

use hashbrown::HashSet;
use opflow_system::prelude::*;

// ─────────────────────────────────────────────────────────────────────────────
// ContainmentPolicy
// ─────────────────────────────────────────────────────────────────────────────

/// Setting listing the operations whose failures are contained.
#[derive(Debug, Clone, Default)]
pub struct ContainmentPolicy {
    everything: bool,
    operations: HashSet<OperationId>,
}

impl Setting for ContainmentPolicy {}

impl ContainmentPolicy {
    /// Creates a policy containing nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a policy containing the failures of every operation.
    #[must_use]
    pub fn everything() -> Self {
        Self {
            everything: true,
            operations: HashSet::new(),
        }
    }

    /// Adds operation type `O` to the policy.
    #[must_use]
    pub fn contain<O: Operation>(mut self) -> Self {
        self.operations.insert(OperationId::of::<O>());
        self
    }

    /// Returns `true` if failures of `operation` are contained.
    #[must_use]
    pub fn applies_to(&self, operation: &dyn Operation) -> bool {
        self.everything || self.operations.contains(&OperationId::of_val(operation))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ContinueOnFailureFactory
// ─────────────────────────────────────────────────────────────────────────────

/// Wraps the operations selected by the [`ContainmentPolicy`] in a
/// [`ContinueOnFailureBehavior`].
///
/// Without a policy setting no operation is wrapped.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContinueOnFailureFactory;

impl BehaviorFactory for ContinueOnFailureFactory {
    fn create_behaviors(
        &self,
        operation: &dyn Operation,
        configuration: &Configuration,
    ) -> Vec<Box<dyn Behavior>> {
        let contained = configuration
            .setting::<ContainmentPolicy>()
            .is_some_and(|policy| policy.applies_to(operation));
        if !contained {
            return Vec::new();
        }

        let mut behavior = ContinueOnFailureBehavior::new();
        if let Some(logger) = configuration.logger() {
            behavior = behavior.with_logger(logger.clone());
        }
        let behavior: Box<dyn Behavior> = Box::new(behavior);
        vec![behavior]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ContinueOnFailureBehavior
// ─────────────────────────────────────────────────────────────────────────────

/// Swallows failures of the wrapped executable.
///
/// Every swallowed failure is emitted as a `tracing` warning and, when a
/// logger is set, reported through
/// [`behavior_applied`](WorkflowLogger::behavior_applied).
#[derive(Default)]
pub struct ContinueOnFailureBehavior {
    logger: Option<Arc<dyn WorkflowLogger>>,
}

impl ContinueOnFailureBehavior {
    /// Creates the behavior without a logger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports swallowed failures to `logger`.
    #[must_use]
    pub fn with_logger(mut self, logger: Arc<dyn WorkflowLogger>) -> Self {
        self.logger = Some(logger);
        self
    }
}

impl Behavior for ContinueOnFailureBehavior {
    fn precedence(&self) -> Precedence {
        Precedence::Containment
    }

    fn execute(
        &mut self,
        inner: &mut Executable,
        ctx: &mut ExecutionContext<'_>,
    ) -> Result<(), ExecutionError> {
        let Err(error) = inner.execute(ctx) else {
            return Ok(());
        };

        let operation = inner.operation();
        tracing::warn!(
            operation = operation.name(),
            kind = error.kind(),
            error = %error,
            "failure contained, continuing"
        );
        if let Some(logger) = &self.logger {
            logger.behavior_applied(
                operation,
                &*self,
                &format!("Error swallowed ({})", error.kind()),
            );
        }
        Ok(())
    }
}
