//! Behaviors reporting execution to the configured [`WorkflowLogger`].
//!
//! [`OperationLoggingFactory`] wraps every operation in two behaviors of
//! [`Logging`](Precedence::Logging) precedence, outermost first:
//!
//! | Behavior | Reports |
//! |----------|---------|
//! | [`ExecutionLoggingBehavior`] | start and finish of the operation |
//! | [`ErrorLoggingBehavior`] | failures leaving the operation |
//!
//! Nothing is created when the configuration has no logger.

use std::sync::Arc;

use opflow_system::prelude::*;

// ─────────────────────────────────────────────────────────────────────────────
// OperationLoggingFactory
// ─────────────────────────────────────────────────────────────────────────────

/// Creates the logging behaviors for every operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct OperationLoggingFactory;

impl BehaviorFactory for OperationLoggingFactory {
    fn create_behaviors(
        &self,
        _operation: &dyn Operation,
        configuration: &Configuration,
    ) -> Vec<Box<dyn Behavior>> {
        let Some(logger) = configuration.logger() else {
            return Vec::new();
        };

        let execution: Box<dyn Behavior> = Box::new(ExecutionLoggingBehavior::new(logger.clone()));
        let errors: Box<dyn Behavior> = Box::new(ErrorLoggingBehavior::new(logger.clone()));
        vec![execution, errors]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ExecutionLoggingBehavior
// ─────────────────────────────────────────────────────────────────────────────

/// Reports the start and the finish of the wrapped operation.
///
/// The finish is reported whether or not the operation failed.
pub struct ExecutionLoggingBehavior {
    logger: Arc<dyn WorkflowLogger>,
}

impl ExecutionLoggingBehavior {
    /// Creates the behavior reporting to `logger`.
    #[must_use]
    pub fn new(logger: Arc<dyn WorkflowLogger>) -> Self {
        Self { logger }
    }
}

impl Behavior for ExecutionLoggingBehavior {
    fn precedence(&self) -> Precedence {
        Precedence::Logging
    }

    fn execute(
        &mut self,
        inner: &mut Executable,
        ctx: &mut ExecutionContext<'_>,
    ) -> Result<(), ExecutionError> {
        self.logger.operation_started(inner.operation());
        let result = inner.execute(ctx);
        self.logger.operation_finished(inner.operation());
        result
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ErrorLoggingBehavior
// ─────────────────────────────────────────────────────────────────────────────

/// Reports failures of the wrapped operation and passes them on unchanged.
pub struct ErrorLoggingBehavior {
    logger: Arc<dyn WorkflowLogger>,
}

impl ErrorLoggingBehavior {
    /// Creates the behavior reporting to `logger`.
    #[must_use]
    pub fn new(logger: Arc<dyn WorkflowLogger>) -> Self {
        Self { logger }
    }
}

impl Behavior for ErrorLoggingBehavior {
    fn precedence(&self) -> Precedence {
        Precedence::Logging
    }

    fn execute(
        &mut self,
        inner: &mut Executable,
        ctx: &mut ExecutionContext<'_>,
    ) -> Result<(), ExecutionError> {
        inner.execute(ctx).inspect_err(|error| {
            self.logger.operation_failed(inner.operation(), error);
        })
    }
}
