//! Workflow logger forwarding to `tracing`.

use opflow_system::prelude::*;
use tracing::Level;

use crate::tracing_setup::TracingConfig;

/// Emits every workflow notification as a `tracing` event.
///
/// | Notification | Level |
/// |--------------|-------|
/// | operation started | lifecycle level (`DEBUG` by default) |
/// | operation finished | lifecycle level (`DEBUG` by default) |
/// | operation failed | `ERROR` |
/// | behavior applied | `INFO` |
#[derive(Debug, Clone, Copy)]
pub struct TracingLogger {
    lifecycle: Level,
}

impl Default for TracingLogger {
    fn default() -> Self {
        Self {
            lifecycle: Level::DEBUG,
        }
    }
}

impl TracingLogger {
    /// Creates a logger reporting started and finished operations at `DEBUG`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a logger reporting started and finished operations at the
    /// level of the configured [`TracingConfig`], if any.
    ///
    /// # Example
    ///
    /// ```
    /// use opflow_core_plugins::{TracingLogger, TracingSetup};
    /// use opflow_system::prelude::*;
    /// use tracing::Level;
    ///
    /// let base = TracingSetup::new()
    ///     .with_level(Level::INFO)
    ///     .configure(&Configuration::new());
    /// let configuration = base.with_logger(TracingLogger::from_configuration(&base));
    ///
    /// assert!(configuration.logger().is_some());
    /// ```
    #[must_use]
    pub fn from_configuration(configuration: &Configuration) -> Self {
        configuration
            .setting::<TracingConfig>()
            .map_or_else(Self::default, |config| {
                Self::default().with_lifecycle_level(config.level)
            })
    }

    /// Sets the level of started and finished notifications.
    #[must_use]
    pub fn with_lifecycle_level(mut self, level: Level) -> Self {
        self.lifecycle = level;
        self
    }

    /// Level of started and finished notifications.
    #[must_use]
    pub fn lifecycle_level(&self) -> Level {
        self.lifecycle
    }

    fn lifecycle(&self, operation: &dyn Operation, message: &str) {
        let name = operation.name();
        match self.lifecycle {
            level if level == Level::TRACE => tracing::trace!(operation = name, "{message}"),
            level if level == Level::DEBUG => tracing::debug!(operation = name, "{message}"),
            level if level == Level::INFO => tracing::info!(operation = name, "{message}"),
            level if level == Level::WARN => tracing::warn!(operation = name, "{message}"),
            _ => tracing::error!(operation = name, "{message}"),
        }
    }
}

impl WorkflowLogger for TracingLogger {
    fn operation_started(&self, operation: &dyn Operation) {
        self.lifecycle(operation, "operation started");
    }

    fn operation_finished(&self, operation: &dyn Operation) {
        self.lifecycle(operation, "operation finished");
    }

    fn operation_failed(&self, operation: &dyn Operation, error: &ExecutionError) {
        tracing::error!(
            operation = operation.name(),
            kind = error.kind(),
            error = %error,
            "operation failed"
        );
    }

    fn behavior_applied(&self, operation: &dyn Operation, behavior: &dyn Behavior, description: &str) {
        tracing::info!(
            operation = operation.name(),
            behavior = behavior.name(),
            description,
            "behavior applied"
        );
    }
}
