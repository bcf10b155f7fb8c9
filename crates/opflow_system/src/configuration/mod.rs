//! Workflow configuration.
//!
//! A [`Configuration`] carries everything a resolution needs beyond the
//! dependency table:
//!
//! - the ordered list of [`BehaviorFactory`] registrations,
//! - an optional [`WorkflowLogger`],
//! - typed ambient [`Setting`]s read by factories and behaviors.
//!
//! Configurations are values. Extending one returns a new configuration and
//! leaves the original untouched, so a configuration handed to a running
//! resolution never changes underneath it.
//!
//! # Example
//!
//! ```
//! use opflow_system::prelude::*;
//!
//! fn no_behaviors(_: &dyn Operation, _: &Configuration) -> Vec<Box<dyn Behavior>> {
//!     Vec::new()
//! }
//!
//! let base = Configuration::new();
//! let extended = base.with_behavior_factory(no_behaviors);
//!
//! assert_eq!(base.behavior_factories().len(), 0);
//! assert_eq!(extended.behavior_factories().len(), 1);
//! ```

mod settings;

pub use settings::Setting;

use std::sync::Arc;

use settings::Settings;

use crate::behavior::{Behavior, BehaviorFactory};
use crate::error::ExecutionError;
use crate::operation::Operation;

// ─────────────────────────────────────────────────────────────────────────────
// WorkflowLogger
// ─────────────────────────────────────────────────────────────────────────────

/// Receives notifications about executing operations.
///
/// Logging behaviors call these at the right points; formatting is entirely
/// up to the implementation.
pub trait WorkflowLogger: Send + Sync + 'static {
    /// An operation started executing.
    fn operation_started(&self, operation: &dyn Operation);

    /// An operation finished executing, successfully or not.
    fn operation_finished(&self, operation: &dyn Operation);

    /// An operation failed with `error`.
    fn operation_failed(&self, operation: &dyn Operation, error: &ExecutionError);

    /// A behavior changed the normal execution flow of `operation`.
    fn behavior_applied(&self, operation: &dyn Operation, behavior: &dyn Behavior, description: &str);
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Behavior factories, logger and ambient settings for a workflow.
#[derive(Clone, Default)]
pub struct Configuration {
    factories: Vec<Arc<dyn BehaviorFactory>>,
    logger: Option<Arc<dyn WorkflowLogger>>,
    settings: Settings,
}

impl Configuration {
    /// Creates an empty configuration: no factories, no logger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new configuration with `factory` appended.
    #[must_use]
    pub fn with_behavior_factory(&self, factory: impl BehaviorFactory) -> Self {
        self.with_shared_factory(Arc::new(factory))
    }

    /// Returns a new configuration with an already shared factory appended.
    #[must_use]
    pub fn with_shared_factory(&self, factory: Arc<dyn BehaviorFactory>) -> Self {
        let mut next = self.clone();
        next.factories.push(factory);
        next
    }

    /// Returns a new configuration using `logger`.
    #[must_use]
    pub fn with_logger(&self, logger: impl WorkflowLogger) -> Self {
        self.with_shared_logger(Arc::new(logger))
    }

    /// Returns a new configuration using an already shared logger.
    #[must_use]
    pub fn with_shared_logger(&self, logger: Arc<dyn WorkflowLogger>) -> Self {
        let mut next = self.clone();
        next.logger = Some(logger);
        next
    }

    /// Returns a new configuration with `value` stored as a setting.
    ///
    /// A setting of the same type is replaced.
    #[must_use]
    pub fn with_setting<T: Setting>(&self, value: T) -> Self {
        let mut next = self.clone();
        next.settings.insert(value);
        next
    }

    /// Registered behavior factories, in registration order.
    #[must_use]
    pub fn behavior_factories(&self) -> &[Arc<dyn BehaviorFactory>] {
        &self.factories
    }

    /// The configured logger, if any.
    #[must_use]
    pub fn logger(&self) -> Option<&Arc<dyn WorkflowLogger>> {
        self.logger.as_ref()
    }

    /// Returns the setting of type `T`, if present.
    #[must_use]
    pub fn setting<T: Setting>(&self) -> Option<&T> {
        self.settings.get::<T>()
    }

    /// Returns `true` if a setting of type `T` is present.
    #[must_use]
    pub fn has_setting<T: Setting>(&self) -> bool {
        self.settings.contains::<T>()
    }
}

impl core::fmt::Debug for Configuration {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Configuration")
            .field(
                "factories",
                &self.factories.iter().map(|f| f.name()).collect::<Vec<_>>(),
            )
            .field("logger", &self.logger.is_some())
            .field("settings", &self.settings.len())
            .finish()
    }
}
