//! Built-in behaviors and loggers for opflow.
//!
//! This crate provides the pieces most workflows need on top of the engine:
//!
//! - [`OperationLoggingFactory`] - Reports execution to the configured logger
//! - [`ContinueOnFailureFactory`] - Contains failures of selected operations
//! - [`TextWriterLogger`] - Indented hierarchical text log
//! - [`TracingLogger`] - Workflow notifications as `tracing` events
//! - [`TracingSetup`] - Installs the `tracing` subscriber
//! - [`DefaultBehaviors`] - Convenient bundle of the built-in factories
//!
//! # Example
//!
//! ```
//! use opflow_core_plugins::{ContainmentPolicy, DefaultBehaviors, TextWriterLogger};
//! use opflow_system::prelude::*;
//!
//! struct Report;
//!
//! impl Resolvable for Report {
//!     fn initializers() -> Vec<Initializer<Self>> {
//!         vec![Initializer::new(|| Report)]
//!     }
//! }
//!
//! impl Operation for Report {
//!     fn on_execute(&mut self, _ctx: &mut ExecutionContext<'_>) -> Result<(), OperationError> {
//!         Err("printer on fire".into())
//!     }
//! }
//!
//! let configuration = DefaultBehaviors
//!     .configure(&Configuration::new())
//!     .with_logger(TextWriterLogger::new(std::io::sink()))
//!     .with_setting(ContainmentPolicy::new().contain::<Report>());
//!
//! Resolver::new().run::<Report>(&configuration).unwrap();
//! ```
//!
//! # Architecture
//!
//! This crate is part of Layer 1 infrastructure:
//!
//! - **Layer 1** (`opflow_system`): composition engine
//! - **Layer 1** (`opflow_core_plugins`): built-in behaviors and loggers (this crate)

mod containment;
mod logging;
mod text_logger;
mod tracing_logger;
mod tracing_setup;

pub use containment::{ContainmentPolicy, ContinueOnFailureBehavior, ContinueOnFailureFactory};
pub use logging::{ErrorLoggingBehavior, ExecutionLoggingBehavior, OperationLoggingFactory};
pub use text_logger::TextWriterLogger;
pub use tracing_logger::TracingLogger;
pub use tracing_setup::{TracingConfig, TracingFormat, TracingSetup};

use std::sync::Arc;

use opflow_system::behavior::BehaviorFactory;
use opflow_system::configuration::Configuration;

/// The built-in behavior factories, in registration order:
///
/// - [`OperationLoggingFactory`] - Logging, when a logger is configured
/// - [`ContinueOnFailureFactory`] - Containment, per [`ContainmentPolicy`]
///
/// Both factories read the configuration they are resolved under, so the
/// logger and the policy may be added before or after the bundle.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultBehaviors;

impl DefaultBehaviors {
    /// The factories of the bundle.
    #[must_use]
    pub fn factories(&self) -> Vec<Arc<dyn BehaviorFactory>> {
        let logging: Arc<dyn BehaviorFactory> = Arc::new(OperationLoggingFactory);
        let containment: Arc<dyn BehaviorFactory> = Arc::new(ContinueOnFailureFactory);
        vec![logging, containment]
    }

    /// Returns `base` with the bundle's factories appended.
    #[must_use]
    pub fn configure(&self, base: &Configuration) -> Configuration {
        self.factories()
            .into_iter()
            .fold(base.clone(), |configuration, factory| {
                configuration.with_shared_factory(factory)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_behaviors_builds() {
        assert_eq!(DefaultBehaviors.factories().len(), 2);
    }

    #[test]
    fn configure_keeps_existing_factories_first() {
        fn existing(
            _: &dyn opflow_system::operation::Operation,
            _: &Configuration,
        ) -> Vec<Box<dyn opflow_system::behavior::Behavior>> {
            Vec::new()
        }

        let base = Configuration::new().with_behavior_factory(existing);

        let configured = DefaultBehaviors.configure(&base);

        let names: Vec<_> = configured
            .behavior_factories()
            .iter()
            .map(|factory| factory.name())
            .collect();
        assert_eq!(names.len(), 3);
        assert!(names[0].ends_with("existing"));
        assert!(names[1].ends_with("OperationLoggingFactory"));
        assert!(names[2].ends_with("ContinueOnFailureFactory"));
        assert_eq!(base.behavior_factories().len(), 1);
    }
}
