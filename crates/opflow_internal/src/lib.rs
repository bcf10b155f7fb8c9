//! # opflow Internal Library
//!
//! Re-exports the core opflow crates for convenience.

/// Layer 1: operation trees, behavior chaining and dependency resolution.
pub use opflow_system;

/// Layer 1: built-in behaviors, loggers and tracing setup.
pub use opflow_core_plugins;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use opflow_core_plugins::{
        ContainmentPolicy, DefaultBehaviors, TextWriterLogger, TracingLogger, TracingSetup,
    };
    pub use opflow_system::prelude::*;
}
