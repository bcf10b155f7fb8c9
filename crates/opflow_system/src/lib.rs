//! The composition engine of opflow.
//!
//! `opflow_system` provides the primitives for building executable operation
//! trees:
//!
//! - [`operation`] - Operations, child sequences and data flow
//! - [`output`] - Type-keyed storage for values flowing between siblings
//! - [`behavior`] - Behaviors, precedence and chain construction
//! - [`configuration`] - Behavior factories, logger and ambient settings
//! - [`resolver`] - Recursive dependency resolution
//! - [`error`] - Resolution and execution errors
//!
//! # Architecture
//!
//! - **Layer 1** (`opflow_system`): composition engine (this crate)
//! - **Layer 1** (`opflow_core_plugins`): built-in behaviors and loggers
//!
//! # Example
//!
//! ```
//! use opflow_system::prelude::*;
//!
//! struct Hello;
//!
//! impl Resolvable for Hello {
//!     fn initializers() -> Vec<Initializer<Self>> {
//!         vec![Initializer::new(|| Hello)]
//!     }
//! }
//!
//! impl Operation for Hello {
//!     fn on_execute(&mut self, _ctx: &mut ExecutionContext<'_>) -> Result<(), OperationError> {
//!         Ok(())
//!     }
//! }
//!
//! let resolver = Resolver::new();
//! resolver.run::<Hello>(&Configuration::new()).unwrap();
//! ```

/// Behaviors and behavior chains.
pub mod behavior;

/// Workflow configuration.
pub mod configuration;

/// Error types.
pub mod error;

/// Operations and execution contexts.
pub mod operation;

/// Data flow storage.
pub mod output;

/// Dependency resolution.
pub mod resolver;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::behavior::{
        Behavior, BehaviorFactory, BehaviorNode, Executable, Precedence, apply_behaviors,
    };
    pub use crate::configuration::{Configuration, Setting, WorkflowLogger};
    pub use crate::error::{ExecutionError, OperationError, ResolutionError, WorkflowError};
    pub use crate::operation::{
        ChildContext, ChildOperations, Environment, ExecutionContext, Operation, OperationId,
    };
    pub use crate::output::{Output, OutputId, Outputs};
    pub use crate::resolver::{DependencyKey, Initializer, Resolvable, Resolver};
}
