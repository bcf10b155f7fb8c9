//! Composable operation workflows with decorating behaviors and dependency
//! resolution.
//!

pub use opflow_internal::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use opflow_internal::prelude::*;
}
