//! Behaviors: decorators adding cross-cutting concerns to operations.
//!
//! A [`Behavior`] wraps exactly one inner [`Executable`] (an operation or
//! another behavior) and decides whether and when to run it. Behaviors are
//! produced by [`BehaviorFactory`] implementations registered on the
//! [`Configuration`], and nested according to their [`Precedence`].
//!
//! # Precedence
//!
//! | Precedence | Position |
//! |------------|----------|
//! | [`Logging`](Precedence::Logging) | outermost |
//! | [`Containment`](Precedence::Containment) | |
//! | [`WorkCompensation`](Precedence::WorkCompensation) | |
//! | [`StateRecovery`](Precedence::StateRecovery) | |
//! | [`PreRecovery`](Precedence::PreRecovery) | innermost |
//!
//! # Example
//!
//! ```
//! use opflow_system::prelude::*;
//!
//! struct Swallow;
//!
//! impl Behavior for Swallow {
//!     fn precedence(&self) -> Precedence {
//!         Precedence::Containment
//!     }
//!
//!     fn execute(
//!         &mut self,
//!         inner: &mut Executable,
//!         ctx: &mut ExecutionContext<'_>,
//!     ) -> Result<(), ExecutionError> {
//!         let _ = inner.execute(ctx);
//!         Ok(())
//!     }
//! }
//! ```

mod chain;

pub use chain::{BehaviorNode, Executable, OperationCell, apply_behaviors};

use downcast_rs::{Downcast, impl_downcast};

use crate::configuration::Configuration;
use crate::error::ExecutionError;
use crate::operation::{ExecutionContext, Operation};

// ─────────────────────────────────────────────────────────────────────────────
// Precedence
// ─────────────────────────────────────────────────────────────────────────────

/// Nesting category of a behavior.
///
/// The order is fixed: a lower rank sits further outside in the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precedence {
    /// Observes everything, including failures contained further in.
    Logging,
    /// Stops failures from propagating.
    Containment,
    /// Compensates work done by a failed operation.
    WorkCompensation,
    /// Restores state after a failure.
    StateRecovery,
    /// Runs closest to the operation, before any recovery.
    PreRecovery,
}

impl Precedence {
    /// All precedences, outermost first.
    pub const ALL: [Precedence; 5] = [
        Precedence::Logging,
        Precedence::Containment,
        Precedence::WorkCompensation,
        Precedence::StateRecovery,
        Precedence::PreRecovery,
    ];

    /// Position in the chain, `0` being outermost.
    #[must_use]
    pub fn rank(self) -> usize {
        self as usize
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Behavior
// ─────────────────────────────────────────────────────────────────────────────

/// A decorator around an operation or another behavior.
///
/// The behavior receives its inner executable on every call and has full
/// control over it: it may skip it, catch or transform its failure, or run
/// code around it.
pub trait Behavior: Downcast + Send {
    /// The nesting category of this behavior.
    fn precedence(&self) -> Precedence;

    /// Executes the behavior around `inner`.
    ///
    /// # Errors
    ///
    /// Returns the inner failure unless the behavior chooses to suppress or
    /// transform it.
    fn execute(
        &mut self,
        inner: &mut Executable,
        ctx: &mut ExecutionContext<'_>,
    ) -> Result<(), ExecutionError>;

    /// Returns the behavior's name for logging.
    fn name(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

impl_downcast!(Behavior);

// ─────────────────────────────────────────────────────────────────────────────
// BehaviorFactory
// ─────────────────────────────────────────────────────────────────────────────

/// Produces the behaviors that apply to an operation.
///
/// Factories are queried in registration order every time an operation is
/// resolved. The order of the returned behaviors is kept for behaviors of
/// equal precedence.
pub trait BehaviorFactory: Send + Sync + 'static {
    /// Returns the behaviors to wrap `operation` in, possibly none.
    fn create_behaviors(
        &self,
        operation: &dyn Operation,
        configuration: &Configuration,
    ) -> Vec<Box<dyn Behavior>>;

    /// Returns the factory's name for debugging.
    fn name(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

impl<F> BehaviorFactory for F
where
    F: Fn(&dyn Operation, &Configuration) -> Vec<Box<dyn Behavior>> + Send + Sync + 'static,
{
    fn create_behaviors(
        &self,
        operation: &dyn Operation,
        configuration: &Configuration,
    ) -> Vec<Box<dyn Behavior>> {
        self(operation, configuration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precedence_orders_outermost_first() {
        let mut shuffled = vec![
            Precedence::StateRecovery,
            Precedence::PreRecovery,
            Precedence::Logging,
            Precedence::WorkCompensation,
            Precedence::Containment,
        ];
        shuffled.sort();

        assert_eq!(shuffled, Precedence::ALL.to_vec());
    }

    #[test]
    fn rank_matches_position() {
        for (index, precedence) in Precedence::ALL.iter().enumerate() {
            assert_eq!(precedence.rank(), index);
        }
    }
}
