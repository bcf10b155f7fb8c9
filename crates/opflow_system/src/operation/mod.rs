//! Operations: the executable units of work.
//!
//! An [`Operation`] runs its own body, then drains its child sequence. Each
//! child is executed completely (including its own subtree) before the next
//! child is pulled, so a parent can inspect what earlier children delivered
//! before deciding what to run next.
//!
//! # Example
//!
//! ```
//! use opflow_system::operation::{ChildOperations, Operation};
//! use opflow_system::prelude::*;
//!
//! struct Greeting(String);
//!
//! struct Greet;
//!
//! impl Operation for Greet {
//!     fn on_execute(&mut self, ctx: &mut ExecutionContext<'_>) -> Result<(), OperationError> {
//!         ctx.deliver(Greeting("hello".into()));
//!         Ok(())
//!     }
//! }
//!
//! struct Conversation {
//!     heard: Option<String>,
//! }
//!
//! impl Operation for Conversation {
//!     fn on_execute(&mut self, _ctx: &mut ExecutionContext<'_>) -> Result<(), OperationError> {
//!         Ok(())
//!     }
//!
//!     fn child_operations(&mut self) -> ChildOperations<'_> {
//!         let mut started = false;
//!         ChildOperations::lazy(move |cx| {
//!             if !started {
//!                 started = true;
//!                 return Ok(Some(Executable::new(Greet)));
//!             }
//!             self.heard = cx.output::<Greeting>().map(|g| g.0.clone());
//!             Ok(None)
//!         })
//!     }
//! }
//!
//! let mut root = Executable::new(Conversation { heard: None });
//! root.run().unwrap();
//!
//! let conversation = root.operation().downcast_ref::<Conversation>().unwrap();
//! assert_eq!(conversation.heard.as_deref(), Some("hello"));
//! ```

mod context;

pub use context::{ChildContext, Environment, ExecutionContext};

use core::any::{Any, TypeId};
use core::fmt;
use core::hash::{Hash, Hasher};

use downcast_rs::{Downcast, impl_downcast};

use crate::behavior::Executable;
use crate::error::{ExecutionError, OperationError};

// ─────────────────────────────────────────────────────────────────────────────
// OperationId
// ─────────────────────────────────────────────────────────────────────────────

/// Unique identifier for a concrete operation type.
///
/// Behavior factories use it to decide which operations they apply to.
/// Identity is the `TypeId` alone; the name is carried for display.
#[derive(Clone, Copy)]
pub struct OperationId {
    type_id: TypeId,
    type_name: &'static str,
}

impl OperationId {
    /// Creates an `OperationId` for the given operation type.
    #[must_use]
    pub fn of<O: Operation>() -> Self {
        Self {
            type_id: TypeId::of::<O>(),
            type_name: core::any::type_name::<O>(),
        }
    }

    /// Returns the identifier of the concrete type behind `operation`.
    #[must_use]
    pub fn of_val(operation: &dyn Operation) -> Self {
        Self {
            type_id: Any::type_id(operation.as_any()),
            type_name: operation.name(),
        }
    }

    /// Returns the underlying `TypeId`.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the type name for debugging.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl PartialEq for OperationId {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for OperationId {}

impl Hash for OperationId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OperationId").field(&self.type_name).finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Operation
// ─────────────────────────────────────────────────────────────────────────────

/// A unit of executable work.
///
/// Implementors provide the body in [`on_execute`](Self::on_execute) and
/// optionally a child sequence in
/// [`child_operations`](Self::child_operations).
///
/// Data flow between siblings goes through the [`ExecutionContext`]:
/// [`deliver`](ExecutionContext::deliver) hands a value to later siblings and
/// [`input`](ExecutionContext::input) reads the latest value delivered by an
/// earlier sibling.
pub trait Operation: Downcast + Send {
    /// Runs the operation's own body.
    ///
    /// # Errors
    ///
    /// Any error returned here is reported as
    /// [`ExecutionError::Operation`] and propagates outward through the
    /// behavior chain.
    fn on_execute(&mut self, ctx: &mut ExecutionContext<'_>) -> Result<(), OperationError>;

    /// Returns the child sequence for this execution.
    ///
    /// Called exactly once per execution, after the body. The default
    /// sequence is empty.
    fn child_operations(&mut self) -> ChildOperations<'_> {
        ChildOperations::none()
    }

    /// Returns the operation's name for logging.
    fn name(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

impl_downcast!(Operation);

// ─────────────────────────────────────────────────────────────────────────────
// ChildOperations
// ─────────────────────────────────────────────────────────────────────────────

/// Pull function of a lazy child sequence.
type PullFn<'a> =
    Box<dyn FnMut(&ChildContext<'_>) -> Result<Option<Executable>, ExecutionError> + 'a>;

enum Source<'a> {
    Empty,
    Static(std::vec::IntoIter<Executable>),
    Lazy(PullFn<'a>),
}

/// A finite, non-restartable sequence of child operations.
///
/// Children are pulled one at a time. A lazy sequence is only asked for its
/// next child after the previous child finished executing, so it may consult
/// the outputs delivered so far through the [`ChildContext`].
pub struct ChildOperations<'a> {
    source: Source<'a>,
    exhausted: bool,
}

impl<'a> ChildOperations<'a> {
    /// An empty sequence.
    #[must_use]
    pub fn none() -> Self {
        Self {
            source: Source::Empty,
            exhausted: true,
        }
    }

    /// A sequence computed one child at a time.
    ///
    /// The closure returns `Ok(None)` when the sequence is finished; it is
    /// never called again afterwards.
    pub fn lazy<F>(pull: F) -> Self
    where
        F: FnMut(&ChildContext<'_>) -> Result<Option<Executable>, ExecutionError> + 'a,
    {
        Self {
            source: Source::Lazy(Box::new(pull)),
            exhausted: false,
        }
    }

    /// Pulls the next child.
    pub(crate) fn next(
        &mut self,
        cx: &ChildContext<'_>,
    ) -> Result<Option<Executable>, ExecutionError> {
        if self.exhausted {
            return Ok(None);
        }

        let next = match &mut self.source {
            Source::Empty => None,
            Source::Static(children) => children.next(),
            Source::Lazy(pull) => pull(cx)?,
        };

        if next.is_none() {
            self.exhausted = true;
        }
        Ok(next)
    }
}

impl Default for ChildOperations<'_> {
    fn default() -> Self {
        Self::none()
    }
}

impl FromIterator<Executable> for ChildOperations<'_> {
    fn from_iter<I: IntoIterator<Item = Executable>>(iter: I) -> Self {
        Self {
            source: Source::Static(iter.into_iter().collect::<Vec<_>>().into_iter()),
            exhausted: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Noop;

    impl Operation for Noop {
        fn on_execute(&mut self, _ctx: &mut ExecutionContext<'_>) -> Result<(), OperationError> {
            Ok(())
        }
    }

    struct Other;

    impl Operation for Other {
        fn on_execute(&mut self, _ctx: &mut ExecutionContext<'_>) -> Result<(), OperationError> {
            Ok(())
        }
    }

    #[test]
    fn operations_have_no_children_by_default() {
        let mut op = Noop;
        let mut children = op.child_operations();
        let scope = crate::output::Outputs::new();
        let cx = ChildContext::new(&scope, Environment::default());

        assert!(children.next(&cx).unwrap().is_none());
    }

    struct Renamed;

    impl Operation for Renamed {
        fn on_execute(&mut self, _ctx: &mut ExecutionContext<'_>) -> Result<(), OperationError> {
            Ok(())
        }

        fn name(&self) -> &'static str {
            "Renamed"
        }
    }

    #[test]
    fn operation_id_ignores_overridden_names() {
        let by_value = OperationId::of_val(&Renamed);

        assert_eq!(by_value, OperationId::of::<Renamed>());
        assert_eq!(by_value.type_name(), "Renamed");

        let mut ids = hashbrown::HashSet::new();
        ids.insert(OperationId::of::<Renamed>());
        assert!(ids.contains(&by_value));
    }

    #[test]
    fn operation_id_of_val_matches_static_type() {
        let boxed: Box<dyn Operation> = Box::new(Noop);

        assert_eq!(OperationId::of_val(boxed.as_ref()), OperationId::of::<Noop>());
        assert_ne!(OperationId::of_val(boxed.as_ref()), OperationId::of::<Other>());
    }

    #[test]
    fn operation_name_defaults_to_type_name() {
        assert!(Noop.name().ends_with("Noop"));
    }

    #[test]
    fn static_sequence_yields_in_order_then_stops() {
        let mut children: ChildOperations<'_> =
            [Executable::new(Noop), Executable::new(Other)].into_iter().collect();
        let scope = crate::output::Outputs::new();
        let cx = ChildContext::new(&scope, Environment::default());

        let first = children.next(&cx).unwrap().unwrap();
        let second = children.next(&cx).unwrap().unwrap();

        assert!(first.operation().is::<Noop>());
        assert!(second.operation().is::<Other>());
        assert!(children.next(&cx).unwrap().is_none());
        assert!(children.next(&cx).unwrap().is_none());
    }

    #[test]
    fn lazy_sequence_is_not_pulled_after_finishing() {
        let mut pulls = 0;
        {
            let mut children = ChildOperations::lazy(|_cx| {
                pulls += 1;
                Ok(None)
            });
            let scope = crate::output::Outputs::new();
            let cx = ChildContext::new(&scope, Environment::default());

            assert!(children.next(&cx).unwrap().is_none());
            assert!(children.next(&cx).unwrap().is_none());
        }
        assert_eq!(pulls, 1);
    }
}
