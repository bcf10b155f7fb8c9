//! Behavior chains and the algorithm that builds them.
//!
//! An [`Executable`] is the head of a linear chain:
//!
//! ```text
//! outermost behavior -> ... -> innermost behavior -> operation
//! ```
//!
//! [`apply_behaviors`] builds the chain from a base operation by collecting
//! the behaviors of every registered factory, sorting them by precedence and
//! folding the sorted list from the right.

use crate::behavior::{Behavior, Precedence};
use crate::configuration::Configuration;
use crate::error::ExecutionError;
use crate::operation::{ChildContext, Environment, ExecutionContext, Operation};
use crate::output::Outputs;
use crate::resolver::Resolver;

// ─────────────────────────────────────────────────────────────────────────────
// OperationCell
// ─────────────────────────────────────────────────────────────────────────────

/// An operation at the bottom of a chain, executed at most once.
pub struct OperationCell {
    operation: Box<dyn Operation>,
    executed: bool,
}

impl OperationCell {
    fn new(operation: Box<dyn Operation>) -> Self {
        Self {
            operation,
            executed: false,
        }
    }

    /// Returns `true` once the operation body has been started.
    #[must_use]
    pub fn has_executed(&self) -> bool {
        self.executed
    }

    fn execute(&mut self, ctx: &mut ExecutionContext<'_>) -> Result<(), ExecutionError> {
        let name = self.operation.name();
        if self.executed {
            return Err(ExecutionError::AlreadyExecuted { operation: name });
        }
        self.executed = true;

        tracing::trace!(operation = name, "executing operation");
        self.operation
            .on_execute(ctx)
            .map_err(|source| ExecutionError::Operation {
                operation: name,
                source,
            })?;

        let env = ctx.environment();
        let mut scope = Outputs::new();
        let mut children = self.operation.child_operations();

        loop {
            let next = children.next(&ChildContext::new(&scope, env))?;
            let Some(mut child) = next else {
                break;
            };
            child.execute(&mut ExecutionContext::new(&mut scope, env))?;
        }

        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// BehaviorNode
// ─────────────────────────────────────────────────────────────────────────────

/// A behavior together with the executable it wraps.
pub struct BehaviorNode {
    behavior: Box<dyn Behavior>,
    inner: Option<Box<Executable>>,
}

impl BehaviorNode {
    /// Creates a node that is not yet attached to an inner executable.
    #[must_use]
    pub fn new(behavior: Box<dyn Behavior>) -> Self {
        Self {
            behavior,
            inner: None,
        }
    }

    /// Attaches the inner executable.
    ///
    /// # Panics
    ///
    /// Panics if the node is already attached. A behavior wraps exactly one
    /// executable for its whole life.
    pub fn attach(&mut self, inner: Executable) {
        if self.inner.is_some() {
            panic!(
                "Behavior '{}' is already attached to an inner executable.",
                self.behavior.name()
            );
        }
        self.inner = Some(Box::new(inner));
    }

    /// Returns `true` if an inner executable is attached.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.inner.is_some()
    }

    /// Returns the wrapped behavior.
    #[must_use]
    pub fn behavior(&self) -> &dyn Behavior {
        self.behavior.as_ref()
    }

    /// Returns the executable this behavior wraps, if attached.
    #[must_use]
    pub fn inner(&self) -> Option<&Executable> {
        self.inner.as_deref()
    }

    /// Returns the precedence of the wrapped behavior.
    #[must_use]
    pub fn precedence(&self) -> Precedence {
        self.behavior.precedence()
    }

    fn execute(&mut self, ctx: &mut ExecutionContext<'_>) -> Result<(), ExecutionError> {
        let Some(inner) = self.inner.as_deref_mut() else {
            return Err(ExecutionError::Detached {
                behavior: self.behavior.name(),
            });
        };
        self.behavior.execute(inner, ctx)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Executable
// ─────────────────────────────────────────────────────────────────────────────

/// Head of a behavior chain, or a bare operation.
pub enum Executable {
    /// A bare operation.
    Operation(OperationCell),
    /// A behavior wrapping the rest of the chain.
    Behavior(BehaviorNode),
}

impl Executable {
    /// Wraps an operation without any behaviors.
    pub fn new<O: Operation>(operation: O) -> Self {
        Self::from_boxed(Box::new(operation))
    }

    /// Wraps a boxed operation without any behaviors.
    #[must_use]
    pub fn from_boxed(operation: Box<dyn Operation>) -> Self {
        Self::Operation(OperationCell::new(operation))
    }

    /// Executes the chain within the given sibling scope.
    ///
    /// # Errors
    ///
    /// Returns the first failure raised by the chain that no behavior
    /// suppressed.
    pub fn execute(&mut self, ctx: &mut ExecutionContext<'_>) -> Result<(), ExecutionError> {
        match self {
            Self::Operation(cell) => cell.execute(ctx),
            Self::Behavior(node) => node.execute(ctx),
        }
    }

    /// Executes the chain as a root without a resolver.
    ///
    /// Children must be declared statically; creating children through the
    /// [`ChildContext`] fails with a resolution error.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub fn run(&mut self) -> Result<(), ExecutionError> {
        let mut scope = Outputs::new();
        self.execute(&mut ExecutionContext::new(&mut scope, Environment::default()))
    }

    /// Executes the chain as a root, resolving dynamic children with
    /// `resolver` under `configuration`.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub fn run_with(
        &mut self,
        resolver: &Resolver,
        configuration: &Configuration,
    ) -> Result<(), ExecutionError> {
        let mut scope = Outputs::new();
        let env = Environment::new(resolver, configuration);
        self.execute(&mut ExecutionContext::new(&mut scope, env))
    }

    /// Returns the operation at the bottom of the chain.
    ///
    /// # Panics
    ///
    /// Panics if a behavior in the chain was never attached. Chains built by
    /// [`apply_behaviors`] are always fully attached.
    #[must_use]
    pub fn operation(&self) -> &dyn Operation {
        match self {
            Self::Operation(cell) => cell.operation.as_ref(),
            Self::Behavior(node) => node
                .inner()
                .unwrap_or_else(|| {
                    panic!("Behavior '{}' is not attached.", node.behavior().name())
                })
                .operation(),
        }
    }

    /// Returns the behavior at the head of the chain, if any.
    #[must_use]
    pub fn behavior(&self) -> Option<&dyn Behavior> {
        match self {
            Self::Operation(_) => None,
            Self::Behavior(node) => Some(node.behavior()),
        }
    }

    /// Returns the executable wrapped by the head behavior.
    #[must_use]
    pub fn inner(&self) -> Option<&Executable> {
        match self {
            Self::Operation(_) => None,
            Self::Behavior(node) => node.inner(),
        }
    }

    /// Returns the precedence of the head behavior.
    #[must_use]
    pub fn precedence(&self) -> Option<Precedence> {
        self.behavior().map(Behavior::precedence)
    }

    /// Returns the precedences of the chain, outermost first.
    #[must_use]
    pub fn precedences(&self) -> Vec<Precedence> {
        let mut precedences = Vec::new();
        let mut current = Some(self);
        while let Some(executable) = current {
            if let Some(precedence) = executable.precedence() {
                precedences.push(precedence);
            }
            current = executable.inner();
        }
        precedences
    }
}

impl From<Box<dyn Operation>> for Executable {
    fn from(operation: Box<dyn Operation>) -> Self {
        Self::from_boxed(operation)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Chaining
// ─────────────────────────────────────────────────────────────────────────────

/// Wraps `operation` in every behavior the configured factories produce.
///
/// 1. Factories are queried in registration order and their results
///    concatenated, keeping each factory's own order.
/// 2. The list is stably sorted by precedence, so ties keep factory
///    registration order first and within-factory order second.
/// 3. The sorted list is folded from the right: the last behavior wraps the
///    operation and the first one ends up outermost.
///
/// With no behaviors the bare operation is returned.
#[must_use]
pub fn apply_behaviors(operation: Box<dyn Operation>, configuration: &Configuration) -> Executable {
    let mut behaviors: Vec<Box<dyn Behavior>> = Vec::new();
    for factory in configuration.behavior_factories() {
        let created = factory.create_behaviors(operation.as_ref(), configuration);
        tracing::trace!(
            factory = factory.name(),
            operation = operation.name(),
            count = created.len(),
            "collected behaviors"
        );
        behaviors.extend(created);
    }

    // `sort_by_key` is stable.
    behaviors.sort_by_key(|behavior| behavior.precedence());

    behaviors
        .into_iter()
        .rev()
        .fold(Executable::from_boxed(operation), |inner, behavior| {
            let mut node = BehaviorNode::new(behavior);
            node.attach(inner);
            Executable::Behavior(node)
        })
}
