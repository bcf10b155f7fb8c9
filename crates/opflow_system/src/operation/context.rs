//! Execution contexts handed to operations and child sequences.

use crate::behavior::Executable;
use crate::configuration::Configuration;
use crate::error::ResolutionError;
use crate::operation::Operation;
use crate::output::{Output, Outputs};
use crate::resolver::{Resolvable, Resolver};

/// The resolver and configuration a tree is executing under.
///
/// Both are optional: a tree built by hand and run with
/// [`Executable::run`] has neither, and can then only execute statically
/// declared children.
#[derive(Clone, Copy, Default)]
pub struct Environment<'a> {
    resolver: Option<&'a Resolver>,
    configuration: Option<&'a Configuration>,
}

impl<'a> Environment<'a> {
    /// Creates an environment that can resolve child operations.
    #[must_use]
    pub fn new(resolver: &'a Resolver, configuration: &'a Configuration) -> Self {
        Self {
            resolver: Some(resolver),
            configuration: Some(configuration),
        }
    }

    /// Returns the resolver, if any.
    #[must_use]
    pub fn resolver(&self) -> Option<&'a Resolver> {
        self.resolver
    }

    /// Returns the configuration, if any.
    #[must_use]
    pub fn configuration(&self) -> Option<&'a Configuration> {
        self.configuration
    }

    /// Resolves an operation under this environment.
    pub(crate) fn create<O: Operation + Resolvable>(&self) -> Result<Executable, ResolutionError> {
        match (self.resolver, self.configuration) {
            (Some(resolver), Some(configuration)) => resolver.resolve::<O>(configuration),
            _ => Err(ResolutionError::new(
                core::any::type_name::<O>(),
                "no resolver is available to create operations",
                vec![core::any::type_name::<O>()],
            )),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ExecutionContext
// ─────────────────────────────────────────────────────────────────────────────

/// Context passed to an operation body and to the behaviors wrapping it.
///
/// The context exposes the sibling scope: values delivered by earlier
/// siblings can be read, and values delivered here become visible to later
/// siblings.
pub struct ExecutionContext<'a> {
    env: Environment<'a>,
    scope: &'a mut Outputs,
}

impl<'a> ExecutionContext<'a> {
    /// Creates a context over the given sibling scope.
    pub fn new(scope: &'a mut Outputs, env: Environment<'a>) -> Self {
        Self { env, scope }
    }

    /// Returns the latest value of type `T` delivered by an earlier sibling.
    ///
    /// `None` means no earlier sibling delivered a `T`; whether that is an
    /// error is up to the operation.
    #[must_use]
    pub fn input<T: Output>(&self) -> Option<&T> {
        self.scope.get::<T>()
    }

    /// Delivers a value to later siblings, shadowing any earlier `T`.
    pub fn deliver<T: Output>(&mut self, value: T) {
        self.scope.insert(value);
    }

    /// Returns the environment this execution runs under.
    #[must_use]
    pub fn environment(&self) -> Environment<'a> {
        self.env
    }

    /// Returns the configuration, if the tree runs under one.
    #[must_use]
    pub fn configuration(&self) -> Option<&'a Configuration> {
        self.env.configuration()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ChildContext
// ─────────────────────────────────────────────────────────────────────────────

/// Context passed to a child sequence each time a child is pulled.
///
/// It sees the outputs delivered by the children executed so far and can
/// resolve new children through the environment's resolver.
pub struct ChildContext<'a> {
    outputs: &'a Outputs,
    env: Environment<'a>,
}

impl<'a> ChildContext<'a> {
    /// Creates a child context over the parent's child scope.
    #[must_use]
    pub fn new(outputs: &'a Outputs, env: Environment<'a>) -> Self {
        Self { outputs, env }
    }

    /// Returns the latest value of type `T` delivered by a child so far.
    #[must_use]
    pub fn output<T: Output>(&self) -> Option<&'a T> {
        self.outputs.get::<T>()
    }

    /// Resolves a new child operation, wrapped in its behaviors.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError`] if the tree runs without a resolver or
    /// if the operation's dependencies cannot be resolved.
    pub fn create<O: Operation + Resolvable>(&self) -> Result<Executable, ResolutionError> {
        self.env.create::<O>()
    }

    /// Returns the environment this execution runs under.
    #[must_use]
    pub fn environment(&self) -> Environment<'a> {
        self.env
    }
}
