//! Initializers: explicit constructor recipes for resolvable types.
//!
//! A type becomes resolvable by listing its initializers. Each initializer is
//! a plain function or closure whose parameters are the type's dependencies:
//!
//! ```
//! use opflow_system::resolver::{Initializer, Resolvable};
//!
//! struct Clock;
//!
//! struct Scheduler {
//!     clock: Clock,
//! }
//!
//! impl Resolvable for Scheduler {
//!     fn initializers() -> Vec<Initializer<Self>> {
//!         vec![Initializer::new(|clock: Clock| Scheduler { clock })]
//!     }
//! }
//! ```
//!
//! The resolver refuses types that list anything other than exactly one
//! initializer.

use core::any::{Any, TypeId};
use core::fmt;

use variadics_please::all_tuples;

use crate::error::ResolutionError;
use crate::resolver::Resolver;

// ─────────────────────────────────────────────────────────────────────────────
// DependencyKey
// ─────────────────────────────────────────────────────────────────────────────

/// Identifies a declared dependency type.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DependencyKey {
    type_id: TypeId,
    type_name: &'static str,
}

impl DependencyKey {
    /// Creates the key for type `T`.
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: core::any::type_name::<T>(),
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

impl fmt::Debug for DependencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Resolvable
// ─────────────────────────────────────────────────────────────────────────────

/// A type the resolver knows how to build.
///
/// The type lists its constructor recipes up front; nothing is discovered at
/// runtime.
pub trait Resolvable: Sized + Send + 'static {
    /// The constructor recipes of this type.
    ///
    /// Exactly one is required for resolution to succeed.
    fn initializers() -> Vec<Initializer<Self>>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Initializer
// ─────────────────────────────────────────────────────────────────────────────

type BuildFn<T> = Box<dyn Fn(&mut Arguments<'_>) -> Result<T, ResolutionError> + Send + Sync>;

/// One constructor recipe: its parameter types and how to call it.
pub struct Initializer<T> {
    parameters: Vec<DependencyKey>,
    build: BuildFn<T>,
}

impl<T: 'static> Initializer<T> {
    /// Creates an initializer from a function of up to eight dependencies.
    pub fn new<Marker>(init: impl IntoInitializer<T, Marker>) -> Self {
        init.into_initializer()
    }

    /// The dependency types this initializer takes, in parameter order.
    #[must_use]
    pub fn parameters(&self) -> &[DependencyKey] {
        &self.parameters
    }

    pub(crate) fn build(&self, arguments: &mut Arguments<'_>) -> Result<T, ResolutionError> {
        (self.build)(arguments)
    }
}

impl<T> fmt::Debug for Initializer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Initializer")
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

/// Supplies resolved dependency values to an initializer.
pub struct Arguments<'r> {
    resolver: &'r Resolver,
}

impl<'r> Arguments<'r> {
    pub(crate) fn new(resolver: &'r Resolver) -> Self {
        Self { resolver }
    }

    /// Resolves a fresh value for dependency type `D`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError`] if `D` is not registered.
    pub fn take<D: Send + 'static>(&mut self) -> Result<D, ResolutionError> {
        self.resolver.provide::<D>()
    }
}

/// Conversion of a function into an [`Initializer`].
///
/// Implemented for functions and closures taking zero to eight parameters,
/// each a dependency type that is `Send + 'static`.
pub trait IntoInitializer<T, Marker> {
    /// Converts this into an initializer.
    fn into_initializer(self) -> Initializer<T>;
}

macro_rules! impl_into_initializer {
    ($($param:ident),*) => {
        impl<F, T, $($param),*> IntoInitializer<T, fn($($param),*) -> T> for F
        where
            F: Fn($($param),*) -> T + Send + Sync + 'static,
            T: 'static,
            $($param: Send + 'static,)*
        {
            fn into_initializer(self) -> Initializer<T> {
                Initializer {
                    parameters: vec![$(DependencyKey::of::<$param>()),*],
                    build: Box::new(move |_arguments: &mut Arguments<'_>| {
                        Ok((self)($(_arguments.take::<$param>()?),*))
                    }),
                }
            }
        }
    };
}

// Generate impls for functions of 0 to 8 parameters
all_tuples!(impl_into_initializer, 0, 8, P);

/// Type-erased constructed dependency value.
pub(crate) type BoxedValue = Box<dyn Any + Send>;
