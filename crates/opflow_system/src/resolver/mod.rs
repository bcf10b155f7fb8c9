//! Recursive operation and dependency resolution.
//!
//! The [`Resolver`] builds an operation together with its dependencies and
//! wraps the result in the behaviors of a [`Configuration`].
//!
//! # Dependency registration
//!
//! Dependencies are registered as `key type -> concrete type`. The key is the
//! parameter type an initializer asks for; the concrete type is what gets
//! built and converted into the key:
//!
//! ```
//! use opflow_system::prelude::*;
//!
//! trait Store: Send {}
//!
//! struct MemoryStore;
//! impl Store for MemoryStore {}
//!
//! impl Resolvable for MemoryStore {
//!     fn initializers() -> Vec<Initializer<Self>> {
//!         vec![Initializer::new(|| MemoryStore)]
//!     }
//! }
//!
//! impl From<MemoryStore> for Box<dyn Store> {
//!     fn from(store: MemoryStore) -> Self {
//!         Box::new(store)
//!     }
//! }
//!
//! struct Persist {
//!     store: Box<dyn Store>,
//! }
//!
//! impl Resolvable for Persist {
//!     fn initializers() -> Vec<Initializer<Self>> {
//!         vec![Initializer::new(|store: Box<dyn Store>| Persist { store })]
//!     }
//! }
//!
//! impl Operation for Persist {
//!     fn on_execute(&mut self, _ctx: &mut ExecutionContext<'_>) -> Result<(), OperationError> {
//!         Ok(())
//!     }
//! }
//!
//! let mut resolver = Resolver::new();
//! resolver.register_dependency::<Box<dyn Store>, MemoryStore>();
//!
//! let mut persist = resolver.resolve::<Persist>(&Configuration::new()).unwrap();
//! persist.run().unwrap();
//! ```
//!
//! # Resolution
//!
//! Resolving a type first validates the whole dependency graph, then builds
//! it. Nothing is constructed when any part of the graph is unresolvable:
//!
//! 1. The type must declare exactly one [`Initializer`].
//! 2. Every parameter type must be registered, and the registered concrete
//!    type must itself be resolvable, recursively.
//! 3. Every parameter receives a freshly built value; nothing is cached.

mod initializer;

pub use initializer::{Arguments, DependencyKey, Initializer, IntoInitializer, Resolvable};

use hashbrown::HashMap;

use initializer::BoxedValue;

use crate::behavior::{Executable, apply_behaviors};
use crate::configuration::Configuration;
use crate::error::{ResolutionError, WorkflowError};
use crate::operation::Operation;

/// Builds the concrete value for one registration, converted into its key.
type ProvideFn = Box<dyn Fn(&Resolver) -> Result<BoxedValue, ResolutionError> + Send + Sync>;

/// Lists the initializer signatures of a registration's concrete type.
type SignaturesFn = fn() -> Vec<Vec<DependencyKey>>;

/// One row of the dependency registration table.
struct Registration {
    concrete: DependencyKey,
    signatures: SignaturesFn,
    provide: ProvideFn,
}

fn signatures_of<T: Resolvable>() -> Vec<Vec<DependencyKey>> {
    T::initializers()
        .into_iter()
        .map(|init| init.parameters().to_vec())
        .collect()
}

/// Builds operations and their dependency graphs.
///
/// The resolver holds only the dependency registration table, which changes
/// through [`register_dependency`](Self::register_dependency) and never
/// through resolution.
#[derive(Default)]
pub struct Resolver {
    registrations: HashMap<DependencyKey, Registration>,
}

impl Resolver {
    /// Creates a resolver with an empty registration table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `C` as the concrete type that satisfies dependencies of
    /// type `K`.
    ///
    /// The last registration for a key wins.
    pub fn register_dependency<K, C>(&mut self) -> &mut Self
    where
        K: Send + 'static,
        C: Resolvable + Into<K>,
    {
        let key = DependencyKey::of::<K>();
        let registration = Registration {
            concrete: DependencyKey::of::<C>(),
            signatures: signatures_of::<C>,
            provide: Box::new(|resolver: &Resolver| {
                let concrete: C = resolver.instantiate::<C>()?;
                Ok(Box::new(Into::<K>::into(concrete)) as BoxedValue)
            }),
        };

        if let Some(previous) = self.registrations.insert(key, registration) {
            tracing::debug!(
                key = key.type_name(),
                previous = previous.concrete.type_name(),
                concrete = core::any::type_name::<C>(),
                "dependency registration replaced"
            );
        }
        self
    }

    /// Returns `true` if dependencies of type `K` can be satisfied.
    #[must_use]
    pub fn is_registered<K: 'static>(&self) -> bool {
        self.registrations.contains_key(&DependencyKey::of::<K>())
    }

    /// Returns the concrete type registered for key `K`.
    #[must_use]
    pub fn registered_concrete<K: 'static>(&self) -> Option<DependencyKey> {
        self.registrations
            .get(&DependencyKey::of::<K>())
            .map(|registration| registration.concrete)
    }

    /// Resolves operation `O` and wraps it in the behaviors of
    /// `configuration`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError`] if `O` or any dependency in its graph
    /// does not declare exactly one initializer, if a dependency type is not
    /// registered, or if the graph contains a cycle.
    pub fn resolve<O: Operation + Resolvable>(
        &self,
        configuration: &Configuration,
    ) -> Result<Executable, ResolutionError> {
        let operation = self.construct::<O>()?;
        let executable = apply_behaviors(Box::new(operation), configuration);
        tracing::debug!(
            operation = core::any::type_name::<O>(),
            behaviors = executable.precedences().len(),
            "operation resolved"
        );
        Ok(executable)
    }

    /// Builds a value of type `T` with its dependencies, without behaviors.
    ///
    /// # Errors
    ///
    /// See [`resolve`](Self::resolve).
    pub fn construct<T: Resolvable>(&self) -> Result<T, ResolutionError> {
        let root = DependencyKey::of::<T>();
        let mut path = Vec::new();
        self.validate(root, root, signatures_of::<T>(), &mut path)?;
        self.instantiate::<T>()
    }

    /// Resolves `O` and runs it with this resolver and `configuration` as
    /// the environment.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Resolution`] if `O` cannot be built and
    /// [`WorkflowError::Execution`] if it ran and failed.
    pub fn run<O: Operation + Resolvable>(
        &self,
        configuration: &Configuration,
    ) -> Result<(), WorkflowError> {
        let mut executable = self
            .resolve::<O>(configuration)
            .map_err(WorkflowError::Resolution)?;
        executable
            .run_with(self, configuration)
            .map_err(WorkflowError::Execution)
    }

    /// Checks that the graph rooted at `key` can be built.
    fn validate(
        &self,
        root: DependencyKey,
        key: DependencyKey,
        signatures: Vec<Vec<DependencyKey>>,
        path: &mut Vec<DependencyKey>,
    ) -> Result<(), ResolutionError> {
        let failure = |message: String, path: &[DependencyKey]| {
            ResolutionError::new(
                root.type_name(),
                message,
                path.iter().map(DependencyKey::type_name).collect(),
            )
        };

        if path.contains(&key) {
            path.push(key);
            return Err(failure(
                format!("dependency cycle through `{}`", key.type_name()),
                path.as_slice(),
            ));
        }
        path.push(key);

        let parameters = match signatures.as_slice() {
            [single] => single,
            [] => {
                return Err(failure(
                    format!("`{}` declares no initializer", key.type_name()),
                    path.as_slice(),
                ));
            }
            several => {
                return Err(failure(
                    format!(
                        "`{}` declares {} initializers; exactly one is required",
                        key.type_name(),
                        several.len()
                    ),
                    path.as_slice(),
                ));
            }
        };

        for parameter in parameters {
            let Some(registration) = self.registrations.get(parameter) else {
                return Err(failure(
                    format!("dependency `{}` is not registered", parameter.type_name()),
                    path.as_slice(),
                ));
            };
            self.validate(
                root,
                registration.concrete,
                (registration.signatures)(),
                path,
            )?;
        }

        path.pop();
        Ok(())
    }

    /// Builds `T` through its single initializer.
    fn instantiate<T: Resolvable>(&self) -> Result<T, ResolutionError> {
        let mut initializers = T::initializers();
        if initializers.len() != 1 {
            let name = core::any::type_name::<T>();
            return Err(ResolutionError::new(
                name,
                format!(
                    "`{}` declares {} initializers; exactly one is required",
                    name,
                    initializers.len()
                ),
                vec![name],
            ));
        }
        let initializer = initializers.remove(0);
        initializer.build(&mut Arguments::new(self))
    }

    /// Builds a fresh value for dependency key `D`.
    pub(crate) fn provide<D: Send + 'static>(&self) -> Result<D, ResolutionError> {
        let key = DependencyKey::of::<D>();
        let registration = self.registrations.get(&key).ok_or_else(|| {
            ResolutionError::new(
                key.type_name(),
                format!("dependency `{}` is not registered", key.type_name()),
                vec![key.type_name()],
            )
        })?;

        let value = (registration.provide)(self)?;
        value.downcast::<D>().map(|boxed| *boxed).map_err(|_| {
            ResolutionError::new(
                key.type_name(),
                format!(
                    "registration for `{}` produced a value of another type",
                    key.type_name()
                ),
                vec![key.type_name()],
            )
        })
    }
}

impl core::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map()
            .entries(
                self.registrations
                    .iter()
                    .map(|(key, registration)| (key, registration.concrete)),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Leaf;

    impl Resolvable for Leaf {
        fn initializers() -> Vec<Initializer<Self>> {
            vec![Initializer::new(|| Leaf)]
        }
    }

    struct Branch {
        _leaf: Leaf,
    }

    impl Resolvable for Branch {
        fn initializers() -> Vec<Initializer<Self>> {
            vec![Initializer::new(|leaf: Leaf| Branch { _leaf: leaf })]
        }
    }

    struct Ouroboros;

    impl Resolvable for Ouroboros {
        fn initializers() -> Vec<Initializer<Self>> {
            vec![Initializer::new(|_tail: Ouroboros| Ouroboros)]
        }
    }

    #[test]
    fn construct_without_dependencies() {
        let resolver = Resolver::new();
        assert!(resolver.construct::<Leaf>().is_ok());
    }

    #[test]
    fn construct_with_registered_dependency() {
        let mut resolver = Resolver::new();
        resolver.register_dependency::<Leaf, Leaf>();

        assert!(resolver.construct::<Branch>().is_ok());
    }

    #[test]
    fn unregistered_dependency_reports_path() {
        let resolver = Resolver::new();

        let err = resolver.construct::<Branch>().err().unwrap();

        assert!(err.message().contains("not registered"));
        assert!(err.requested().ends_with("Branch"));
        assert_eq!(err.path().len(), 1);
    }

    #[test]
    fn cycles_are_resolution_failures() {
        let mut resolver = Resolver::new();
        resolver.register_dependency::<Ouroboros, Ouroboros>();

        let err = resolver.construct::<Ouroboros>().err().unwrap();

        assert!(err.message().contains("cycle"));
    }

    #[test]
    fn registration_is_visible() {
        let mut resolver = Resolver::new();
        assert!(!resolver.is_registered::<Leaf>());

        resolver.register_dependency::<Leaf, Leaf>();

        assert!(resolver.is_registered::<Leaf>());
        assert_eq!(
            resolver.registered_concrete::<Leaf>(),
            Some(DependencyKey::of::<Leaf>())
        );
    }
}
