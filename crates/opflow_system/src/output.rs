//! Output storage for data flowing between sibling operations.
//!
//! Every parent execution owns one [`Outputs`] container shared by its
//! children. A child that delivers a value of type `T` overwrites the current
//! `T` for all later siblings; a child that accepts `T` sees the most recent
//! earlier delivery, or nothing.
//!
//! Outputs never leak out of their scope: values delivered by grandchildren
//! stay in the child's own container.

use core::any::{Any, TypeId};
use hashbrown::HashMap;

/// Marker trait for types that can be delivered between operations.
///
/// Any type that is `Send + 'static` automatically implements `Output`.
pub trait Output: Send + 'static {}

impl<T: Send + 'static> Output for T {}

/// Unique identifier for an output type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OutputId(TypeId);

impl OutputId {
    /// Creates an `OutputId` for the given type.
    #[must_use]
    pub fn of<T: Output>() -> Self {
        Self(TypeId::of::<T>())
    }
}

/// Container holding at most one current value per output type.
///
/// # Example
///
/// ```
/// use opflow_system::output::Outputs;
///
/// struct Invoice { total: u32 }
///
/// let mut outputs = Outputs::new();
/// outputs.insert(Invoice { total: 10 });
/// outputs.insert(Invoice { total: 20 });
///
/// assert_eq!(outputs.get::<Invoice>().map(|i| i.total), Some(20));
/// ```
#[derive(Default)]
pub struct Outputs {
    storage: HashMap<OutputId, Box<dyn Any + Send>>,
}

impl Outputs {
    /// Creates a new empty outputs container.
    #[must_use]
    pub fn new() -> Self {
        Self {
            storage: HashMap::new(),
        }
    }

    /// Stores a value, shadowing any previous value of the same type.
    ///
    /// Returns the shadowed value, if any.
    pub fn insert<T: Output>(&mut self, value: T) -> Option<T> {
        self.storage
            .insert(OutputId::of::<T>(), Box::new(value))
            .and_then(|old| old.downcast::<T>().ok())
            .map(|boxed| *boxed)
    }

    /// Returns the current value of type `T`, if one was delivered.
    #[must_use]
    pub fn get<T: Output>(&self) -> Option<&T> {
        self.storage
            .get(&OutputId::of::<T>())
            .and_then(|value| value.downcast_ref::<T>())
    }

    /// Removes and returns the current value of type `T`.
    pub fn take<T: Output>(&mut self) -> Option<T> {
        self.storage
            .remove(&OutputId::of::<T>())
            .and_then(|value| value.downcast::<T>().ok())
            .map(|boxed| *boxed)
    }

    /// Returns `true` if a value of type `T` is present.
    #[must_use]
    pub fn contains<T: Output>(&self) -> bool {
        self.storage.contains_key(&OutputId::of::<T>())
    }

    /// Returns the number of distinct output types stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Returns `true` if nothing has been delivered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Quote {
        price: u32,
    }

    #[derive(Debug, PartialEq)]
    struct Approval(bool);

    #[test]
    fn insert_and_get() {
        let mut outputs = Outputs::new();
        outputs.insert(Quote { price: 7 });

        assert_eq!(outputs.get::<Quote>(), Some(&Quote { price: 7 }));
    }

    #[test]
    fn insert_shadows_previous_value() {
        let mut outputs = Outputs::new();
        outputs.insert(Quote { price: 1 });

        let old = outputs.insert(Quote { price: 2 });

        assert_eq!(old, Some(Quote { price: 1 }));
        assert_eq!(outputs.get::<Quote>(), Some(&Quote { price: 2 }));
        assert_eq!(outputs.len(), 1);
    }

    #[test]
    fn types_are_stored_independently() {
        let mut outputs = Outputs::new();
        outputs.insert(Quote { price: 3 });
        outputs.insert(Approval(true));

        assert_eq!(outputs.get::<Quote>().map(|q| q.price), Some(3));
        assert_eq!(outputs.get::<Approval>(), Some(&Approval(true)));
    }

    #[test]
    fn missing_type_is_none() {
        let outputs = Outputs::new();

        assert!(outputs.get::<Quote>().is_none());
        assert!(outputs.is_empty());
    }

    #[test]
    fn take_removes_value() {
        let mut outputs = Outputs::new();
        outputs.insert(Approval(false));

        assert_eq!(outputs.take::<Approval>(), Some(Approval(false)));
        assert!(!outputs.contains::<Approval>());
    }

    #[test]
    fn output_id_is_per_type() {
        assert_eq!(OutputId::of::<Quote>(), OutputId::of::<Quote>());
        assert_ne!(OutputId::of::<Quote>(), OutputId::of::<Approval>());
    }
}
