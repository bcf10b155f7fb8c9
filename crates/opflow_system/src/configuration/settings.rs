//! Typed ambient settings carried by a configuration.

use core::any::{Any, TypeId};
use std::sync::Arc;

use hashbrown::HashMap;

/// Marker trait for ambient settings stored on a
/// [`Configuration`](super::Configuration).
///
/// Settings are read-only once stored. Behavior factories and behaviors read
/// them to decide what to apply and how.
///
/// # Example
///
/// ```
/// use opflow_system::configuration::{Configuration, Setting};
///
/// struct RetryBudget { attempts: u32 }
/// impl Setting for RetryBudget {}
///
/// let configuration = Configuration::new().with_setting(RetryBudget { attempts: 3 });
/// assert_eq!(configuration.setting::<RetryBudget>().map(|b| b.attempts), Some(3));
/// ```
pub trait Setting: Send + Sync + 'static {}

/// Immutable map of settings, one value per type.
///
/// Cloning is cheap: values are shared.
#[derive(Clone, Default)]
pub(crate) struct Settings {
    values: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl Settings {
    pub(crate) fn insert<T: Setting>(&mut self, value: T) {
        self.values.insert(TypeId::of::<T>(), Arc::new(value));
    }

    pub(crate) fn get<T: Setting>(&self) -> Option<&T> {
        self.values
            .get(&TypeId::of::<T>())
            .and_then(|value| value.downcast_ref::<T>())
    }

    pub(crate) fn contains<T: Setting>(&self) -> bool {
        self.values.contains_key(&TypeId::of::<T>())
    }

    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }
}
