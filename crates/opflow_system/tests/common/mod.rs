//! Shared test utilities for `opflow_system` integration tests.
//!
//! Import via `mod common;` in test files.

#![allow(
    dead_code,
    missing_docs,
    reason = "shared test utilities, not all items used in every test binary"
)]

use std::sync::Arc;

use opflow_system::prelude::*;
use parking_lot::Mutex;

// ═══════════════════════════════════════════════════════════════════════════════
// EXECUTION LOG
// ═══════════════════════════════════════════════════════════════════════════════

/// Records the order in which operations and behaviors ran.
#[derive(Clone, Default)]
pub struct ExecutionLog(Arc<Mutex<Vec<String>>>);

impl ExecutionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, entry: impl Into<String>) {
        self.0.lock().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().clone()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// OPERATIONS
// ═══════════════════════════════════════════════════════════════════════════════

/// Operation that records its label, optionally fails, and runs static
/// children.
pub struct FakeOperation {
    pub label: &'static str,
    pub log: ExecutionLog,
    pub fail_with: Option<&'static str>,
    pub children: Vec<Executable>,
}

impl FakeOperation {
    pub fn new(label: &'static str, log: &ExecutionLog) -> Self {
        Self {
            label,
            log: log.clone(),
            fail_with: None,
            children: Vec::new(),
        }
    }

    pub fn failing(mut self, message: &'static str) -> Self {
        self.fail_with = Some(message);
        self
    }

    pub fn with_child<O: Operation>(mut self, child: O) -> Self {
        self.children.push(Executable::new(child));
        self
    }

    pub fn with_executable(mut self, child: Executable) -> Self {
        self.children.push(child);
        self
    }
}

impl Operation for FakeOperation {
    fn on_execute(&mut self, _ctx: &mut ExecutionContext<'_>) -> Result<(), OperationError> {
        self.log.record(self.label);
        match self.fail_with {
            Some(message) => Err(message.into()),
            None => Ok(()),
        }
    }

    fn child_operations(&mut self) -> ChildOperations<'_> {
        self.children.drain(..).collect()
    }
}

/// Operation delivering a fixed value of type `T`.
pub struct FakeOutputOperation<T> {
    pub value: Option<T>,
}

impl<T: Output> FakeOutputOperation<T> {
    pub fn new(value: T) -> Self {
        Self { value: Some(value) }
    }
}

impl<T: Output> Operation for FakeOutputOperation<T> {
    fn on_execute(&mut self, ctx: &mut ExecutionContext<'_>) -> Result<(), OperationError> {
        if let Some(value) = self.value.take() {
            ctx.deliver(value);
        }
        Ok(())
    }
}

/// Operation accepting a value of type `T` and publishing what it received.
pub struct FakeInputOperation<T> {
    pub received: Arc<Mutex<Option<T>>>,
    pub was_executed: Arc<Mutex<bool>>,
}

impl<T> FakeInputOperation<T> {
    pub fn new() -> Self {
        Self {
            received: Arc::new(Mutex::new(None)),
            was_executed: Arc::new(Mutex::new(false)),
        }
    }

    pub fn probe(&self) -> (Arc<Mutex<Option<T>>>, Arc<Mutex<bool>>) {
        (self.received.clone(), self.was_executed.clone())
    }
}

impl<T: Output + Clone> Operation for FakeInputOperation<T> {
    fn on_execute(&mut self, ctx: &mut ExecutionContext<'_>) -> Result<(), OperationError> {
        *self.received.lock() = ctx.input::<T>().cloned();
        *self.was_executed.lock() = true;
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// BEHAVIORS
// ═══════════════════════════════════════════════════════════════════════════════

/// Behavior that records entering and leaving, and always runs its inner
/// executable.
pub struct FakeBehavior {
    pub precedence: Precedence,
    pub label: &'static str,
    pub log: ExecutionLog,
}

impl Behavior for FakeBehavior {
    fn precedence(&self) -> Precedence {
        self.precedence
    }

    fn execute(
        &mut self,
        inner: &mut Executable,
        ctx: &mut ExecutionContext<'_>,
    ) -> Result<(), ExecutionError> {
        self.log.record(format!("enter {}", self.label));
        let result = inner.execute(ctx);
        self.log.record(format!("leave {}", self.label));
        result
    }
}

/// Factory producing one [`FakeBehavior`] per configured entry, in order.
#[derive(Clone, Default)]
pub struct FakeBehaviorFactory {
    pub behaviors: Vec<(Precedence, &'static str)>,
    pub log: ExecutionLog,
}

impl FakeBehaviorFactory {
    pub fn new(log: &ExecutionLog) -> Self {
        Self {
            behaviors: Vec::new(),
            log: log.clone(),
        }
    }

    pub fn with(mut self, precedence: Precedence, label: &'static str) -> Self {
        self.behaviors.push((precedence, label));
        self
    }
}

impl BehaviorFactory for FakeBehaviorFactory {
    fn create_behaviors(
        &self,
        _operation: &dyn Operation,
        _configuration: &Configuration,
    ) -> Vec<Box<dyn Behavior>> {
        self.behaviors
            .iter()
            .map(|&(precedence, label)| {
                Box::new(FakeBehavior {
                    precedence,
                    label,
                    log: self.log.clone(),
                }) as Box<dyn Behavior>
            })
            .collect()
    }
}

/// Walks a chain and returns the labels of its `FakeBehavior`s, outermost
/// first.
pub fn behavior_labels(executable: &Executable) -> Vec<&'static str> {
    let mut labels = Vec::new();
    let mut current = Some(executable);
    while let Some(executable) = current {
        if let Some(fake) = executable
            .behavior()
            .and_then(|behavior| behavior.downcast_ref::<FakeBehavior>())
        {
            labels.push(fake.label);
        }
        current = executable.inner();
    }
    labels
}
