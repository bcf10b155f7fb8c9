//! Shared test utilities for `opflow_core_plugins` integration tests.

#![allow(
    dead_code,
    missing_docs,
    reason = "shared test utilities, not all items used in every test binary"
)]

use std::io::{self, Write};
use std::sync::Arc;

use opflow_system::prelude::*;
use parking_lot::Mutex;

// ═══════════════════════════════════════════════════════════════════════════════
// WRITERS AND LOGGERS
// ═══════════════════════════════════════════════════════════════════════════════

/// In-memory writer whose contents stay readable after it was handed away.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Logger recording each notification as a short line.
#[derive(Clone, Default)]
pub struct RecordingLogger(Arc<Mutex<Vec<String>>>);

impl RecordingLogger {
    pub fn events(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    fn short(name: &str) -> &str {
        name.rsplit("::").next().unwrap_or(name)
    }
}

impl WorkflowLogger for RecordingLogger {
    fn operation_started(&self, operation: &dyn Operation) {
        self.0
            .lock()
            .push(format!("started {}", Self::short(operation.name())));
    }

    fn operation_finished(&self, operation: &dyn Operation) {
        self.0
            .lock()
            .push(format!("finished {}", Self::short(operation.name())));
    }

    fn operation_failed(&self, operation: &dyn Operation, error: &ExecutionError) {
        self.0.lock().push(format!(
            "failed {} [{}]",
            Self::short(operation.name()),
            error.kind()
        ));
    }

    fn behavior_applied(&self, operation: &dyn Operation, behavior: &dyn Behavior, _description: &str) {
        self.0.lock().push(format!(
            "applied {} to {}",
            Self::short(behavior.name()),
            Self::short(operation.name())
        ));
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// OPERATIONS
// ═══════════════════════════════════════════════════════════════════════════════

/// Leaf that always succeeds.
pub struct FetchOrders;

impl Resolvable for FetchOrders {
    fn initializers() -> Vec<Initializer<Self>> {
        vec![Initializer::new(|| FetchOrders)]
    }
}

impl Operation for FetchOrders {
    fn on_execute(&mut self, _ctx: &mut ExecutionContext<'_>) -> Result<(), OperationError> {
        Ok(())
    }
}

/// Leaf that always fails with "disk full".
pub struct StoreOrders;

impl Resolvable for StoreOrders {
    fn initializers() -> Vec<Initializer<Self>> {
        vec![Initializer::new(|| StoreOrders)]
    }
}

impl Operation for StoreOrders {
    fn on_execute(&mut self, _ctx: &mut ExecutionContext<'_>) -> Result<(), OperationError> {
        Err("disk full".into())
    }
}

/// Root creating `FetchOrders` then `StoreOrders` through the resolver.
pub struct ImportOrders;

impl Resolvable for ImportOrders {
    fn initializers() -> Vec<Initializer<Self>> {
        vec![Initializer::new(|| ImportOrders)]
    }
}

impl Operation for ImportOrders {
    fn on_execute(&mut self, _ctx: &mut ExecutionContext<'_>) -> Result<(), OperationError> {
        Ok(())
    }

    fn child_operations(&mut self) -> ChildOperations<'_> {
        let mut step = 0;
        ChildOperations::lazy(move |cx| {
            step += 1;
            match step {
                1 => Ok(Some(cx.create::<FetchOrders>()?)),
                2 => Ok(Some(cx.create::<StoreOrders>()?)),
                _ => Ok(None),
            }
        })
    }
}
