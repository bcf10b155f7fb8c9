//! Hierarchical text logger.
//!
//! [`TextWriterLogger`] writes an indented tree of the executed operations,
//! the failures they raised and the behaviors that changed their flow:
//!
//! ```text
//! ImportOrders {
//!   FetchOrders
//!
//!   StoreOrders {
//!     Error [OperationFailed]: disk full
//!   }
//! }
//! ```
//!
//! An operation without nested entries is written on a single line. Sibling
//! entries are separated by a blank line.

use std::io::{self, Write};

use opflow_system::prelude::*;
use parking_lot::Mutex;

/// Writes a hierarchical log of a workflow to any [`Write`] sink.
///
/// # Panics
///
/// Reporting a finish, failure or applied behavior while no operation is
/// open is a misuse of the logger and panics.
pub struct TextWriterLogger<W> {
    state: Mutex<State<W>>,
}

struct State<W> {
    writer: W,
    /// Number of entries written so far at each open level, outermost first.
    levels: Vec<usize>,
}

impl<W: Write + Send + 'static> TextWriterLogger<W> {
    /// Creates a logger writing to `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            state: Mutex::new(State {
                writer,
                levels: Vec::new(),
            }),
        }
    }

    /// Consumes the logger and returns the writer.
    pub fn into_inner(self) -> W {
        self.state.into_inner().writer
    }
}

impl TextWriterLogger<io::Stdout> {
    /// Creates a logger writing to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> State<W> {
    /// Opens an entry inside the current level: ends the previous line and
    /// indents.
    fn begin_entry(&mut self, out: &mut String) {
        if let Some(written) = self.levels.last_mut() {
            if *written == 0 {
                out.push_str(" {");
            }
            out.push('\n');
            if *written > 0 {
                out.push('\n');
            }
            *written += 1;
        }
        indent(out, self.levels.len());
    }

    fn open_level(&self, what: &str) {
        if self.levels.is_empty() {
            panic!("No operation was logged as started so {what} cannot be logged.");
        }
    }

    fn flush(&mut self, out: &str) {
        if let Err(error) = self
            .writer
            .write_all(out.as_bytes())
            .and_then(|()| self.writer.flush())
        {
            tracing::warn!(%error, "failed to write workflow log");
        }
    }
}

fn indent(out: &mut String, depth: usize) {
    out.extend(core::iter::repeat_n(' ', 2 * depth));
}

/// Returns a type name without module path or generic arguments.
fn short_name(type_name: &str) -> &str {
    let base = type_name.split('<').next().unwrap_or(type_name);
    base.rsplit("::").next().unwrap_or(base)
}

/// Returns the message of `error` without the operation prefix.
fn error_message(error: &ExecutionError) -> String {
    match error {
        ExecutionError::Operation { source, .. } => source.to_string(),
        other => other.to_string(),
    }
}

impl<W: Write + Send + 'static> WorkflowLogger for TextWriterLogger<W> {
    fn operation_started(&self, operation: &dyn Operation) {
        let mut state = self.state.lock();
        let mut out = String::new();
        state.begin_entry(&mut out);
        out.push_str(short_name(operation.name()));
        state.levels.push(0);
        state.flush(&out);
    }

    fn operation_finished(&self, _operation: &dyn Operation) {
        let mut state = self.state.lock();
        state.open_level("a finished operation");
        let written = state.levels.pop().unwrap_or_default();
        if written > 0 {
            let mut out = String::from("\n");
            indent(&mut out, state.levels.len());
            out.push('}');
            state.flush(&out);
        }
    }

    fn operation_failed(&self, _operation: &dyn Operation, error: &ExecutionError) {
        let mut state = self.state.lock();
        state.open_level("an operation failure");
        let mut out = String::new();
        state.begin_entry(&mut out);
        out.push_str(&format!("Error [{}]: {}", error.kind(), error_message(error)));
        state.flush(&out);
    }

    fn behavior_applied(&self, _operation: &dyn Operation, behavior: &dyn Behavior, description: &str) {
        let mut state = self.state.lock();
        state.open_level("an operation behavior");
        let mut out = String::new();
        state.begin_entry(&mut out);
        out.push_str(short_name(behavior.name()));
        out.push_str(": ");
        out.push_str(description);
        state.flush(&out);
    }
}
