//! Error types for resolution and execution.
//!
//! Failures fall into two reported categories, plus contract violations:
//!
//! | Category | Type | Meaning |
//! |----------|------|---------|
//! | Resolution failure | [`ResolutionError`] | The requested type graph cannot be built from current registrations |
//! | Execution failure | [`ExecutionError`] | The workflow ran and an operation (or behavior) failed |
//! | Contract violation | panic | A bug in the calling or configuring code |
//!
//! [`WorkflowError`] joins the first two for callers that resolve and execute
//! in a single step.

/// Boxed error returned by operation bodies.
///
/// Operation bodies can use `?` on any error type that converts into a boxed
/// error, including plain strings.
pub type OperationError = Box<dyn core::error::Error + Send + Sync + 'static>;

// ─────────────────────────────────────────────────────────────────────────────
// ResolutionError
// ─────────────────────────────────────────────────────────────────────────────

/// A requested type graph cannot be satisfied by the current registrations.
///
/// All resolution failures share this single type: an unregistered dependency,
/// an ambiguous or missing initializer, and a dependency cycle are told apart
/// by the message and by the [`path`](Self::path) that led to the failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot resolve `{requested}`: {message}{}", via(.path))]
pub struct ResolutionError {
    requested: &'static str,
    message: String,
    path: Vec<&'static str>,
}

impl ResolutionError {
    pub(crate) fn new(
        requested: &'static str,
        message: impl Into<String>,
        path: Vec<&'static str>,
    ) -> Self {
        Self {
            requested,
            message: message.into(),
            path,
        }
    }

    /// Type name of the root type whose resolution failed.
    #[must_use]
    pub fn requested(&self) -> &'static str {
        self.requested
    }

    /// Human-readable reason for the failure.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Chain of types being resolved when the failure occurred, root first.
    #[must_use]
    pub fn path(&self) -> &[&'static str] {
        &self.path
    }
}

/// Suffix naming the chain of types that led to a nested failure.
fn via(path: &[&'static str]) -> String {
    if path.len() > 1 {
        format!(" (via {})", path.join(" -> "))
    } else {
        String::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ExecutionError
// ─────────────────────────────────────────────────────────────────────────────

/// Errors raised while executing an operation tree.
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    /// The body of an operation reported a failure.
    #[error("operation `{operation}` failed: {source}")]
    Operation {
        /// Name of the failing operation.
        operation: &'static str,
        /// The error returned by the operation body.
        #[source]
        source: OperationError,
    },

    /// A child operation could not be resolved while the tree was running.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// The operation instance was already executed once.
    #[error("operation `{operation}` was already executed")]
    AlreadyExecuted {
        /// Name of the operation.
        operation: &'static str,
    },

    /// A behavior was executed before an inner executable was attached.
    #[error("behavior `{behavior}` was executed before being attached")]
    Detached {
        /// Name of the behavior.
        behavior: &'static str,
    },
}

impl ExecutionError {
    /// Creates an [`ExecutionError::Operation`] for the named operation.
    pub fn operation(operation: &'static str, source: impl Into<OperationError>) -> Self {
        Self::Operation {
            operation,
            source: source.into(),
        }
    }

    /// Short name of the error kind, used by loggers.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Operation { .. } => "OperationFailed",
            Self::Resolution(_) => "ResolutionFailed",
            Self::AlreadyExecuted { .. } => "AlreadyExecuted",
            Self::Detached { .. } => "Detached",
        }
    }

    /// Returns `true` if the failure happened while building a child.
    #[must_use]
    pub fn is_resolution(&self) -> bool {
        matches!(self, Self::Resolution(_))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// WorkflowError
// ─────────────────────────────────────────────────────────────────────────────

/// Outcome of resolving and running a root operation in one step.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    /// The workflow could not be built.
    #[error("could not build workflow")]
    Resolution(#[source] ResolutionError),

    /// The workflow ran and failed.
    #[error("workflow failed")]
    Execution(#[source] ExecutionError),
}
