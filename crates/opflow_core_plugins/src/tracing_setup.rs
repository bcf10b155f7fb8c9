//! Tracing subscriber setup.
//!
//! Provides [`TracingSetup`] which installs the `tracing` subscriber and
//! records its configuration as a workflow [`Setting`].
//!
//! The library crates only emit events; installing a subscriber is left to
//! the host application, either directly or through this module.
//!
//! # Example
//!
//! ```
//! use opflow_core_plugins::{TracingConfig, TracingFormat, TracingSetup};
//! use opflow_system::prelude::*;
//! use tracing::Level;
//!
//! let setup = TracingSetup::default()
//!     .with_level(Level::DEBUG)
//!     .with_format(TracingFormat::Compact);
//! setup.init();
//!
//! let configuration = setup.configure(&Configuration::new());
//! let config = configuration.setting::<TracingConfig>().unwrap();
//! assert_eq!(config.level, Level::DEBUG);
//! ```

use opflow_system::prelude::*;
use tracing::Level;
use tracing_subscriber::{EnvFilter, Layer};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

// ─────────────────────────────────────────────────────────────────────────────
// TracingFormat
// ─────────────────────────────────────────────────────────────────────────────

/// Tracing output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TracingFormat {
    /// Human-readable colored output (default).
    #[default]
    Pretty,
    /// Compact single-line output.
    Compact,
    /// JSON structured output for log aggregation.
    Json,
}

// ─────────────────────────────────────────────────────────────────────────────
// TracingConfig Setting
// ─────────────────────────────────────────────────────────────────────────────

/// Tracing configuration setting.
///
/// Behaviors and operations can read it from the [`Configuration`] to adapt
/// how much they report; [`TracingLogger::from_configuration`] reports
/// operation lifecycles at its level.
///
/// [`TracingLogger::from_configuration`]: crate::TracingLogger::from_configuration
///
/// # Example
///
/// ```
/// use opflow_core_plugins::TracingConfig;
/// use opflow_system::prelude::*;
/// use tracing::Level;
///
/// fn verbose(configuration: &Configuration) -> bool {
///     configuration
///         .setting::<TracingConfig>()
///         .is_some_and(|config| config.level >= Level::DEBUG)
/// }
///
/// assert!(!verbose(&Configuration::new()));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TracingConfig {
    /// The configured log level.
    pub level: Level,
    /// The configured output format.
    pub format: TracingFormat,
}

impl Setting for TracingConfig {}

// ─────────────────────────────────────────────────────────────────────────────
// TracingSetup
// ─────────────────────────────────────────────────────────────────────────────

/// Installs and describes the `tracing` subscriber.
///
/// # Configuration Options
///
/// ```
/// use opflow_core_plugins::{TracingFormat, TracingSetup};
/// use tracing::Level;
///
/// // Development: Pretty colored output with debug level
/// let dev = TracingSetup::default()
///     .with_level(Level::DEBUG)
///     .with_format(TracingFormat::Pretty)
///     .with_span_events(true);
///
/// // Production: JSON output for log aggregation
/// let prod = TracingSetup::default()
///     .with_level(Level::INFO)
///     .with_format(TracingFormat::Json)
///     .with_env_filter("opflow_system=info,opflow_core_plugins=warn");
/// ```
#[derive(Debug, Clone)]
pub struct TracingSetup {
    /// Maximum log level.
    level: Level,
    /// Output format.
    format: TracingFormat,
    /// Environment filter (e.g., "`opflow_system=debug`").
    env_filter: Option<String>,
    /// Whether to include span events (enter/exit).
    span_events: bool,
}

impl Default for TracingSetup {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: TracingFormat::Pretty,
            env_filter: None,
            span_events: false,
        }
    }
}

impl TracingSetup {
    /// Creates a new `TracingSetup` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum log level.
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Sets the output format.
    #[must_use]
    pub fn with_format(mut self, format: TracingFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets a custom environment filter string.
    ///
    /// Format: `target=level,target=level,...`. An invalid filter falls back
    /// to the configured level.
    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Enables span enter/exit events in output.
    #[must_use]
    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.span_events = enabled;
        self
    }

    /// The configuration this setup describes.
    #[must_use]
    pub fn config(&self) -> TracingConfig {
        TracingConfig {
            level: self.level,
            format: self.format,
        }
    }

    /// Returns `base` extended with the [`TracingConfig`] setting.
    #[must_use]
    pub fn configure(&self, base: &Configuration) -> Configuration {
        base.with_setting(self.config())
    }

    /// Installs the global subscriber.
    ///
    /// Does nothing if a global subscriber is already installed.
    pub fn init(&self) {
        let env_filter = match &self.env_filter {
            Some(filter) => {
                EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(self.level.as_str()))
            }
            None => EnvFilter::new(self.level.as_str()),
        };

        let span_events = if self.span_events {
            FmtSpan::ENTER | FmtSpan::EXIT
        } else {
            FmtSpan::NONE
        };

        let fmt_layer = tracing_subscriber::fmt::layer().with_span_events(span_events);
        let fmt_layer = match self.format {
            TracingFormat::Pretty => fmt_layer.pretty().boxed(),
            TracingFormat::Compact => fmt_layer.compact().boxed(),
            TracingFormat::Json => fmt_layer.json().boxed(),
        };

        let installed = tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .is_ok();

        if installed {
            tracing::info!(
                level = %self.level,
                format = ?self.format,
                "tracing initialized"
            );
        }
    }
}
