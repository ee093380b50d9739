//! Emitter resolution: logger identity, sink and rendering.
//!
//! An [`Emitter`] is resolved once from [`AuditLogSettings`] and a
//! [`Registry`], then shared by every record the interceptor emits.

use std::io::Write;
use std::sync::Arc;

use crate::error::AuditError;
use crate::record::{AuditRecord, DEFAULT_LOGGER_NAME, LogLevel};
use crate::registry::Registry;
use crate::settings::AuditLogSettings;

/// `tracing` target the default handler writes to.
pub const AUDIT_TARGET: &str = "audit_log";

/// A rendered record on its way to a sink.
#[derive(Debug, Clone, Copy)]
pub struct LogEntry<'a> {
    pub logger: &'a str,
    pub level: LogLevel,
    pub message: &'a str,
}

/// A log sink.
pub trait LogHandler: Send + Sync {
    fn handle(&self, entry: &LogEntry<'_>) -> Result<(), AuditError>;
}

/// Renders a record into a single message.
pub trait LogFormatter: Send + Sync {
    fn format(&self, record: &AuditRecord) -> Result<String, AuditError>;
}

/// Writes each record as a `tracing` event on the `audit_log` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingHandler;

impl LogHandler for TracingHandler {
    fn handle(&self, entry: &LogEntry<'_>) -> Result<(), AuditError> {
        let logger = entry.logger;
        let message = entry.message;
        // tracing levels are static per callsite.
        match entry.level {
            LogLevel::Debug => tracing::debug!(target: AUDIT_TARGET, logger, "{message}"),
            LogLevel::Info => tracing::info!(target: AUDIT_TARGET, logger, "{message}"),
            LogLevel::Warning => tracing::warn!(target: AUDIT_TARGET, logger, "{message}"),
            LogLevel::Error | LogLevel::Critical => {
                tracing::error!(target: AUDIT_TARGET, logger, severity = %entry.level, "{message}")
            }
        }
        Ok(())
    }
}

/// Writes one line per record to standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutHandler;

impl LogHandler for StdoutHandler {
    fn handle(&self, entry: &LogEntry<'_>) -> Result<(), AuditError> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "{}", entry.message).map_err(|e| AuditError::Emission(e.to_string()))
    }
}

/// Renders a record as JSON, compact or pretty-printed.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonFormatter {
    pub pretty: bool,
}

impl LogFormatter for JsonFormatter {
    fn format(&self, record: &AuditRecord) -> Result<String, AuditError> {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(record)?
        } else {
            serde_json::to_string(record)?
        };
        Ok(rendered)
    }
}

/// The resolved (logger identity, handler, formatter) triple.
#[derive(Clone)]
pub struct Emitter {
    logger_name: String,
    handler: Arc<dyn LogHandler>,
    formatter: Arc<dyn LogFormatter>,
}

impl std::fmt::Debug for Emitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emitter")
            .field("logger_name", &self.logger_name)
            .finish_non_exhaustive()
    }
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new(
            DEFAULT_LOGGER_NAME,
            Arc::new(TracingHandler),
            Arc::new(JsonFormatter::default()),
        )
    }
}

impl Emitter {
    pub fn new(
        logger_name: impl Into<String>,
        handler: Arc<dyn LogHandler>,
        formatter: Arc<dyn LogFormatter>,
    ) -> Self {
        Self {
            logger_name: logger_name.into(),
            handler,
            formatter,
        }
    }

    /// Resolve each part independently: configured values win, anything
    /// unset falls back to the built-in default.
    ///
    /// A configured handler or formatter key with no registered factory is
    /// a configuration error.
    pub fn resolve(settings: &AuditLogSettings, registry: &Registry) -> Result<Self, AuditError> {
        let handler = match settings.log_handler_path.as_deref() {
            Some(key) if !key.is_empty() => registry.handler(key)?,
            _ => Arc::new(TracingHandler) as Arc<dyn LogHandler>,
        };

        let formatter = match settings.log_formatter_path.as_deref() {
            Some(key) if !key.is_empty() => registry.formatter(key)?,
            _ => Arc::new(JsonFormatter::default()) as Arc<dyn LogFormatter>,
        };

        Ok(Self::new(logger_name(settings), handler, formatter))
    }

    pub fn logger_name(&self) -> &str {
        &self.logger_name
    }

    pub fn handler(&self) -> &dyn LogHandler {
        self.handler.as_ref()
    }

    pub fn formatter(&self) -> &dyn LogFormatter {
        self.formatter.as_ref()
    }
}

/// `LOGGER_NAME` when set and non-empty, otherwise `audit_log`.
pub fn logger_name(settings: &AuditLogSettings) -> String {
    match settings.logger_name.as_deref() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => DEFAULT_LOGGER_NAME.to_string(),
    }
}
