//! Plugin-scoped logging.

/// A logger handed to plugin capabilities, tagged with the plugin name.
///
/// Every event carries a `plugin` field naming the origin so interleaved
/// plugin output stays attributable. Events go through `tracing`; the
/// host application decides subscribers and filtering.
#[derive(Debug, Clone)]
pub struct PluginLogger {
    origin: String,
}

impl PluginLogger {
    /// Creates a logger scoped to the given plugin name.
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
        }
    }

    /// The plugin name this logger is scoped to.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Emits a debug-level event.
    pub fn debug(&self, message: &str) {
        tracing::debug!(plugin = %self.origin, "{message}");
    }

    /// Emits an info-level event.
    pub fn info(&self, message: &str) {
        tracing::info!(plugin = %self.origin, "{message}");
    }

    /// Emits a warning event.
    pub fn warn(&self, message: &str) {
        tracing::warn!(plugin = %self.origin, "{message}");
    }

    /// Emits an error event.
    pub fn error(&self, message: &str) {
        tracing::error!(plugin = %self.origin, "{message}");
    }
}
