use std::fmt;

/// A request-scoped logger.
///
/// `ContextLog` is obtained from [`RequestContext::log`](crate::RequestContext::log).
/// It is lifetime-bound to the context, and every message it emits carries
/// the request URI as a structured `uri` field.
///
/// Extracted identifiers are never logged by the engine itself, only their
/// parameter names and counts.
#[derive(Debug)]
pub struct ContextLog<'a> {
    uri: &'a str,
}

impl<'a> ContextLog<'a> {
    pub(crate) fn new(uri: &'a str) -> Self {
        Self { uri }
    }

    /// Returns the URI attached to every message.
    pub fn uri(&self) -> &str {
        self.uri
    }

    /// Logs an info-level message with the request URI.
    ///
    /// Use with `format_args!`:
    /// ```ignore
    /// ctx.log().info(format_args!("rule matched: {}", pattern));
    /// ```
    pub fn info(&self, args: fmt::Arguments<'_>) {
        tracing::info!(uri = %self.uri, "{}", args);
    }

    /// Logs a warning-level message with the request URI.
    pub fn warn(&self, args: fmt::Arguments<'_>) {
        tracing::warn!(uri = %self.uri, "{}", args);
    }

    /// Logs an error-level message with the request URI.
    pub fn error(&self, args: fmt::Arguments<'_>) {
        tracing::error!(uri = %self.uri, "{}", args);
    }

    /// Logs a debug-level message with the request URI.
    pub fn debug(&self, args: fmt::Arguments<'_>) {
        tracing::debug!(uri = %self.uri, "{}", args);
    }
}
