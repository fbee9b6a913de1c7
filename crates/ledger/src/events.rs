//! Event sinks.
//!
//! The ledger never configures a global logger. It reports what happens
//! through an injected [`EventSink`]; the application plugs in
//! [`TracingSink`], tests use [`NoopSink`] or their own recorder.

use std::fmt;

/// Key/value pairs attached to an event.
pub type Fields<'a> = &'a [(&'static str, String)];

pub trait EventSink: fmt::Debug {
    fn info(&self, message: &str, fields: Fields<'_>);
    fn warn(&self, message: &str, fields: Fields<'_>);
    fn error(&self, message: &str, fields: Fields<'_>);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn info(&self, _message: &str, _fields: Fields<'_>) {}
    fn warn(&self, _message: &str, _fields: Fields<'_>) {}
    fn error(&self, _message: &str, _fields: Fields<'_>) {}
}

/// Forwards events to `tracing` under the `ledger` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn info(&self, message: &str, fields: Fields<'_>) {
        tracing::info!(target: "ledger", fields = %FieldList(fields), "{message}");
    }

    fn warn(&self, message: &str, fields: Fields<'_>) {
        tracing::warn!(target: "ledger", fields = %FieldList(fields), "{message}");
    }

    fn error(&self, message: &str, fields: Fields<'_>) {
        tracing::error!(target: "ledger", fields = %FieldList(fields), "{message}");
    }
}

/// Renders fields as `key=value key=value`.
struct FieldList<'a>(Fields<'a>);

impl fmt::Display for FieldList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{key}={value}")?;
        }
        Ok(())
    }
}
