//! Injected log sink.
//!
//! The decoder reports progress and failures to an optional sink, one line
//! per call, each prefixed with a local timestamp.  The same events are also
//! emitted through `tracing` regardless of whether a sink is installed.

use std::fmt;

use chrono::Local;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Receives formatted diagnostic lines.
///
/// Sinks may be called from several decodes at once, hence `Sync`.
pub trait LogSink: Sync {
    fn write_log(&self, args: fmt::Arguments<'_>);
}

impl<F> LogSink for F
where
    F: Fn(fmt::Arguments<'_>) + Sync,
{
    fn write_log(&self, args: fmt::Arguments<'_>) {
        self(args)
    }
}

/// Prefix a line the way it appears in the sink.
pub fn stamp(args: fmt::Arguments<'_>) -> String {
    format!("{} : {}", Local::now().format(TIMESTAMP_FORMAT), args)
}

/// Optional sink wrapper used by the decoder.
#[derive(Clone, Copy)]
pub(crate) struct Logger<'s> {
    sink: Option<&'s dyn LogSink>,
}

impl<'s> Logger<'s> {
    pub(crate) fn new(sink: Option<&'s dyn LogSink>) -> Self {
        Self { sink }
    }

    pub(crate) fn line(&self, args: fmt::Arguments<'_>) {
        if let Some(sink) = self.sink {
            sink.write_log(format_args!("{}", stamp(args)));
        }
    }
}
