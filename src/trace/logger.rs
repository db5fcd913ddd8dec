use std::{
    fs::OpenOptions,
    io::Write,
    sync::Mutex,
};

use tracing::{debug, warn};

use crate::trace::trace::TraceEvent;

type TraceSink = Box<dyn Write + Send>;

/// Checkout audit trail: one JSON line per `TraceEvent`. Sink failures are
/// reported through `warn!` and never reach the checkout flow.
pub struct TraceLogger {
    sink: Option<Mutex<TraceSink>>,
}

impl TraceLogger {
    /// Append to the file at `path`. A file that cannot be opened leaves the
    /// logger disabled.
    pub fn new(path: &str) -> Self {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                debug!(path, "checkout trace enabled");
                Self::to_writer(file)
            }
            Err(e) => {
                warn!(path, error = %e, "could not open trace file, checkout trace disabled");
                Self::disabled()
            }
        }
    }

    /// Write trace lines into any sink, e.g. an in-memory buffer.
    pub fn to_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            sink: Some(Mutex::new(Box::new(writer))),
        }
    }

    pub fn disabled() -> Self {
        Self { sink: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Record one event. Disabled loggers return before serializing.
    pub fn log(&self, event: &TraceEvent) {
        let Some(sink) = &self.sink else {
            return;
        };

        let line = match serde_json::to_string(event) {
            Ok(line) => line,
            Err(e) => {
                warn!(step = %event.step, trace_event = %event.event, error = %e, "failed to serialize trace event");
                return;
            }
        };

        let mut sink = match sink.lock() {
            Ok(sink) => sink,
            Err(e) => {
                warn!(error = %e, "trace sink lock poisoned");
                return;
            }
        };

        if let Err(e) = writeln!(sink, "{}", line).and_then(|_| sink.flush()) {
            warn!(step = %event.step, trace_event = %event.event, error = %e, "failed to write trace event");
        }
    }
}

impl Default for TraceLogger {
    fn default() -> Self {
        Self::disabled()
    }
}
