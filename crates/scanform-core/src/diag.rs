//! Optional process-wide diagnostic sink.
//!
//! Scanning emits terse trace events (directive dispatch, terminal states)
//! to an injected sink when one is installed. The sink has no effect on
//! conversion semantics; with none installed the cost per event site is a
//! single read-lock check.

use std::sync::Arc;

use parking_lot::RwLock;

/// Receiver for engine trace events.
pub trait DiagSink: Send + Sync {
    /// Called once per event with a preformatted message.
    fn event(&self, message: &str);
}

impl<F> DiagSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn event(&self, message: &str) {
        self(message);
    }
}

static SINK: RwLock<Option<Arc<dyn DiagSink>>> = RwLock::new(None);

/// Installs the process-wide diagnostic sink, replacing any previous one.
pub fn set_sink(sink: Arc<dyn DiagSink>) {
    *SINK.write() = Some(sink);
}

/// Removes the diagnostic sink.
pub fn clear_sink() {
    *SINK.write() = None;
}

pub(crate) fn enabled() -> bool {
    SINK.read().is_some()
}

pub(crate) fn emit(message: &str) {
    if let Some(sink) = SINK.read().as_ref() {
        sink.event(message);
    }
}

/// Formats and emits an event only when a sink is installed.
macro_rules! trace_event {
    ($($arg:tt)*) => {
        if $crate::diag::enabled() {
            $crate::diag::emit(&format!($($arg)*));
        }
    };
}

pub(crate) use trace_event;
