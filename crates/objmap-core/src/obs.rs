//! Mapping trace boundary.
//!
//! Tracing is optional, injected by the caller, and must not affect mapping
//! semantics. Nothing in the engine writes to a global sink.

use std::sync::{Mutex, PoisonError};

///
/// TraceSink
///

pub trait TraceSink: Send + Sync {
    fn on_event(&self, event: TraceEvent);
}

///
/// TraceEvent
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TraceEvent {
    MapStart {
        source: String,
        target: String,
    },
    MapFinish {
        source: String,
        target: String,
        constructor_args: usize,
        property_writes: usize,
    },
    ToArray {
        class: String,
        fields: usize,
    },
    ConverterApplied {
        class: String,
        accept: String,
    },
    DeepDescend {
        class: String,
        depth: usize,
    },
    CloneWith {
        class: String,
        overrides: usize,
    },
}

/// Emit an event if a sink is attached; the event is only built when needed.
pub(crate) fn emit(sink: Option<&dyn TraceSink>, event: impl FnOnce() -> TraceEvent) {
    if let Some(sink) = sink {
        sink.on_event(event());
    }
}

///
/// RecordingSink
/// Keeps every event in memory, in order.
///

#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<TraceEvent>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> Vec<TraceEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl TraceSink for RecordingSink {
    fn on_event(&self, event: TraceEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
