//! Recording doubles for asserting on diagnostics.
//!
//! Unit tests and the `tests/` suites install [`RecordingDiagnosticSink`] on a
//! repository or service to check which layer reported an error and with
//! which disposition. Available under `cfg(test)` or the `test-support`
//! feature.

use std::sync::{Mutex, PoisonError};

use crate::domain::ports::{DiagnosticEvent, DiagnosticSink, Disposition};
use crate::domain::{Layer, Operation};

/// Diagnostic sink that keeps every event in memory.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use crudkit::domain::ports::{DiagnosticEvent, DiagnosticSink, Disposition};
/// use crudkit::domain::{Layer, Operation};
/// use crudkit::test_support::RecordingDiagnosticSink;
///
/// let sink = Arc::new(RecordingDiagnosticSink::default());
/// sink.record(&DiagnosticEvent {
///     layer: Layer::Service,
///     operation: Operation::Create,
///     disposition: Disposition::Rejected,
///     status_code: 422,
///     detail: "name required".to_owned(),
/// });
/// assert_eq!(sink.events().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct RecordingDiagnosticSink {
    events: Mutex<Vec<DiagnosticEvent>>,
}

impl RecordingDiagnosticSink {
    /// Snapshot of the recorded events, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<DiagnosticEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Events recorded by `layer` for `operation`.
    #[must_use]
    pub fn events_for(&self, layer: Layer, operation: Operation) -> Vec<DiagnosticEvent> {
        self.events()
            .into_iter()
            .filter(|event| event.layer == layer && event.operation == operation)
            .collect()
    }

    /// Dispositions in recording order, tagged by layer.
    #[must_use]
    pub fn dispositions(&self) -> Vec<(Layer, Disposition)> {
        self.events()
            .iter()
            .map(|event| (event.layer, event.disposition))
            .collect()
    }
}

impl DiagnosticSink for RecordingDiagnosticSink {
    fn record(&self, event: &DiagnosticEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}
