//! Port for surfacing intercepted errors to a diagnostic log.
//!
//! Both layers report every error they intercept before returning it.
//! Reporting is a side effect only; it never influences the outcome of the
//! operation.

use tracing::{debug, error};

use crate::domain::{Layer, Operation};

/// What a layer did with an error it intercepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Disposition {
    /// A collaborator failed and the failure became an internal error here.
    Converted,
    /// This layer produced a typed rejection (not found or validation).
    Rejected,
    /// An already-classified error was re-raised unchanged.
    Propagated,
}

impl Disposition {
    /// Stable identifier used in log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Converted => "converted",
            Self::Rejected => "rejected",
            Self::Propagated => "propagated",
        }
    }
}

/// One intercepted error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticEvent {
    /// Layer that intercepted the error.
    pub layer: Layer,
    /// Operation in progress.
    pub operation: Operation,
    /// What the layer did with it.
    pub disposition: Disposition,
    /// Status code of the error returned to the caller.
    pub status_code: u16,
    /// Original failure text; for conversions this is the collaborator's
    /// message, which callers never see.
    pub detail: String,
}

/// Receiver for [`DiagnosticEvent`]s.
pub trait DiagnosticSink: Send + Sync {
    /// Record one event.
    fn record(&self, event: &DiagnosticEvent);
}

/// Default sink emitting `tracing` events.
///
/// Conversions are logged at `error`; rejections and propagations are
/// expected outcomes and are logged at `debug`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnosticSink;

impl DiagnosticSink for TracingDiagnosticSink {
    fn record(&self, event: &DiagnosticEvent) {
        match event.disposition {
            Disposition::Converted => error!(
                layer = %event.layer,
                operation = %event.operation,
                status_code = event.status_code,
                detail = %event.detail,
                "crud operation failed"
            ),
            Disposition::Rejected | Disposition::Propagated => debug!(
                layer = %event.layer,
                operation = %event.operation,
                disposition = event.disposition.as_str(),
                status_code = event.status_code,
                detail = %event.detail,
                "crud operation returned an application error"
            ),
        }
    }
}

/// Sink that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpDiagnosticSink;

impl DiagnosticSink for NoOpDiagnosticSink {
    fn record(&self, _event: &DiagnosticEvent) {}
}
