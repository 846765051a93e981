//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod crud_repository;
mod diagnostic_sink;
mod record_model;

#[cfg(test)]
pub use crud_repository::MockCrudRepository;
pub use crud_repository::{CrudRepository, RepositoryFailure};
pub use diagnostic_sink::{
    DiagnosticEvent, DiagnosticSink, Disposition, NoOpDiagnosticSink, TracingDiagnosticSink,
};
#[cfg(test)]
pub use record_model::MockRecordModel;
pub use record_model::{RecordModel, RecordModelError};
