//! Service layer: validation and error normalisation over a repository.
//!
//! Each call runs `Start → Validating (create/update only) → Delegating →
//! Success | Failed`. A rejected payload fails with 422 before the repository
//! is reached. Classified repository errors reach the caller untouched;
//! failures of unknown origin become a 500 with an operation-specific
//! message.

use std::sync::Arc;

use crate::domain::ports::{
    CrudRepository, DiagnosticEvent, DiagnosticSink, Disposition, RepositoryFailure,
    TracingDiagnosticSink,
};
use crate::domain::{CrudResult, Error, Layer, Operation, ServiceOptions, Validator};

/// Validating front for a [`CrudRepository`].
pub struct CrudService<R: CrudRepository> {
    repository: Arc<R>,
    options: ServiceOptions<R::Data>,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl<R: CrudRepository> Clone for CrudService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            options: self.options.clone(),
            diagnostics: Arc::clone(&self.diagnostics),
        }
    }
}

impl<R: CrudRepository> std::fmt::Debug for CrudService<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrudService")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<R: CrudRepository> CrudService<R> {
    /// Create a service reporting to the `tracing` sink.
    pub fn new(repository: Arc<R>, options: ServiceOptions<R::Data>) -> Self {
        Self {
            repository,
            options,
            diagnostics: Arc::new(TracingDiagnosticSink),
        }
    }

    /// Replace the diagnostic sink.
    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Repository driven by this service.
    #[must_use]
    pub fn repository(&self) -> &R {
        &self.repository
    }

    fn report(
        &self,
        operation: Operation,
        disposition: Disposition,
        error: &Error,
        detail: String,
    ) {
        self.diagnostics.record(&DiagnosticEvent {
            layer: Layer::Service,
            operation,
            disposition,
            status_code: error.status_code(),
            detail,
        });
    }

    fn validate(
        &self,
        operation: Operation,
        configured: Option<&Validator<R::Data>>,
        data: &R::Data,
    ) -> CrudResult<()> {
        let Some(validator) = configured else {
            return Ok(());
        };
        validator(data).map_err(|issue| {
            let error = Error::validation_failed(issue.message);
            self.report(operation, Disposition::Rejected, &error, error.to_string());
            error
        })
    }

    fn settle<T>(
        &self,
        operation: Operation,
        outcome: Result<T, RepositoryFailure>,
    ) -> CrudResult<T> {
        outcome.map_err(|failure| match failure {
            RepositoryFailure::Classified { error } => {
                self.report(operation, Disposition::Propagated, &error, error.to_string());
                error
            }
            RepositoryFailure::Unexpected { message } => {
                let error = Error::internal(operation.service_failure_message());
                self.report(operation, Disposition::Converted, &error, message);
                error
            }
        })
    }

    /// Validate `data` with the create validator, then persist it.
    pub async fn create(&self, data: R::Data) -> CrudResult<R::Record> {
        self.validate(
            Operation::Create,
            self.options.create_validator.as_ref(),
            &data,
        )?;
        let outcome = self.repository.create(data).await;
        self.settle(Operation::Create, outcome)
    }

    /// Fetch the record with `id`.
    pub async fn get(&self, id: &R::Id) -> CrudResult<R::Record> {
        let outcome = self.repository.get(id).await;
        self.settle(Operation::Get, outcome)
    }

    /// Fetch every record.
    pub async fn get_all(&self) -> CrudResult<Vec<R::Record>> {
        let outcome = self.repository.get_all().await;
        self.settle(Operation::GetAll, outcome)
    }

    /// Validate `data` with the update validator, then apply it to `id`.
    pub async fn update(&self, id: &R::Id, data: R::Data) -> CrudResult<R::Record> {
        self.validate(
            Operation::Update,
            self.options.update_validator.as_ref(),
            &data,
        )?;
        let outcome = self.repository.update(id, data).await;
        self.settle(Operation::Update, outcome)
    }

    /// Delete the record with `id`.
    pub async fn delete(&self, id: &R::Id) -> CrudResult<R::Record> {
        let outcome = self.repository.delete(id).await;
        self.settle(Operation::Delete, outcome)
    }

    /// Persist a batch of records. Batches are not validated.
    pub async fn insert_many(&self, records: Vec<R::Data>) -> CrudResult<Vec<R::Record>> {
        let outcome = self.repository.insert_many(records).await;
        self.settle(Operation::InsertMany, outcome)
    }

    /// Count records matching `filter`, or every record when `None`.
    pub async fn count(&self, filter: Option<R::Filter>) -> CrudResult<u64> {
        let outcome = self.repository.count(filter).await;
        self.settle(Operation::Count, outcome)
    }

    /// Backend existence indicator for `filter`, or for any record when `None`.
    pub async fn exists(&self, filter: Option<R::Filter>) -> CrudResult<Option<R::Existence>> {
        let outcome = self.repository.exists(filter).await;
        self.settle(Operation::Exists, outcome)
    }
}

#[cfg(test)]
#[path = "crud_service_tests.rs"]
mod tests;
