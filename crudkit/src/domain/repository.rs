//! Repository layer over a [`RecordModel`].
//!
//! The repository is the innermost point that can tell "the backend found
//! nothing" from "the backend could not run the call", so it classifies both:
//! absence on an id lookup becomes a 404, backend failures become a 500 with a
//! per-operation message. Application errors produced by the backend itself
//! are returned unchanged.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{
    CrudRepository, DiagnosticEvent, DiagnosticSink, Disposition, RecordModel, RecordModelError,
    RepositoryFailure, TracingDiagnosticSink,
};
use crate::domain::{CrudResult, Error, Layer, Operation};

/// Adapter normalising every backend outcome into `Result<T, Error>`.
pub struct Repository<M> {
    model: Arc<M>,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl<M> Clone for Repository<M> {
    fn clone(&self) -> Self {
        Self {
            model: Arc::clone(&self.model),
            diagnostics: Arc::clone(&self.diagnostics),
        }
    }
}

impl<M> std::fmt::Debug for Repository<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository").finish_non_exhaustive()
    }
}

impl<M> Repository<M> {
    /// Create a repository reporting to the `tracing` sink.
    pub fn new(model: Arc<M>) -> Self {
        Self {
            model,
            diagnostics: Arc::new(TracingDiagnosticSink),
        }
    }

    /// Replace the diagnostic sink.
    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Backend adapted by this repository.
    #[must_use]
    pub fn model(&self) -> &M {
        &self.model
    }

    fn report(
        &self,
        operation: Operation,
        disposition: Disposition,
        error: &Error,
        detail: String,
    ) {
        self.diagnostics.record(&DiagnosticEvent {
            layer: Layer::Repository,
            operation,
            disposition,
            status_code: error.status_code(),
            detail,
        });
    }

    fn classify(&self, operation: Operation, failure: RecordModelError) -> Error {
        match failure {
            RecordModelError::Classified { error } => {
                self.report(operation, Disposition::Propagated, &error, error.to_string());
                error
            }
            other @ (RecordModelError::Connection { .. }
            | RecordModelError::Query { .. }
            | RecordModelError::Rejected { .. }) => {
                let error = Error::internal(operation.repository_failure_message());
                self.report(operation, Disposition::Converted, &error, other.to_string());
                error
            }
        }
    }
}

impl<M> Repository<M>
where
    M: RecordModel,
{
    fn require_found(
        &self,
        operation: Operation,
        id: &M::Id,
        found: Option<M::Record>,
    ) -> CrudResult<M::Record> {
        found.ok_or_else(|| {
            let error = Error::not_found(operation.missing_record_message(id));
            self.report(operation, Disposition::Rejected, &error, error.to_string());
            error
        })
    }

    /// Persist one new record.
    pub async fn create(&self, data: M::Data) -> CrudResult<M::Record> {
        self.model
            .create(data)
            .await
            .map_err(|failure| self.classify(Operation::Create, failure))
    }

    /// Fetch the record with `id`, failing with 404 when it does not exist.
    pub async fn get(&self, id: &M::Id) -> CrudResult<M::Record> {
        let found = self
            .model
            .find_by_id(id)
            .await
            .map_err(|failure| self.classify(Operation::Get, failure))?;
        self.require_found(Operation::Get, id, found)
    }

    /// Apply `data` to the record with `id` and return the updated value.
    pub async fn update(&self, id: &M::Id, data: M::Data) -> CrudResult<M::Record> {
        let found = self
            .model
            .find_by_id_and_update(id, data)
            .await
            .map_err(|failure| self.classify(Operation::Update, failure))?;
        self.require_found(Operation::Update, id, found)
    }

    /// Remove the record with `id` and return the removed value.
    pub async fn delete(&self, id: &M::Id) -> CrudResult<M::Record> {
        let found = self
            .model
            .find_by_id_and_delete(id)
            .await
            .map_err(|failure| self.classify(Operation::Delete, failure))?;
        self.require_found(Operation::Delete, id, found)
    }

    /// Fetch every record.
    pub async fn get_all(&self) -> CrudResult<Vec<M::Record>> {
        self.model
            .find(M::Filter::default())
            .await
            .map_err(|failure| self.classify(Operation::GetAll, failure))
    }

    /// Persist a batch of records.
    pub async fn insert_many(&self, records: Vec<M::Data>) -> CrudResult<Vec<M::Record>> {
        self.model
            .insert_many(records)
            .await
            .map_err(|failure| self.classify(Operation::InsertMany, failure))
    }

    /// Count records matching `filter`, or every record when `None`.
    pub async fn count(&self, filter: Option<M::Filter>) -> CrudResult<u64> {
        self.model
            .count_documents(filter.unwrap_or_default())
            .await
            .map_err(|failure| self.classify(Operation::Count, failure))
    }

    /// Return the backend's existence indicator for `filter`, or for any
    /// record when `None`.
    pub async fn exists(&self, filter: Option<M::Filter>) -> CrudResult<Option<M::Existence>> {
        self.model
            .exists(filter.unwrap_or_default())
            .await
            .map_err(|failure| self.classify(Operation::Exists, failure))
    }
}

#[async_trait]
impl<M> CrudRepository for Repository<M>
where
    M: RecordModel,
{
    type Id = M::Id;
    type Record = M::Record;
    type Data = M::Data;
    type Filter = M::Filter;
    type Existence = M::Existence;

    async fn create(&self, data: Self::Data) -> Result<Self::Record, RepositoryFailure> {
        Ok(Self::create(self, data).await?)
    }

    async fn get(&self, id: &Self::Id) -> Result<Self::Record, RepositoryFailure> {
        Ok(Self::get(self, id).await?)
    }

    async fn get_all(&self) -> Result<Vec<Self::Record>, RepositoryFailure> {
        Ok(Self::get_all(self).await?)
    }

    async fn update(
        &self,
        id: &Self::Id,
        data: Self::Data,
    ) -> Result<Self::Record, RepositoryFailure> {
        Ok(Self::update(self, id, data).await?)
    }

    async fn delete(&self, id: &Self::Id) -> Result<Self::Record, RepositoryFailure> {
        Ok(Self::delete(self, id).await?)
    }

    async fn insert_many(
        &self,
        records: Vec<Self::Data>,
    ) -> Result<Vec<Self::Record>, RepositoryFailure> {
        Ok(Self::insert_many(self, records).await?)
    }

    async fn count(&self, filter: Option<Self::Filter>) -> Result<u64, RepositoryFailure> {
        Ok(Self::count(self, filter).await?)
    }

    async fn exists(
        &self,
        filter: Option<Self::Filter>,
    ) -> Result<Option<Self::Existence>, RepositoryFailure> {
        Ok(Self::exists(self, filter).await?)
    }
}

#[cfg(test)]
#[path = "repository_tests.rs"]
mod tests;
