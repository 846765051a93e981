//! Port for the persistence backend adapted by the repository.
//!
//! A record model is a per-entity accessor in the style of document stores:
//! it creates, looks up, replaces and removes records, and answers filtered
//! queries. Lookups that match nothing return `Ok(None)`; errors are reserved
//! for calls that could not execute.

use std::fmt::Display;

use async_trait::async_trait;

use crate::domain::Error;

use super::define_port_error;

define_port_error! {
    /// Errors raised by record model adapters.
    pub enum RecordModelError {
        /// The store could not be reached.
        Connection {
            /// Adapter-provided detail.
            message: String,
        } => "record store connection failed: {message}",
        /// The query or mutation failed during execution.
        Query {
            /// Adapter-provided detail.
            message: String,
        } => "record store query failed: {message}",
        /// The store refused the payload (schema or uniqueness violation).
        Rejected {
            /// Adapter-provided detail.
            message: String,
        } => "record store rejected the payload: {message}",
        /// The adapter already produced an application error; it is passed
        /// through unchanged.
        Classified {
            /// The application error raised by the adapter.
            error: Error,
        } => "{error}",
    }
}

/// Backend capability adapted by [`crate::domain::Repository`].
///
/// Implementations own query execution, connection handling and schema
/// enforcement. Records are opaque to the layers above.
#[cfg_attr(test, mockall::automock(
    type Id = String;
    type Record = serde_json::Value;
    type Data = serde_json::Value;
    type Filter = serde_json::Map<String, serde_json::Value>;
    type Existence = bool;
))]
#[async_trait]
pub trait RecordModel: Send + Sync {
    /// Record identifier.
    type Id: Display + Send + Sync;
    /// Stored record as returned by the backend.
    type Record: Send;
    /// Payload accepted by create and update.
    type Data: Send + Sync;
    /// Query descriptor; the default value matches every record.
    type Filter: Default + Send;
    /// Backend-defined existence indicator.
    type Existence: Send;

    /// Persist one new record and return it.
    async fn create(&self, data: Self::Data) -> Result<Self::Record, RecordModelError>;

    /// Fetch a record by id.
    async fn find_by_id(&self, id: &Self::Id) -> Result<Option<Self::Record>, RecordModelError>;

    /// Apply `data` to the record with `id` and return the updated value.
    async fn find_by_id_and_update(
        &self,
        id: &Self::Id,
        data: Self::Data,
    ) -> Result<Option<Self::Record>, RecordModelError>;

    /// Remove the record with `id` and return the removed value.
    async fn find_by_id_and_delete(
        &self,
        id: &Self::Id,
    ) -> Result<Option<Self::Record>, RecordModelError>;

    /// Return every record matching `filter`.
    async fn find(&self, filter: Self::Filter) -> Result<Vec<Self::Record>, RecordModelError>;

    /// Persist a batch of records and return them.
    async fn insert_many(
        &self,
        records: Vec<Self::Data>,
    ) -> Result<Vec<Self::Record>, RecordModelError>;

    /// Count records matching `filter`.
    async fn count_documents(&self, filter: Self::Filter) -> Result<u64, RecordModelError>;

    /// Report whether any record matches `filter`.
    ///
    /// The indicator is whatever the backend yields for a match; `None`
    /// means no match.
    async fn exists(
        &self,
        filter: Self::Filter,
    ) -> Result<Option<Self::Existence>, RecordModelError>;
}
