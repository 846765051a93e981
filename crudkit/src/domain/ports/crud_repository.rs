//! Port through which the service drives a repository.
//!
//! [`crate::domain::Repository`] is the canonical implementation. Other
//! implementations (caching decorators, remote repositories) may surface
//! failures they could not classify as [`RepositoryFailure::Unexpected`]; the
//! service converts those into internal errors and leaves
//! [`RepositoryFailure::Classified`] errors untouched.

use std::fmt::Display;

use async_trait::async_trait;

use crate::domain::Error;

use super::define_port_error;

define_port_error! {
    /// Failures surfaced by repository implementations.
    pub enum RepositoryFailure {
        /// An application error that must reach the caller unchanged.
        Classified {
            /// The classified error.
            error: Error,
        } => "{error}",
        /// A failure of unknown origin.
        Unexpected {
            /// Diagnostic detail, never shown to callers.
            message: String,
        } => "unexpected repository failure: {message}",
    }
}

impl From<Error> for RepositoryFailure {
    fn from(error: Error) -> Self {
        Self::Classified { error }
    }
}

/// Data-access contract consumed by [`crate::domain::CrudService`].
#[cfg_attr(test, mockall::automock(
    type Id = String;
    type Record = serde_json::Value;
    type Data = serde_json::Value;
    type Filter = serde_json::Map<String, serde_json::Value>;
    type Existence = bool;
))]
#[async_trait]
pub trait CrudRepository: Send + Sync {
    /// Record identifier.
    type Id: Display + Send + Sync;
    /// Stored record.
    type Record: Send;
    /// Payload accepted by create and update.
    type Data: Send + Sync;
    /// Query descriptor; the default value matches every record.
    type Filter: Default + Send;
    /// Backend-defined existence indicator.
    type Existence: Send;

    /// Persist one new record.
    async fn create(&self, data: Self::Data) -> Result<Self::Record, RepositoryFailure>;

    /// Fetch one record; a missing id is a classified not-found error.
    async fn get(&self, id: &Self::Id) -> Result<Self::Record, RepositoryFailure>;

    /// Fetch every record.
    async fn get_all(&self) -> Result<Vec<Self::Record>, RepositoryFailure>;

    /// Update one record and return the new value.
    async fn update(
        &self,
        id: &Self::Id,
        data: Self::Data,
    ) -> Result<Self::Record, RepositoryFailure>;

    /// Delete one record and return the removed value.
    async fn delete(&self, id: &Self::Id) -> Result<Self::Record, RepositoryFailure>;

    /// Persist a batch of records.
    async fn insert_many(
        &self,
        records: Vec<Self::Data>,
    ) -> Result<Vec<Self::Record>, RepositoryFailure>;

    /// Count records; `None` counts every record.
    async fn count(&self, filter: Option<Self::Filter>) -> Result<u64, RepositoryFailure>;

    /// Backend-defined existence check; `None` matches every record.
    async fn exists(
        &self,
        filter: Option<Self::Filter>,
    ) -> Result<Option<Self::Existence>, RepositoryFailure>;
}
