//! Catalogue of the operations exposed by both layers.
//!
//! Each operation owns the generic messages used when it fails, so the
//! repository and the service agree on wording without sharing string
//! literals.

use std::fmt;

/// One of the eight data-access operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Persist a new record.
    Create,
    /// Fetch one record by id.
    Get,
    /// Fetch every record.
    GetAll,
    /// Replace fields of one record by id.
    Update,
    /// Remove one record by id.
    Delete,
    /// Persist a batch of records.
    InsertMany,
    /// Count records matching a filter.
    Count,
    /// Check whether any record matches a filter.
    Exists,
}

impl Operation {
    /// Every operation, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Create,
        Self::Get,
        Self::GetAll,
        Self::Update,
        Self::Delete,
        Self::InsertMany,
        Self::Count,
        Self::Exists,
    ];

    /// Stable identifier used in diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Get => "get",
            Self::GetAll => "get_all",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::InsertMany => "insert_many",
            Self::Count => "count",
            Self::Exists => "exists",
        }
    }

    /// Message used by the repository when the backend call fails.
    #[must_use]
    pub const fn repository_failure_message(self) -> &'static str {
        match self {
            Self::Create => "Failed to create resource",
            Self::Get => "Failed to fetch resource",
            Self::GetAll => "Failed to fetch resources",
            Self::Update => "Failed to update resource",
            Self::Delete => "Failed to delete resource",
            Self::InsertMany => "Failed to insert multiple records",
            Self::Count => "Failed to count documents",
            Self::Exists => "Failed to check existence",
        }
    }

    /// Message used by the service when a failure of unknown origin reaches it.
    #[must_use]
    pub const fn service_failure_message(self) -> &'static str {
        match self {
            Self::Create => "Something went wrong while creating resource",
            Self::Get => "Something went wrong while fetching resource",
            Self::GetAll => "Something went wrong while fetching resources",
            Self::Update => "Something went wrong while updating resource",
            Self::Delete => "Something went wrong while deleting resource",
            Self::InsertMany => "Something went wrong while inserting data",
            Self::Count => "Something went wrong while counting documents",
            Self::Exists => "Something went wrong while checking existence",
        }
    }

    /// Message for a lookup by `id` that matched nothing.
    #[must_use]
    pub fn missing_record_message(self, id: &dyn fmt::Display) -> String {
        match self {
            Self::Update => format!("Resource not found to update with id: {id}"),
            Self::Delete => format!("Resource not found to delete with id: {id}"),
            _ => format!("Resource not found with id: {id}"),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Layer at which an outcome was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    /// The backend adapter layer.
    Repository,
    /// The validation and orchestration layer.
    Service,
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Repository => "repository",
            Self::Service => "service",
        })
    }
}
