//! Generic repository and service layers over pluggable record stores.
//!
//! A [`domain::Repository`] adapts any [`domain::ports::RecordModel`] into a
//! uniform `Result<T, Error>` contract. A [`domain::CrudService`] runs
//! caller-supplied validators before mutations and normalises failures of
//! unknown origin, while errors that were already classified pass through
//! unchanged.

pub mod config;
pub mod domain;
pub mod outbound;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use domain::{CrudService, Error, ErrorCode, Repository, ServiceOptions};
