//! Domain layer: the error taxonomy, ports, and the two data-access layers.
//!
//! Public surface:
//! - Error, ErrorCode: application error returned by every operation.
//! - Repository: adapts a [`ports::RecordModel`] into `Result<T, Error>`.
//! - CrudService: validation plus error normalisation over a
//!   [`ports::CrudRepository`].
//! - ServiceOptions, Validator, ValidationIssue: caller-supplied validation.

pub mod error;
pub mod operation;
pub mod ports;

mod crud_service;
mod repository;
mod validation;

pub use self::crud_service::CrudService;
pub use self::error::{DomainError as Error, ErrorCode, ErrorValidationError};
pub use self::operation::{Layer, Operation};
pub use self::repository::Repository;
pub use self::validation::{ServiceOptions, ValidationIssue, Validator};

/// Result alias for operations that fail with [`Error`].
///
/// # Examples
/// ```
/// use crudkit::domain::{CrudResult, Error};
///
/// fn lookup() -> CrudResult<u64> {
///     Err(Error::not_found("Resource not found with id: 2"))
/// }
/// # assert_eq!(lookup().unwrap_err().status_code(), 404);
/// ```
pub type CrudResult<T> = Result<T, Error>;
