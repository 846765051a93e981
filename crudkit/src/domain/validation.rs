//! Caller-supplied validation for mutating service operations.

use std::fmt;
use std::sync::Arc;

/// Rejection reported by a [`Validator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Message surfaced to the caller in the 422 error.
    pub message: String,
}

impl ValidationIssue {
    /// Build an issue from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Pure check run against a payload before it reaches the repository.
pub type Validator<D> = Arc<dyn Fn(&D) -> Result<(), ValidationIssue> + Send + Sync>;

/// Validators applied by [`crate::domain::CrudService`].
///
/// Operations without a validator skip validation.
///
/// # Examples
/// ```
/// use crudkit::domain::{ServiceOptions, ValidationIssue};
/// use serde_json::Value;
///
/// let options = ServiceOptions::<Value>::default().with_create_validator(|data| {
///     match data.get("name").and_then(Value::as_str) {
///         Some(name) if !name.is_empty() => Ok(()),
///         _ => Err(ValidationIssue::new("name required")),
///     }
/// });
/// assert!(options.create_validator.is_some());
/// assert!(options.update_validator.is_none());
/// ```
pub struct ServiceOptions<D> {
    /// Runs before `create`.
    pub create_validator: Option<Validator<D>>,
    /// Runs before `update`.
    pub update_validator: Option<Validator<D>>,
}

impl<D> ServiceOptions<D> {
    /// Set the validator applied before `create`.
    #[must_use]
    pub fn with_create_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&D) -> Result<(), ValidationIssue> + Send + Sync + 'static,
    {
        self.create_validator = Some(Arc::new(validator));
        self
    }

    /// Set the validator applied before `update`.
    #[must_use]
    pub fn with_update_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&D) -> Result<(), ValidationIssue> + Send + Sync + 'static,
    {
        self.update_validator = Some(Arc::new(validator));
        self
    }
}

impl<D> Default for ServiceOptions<D> {
    fn default() -> Self {
        Self {
            create_validator: None,
            update_validator: None,
        }
    }
}

impl<D> Clone for ServiceOptions<D> {
    fn clone(&self) -> Self {
        Self {
            create_validator: self.create_validator.clone(),
            update_validator: self.update_validator.clone(),
        }
    }
}

impl<D> fmt::Debug for ServiceOptions<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceOptions")
            .field("create_validator", &self.create_validator.is_some())
            .field("update_validator", &self.update_validator.is_some())
            .finish()
    }
}
