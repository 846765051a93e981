//! Application-level error type shared by the repository and service layers.
//!
//! These errors are transport agnostic. Inbound adapters map them to HTTP
//! responses or any other protocol-specific envelope using
//! [`DomainError::status_code`].

use serde::{Deserialize, Serialize};

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The requested record does not exist.
    NotFound,
    /// A configured validator rejected the input.
    ValidationFailed,
    /// The backend or a collaborator failed unexpectedly.
    InternalError,
}

impl ErrorCode {
    /// HTTP-style status code associated with the category.
    ///
    /// # Examples
    /// ```
    /// use crudkit::ErrorCode;
    ///
    /// assert_eq!(ErrorCode::NotFound.status_code(), 404);
    /// ```
    #[must_use]
    pub const fn status_code(self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::ValidationFailed => 422,
            Self::InternalError => 500,
        }
    }

    const fn default_message(self) -> &'static str {
        match self {
            Self::NotFound => "Resource not found",
            Self::ValidationFailed => "Validation failed",
            Self::InternalError => "Something went wrong",
        }
    }
}

/// Application error payload.
///
/// Re-exported as [`crate::Error`].
///
/// ## Invariants
/// - `message` is non-empty once trimmed of whitespace.
///
/// # Examples
/// ```
/// use crudkit::{Error, ErrorCode};
///
/// let err = Error::not_found("missing");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(err.status_code(), 404);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ErrorDto", into = "ErrorDto")]
pub struct DomainError {
    code: ErrorCode,
    message: String,
}

/// Validation errors emitted by the fallible constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorValidationError {
    /// The message was empty or whitespace.
    #[error("error message must not be empty")]
    EmptyMessage,
    /// A serialised status code disagreed with the error code.
    #[error("status code {actual} does not match {expected} for this error code")]
    StatusMismatch {
        /// Status implied by the error code.
        expected: u16,
        /// Status found in the payload.
        actual: u16,
    },
}

impl DomainError {
    /// Create a new error.
    ///
    /// Blank messages are replaced with a generic message for `code`, so this
    /// constructor never fails.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::try_new(code, message).unwrap_or_else(|_| Self {
            code,
            message: code.default_message().to_owned(),
        })
    }

    /// Fallible constructor that validates the message content.
    pub fn try_new(
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Result<Self, ErrorValidationError> {
        let text = message.into();
        if text.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self {
            code,
            message: text,
        })
    }

    /// Stable machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// HTTP-style status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.code.status_code()
    }

    /// Human-readable message returned to adapters.
    #[must_use]
    pub const fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::ValidationFailed`].
    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for DomainError {}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorDto {
    code: ErrorCode,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status_code: Option<u16>,
}

impl From<DomainError> for ErrorDto {
    fn from(value: DomainError) -> Self {
        Self {
            status_code: Some(value.status_code()),
            code: value.code,
            message: value.message,
        }
    }
}

impl TryFrom<ErrorDto> for DomainError {
    type Error = ErrorValidationError;

    fn try_from(value: ErrorDto) -> Result<Self, Self::Error> {
        let ErrorDto {
            code,
            message,
            status_code,
        } = value;

        if let Some(actual) = status_code {
            let expected = code.status_code();
            if actual != expected {
                return Err(ErrorValidationError::StatusMismatch { expected, actual });
            }
        }

        Self::try_new(code, message)
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
