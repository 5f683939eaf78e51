//! Caller-facing error taxonomy for catalog use-cases.
//!
//! # Invariants
//! - Every error reports one stable `ErrorKind`.
//! - Internal errors never put store details in their message; the
//!   underlying failure is only reachable through `Error::source`.

use crate::model::validation::ValidationError;
use crate::pagination::CursorError;
use crate::repo::document_repo::RepoError;
use log::error;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Stable error category exposed to transports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Input must change before a retry can succeed.
    InvalidArgument,
    NotFound,
    /// Store or serialization failure; retry may succeed.
    Internal,
}

impl ErrorKind {
    /// gRPC status code used by the remote-call transport.
    pub fn status_code(self) -> i32 {
        match self {
            Self::InvalidArgument => 3,
            Self::NotFound => 5,
            Self::Internal => 13,
        }
    }

    pub fn is_retryable(self) -> bool {
        matches!(self, Self::Internal)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidArgument => "invalid_argument",
            Self::NotFound => "not_found",
            Self::Internal => "internal",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service error for catalog use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Identifier input is not a UUID.
    InvalidId { field: &'static str, value: String },
    /// Entity field input rejected.
    InvalidField(ValidationError),
    /// Cursor is not a decodable continuation key.
    MalformedCursor(CursorError),
    /// Cursor decodes but was produced by a different listing.
    ForeignCursor(String),
    /// Index name is not declared for the queried table.
    UnknownIndex(String),
    /// Entity absent for read, update or reference check.
    NotFound { kind: &'static str, id: Uuid },
    /// Store failure during `operation`.
    Store {
        operation: &'static str,
        source: RepoError,
    },
    /// Continuation key returned by the store could not be encoded.
    CursorEncode(CursorError),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidId { .. }
            | Self::InvalidField(_)
            | Self::MalformedCursor(_)
            | Self::ForeignCursor(_)
            | Self::UnknownIndex(_) => ErrorKind::InvalidArgument,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Store { .. } | Self::CursorEncode(_) => ErrorKind::Internal,
        }
    }

    /// Pagination subtype of `InvalidArgument`.
    pub fn is_malformed_cursor(&self) -> bool {
        matches!(self, Self::MalformedCursor(_) | Self::ForeignCursor(_))
    }

    /// Translates a repository failure raised while running `operation`.
    ///
    /// Store failures are logged here with full detail since the returned
    /// error hides them from its message.
    pub(crate) fn from_repo(operation: &'static str, err: RepoError) -> Self {
        match err {
            RepoError::NotFound { kind, id } => Self::NotFound { kind, id },
            RepoError::InvalidStartKey(message) => Self::ForeignCursor(message),
            RepoError::UnknownIndex { index, .. } => Self::UnknownIndex(index),
            other => {
                error!(
                    "event={} module=service status=error kind=internal error={}",
                    operation, other
                );
                Self::Store {
                    operation,
                    source: other,
                }
            }
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidId { field, value } => write!(f, "{field} is not a valid id: `{value}`"),
            Self::InvalidField(err) => write!(f, "{err}"),
            Self::MalformedCursor(_) => write!(f, "malformed pagination cursor"),
            Self::ForeignCursor(_) => {
                write!(f, "pagination cursor does not belong to this listing")
            }
            Self::UnknownIndex(index) => write!(f, "unknown index `{index}`"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::Store { operation, .. } => write!(f, "internal error during {operation}"),
            Self::CursorEncode(_) => write!(f, "internal error while building next cursor"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidField(err) => Some(err),
            Self::MalformedCursor(err) | Self::CursorEncode(err) => Some(err),
            Self::Store { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::InvalidField(value)
    }
}

/// Parses a caller-supplied identifier.
pub(crate) fn parse_id(field: &'static str, value: &str) -> ServiceResult<Uuid> {
    Uuid::parse_str(value).map_err(|_| ServiceError::InvalidId {
        field,
        value: value.to_string(),
    })
}
