//! Domain error taxonomy with fixed HTTP status codes.
//!
//! Handlers raise one of a closed set of error kinds; the invocation wrapper
//! catches them exactly once at its boundary and turns them into a
//! well-formed error envelope via [`classify`].

use http::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Convenient result alias for proxy helper operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Open error type propagated by wrapped handlers.
///
/// Domain errors convert into this with `?` or `.into()`; anything else a
/// handler bubbles up (IO, parsing, ...) rides along and is classified as an
/// unhandled exception at the wrapper boundary.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Closed set of domain error kinds.
///
/// Each kind carries a caller-supplied message and owns a fixed status code
/// and a stable human-readable label used in responses and logs. The status
/// is not caller-settable.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when the item being requested cannot be found.
    #[error("{0}")]
    NotFound(String),

    /// Raised when the endpoint expects a parameter that was not provided.
    #[error("{0}")]
    MissingParameter(String),

    /// Raised when a provided parameter is invalid.
    #[error("{0}")]
    InvalidParameter(String),

    /// Raised when creating an object that already exists.
    #[error("{0}")]
    AlreadyExists(String),

    /// Raised when a delete would break foreign key constraints.
    #[error("{0}")]
    RelatedRecordsExist(String),

    /// Raised when validation of a request fails.
    #[error("{0}")]
    Validation(String),

    /// Raised when the handler cannot determine the correct function call.
    #[error("{0}")]
    InvalidFunctionRequest(String),

    /// Raised when the user cannot be determined from the request.
    #[error("{0}")]
    InvalidUser(String),

    /// Raised when no more specific kind applies. May carry an opaque
    /// context value (e.g. the originating request event) for diagnostics;
    /// the context is never serialized into the user-visible body.
    #[error("{message}")]
    General {
        message: String,
        context: Option<Value>,
    },
}

impl Error {
    /// Create a general error without diagnostic context.
    pub fn general(message: impl Into<String>) -> Self {
        Error::General {
            message: message.into(),
            context: None,
        }
    }

    /// Create a general error carrying an opaque diagnostic context.
    pub fn general_with_context(message: impl Into<String>, context: Value) -> Self {
        Error::General {
            message: message.into(),
            context: Some(context),
        }
    }

    /// Fixed HTTP status code for this kind.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::General { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// Stable label for this kind, used as the `errorType` response field.
    pub fn error_type(&self) -> &'static str {
        match self {
            Error::NotFound(_) => "Not Found Error",
            Error::MissingParameter(_) => "Missing Parameter Error",
            Error::InvalidParameter(_) => "Invalid Parameter Error",
            Error::AlreadyExists(_) => "Object Already Exists Error",
            Error::RelatedRecordsExist(_) => "Related Records Exist Error",
            Error::Validation(_) => "Validation Error",
            Error::InvalidFunctionRequest(_) => "Invalid Function Request Error",
            Error::InvalidUser(_) => "Invalid User Error",
            Error::General { .. } => "General Error",
        }
    }

    /// Diagnostic context, present only on [`Error::General`].
    pub fn context(&self) -> Option<&Value> {
        match self {
            Error::General { context, .. } => context.as_ref(),
            _ => None,
        }
    }
}

/// Outcome of classifying an error at the wrapper boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    pub status_code: StatusCode,
    pub message: String,
    pub error_type: String,
}

/// Classify any handler error into `(status, message, errorType)`.
///
/// Known domain errors map to their fixed status, message and label.
/// Everything else becomes a 500 with the message prefixed
/// `"An unhandled exception was raised: "` and an `errorType` derived from
/// the error's runtime type description. Classification is total; it never
/// fails regardless of what the handler propagated.
pub fn classify(err: &(dyn std::error::Error + Send + Sync + 'static)) -> Classified {
    match err.downcast_ref::<Error>() {
        Some(domain) => Classified {
            status_code: domain.status_code(),
            message: domain.to_string(),
            error_type: domain.error_type().to_string(),
        },
        None => Classified {
            status_code: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("An unhandled exception was raised: {err}"),
            error_type: type_description(err),
        },
    }
}

/// Best-available description of an unclassified error's runtime type.
///
/// Trait objects expose no type name, so this takes the leading identifier
/// of the `Debug` rendering (`ParseIntError { kind: InvalidDigit }` becomes
/// `ParseIntError`), falling back to the Display text.
fn type_description(err: &(dyn std::error::Error + Send + Sync + 'static)) -> String {
    let debug = format!("{err:?}");
    let head: String = debug
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_')
        .collect();
    if head.is_empty() {
        err.to_string()
    } else {
        head
    }
}
