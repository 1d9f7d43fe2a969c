//! Defines the crate level error type and its mapping to user-facing alerts.

use rust_decimal::Decimal;

use crate::alert::Alert;

/// The errors that may occur in the client.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// No response was received from the backend, e.g. the connection was
    /// refused or the request timed out.
    #[error("could not reach the server: {0}")]
    NetworkFailure(String),

    /// The backend rejected the session credentials with a 401 or 403.
    ///
    /// By the time callers see this error the session has already been
    /// cleared, so they should route back to the log in view.
    #[error("the server rejected the session credentials (HTTP {status})")]
    AuthorizationFailure {
        /// The HTTP status code of the rejected response.
        status: u16,
    },

    /// The backend rejected the request with a 4xx status other than 401/403.
    ///
    /// `message` is the server-provided explanation and is safe to show next
    /// to the offending form field.
    #[error("{message}")]
    ValidationFailure {
        /// The HTTP status code of the rejected response.
        status: u16,
        /// The message the server gave for rejecting the request.
        message: String,
    },

    /// The backend failed to process the request (5xx).
    #[error("the server failed to handle the request (HTTP {status}): {message}")]
    ServerFailure {
        /// The HTTP status code of the failed response.
        status: u16,
        /// The message the server gave for the failure, if any.
        message: String,
    },

    /// A response arrived after the session it was issued under ended.
    ///
    /// The response has been discarded and must not be applied to any state.
    #[error("the session ended before the response arrived")]
    StaleSession,

    /// The response body could not be decoded into the expected type.
    #[error("could not decode the server response: {0}")]
    UnexpectedResponse(String),

    /// A required text field was empty.
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),

    /// An amount was zero or negative where a positive amount is required.
    ///
    /// The sign of a transaction is carried by its type, and a budget must
    /// have a positive ceiling.
    #[error("amount must be greater than zero, got {0}")]
    NonPositiveAmount(Decimal),

    /// A string could not be parsed as a currency amount.
    #[error("\"{0}\" is not a valid currency amount")]
    InvalidCurrency(String),

    /// A date or date-time string could not be parsed.
    ///
    /// Callers should pass in the original error as a string and the date
    /// string that caused the error.
    #[error("could not parse date \"{1}\": {0}")]
    InvalidDate(String, String),

    /// A request body could not be encoded as JSON.
    #[error("could not encode the request body: {0}")]
    EncodeRequest(String),

    /// The stored credential token cannot be sent as a header value.
    ///
    /// The session has been cleared, the user must log in again.
    #[error("the stored credentials are corrupt, log in again")]
    InvalidCredentialToken,

    /// The configured API base URL, or a URL built from it, is not valid.
    #[error("invalid URL \"{0}\"")]
    InvalidUrl(String),

    /// An unhandled/unexpected SQL error in the durable session storage.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// The session storage directory could not be created.
    #[error("could not prepare the session storage: {0}")]
    StorageIo(String),

    /// Could not acquire the session lock.
    #[error("could not acquire the session lock")]
    SessionLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::SqlError(value)
    }
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            Error::UnexpectedResponse(value.to_string())
        } else {
            Error::NetworkFailure(value.to_string())
        }
    }
}

impl Error {
    /// Whether this error invalidated the session.
    pub fn is_authorization_failure(&self) -> bool {
        matches!(self, Error::AuthorizationFailure { .. })
    }

    /// Convert the error into the alert the user should see.
    ///
    /// Validation failures render inline next to the form, network and server
    /// failures render as a dismissible banner, and authorization failures
    /// route back to the log in view without a retry prompt.
    pub fn into_alert(self) -> Alert {
        match self {
            Error::AuthorizationFailure { .. } | Error::InvalidCredentialToken => {
                Alert::RedirectToLogIn
            }
            Error::StaleSession => Alert::Discard,
            Error::ValidationFailure { message, .. } => Alert::Inline { message },
            error @ (Error::EmptyField(_)
            | Error::NonPositiveAmount(_)
            | Error::InvalidCurrency(_)
            | Error::InvalidDate(_, _)) => Alert::Inline {
                message: error.to_string(),
            },
            Error::NetworkFailure(details) => Alert::Banner {
                message: "Could not reach the server".to_owned(),
                details,
            },
            Error::ServerFailure { status, message } => Alert::Banner {
                message: "Something went wrong on the server".to_owned(),
                details: format!("HTTP {status}: {message}"),
            },
            // Anything not handled above is a local fault the user cannot fix
            // by editing their input.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                Alert::Banner {
                    message: "Something went wrong".to_owned(),
                    details: error.to_string(),
                }
            }
        }
    }
}
