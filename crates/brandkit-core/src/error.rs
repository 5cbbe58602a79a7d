//! Error taxonomy for remote calls.
//!
//! Every call that leaves the process (store reads and writes, auth, file
//! storage, completions) resolves to a [`ClientError`] on failure. The variant
//! tells the caller how the failure should be treated:
//!
//! | Kind | Meaning | Retried |
//! |------|---------|---------|
//! | [`ErrorKind::Offline`] | the connectivity probe reported no network | never, fails fast |
//! | [`ErrorKind::Transient`] | transport failure (DNS, refused, reset) | yes |
//! | [`ErrorKind::NotAuthenticated`] | user-scoped call without a session | never |
//! | [`ErrorKind::RemoteRejected`] | the remote answered with a structured error | never |
//! | [`ErrorKind::QuotaExceeded`] | completion API rate limit or quota | never, triggers the local responder |
//! | [`ErrorKind::Unknown`] | anything else | never |
//!
//! Errors travel unchanged through the retry executor and the gateway so the
//! message a store finally displays is the message the failure was created
//! with.
//!
//! ```
//! use brandkit_core::{ClientError, ErrorKind};
//!
//! let err = ClientError::Transient("connection reset by peer".to_string());
//! assert_eq!(err.kind(), ErrorKind::Transient);
//! assert!(err.is_transient());
//! assert_eq!(err.to_string(), "Network error: connection reset by peer");
//! ```

use std::fmt;

/// The category of a [`ClientError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No connectivity according to the prober.
    Offline,
    /// Network or transport failure eligible for retry.
    Transient,
    /// A user-scoped operation was attempted without a session.
    NotAuthenticated,
    /// The remote store returned a structured error.
    RemoteRejected,
    /// The completion API is rate limited or out of quota.
    QuotaExceeded,
    /// Anything else.
    Unknown,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Offline => "offline",
            ErrorKind::Transient => "transient",
            ErrorKind::NotAuthenticated => "not_authenticated",
            ErrorKind::RemoteRejected => "remote_rejected",
            ErrorKind::QuotaExceeded => "quota_exceeded",
            ErrorKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Error returned by every remote operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// The connectivity prober reported that the network is unreachable.
    #[error("No internet connection")]
    Offline,

    /// The request could not be delivered (DNS, refused connection, reset).
    #[error("Network error: {0}")]
    Transient(String),

    /// The operation needs a signed-in user and there is no session.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// The remote service answered with an error payload.
    #[error("{message}")]
    RemoteRejected {
        /// HTTP status of the response.
        status: u16,
        /// Service specific error code (e.g. a Postgres SQLSTATE).
        code: Option<String>,
        /// Human readable message.
        message: String,
        /// Additional detail supplied by the service.
        details: Option<String>,
    },

    /// The completion API refused the call for rate limit or quota reasons.
    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Any other failure, such as an undecodable response.
    #[error("{0}")]
    Unknown(String),
}

impl ClientError {
    /// Builds a [`ClientError::RemoteRejected`] with only a status and message.
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        ClientError::RemoteRejected {
            status,
            code: None,
            message: message.into(),
            details: None,
        }
    }

    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Offline => ErrorKind::Offline,
            ClientError::Transient(_) => ErrorKind::Transient,
            ClientError::NotAuthenticated => ErrorKind::NotAuthenticated,
            ClientError::RemoteRejected { .. } => ErrorKind::RemoteRejected,
            ClientError::QuotaExceeded(_) => ErrorKind::QuotaExceeded,
            ClientError::Unknown(_) => ErrorKind::Unknown,
        }
    }

    /// Returns `true` if the failure is worth retrying.
    pub fn is_transient(&self) -> bool {
        matches!(self, ClientError::Transient(_))
    }

    /// Returns `true` if the prober reported no connectivity.
    pub fn is_offline(&self) -> bool {
        matches!(self, ClientError::Offline)
    }

    /// Returns `true` if the completion API ran out of quota.
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, ClientError::QuotaExceeded(_))
    }

    /// Returns the service specific code of a rejected call.
    pub fn code(&self) -> Option<&str> {
        match self {
            ClientError::RemoteRejected { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Returns the HTTP status of a rejected call.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::RemoteRejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}
