//! Error taxonomy for authentication, configuration, and transport failures.

use thiserror::Error;

/// Failures surfaced by auth backends and the authorization gate.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Credentials were well-formed but the email is not privileged.
    #[error("not authorized")]
    NotAuthorized,
    /// Email and password do not match.
    #[error("invalid credentials")]
    InvalidCredentials,
    /// The email already has credentials registered.
    #[error("already registered")]
    AlreadyRegistered,
    /// The remote backend did not answer the availability probe.
    #[error("backend unavailable")]
    ProbeUnavailable,
    /// A persisted session record could not be decoded.
    #[error("stored session corrupt")]
    StorageCorrupt {
        /// Decoder error detail.
        detail: String,
    },
    /// Any other failure during an auth operation.
    #[error("auth operation failed")]
    Unknown {
        /// Underlying failure detail, logged but never shown verbatim.
        detail: String,
    },
}

impl AuthError {
    /// Build an [`AuthError::Unknown`] from any displayable detail.
    #[must_use]
    pub fn unknown(detail: impl Into<String>) -> Self {
        Self::Unknown {
            detail: detail.into(),
        }
    }

    /// Message shown at form level.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::NotAuthorized => "This account does not have administrator access.",
            Self::InvalidCredentials => "Email address or password is incorrect.",
            Self::AlreadyRegistered => "An account already exists for this email address.",
            Self::ProbeUnavailable | Self::StorageCorrupt { .. } | Self::Unknown { .. } => {
                "Sign-in failed. Please try again."
            }
        }
    }

    /// Translation key matching [`Self::user_message`].
    #[must_use]
    pub const fn message_key(&self) -> &'static str {
        match self {
            Self::NotAuthorized => "auth.error.not_authorized",
            Self::InvalidCredentials => "auth.error.invalid_credentials",
            Self::AlreadyRegistered => "auth.error.already_registered",
            Self::ProbeUnavailable | Self::StorageCorrupt { .. } | Self::Unknown { .. } => {
                "auth.error.unknown"
            }
        }
    }

    /// Whether resubmitting the same identity can succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        !matches!(self, Self::NotAuthorized | Self::AlreadyRegistered)
    }
}

/// Convenience alias for auth results.
pub type AuthResult<T> = Result<T, AuthError>;

/// Errors raised while parsing configuration values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Field contained an invalid value.
    #[error("invalid value for '{field}': {reason}")]
    InvalidField {
        /// Field that failed validation.
        field: &'static str,
        /// Offending value.
        value: String,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Failures raised by an HTTP transport.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The request exceeded its deadline and was aborted.
    #[error("request timed out after {millis} ms")]
    Timeout {
        /// Deadline that elapsed.
        millis: u64,
    },
    /// The request could not be built, sent, or read.
    #[error("network error: {0}")]
    Network(String),
}

impl TransportError {
    /// Classify a failed send or body read; an aborted request hit its deadline.
    #[must_use]
    pub fn interrupted(
        aborted: bool,
        deadline_ms: Option<u64>,
        detail: impl std::fmt::Display,
    ) -> Self {
        if aborted {
            Self::Timeout {
                millis: deadline_ms.unwrap_or(0),
            }
        } else {
            Self::Network(detail.to_string())
        }
    }
}
