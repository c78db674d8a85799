//! Session and user records shared by every backend.
//!
//! # Design
//! - Records serialize to the same JSON shape the browser storage keeps.
//! - `expires_at` is optional so mock sessions round-trip without it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authenticated user identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Opaque identifier assigned by the backend.
    pub id: String,
    /// Email address the user signed in with.
    pub email: String,
    /// Creation timestamp in RFC 3339 form.
    pub created_at: String,
}

/// Proof of authentication held client-side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// User bound to this session.
    pub user: User,
    /// Bearer token for backend calls.
    pub access_token: String,
    /// Expiry as unix seconds, when the backend issues one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

impl Session {
    /// Email of the session owner.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.user.email
    }

    /// Whether the session has expired at `now`. Sessions without expiry never do.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at
            .is_some_and(|expires_at| expires_at <= now.timestamp())
    }
}

/// Successful sign-in payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthResponse {
    /// Signed-in user.
    pub user: User,
    /// Newly issued session.
    pub session: Session,
}

impl From<Session> for AuthResponse {
    fn from(session: Session) -> Self {
        Self {
            user: session.user.clone(),
            session,
        }
    }
}

/// Result of a successful sign-up request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignUpOutcome {
    /// The account must be confirmed through a mailed link first.
    ConfirmationSent {
        /// Address the confirmation went to.
        email: String,
    },
    /// The backend signed the new account in immediately.
    SignedIn(Session),
}

/// Email/password pair submitted by a form.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Email address.
    pub email: String,
    /// Plaintext password, never logged.
    pub password: String,
}

impl Credentials {
    /// Build a credential pair.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
