//! Capability interface shared by the hosted and mock auth backends.

use async_trait::async_trait;

use crate::error::AuthResult;
use crate::model::{AuthResponse, Credentials, Session, SignUpOutcome};

/// Which backend services auth calls for the current page load.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendKind {
    /// Hosted auth service.
    Remote,
    /// In-browser mock store.
    Mock,
}

impl BackendKind {
    /// Stable label for logs and UI badges.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Mock => "mock",
        }
    }
}

/// Session-issuing service. Futures are `?Send`: the front-end runs on one thread.
#[async_trait(?Send)]
pub trait AuthBackend {
    /// Which variant this is.
    fn kind(&self) -> BackendKind;

    /// Exchange an email/password pair for a session.
    async fn sign_in_with_password(&self, credentials: &Credentials) -> AuthResult<AuthResponse>;

    /// Register a new account.
    async fn sign_up(&self, credentials: &Credentials) -> AuthResult<SignUpOutcome>;

    /// Current session, if any.
    async fn get_session(&self) -> AuthResult<Option<Session>>;

    /// End the current session. Succeeds when no session exists.
    async fn sign_out(&self) -> AuthResult<()>;

    /// Make `session` the stored session again without contacting the service.
    fn restore_session(&self, session: &Session);
}
