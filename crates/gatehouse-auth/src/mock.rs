//! In-browser mock backend used when the hosted service is unreachable.
//!
//! # Design
//! - Test double only: secrets live in a plaintext table and are trusted as-is.
//! - Single user, single session, no expiry; each login mints fresh ids.
//! - An injected delay simulates network latency so loading states render.

use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use uuid::Uuid;

use crate::backend::{AuthBackend, BackendKind};
use crate::error::{AuthError, AuthResult};
use crate::model::{AuthResponse, Credentials, Session, SignUpOutcome, User};
use crate::policy::AllowList;
use crate::storage::{KeyValueStore, SessionStore};

/// Storage key for the mock session record.
pub const MOCK_SESSION_KEY: &str = "mock_admin_session";

/// Default mock secrets for the built-in admin addresses.
pub const DEFAULT_MOCK_SECRETS: [(&str, &str); 3] = [
    ("admin@test.com", "pass1word!"),
    ("admin@example.com", "admin123"),
    ("test@example.com", "test123"),
];

/// Asynchronous pause used to simulate latency.
#[async_trait(?Send)]
pub trait Delay {
    /// Suspend for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Delay that returns immediately.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDelay;

#[async_trait(?Send)]
impl Delay for NoDelay {
    async fn sleep(&self, _duration: Duration) {}
}

/// Allow-list plus the plaintext secret associated with each address.
#[derive(Clone, Debug)]
pub struct MockDirectory {
    allow_list: AllowList,
    secrets: HashMap<String, String>,
}

impl MockDirectory {
    /// Directory over `allow_list` with no secrets.
    #[must_use]
    pub fn new(allow_list: AllowList) -> Self {
        Self {
            allow_list,
            secrets: HashMap::new(),
        }
    }

    /// Directory over `allow_list` seeded with [`DEFAULT_MOCK_SECRETS`].
    #[must_use]
    pub fn with_default_secrets(allow_list: AllowList) -> Self {
        DEFAULT_MOCK_SECRETS
            .iter()
            .fold(Self::new(allow_list), |directory, (email, secret)| {
                directory.with_secret(*email, *secret)
            })
    }

    /// Attach a secret to `email`.
    #[must_use]
    pub fn with_secret(mut self, email: impl Into<String>, secret: impl Into<String>) -> Self {
        self.secrets.insert(email.into(), secret.into());
        self
    }

    fn check(&self, credentials: &Credentials) -> AuthResult<()> {
        if !self.allow_list.contains(&credentials.email) {
            return Err(AuthError::NotAuthorized);
        }
        match self.secrets.get(&credentials.email) {
            Some(secret) if *secret == credentials.password => Ok(()),
            _ => Err(AuthError::InvalidCredentials),
        }
    }

    fn register(&mut self, credentials: &Credentials) -> AuthResult<()> {
        if !self.allow_list.contains(&credentials.email) {
            return Err(AuthError::NotAuthorized);
        }
        if self.secrets.contains_key(&credentials.email) {
            return Err(AuthError::AlreadyRegistered);
        }
        self.secrets
            .insert(credentials.email.clone(), credentials.password.clone());
        Ok(())
    }
}

/// Mock implementation of [`AuthBackend`].
pub struct MockAuthBackend<S, D = NoDelay> {
    store: SessionStore<S>,
    directory: RefCell<MockDirectory>,
    delay: D,
    latency: Duration,
}

impl<S: KeyValueStore> MockAuthBackend<S, NoDelay> {
    /// Mock backend without artificial latency.
    pub fn new(storage: S, directory: MockDirectory) -> Self {
        Self::with_delay(storage, directory, NoDelay, Duration::ZERO)
    }
}

impl<S: KeyValueStore, D: Delay> MockAuthBackend<S, D> {
    /// Mock backend that waits `latency` through `delay` before each sign-in.
    pub fn with_delay(storage: S, directory: MockDirectory, delay: D, latency: Duration) -> Self {
        Self {
            store: SessionStore::new(storage, MOCK_SESSION_KEY),
            directory: RefCell::new(directory),
            delay,
            latency,
        }
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            self.delay.sleep(self.latency).await;
        }
    }
}

fn mint_session(email: &str) -> Session {
    let user = User {
        id: format!("mock-user-{}", Uuid::new_v4()),
        email: email.to_string(),
        created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    };
    Session {
        user,
        access_token: format!("mock-token-{}", Uuid::new_v4()),
        expires_at: None,
    }
}

#[async_trait(?Send)]
impl<S: KeyValueStore, D: Delay> AuthBackend for MockAuthBackend<S, D> {
    fn kind(&self) -> BackendKind {
        BackendKind::Mock
    }

    async fn sign_in_with_password(&self, credentials: &Credentials) -> AuthResult<AuthResponse> {
        self.simulate_latency().await;
        self.directory.borrow().check(credentials)?;

        let session = mint_session(&credentials.email);
        self.store.save(session.clone());
        tracing::info!(email = %credentials.email, "mock sign-in succeeded");
        Ok(AuthResponse::from(session))
    }

    async fn sign_up(&self, credentials: &Credentials) -> AuthResult<SignUpOutcome> {
        self.simulate_latency().await;
        self.directory.borrow_mut().register(credentials)?;
        tracing::info!(email = %credentials.email, "mock account registered");
        Ok(SignUpOutcome::ConfirmationSent {
            email: credentials.email.clone(),
        })
    }

    async fn get_session(&self) -> AuthResult<Option<Session>> {
        Ok(self.store.current())
    }

    async fn sign_out(&self) -> AuthResult<()> {
        self.store.clear();
        Ok(())
    }

    fn restore_session(&self, session: &Session) {
        self.store.save(session.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::cell::Cell;

    fn backend(storage: MemoryStore) -> MockAuthBackend<MemoryStore> {
        MockAuthBackend::new(
            storage,
            MockDirectory::with_default_secrets(AllowList::admin_defaults(None)),
        )
    }

    #[tokio::test]
    async fn known_admin_signs_in() {
        let backend = backend(MemoryStore::new());
        let response = backend
            .sign_in_with_password(&Credentials::new("admin@test.com", "pass1word!"))
            .await
            .unwrap();
        assert_eq!(response.user.email, "admin@test.com");
        assert_eq!(response.session.user, response.user);
        assert!(response.user.id.starts_with("mock-user-"));
        assert!(response.session.access_token.starts_with("mock-token-"));
        assert_eq!(backend.get_session().await.unwrap(), Some(response.session));
    }

    #[tokio::test]
    async fn unlisted_email_is_not_authorized_for_any_password() {
        let backend = backend(MemoryStore::new());
        for password in ["", "pass1word!", "anything"] {
            let err = backend
                .sign_in_with_password(&Credentials::new("nobody@example.com", password))
                .await
                .unwrap_err();
            assert_eq!(err, AuthError::NotAuthorized);
        }
    }

    #[tokio::test]
    async fn wrong_password_is_invalid_credentials() {
        let backend = backend(MemoryStore::new());
        for email in ["admin@test.com", "admin@example.com", "test@example.com"] {
            let err = backend
                .sign_in_with_password(&Credentials::new(email, "wrong"))
                .await
                .unwrap_err();
            assert_eq!(err, AuthError::InvalidCredentials);
        }
        assert!(backend.get_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn each_login_mints_new_ids() {
        let backend = backend(MemoryStore::new());
        let creds = Credentials::new("test@example.com", "test123");
        let first = backend.sign_in_with_password(&creds).await.unwrap();
        let second = backend.sign_in_with_password(&creds).await.unwrap();
        assert_ne!(first.user.id, second.user.id);
        assert_eq!(backend.get_session().await.unwrap(), Some(second.session));
    }

    #[tokio::test]
    async fn sign_out_then_get_session_is_empty() {
        let storage = MemoryStore::new();
        let backend = backend(storage.clone());
        backend.sign_out().await.unwrap();
        backend
            .sign_in_with_password(&Credentials::new("admin@test.com", "pass1word!"))
            .await
            .unwrap();
        backend.sign_out().await.unwrap();
        assert!(backend.get_session().await.unwrap().is_none());
        assert!(storage.get(MOCK_SESSION_KEY).is_none());
    }

    #[tokio::test]
    async fn override_slot_registers_then_signs_in() {
        let directory = MockDirectory::with_default_secrets(AllowList::admin_defaults(Some(
            "ops@example.dev",
        )));
        let backend = MockAuthBackend::new(MemoryStore::new(), directory);
        let creds = Credentials::new("ops@example.dev", "hunter22");

        assert_eq!(
            backend.sign_in_with_password(&creds).await.unwrap_err(),
            AuthError::InvalidCredentials
        );
        assert_eq!(
            backend.sign_up(&creds).await.unwrap(),
            SignUpOutcome::ConfirmationSent {
                email: "ops@example.dev".to_string()
            }
        );
        assert_eq!(
            backend.sign_up(&creds).await.unwrap_err(),
            AuthError::AlreadyRegistered
        );
        assert!(backend.sign_in_with_password(&creds).await.is_ok());
    }

    #[tokio::test]
    async fn sign_up_outside_allow_list_is_rejected() {
        let backend = backend(MemoryStore::new());
        let err = backend
            .sign_up(&Credentials::new("nobody@example.com", "secret1"))
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::NotAuthorized);
    }

    struct CountingDelay {
        calls: Cell<u32>,
    }

    #[async_trait(?Send)]
    impl Delay for CountingDelay {
        async fn sleep(&self, duration: Duration) {
            assert_eq!(duration, Duration::from_millis(500));
            self.calls.set(self.calls.get() + 1);
        }
    }

    #[tokio::test]
    async fn latency_applies_before_every_sign_in() {
        let backend = MockAuthBackend::with_delay(
            MemoryStore::new(),
            MockDirectory::with_default_secrets(AllowList::admin_defaults(None)),
            CountingDelay {
                calls: Cell::new(0),
            },
            Duration::from_millis(500),
        );
        let _ = backend
            .sign_in_with_password(&Credentials::new("nobody@example.com", "x"))
            .await;
        let _ = backend
            .sign_in_with_password(&Credentials::new("admin@test.com", "pass1word!"))
            .await;
        assert_eq!(backend.delay.calls.get(), 2);
    }
}
