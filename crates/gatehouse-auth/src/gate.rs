//! Authorization gate: the single entry point guarding a sub-application.
//!
//! # Design
//! - States: `Initializing -> Checking -> {Unauthenticated, Authenticated}`.
//! - Sessions that fail the access policy are signed out on detection.
//! - A generation counter bumps on sign-out; operations started before it
//!   never commit afterwards, and a late successful login is signed out again.
//! - Discarding a backend sign-in re-stores the session the gate still shows,
//!   so storage never disagrees with the rendered state.
//! - Interior mutability only; no `RefCell` borrow is held across an await.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::backend::{AuthBackend, BackendKind};
use crate::error::{AuthError, AuthResult};
use crate::model::{Credentials, Session, SignUpOutcome};
use crate::policy::AccessPolicy;
use crate::probe::BackendSelector;

/// Render decision of the gate.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum GateState {
    /// Client has not finished its first render.
    #[default]
    Initializing,
    /// Probe, session lookup, or login in flight.
    Checking,
    /// No qualifying session; carries the last form-level error.
    Unauthenticated {
        /// Error from the last login attempt, if any.
        error: Option<AuthError>,
    },
    /// Qualifying session present.
    Authenticated {
        /// The live session.
        session: Session,
    },
}

impl GateState {
    /// Unauthenticated state without an error.
    #[must_use]
    pub const fn signed_out() -> Self {
        Self::Unauthenticated { error: None }
    }

    /// Whether the gate is still resolving.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Initializing | Self::Checking)
    }

    /// Session when authenticated.
    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        match self {
            Self::Authenticated { session } => Some(session),
            _ => None,
        }
    }

    /// Error surfaced by the last login attempt.
    #[must_use]
    pub const fn error(&self) -> Option<&AuthError> {
        match self {
            Self::Unauthenticated { error } => error.as_ref(),
            _ => None,
        }
    }
}

/// Gate orchestrating backend selection, session lookup, and policy checks.
pub struct AuthGate {
    selector: BackendSelector,
    policy: RefCell<AccessPolicy>,
    state: RefCell<GateState>,
    generation: Cell<u64>,
}

impl AuthGate {
    /// Gate in [`GateState::Initializing`].
    #[must_use]
    pub fn new(selector: BackendSelector, policy: AccessPolicy) -> Self {
        Self {
            selector,
            policy: RefCell::new(policy),
            state: RefCell::new(GateState::Initializing),
            generation: Cell::new(0),
        }
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> GateState {
        self.state.borrow().clone()
    }

    /// Backend chosen for this page load, once the probe has run.
    #[must_use]
    pub fn backend_kind(&self) -> Option<BackendKind> {
        self.selector.selected().map(|selected| selected.kind)
    }

    /// Replace the access policy. Takes effect at the next evaluation.
    pub fn set_policy(&self, policy: AccessPolicy) {
        *self.policy.borrow_mut() = policy;
    }

    /// First evaluation after the client rendered: probe, then look up the session.
    pub async fn mount(&self) -> GateState {
        if *self.state.borrow() == GateState::Initializing {
            self.set_state(GateState::Checking);
        }
        self.evaluate().await
    }

    /// Re-check the session against the policy.
    pub async fn evaluate(&self) -> GateState {
        let ticket = self.generation.get();
        let backend = self.backend().await;

        let next = match backend.get_session().await {
            Ok(Some(session)) if self.permits(&session) => GateState::Authenticated { session },
            Ok(Some(session)) => {
                tracing::info!(email = %session.user.email, "session no longer qualifies; signing out");
                sign_out_quietly(backend.as_ref()).await;
                GateState::signed_out()
            }
            Ok(None) => GateState::signed_out(),
            Err(err) => {
                tracing::error!(error = ?err, "session lookup failed");
                GateState::signed_out()
            }
        };
        self.commit(ticket, next)
    }

    /// Submit credentials; on success the gate authenticates only if the policy allows.
    pub async fn login(&self, credentials: &Credentials) -> GateState {
        let ticket = self.generation.get();
        self.set_state(GateState::Checking);
        let backend = self.backend().await;

        let next = match backend.sign_in_with_password(credentials).await {
            Ok(_) if !self.is_current(ticket) => {
                tracing::info!("discarding login that completed after sign-out");
                self.discard(backend.as_ref()).await;
                return self.state();
            }
            Ok(response) if self.permits(&response.session) => GateState::Authenticated {
                session: response.session,
            },
            Ok(response) => {
                tracing::info!(email = %response.user.email, "login outside access policy");
                self.discard(backend.as_ref()).await;
                GateState::Unauthenticated {
                    error: Some(AuthError::NotAuthorized),
                }
            }
            Err(err) => {
                log_failure(&err);
                GateState::Unauthenticated { error: Some(err) }
            }
        };
        self.commit(ticket, next)
    }

    /// Register an account; authenticates when the backend signs the user in directly.
    ///
    /// # Errors
    ///
    /// Returns the backend's [`AuthError`]; the gate state is left unchanged.
    pub async fn sign_up(&self, credentials: &Credentials) -> AuthResult<SignUpOutcome> {
        let ticket = self.generation.get();
        let backend = self.backend().await;
        let outcome = backend.sign_up(credentials).await.inspect_err(log_failure)?;
        if let SignUpOutcome::SignedIn(session) = &outcome {
            if self.permits(session) && self.is_current(ticket) {
                self.commit(
                    ticket,
                    GateState::Authenticated {
                        session: session.clone(),
                    },
                );
            } else {
                self.discard(backend.as_ref()).await;
            }
        }
        Ok(outcome)
    }

    /// End the session. Always lands in [`GateState::Unauthenticated`].
    pub async fn sign_out(&self) -> GateState {
        self.generation.set(self.generation.get().wrapping_add(1));
        self.set_state(GateState::signed_out());
        let backend = self.backend().await;
        sign_out_quietly(backend.as_ref()).await;
        self.state()
    }

    /// Drop a surfaced login error, e.g. when the user edits the form.
    pub fn clear_error(&self) {
        let mut state = self.state.borrow_mut();
        if matches!(*state, GateState::Unauthenticated { error: Some(_) }) {
            *state = GateState::signed_out();
        }
    }

    /// Undo a backend sign-in that will not be committed.
    async fn discard(&self, backend: &dyn AuthBackend) {
        sign_out_quietly(backend).await;
        let current = self.state();
        if let Some(session) = current.session() {
            backend.restore_session(session);
        }
    }

    async fn backend(&self) -> Rc<dyn AuthBackend> {
        self.selector.select().await.backend
    }

    fn permits(&self, session: &Session) -> bool {
        self.policy.borrow().permits(session)
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.generation.get() == ticket
    }

    fn set_state(&self, next: GateState) {
        *self.state.borrow_mut() = next;
    }

    fn commit(&self, ticket: u64, next: GateState) -> GateState {
        if self.is_current(ticket) {
            self.set_state(next);
        }
        self.state()
    }
}

async fn sign_out_quietly(backend: &dyn AuthBackend) {
    if let Err(err) = backend.sign_out().await {
        tracing::warn!(error = ?err, "sign-out failed");
    }
}

fn log_failure(err: &AuthError) {
    match err {
        AuthError::Unknown { detail } => tracing::error!(%detail, "auth operation failed"),
        other if other.is_retryable() => tracing::debug!(error = %other, "auth operation rejected"),
        other => tracing::info!(error = %other, "auth operation refused for this identity"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{Delay, MOCK_SESSION_KEY, MockAuthBackend, MockDirectory};
    use crate::policy::AllowList;
    use crate::storage::{MemoryStore, SessionStore};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::time::Duration;

    /// Hands out one queued pause per sign-in; later calls return at once.
    struct StaggeredDelay(RefCell<VecDeque<Duration>>);

    impl StaggeredDelay {
        fn new(pauses: impl IntoIterator<Item = Duration>) -> Self {
            Self(RefCell::new(pauses.into_iter().collect()))
        }
    }

    #[async_trait(?Send)]
    impl Delay for StaggeredDelay {
        async fn sleep(&self, _requested: Duration) {
            let pause = self.0.borrow_mut().pop_front().unwrap_or_default();
            tokio::time::sleep(pause).await;
        }
    }

    fn gate(storage: MemoryStore, policy: AccessPolicy) -> AuthGate {
        let mock = MockAuthBackend::new(
            storage,
            MockDirectory::with_default_secrets(AllowList::admin_defaults(None)),
        );
        AuthGate::new(BackendSelector::fixed(Rc::new(mock)), policy)
    }

    fn staggered_gate(storage: MemoryStore, pauses: &[u64]) -> AuthGate {
        let mock = MockAuthBackend::with_delay(
            storage,
            MockDirectory::with_default_secrets(AllowList::admin_defaults(None)),
            StaggeredDelay::new(pauses.iter().copied().map(Duration::from_millis)),
            Duration::from_millis(1),
        );
        AuthGate::new(BackendSelector::fixed(Rc::new(mock)), admin_policy())
    }

    fn stored(storage: &MemoryStore) -> Option<Session> {
        SessionStore::new(storage.clone(), MOCK_SESSION_KEY).current()
    }

    async fn sign_out_after(gate: &AuthGate, millis: u64) -> GateState {
        tokio::time::sleep(Duration::from_millis(millis)).await;
        gate.sign_out().await
    }

    fn admin_policy() -> AccessPolicy {
        AccessPolicy::AllowList(AllowList::admin_defaults(None))
    }

    #[tokio::test]
    async fn starts_initializing_and_mounts_signed_out() {
        let gate = gate(MemoryStore::new(), admin_policy());
        assert_eq!(gate.state(), GateState::Initializing);
        assert_eq!(gate.mount().await, GateState::signed_out());
    }

    #[tokio::test]
    async fn login_authenticates_allow_listed_admin() {
        let gate = gate(MemoryStore::new(), admin_policy());
        gate.mount().await;
        let state = gate
            .login(&Credentials::new("admin@test.com", "pass1word!"))
            .await;
        assert_eq!(
            state.session().map(Session::email),
            Some("admin@test.com")
        );
        assert_eq!(gate.backend_kind(), Some(BackendKind::Mock));
    }

    #[tokio::test]
    async fn failed_login_surfaces_error_and_stays_signed_out() {
        let gate = gate(MemoryStore::new(), admin_policy());
        gate.mount().await;
        let state = gate
            .login(&Credentials::new("admin@test.com", "nope"))
            .await;
        assert_eq!(state.error(), Some(&AuthError::InvalidCredentials));
        gate.clear_error();
        assert_eq!(gate.state(), GateState::signed_out());
    }

    #[tokio::test]
    async fn existing_session_is_restored_on_mount() {
        let storage = MemoryStore::new();
        let first = gate(storage.clone(), admin_policy());
        first
            .login(&Credentials::new("test@example.com", "test123"))
            .await;

        let reloaded = gate(storage, admin_policy());
        let state = reloaded.mount().await;
        assert_eq!(state.session().map(Session::email), Some("test@example.com"));
    }

    #[tokio::test]
    async fn narrower_policy_signs_existing_session_out() {
        let storage = MemoryStore::new();
        let gate = gate(storage.clone(), admin_policy());
        gate.login(&Credentials::new("admin@test.com", "pass1word!"))
            .await;

        gate.set_policy(AccessPolicy::AllowList(AllowList::new(["admin@example.com"])));
        assert_eq!(gate.evaluate().await, GateState::signed_out());
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn login_outside_policy_is_rejected_and_signed_out() {
        let storage = MemoryStore::new();
        let gate = gate(
            storage.clone(),
            AccessPolicy::AllowList(AllowList::new(["admin@example.com"])),
        );
        let state = gate
            .login(&Credentials::new("admin@test.com", "pass1word!"))
            .await;
        assert_eq!(state.error(), Some(&AuthError::NotAuthorized));
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn sign_out_always_lands_unauthenticated() {
        let gate = gate(MemoryStore::new(), admin_policy());
        assert_eq!(gate.sign_out().await, GateState::signed_out());
        gate.login(&Credentials::new("admin@test.com", "pass1word!"))
            .await;
        assert_eq!(gate.sign_out().await, GateState::signed_out());
        assert_eq!(gate.evaluate().await, GateState::signed_out());
    }

    #[tokio::test]
    async fn stale_commit_is_ignored() {
        let gate = gate(MemoryStore::new(), admin_policy());
        let ticket = gate.generation.get();
        gate.sign_out().await;
        let state = gate.commit(
            ticket,
            GateState::Unauthenticated {
                error: Some(AuthError::InvalidCredentials),
            },
        );
        assert_eq!(state, GateState::signed_out());
    }

    #[tokio::test]
    async fn login_finishing_after_sign_out_is_undone() {
        let storage = MemoryStore::new();
        let gate = staggered_gate(storage.clone(), &[50]);
        let admin = Credentials::new("admin@test.com", "pass1word!");

        let (late, signed_out) = tokio::join!(gate.login(&admin), sign_out_after(&gate, 10));

        assert_eq!(signed_out, GateState::signed_out());
        assert_eq!(late, GateState::signed_out());
        assert_eq!(stored(&storage), None);
        assert_eq!(gate.evaluate().await, GateState::signed_out());
    }

    #[tokio::test]
    async fn failure_finishing_after_sign_out_is_not_surfaced() {
        let gate = staggered_gate(MemoryStore::new(), &[50]);
        let wrong = Credentials::new("admin@test.com", "nope");

        let (late, _) = tokio::join!(gate.login(&wrong), sign_out_after(&gate, 10));

        assert_eq!(late, GateState::signed_out());
        assert_eq!(gate.state().error(), None);
    }

    #[tokio::test]
    async fn stale_login_keeps_newer_session_stored() {
        let storage = MemoryStore::new();
        let gate = staggered_gate(storage.clone(), &[50]);
        let first = Credentials::new("admin@test.com", "pass1word!");
        let second = Credentials::new("test@example.com", "test123");

        let (_, newer) = tokio::join!(gate.login(&first), async {
            sign_out_after(&gate, 10).await;
            gate.login(&second).await
        });

        let newer = newer.session().cloned();
        assert_eq!(newer.as_ref().map(Session::email), Some("test@example.com"));
        assert_eq!(gate.state().session().cloned(), newer);
        assert_eq!(stored(&storage), newer);
        assert_eq!(gate.evaluate().await.session().cloned(), newer);
    }
}
