//! App-wide yewdux store mirroring the gate.
//!
//! # Design
//! - The gate owns the truth; the store holds the last published snapshot so
//!   components re-render through `use_selector`.
//! - `submitting` is owned by the UI: it separates a form's own login from the
//!   mount-time check, both of which put the gate in `Checking`.

use gatehouse_auth::{BackendKind, GateState, GuardDecision};
use yewdux::store::Store;

/// Snapshot of gate state shared across components.
#[derive(Clone, Debug, PartialEq, Eq, Store, Default)]
pub struct AuthStore {
    /// Last published gate state.
    pub gate: GateState,
    /// Backend chosen for this page load, once known.
    pub backend: Option<BackendKind>,
    /// A login or sign-up form submission is in flight.
    pub submitting: bool,
}

impl AuthStore {
    /// Record a gate state and the backend that produced it.
    pub fn publish(&mut self, gate: GateState, backend: Option<BackendKind>) {
        self.gate = gate;
        if backend.is_some() {
            self.backend = backend;
        }
    }

    /// Signed-in email, if any.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.gate.session().map(|session| session.user.email.as_str())
    }

    /// Guard decision for a protected page.
    #[must_use]
    pub const fn protected_decision(&self) -> GuardDecision {
        GuardDecision::for_protected(&self.gate)
    }

    /// Guard decision for the login page.
    #[must_use]
    pub const fn login_decision(&self) -> GuardDecision {
        GuardDecision::for_login_page(&self.gate, self.submitting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_keeps_known_backend() {
        let mut store = AuthStore::default();
        store.publish(GateState::Checking, Some(BackendKind::Mock));
        store.publish(GateState::signed_out(), None);
        assert_eq!(store.backend, Some(BackendKind::Mock));
        assert_eq!(store.gate, GateState::signed_out());
        assert_eq!(store.email(), None);
    }

    #[test]
    fn submitting_keeps_login_form_on_screen() {
        let mut store = AuthStore::default();
        store.publish(GateState::Checking, None);
        assert_eq!(store.login_decision(), GuardDecision::Pending);
        store.submitting = true;
        assert_eq!(store.login_decision(), GuardDecision::Render);
        assert_eq!(store.protected_decision(), GuardDecision::Pending);
    }
}
