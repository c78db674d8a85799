//! Route-level guard decisions for pages behind the gate.

use crate::gate::GateState;

/// What a protected route should do for a gate state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Gate still resolving; show a spinner.
    Pending,
    /// Send the visitor to the login route.
    Redirect,
    /// Render the protected content.
    Render,
}

impl GuardDecision {
    /// Decision for a page that requires a session.
    #[must_use]
    pub const fn for_protected(state: &GateState) -> Self {
        match state {
            GateState::Initializing | GateState::Checking => Self::Pending,
            GateState::Unauthenticated { .. } => Self::Redirect,
            GateState::Authenticated { .. } => Self::Render,
        }
    }

    /// Decision for the login page: signed-in visitors are sent away.
    ///
    /// `submitting` keeps the form on screen while its own login is in flight.
    #[must_use]
    pub const fn for_login_page(state: &GateState, submitting: bool) -> Self {
        match state {
            GateState::Initializing => Self::Pending,
            GateState::Checking if !submitting => Self::Pending,
            GateState::Authenticated { .. } => Self::Redirect,
            GateState::Checking | GateState::Unauthenticated { .. } => Self::Render,
        }
    }
}
