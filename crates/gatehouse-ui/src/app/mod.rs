//! Browser entry points and the gate context shared by both front-ends.

use std::rc::Rc;

use gatehouse_auth::{
    AccessPolicy, AuthGate, AuthResult, BackendSelector, Credentials, GateState,
    GatehouseConfig, HttpHealthProbe, MockAuthBackend, MockDirectory, RemoteAuthBackend,
    SignUpOutcome,
};
use gloo::utils::document;
use yew::Callback;
use yew::platform::spawn_local;
use yewdux::prelude::Dispatch;

use crate::services::logging::init_logging;
use crate::services::{BrowserStore, FetchTransport, TimerDelay};
use crate::store::AuthStore;

mod admin;
mod preferences;
mod routes;
mod user;

pub(crate) use routes::Route;

/// Mount the admin console into `#app`, or `<body>` when absent.
pub fn run_admin_app() {
    boot();
    render::<admin::AdminApp>();
}

/// Mount the user app into `#app`, or `<body>` when absent.
pub fn run_user_app() {
    boot();
    render::<user::UserApp>();
}

fn boot() {
    console_error_panic_hook::set_once();
    init_logging();
}

fn render<C>()
where
    C: yew::BaseComponent<Properties = ()>,
{
    match document().get_element_by_id("app") {
        Some(root) => {
            yew::Renderer::<C>::with_root(root).render();
        }
        None => {
            yew::Renderer::<C>::new().render();
        }
    }
}

/// Wire the gate over browser storage, `fetch`, and the availability probe.
pub(crate) fn build_gate(config: &GatehouseConfig, policy: AccessPolicy) -> AuthGate {
    let remote = RemoteAuthBackend::new(FetchTransport, BrowserStore, config);
    let mock = MockAuthBackend::with_delay(
        BrowserStore,
        MockDirectory::with_default_secrets(config.admin_allow_list()),
        TimerDelay,
        config.mock_latency,
    );
    let probe = HttpHealthProbe::new(FetchTransport, config.health_url(), config.probe_timeout);
    let selector = BackendSelector::new(Rc::new(probe), Rc::new(remote), Rc::new(mock));
    AuthGate::new(selector, policy)
}

/// Shared gate handle; one per app boot.
#[derive(Clone)]
pub(crate) struct GateCtx {
    pub(crate) gate: Rc<AuthGate>,
}

impl PartialEq for GateCtx {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.gate, &other.gate)
    }
}

impl GateCtx {
    pub(crate) fn new(gate: AuthGate) -> Self {
        Self {
            gate: Rc::new(gate),
        }
    }

    /// First evaluation after render.
    pub(crate) fn mount(&self) {
        let gate = Rc::clone(&self.gate);
        publish(&gate, GateState::Checking);
        spawn_local(async move {
            let state = gate.mount().await;
            tracing::info!(
                backend = gate.backend_kind().map_or("unknown", |kind| kind.as_str()),
                "gate mounted"
            );
            publish(&gate, state);
        });
    }

    /// Re-check the current session, e.g. when the window regains focus.
    pub(crate) fn refresh(&self) {
        let gate = Rc::clone(&self.gate);
        spawn_local(async move {
            if gate.state().is_pending() {
                return;
            }
            let state = gate.evaluate().await;
            publish(&gate, state);
        });
    }

    /// Re-check and report the resulting state.
    pub(crate) fn evaluate(&self, on_done: Callback<GateState>) {
        let gate = Rc::clone(&self.gate);
        spawn_local(async move {
            let state = gate.evaluate().await;
            publish(&gate, state.clone());
            on_done.emit(state);
        });
    }

    pub(crate) fn login(&self, credentials: Credentials) {
        let gate = Rc::clone(&self.gate);
        set_submitting(true);
        publish(&gate, GateState::Checking);
        spawn_local(async move {
            let state = gate.login(&credentials).await;
            set_submitting(false);
            publish(&gate, state);
        });
    }

    pub(crate) fn sign_up(
        &self,
        credentials: Credentials,
        on_done: Callback<AuthResult<SignUpOutcome>>,
    ) {
        let gate = Rc::clone(&self.gate);
        set_submitting(true);
        spawn_local(async move {
            let outcome = gate.sign_up(&credentials).await;
            set_submitting(false);
            publish(&gate, gate.state());
            on_done.emit(outcome);
        });
    }

    pub(crate) fn sign_out(&self) {
        let gate = Rc::clone(&self.gate);
        spawn_local(async move {
            let state = gate.sign_out().await;
            publish(&gate, state);
        });
    }

    pub(crate) fn clear_error(&self) {
        self.gate.clear_error();
        publish(&self.gate, self.gate.state());
    }
}

fn publish(gate: &AuthGate, state: GateState) {
    let backend = gate.backend_kind();
    Dispatch::<AuthStore>::new().reduce_mut(|store| store.publish(state, backend));
}

fn set_submitting(submitting: bool) {
    Dispatch::<AuthStore>::new().reduce_mut(|store| store.submitting = submitting);
}
