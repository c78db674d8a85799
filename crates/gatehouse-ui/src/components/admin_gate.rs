//! Gate wrapper for the admin console.
//!
//! # Design
//! - Spinner until the first evaluation finishes, so protected markup never
//!   flashes before the session is known.
//! - The login form stays mounted while its own submission is in flight.
//! - Authenticated content gets a fixed sign-out button.

use gatehouse_auth::GateState;
use yew::prelude::*;
use yewdux::prelude::use_selector;

use crate::components::login_panel::LoginPanel;
use crate::components::spinner::Spinner;
use crate::components::{use_bundle, use_gate};
use crate::store::AuthStore;

#[derive(Properties, PartialEq)]
pub(crate) struct AdminGateProps {
    #[prop_or_default]
    pub(crate) children: Children,
}

#[function_component(AdminGate)]
pub(crate) fn admin_gate(props: &AdminGateProps) -> Html {
    let bundle = use_bundle();
    let gate = use_gate();
    let state = use_selector(|store: &AuthStore| store.gate.clone());
    let submitting = *use_selector(|store: &AuthStore| store.submitting);

    match &*state {
        GateState::Initializing => html! { <Spinner /> },
        GateState::Checking if !submitting => html! { <Spinner /> },
        GateState::Checking | GateState::Unauthenticated { .. } => html! {
            <div class="flex min-h-[60vh] items-center justify-center p-4">
                <LoginPanel hint={bundle.text("admin.test_hint", "")} />
            </div>
        },
        GateState::Authenticated { .. } => {
            let on_sign_out = Callback::from(move |_| {
                if let Some(gate) = &gate {
                    gate.sign_out();
                }
            });
            html! {
                <>
                    { for props.children.iter() }
                    <button class="btn btn-error btn-sm fixed bottom-4 right-4 shadow-lg" onclick={on_sign_out}>
                        {bundle.text("nav.sign_out", "Sign out")}
                    </button>
                </>
            }
        }
    }
}
