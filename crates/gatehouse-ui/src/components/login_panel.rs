//! Email/password login form bound to the gate.

use gatehouse_auth::{FormError, LoginForm};
use yew::prelude::*;
use yewdux::prelude::use_selector;

use crate::components::{input_value, use_bundle, use_gate};
use crate::messages;
use crate::store::AuthStore;

#[derive(Properties, PartialEq)]
pub(crate) struct LoginPanelProps {
    /// Text shown under the form, e.g. the demo account.
    #[prop_or_default]
    pub(crate) hint: Option<String>,
    /// Switch to the sign-up form; hidden when absent.
    #[prop_or_default]
    pub(crate) on_switch: Option<Callback<()>>,
}

#[function_component(LoginPanel)]
pub(crate) fn login_panel(props: &LoginPanelProps) -> Html {
    let bundle = use_bundle();
    let gate = use_gate();
    let gate_error = use_selector(|store: &AuthStore| store.gate.error().cloned());
    let submitting = *use_selector(|store: &AuthStore| store.submitting);
    let email = use_state(String::new);
    let password = use_state(String::new);
    let form_error = use_state(|| None as Option<FormError>);
    let has_gate_error = gate_error.is_some();

    let on_edit = {
        let gate = gate.clone();
        let form_error = form_error.clone();
        move |target: UseStateHandle<String>| {
            let gate = gate.clone();
            let form_error = form_error.clone();
            Callback::from(move |event: InputEvent| {
                if let Some(value) = input_value(&event) {
                    target.set(value);
                }
                form_error.set(None);
                if has_gate_error {
                    if let Some(gate) = &gate {
                        gate.clear_error();
                    }
                }
            })
        }
    };
    let on_email = on_edit(email.clone());
    let on_password = on_edit(password.clone());

    let on_submit = {
        let email = email.clone();
        let password = password.clone();
        let form_error = form_error.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let form = LoginForm {
                email: (*email).clone(),
                password: (*password).clone(),
            };
            match form.validate() {
                Ok(credentials) => {
                    if let Some(gate) = &gate {
                        gate.login(credentials);
                    }
                }
                Err(err) => form_error.set(Some(err)),
            }
        })
    };

    let error_text = (*form_error)
        .map(|err| messages::form_error(&bundle, err))
        .or_else(|| {
            (*gate_error)
                .as_ref()
                .map(|err| messages::auth_error(&bundle, err))
        });

    html! {
        <form class="card bg-base-200 mx-auto w-full max-w-sm shadow" onsubmit={on_submit}>
            <div class="card-body gap-3">
                <h2 class="card-title">{bundle.text("auth.login_title", "Sign in")}</h2>
                <label class="form-control">
                    <span class="label-text">{bundle.text("auth.email", "Email")}</span>
                    <input class="input input-bordered" type="email" autocomplete="username"
                        value={(*email).clone()} oninput={on_email} disabled={submitting} />
                </label>
                <label class="form-control">
                    <span class="label-text">{bundle.text("auth.password", "Password")}</span>
                    <input class="input input-bordered" type="password" autocomplete="current-password"
                        value={(*password).clone()} oninput={on_password} disabled={submitting} />
                </label>
                {error_text.map_or_else(|| html! {}, |text| html! {
                    <div class="alert alert-error text-sm" role="alert">{text}</div>
                })}
                <button class="btn btn-primary" type="submit" disabled={submitting}>
                    {if submitting {
                        bundle.text("auth.submitting", "Please wait…")
                    } else {
                        bundle.text("auth.submit_login", "Sign in")
                    }}
                </button>
                {props.hint.as_ref().map_or_else(|| html! {}, |hint| html! {
                    <p class="text-xs opacity-70">{hint}</p>
                })}
                {props.on_switch.as_ref().map_or_else(|| html! {}, |on_switch| {
                    let on_switch = on_switch.clone();
                    html! {
                        <button class="btn btn-link btn-sm" type="button"
                            onclick={Callback::from(move |_| on_switch.emit(()))}>
                            {bundle.text("auth.to_signup", "Sign up")}
                        </button>
                    }
                })}
            </div>
        </form>
    }
}
