use gatehouse_auth::{AuthError, FormError, SignUpForm, SignUpOutcome};
use yew::prelude::*;
use yewdux::prelude::use_selector;

use crate::components::{input_value, use_bundle, use_gate};
use crate::messages;
use crate::store::AuthStore;

#[derive(Properties, PartialEq)]
pub(crate) struct SignUpPanelProps {
    pub(crate) on_switch: Callback<()>,
}

#[derive(Clone, PartialEq)]
enum Feedback {
    Form(FormError),
    Backend(AuthError),
    ConfirmationSent(String),
}

/// Registration form; a direct sign-in flows through the gate like a login.
#[function_component(SignUpPanel)]
pub(crate) fn signup_panel(props: &SignUpPanelProps) -> Html {
    let bundle = use_bundle();
    let gate = use_gate();
    let submitting = *use_selector(|store: &AuthStore| store.submitting);
    let email = use_state(String::new);
    let password = use_state(String::new);
    let confirm = use_state(String::new);
    let feedback = use_state(|| None as Option<Feedback>);

    let on_edit = {
        let feedback = feedback.clone();
        move |target: UseStateHandle<String>| {
            let feedback = feedback.clone();
            Callback::from(move |event: InputEvent| {
                if let Some(value) = input_value(&event) {
                    target.set(value);
                }
                feedback.set(None);
            })
        }
    };
    let on_email = on_edit(email.clone());
    let on_password = on_edit(password.clone());
    let on_confirm = on_edit(confirm.clone());

    let on_submit = {
        let email = email.clone();
        let password = password.clone();
        let confirm = confirm.clone();
        let feedback = feedback.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let form = SignUpForm {
                email: (*email).clone(),
                password: (*password).clone(),
                confirm_password: (*confirm).clone(),
            };
            let credentials = match form.validate() {
                Ok(credentials) => credentials,
                Err(err) => {
                    feedback.set(Some(Feedback::Form(err)));
                    return;
                }
            };
            let Some(gate) = &gate else {
                return;
            };
            let feedback = feedback.clone();
            gate.sign_up(
                credentials,
                Callback::from(move |outcome| match outcome {
                    Ok(SignUpOutcome::ConfirmationSent { email }) => {
                        feedback.set(Some(Feedback::ConfirmationSent(email)));
                    }
                    Ok(SignUpOutcome::SignedIn(_)) => feedback.set(None),
                    Err(err) => feedback.set(Some(Feedback::Backend(err))),
                }),
            );
        })
    };

    let notice = match &*feedback {
        None => html! {},
        Some(Feedback::ConfirmationSent(email)) => html! {
            <div class="alert alert-success text-sm" role="status">
                {bundle.format("auth.confirmation_sent", "", &[("email", email.as_str())])}
            </div>
        },
        Some(Feedback::Form(err)) => html! {
            <div class="alert alert-error text-sm" role="alert">{messages::form_error(&bundle, *err)}</div>
        },
        Some(Feedback::Backend(err)) => html! {
            <div class="alert alert-error text-sm" role="alert">{messages::auth_error(&bundle, err)}</div>
        },
    };

    let on_switch = {
        let on_switch = props.on_switch.clone();
        Callback::from(move |_| on_switch.emit(()))
    };

    html! {
        <form class="card bg-base-200 mx-auto w-full max-w-sm shadow" onsubmit={on_submit}>
            <div class="card-body gap-3">
                <h2 class="card-title">{bundle.text("auth.signup_title", "Create account")}</h2>
                <label class="form-control">
                    <span class="label-text">{bundle.text("auth.email", "Email")}</span>
                    <input class="input input-bordered" type="email" autocomplete="email"
                        value={(*email).clone()} oninput={on_email} disabled={submitting} />
                </label>
                <label class="form-control">
                    <span class="label-text">{bundle.text("auth.password", "Password")}</span>
                    <input class="input input-bordered" type="password" autocomplete="new-password"
                        value={(*password).clone()} oninput={on_password} disabled={submitting} />
                </label>
                <label class="form-control">
                    <span class="label-text">{bundle.text("auth.confirm_password", "Confirm password")}</span>
                    <input class="input input-bordered" type="password" autocomplete="new-password"
                        value={(*confirm).clone()} oninput={on_confirm} disabled={submitting} />
                </label>
                {notice}
                <button class="btn btn-primary" type="submit" disabled={submitting}>
                    {if submitting {
                        bundle.text("auth.submitting", "Please wait…")
                    } else {
                        bundle.text("auth.submit_signup", "Sign up")
                    }}
                </button>
                <button class="btn btn-link btn-sm" type="button" onclick={on_switch}>
                    {bundle.text("auth.to_login", "Sign in")}
                </button>
            </div>
        </form>
    }
}
