//! User app: public home, login/sign-up, OAuth callback, protected dashboard.

use std::cell::Cell;
use std::rc::Rc;

use gatehouse_auth::callback::{
    CALLBACK_TIMEOUT, CallbackFailure, CallbackParams, CallbackStatus, SUCCESS_REDIRECT_DELAY,
    initial_status,
};
use gatehouse_auth::{AccessPolicy, GateState, GuardDecision};
use gloo::utils::window;
use gloo_timers::callback::Timeout;
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::use_selector;

use super::preferences::{load_locale, persist_locale};
use super::{GateCtx, Route, build_gate};
use crate::components::login_panel::LoginPanel;
use crate::components::protected_route::ProtectedRoute;
use crate::components::shell::Shell;
use crate::components::signup_panel::SignUpPanel;
use crate::components::spinner::Spinner;
use crate::components::{use_bundle, use_gate};
use crate::config;
use crate::i18n::{LocaleCode, TranslationBundle};
use crate::messages;
use crate::services::delay::millis;
use crate::store::AuthStore;

#[function_component(UserApp)]
pub(crate) fn user_app() -> Html {
    let locale = use_state(load_locale);
    let bundle = {
        let locale = *locale;
        use_memo(move |_| TranslationBundle::new(locale), locale)
    };
    let ctx = use_memo(
        |_| {
            let config = config::load();
            GateCtx::new(build_gate(&config, AccessPolicy::AnySession))
        },
        (),
    );

    {
        let ctx = ctx.clone();
        use_effect_with_deps(
            move |_| {
                ctx.mount();
                || ()
            },
            (),
        );
    }

    let on_locale = {
        let locale = locale.clone();
        Callback::from(move |next: LocaleCode| {
            persist_locale(next);
            locale.set(next);
        })
    };

    html! {
        <ContextProvider<TranslationBundle> context={(*bundle).clone()}>
            <ContextProvider<GateCtx> context={(*ctx).clone()}>
                <BrowserRouter>
                    <Shell title={bundle.text("user.title", "Gatehouse")} locale={*locale} {on_locale} nav={html! { <UserNav /> }}>
                        <Switch<Route> render={switch} />
                    </Shell>
                </BrowserRouter>
            </ContextProvider<GateCtx>>
        </ContextProvider<TranslationBundle>>
    }
}

fn switch(route: Route) -> Html {
    match route {
        Route::Home => html! { <HomePage /> },
        Route::Auth => html! { <AuthPage /> },
        Route::AuthCallback => html! { <CallbackPage /> },
        Route::Dashboard => html! {
            <ProtectedRoute>
                <DashboardPage />
            </ProtectedRoute>
        },
        Route::NotFound => html! { <NotFoundPage /> },
    }
}

#[function_component(UserNav)]
fn user_nav() -> Html {
    let bundle = use_bundle();
    let gate = use_gate();
    let signed_in = *use_selector(|store: &AuthStore| store.email().is_some());

    let session_link = if signed_in {
        let on_sign_out = Callback::from(move |_| {
            if let Some(gate) = &gate {
                gate.sign_out();
            }
        });
        html! {
            <>
                <Link<Route> classes={classes!("btn", "btn-ghost", "btn-sm")} to={Route::Dashboard}>
                    {bundle.text("nav.dashboard", "Dashboard")}
                </Link<Route>>
                <button class="btn btn-ghost btn-sm" onclick={on_sign_out}>
                    {bundle.text("nav.sign_out", "Sign out")}
                </button>
            </>
        }
    } else {
        html! {
            <Link<Route> classes={classes!("btn", "btn-primary", "btn-sm")} to={Route::Auth}>
                {bundle.text("nav.sign_in", "Sign in")}
            </Link<Route>>
        }
    };

    html! {
        <>
            <Link<Route> classes={classes!("btn", "btn-ghost", "btn-sm")} to={Route::Home}>
                {bundle.text("nav.home", "Home")}
            </Link<Route>>
            {session_link}
        </>
    }
}

#[function_component(HomePage)]
fn home_page() -> Html {
    let bundle = use_bundle();
    html! {
        <section class="hero min-h-[40vh]">
            <div class="hero-content text-center">
                <div>
                    <h1 class="text-3xl font-bold">{bundle.text("user.title", "Gatehouse")}</h1>
                    <p class="py-4">{bundle.text("user.home_body", "")}</p>
                </div>
            </div>
        </section>
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum AuthMode {
    Login,
    SignUp,
}

#[function_component(AuthPage)]
fn auth_page() -> Html {
    let decision = use_selector(|store: &AuthStore| store.login_decision());
    let mode = use_state(|| AuthMode::Login);

    let switch_to = |next: AuthMode| {
        let mode = mode.clone();
        Callback::from(move |()| mode.set(next))
    };

    match *decision {
        GuardDecision::Pending => html! { <Spinner /> },
        GuardDecision::Redirect => html! { <Redirect<Route> to={Route::Home} /> },
        GuardDecision::Render => match *mode {
            AuthMode::Login => html! { <LoginPanel on_switch={switch_to(AuthMode::SignUp)} /> },
            AuthMode::SignUp => html! { <SignUpPanel on_switch={switch_to(AuthMode::Login)} /> },
        },
    }
}

fn current_callback_params() -> CallbackParams {
    let location = window().location();
    CallbackParams::parse(
        &location.hash().unwrap_or_default(),
        &location.search().unwrap_or_default(),
    )
}

#[function_component(CallbackPage)]
fn callback_page() -> Html {
    let bundle = use_bundle();
    let gate = use_gate();
    let navigator = use_navigator();
    let status = use_state(|| initial_status(&current_callback_params()));

    {
        let status = status.clone();
        use_effect_with_deps(
            move |_| {
                let settled = Rc::new(Cell::new(false));
                let mut timer = None;
                if *status == CallbackStatus::Loading {
                    if let Some(gate) = gate {
                        let on_state = {
                            let status = status.clone();
                            let settled = Rc::clone(&settled);
                            Callback::from(move |state: GateState| {
                                if state.session().is_some() && !settled.replace(true) {
                                    status.set(CallbackStatus::Success);
                                }
                            })
                        };
                        gate.evaluate(on_state);
                    }
                    let status = status.clone();
                    let settled = Rc::clone(&settled);
                    timer = Some(Timeout::new(millis(CALLBACK_TIMEOUT), move || {
                        if !settled.replace(true) {
                            status.set(CallbackStatus::Error(CallbackFailure::TimedOut));
                        }
                    }));
                }
                move || drop(timer)
            },
            (),
        );
    }

    {
        let current = (*status).clone();
        use_effect_with_deps(
            move |current: &CallbackStatus| {
                let redirect = (*current == CallbackStatus::Success).then(|| {
                    Timeout::new(millis(SUCCESS_REDIRECT_DELAY), move || {
                        if let Some(navigator) = navigator {
                            navigator.push(&Route::Home);
                        }
                    })
                });
                move || drop(redirect)
            },
            current,
        );
    }

    let body = match &*status {
        CallbackStatus::Loading => html! { <Spinner label={bundle.text("callback.loading", "")} /> },
        CallbackStatus::Success => html! {
            <div class="alert alert-success" role="status">{bundle.text("callback.success", "")}</div>
        },
        CallbackStatus::Error(failure) => html! {
            <div class="flex flex-col items-center gap-4">
                <div class="alert alert-error" role="alert">{messages::callback_failure(&bundle, failure)}</div>
                <Link<Route> classes={classes!("btn", "btn-primary")} to={Route::Auth}>
                    {bundle.text("callback.back", "Back to sign in")}
                </Link<Route>>
            </div>
        },
    };

    html! { <section class="mx-auto max-w-md p-4">{body}</section> }
}

#[function_component(DashboardPage)]
fn dashboard_page() -> Html {
    let bundle = use_bundle();
    let gate = use_gate();
    let email = use_selector(|store: &AuthStore| store.email().map(ToString::to_string));
    let email = (*email).clone().unwrap_or_default();
    let on_sign_out = Callback::from(move |_| {
        if let Some(gate) = &gate {
            gate.sign_out();
        }
    });

    html! {
        <section class="card bg-base-200 shadow">
            <div class="card-body">
                <h1 class="card-title">{bundle.format("user.greeting", "", &[("email", email.as_str())])}</h1>
                <p>{bundle.text("user.dashboard_body", "")}</p>
                <div class="card-actions justify-end">
                    <button class="btn btn-outline" onclick={on_sign_out}>
                        {bundle.text("nav.sign_out", "Sign out")}
                    </button>
                </div>
            </div>
        </section>
    }
}

#[function_component(NotFoundPage)]
fn not_found_page() -> Html {
    let bundle = use_bundle();
    html! {
        <section class="flex flex-col items-center gap-4 py-16">
            <h1 class="text-2xl font-semibold">{bundle.text("not_found.title", "Page not found")}</h1>
            <Link<Route> classes={classes!("btn", "btn-ghost")} to={Route::Home}>
                {bundle.text("not_found.back", "Go home")}
            </Link<Route>>
        </section>
    }
}
