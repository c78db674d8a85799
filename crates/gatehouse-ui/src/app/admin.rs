//! Admin console: everything below the gate requires an allow-listed session.

use gatehouse_auth::AccessPolicy;
use gloo::events::EventListener;
use gloo::utils::window;
use yew::prelude::*;
use yewdux::prelude::use_selector;

use super::preferences::{load_locale, persist_locale};
use super::{GateCtx, build_gate};
use crate::components::admin_gate::AdminGate;
use crate::components::shell::Shell;
use crate::components::use_bundle;
use crate::config;
use crate::i18n::{LocaleCode, TranslationBundle};
use crate::store::AuthStore;

#[function_component(AdminApp)]
pub(crate) fn admin_app() -> Html {
    let locale = use_state(load_locale);
    let bundle = {
        let locale = *locale;
        use_memo(move |_| TranslationBundle::new(locale), locale)
    };
    let ctx = use_memo(
        |_| {
            let config = config::load();
            let policy = AccessPolicy::AllowList(config.admin_allow_list());
            GateCtx::new(build_gate(&config, policy))
        },
        (),
    );

    {
        let ctx = ctx.clone();
        use_effect_with_deps(
            move |_| {
                ctx.mount();
                // Sessions can change in another tab; re-check on focus.
                let listener = EventListener::new(&window(), "focus", move |_| ctx.refresh());
                move || drop(listener)
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
                <Shell title={bundle.text("admin.title", "Gatehouse admin")} locale={*locale} {on_locale}>
                    <AdminGate>
                        <AdminDashboard />
                    </AdminGate>
                </Shell>
            </ContextProvider<GateCtx>>
        </ContextProvider<TranslationBundle>>
    }
}

#[function_component(AdminDashboard)]
fn admin_dashboard() -> Html {
    let bundle = use_bundle();
    let email = use_selector(|store: &AuthStore| store.email().map(ToString::to_string));
    let email = (*email).clone().unwrap_or_default();

    html! {
        <section class="card bg-base-200 shadow">
            <div class="card-body">
                <h1 class="card-title">{bundle.format("admin.welcome", "", &[("email", email.as_str())])}</h1>
                <p>{bundle.text("admin.body", "")}</p>
            </div>
        </section>
    }
}
