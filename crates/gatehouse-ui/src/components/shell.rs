use yew::prelude::*;
use yewdux::prelude::use_selector;

use crate::components::locale_menu::LocaleMenu;
use crate::components::use_bundle;
use crate::i18n::LocaleCode;
use crate::messages;
use crate::store::AuthStore;

#[derive(Properties, PartialEq)]
pub(crate) struct ShellProps {
    pub(crate) title: String,
    pub(crate) locale: LocaleCode,
    pub(crate) on_locale: Callback<LocaleCode>,
    /// Extra navbar entries (links, sign-out).
    #[prop_or_default]
    pub(crate) nav: Html,
    #[prop_or_default]
    pub(crate) children: Children,
}

/// Page chrome: title bar, backend badge, locale menu.
#[function_component(Shell)]
pub(crate) fn shell(props: &ShellProps) -> Html {
    let bundle = use_bundle();
    let backend = *use_selector(|store: &AuthStore| store.backend);
    let badge = backend.map_or_else(
        || html! {},
        |kind| html! {
            <span class="badge badge-outline badge-sm" title={kind.as_str()}>
                {messages::backend_badge(&bundle, kind)}
            </span>
        },
    );
    let dir = if bundle.rtl() { "rtl" } else { "ltr" };

    html! {
        <div class="min-h-screen bg-base-100" dir={dir}>
            <header class="navbar bg-base-200 gap-2 px-4">
                <div class="flex-1 items-center gap-3">
                    <span class="text-lg font-semibold">{props.title.clone()}</span>
                    {badge}
                </div>
                <nav class="flex-none flex items-center gap-2">
                    {props.nav.clone()}
                    <LocaleMenu current={props.locale} on_select={props.on_locale.clone()} />
                </nav>
            </header>
            <main class="container mx-auto p-4">
                { for props.children.iter() }
            </main>
        </div>
    }
}
