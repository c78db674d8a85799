//! Yew components shared by the admin console and the user app.

pub(crate) mod admin_gate;
pub(crate) mod locale_menu;
pub(crate) mod login_panel;
pub(crate) mod protected_route;
pub(crate) mod shell;
pub(crate) mod signup_panel;
pub(crate) mod spinner;

use yew::prelude::*;

use crate::app::GateCtx;
use crate::i18n::{DEFAULT_LOCALE, TranslationBundle};

/// Active translation bundle, English when no provider is mounted.
#[hook]
pub(crate) fn use_bundle() -> TranslationBundle {
    use_context::<TranslationBundle>().unwrap_or_else(|| TranslationBundle::new(DEFAULT_LOCALE))
}

/// Gate handle provided by the app root.
#[hook]
pub(crate) fn use_gate() -> Option<GateCtx> {
    use_context::<GateCtx>()
}

/// Read the current value of an `<input>` from its event.
pub(crate) fn input_value(event: &InputEvent) -> Option<String> {
    event
        .target_dyn_into::<web_sys::HtmlInputElement>()
        .map(|input| input.value())
}
