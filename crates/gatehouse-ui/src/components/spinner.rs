use yew::prelude::*;

use crate::components::use_bundle;

#[derive(Properties, PartialEq)]
pub(crate) struct SpinnerProps {
    #[prop_or_default]
    pub(crate) label: Option<String>,
}

/// Full-height loading indicator.
#[function_component(Spinner)]
pub(crate) fn spinner(props: &SpinnerProps) -> Html {
    let bundle = use_bundle();
    let label = props
        .label
        .clone()
        .unwrap_or_else(|| bundle.text("common.loading", "Loading…"));
    html! {
        <div class="flex min-h-[50vh] flex-col items-center justify-center gap-3" role="status" aria-live="polite">
            <span class="loading loading-spinner loading-lg"></span>
            <span class="text-sm opacity-70">{label}</span>
        </div>
    }
}
