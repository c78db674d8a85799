use yew::prelude::*;

use crate::i18n::LocaleCode;

#[derive(Properties, PartialEq)]
pub(crate) struct LocaleMenuProps {
    pub(crate) current: LocaleCode,
    pub(crate) on_select: Callback<LocaleCode>,
}

#[function_component(LocaleMenu)]
pub(crate) fn locale_menu(props: &LocaleMenuProps) -> Html {
    let on_change = {
        let on_select = props.on_select.clone();
        Callback::from(move |event: Event| {
            let Some(select) = event.target_dyn_into::<web_sys::HtmlSelectElement>() else {
                return;
            };
            if let Some(locale) = LocaleCode::from_lang_tag(&select.value()) {
                on_select.emit(locale);
            }
        })
    };
    html! {
        <select class="select select-sm select-ghost" aria-label="Language" onchange={on_change}>
            { for LocaleCode::all().into_iter().map(|locale| html! {
                <option value={locale.code()} selected={locale == props.current}>{locale.label()}</option>
            }) }
        </select>
    }
}
