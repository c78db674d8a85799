//! Persisted UI preferences.

use gloo::console;
use gloo::storage::{LocalStorage, Storage};
use gloo::utils::window;

use crate::i18n::{DEFAULT_LOCALE, LocaleCode};

pub(crate) const LOCALE_KEY: &str = "gatehouse.locale";

/// Stored locale, then the browser language, then English.
pub(crate) fn load_locale() -> LocaleCode {
    if let Ok(value) = LocalStorage::get::<String>(LOCALE_KEY) {
        if let Some(locale) = LocaleCode::from_lang_tag(&value) {
            return locale;
        }
    }
    window()
        .navigator()
        .language()
        .and_then(|tag| LocaleCode::from_lang_tag(&tag))
        .unwrap_or(DEFAULT_LOCALE)
}

pub(crate) fn persist_locale(locale: LocaleCode) {
    if let Err(err) = LocalStorage::set(LOCALE_KEY, locale.code()) {
        console::error!(format!("failed to persist locale: {err:?}"));
    }
}
