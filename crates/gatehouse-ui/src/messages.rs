//! Localized text for gate states, errors, and form validation.

use gatehouse_auth::callback::CallbackFailure;
use gatehouse_auth::{AuthError, BackendKind, FormError};

use crate::i18n::TranslationBundle;

/// Displayable text for an auth error; unknown failures stay generic.
#[must_use]
pub fn auth_error(bundle: &TranslationBundle, error: &AuthError) -> String {
    bundle.text(error.message_key(), error.user_message())
}

/// Displayable text for a form validation error.
#[must_use]
pub fn form_error(bundle: &TranslationBundle, error: FormError) -> String {
    bundle.text(error.message_key(), &error.to_string())
}

/// Displayable text for a failed OAuth callback.
#[must_use]
pub fn callback_failure(bundle: &TranslationBundle, failure: &CallbackFailure) -> String {
    let text = bundle.text(failure.message_key(), "");
    match failure {
        CallbackFailure::Provider(detail) => format!("{text} ({detail})"),
        CallbackFailure::MissingParameters | CallbackFailure::TimedOut => text,
    }
}

/// Badge label for the backend serving this page load.
#[must_use]
pub fn backend_badge(bundle: &TranslationBundle, kind: BackendKind) -> String {
    match kind {
        BackendKind::Mock => bundle.text("common.backend_mock", "Demo mode"),
        BackendKind::Remote => bundle.text("common.backend_remote", "Connected"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::LocaleCode;

    #[test]
    fn unknown_errors_never_show_detail() {
        let bundle = TranslationBundle::new(LocaleCode::En);
        let text = auth_error(&bundle, &AuthError::unknown("status 500: secret stack"));
        assert_eq!(text, "Sign-in failed. Please try again.");
    }

    #[test]
    fn errors_are_localized() {
        let bundle = TranslationBundle::new(LocaleCode::Ja);
        assert_eq!(
            auth_error(&bundle, &AuthError::NotAuthorized),
            "このアカウントには管理者権限がありません。"
        );
        assert_eq!(
            form_error(&bundle, FormError::PasswordMismatch),
            "パスワードが一致しません。"
        );
    }

    #[test]
    fn provider_failures_keep_their_description() {
        let bundle = TranslationBundle::new(LocaleCode::En);
        let text = callback_failure(
            &bundle,
            &CallbackFailure::Provider("access denied".to_string()),
        );
        assert_eq!(
            text,
            "The identity provider reported an error. (access denied)"
        );
    }

    #[test]
    fn backend_badge_names_demo_mode() {
        let bundle = TranslationBundle::new(LocaleCode::En);
        assert_eq!(
            backend_badge(&bundle, BackendKind::Mock),
            "Demo mode (offline)"
        );
    }
}
