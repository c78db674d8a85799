//! Login and sign-up form state with local validation.
//!
//! # Design
//! - Inputs stay as raw strings for lossless editing.
//! - Validation runs before any backend call; its errors never leave the form.

use thiserror::Error;

use crate::model::Credentials;

/// Minimum password length accepted at sign-up.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Local validation failures.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum FormError {
    /// Email field is blank.
    #[error("email is required")]
    EmailRequired,
    /// Password field is blank.
    #[error("password is required")]
    PasswordRequired,
    /// Password shorter than [`MIN_PASSWORD_LEN`].
    #[error("password must be at least {} characters", MIN_PASSWORD_LEN)]
    PasswordTooShort,
    /// Confirmation does not match the password.
    #[error("passwords do not match")]
    PasswordMismatch,
}

impl FormError {
    /// Translation key for the message.
    #[must_use]
    pub const fn message_key(self) -> &'static str {
        match self {
            Self::EmailRequired => "form.error.email_required",
            Self::PasswordRequired => "form.error.password_required",
            Self::PasswordTooShort => "form.error.password_too_short",
            Self::PasswordMismatch => "form.error.password_mismatch",
        }
    }
}

/// Login form inputs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginForm {
    /// Email input.
    pub email: String,
    /// Password input.
    pub password: String,
}

impl LoginForm {
    /// Validate and produce credentials with a trimmed email.
    ///
    /// # Errors
    ///
    /// Returns the first [`FormError`] found.
    pub fn validate(&self) -> Result<Credentials, FormError> {
        let email = require_email(&self.email)?;
        if self.password.is_empty() {
            return Err(FormError::PasswordRequired);
        }
        Ok(Credentials::new(email, self.password.clone()))
    }
}

/// Sign-up form inputs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignUpForm {
    /// Email input.
    pub email: String,
    /// Password input.
    pub password: String,
    /// Password confirmation input.
    pub confirm_password: String,
}

impl SignUpForm {
    /// Validate and produce credentials with a trimmed email.
    ///
    /// # Errors
    ///
    /// Returns the first [`FormError`] found, checking the confirmation before length.
    pub fn validate(&self) -> Result<Credentials, FormError> {
        let email = require_email(&self.email)?;
        if self.password.is_empty() {
            return Err(FormError::PasswordRequired);
        }
        if self.password != self.confirm_password {
            return Err(FormError::PasswordMismatch);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(FormError::PasswordTooShort);
        }
        Ok(Credentials::new(email, self.password.clone()))
    }
}

fn require_email(raw: &str) -> Result<&str, FormError> {
    let email = raw.trim();
    if email.is_empty() {
        Err(FormError::EmailRequired)
    } else {
        Ok(email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign_up(email: &str, password: &str, confirm: &str) -> SignUpForm {
        SignUpForm {
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[test]
    fn login_requires_both_fields() {
        let mut form = LoginForm::default();
        assert_eq!(form.validate(), Err(FormError::EmailRequired));
        form.email = "  admin@test.com ".to_string();
        assert_eq!(form.validate(), Err(FormError::PasswordRequired));
        form.password = "x".to_string();
        assert_eq!(
            form.validate().map(|creds| creds.email),
            Ok("admin@test.com".to_string())
        );
    }

    #[test]
    fn sign_up_checks_confirmation_then_length() {
        assert_eq!(
            sign_up("a@b.c", "abc", "abd").validate(),
            Err(FormError::PasswordMismatch)
        );
        assert_eq!(
            sign_up("a@b.c", "abc12", "abc12").validate(),
            Err(FormError::PasswordTooShort)
        );
        assert!(sign_up("a@b.c", "abc123", "abc123").validate().is_ok());
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        assert_eq!(
            sign_up("a@b.c", "パスワード", "パスワード").validate(),
            Err(FormError::PasswordTooShort)
        );
        assert!(sign_up("a@b.c", "パスワードだ", "パスワードだ").validate().is_ok());
    }

    #[test]
    fn form_errors_have_translation_keys() {
        assert_eq!(
            FormError::PasswordTooShort.to_string(),
            "password must be at least 6 characters"
        );
        assert_eq!(
            FormError::PasswordMismatch.message_key(),
            "form.error.password_mismatch"
        );
    }
}
