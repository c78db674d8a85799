//! OAuth redirect callback handling for the user app.

use std::time::Duration;

/// How long the callback page waits for a session before giving up.
pub const CALLBACK_TIMEOUT: Duration = Duration::from_secs(5);
/// Delay before redirecting home after a successful callback.
pub const SUCCESS_REDIRECT_DELAY: Duration = Duration::from_secs(2);

/// Parameters the identity provider appends to the callback URL.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallbackParams {
    /// `access_token` from the URL fragment (implicit flow).
    pub access_token: Option<String>,
    /// `code` from the query string (PKCE flow).
    pub code: Option<String>,
    /// `error_description` from either component.
    pub error_description: Option<String>,
}

impl CallbackParams {
    /// Parse the raw `location.hash` and `location.search` values.
    #[must_use]
    pub fn parse(hash: &str, search: &str) -> Self {
        let fragment = pairs(hash.trim_start_matches('#'));
        let query = pairs(search.trim_start_matches('?'));
        let find = |pairs: &[(String, String)], name: &str| {
            pairs
                .iter()
                .find(|(key, value)| key == name && !value.is_empty())
                .map(|(_, value)| value.clone())
        };
        Self {
            access_token: find(&fragment, "access_token"),
            code: find(&query, "code"),
            error_description: find(&fragment, "error_description")
                .or_else(|| find(&query, "error_description")),
        }
    }

    /// Whether the URL carries anything to exchange for a session.
    #[must_use]
    pub const fn has_credentials(&self) -> bool {
        self.access_token.is_some() || self.code.is_some()
    }
}

/// Progress of the callback page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallbackStatus {
    /// Waiting for the session.
    Loading,
    /// Session established; redirect pending.
    Success,
    /// Callback failed with a displayable reason.
    Error(CallbackFailure),
}

/// Why a callback failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallbackFailure {
    /// URL had neither `access_token` nor `code`.
    MissingParameters,
    /// No session appeared within [`CALLBACK_TIMEOUT`].
    TimedOut,
    /// Provider or backend reported an error.
    Provider(String),
}

impl CallbackFailure {
    /// Translation key for the failure message.
    #[must_use]
    pub const fn message_key(&self) -> &'static str {
        match self {
            Self::MissingParameters => "callback.error.missing_params",
            Self::TimedOut => "callback.error.timeout",
            Self::Provider(_) => "callback.error.provider",
        }
    }
}

/// Initial status for a callback URL; `Loading` means a session lookup should follow.
#[must_use]
pub fn initial_status(params: &CallbackParams) -> CallbackStatus {
    if let Some(description) = &params.error_description {
        return CallbackStatus::Error(CallbackFailure::Provider(description.clone()));
    }
    if params.has_credentials() {
        CallbackStatus::Loading
    } else {
        CallbackStatus::Error(CallbackFailure::MissingParameters)
    }
}

fn pairs(raw: &str) -> Vec<(String, String)> {
    raw.split('&')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let (key, value) = part.split_once('=').unwrap_or((part, ""));
            (decode(key), decode(value))
        })
        .collect()
}

fn decode(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(value) => value.into_owned(),
        Err(_) => spaced,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_token_is_detected() {
        let params = CallbackParams::parse("#access_token=abc&token_type=bearer", "");
        assert_eq!(params.access_token.as_deref(), Some("abc"));
        assert_eq!(initial_status(&params), CallbackStatus::Loading);
    }

    #[test]
    fn query_code_is_detected() {
        let params = CallbackParams::parse("", "?code=xyz&state=1");
        assert_eq!(params.code.as_deref(), Some("xyz"));
        assert!(params.has_credentials());
    }

    #[test]
    fn missing_parameters_fail_immediately() {
        let params = CallbackParams::parse("#", "?state=1&code=");
        assert_eq!(
            initial_status(&params),
            CallbackStatus::Error(CallbackFailure::MissingParameters)
        );
    }

    #[test]
    fn provider_errors_are_decoded() {
        let params = CallbackParams::parse("", "?error=access_denied&error_description=User+denied%20access");
        assert_eq!(
            initial_status(&params),
            CallbackStatus::Error(CallbackFailure::Provider("User denied access".to_string()))
        );
    }

    #[test]
    fn undecodable_values_are_kept_verbatim() {
        let params = CallbackParams::parse("", "?error=bad&error_description=broken%FF+text");
        assert_eq!(
            initial_status(&params),
            CallbackStatus::Error(CallbackFailure::Provider("broken%FF text".to_string()))
        );
    }
}
