//! Hosted auth service client (GoTrue-style REST).
//!
//! # Design
//! - The service is opaque; only the endpoints used for password auth are called.
//! - Responses are mapped into the same result shapes the mock returns.
//! - Sessions persist locally; sign-out clears them even if the service call fails.
//! - Tokens and passwords are never logged.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::backend::{AuthBackend, BackendKind};
use crate::config::GatehouseConfig;
use crate::error::{AuthError, AuthResult};
use crate::model::{AuthResponse, Credentials, Session, SignUpOutcome, User};
use crate::storage::{KeyValueStore, SessionStore};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};

/// Storage key for the hosted-service session record.
pub const REMOTE_SESSION_KEY: &str = "gatehouse.remote_session";
/// Deadline applied to every auth service call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const MAX_DETAIL_CHARS: usize = 200;

/// Hosted implementation of [`AuthBackend`].
pub struct RemoteAuthBackend<T, S> {
    transport: T,
    store: SessionStore<S>,
    base_url: String,
    anon_key: String,
}

impl<T: HttpTransport, S: KeyValueStore> RemoteAuthBackend<T, S> {
    /// Client for the service described by `config`.
    pub fn new(transport: T, storage: S, config: &GatehouseConfig) -> Self {
        Self {
            transport,
            store: SessionStore::new(storage, REMOTE_SESSION_KEY),
            base_url: config.backend_url.clone(),
            anon_key: config.anon_key.clone(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.base_url)
    }

    fn request_with_key(&self, request: HttpRequest) -> HttpRequest {
        request
            .header("apikey", self.anon_key.as_str())
            .timeout(REQUEST_TIMEOUT)
    }

    async fn post_credentials(&self, path: &str, credentials: &Credentials) -> AuthResult<HttpResponse> {
        #[derive(Serialize)]
        struct Body<'a> {
            email: &'a str,
            password: &'a str,
        }
        let body = serde_json::to_string(&Body {
            email: &credentials.email,
            password: &credentials.password,
        })
        .map_err(|err| AuthError::unknown(format!("encode request: {err}")))?;
        let request = self.request_with_key(HttpRequest::post(self.endpoint(path)).json_body(body));
        let response = self
            .transport
            .send(request)
            .await
            .map_err(|err| AuthError::unknown(err.to_string()))?;
        if response.is_success() {
            Ok(response)
        } else {
            Err(map_error_response(&response))
        }
    }
}

#[async_trait(?Send)]
impl<T: HttpTransport, S: KeyValueStore> AuthBackend for RemoteAuthBackend<T, S> {
    fn kind(&self) -> BackendKind {
        BackendKind::Remote
    }

    async fn sign_in_with_password(&self, credentials: &Credentials) -> AuthResult<AuthResponse> {
        let response = self
            .post_credentials("token?grant_type=password", credentials)
            .await?;
        let session = parse_token_body(&response.body, Utc::now())?;
        self.store.save(session.clone());
        tracing::info!(email = %session.user.email, "remote sign-in succeeded");
        Ok(AuthResponse::from(session))
    }

    async fn sign_up(&self, credentials: &Credentials) -> AuthResult<SignUpOutcome> {
        let response = self.post_credentials("signup", credentials).await?;
        let outcome = parse_sign_up_body(&response.body, &credentials.email, Utc::now())?;
        if let SignUpOutcome::SignedIn(session) = &outcome {
            self.store.save(session.clone());
        }
        Ok(outcome)
    }

    async fn get_session(&self) -> AuthResult<Option<Session>> {
        let Some(session) = self.store.current() else {
            return Ok(None);
        };
        if session.is_expired_at(Utc::now()) {
            tracing::info!(email = %session.user.email, "remote session expired");
            self.store.clear();
            return Ok(None);
        }
        Ok(Some(session))
    }

    async fn sign_out(&self) -> AuthResult<()> {
        let Some(session) = self.store.current() else {
            return Ok(());
        };
        self.store.clear();
        let request = self.request_with_key(
            HttpRequest::post(self.endpoint("logout"))
                .header("Authorization", format!("Bearer {}", session.access_token)),
        );
        match self.transport.send(request).await {
            Ok(response) if response.is_success() => {}
            Ok(response) => {
                tracing::warn!(status = response.status, "remote sign-out rejected; local session cleared");
            }
            Err(err) => {
                tracing::warn!(error = %err, "remote sign-out failed; local session cleared");
            }
        }
        Ok(())
    }

    fn restore_session(&self, session: &Session) {
        self.store.save(session.clone());
    }
}

#[derive(Deserialize)]
struct TokenBody {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: UserBody,
}

#[derive(Deserialize)]
struct UserBody {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
}

impl From<UserBody> for User {
    fn from(body: UserBody) -> Self {
        Self {
            id: body.id,
            email: body.email.unwrap_or_default(),
            created_at: body.created_at.unwrap_or_default(),
        }
    }
}

#[derive(Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Decode a token grant into a session, resolving relative expiry against `now`.
///
/// # Errors
///
/// Returns [`AuthError::Unknown`] when the body is not a token grant.
pub fn parse_token_body(body: &str, now: DateTime<Utc>) -> AuthResult<Session> {
    let token: TokenBody = serde_json::from_str(body)
        .map_err(|err| AuthError::unknown(format!("decode token response: {err}")))?;
    // An `expires_in` past the representable range means no usable expiry.
    let expires_at = token
        .expires_at
        .or_else(|| token.expires_in.and_then(|secs| now.timestamp().checked_add(secs)));
    Ok(Session {
        user: token.user.into(),
        access_token: token.access_token,
        expires_at,
    })
}

/// Decode a sign-up response; bodies without a token mean confirmation is pending.
///
/// # Errors
///
/// Returns [`AuthError::Unknown`] when the body is not JSON or a token grant is malformed.
pub fn parse_sign_up_body(
    body: &str,
    email: &str,
    now: DateTime<Utc>,
) -> AuthResult<SignUpOutcome> {
    let value: Value = serde_json::from_str(body)
        .map_err(|err| AuthError::unknown(format!("decode sign-up response: {err}")))?;
    if value.get("access_token").is_some() {
        return parse_token_body(body, now).map(SignUpOutcome::SignedIn);
    }
    Ok(SignUpOutcome::ConfirmationSent {
        email: email.to_string(),
    })
}

/// Map a non-2xx service response onto the auth error taxonomy.
#[must_use]
pub fn map_error_response(response: &HttpResponse) -> AuthError {
    let body: ErrorBody = serde_json::from_str(&response.body).unwrap_or_default();
    let code = body
        .error_code
        .as_deref()
        .or(body.error.as_deref())
        .unwrap_or_default();
    match (response.status, code) {
        (400 | 401, "invalid_grant" | "invalid_credentials") => AuthError::InvalidCredentials,
        (400 | 422, "user_already_exists" | "email_exists") => AuthError::AlreadyRegistered,
        (status, _) => {
            let message = body
                .msg
                .or(body.error_description)
                .or(body.message)
                .unwrap_or_else(|| truncate(&response.body));
            AuthError::unknown(format!("status {status}: {message}"))
        }
    }
}

fn truncate(text: &str) -> String {
    text.chars().take(MAX_DETAIL_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn token_body_resolves_relative_expiry() {
        let body = r#"{"access_token":"jwt","expires_in":3600,"user":{"id":"u1","email":"a@b.c","created_at":"2024-01-01T00:00:00Z"}}"#;
        let session = parse_token_body(body, now()).unwrap();
        assert_eq!(session.access_token, "jwt");
        assert_eq!(session.expires_at, Some(now().timestamp() + 3600));
        assert_eq!(session.user.email, "a@b.c");
    }

    #[test]
    fn out_of_range_relative_expiry_is_dropped() {
        let body = r#"{"access_token":"jwt","expires_in":9223372036854775807,"user":{"id":"u1"}}"#;
        let session = parse_token_body(body, now()).unwrap();
        assert_eq!(session.expires_at, None);
        assert!(!session.is_expired_at(now()));
    }

    #[test]
    fn absolute_expiry_wins() {
        let body = r#"{"access_token":"jwt","expires_in":3600,"expires_at":42,"user":{"id":"u1"}}"#;
        assert_eq!(parse_token_body(body, now()).unwrap().expires_at, Some(42));
    }

    #[test]
    fn sign_up_without_token_awaits_confirmation() {
        let body = r#"{"id":"u1","email":"new@b.c","confirmation_sent_at":"2024-05-01T12:00:00Z"}"#;
        assert_eq!(
            parse_sign_up_body(body, "new@b.c", now()).unwrap(),
            SignUpOutcome::ConfirmationSent {
                email: "new@b.c".to_string()
            }
        );
    }

    #[test]
    fn sign_up_with_token_signs_in() {
        let body = r#"{"access_token":"jwt","user":{"id":"u1","email":"new@b.c"}}"#;
        assert!(matches!(
            parse_sign_up_body(body, "new@b.c", now()).unwrap(),
            SignUpOutcome::SignedIn(_)
        ));
    }

    #[test]
    fn invalid_grant_maps_to_invalid_credentials() {
        let legacy = response(
            400,
            r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#,
        );
        let current = response(
            400,
            r#"{"code":400,"error_code":"invalid_credentials","msg":"Invalid login credentials"}"#,
        );
        assert_eq!(map_error_response(&legacy), AuthError::InvalidCredentials);
        assert_eq!(map_error_response(&current), AuthError::InvalidCredentials);
    }

    #[test]
    fn existing_user_maps_to_already_registered() {
        let body = response(
            422,
            r#"{"code":422,"error_code":"user_already_exists","msg":"User already registered"}"#,
        );
        assert_eq!(map_error_response(&body), AuthError::AlreadyRegistered);
    }

    #[test]
    fn other_failures_keep_service_message() {
        let err = map_error_response(&response(500, r#"{"msg":"database down"}"#));
        assert_eq!(err, AuthError::unknown("status 500: database down"));
        let err = map_error_response(&response(502, "Bad Gateway"));
        assert_eq!(err, AuthError::unknown("status 502: Bad Gateway"));
    }
}
