//! Front-end configuration with layered overrides.
//!
//! # Design
//! - Values are public; never place secrets other than the anon key here.
//! - Layers apply defaults first, then build-time values, then runtime values.
//! - Empty strings are treated as "not set" in every layer.

use std::time::Duration;

use crate::error::{ConfigError, ConfigResult};
use crate::policy::AllowList;

/// Default hosted auth service location (local development stack).
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:54321";
/// Placeholder anon key used when none is configured.
pub const DEFAULT_ANON_KEY: &str = "placeholder-key";
/// Default availability probe deadline.
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 1_000;
/// Default artificial latency applied by the mock backend.
pub const DEFAULT_MOCK_LATENCY_MS: u64 = 500;

/// Configuration keys understood by [`GatehouseConfig::apply_layer`].
pub mod keys {
    /// Base URL of the hosted auth service.
    pub const BACKEND_URL: &str = "GATEHOUSE_BACKEND_URL";
    /// Public anon key sent as the `apikey` header.
    pub const ANON_KEY: &str = "GATEHOUSE_ANON_KEY";
    /// Override for the admin allow-list slot.
    pub const ADMIN_EMAIL: &str = "GATEHOUSE_ADMIN_EMAIL";
    /// Probe deadline in milliseconds.
    pub const PROBE_TIMEOUT_MS: &str = "GATEHOUSE_PROBE_TIMEOUT_MS";
    /// Mock latency in milliseconds.
    pub const MOCK_LATENCY_MS: &str = "GATEHOUSE_MOCK_LATENCY_MS";
}

/// Resolved configuration for both front-ends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GatehouseConfig {
    /// Base URL of the hosted auth service, without trailing slash.
    pub backend_url: String,
    /// Public anon key for the hosted auth service.
    pub anon_key: String,
    /// Override for the admin allow-list slot.
    pub admin_email: Option<String>,
    /// Deadline for the availability probe.
    pub probe_timeout: Duration,
    /// Artificial latency applied by the mock backend.
    pub mock_latency: Duration,
}

impl Default for GatehouseConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            anon_key: DEFAULT_ANON_KEY.to_string(),
            admin_email: None,
            probe_timeout: Duration::from_millis(DEFAULT_PROBE_TIMEOUT_MS),
            mock_latency: Duration::from_millis(DEFAULT_MOCK_LATENCY_MS),
        }
    }
}

impl GatehouseConfig {
    /// Overlay values supplied by `lookup` on top of the current configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidField`] when a numeric value does not parse.
    /// Fields applied before the failure keep their new values.
    pub fn apply_layer<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).as_deref().and_then(normalize_value);

        if let Some(url) = read(keys::BACKEND_URL) {
            self.backend_url = url.trim_end_matches('/').to_string();
        }
        if let Some(key) = read(keys::ANON_KEY) {
            self.anon_key = key;
        }
        if let Some(email) = read(keys::ADMIN_EMAIL) {
            self.admin_email = Some(email);
        }
        if let Some(raw) = read(keys::PROBE_TIMEOUT_MS) {
            self.probe_timeout = parse_millis("probe_timeout_ms", &raw)?;
        }
        if let Some(raw) = read(keys::MOCK_LATENCY_MS) {
            self.mock_latency = parse_millis("mock_latency_ms", &raw)?;
        }
        Ok(())
    }

    /// Build a configuration from defaults plus one lookup layer.
    ///
    /// # Errors
    ///
    /// Propagates [`ConfigError`] from [`Self::apply_layer`].
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        config.apply_layer(lookup)?;
        Ok(config)
    }

    /// Admin allow-list derived from this configuration.
    #[must_use]
    pub fn admin_allow_list(&self) -> AllowList {
        AllowList::admin_defaults(self.admin_email.as_deref())
    }

    /// URL probed to decide whether the hosted service is reachable.
    #[must_use]
    pub fn health_url(&self) -> String {
        format!("{}/health", self.backend_url)
    }
}

fn normalize_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_millis(field: &'static str, raw: &str) -> ConfigResult<Duration> {
    raw.parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| ConfigError::InvalidField {
            field,
            value: raw.to_string(),
            reason: "must be a non-negative integer of milliseconds",
        })
}
