//! Build-time configuration with an optional runtime override.
//!
//! Build-time values come from `GATEHOUSE_*` variables captured with
//! `option_env!`. Static deployments can then override any field through a
//! `window.GATEHOUSE_CONFIG` object whose keys are the lowercase names without
//! the prefix (`backend_url`, `anon_key`, `admin_email`, `probe_timeout_ms`,
//! `mock_latency_ms`). Configuration values are public; do not store secrets here.

use gatehouse_auth::config::keys;
use gatehouse_auth::{ConfigResult, GatehouseConfig};

const RUNTIME_PREFIX: &str = "GATEHOUSE_";

/// Value captured at build time for a `GATEHOUSE_*` key.
#[must_use]
pub fn build_time_value(key: &str) -> Option<String> {
    let value = match key {
        keys::BACKEND_URL => option_env!("GATEHOUSE_BACKEND_URL"),
        keys::ANON_KEY => option_env!("GATEHOUSE_ANON_KEY"),
        keys::ADMIN_EMAIL => option_env!("GATEHOUSE_ADMIN_EMAIL"),
        keys::PROBE_TIMEOUT_MS => option_env!("GATEHOUSE_PROBE_TIMEOUT_MS"),
        keys::MOCK_LATENCY_MS => option_env!("GATEHOUSE_MOCK_LATENCY_MS"),
        _ => None,
    };
    value.map(ToString::to_string)
}

/// Property name used in `window.GATEHOUSE_CONFIG` for a `GATEHOUSE_*` key.
#[must_use]
pub fn runtime_key(key: &str) -> String {
    key.strip_prefix(RUNTIME_PREFIX)
        .unwrap_or(key)
        .to_ascii_lowercase()
}

/// Apply one layer; on failure the configuration keeps its previous values.
///
/// # Errors
///
/// Returns the layer's [`gatehouse_auth::ConfigError`] after restoring the prior state.
pub fn apply_layer_or_keep<F>(config: &mut GatehouseConfig, lookup: F) -> ConfigResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    let previous = config.clone();
    config.apply_layer(lookup).inspect_err(|_| *config = previous)
}

/// Resolve configuration: defaults, then build-time values, then `window.GATEHOUSE_CONFIG`.
#[cfg(target_arch = "wasm32")]
pub(crate) fn load() -> GatehouseConfig {
    use gloo::console;

    let mut config = GatehouseConfig::default();
    if let Err(err) = apply_layer_or_keep(&mut config, build_time_value) {
        console::warn!(format!("ignoring build-time configuration: {err}"));
    }
    if let Some(runtime) = runtime_object() {
        let lookup = |key: &str| read_runtime_value(&runtime, &runtime_key(key));
        if let Err(err) = apply_layer_or_keep(&mut config, lookup) {
            console::warn!(format!("ignoring window.GATEHOUSE_CONFIG: {err}"));
        }
    }
    config
}

#[cfg(target_arch = "wasm32")]
fn runtime_object() -> Option<js_sys::Object> {
    use js_sys::{Object, Reflect};
    use wasm_bindgen::JsValue;

    let window = web_sys::window()?;
    let value = Reflect::get(&window, &JsValue::from_str("GATEHOUSE_CONFIG")).ok()?;
    if value.is_null() || value.is_undefined() {
        return None;
    }
    Some(Object::from(value))
}

#[cfg(target_arch = "wasm32")]
fn read_runtime_value(object: &js_sys::Object, key: &str) -> Option<String> {
    let value = js_sys::Reflect::get(object, &wasm_bindgen::JsValue::from_str(key)).ok()?;
    value
        .as_string()
        .or_else(|| value.as_f64().map(|number| number.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    #[test]
    fn runtime_keys_drop_prefix() {
        assert_eq!(runtime_key(keys::BACKEND_URL), "backend_url");
        assert_eq!(runtime_key(keys::PROBE_TIMEOUT_MS), "probe_timeout_ms");
    }

    #[test]
    fn unknown_build_time_key_is_unset() {
        assert_eq!(build_time_value("GATEHOUSE_NOPE"), None);
    }

    #[test]
    fn runtime_layer_overrides_earlier_values() {
        let runtime: HashMap<String, String> = [
            ("backend_url", "https://auth.example.dev/"),
            ("admin_email", "ops@example.dev"),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();

        let mut config = GatehouseConfig::default();
        apply_layer_or_keep(&mut config, |key| runtime.get(&runtime_key(key)).cloned())
            .unwrap();
        assert_eq!(config.backend_url, "https://auth.example.dev");
        assert_eq!(config.admin_email.as_deref(), Some("ops@example.dev"));
    }

    #[test]
    fn invalid_layer_is_rolled_back() {
        let mut config = GatehouseConfig::default();
        let result = apply_layer_or_keep(&mut config, |key| match key {
            keys::BACKEND_URL => Some("https://elsewhere.dev".to_string()),
            keys::PROBE_TIMEOUT_MS => Some("soon".to_string()),
            _ => None,
        });
        assert!(result.is_err());
        assert_eq!(config, GatehouseConfig::default());
        assert_eq!(config.probe_timeout, Duration::from_millis(1_000));
    }
}
