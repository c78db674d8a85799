//! Canned credentials, service payloads, and gate wiring.

use std::rc::Rc;

use gatehouse_auth::{
    AccessPolicy, AllowList, AuthGate, BackendSelector, Credentials, GatehouseConfig, HealthProbe,
    MemoryStore, MockAuthBackend, MockDirectory, RemoteAuthBackend,
};

use crate::mocks::ScriptedTransport;

/// Built-in admin account accepted by the mock backend.
#[must_use]
pub fn admin_credentials() -> Credentials {
    Credentials::new("admin@test.com", "pass1word!")
}

/// Address absent from every default allow-list.
pub const OUTSIDER_EMAIL: &str = "nobody@example.com";

/// Token grant body as returned by the hosted service for `email`.
#[must_use]
pub fn token_grant(email: &str, expires_in: i64) -> String {
    format!(
        r#"{{"access_token":"jwt-{email}","token_type":"bearer","expires_in":{expires_in},"user":{{"id":"remote-{email}","email":"{email}","created_at":"2024-05-01T00:00:00Z"}}}}"#
    )
}

/// Handles kept by tests after wiring a gate.
pub struct GateHarness {
    /// The gate under test.
    pub gate: AuthGate,
    /// Browser storage shared by both backends.
    pub storage: MemoryStore,
    /// Transport used by the hosted backend.
    pub transport: ScriptedTransport,
}

/// Wire a gate the way the admin console does, over in-memory storage.
#[must_use]
pub fn admin_gate(probe: Rc<dyn HealthProbe>, transport: ScriptedTransport) -> GateHarness {
    admin_gate_with_storage(probe, transport, MemoryStore::new())
}

/// Like [`admin_gate`] but reusing `storage`, which models a page reload.
#[must_use]
pub fn admin_gate_with_storage(
    probe: Rc<dyn HealthProbe>,
    transport: ScriptedTransport,
    storage: MemoryStore,
) -> GateHarness {
    let config = GatehouseConfig::default();
    let allow_list = config.admin_allow_list();
    let remote = RemoteAuthBackend::new(transport.clone(), storage.clone(), &config);
    let mock = MockAuthBackend::new(
        storage.clone(),
        MockDirectory::with_default_secrets(allow_list.clone()),
    );
    let selector = BackendSelector::new(probe, Rc::new(remote), Rc::new(mock));
    GateHarness {
        gate: AuthGate::new(selector, AccessPolicy::AllowList(allow_list)),
        storage,
        transport,
    }
}

/// Allow-list containing only `emails`.
#[must_use]
pub fn allow_only(emails: &[&str]) -> AccessPolicy {
    AccessPolicy::AllowList(AllowList::new(emails.iter().copied()))
}
