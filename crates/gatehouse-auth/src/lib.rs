#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::option_option)]

//! Session and authorization gate shared by the Gatehouse front-ends.
//!
//! Layout: `model.rs` (session records), `policy.rs` (allow-list), `storage.rs`
//! (key-value seam + session store), `mock.rs` / `remote.rs` (backends),
//! `probe.rs` (availability probe + selector), `gate.rs` (state machine),
//! `forms.rs` (validation), `callback.rs` / `guard.rs` (user-app routing helpers).
//! Nothing here touches the DOM; browser adapters live in `gatehouse-ui`.

pub mod backend;
pub mod callback;
pub mod config;
pub mod error;
pub mod forms;
pub mod gate;
pub mod guard;
pub mod mock;
pub mod model;
pub mod policy;
pub mod probe;
pub mod remote;
pub mod storage;
pub mod transport;

pub use backend::{AuthBackend, BackendKind};
pub use config::GatehouseConfig;
pub use error::{AuthError, AuthResult, ConfigError, ConfigResult, TransportError};
pub use forms::{FormError, LoginForm, SignUpForm};
pub use gate::{AuthGate, GateState};
pub use guard::GuardDecision;
pub use mock::{Delay, MockAuthBackend, MockDirectory, NoDelay};
pub use model::{AuthResponse, Credentials, Session, SignUpOutcome, User};
pub use policy::{AccessPolicy, AllowList};
pub use probe::{BackendSelector, HealthProbe, HttpHealthProbe, SelectedBackend};
pub use remote::RemoteAuthBackend;
pub use storage::{KeyValueStore, MemoryStore, SessionStore};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, Method};
