//! Backend availability probe and the per-page-load backend selector.
//!
//! # Design
//! - The probe never fails outward: any error collapses to "unavailable".
//! - The selector probes once and memoises the choice for the page load.
//! - Nothing is persisted; a reload probes again.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;

use crate::backend::{AuthBackend, BackendKind};
use crate::error::{AuthError, AuthResult};
use crate::transport::{HttpRequest, HttpTransport};

/// Read-only reachability check for the hosted service.
#[async_trait(?Send)]
pub trait HealthProbe {
    /// Check the service once.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::ProbeUnavailable`] on timeout, connection failure,
    /// or a non-2xx status.
    async fn check(&self) -> AuthResult<()>;
}

/// Probe issuing a bounded `GET` against a health URL.
pub struct HttpHealthProbe<T> {
    transport: T,
    url: String,
    timeout: Duration,
}

impl<T: HttpTransport> HttpHealthProbe<T> {
    /// Probe `url`, aborting after `timeout`.
    pub fn new(transport: T, url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            transport,
            url: url.into(),
            timeout,
        }
    }
}

#[async_trait(?Send)]
impl<T: HttpTransport> HealthProbe for HttpHealthProbe<T> {
    async fn check(&self) -> AuthResult<()> {
        let request = HttpRequest::get(self.url.as_str()).timeout(self.timeout);
        match self.transport.send(request).await {
            Ok(response) if response.is_success() => Ok(()),
            Ok(response) => {
                tracing::debug!(url = %self.url, status = response.status, "health probe rejected");
                Err(AuthError::ProbeUnavailable)
            }
            Err(err) => {
                tracing::debug!(url = %self.url, error = %err, "health probe failed");
                Err(AuthError::ProbeUnavailable)
            }
        }
    }
}

/// Whether the hosted service answered the probe.
pub async fn is_backend_available(probe: &dyn HealthProbe) -> bool {
    probe.check().await.is_ok()
}

/// Backend chosen for the page load.
#[derive(Clone)]
pub struct SelectedBackend {
    /// Which variant was chosen.
    pub kind: BackendKind,
    /// The backend servicing auth calls.
    pub backend: Rc<dyn AuthBackend>,
}

/// Chooses between the hosted and mock backends, probing at most once.
pub struct BackendSelector {
    probe: Rc<dyn HealthProbe>,
    remote: Rc<dyn AuthBackend>,
    fallback: Rc<dyn AuthBackend>,
    selected: RefCell<Option<SelectedBackend>>,
}

impl BackendSelector {
    /// Selector over `remote` and `fallback`, decided by `probe`.
    #[must_use]
    pub fn new(
        probe: Rc<dyn HealthProbe>,
        remote: Rc<dyn AuthBackend>,
        fallback: Rc<dyn AuthBackend>,
    ) -> Self {
        Self {
            probe,
            remote,
            fallback,
            selected: RefCell::new(None),
        }
    }

    /// Selector that always uses `backend` without probing.
    #[must_use]
    pub fn fixed(backend: Rc<dyn AuthBackend>) -> Self {
        let selected = SelectedBackend {
            kind: backend.kind(),
            backend: Rc::clone(&backend),
        };
        Self {
            probe: Rc::new(AlwaysAvailable),
            remote: Rc::clone(&backend),
            fallback: backend,
            selected: RefCell::new(Some(selected)),
        }
    }

    /// Decision already made, if any.
    #[must_use]
    pub fn selected(&self) -> Option<SelectedBackend> {
        self.selected.borrow().clone()
    }

    /// Probe on first call, then return the memoised choice.
    pub async fn select(&self) -> SelectedBackend {
        if let Some(selected) = self.selected() {
            return selected;
        }
        let available = is_backend_available(self.probe.as_ref()).await;
        if let Some(selected) = self.selected() {
            return selected;
        }
        let backend = if available {
            Rc::clone(&self.remote)
        } else {
            tracing::info!("auth service unreachable; using mock backend");
            Rc::clone(&self.fallback)
        };
        let selected = SelectedBackend {
            kind: backend.kind(),
            backend,
        };
        *self.selected.borrow_mut() = Some(selected.clone());
        selected
    }
}

struct AlwaysAvailable;

#[async_trait(?Send)]
impl HealthProbe for AlwaysAvailable {
    async fn check(&self) -> AuthResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::mock::{MockAuthBackend, MockDirectory};
    use crate::model::{AuthResponse, Credentials, Session, SignUpOutcome};
    use crate::policy::AllowList;
    use crate::storage::MemoryStore;
    use crate::transport::HttpResponse;
    use std::cell::Cell;

    struct FixedTransport(Result<u16, TransportError>);

    #[async_trait(?Send)]
    impl HttpTransport for FixedTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            assert_eq!(request.timeout, Some(Duration::from_secs(1)));
            self.0.clone().map(|status| HttpResponse {
                status,
                body: String::new(),
            })
        }
    }

    fn probe(result: Result<u16, TransportError>) -> HttpHealthProbe<FixedTransport> {
        HttpHealthProbe::new(
            FixedTransport(result),
            "http://127.0.0.1:54321/health",
            Duration::from_secs(1),
        )
    }

    #[tokio::test]
    async fn probe_reports_only_2xx_as_available() {
        assert!(is_backend_available(&probe(Ok(200))).await);
        assert!(is_backend_available(&probe(Ok(204))).await);
        assert!(!is_backend_available(&probe(Ok(503))).await);
        assert!(!is_backend_available(&probe(Err(TransportError::Timeout { millis: 1000 }))).await);
        assert!(
            !is_backend_available(&probe(Err(TransportError::Network("refused".into())))).await
        );
    }

    struct CountingProbe {
        up: bool,
        calls: Cell<u32>,
    }

    #[async_trait(?Send)]
    impl HealthProbe for CountingProbe {
        async fn check(&self) -> AuthResult<()> {
            self.calls.set(self.calls.get() + 1);
            if self.up {
                Ok(())
            } else {
                Err(AuthError::ProbeUnavailable)
            }
        }
    }

    struct StubRemote;

    #[async_trait(?Send)]
    impl AuthBackend for StubRemote {
        fn kind(&self) -> BackendKind {
            BackendKind::Remote
        }
        async fn sign_in_with_password(&self, _: &Credentials) -> AuthResult<AuthResponse> {
            Err(AuthError::unknown("stub"))
        }
        async fn sign_up(&self, _: &Credentials) -> AuthResult<SignUpOutcome> {
            Err(AuthError::unknown("stub"))
        }
        async fn get_session(&self) -> AuthResult<Option<Session>> {
            Ok(None)
        }
        async fn sign_out(&self) -> AuthResult<()> {
            Ok(())
        }
        fn restore_session(&self, _: &Session) {}
    }

    fn selector(probe: Rc<CountingProbe>) -> BackendSelector {
        let mock = MockAuthBackend::new(
            MemoryStore::new(),
            MockDirectory::with_default_secrets(AllowList::admin_defaults(None)),
        );
        BackendSelector::new(probe, Rc::new(StubRemote), Rc::new(mock))
    }

    #[tokio::test]
    async fn unreachable_service_selects_mock_once() {
        let probe = Rc::new(CountingProbe {
            up: false,
            calls: Cell::new(0),
        });
        let selector = selector(Rc::clone(&probe));
        assert!(selector.selected().is_none());
        assert_eq!(selector.select().await.kind, BackendKind::Mock);
        assert_eq!(selector.select().await.kind, BackendKind::Mock);
        assert_eq!(probe.calls.get(), 1);
    }

    #[tokio::test]
    async fn reachable_service_selects_remote() {
        let probe = Rc::new(CountingProbe {
            up: true,
            calls: Cell::new(0),
        });
        assert_eq!(selector(probe).select().await.kind, BackendKind::Remote);
    }

    #[tokio::test]
    async fn fixed_selector_never_probes() {
        let selector = BackendSelector::fixed(Rc::new(StubRemote));
        assert_eq!(
            selector.selected().map(|selected| selected.kind),
            Some(BackendKind::Remote)
        );
        assert_eq!(selector.select().await.kind, BackendKind::Remote);
    }
}
