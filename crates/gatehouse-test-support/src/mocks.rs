//! Fake transport and probe implementations for auth integration tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;
use gatehouse_auth::{
    AuthError, AuthResult, HealthProbe, HttpRequest, HttpResponse, HttpTransport, TransportError,
};

/// Transport that replays queued responses and records every request.
///
/// Clones share the queue and the log, so a test can keep a handle after
/// moving one into a backend.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    replies: Rc<RefCell<VecDeque<Result<HttpResponse, TransportError>>>>,
    requests: Rc<RefCell<Vec<HttpRequest>>>,
}

impl ScriptedTransport {
    /// Transport with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response with `status` and `body`.
    #[must_use]
    pub fn reply(self, status: u16, body: &str) -> Self {
        self.replies.borrow_mut().push_back(Ok(HttpResponse {
            status,
            body: body.to_string(),
        }));
        self
    }

    /// Queue a transport failure.
    #[must_use]
    pub fn fail(self, error: TransportError) -> Self {
        self.replies.borrow_mut().push_back(Err(error));
        self
    }

    /// Requests sent so far.
    #[must_use]
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    /// Number of replies not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.replies.borrow().len()
    }
}

#[async_trait(?Send)]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.borrow_mut().push(request);
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Network("script exhausted".to_string())))
    }
}

/// Probe with a fixed answer that counts how often it ran.
#[derive(Default)]
pub struct StaticProbe {
    available: bool,
    calls: Cell<u32>,
}

impl StaticProbe {
    /// Probe reporting the hosted service as reachable.
    #[must_use]
    pub const fn up() -> Self {
        Self {
            available: true,
            calls: Cell::new(0),
        }
    }

    /// Probe reporting the hosted service as unreachable.
    #[must_use]
    pub const fn down() -> Self {
        Self {
            available: false,
            calls: Cell::new(0),
        }
    }

    /// How many checks ran.
    #[must_use]
    pub fn calls(&self) -> u32 {
        self.calls.get()
    }
}

#[async_trait(?Send)]
impl HealthProbe for StaticProbe {
    async fn check(&self) -> AuthResult<()> {
        self.calls.set(self.calls.get() + 1);
        if self.available {
            Ok(())
        } else {
            Err(AuthError::ProbeUnavailable)
        }
    }
}
