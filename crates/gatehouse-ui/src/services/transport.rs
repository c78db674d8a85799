//! `fetch` transport with an abort-based deadline.

use async_trait::async_trait;
use gatehouse_auth::{HttpRequest, HttpResponse, HttpTransport, Method, TransportError};
use gloo_net::http::Request;
use gloo_timers::callback::Timeout;
use web_sys::AbortController;

use crate::services::delay::millis;

/// HTTP transport over the browser `fetch` API.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct FetchTransport;

#[async_trait(?Send)]
impl HttpTransport for FetchTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let controller = AbortController::new()
            .map_err(|_| TransportError::Network("abort controller unavailable".to_string()))?;
        let signal = controller.signal();

        let mut builder = match request.method {
            Method::Get => Request::get(&request.url),
            Method::Post => Request::post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }
        let builder = builder.abort_signal(Some(&signal));

        let timeout_ms = request.timeout.map(millis);
        let deadline_ms = timeout_ms.map(u64::from);
        // Dropping the timer cancels it once the response arrives.
        let _deadline = timeout_ms.map(|ms| {
            let controller = controller.clone();
            Timeout::new(ms, move || controller.abort())
        });

        let response = builder
            .send()
            .await
            .map_err(|err| TransportError::interrupted(signal.aborted(), deadline_ms, err))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| TransportError::interrupted(signal.aborted(), deadline_ms, err))?;
        Ok(HttpResponse { status, body })
    }
}
