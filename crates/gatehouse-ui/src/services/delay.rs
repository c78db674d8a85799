use std::time::Duration;

use async_trait::async_trait;
use gatehouse_auth::Delay;
use gloo_timers::future::TimeoutFuture;

/// Latency simulation backed by `setTimeout`.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct TimerDelay;

#[async_trait(?Send)]
impl Delay for TimerDelay {
    async fn sleep(&self, duration: Duration) {
        TimeoutFuture::new(millis(duration)).await;
    }
}

pub(crate) fn millis(duration: Duration) -> u32 {
    u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)
}
