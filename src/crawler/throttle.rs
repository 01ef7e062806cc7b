//! Inter-request delay
//!
//! Every outbound request of a crawl goes through one [`Throttle`]. The first
//! request is sent immediately; each later one waits the full configured delay.

use std::time::Duration;

/// Sequential request throttle
#[derive(Debug)]
pub struct Throttle {
    delay: Duration,
    requests: u64,
}

impl Throttle {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            requests: 0,
        }
    }

    /// Waits as required, then records that a request is about to be sent
    pub async fn before_request(&mut self) {
        if self.requests > 0 && !self.delay.is_zero() {
            tracing::debug!("Waiting {:.2}s before next request", self.delay.as_secs_f64());
            tokio::time::sleep(self.delay).await;
        }

        self.requests += 1;
    }

    /// Number of requests let through so far
    pub fn requests(&self) -> u64 {
        self.requests
    }
}
