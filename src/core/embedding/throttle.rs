//! Request throttling for the embedding service.
//!
//! A [`RateLimit`] states the policy ("no more than N requests per
//! unit time"); a [`Throttle`] enforces it across one ingestion run.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;
use tokio::time::{sleep, Instant};

use crate::core::error::{IngestError, Result};

fn default_delay_ms() -> u64 {
    45_000
}

/// Throttling policy applied between embedding requests
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum RateLimit {
    /// Sleep a fixed time after every insertion, including the last
    FixedDelay {
        #[serde(default = "default_delay_ms")]
        delay_ms: u64,
    },

    /// At most `max_requests` requests in any sliding `window_ms`
    Window { max_requests: u32, window_ms: u64 },

    /// No throttling
    None,
}

impl Default for RateLimit {
    fn default() -> Self {
        RateLimit::FixedDelay {
            delay_ms: default_delay_ms(),
        }
    }
}

impl RateLimit {
    /// Reject policies that could never let a request through
    pub fn validate(&self) -> Result<()> {
        match self {
            RateLimit::Window { max_requests: 0, .. } => Err(IngestError::ConfigError(
                "Rate limit window must allow at least one request".to_string(),
            )),
            RateLimit::Window { window_ms: 0, .. } => Err(IngestError::ConfigError(
                "Rate limit window must be non-zero".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// Estimated time spent waiting on the throttle for `requests`
    /// embedding calls (network time not included)
    pub fn estimate(&self, requests: usize) -> Duration {
        match self {
            RateLimit::FixedDelay { delay_ms } => {
                Duration::from_millis(delay_ms.saturating_mul(requests as u64))
            }
            RateLimit::Window {
                max_requests,
                window_ms,
            } => {
                if requests == 0 || *max_requests == 0 {
                    return Duration::ZERO;
                }
                // The first window is free; every later batch waits one window
                let waits = (requests as u64 - 1) / u64::from(*max_requests);
                Duration::from_millis(window_ms.saturating_mul(waits))
            }
            RateLimit::None => Duration::ZERO,
        }
    }
}

impl fmt::Display for RateLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateLimit::FixedDelay { delay_ms } => write!(f, "fixed delay of {delay_ms}ms"),
            RateLimit::Window {
                max_requests,
                window_ms,
            } => write!(f, "{max_requests} requests per {window_ms}ms"),
            RateLimit::None => write!(f, "none"),
        }
    }
}

/// Stateful enforcer of a [`RateLimit`] for one run
#[derive(Debug)]
pub struct Throttle {
    policy: RateLimit,

    /// Start times of requests still inside the window
    sent: VecDeque<Instant>,
}

impl Throttle {
    /// Create a throttle for the given policy
    pub fn new(policy: RateLimit) -> Self {
        Self {
            policy,
            sent: VecDeque::new(),
        }
    }

    /// The policy being enforced
    pub fn policy(&self) -> &RateLimit {
        &self.policy
    }

    /// Wait until another embedding request is allowed
    pub async fn acquire(&mut self) {
        let (max_requests, window) = match self.policy {
            RateLimit::Window {
                max_requests,
                window_ms,
            } => (max_requests as usize, Duration::from_millis(window_ms)),
            _ => return,
        };

        loop {
            let now = Instant::now();
            while let Some(oldest) = self.sent.front() {
                if now.duration_since(*oldest) >= window {
                    self.sent.pop_front();
                } else {
                    break;
                }
            }

            if self.sent.len() < max_requests {
                self.sent.push_back(now);
                return;
            }

            if let Some(oldest) = self.sent.front() {
                let wait = window.saturating_sub(now.duration_since(*oldest));
                tracing::debug!("Rate limit reached, waiting {:?}", wait);
                sleep(wait).await;
            }
        }
    }

    /// Pause after an insertion (fixed-delay policy only)
    pub async fn pause(&mut self) {
        if let RateLimit::FixedDelay { delay_ms } = self.policy {
            sleep(Duration::from_millis(delay_ms)).await;
        }
    }
}
