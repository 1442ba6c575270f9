use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use serde_with::DurationSeconds;
use std::thread::sleep;
use std::time::Duration;
use tracing::{error, warn};
use ureq::{Error, Response};

const MAX_DELAY_FACTOR: u32 = 10;

/// Bounded retry for a single HTTP call. Only the listed statuses are retried.
#[serde_with::serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Used when the response has no usable Retry-After header
    #[serde_as(as = "DurationSeconds<u64>")]
    pub delay: Duration,
    pub statuses: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(2),
            statuses: vec![429, 503, 408],
        }
    }
}

impl RetryPolicy {
    pub fn run(
        &self,
        what: &str,
        mut call: impl FnMut() -> Result<Response, Error>,
    ) -> Result<Response> {
        let mut attempts = 0;
        while attempts < self.max_attempts {
            attempts += 1;
            match call() {
                Ok(response) => return Ok(response),
                Err(Error::Status(code, response)) if self.statuses.contains(&code) => {
                    let delay = self.wait_for(&response);
                    if attempts < self.max_attempts {
                        warn!("{code} for {what}, retry in {}s", delay.as_secs());
                        sleep(delay);
                    }
                }
                Err(Error::Status(code, response)) => {
                    let body = response.into_string()?;
                    error!("{code} for {what}: {body}");
                    return Err(anyhow!("{code} for {what}: {body}"));
                }
                Err(err) => {
                    error!("{what}: {err}");
                    return Err(anyhow!("{what}: {err}"));
                }
            }
        }
        Err(anyhow!("Retry limit exceeded for {what}"))
    }

    /// The server's Retry-After if present, capped at ten times the delay.
    fn wait_for(&self, response: &Response) -> Duration {
        match retry_after(response) {
            Some(wait) => wait.min(self.delay * MAX_DELAY_FACTOR),
            None => self.delay,
        }
    }
}

fn retry_after(response: &Response) -> Option<Duration> {
    let seconds = response.header("retry-after")?.trim().parse().ok()?;
    Some(Duration::from_secs(seconds))
}
