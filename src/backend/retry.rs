// src/backend/retry.rs

use std::future::Future;
use std::time::Duration;

use crate::common::error::AppError;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            initial_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    /// Runs `op` until it succeeds, fails with a client error, or the attempts
    /// run out. The delay doubles after every failed attempt.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, AppError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        let mut delay = self.initial_delay;
        let mut attempt = 1;

        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_client_error() || attempt >= self.attempts => return Err(e),
                Err(e) => {
                    tracing::warn!(attempt, delay_ms = delay.as_millis() as u64, "Backend call failed, retrying: {}", e);
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                    attempt += 1;
                }
            }
        }
    }
}
