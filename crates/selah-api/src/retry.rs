// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use selah_app::{ViewerError, ViewerResult};
use std::thread;
use std::time::Duration;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Outcome of one failed attempt.
#[derive(Debug)]
pub enum AttemptError {
    /// Transport failure or non-success status; worth another try.
    Transient(String),
    /// The server answered but the answer is unusable. Not retried.
    Fatal(ViewerError),
}

/// Fixed-delay retry with a bounded number of total attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    pub const fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// A zero budget still makes one attempt.
    pub const fn attempts(self) -> u32 {
        if self.max_attempts == 0 {
            1
        } else {
            self.max_attempts
        }
    }

    /// Runs `attempt` (1-based attempt number) until it succeeds, fails
    /// fatally, or the budget is spent. Exhaustion reports the last message.
    pub fn run<T, F>(self, url: &str, mut attempt: F) -> ViewerResult<T>
    where
        F: FnMut(u32) -> Result<T, AttemptError>,
    {
        let attempts = self.attempts();
        let mut last_message = String::new();
        for number in 1..=attempts {
            tracing::debug!(url, attempt = number, "fetch attempt");
            match attempt(number) {
                Ok(value) => return Ok(value),
                Err(AttemptError::Fatal(error)) => return Err(error),
                Err(AttemptError::Transient(message)) => {
                    if number < attempts {
                        tracing::warn!(
                            url,
                            attempt = number,
                            error = %message,
                            "fetch failed, retrying in {:?}",
                            self.delay
                        );
                        thread::sleep(self.delay);
                    }
                    last_message = message;
                }
            }
        }

        tracing::error!(url, attempts, error = %last_message, "fetch gave up");
        Err(ViewerError::Fetch {
            url: url.to_owned(),
            message: last_message,
        })
    }
}
