// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::time::Duration;

use backon::{BackoffBuilder, ExponentialBackoff, ExponentialBuilder};
use custody_core::{Error, Result};

/// RetryPolicy bounds how often and how long a request is retried.
///
/// The defaults retry up to 4 attempts in total: 1s -> 2s -> 4s, never
/// sleeping more than 8s across one call. Signed tokens live 10s by default
/// and are issued once per call, so the total wait must stay below the token
/// expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one.
    pub max_attempts: usize,
    /// Delay before the first retry.
    pub base_backoff: Duration,
    /// Upper bound of a single delay.
    pub max_backoff: Duration,
    /// Upper bound of all delays of one call added together.
    pub max_total_wait: Duration,
    /// Randomize delays to spread retries of concurrent callers.
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(4),
            max_total_wait: Duration::from_secs(8),
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// Create the default policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// A policy that sends every request exactly once.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Set the total number of attempts.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the delay before the first retry.
    pub fn with_base_backoff(mut self, delay: Duration) -> Self {
        self.base_backoff = delay;
        self
    }

    /// Set the upper bound of a single delay.
    pub fn with_max_backoff(mut self, delay: Duration) -> Self {
        self.max_backoff = delay;
        self
    }

    /// Set the upper bound of all delays of one call.
    pub fn with_max_total_wait(mut self, wait: Duration) -> Self {
        self.max_total_wait = wait;
        self
    }

    /// Enable or disable jitter.
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Check that the policy can be used.
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(Error::config_invalid(
                "retry policy needs at least one attempt",
            ));
        }
        if self.base_backoff > self.max_backoff {
            return Err(Error::config_invalid(format!(
                "base backoff {:?} is larger than max backoff {:?}",
                self.base_backoff, self.max_backoff
            )));
        }
        Ok(())
    }

    /// Delays to sleep between attempts of a single call.
    pub(crate) fn backoff(&self) -> Backoff {
        let mut builder = ExponentialBuilder::default()
            .with_min_delay(self.base_backoff)
            .with_max_delay(self.max_backoff)
            .with_max_times(self.max_attempts.saturating_sub(1));
        if self.jitter {
            builder = builder.with_jitter();
        }

        Backoff {
            inner: builder.build(),
            max_backoff: self.max_backoff,
            remaining: self.max_total_wait,
        }
    }
}

/// Exponential delays capped per step and in total.
///
/// Yields exactly `max_attempts - 1` delays. Once `max_total_wait` is spent
/// the remaining retries happen without sleeping, so the budget only ever
/// shortens delays and never the number of attempts.
pub(crate) struct Backoff {
    inner: ExponentialBackoff,
    max_backoff: Duration,
    remaining: Duration,
}

impl Iterator for Backoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        // Jitter may push a delay above the configured maximum.
        let delay = self
            .inner
            .next()?
            .min(self.max_backoff)
            .min(self.remaining);
        self.remaining -= delay;
        Some(delay)
    }
}
