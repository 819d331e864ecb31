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

//! Time related utils.
//!
//! Nothing in this workspace reads the process clock directly. Components
//! that need the current time take a [`TimeSource`] at construction, usually
//! from [`Context::time_source`](crate::Context::time_source).

use chrono::TimeDelta;
use chrono::Utc;
use std::fmt::Debug;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

/// DateTime is the alias for `chrono::DateTime<Utc>`.
pub type DateTime = chrono::DateTime<Utc>;

/// TimeSource supplies the current time.
pub trait TimeSource: Debug + Send + Sync + 'static {
    /// Returns the current instant.
    fn now(&self) -> DateTime;
}

/// SystemTimeSource reads the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> DateTime {
        Utc::now()
    }
}

/// StaticTimeSource returns an instant controlled by the caller.
///
/// Clones share the same instant, so a test can keep one handle and move
/// time forward while another handle sits inside a signer.
#[derive(Debug, Clone)]
pub struct StaticTimeSource {
    now: Arc<Mutex<DateTime>>,
}

impl StaticTimeSource {
    /// Create a time source frozen at `now`.
    pub fn new(now: DateTime) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    /// Create a time source frozen at the given unix timestamp in seconds.
    ///
    /// Out of range timestamps fall back to the unix epoch.
    pub fn from_timestamp(secs: i64) -> Self {
        Self::new(DateTime::from_timestamp(secs, 0).unwrap_or_default())
    }

    /// Move the instant to `now`.
    pub fn set(&self, now: DateTime) {
        *self.lock() = now;
    }

    /// Move the instant forward by `delta`. Overflowing moves are ignored.
    pub fn advance(&self, delta: TimeDelta) {
        let mut now = self.lock();
        if let Some(next) = now.checked_add_signed(delta) {
            *now = next;
        }
    }

    // The guarded value is a plain instant, a poisoned lock still holds a valid one.
    fn lock(&self) -> MutexGuard<'_, DateTime> {
        self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TimeSource for StaticTimeSource {
    fn now(&self) -> DateTime {
        *self.lock()
    }
}
