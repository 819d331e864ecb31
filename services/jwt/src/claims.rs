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

use crate::constants::DEFAULT_TOKEN_EXPIRY_SECONDS;
use custody_core::{SystemTimeSource, TimeSource};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Claims carried by every request token.
///
/// Field names are a wire contract with the API and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Request path including the version prefix and query string.
    pub uri: String,
    /// Issuance time in seconds, reused as the replay nonce.
    pub nonce: i64,
    /// Issued at, in seconds.
    pub iat: i64,
    /// Issuance time again, kept for servers that read it.
    pub now: i64,
    /// Expiry in seconds.
    pub exp: i64,
    /// API key the token is issued for.
    pub sub: String,
    /// Hex encoded SHA256 of the exact request body bytes.
    #[serde(rename = "bodyHash")]
    pub body_hash: String,
}

/// ClaimBuilder stamps claims with the time from its [`TimeSource`].
#[derive(Debug, Clone)]
pub struct ClaimBuilder {
    time: Arc<dyn TimeSource>,
    expiry_seconds: i64,
}

impl Default for ClaimBuilder {
    fn default() -> Self {
        Self::new(Arc::new(SystemTimeSource), DEFAULT_TOKEN_EXPIRY_SECONDS)
    }
}

impl ClaimBuilder {
    /// Create a builder issuing tokens that live `expiry_seconds`.
    ///
    /// Zero or negative values are accepted and produce tokens that are
    /// already expired when issued.
    pub fn new(time: Arc<dyn TimeSource>, expiry_seconds: i64) -> Self {
        Self {
            time,
            expiry_seconds,
        }
    }

    /// Configured token lifetime in seconds.
    pub fn expiry_seconds(&self) -> i64 {
        self.expiry_seconds
    }

    /// Time source used to stamp claims.
    pub fn time_source(&self) -> Arc<dyn TimeSource> {
        self.time.clone()
    }

    /// Build the claims for one request.
    pub fn build(&self, path: &str, api_key: &str, body_hash: &str) -> Claims {
        let now = self.time.now().timestamp();

        Claims {
            uri: path.to_string(),
            nonce: now,
            iat: now,
            now,
            exp: now.saturating_add(self.expiry_seconds),
            sub: api_key.to_string(),
            body_hash: body_hash.to_string(),
        }
    }
}
