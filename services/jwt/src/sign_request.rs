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

use crate::claims::{ClaimBuilder, Claims};
use crate::constants::{DEFAULT_TOKEN_EXPIRY_SECONDS, MIN_RSA_KEY_BITS};
use crate::key::PrivateKey;
use custody_core::hash::hex_sha256;
use custody_core::utils::Redact;
use custody_core::{Error, Result, SystemTimeSource, TimeSource};
use jsonwebtoken::{Algorithm, Header};
use log::debug;
use std::fmt::{self, Debug};
use std::sync::Arc;

/// RequestSigner issues one RS256 token per request.
///
/// Each token binds the request path and the SHA256 of the exact body bytes,
/// and is valid for a few seconds only. Signing is deterministic for a fixed
/// time source, so failures are never worth retrying.
#[derive(Clone)]
pub struct RequestSigner {
    api_key: String,
    key: PrivateKey,
    claims: ClaimBuilder,
}

impl Debug for RequestSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestSigner")
            .field("api_key", &Redact::from(&self.api_key))
            .field("key", &self.key)
            .field("claims", &self.claims)
            .finish()
    }
}

impl RequestSigner {
    /// Create a signer using the system clock and the default token expiry.
    pub fn new(api_key: impl Into<String>, key: PrivateKey) -> Self {
        Self {
            api_key: api_key.into(),
            key,
            claims: ClaimBuilder::new(Arc::new(SystemTimeSource), DEFAULT_TOKEN_EXPIRY_SECONDS),
        }
    }

    /// Set the token lifetime in seconds.
    pub fn with_token_expiry(mut self, seconds: i64) -> Self {
        self.claims = ClaimBuilder::new(self.claims_time(), seconds);
        self
    }

    /// Set the time source used to stamp tokens.
    pub fn with_time_source(mut self, time: Arc<dyn TimeSource>) -> Self {
        self.claims = ClaimBuilder::new(time, self.claims.expiry_seconds());
        self
    }

    /// The API key sent in the `X-API-Key` header and the `sub` claim.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Sign a request for `path` carrying `body`.
    ///
    /// `path` must be the versioned path exactly as the server sees it,
    /// including the query string when present. `body` must be the exact bytes
    /// that go on the wire; pass an empty slice when there is no body.
    pub fn sign(&self, path: &str, body: &[u8]) -> Result<String> {
        let body_hash = hex_sha256(body);
        let claims = self.claims.build(path, &self.api_key, &body_hash);

        debug!(
            "signing token for uri {} with body hash {}, expires at {}",
            claims.uri, claims.body_hash, claims.exp
        );

        self.sign_claims(&claims)
    }

    fn sign_claims(&self, claims: &Claims) -> Result<String> {
        if self.key.bits() < MIN_RSA_KEY_BITS {
            return Err(Error::signing(format!(
                "RSA key of {} bits is too small, at least {} bits are required",
                self.key.bits(),
                MIN_RSA_KEY_BITS
            ))
            .with_context(format!("uri: {}", claims.uri)));
        }

        jsonwebtoken::encode(
            &Header::new(Algorithm::RS256),
            claims,
            self.key.encoding_key(),
        )
        .map_err(|e| {
            Error::signing("failed to encode JWT")
                .with_source(e)
                .with_context(format!("uri: {}", claims.uri))
        })
    }

    fn claims_time(&self) -> Arc<dyn TimeSource> {
        self.claims.time_source()
    }
}
