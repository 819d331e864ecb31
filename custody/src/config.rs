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

use std::fmt::{self, Debug};
use std::str::FromStr;
use std::time::Duration;

use custody_core::hash::base64_decode;
use custody_core::utils::{Redact, RedactBytes};
use custody_core::{Context, Error, Result};
use custody_jwt::DEFAULT_TOKEN_EXPIRY_SECONDS;
use http::{HeaderValue, Uri};
use log::warn;

use crate::constants::*;
use crate::retry::RetryPolicy;

/// Config for the custody client.
#[derive(Clone)]
pub struct Config {
    /// API key sent with every request and used as the token subject.
    pub api_key: Option<String>,
    /// PEM encoded RSA private key.
    pub private_key: Option<Vec<u8>>,
    /// Path of a PEM encoded RSA private key, read by [`crate::Client::load`].
    pub private_key_path: Option<String>,
    /// Base URL of the API, like `https://api.example.com`.
    pub base_url: Option<String>,
    /// Lifetime of each signed token in seconds.
    pub token_expiry_seconds: i64,
    /// Retry behavior of the transport.
    pub retry: RetryPolicy,
    /// Overall deadline of one call, retries included. `None` means no deadline.
    pub timeout: Option<Duration>,
    /// Hash the encoded query string as the body of GET requests and sign
    /// the bare path, instead of signing the path with its query string.
    pub sign_query_as_body: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            private_key: None,
            private_key_path: None,
            base_url: None,
            token_expiry_seconds: DEFAULT_TOKEN_EXPIRY_SECONDS,
            retry: RetryPolicy::default(),
            timeout: None,
            sign_query_as_body: false,
        }
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &Redact::from(&self.api_key))
            .field(
                "private_key",
                &RedactBytes(self.private_key.as_deref().unwrap_or_default()),
            )
            .field("private_key_path", &self.private_key_path)
            .field("base_url", &self.base_url)
            .field("token_expiry_seconds", &self.token_expiry_seconds)
            .field("retry", &self.retry)
            .field("timeout", &self.timeout)
            .field("sign_query_as_body", &self.sign_query_as_body)
            .finish()
    }
}

impl Config {
    /// Create a new config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the PEM encoded private key.
    pub fn with_private_key(mut self, pem: impl Into<Vec<u8>>) -> Self {
        self.private_key = Some(pem.into());
        self
    }

    /// Set the private key file path.
    pub fn with_private_key_path(mut self, path: impl Into<String>) -> Self {
        self.private_key_path = Some(path.into());
        self
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the token lifetime in seconds.
    pub fn with_token_expiry_seconds(mut self, seconds: i64) -> Self {
        self.token_expiry_seconds = seconds;
        self
    }

    /// Set the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set the overall deadline of one call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Hash the query string of GET requests as their body.
    pub fn with_sign_query_as_body(mut self) -> Self {
        self.sign_query_as_body = true;
        self
    }

    /// Load config from environment variables.
    ///
    /// `CUSTODY_PRIVATE_KEY` holds either the PEM text or its base64
    /// encoding. Numbers that fail to parse are ignored with a warning.
    pub fn from_env(ctx: &Context) -> Self {
        let mut cfg = Self::default();

        if let Some(v) = ctx.env_var(CUSTODY_API_KEY) {
            cfg.api_key = Some(v);
        }

        if let Some(v) = ctx.env_var(CUSTODY_PRIVATE_KEY) {
            cfg.private_key = Some(decode_private_key(v));
        }

        if let Some(v) = ctx.env_var(CUSTODY_PRIVATE_KEY_PATH) {
            cfg.private_key_path = Some(v);
        }

        if let Some(v) = ctx.env_var(CUSTODY_BASE_URL) {
            cfg.base_url = Some(v);
        }

        if let Some(v) = parse_env::<i64>(ctx, CUSTODY_TOKEN_EXPIRY_SECONDS) {
            cfg.token_expiry_seconds = v;
        }

        if let Some(v) = parse_env::<u64>(ctx, CUSTODY_TIMEOUT_SECONDS) {
            cfg.timeout = Some(Duration::from_secs(v));
        }

        if let Some(v) = parse_env::<usize>(ctx, CUSTODY_MAX_ATTEMPTS) {
            cfg.retry.max_attempts = v;
        }

        cfg
    }

    /// Check everything that can be checked without the private key.
    pub fn validate(&self) -> Result<()> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::config_invalid("api key is required"))?;
        HeaderValue::from_str(api_key).map_err(|e| {
            Error::config_invalid("api key is not a valid header value").with_source(e)
        })?;

        let base_url = self
            .base_url
            .as_deref()
            .ok_or_else(|| Error::config_invalid("base url is required"))?;
        let uri = Uri::from_str(base_url).map_err(|e| {
            Error::config_invalid("base url is invalid")
                .with_source(e)
                .with_context(format!("base_url: {base_url}"))
        })?;
        if uri.scheme().is_none() || uri.authority().is_none() {
            return Err(Error::config_invalid("base url must be absolute")
                .with_context(format!("base_url: {base_url}")));
        }

        self.retry.validate()
    }
}

fn decode_private_key(v: String) -> Vec<u8> {
    if v.contains("-----BEGIN") {
        return v.into_bytes();
    }

    match base64_decode(&v) {
        Ok(pem) => pem,
        Err(err) => {
            warn!("{CUSTODY_PRIVATE_KEY} is neither PEM nor base64, using it as is: {err}");
            v.into_bytes()
        }
    }
}

fn parse_env<T: FromStr>(ctx: &Context, key: &str) -> Option<T> {
    let v = ctx.env_var(key)?;
    match v.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("ignoring {key}: {v:?} is not a valid number");
            None
        }
    }
}
