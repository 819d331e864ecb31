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

//! Reqwest-based HTTP client implementation for the custody client.
//!
//! `ReqwestHttpSend` performs one round trip per call and reports failures in
//! the shape the retrying transport needs:
//!
//! | reqwest failure | retryable | request sent |
//! |---|---|---|
//! | connect (refused, DNS, TLS handshake) | yes | no |
//! | timeout, request write | yes | yes |
//! | body read after the status line | yes | yes, with status |
//! | invalid request, redirect, anything else | no | yes |
//!
//! ## Example
//!
//! ```no_run
//! use custody_core::Context;
//! use custody_http_send_reqwest::ReqwestHttpSend;
//! use reqwest::Client;
//! use std::time::Duration;
//!
//! let client = Client::builder()
//!     .connect_timeout(Duration::from_secs(5))
//!     .build()
//!     .expect("client must build");
//! let ctx = Context::new().with_http_send(ReqwestHttpSend::new(client));
//! ```

use async_trait::async_trait;
use bytes::Bytes;
use custody_core::{Error, HttpSend, Result};
use log::debug;
use reqwest::{Client, Request};

/// Reqwest-based implementation of the `HttpSend` trait.
///
/// `reqwest::Client` pools connections internally and is cheap to clone, so
/// one instance is shared by every call.
#[derive(Debug, Default, Clone)]
pub struct ReqwestHttpSend {
    client: Client,
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a reqwest::Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let req = Request::try_from(req).map_err(|e| {
            Error::transport("failed to build request")
                .with_source(e)
                .set_request_sent(false)
        })?;

        let resp = self.client.execute(req).await.map_err(classify)?;

        let status = resp.status();
        let version = resp.version();
        let headers = resp.headers().clone();
        let body = resp.bytes().await.map_err(|e| {
            debug!("reading response body failed after status {status}: {e}");
            Error::transport("failed to read response body")
                .with_source(e)
                .with_status(status)
                .set_retryable(true)
        })?;

        let mut out = http::Response::new(body);
        *out.status_mut() = status;
        *out.version_mut() = version;
        *out.headers_mut() = headers;
        Ok(out)
    }
}

/// Map a reqwest send failure to a transport error.
fn classify(err: reqwest::Error) -> Error {
    if err.is_connect() {
        return Error::transport("failed to connect")
            .with_source(err)
            .set_retryable(true)
            .set_request_sent(false);
    }

    if err.is_timeout() {
        return Error::transport("request timed out")
            .with_source(err)
            .set_retryable(true);
    }

    if err.is_request() || err.is_body() {
        return Error::transport("failed to send request")
            .with_source(err)
            .set_retryable(true);
    }

    Error::transport("request failed").with_source(err)
}
