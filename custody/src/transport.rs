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

use bytes::Bytes;
use custody_core::{Context, Error, Result};
use http::{HeaderMap, Method, StatusCode, Uri};
use log::{debug, warn};
use serde::de::DeserializeOwned;

use crate::retry::RetryPolicy;

/// A completed HTTP round trip.
///
/// Any status is a completed round trip, callers decide what a 4xx means.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl From<http::Response<Bytes>> for Response {
    fn from(resp: http::Response<Bytes>) -> Self {
        let (parts, body) = resp.into_parts();
        Self {
            status: parts.status,
            headers: parts.headers,
            body,
        }
    }
}

impl Response {
    /// HTTP status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Raw response body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Consume the response and return its body.
    pub fn into_body(self) -> Bytes {
        self.body
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Decode the body as JSON. Unknown fields are ignored.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| {
            Error::serialization("failed to decode response body")
                .with_source(e)
                .with_context(format!("status: {}", self.status))
        })
    }
}

/// ResilientTransport sends requests with bounded retries.
///
/// GET, PUT and DELETE are retried on retryable failures and on 5xx
/// responses. Other methods are retried only when the request never left the
/// process, and their 5xx responses are returned as they are.
#[derive(Debug, Clone)]
pub struct ResilientTransport {
    ctx: Context,
    base_url: String,
    policy: RetryPolicy,
}

impl ResilientTransport {
    /// Create a transport sending to `base_url` through the context's `HttpSend`.
    pub fn new(ctx: Context, base_url: impl Into<String>, policy: RetryPolicy) -> Self {
        let base_url: String = base_url.into();
        Self {
            ctx,
            base_url: base_url.trim_end_matches('/').to_string(),
            policy,
        }
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Retry policy in use.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Execute a request with the deadline applied to all attempts together.
    ///
    /// The in-flight attempt is dropped when the deadline passes.
    pub async fn execute_with_deadline(
        &self,
        method: Method,
        path: &str,
        headers: HeaderMap,
        body: Bytes,
        deadline: Duration,
    ) -> Result<Response> {
        let fut = self.execute(method.clone(), path, headers, body);
        match tokio::time::timeout(deadline, fut).await {
            Ok(res) => res,
            Err(_) => Err(Error::transport(format!(
                "request deadline of {deadline:?} exceeded"
            ))
            .with_context(format!("method: {method}"))
            .with_context(format!("path: {path}"))),
        }
    }

    /// Execute a request.
    ///
    /// `path` is appended to the base URL as is and must carry the version
    /// prefix and query string.
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<Response> {
        let uri = self.build_uri(path).map_err(|err| {
            err.with_context(format!("method: {method}"))
                .with_context(format!("path: {path}"))
        })?;

        let mut backoff = self.policy.backoff();
        let mut attempt = 0;
        loop {
            attempt += 1;

            let mut req = http::Request::new(body.clone());
            *req.method_mut() = method.clone();
            *req.uri_mut() = uri.clone();
            *req.headers_mut() = headers.clone();

            let err = match self.ctx.http_send(req).await {
                Ok(resp) => {
                    let resp = Response::from(resp);
                    debug!(
                        "{method} {path} attempt {attempt} completed with status {}, {} bytes",
                        resp.status(),
                        resp.body().len()
                    );

                    if !resp.status().is_server_error() || !is_idempotent(&method) {
                        return Ok(resp);
                    }
                    Error::transport("server returned an error status")
                        .with_status(resp.status())
                        .set_retryable(true)
                }
                Err(err) => err,
            };

            if !should_retry(&method, &err) {
                return Err(err
                    .with_context(format!("method: {method}"))
                    .with_context(format!("path: {path}"))
                    .with_context(format!("attempts: {attempt}")));
            }

            match backoff.next() {
                Some(delay) => {
                    warn!("{method} {path} attempt {attempt} failed, retrying in {delay:?}: {err}");
                    tokio::time::sleep(delay).await;
                }
                None => return Err(exhausted(&method, path, attempt, err)),
            }
        }
    }

    fn build_uri(&self, path: &str) -> Result<Uri> {
        let url = format!("{}{}", self.base_url, path);
        let uri: Uri = url.parse().map_err(|e| {
            Error::transport("invalid request url")
                .with_source(e)
                .set_request_sent(false)
        })?;
        if uri.scheme().is_none() || uri.authority().is_none() {
            return Err(Error::transport("request url must be absolute")
                .with_context(format!("url: {url}"))
                .set_request_sent(false));
        }
        Ok(uri)
    }
}

fn is_idempotent(method: &Method) -> bool {
    matches!(
        *method,
        Method::GET | Method::PUT | Method::DELETE | Method::HEAD | Method::OPTIONS
    )
}

fn should_retry(method: &Method, err: &Error) -> bool {
    if !err.is_retryable() {
        return false;
    }
    // A write that may have reached the server is never sent twice.
    is_idempotent(method) || !err.is_request_sent()
}

fn exhausted(method: &Method, path: &str, attempts: usize, last: Error) -> Error {
    let status = last.status();
    let request_sent = last.is_request_sent();

    let mut err = Error::transport(format!("giving up after {attempts} attempts"))
        .set_request_sent(request_sent)
        .with_context(format!("method: {method}"))
        .with_context(format!("path: {path}"));
    if let Some(status) = status {
        err = err.with_status(status);
    }
    err.with_source(last)
}
