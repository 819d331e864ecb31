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
use custody_core::query::{QueryPairs, ToQuery};
use custody_core::{Error, Result};
use http::Method;
use serde::Serialize;

/// ApiRequest describes one call before it is signed.
///
/// The path is relative to the API version, `/vault/accounts` is sent as
/// `/v1/vault/accounts`. A missing leading `/` is added.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: QueryPairs,
    body: Option<Bytes>,
    idempotency_key: Option<String>,
    timeout: Option<Duration>,
}

impl ApiRequest {
    fn new(method: Method, path: impl Into<String>) -> Self {
        let mut path = path.into();
        if !path.starts_with('/') {
            path.insert(0, '/');
        }

        Self {
            method,
            path,
            query: QueryPairs::new(),
            body: None,
            idempotency_key: None,
            timeout: None,
        }
    }

    /// A GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// A POST request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// A PUT request.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// A DELETE request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Replace the query parameters.
    pub fn with_query(mut self, query: impl ToQuery) -> Self {
        self.query = query.query_pairs();
        self
    }

    /// Serialize `body` as JSON and use it as the request body.
    ///
    /// The serialized bytes are exactly what gets hashed and sent.
    pub fn with_json_body<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        let bytes = serde_json::to_vec(body).map_err(|e| {
            Error::serialization("failed to serialize request body")
                .with_source(e)
                .with_context(format!("method: {}", self.method))
                .with_context(format!("path: {}", self.path))
        })?;
        self.body = Some(Bytes::from(bytes));
        Ok(self)
    }

    /// Use already encoded bytes as the request body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Attach an idempotency key so the server can drop duplicated writes.
    pub fn with_idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }

    /// Set the overall deadline of this call, retries included.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Path without the version prefix.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query parameters in the order they will be encoded.
    pub fn query(&self) -> &QueryPairs {
        &self.query
    }

    /// Request body, if any.
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Idempotency key, if any.
    pub fn idempotency_key(&self) -> Option<&str> {
        self.idempotency_key.as_deref()
    }

    /// Per call deadline, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}
