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

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use custody_core::query::ToQuery;
use custody_core::{Context, Error, Result};
use custody_jwt::{PrivateKey, RequestSigner};
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use log::debug;
use serde::Serialize;

use crate::config::Config;
use crate::constants::*;
use crate::request::ApiRequest;
use crate::transport::{ResilientTransport, Response};

/// Client signs every call and sends it through a [`ResilientTransport`].
///
/// Cloning is cheap, clones share the signer and the connection pool.
#[derive(Debug, Clone)]
pub struct Client {
    signer: Arc<RequestSigner>,
    transport: ResilientTransport,
    timeout: Option<Duration>,
    sign_query_as_body: bool,
}

impl Client {
    /// Build a client from a config carrying the PEM private key inline.
    ///
    /// Returns a `ConfigInvalid` error for incomplete config and a `Signing`
    /// error when the key cannot be parsed.
    pub fn new(ctx: Context, config: Config) -> Result<Self> {
        config.validate()?;

        let pem = config
            .private_key
            .as_deref()
            .ok_or_else(|| Error::config_invalid("private key is required"))?;
        let key = PrivateKey::from_pem(pem)?;

        Self::with_key(ctx, config, key)
    }

    /// Build a client, reading the private key from `private_key_path` when
    /// no inline key is configured.
    pub async fn load(ctx: Context, mut config: Config) -> Result<Self> {
        if config.private_key.is_none() {
            if let Some(path) = &config.private_key_path {
                debug!("loading private key from {path}");
                config.private_key = Some(ctx.file_read(path).await?);
            }
        }

        Self::new(ctx, config)
    }

    /// Build a client with an already parsed key, ignoring any key in `config`.
    pub fn with_key(ctx: Context, config: Config, key: PrivateKey) -> Result<Self> {
        config.validate()?;

        let api_key = config.api_key.clone().unwrap_or_default();
        let base_url = config.base_url.clone().unwrap_or_default();

        let signer = RequestSigner::new(api_key, key)
            .with_token_expiry(config.token_expiry_seconds)
            .with_time_source(ctx.time_source());

        Ok(Self {
            signer: Arc::new(signer),
            transport: ResilientTransport::new(ctx, base_url, config.retry),
            timeout: config.timeout,
            sign_query_as_body: config.sign_query_as_body,
        })
    }

    /// The API key of this client.
    pub fn api_key(&self) -> &str {
        self.signer.api_key()
    }

    /// GET `path`.
    pub async fn get(&self, path: &str) -> Result<Response> {
        self.send(ApiRequest::get(path)).await
    }

    /// GET `path` with query parameters.
    pub async fn get_with_query(&self, path: &str, query: impl ToQuery) -> Result<Response> {
        self.send(ApiRequest::get(path).with_query(query)).await
    }

    /// POST `body` serialized as JSON.
    pub async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<Response> {
        self.send(ApiRequest::post(path).with_json_body(body)?).await
    }

    /// PUT `body` serialized as JSON.
    pub async fn put<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<Response> {
        self.send(ApiRequest::put(path).with_json_body(body)?).await
    }

    /// DELETE `path` without a body.
    pub async fn delete(&self, path: &str) -> Result<Response> {
        self.send(ApiRequest::delete(path)).await
    }

    /// DELETE `path` with `body` serialized as JSON.
    pub async fn delete_with_body<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<Response> {
        self.send(ApiRequest::delete(path).with_json_body(body)?).await
    }

    /// Sign and send a request.
    pub async fn send(&self, req: ApiRequest) -> Result<Response> {
        let path = format!("{API_VERSION_PREFIX}{}", req.path());
        let query = req.query().encode();
        let full_path = if query.is_empty() {
            path.clone()
        } else {
            format!("{path}?{query}")
        };
        let body = req.body().cloned().unwrap_or_default();

        let token = self
            .sign(req.method(), &path, &full_path, &query, &body)
            .map_err(|err| {
                err.with_context(format!("method: {}", req.method()))
                    .with_context(format!("path: {full_path}"))
            })?;
        let headers = self.build_headers(&token, req.idempotency_key())?;

        let method = req.method().clone();
        match req.timeout().or(self.timeout) {
            Some(deadline) => {
                self.transport
                    .execute_with_deadline(method, &full_path, headers, body, deadline)
                    .await
            }
            None => {
                self.transport
                    .execute(method, &full_path, headers, body)
                    .await
            }
        }
    }

    fn sign(
        &self,
        method: &Method,
        path: &str,
        full_path: &str,
        query: &str,
        body: &Bytes,
    ) -> Result<String> {
        if self.sign_query_as_body && method == Method::GET && !query.is_empty() {
            return self.signer.sign(path, query.as_bytes());
        }
        self.signer.sign(full_path, body)
    }

    fn build_headers(&self, token: &str, idempotency_key: Option<&str>) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(X_API_KEY),
            HeaderValue::from_str(self.signer.api_key())?,
        );

        let mut authorization = HeaderValue::from_str(&format!("Bearer {token}"))?;
        authorization.set_sensitive(true);
        headers.insert(AUTHORIZATION, authorization);

        headers.insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON));

        if let Some(key) = idempotency_key {
            headers.insert(
                HeaderName::from_static(IDEMPOTENCY_KEY),
                HeaderValue::from_str(key).map_err(|e| {
                    Error::config_invalid("idempotency key is not a valid header value")
                        .with_source(e)
                })?,
            );
        }

        Ok(headers)
    }
}
