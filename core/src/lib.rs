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

//! Core components for the custody API client.
//!
//! This crate provides the foundational types and traits shared by the
//! signer, the transports and the client facade.
//!
//! ## Overview
//!
//! - **Context**: A container that holds implementations for HTTP sending,
//!   file reading, environment access and the current time
//! - **Error**: One error type whose [`ErrorKind`] separates signing,
//!   transport and serialization failures
//! - **Query**: Ordered, reflection-free query parameter building via [`query::ToQuery`]
//!
//! ## Example
//!
//! ```no_run
//! use bytes::Bytes;
//! use custody_core::{Context, HttpSend, Result};
//!
//! #[derive(Debug)]
//! struct AlwaysOk;
//!
//! #[async_trait::async_trait]
//! impl HttpSend for AlwaysOk {
//!     async fn http_send(&self, _: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
//!         Ok(http::Response::new(Bytes::from_static(b"[]")))
//!     }
//! }
//!
//! # async fn example() -> Result<()> {
//! let ctx = Context::new().with_http_send(AlwaysOk);
//! let req = http::Request::builder()
//!     .uri("https://api.example.com/v1/supported_assets")
//!     .body(Bytes::new())?;
//! let resp = ctx.http_send(req).await?;
//! assert_eq!(resp.status(), http::StatusCode::OK);
//! # Ok(())
//! # }
//! ```
//!
//! ## Utilities
//!
//! - [`hash`]: SHA256 body hashing and base64 helpers
//! - [`time`]: The [`TimeSource`] abstraction
//! - [`query`]: Ordered query pairs
//! - [`utils`]: Redaction of secrets in `Debug` output

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod query;
pub mod time;
pub mod utils;

mod context;
pub use context::{
    Context, Env, FileRead, HttpSend, NoopEnv, NoopFileRead, NoopHttpSend, OsEnv, StaticEnv,
};
mod error;
pub use error::{Error, ErrorKind, Result};
pub use time::{StaticTimeSource, SystemTimeSource, TimeSource};
