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

//! Signed, retrying requests against a remote custody API.
//!
//! Every call is signed with a short lived RS256 token bound to its path and
//! body, then sent through a transport that retries transient failures
//! without ever sending a write twice once it may have reached the server.
//!
//! ## Quick Start
//!
//! ```no_run
//! use custody::query::QueryPairs;
//! use custody::{Client, Config, Context};
//!
//! # async fn example(ctx: Context) -> custody::Result<()> {
//! let config = Config::new()
//!     .with_api_key("my-api-key")
//!     .with_private_key_path("/path/to/api_secret.key")
//!     .with_base_url("https://api.example.com");
//! let client = Client::load(ctx, config).await?;
//!
//! let mut query = QueryPairs::new();
//! query.push("namePrefix", "treasury");
//! query.push("limit", 10u32);
//! let resp = client.get_with_query("/vault/accounts_paged", query).await?;
//!
//! let accounts: serde_json::Value = resp.json()?;
//! println!("{accounts}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! [`Config::from_env`] reads:
//!
//! ```bash
//! export CUSTODY_API_KEY=my-api-key
//! export CUSTODY_PRIVATE_KEY_PATH=/path/to/api_secret.key
//! export CUSTODY_BASE_URL=https://api.example.com
//! export CUSTODY_TOKEN_EXPIRY_SECONDS=10  # Optional
//! export CUSTODY_TIMEOUT_SECONDS=30       # Optional
//! export CUSTODY_MAX_ATTEMPTS=4           # Optional
//! ```
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub use custody_core::*;

/// Request token signing.
pub mod jwt {
    pub use custody_jwt::*;
}

#[cfg(feature = "default-context")]
mod context;
#[cfg(feature = "default-context")]
pub use context::default_context;

mod constants;

mod config;
pub use config::Config;

mod retry;
pub use retry::RetryPolicy;

mod request;
pub use request::ApiRequest;

mod transport;
pub use transport::{ResilientTransport, Response};

mod client;
pub use client::Client;
