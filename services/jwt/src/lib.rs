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

//! Per-request JWT signing for the custody API.
//!
//! Every request carries a short lived RS256 token whose claims bind the
//! request path and the SHA256 of the request body:
//!
//! ```json
//! {"uri": "/v1/vault/accounts", "nonce": 1700000000, "iat": 1700000000,
//!  "now": 1700000000, "exp": 1700000010, "sub": "<api key>",
//!  "bodyHash": "e3b0c442..."}
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use custody_jwt::{PrivateKey, RequestSigner};
//!
//! # fn example() -> custody_core::Result<()> {
//! let pem = std::fs::read("api_secret.key")?;
//! let signer = RequestSigner::new("my-api-key", PrivateKey::from_pem(&pem)?);
//!
//! let token = signer.sign("/v1/vault/accounts", b"")?;
//! println!("Authorization: Bearer {token}");
//! # Ok(())
//! # }
//! ```

mod constants;
pub use constants::DEFAULT_TOKEN_EXPIRY_SECONDS;

mod claims;
pub use claims::{ClaimBuilder, Claims};

mod key;
pub use key::PrivateKey;

mod sign_request;
pub use sign_request::RequestSigner;
