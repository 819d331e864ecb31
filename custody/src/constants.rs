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

// Headers
pub const X_API_KEY: &str = "x-api-key";
pub const IDEMPOTENCY_KEY: &str = "idempotency-key";
pub const CONTENT_TYPE_JSON: &str = "application/json; charset=UTF-8";

/// Prefix added to every request path before signing and sending.
pub const API_VERSION_PREFIX: &str = "/v1";

// Env values used in custody.
pub const CUSTODY_API_KEY: &str = "CUSTODY_API_KEY";
pub const CUSTODY_PRIVATE_KEY: &str = "CUSTODY_PRIVATE_KEY";
pub const CUSTODY_PRIVATE_KEY_PATH: &str = "CUSTODY_PRIVATE_KEY_PATH";
pub const CUSTODY_BASE_URL: &str = "CUSTODY_BASE_URL";
pub const CUSTODY_TOKEN_EXPIRY_SECONDS: &str = "CUSTODY_TOKEN_EXPIRY_SECONDS";
pub const CUSTODY_TIMEOUT_SECONDS: &str = "CUSTODY_TIMEOUT_SECONDS";
pub const CUSTODY_MAX_ATTEMPTS: &str = "CUSTODY_MAX_ATTEMPTS";
