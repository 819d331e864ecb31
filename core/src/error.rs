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

use http::StatusCode;
use std::fmt;
use thiserror::Error;

/// The error type for custody operations.
#[derive(Error, Debug)]
#[error("{kind}: {message}{}", render_context(.context))]
pub struct Error {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<anyhow::Error>,
    context: Vec<String>,
    retryable: bool,
    request_sent: bool,
    status: Option<StatusCode>,
}

/// The kind of error that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The private key could not be parsed or the token could not be signed.
    ///
    /// Signing is deterministic for fixed inputs, so these errors are never retried.
    Signing,

    /// No trustworthy response was obtained: the request could not be built,
    /// the retry budget was exhausted, or the deadline passed.
    Transport,

    /// A request or response body could not be encoded or decoded as JSON.
    Serialization,

    /// Configuration rejected at construction (missing fields, invalid values).
    ConfigInvalid,
}

impl Error {
    /// Create a new error with the given kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
            context: Vec::new(),
            retryable: false,
            // Unless a transport says otherwise, assume the bytes may have left the process.
            request_sent: true,
            status: None,
        }
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Attach a piece of diagnostic context, like `method: GET` or `path: /v1/x`.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Mark whether the failed operation may succeed if attempted again.
    pub fn set_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    /// Mark whether any request bytes may have reached the server.
    ///
    /// Transports set this to `false` only when the connection could not be
    /// established at all.
    pub fn set_request_sent(mut self, sent: bool) -> Self {
        self.request_sent = sent;
        self
    }

    /// Record the HTTP status observed before the failure.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Get the error message without context.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get all context attached to this error.
    pub fn context(&self) -> &[String] {
        &self.context
    }

    /// Whether a retry may succeed.
    pub fn is_retryable(&self) -> bool {
        self.retryable
    }

    /// Whether request bytes may have reached the server.
    pub fn is_request_sent(&self) -> bool {
        self.request_sent
    }

    /// The HTTP status observed before the failure, if any.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Check if this is a signing error
    pub fn is_signing_error(&self) -> bool {
        self.kind == ErrorKind::Signing
    }

    /// Check if this is a transport error
    pub fn is_transport_error(&self) -> bool {
        self.kind == ErrorKind::Transport
    }

    /// Check if this is a serialization error
    pub fn is_serialization_error(&self) -> bool {
        self.kind == ErrorKind::Serialization
    }
}

// Convenience constructors
impl Error {
    /// Create a signing error
    pub fn signing(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Signing, message)
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Serialization, message)
    }

    /// Create a config invalid error
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Signing => write!(f, "signing error"),
            ErrorKind::Transport => write!(f, "transport error"),
            ErrorKind::Serialization => write!(f, "serialization error"),
            ErrorKind::ConfigInvalid => write!(f, "invalid configuration"),
        }
    }
}

fn render_context(context: &[String]) -> String {
    if context.is_empty() {
        String::new()
    } else {
        format!(" ({})", context.join(", "))
    }
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::Error> for Error {
    fn from(err: http::Error) -> Self {
        Self::transport(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::transport(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::transport(err.to_string()).with_source(anyhow::Error::from(err))
    }
}
