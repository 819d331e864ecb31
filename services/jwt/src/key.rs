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

use anyhow::anyhow;
use custody_core::{Error, Result};
use jsonwebtoken::EncodingKey;
use rsa::pkcs1::{DecodeRsaPrivateKey, EncodeRsaPrivateKey};
use rsa::pkcs8::DecodePrivateKey;
use rsa::traits::PublicKeyParts;
use rsa::RsaPrivateKey;
use std::fmt::{self, Debug};

/// PrivateKey is the RSA key used to sign request tokens.
#[derive(Clone)]
pub struct PrivateKey {
    encoding_key: EncodingKey,
    bits: usize,
}

impl Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("bits", &self.bits)
            .field("key", &"<redacted>")
            .finish()
    }
}

impl PrivateKey {
    /// Parse a PEM encoded RSA private key.
    ///
    /// Both `BEGIN PRIVATE KEY` (PKCS#8) and `BEGIN RSA PRIVATE KEY` (PKCS#1)
    /// are accepted. Anything else, including non-RSA PKCS#8 keys, is a
    /// signing error.
    pub fn from_pem(pem: &[u8]) -> Result<Self> {
        let pem = std::str::from_utf8(pem)
            .map_err(|e| Error::signing("private key is not valid PEM").with_source(e))?;
        let pem = pem.trim();

        let key = match RsaPrivateKey::from_pkcs8_pem(pem) {
            Ok(key) => key,
            Err(pkcs8_err) => RsaPrivateKey::from_pkcs1_pem(pem).map_err(|pkcs1_err| {
                Error::signing("failed to parse RSA private key").with_source(anyhow!(
                    "not a PKCS#8 RSA key ({pkcs8_err}) nor a PKCS#1 RSA key ({pkcs1_err})"
                ))
            })?,
        };

        Self::from_rsa(&key)
    }

    /// Use an already parsed RSA private key.
    pub fn from_rsa(key: &RsaPrivateKey) -> Result<Self> {
        let der = key.to_pkcs1_der().map_err(|e| {
            Error::signing("failed to encode RSA private key").with_source(anyhow!("{e}"))
        })?;

        Ok(Self {
            encoding_key: EncodingKey::from_rsa_der(der.as_bytes()),
            bits: key.size() * 8,
        })
    }

    /// Modulus size in bits.
    pub fn bits(&self) -> usize {
        self.bits
    }

    pub(crate) fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }
}
