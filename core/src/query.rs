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

//! Ordered query parameters.
//!
//! Filter types implement [`ToQuery`] by pushing their fields in declaration
//! order. The order survives encoding, so two builds of the same value always
//! produce the same query string.
//!
//! ```
//! use custody_core::query::{QueryPairs, ToQuery};
//!
//! struct AccountsFilter {
//!     name_prefix: Option<String>,
//!     limit: Option<u32>,
//! }
//!
//! impl ToQuery for AccountsFilter {
//!     fn query_pairs(&self) -> QueryPairs {
//!         let mut pairs = QueryPairs::new();
//!         pairs.push("namePrefix,omitempty", self.name_prefix.as_deref());
//!         pairs.push("limit,omitempty", self.limit);
//!         pairs
//!     }
//! }
//!
//! let filter = AccountsFilter { name_prefix: Some("vault 1".into()), limit: None };
//! assert_eq!(filter.query_pairs().encode(), "namePrefix=vault+1");
//! ```

use std::fmt;

/// ToQuery exposes a value as an ordered list of query pairs.
pub trait ToQuery {
    /// Build the pairs in the order they must appear on the wire.
    fn query_pairs(&self) -> QueryPairs;
}

impl ToQuery for () {
    fn query_pairs(&self) -> QueryPairs {
        QueryPairs::new()
    }
}

impl ToQuery for QueryPairs {
    fn query_pairs(&self) -> QueryPairs {
        self.clone()
    }
}

impl<T: ToQuery + ?Sized> ToQuery for &T {
    fn query_pairs(&self) -> QueryPairs {
        (**self).query_pairs()
    }
}

impl<T: ToQuery> ToQuery for Option<T> {
    fn query_pairs(&self) -> QueryPairs {
        match self {
            Some(v) => v.query_pairs(),
            None => QueryPairs::new(),
        }
    }
}

/// QueryValue renders a primitive field value.
///
/// `None` renders to nothing and the pair is skipped.
pub trait QueryValue {
    /// Render the value, or `None` to omit the pair.
    fn to_query_value(&self) -> Option<String>;
}

macro_rules! impl_query_value_display {
    ($($t:ty),* $(,)?) => {
        $(
            impl QueryValue for $t {
                fn to_query_value(&self) -> Option<String> {
                    Some(self.to_string())
                }
            }
        )*
    };
}

impl_query_value_display!(
    String, str, bool, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);

impl<T: QueryValue + ?Sized> QueryValue for &T {
    fn to_query_value(&self) -> Option<String> {
        (**self).to_query_value()
    }
}

impl<T: QueryValue> QueryValue for Option<T> {
    fn to_query_value(&self) -> Option<String> {
        self.as_ref().and_then(|v| v.to_query_value())
    }
}

/// QueryPairs is an ordered list of query key/value pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryPairs {
    pairs: Vec<(String, String)>,
}

impl QueryPairs {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pair.
    ///
    /// The key is normalized first: anything from the first `,` on is a
    /// format modifier and gets dropped, so `"limit,omitempty"` becomes
    /// `"limit"`. Absent values are skipped.
    pub fn push(&mut self, key: &str, value: impl QueryValue) {
        let Some(value) = value.to_query_value() else {
            return;
        };

        self.pairs.push((normalize_key(key).to_string(), value));
    }

    /// Get the first value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether there are no pairs.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Encode as `application/x-www-form-urlencoded`, keeping pair order.
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (k, v) in &self.pairs {
            serializer.append_pair(k, v);
        }
        serializer.finish()
    }
}

impl fmt::Display for QueryPairs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl<K: AsRef<str>, V: QueryValue> FromIterator<(K, V)> for QueryPairs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut pairs = QueryPairs::new();
        for (k, v) in iter {
            pairs.push(k.as_ref(), v);
        }
        pairs
    }
}

fn normalize_key(key: &str) -> &str {
    key.split(',').next().unwrap_or_default()
}
