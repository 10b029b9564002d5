//! Transport seam between the mapping core and the network
//!
//! The core only ever needs one primitive: send an [`Operation`] (method, path
//! relative to the API root, optional JSON body) and get back the parsed JSON
//! response. [`HttpTransport`] implements it over reqwest; tests substitute an
//! in-memory store.

pub mod transport;

pub use transport::HttpTransport;

use crate::error::SeraphResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// HTTP verbs used by the store's REST interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single request against the store
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub method: Method,
    /// Path relative to the API root, e.g. `node/12`
    pub path: String,
    pub body: Option<Value>,
}

impl Operation {
    /// Infer the method from the body: `GET` without one, `POST` with one
    pub fn new(path: impl Into<String>, body: Option<Value>) -> Self {
        let method = if body.is_some() { Method::Post } else { Method::Get };
        Self::with_method(method, path, body)
    }

    pub fn with_method(method: Method, path: impl Into<String>, body: Option<Value>) -> Self {
        Operation {
            method,
            path: path.into().trim_start_matches('/').to_string(),
            body,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::with_method(Method::Get, path, None)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::with_method(Method::Post, path, Some(body))
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::with_method(Method::Put, path, Some(body))
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::with_method(Method::Delete, path, None)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} /{}", self.method, self.path)
    }
}

/// Request primitive consumed by the client.
///
/// Implementations report non-2xx answers as `SeraphError::Request` and return
/// `Value::Null` for empty bodies.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(&self, operation: &Operation) -> SeraphResult<Value>;
}
