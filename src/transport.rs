//! Transport
//!
//! Request/response seam to the remote marketplace API. The crate never
//! speaks a wire protocol itself; the embedding application supplies a
//! [`Transport`] that knows how to deliver an [`ApiRequest`].

use std::fmt;

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors returned by a [`Transport`].
#[derive(Debug, Error)]
pub enum TransportError {
    /// The API answered with a non-success code.
    #[error("request rejected with code {code}: {msg}")]
    Rejected {
        /// Response code from the envelope
        code: i32,
        /// Response message from the envelope
        msg: String,
    },

    /// The API could not be reached.
    #[error("transport unavailable: {0}")]
    Unavailable(String),

    /// The response body could not be decoded.
    #[error(transparent)]
    Decode(#[from] serde_json::Error),
}

/// HTTP-style request method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// Read
    Get,
    /// Create
    Post,
    /// Update
    Put,
    /// Delete
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let method = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        };

        f.write_str(method)
    }
}

/// Outgoing API request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiRequest {
    /// Request method
    pub method: Method,

    /// Path relative to the API root, e.g. `/api/cart`
    pub path: String,

    /// JSON body, if any
    pub payload: Option<Value>,
}

impl ApiRequest {
    /// Create a request without a body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            payload: None,
        }
    }

    /// Attach a JSON body.
    #[must_use]
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }
}

/// Response envelope used by the marketplace API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    /// Status code, [`ApiResponse::SUCCESS_CODE`] on success
    pub code: i32,

    /// Human readable message
    #[serde(default)]
    pub msg: String,

    /// Payload
    #[serde(default)]
    pub data: Value,
}

impl ApiResponse {
    /// Code the API uses for successful responses.
    pub const SUCCESS_CODE: i32 = 200;

    /// Successful response carrying `data`.
    pub fn success(data: Value) -> Self {
        Self {
            code: Self::SUCCESS_CODE,
            msg: "success".to_string(),
            data,
        }
    }

    /// Failed response with the given code and message.
    pub fn failure(code: i32, msg: impl Into<String>) -> Self {
        Self {
            code,
            msg: msg.into(),
            data: Value::Null,
        }
    }

    /// Whether the API reported success.
    pub fn is_success(&self) -> bool {
        self.code == Self::SUCCESS_CODE
    }

    /// Unwrap the payload of a successful response.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Rejected`] if the code is not a success code.
    pub fn into_data(self) -> Result<Value, TransportError> {
        if self.is_success() {
            Ok(self.data)
        } else {
            Err(TransportError::Rejected {
                code: self.code,
                msg: self.msg,
            })
        }
    }
}

/// Delivers requests to the remote API.
#[automock]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and wait for the response envelope.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}
