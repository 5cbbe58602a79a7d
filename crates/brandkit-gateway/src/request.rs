//! Transport-neutral request and response types.
//!
//! Everything the gateway sends is a [`RemoteRequest`] and everything it gets
//! back is a [`RemoteResponse`]. A response with a non-2xx status is still a
//! response: the transport only fails for delivery problems, which keeps HTTP
//! rejections out of the retry loop.

use brandkit_core::ClientError;
use bytes::Bytes;
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// An outbound call.
#[derive(Debug, Clone)]
pub struct RemoteRequest {
    pub method: Method,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<Bytes>,
}

impl RemoteRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: Vec::new(),
            body: None,
        }
    }

    /// Appends a header, replacing an existing one with the same name.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
        self
    }

    /// Appends a query parameter.
    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.url.query_pairs_mut().append_pair(key, value);
        self
    }

    /// Sets a JSON body and the matching content type.
    pub fn json<T: Serialize + ?Sized>(self, body: &T) -> Result<Self, ClientError> {
        let bytes = serde_json::to_vec(body)
            .map_err(|e| ClientError::Unknown(format!("failed to encode request body: {e}")))?;
        Ok(self.body(Bytes::from(bytes), "application/json"))
    }

    /// Sets a raw body with its content type.
    pub fn body(mut self, body: Bytes, content_type: &str) -> Self {
        self.body = Some(body);
        self.header("Content-Type", content_type)
    }

    /// Case-insensitive header lookup.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Value of a query parameter.
    pub fn query_value(&self, key: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }
}

/// The answer to a [`RemoteRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteResponse {
    pub status: u16,
    pub body: Bytes,
}

impl RemoteResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// A response carrying `value` serialized as JSON.
    pub fn json<T: Serialize + ?Sized>(status: u16, value: &T) -> Self {
        Self::new(status, serde_json::to_vec(value).unwrap_or_default())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decodes the body.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        serde_json::from_slice(&self.body)
            .map_err(|e| ClientError::Unknown(format!("failed to decode response: {e}")))
    }

    /// Passes a 2xx response through and turns anything else into
    /// [`ClientError::RemoteRejected`].
    pub fn error_for_status(self) -> Result<Self, ClientError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(self.to_error())
        }
    }

    /// Builds the error described by this response's body.
    ///
    /// Understands the PostgREST shape (`code`, `message`, `details`, `hint`)
    /// and the auth service shapes (`msg`, `error`, `error_description`,
    /// `error_code`). Falls back to the raw body, then to the status line.
    pub fn to_error(&self) -> ClientError {
        let parsed: ErrorBody = serde_json::from_slice(&self.body).unwrap_or_default();

        let message = parsed
            .message
            .or(parsed.msg)
            .or(parsed.error_description)
            .or_else(|| parsed.error.as_ref().and_then(as_text))
            .or_else(|| {
                let raw = String::from_utf8_lossy(&self.body).trim().to_string();
                (!raw.is_empty()).then_some(raw)
            })
            .unwrap_or_else(|| format!("HTTP {}", self.status));

        ClientError::RemoteRejected {
            status: self.status,
            code: parsed.error_code.or_else(|| parsed.code.as_ref().and_then(as_text)),
            message,
            details: parsed
                .details
                .as_ref()
                .and_then(as_text)
                .or(parsed.hint),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
    error: Option<serde_json::Value>,
    error_code: Option<String>,
    code: Option<serde_json::Value>,
    details: Option<serde_json::Value>,
    hint: Option<String>,
}

fn as_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
