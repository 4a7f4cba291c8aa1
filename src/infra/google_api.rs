// =============================================================================
// GOOGLE API RESPONSE HANDLING
// =============================================================================
//
// Gemini, Identity Toolkit and Sheets all share the same key-in-query
// authentication and the same error envelope:
//
// ```json
// { "error": { "code": 403, "message": "...", "status": "PERMISSION_DENIED" } }
// ```
//
// This module turns a raw reqwest response into either the decoded success
// payload or an `ApiFailure` that keeps the status, the parsed `error` value
// and the raw body so checks can match on expected failure shapes.

use std::time::Duration;

use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::core::harness::CheckError;

/// Outcome of a Google API call that reached the server.
#[derive(Debug, Clone)]
pub enum ApiReply<T> {
    Success(T),
    Failure(ApiFailure),
}

/// A non-2xx response.
#[derive(Debug, Clone)]
pub struct ApiFailure {
    pub status: u16,
    /// The `error` field of the body, when the body was JSON.
    pub error: Option<serde_json::Value>,
    pub body: String,
}

impl ApiFailure {
    /// `error.message`, if present.
    pub fn message(&self) -> Option<&str> {
        self.error
            .as_ref()
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
    }

    pub fn message_or_unknown(&self) -> &str {
        self.message().unwrap_or("Unknown error")
    }

    /// True when the serialized `error` field contains `needle`.
    pub fn error_mentions(&self, needle: &str) -> bool {
        self.error
            .as_ref()
            .map(|e| e.to_string().contains(needle))
            .unwrap_or(false)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: serde_json::Value,
}

/// Builds the HTTP client used for one endpoint.
pub fn build_client(timeout: Duration) -> Result<Client, CheckError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("ekatra-smoke/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| CheckError::Transport(e.to_string()))
}

/// Joins `segments` onto `base`, percent-encoding each one as a single path
/// segment (so `Class Data!A:H` stays one segment).
pub fn endpoint(base: &str, segments: &[&str]) -> Result<Url, CheckError> {
    let mut url =
        Url::parse(base).map_err(|e| CheckError::InvalidEndpoint(format!("{}: {}", base, e)))?;
    url.path_segments_mut()
        .map_err(|_| CheckError::InvalidEndpoint(format!("{} cannot be a base URL", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

pub fn require_key<'a>(key: Option<&'a str>, name: &str) -> Result<&'a str, CheckError> {
    key.ok_or_else(|| CheckError::MissingCredential(name.to_string()))
}

/// Reads the body and decodes it according to the status code.
pub async fn read_reply<T: DeserializeOwned>(
    response: Response,
) -> Result<ApiReply<T>, CheckError> {
    let status = response.status();
    let body = response.text().await?;

    if status.is_success() {
        let payload = serde_json::from_str::<T>(&body)?;
        return Ok(ApiReply::Success(payload));
    }

    let error = serde_json::from_str::<ErrorEnvelope>(&body)
        .ok()
        .map(|envelope| envelope.error);

    Ok(ApiReply::Failure(ApiFailure {
        status: status.as_u16(),
        error,
        body,
    }))
}
