//! services/api/src/adapters/http.rs
//!
//! The outbound HTTP plumbing shared by both generation adapters: one JSON
//! POST per call, bearer authentication, a per-request timeout and a single
//! place where provider status codes and error payloads become typed errors.

use std::time::Duration;

use itinerary_core::ports::{ProviderError, ProviderErrorKind, ProviderResult};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

#[derive(Clone)]
pub struct ProviderHttp {
    client: Client,
    api_key: String,
    timeout: Duration,
}

impl ProviderHttp {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        // Redirects would turn one request into several calls.
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            timeout,
        })
    }

    /// Sends `body` to `url` and returns the provider's JSON reply.
    ///
    /// Error statuses and error payloads never come back as `Ok`.
    pub async fn post_json<B>(&self, url: &str, body: &B) -> ProviderResult<Value>
    where
        B: Serialize + ?Sized,
    {
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(transport_error)?;
        debug!(%status, len = bytes.len(), "Provider replied");

        interpret_reply(status, &bytes)
    }
}

fn transport_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::new(
            ProviderErrorKind::Timeout,
            "The provider did not answer in time.",
        )
    } else {
        ProviderError::new(ProviderErrorKind::Network, e.to_string())
    }
}

/// Turns a raw provider reply into either its JSON body or a typed error.
pub(crate) fn interpret_reply(status: StatusCode, bytes: &[u8]) -> ProviderResult<Value> {
    let body = serde_json::from_slice::<Value>(bytes).ok();
    let raw = || {
        body.clone()
            .unwrap_or_else(|| Value::String(String::from_utf8_lossy(bytes).into_owned()))
    };
    let message = body.as_ref().and_then(error_message);

    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(ProviderError::new(
            ProviderErrorKind::RateLimited,
            message.unwrap_or_else(|| "rate limited".to_string()),
        )
        .with_raw(raw()));
    }
    if let Some(message) = message {
        return Err(ProviderError::upstream(message, raw()));
    }
    if !status.is_success() {
        return Err(ProviderError::upstream(
            format!("provider returned status {}", status.as_u16()),
            raw(),
        ));
    }

    match body {
        Some(body) => Ok(body),
        None => Err(ProviderError::new(
            ProviderErrorKind::InvalidResponse,
            "The provider returned a body that is not JSON.",
        )
        .with_raw(Value::String(String::from_utf8_lossy(bytes).into_owned()))),
    }
}

/// Extracts the message of an `{"error": ...}` payload.
///
/// Providers send either a bare string or an object with a `message` field.
pub(crate) fn error_message(body: &Value) -> Option<String> {
    match body.get("error")? {
        Value::Null => None,
        Value::String(message) => Some(message.clone()),
        Value::Object(details) => Some(
            details
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| Value::Object(details.clone()).to_string()),
        ),
        other => Some(other.to_string()),
    }
}
