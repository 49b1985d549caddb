//! The `Sender` trait and its reqwest implementation.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::telemetry;
use crate::{Result, VrfError};

use super::ControllerResponse;

/// HTTP verbs the controller API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Verb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One authenticated request/response round trip against the controller.
///
/// Implementations return `Ok` whenever the controller answered at all —
/// the envelope's return code carries its verdict — and `Err` only for
/// request-level failures (connect, timeout, unreadable body).
#[async_trait]
pub trait Sender: Send + Sync {
    async fn send(
        &self,
        verb: Verb,
        path: &str,
        payload: Option<&Value>,
    ) -> Result<ControllerResponse>;
}

/// reqwest-backed sender rooted at a base URL.
///
/// Bodies that already carry the controller envelope are passed through;
/// bare bodies (some GET endpoints answer with raw resource data) are
/// wrapped into an envelope synthesized from the HTTP status.
pub struct HttpSender {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSender {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Use a preconfigured client (timeouts, auth headers, proxies).
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { client, base_url }
    }
}

#[async_trait]
impl Sender for HttpSender {
    async fn send(
        &self,
        verb: Verb,
        path: &str,
        payload: Option<&Value>,
    ) -> Result<ControllerResponse> {
        let url = format!("{}{}", self.base_url, path);
        debug!(verb = %verb, %url, "sending controller request");

        let mut request = match verb {
            Verb::Get => self.client.get(&url),
            Verb::Post => self.client.post(&url),
            Verb::Put => self.client.put(&url),
            Verb::Delete => self.client.delete(&url),
        };
        if let Some(body) = payload {
            request = request.json(body);
        }

        let response = request.send().await.inspect_err(|_| {
            metrics::counter!(telemetry::REQUESTS_TOTAL,
                "method" => verb.as_str(), "status" => "error")
            .increment(1);
        })?;

        let status = response.status();
        let text = response.text().await?;

        let envelope = match serde_json::from_str::<Value>(&text) {
            Ok(body) if ControllerResponse::has_envelope(&body) => {
                serde_json::from_value::<ControllerResponse>(body)
                    .map_err(|e| VrfError::MalformedResponse(e.to_string()))?
            }
            Ok(body) => ControllerResponse {
                data: body,
                message: status
                    .canonical_reason()
                    .unwrap_or("UNKNOWN")
                    .to_string(),
                method: verb.as_str().to_string(),
                request_path: path.to_string(),
                return_code: status.as_u16(),
            },
            Err(_) if status.is_success() => {
                metrics::counter!(telemetry::REQUESTS_TOTAL,
                    "method" => verb.as_str(), "status" => "error")
                .increment(1);
                return Err(VrfError::MalformedResponse(format!(
                    "non-JSON body from {path}"
                )));
            }
            // Error pages are often not JSON; keep the code, carry the
            // body as the message.
            Err(_) => ControllerResponse {
                data: Value::Null,
                message: text.trim().to_string(),
                method: verb.as_str().to_string(),
                request_path: path.to_string(),
                return_code: status.as_u16(),
            },
        };

        let outcome = if envelope.is_success() { "ok" } else { "error" };
        metrics::counter!(telemetry::REQUESTS_TOTAL,
            "method" => verb.as_str(), "status" => outcome)
        .increment(1);

        Ok(envelope)
    }
}
