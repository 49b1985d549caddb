//! Retry configuration and sender decorator.
//!
//! [`RetryingSender`] wraps any [`Sender`] with exponential-backoff
//! retry. Two things stop a retry loop early: a success envelope, and a
//! controller verdict carrying a non-retryable code (400, 404, 409) —
//! the controller has answered authoritatively and asking again is
//! pointless. Transport errors and every other failure code are retried
//! up to `max_attempts`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use crate::error::NON_RETRYABLE_CODES;
use crate::telemetry;
use crate::{Result, VrfError};

use super::{ControllerResponse, Sender, Verb};

/// Configuration for retry behaviour on transient failures.
///
/// Uses exponential backoff capped at `max_delay`:
///
/// ```rust
/// # use ndfc_vrf::transport::RetryConfig;
/// # use std::time::Duration;
/// let config = RetryConfig::new()
///     .max_attempts(5)
///     .initial_delay(Duration::from_millis(200));
/// ```
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial request).
    /// 1 = no retry. Default: 3.
    pub max_attempts: u32,
    /// Base delay before the first retry. Default: 500ms.
    pub initial_delay: Duration,
    /// Maximum delay between retries (caps exponential growth). Default: 30s.
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryConfig {
    /// Create a new config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config that disables retries (single attempt).
    pub fn disabled() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Set maximum attempts (including the initial request).
    pub fn max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = n.max(1);
        self
    }

    /// Set the base delay before the first retry.
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set the maximum delay between retries.
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Delay for a given attempt number (0-indexed): `initial_delay *
    /// 2^attempt`, capped at `max_delay`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay = self
            .initial_delay
            .saturating_mul(2u32.saturating_pow(attempt));
        delay.min(self.max_delay)
    }
}

/// Decorator that wraps a [`Sender`] with retry logic.
pub struct RetryingSender {
    inner: Arc<dyn Sender>,
    config: RetryConfig,
}

impl RetryingSender {
    pub fn new(inner: Arc<dyn Sender>, config: RetryConfig) -> Self {
        Self { inner, config }
    }
}

#[async_trait]
impl Sender for RetryingSender {
    async fn send(
        &self,
        verb: Verb,
        path: &str,
        payload: Option<&Value>,
    ) -> Result<ControllerResponse> {
        let mut last: Option<Result<ControllerResponse>> = None;
        for attempt in 0..self.config.max_attempts {
            match self.inner.send(verb, path, payload).await {
                Ok(resp) if resp.is_success() => return Ok(resp),
                Ok(resp) if NON_RETRYABLE_CODES.contains(&resp.return_code) => {
                    // Authoritative answer; retrying is defined as pointless.
                    return Ok(resp);
                }
                Ok(resp) => {
                    self.note_retry(verb, path, attempt, &resp.message).await;
                    last = Some(Ok(resp));
                }
                Err(e) if e.is_retryable() => {
                    self.note_retry(verb, path, attempt, &e.to_string()).await;
                    last = Some(Err(e));
                }
                Err(e) => return Err(e),
            }
        }
        last.unwrap_or_else(|| {
            Err(VrfError::Configuration(
                "retry loop made no attempts".into(),
            ))
        })
    }
}

impl RetryingSender {
    async fn note_retry(&self, verb: Verb, path: &str, attempt: u32, cause: &str) {
        metrics::counter!(telemetry::RETRIES_TOTAL, "method" => verb.as_str()).increment(1);
        if attempt + 1 < self.config.max_attempts {
            let delay = self.config.delay_for_attempt(attempt);
            warn!(
                verb = %verb,
                path,
                attempt = attempt + 1,
                max_attempts = self.config.max_attempts,
                delay_ms = delay.as_millis() as u64,
                cause,
                "retrying after transient failure"
            );
            tokio::time::sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Scripted sender: pops one canned outcome per call.
    struct ScriptedSender {
        script: Mutex<Vec<Result<ControllerResponse>>>,
        calls: Mutex<u32>,
    }

    impl ScriptedSender {
        fn new(mut outcomes: Vec<Result<ControllerResponse>>) -> Self {
            outcomes.reverse();
            Self {
                script: Mutex::new(outcomes),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl Sender for ScriptedSender {
        async fn send(
            &self,
            _verb: Verb,
            _path: &str,
            _payload: Option<&Value>,
        ) -> Result<ControllerResponse> {
            *self.calls.lock().unwrap() += 1;
            self.script
                .lock()
                .unwrap()
                .pop()
                .expect("script exhausted")
        }
    }

    fn response(code: u16) -> ControllerResponse {
        ControllerResponse {
            data: Value::Null,
            message: format!("code {code}"),
            method: "POST".into(),
            request_path: "/".into(),
            return_code: code,
        }
    }

    fn fast_config(attempts: u32) -> RetryConfig {
        RetryConfig::new()
            .max_attempts(attempts)
            .initial_delay(Duration::from_millis(1))
    }

    #[tokio::test]
    async fn success_returns_immediately() {
        let inner = Arc::new(ScriptedSender::new(vec![Ok(response(200))]));
        let sender = RetryingSender::new(inner.clone(), fast_config(3));
        let resp = sender.send(Verb::Get, "/x", None).await.unwrap();
        assert!(resp.is_success());
        assert_eq!(inner.calls(), 1);
    }

    #[tokio::test]
    async fn conflict_is_not_retried() {
        let inner = Arc::new(ScriptedSender::new(vec![Ok(response(409))]));
        let sender = RetryingSender::new(inner.clone(), fast_config(3));
        let resp = sender.send(Verb::Post, "/x", None).await.unwrap();
        assert_eq!(resp.return_code, 409);
        assert_eq!(inner.calls(), 1);
    }

    #[tokio::test]
    async fn server_error_retries_until_success() {
        let inner = Arc::new(ScriptedSender::new(vec![
            Ok(response(500)),
            Ok(response(500)),
            Ok(response(200)),
        ]));
        let sender = RetryingSender::new(inner.clone(), fast_config(3));
        let resp = sender.send(Verb::Get, "/x", None).await.unwrap();
        assert!(resp.is_success());
        assert_eq!(inner.calls(), 3);
    }

    #[tokio::test]
    async fn exhausted_attempts_return_last_failure() {
        let inner = Arc::new(ScriptedSender::new(vec![
            Ok(response(500)),
            Ok(response(503)),
        ]));
        let sender = RetryingSender::new(inner.clone(), fast_config(2));
        let resp = sender.send(Verb::Get, "/x", None).await.unwrap();
        assert_eq!(resp.return_code, 503);
        assert_eq!(inner.calls(), 2);
    }

    #[tokio::test]
    async fn transport_error_is_retried() {
        let inner = Arc::new(ScriptedSender::new(vec![
            Err(VrfError::Http("connection reset".into())),
            Ok(response(200)),
        ]));
        let sender = RetryingSender::new(inner.clone(), fast_config(3));
        let resp = sender.send(Verb::Get, "/x", None).await.unwrap();
        assert!(resp.is_success());
        assert_eq!(inner.calls(), 2);
    }

    #[tokio::test]
    async fn validation_error_is_not_retried() {
        let inner = Arc::new(ScriptedSender::new(vec![Err(VrfError::Validation {
            index: 0,
            reason: "bad".into(),
        })]));
        let sender = RetryingSender::new(inner.clone(), fast_config(3));
        assert!(sender.send(Verb::Get, "/x", None).await.is_err());
        assert_eq!(inner.calls(), 1);
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let config = RetryConfig::new()
            .initial_delay(Duration::from_millis(100))
            .max_delay(Duration::from_millis(350));
        assert_eq!(config.delay_for_attempt(0), Duration::from_millis(100));
        assert_eq!(config.delay_for_attempt(1), Duration::from_millis(200));
        assert_eq!(config.delay_for_attempt(2), Duration::from_millis(350));
        assert_eq!(config.delay_for_attempt(10), Duration::from_millis(350));
    }
}
