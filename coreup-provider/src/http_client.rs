//! Generic HTTP transport
//!
//! Providers build an [`HttpRequest`] (URL, headers, body) themselves and hand it
//! to an [`HttpTransport`]. The transport only moves bytes: it never interprets
//! the body, so provider-specific error envelopes stay in each provider.
//!
//! # design principles
//! - **Signing is not the transport's job** - the request arrives fully signed
//! - **Retry is a transport configuration** - providers issue exactly one call
//! - **Every status is returned** - non-2xx responses are data, not errors

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::error::{ProviderError, Result};
use crate::utils::log_sanitizer::{redact_query_param, truncate_for_log};

// ============ Request / Response ============

/// HTTP method used by the provider APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `DELETE`
    Delete,
}

impl HttpMethod {
    /// The method token as it appears on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Self::GET,
            HttpMethod::Post => Self::POST,
            HttpMethod::Delete => Self::DELETE,
        }
    }
}

/// A fully prepared request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Method.
    pub method: HttpMethod,
    /// Absolute URL including the query string.
    pub url: String,
    /// Extra headers, sent in order.
    pub headers: Vec<(String, String)>,
    /// Request body, if any.
    pub body: Option<String>,
}

impl HttpRequest {
    /// A body-less `GET`.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    /// A request without headers or body.
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Appends a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// A response as received, whatever its status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawResponse {
    /// Numeric status code.
    pub status: u16,
    /// Status line without the protocol version, e.g. `"403 Forbidden"`.
    pub status_line: String,
    /// Response body as text.
    pub body: String,
}

impl RawResponse {
    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Builds the `"<code> <reason>"` status line for a status code.
pub fn status_line(status: reqwest::StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {reason}", status.as_u16()),
        None => status.as_u16().to_string(),
    }
}

// ============ Transport ============

/// Moves a prepared request over the network.
///
/// Implementations return `Ok` for every response that arrived, including
/// 4xx/5xx ones, and `Err(NetworkError | Timeout)` only when no response did.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends the request and returns the raw response.
    async fn execute(&self, request: HttpRequest) -> Result<RawResponse>;
}

/// [`HttpTransport`] backed by `reqwest`, with optional retry of transient failures.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    provider: String,
    max_retries: u32,
}

impl ReqwestTransport {
    /// A transport using `client`, labelling its errors with `provider`. No retries.
    pub fn new(client: Client, provider: impl Into<String>) -> Self {
        Self {
            client,
            provider: provider.into(),
            max_retries: 0,
        }
    }

    /// Set the maximum number of automatic retries for transient errors.
    ///
    /// Only `GET` requests use the budget; `POST` and `DELETE` are sent once.
    #[must_use]
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Performs the request once
    ///
    /// Unified processing: sending requests, logging, error handling.
    /// Returns the response together with its `Retry-After` value (seconds), if any.
    async fn execute_once(&self, request: &HttpRequest) -> Result<(RawResponse, Option<u64>)> {
        let provider = self.provider.as_str();
        log::debug!(
            "[{provider}] {} {}",
            request.method,
            redact_query_param(&request.url, "Signature")
        );

        let mut builder = self.client.request(request.method.into(), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        // Send request
        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout {
                    provider: provider.to_string(),
                    detail: e.to_string(),
                }
            } else {
                ProviderError::NetworkError {
                    provider: provider.to_string(),
                    detail: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        log::debug!("[{provider}] Response Status: {}", status.as_u16());

        // Extract Retry-After header (before consuming response body)
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        // Read response body
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::NetworkError {
                provider: provider.to_string(),
                detail: format!("Failed to read response body: {e}"),
            })?;

        log::debug!("[{provider}] Response Body: {}", truncate_for_log(&body));

        Ok((
            RawResponse {
                status: status.as_u16(),
                status_line: status_line(status),
                body,
            },
            retry_after,
        ))
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    /// Retry strategy
    /// - Only `GET` is retried; other methods are not idempotent and go out once
    /// - Network errors and timeouts, HTTP 429 and 502/503/504 are retried
    /// - Exponential backoff: 100ms, 200ms, 400ms, 800ms, ... (maximum 10 seconds)
    /// - `Retry-After` on a 429 wins over backoff (capped at 30s)
    /// - Once retries run out, the last response is returned as-is
    async fn execute(&self, request: HttpRequest) -> Result<RawResponse> {
        let provider = self.provider.as_str();
        let max_retries = retry_budget(request.method, self.max_retries);
        let mut attempt = 0;

        loop {
            let outcome = self.execute_once(&request).await;
            let delay = match &outcome {
                _ if attempt >= max_retries => None,
                Ok((response, retry_after)) if is_retryable_status(response.status) => {
                    Some(retry_delay(*retry_after, attempt))
                }
                Err(e) if is_retryable(e) => Some(backoff_delay(attempt)),
                _ => None,
            };

            let Some(delay) = delay else {
                return outcome.map(|(response, _)| response);
            };

            match &outcome {
                Ok((response, _)) => log::warn!(
                    "[{provider}] HTTP {} (attempt {}/{}), retrying in {:.1}s",
                    response.status,
                    attempt + 1,
                    max_retries,
                    delay.as_secs_f32()
                ),
                Err(e) => log::warn!(
                    "[{provider}] Request failed (attempt {}/{}), retrying in {:.1}s: {e}",
                    attempt + 1,
                    max_retries,
                    delay.as_secs_f32()
                ),
            }
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

// ============ Parsing helpers ============

/// HTTP tool function set
pub struct HttpUtils;

impl HttpUtils {
    /// Parse JSON response
    ///
    /// # Returns
    /// * `Ok(T)` - successfully parsed
    /// * `Err(ProviderError::ParseError)` - parsing failed
    pub fn parse_json<T>(response_text: &str, provider_name: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(response_text).map_err(|e| {
            log::error!("[{provider_name}] JSON parse failed: {e}");
            log::error!(
                "[{provider_name}] Raw response: {}",
                truncate_for_log(response_text)
            );
            ProviderError::ParseError {
                provider: provider_name.to_string(),
                detail: e.to_string(),
            }
        })
    }

    /// Parse XML response
    ///
    /// The document element name is ignored; fields are matched by child element name.
    pub fn parse_xml<T>(response_text: &str, provider_name: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        quick_xml::de::from_str(response_text).map_err(|e| {
            log::error!("[{provider_name}] XML parse failed: {e}");
            log::error!(
                "[{provider_name}] Raw response: {}",
                truncate_for_log(response_text)
            );
            ProviderError::ParseError {
                provider: provider_name.to_string(),
                detail: e.to_string(),
            }
        })
    }
}

/// Retries allowed for `method`: the configured budget for `GET`, zero otherwise.
fn retry_budget(method: HttpMethod, max_retries: u32) -> u32 {
    match method {
        HttpMethod::Get => max_retries,
        HttpMethod::Post | HttpMethod::Delete => 0,
    }
}

/// Determine whether a transport error can be retried
fn is_retryable(error: &ProviderError) -> bool {
    matches!(
        error,
        ProviderError::NetworkError { .. } | ProviderError::Timeout { .. }
    )
}

/// Rate limiting and gateway errors are worth another attempt; everything else is final.
fn is_retryable_status(status: u16) -> bool {
    status == 429 || matches!(status, 502..=504)
}

/// Calculate retry delay
///
/// Use `retry_after` (capped at 30s) when present, otherwise exponential backoff.
fn retry_delay(retry_after: Option<u64>, attempt: u32) -> Duration {
    match retry_after {
        Some(secs) => Duration::from_secs(secs.min(30)),
        None => backoff_delay(attempt),
    }
}

/// Calculate exponential backoff delay
///
/// Backoff strategy: 100ms, 200ms, 400ms, 800ms, 1.6s, ...
/// Maximum delay limit is 10 seconds
fn backoff_delay(attempt: u32) -> Duration {
    let capped_attempt = attempt.min(20); // Prevent 2^attempt from overflowing
    let delay_ms = 100_u64.saturating_mul(1_u64 << capped_attempt);
    let delay_ms = delay_ms.min(10_000); // Maximum 10 seconds
    Duration::from_millis(delay_ms)
}
