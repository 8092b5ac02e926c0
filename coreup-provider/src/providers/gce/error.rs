//! Google error body decoding

use serde::Deserialize;

use crate::error::ProviderError;
use crate::http_client::RawResponse;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::{GceClient, PROVIDER};

/// `{"error": {"code", "message", "errors": [{"reason", "message"}]}}`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ErrorDetail {
    message: String,
    errors: Vec<ErrorItem>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ErrorItem {
    reason: String,
    message: String,
}

impl ProviderErrorMapper for GceClient {
    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

impl GceClient {
    /// Maps a non-2xx response to `ProviderError::Api`.
    ///
    /// The code of each entry is its `reason`. Without entries, the top-level
    /// message is used; without that too, the HTTP status line.
    pub(crate) fn build_error(&self, response: &RawResponse) -> ProviderError {
        let detail = serde_json::from_str::<ErrorBody>(&response.body)
            .map(|body| body.error)
            .unwrap_or_else(|e| {
                if !response.body.trim().is_empty() {
                    log::debug!("[{PROVIDER}] Undecodable error body: {e}");
                }
                ErrorDetail::default()
            });

        let raw = if detail.errors.is_empty() {
            if detail.message.is_empty() {
                Vec::new()
            } else {
                vec![RawApiError::with_code("", detail.message)]
            }
        } else {
            detail
                .errors
                .into_iter()
                .map(|item| {
                    let message = if item.message.is_empty() {
                        detail.message.clone()
                    } else {
                        item.message
                    };
                    RawApiError::with_code(item.reason, message)
                })
                .collect()
        };

        let ctx = ErrorContext {
            status_code: response.status,
            status_line: response.status_line.clone(),
            request_id: String::new(),
        };
        self.map_errors(raw, &ctx)
    }
}
