//! EC2 error envelope decoding

use serde::Deserialize;

use crate::error::ProviderError;
use crate::http_client::RawResponse;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::{Ec2Client, PROVIDER};

/// `<Response><Errors><Error>..</Error>..</Errors><RequestID>..</RequestID></Response>`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ErrorEnvelope {
    #[serde(rename = "Errors")]
    errors: ErrorList,
    #[serde(rename = "RequestID")]
    request_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ErrorList {
    #[serde(rename = "Error")]
    error: Vec<ErrorEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct ErrorEntry {
    code: String,
    message: String,
}

impl ProviderErrorMapper for Ec2Client {
    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

impl Ec2Client {
    /// Maps a non-200 response to `ProviderError::Api`.
    ///
    /// An empty or undecodable body yields an error with an empty code and the
    /// HTTP status line as message.
    pub(crate) fn build_error(&self, response: &RawResponse) -> ProviderError {
        let envelope = quick_xml::de::from_str::<ErrorEnvelope>(&response.body)
            .unwrap_or_else(|e| {
                if !response.body.trim().is_empty() {
                    log::debug!("[{PROVIDER}] Undecodable error body: {e}");
                }
                ErrorEnvelope::default()
            });

        let ctx = ErrorContext {
            status_code: response.status,
            status_line: response.status_line.clone(),
            request_id: envelope.request_id,
        };
        let raw = envelope
            .errors
            .error
            .into_iter()
            .map(|e| RawApiError::with_code(e.code, e.message))
            .collect();

        self.map_errors(raw, &ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::client;
    use super::*;

    fn response(status: u16, status_line: &str, body: &str) -> RawResponse {
        RawResponse {
            status,
            status_line: status_line.to_string(),
            body: body.to_string(),
        }
    }

    #[test]
    fn first_of_two_errors_wins() {
        let (client, _) = client();
        let err = client.build_error(&response(
            400,
            "400 Bad Request",
            "<Response><Errors>\
               <Error><Code>InvalidInstanceID.NotFound</Code><Message>The instance ID 'i-1' does not exist</Message></Error>\
               <Error><Code>InvalidInstanceID.Malformed</Code><Message>Invalid id: \"x\"</Message></Error>\
             </Errors><RequestID>ea966190-f9aa-478e-9ede-example</RequestID></Response>",
        ));

        let api = err.api_error().cloned().unwrap();
        assert_eq!(api.status_code, 400);
        assert_eq!(api.code, "InvalidInstanceID.NotFound");
        assert_eq!(api.message, "The instance ID 'i-1' does not exist");
        assert_eq!(api.request_id, "ea966190-f9aa-478e-9ede-example");

        let all = err.api_errors();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].code, "InvalidInstanceID.Malformed");
        assert_eq!(all[1].request_id, api.request_id);
        assert_eq!(err.provider(), "ec2");
        assert!(err.is_expected());
    }

    #[test]
    fn empty_body_falls_back_to_status_line() {
        let (client, _) = client();
        let err = client.build_error(&response(403, "403 Forbidden", ""));
        let api = err.api_error().cloned().unwrap();
        assert_eq!(api.code, "");
        assert_eq!(api.message, "403 Forbidden");
        assert_eq!(api.request_id, "");
        assert!(err.api_errors().len() == 1);
    }

    #[test]
    fn html_body_falls_back_to_status_line() {
        let (client, _) = client();
        let err = client.build_error(&response(
            503,
            "503 Service Unavailable",
            "<html><body>overloaded</body></html>",
        ));
        let api = err.api_error().cloned().unwrap();
        assert_eq!(api.code, "");
        assert_eq!(api.message, "503 Service Unavailable");
        assert!(!err.is_expected());
    }

    #[test]
    fn empty_message_gets_status_line() {
        let (client, _) = client();
        let err = client.build_error(&response(
            401,
            "401 Unauthorized",
            "<Response><Errors><Error><Code>AuthFailure</Code><Message/></Error></Errors><RequestID>r</RequestID></Response>",
        ));
        let api = err.api_error().cloned().unwrap();
        assert_eq!(api.code, "AuthFailure");
        assert_eq!(api.message, "401 Unauthorized");
        assert_eq!(err.to_string(), "[ec2] 401 Unauthorized (AuthFailure)");
    }
}
