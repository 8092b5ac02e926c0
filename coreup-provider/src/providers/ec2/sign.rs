//! Query API signature version 2 (HmacSHA256)

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};

use crate::error::{ProviderError, Result};
use crate::providers::common::hmac_sha256;
use crate::types::Credentials;
use crate::utils::clock::Clock;
use crate::utils::datetime::format_timestamp;
use crate::utils::log_sanitizer::truncate_for_log;

use super::params::ParameterSet;
use super::{EC2_API_VERSION, PROVIDER};

/// Adds `Version`, `Timestamp`, auth parameters and `Signature` to a request.
#[derive(Clone)]
pub struct RequestSigner {
    credentials: Credentials,
    clock: Arc<dyn Clock>,
    api_version: String,
}

impl RequestSigner {
    /// Signer for `credentials`, stamping requests with `clock`.
    pub fn new(credentials: Credentials, clock: Arc<dyn Clock>) -> Self {
        Self {
            credentials,
            clock,
            api_version: EC2_API_VERSION.to_string(),
        }
    }

    /// Overrides the `Version` parameter.
    #[must_use]
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// The `Version` sent with every request.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Signs `params` in place for a request to `host` + `path`.
    ///
    /// `host` includes the port when it is not the scheme's default. A previous
    /// `Signature` is replaced. Returns the timestamp that was signed.
    pub fn sign(
        &self,
        method: &str,
        host: &str,
        path: &str,
        params: &mut ParameterSet,
    ) -> Result<DateTime<Utc>> {
        self.validate()?;

        let now = self.clock.now();
        params.remove("Signature");
        params.set("Version", self.api_version.as_str());
        params.set("Timestamp", format_timestamp(&now));
        params.set("AWSAccessKeyId", self.credentials.access_key.as_str());
        params.set("SignatureVersion", "2");
        params.set("SignatureMethod", "HmacSHA256");
        if let Some(token) = &self.credentials.security_token {
            params.set_if_not_empty("SecurityToken", token);
        }

        let payload = string_to_sign(method, host, path, params);
        log::debug!("[{PROVIDER}] StringToSign: {}", truncate_for_log(&payload));

        let mac = hmac_sha256(
            self.credentials.secret_key.as_bytes(),
            payload.as_bytes(),
            PROVIDER,
        )?;
        params.set("Signature", BASE64.encode(mac));

        Ok(now)
    }

    fn validate(&self) -> Result<()> {
        let missing = if self.credentials.access_key.is_empty() {
            "access key"
        } else if self.credentials.secret_key.is_empty() {
            "secret key"
        } else {
            return Ok(());
        };
        Err(ProviderError::Configuration {
            provider: PROVIDER.to_string(),
            detail: format!("missing {missing}"),
        })
    }
}

/// `METHOD\nhost\npath\n` followed by the canonical query.
fn string_to_sign(method: &str, host: &str, path: &str, params: &ParameterSet) -> String {
    format!("{method}\n{host}\n{path}\n{}", params.canonical_query())
}
