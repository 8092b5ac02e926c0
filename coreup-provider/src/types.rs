use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ============ Provider Types ============

/// Identifies which provider implementation to use.
///
/// Each variant is gated behind its corresponding feature flag.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    /// EC2-style signed query API. Requires feature `ec2`.
    #[cfg(feature = "ec2")]
    Ec2,
    /// GCE-style compute API with asynchronous operations. Requires feature `gce`.
    #[cfg(feature = "gce")]
    Gce,
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            #[cfg(feature = "ec2")]
            Self::Ec2 => write!(f, "ec2"),
            #[cfg(feature = "gce")]
            Self::Gce => write!(f, "gce"),
        }
    }
}

// ============ Credentials & Endpoints ============

/// Signing credentials for the query API.
///
/// Acquisition and caching belong to the caller; this type only carries the values.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    /// Access key id, sent in clear as `AWSAccessKeyId`.
    pub access_key: String,
    /// Secret key, used only as the HMAC key.
    pub secret_key: String,
    /// Session token for temporary credentials, sent as `SecurityToken`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_token: Option<String>,
}

impl Credentials {
    /// Creates long-term credentials without a session token.
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            security_token: None,
        }
    }

    /// Attaches a session token.
    #[must_use]
    pub fn with_security_token(mut self, token: impl Into<String>) -> Self {
        self.security_token = Some(token.into());
        self
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field(
                "security_token",
                &self.security_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// A named region and its query-API endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Region name, e.g. `us-east-1`.
    pub name: String,
    /// Query-API endpoint URL for the region.
    pub ec2_endpoint: String,
}

/// Built-in region table: `(name, endpoint)`.
const REGIONS: &[(&str, &str)] = &[
    ("us-east-1", "https://ec2.us-east-1.amazonaws.com"),
    ("us-west-1", "https://ec2.us-west-1.amazonaws.com"),
    ("us-west-2", "https://ec2.us-west-2.amazonaws.com"),
    ("eu-west-1", "https://ec2.eu-west-1.amazonaws.com"),
    ("ap-southeast-1", "https://ec2.ap-southeast-1.amazonaws.com"),
    ("ap-southeast-2", "https://ec2.ap-southeast-2.amazonaws.com"),
    ("ap-northeast-1", "https://ec2.ap-northeast-1.amazonaws.com"),
    ("sa-east-1", "https://ec2.sa-east-1.amazonaws.com"),
    ("us-gov-west-1", "https://ec2.us-gov-west-1.amazonaws.com"),
    ("cn-north-1", "https://ec2.cn-north-1.amazonaws.com.cn"),
];

impl Region {
    /// Looks up a built-in region by name.
    pub fn by_name(name: &str) -> Option<Self> {
        REGIONS
            .iter()
            .find(|(region, _)| *region == name)
            .map(|(region, endpoint)| Self {
                name: (*region).to_string(),
                ec2_endpoint: (*endpoint).to_string(),
            })
    }

    /// Names of all built-in regions.
    pub fn names() -> impl Iterator<Item = &'static str> {
        REGIONS.iter().map(|(name, _)| *name)
    }
}

// ============ Provider Configuration ============

/// Declarative provider configuration, e.g. loaded from a JSON file.
///
/// ```json
/// {"provider": "gce", "project": "my-project", "access_token": "ya29..."}
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum ProviderConfig {
    /// Query-API client configuration.
    #[cfg(feature = "ec2")]
    Ec2 {
        /// Signing credentials.
        credentials: Credentials,
        /// Built-in region name. Ignored when `endpoint` is set.
        #[serde(default)]
        region: Option<String>,
        /// Explicit endpoint URL.
        #[serde(default)]
        endpoint: Option<String>,
        /// Transport-level retries for transient failures of `GET` calls (default: 0).
        #[serde(default)]
        max_retries: u32,
    },
    /// Compute JSON API client configuration.
    #[cfg(feature = "gce")]
    Gce {
        /// Project id.
        project: String,
        /// OAuth2 access token, obtained by the caller.
        access_token: String,
        /// Zone, defaults to the client's default zone.
        #[serde(default)]
        zone: Option<String>,
        /// Transport-level retries for transient failures of `GET` calls (default: 0).
        #[serde(default)]
        max_retries: u32,
        /// Operation poll interval in seconds.
        #[serde(default)]
        poll_interval_secs: Option<u64>,
    },
}

impl ProviderConfig {
    /// Parses a configuration from JSON text.
    pub fn from_json(text: &str) -> crate::Result<Self> {
        serde_json::from_str(text).map_err(|e| crate::ProviderError::Configuration {
            provider: "config".to_string(),
            detail: e.to_string(),
        })
    }

    /// The provider this configuration targets.
    pub fn provider_type(&self) -> ProviderType {
        match self {
            #[cfg(feature = "ec2")]
            Self::Ec2 { .. } => ProviderType::Ec2,
            #[cfg(feature = "gce")]
            Self::Gce { .. } => ProviderType::Gce,
        }
    }
}

// ============ Asynchronous Operations ============

/// Status of an asynchronous operation.
///
/// Anything other than the three documented values is kept verbatim in
/// [`Other`](Self::Other) so that pollers can report it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OperationStatus {
    /// Queued, not started.
    #[default]
    Pending,
    /// In progress.
    Running,
    /// Finished (successfully or with an error payload).
    Done,
    /// Unrecognised status string.
    Other(String),
}

impl OperationStatus {
    /// Wire representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "PENDING",
            Self::Running => "RUNNING",
            Self::Done => "DONE",
            Self::Other(s) => s,
        }
    }

    /// `true` for the two progress values.
    pub fn is_in_progress(&self) -> bool {
        matches!(self, Self::Pending | Self::Running)
    }
}

impl From<&str> for OperationStatus {
    fn from(s: &str) -> Self {
        match s {
            "PENDING" => Self::Pending,
            "RUNNING" => Self::Running,
            "DONE" => Self::Done,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for OperationStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OperationStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s.as_str()))
    }
}

/// One entry of an operation's error payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationErrorEntry {
    /// Error code, e.g. `RESOURCE_NOT_FOUND`.
    pub code: String,
    /// Resource path the error refers to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Human-readable message.
    pub message: String,
}

/// Error payload of a finished operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationErrors {
    /// Errors in the order the provider reported them.
    pub errors: Vec<OperationErrorEntry>,
}

/// Handle and snapshot of an asynchronous server-side operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Operation {
    /// Server-assigned id.
    pub id: String,
    /// Operation name, used to query its status.
    pub name: String,
    /// Zone link (full URL or bare zone name).
    pub zone: String,
    /// Kind of operation (`insert`, `delete`, ...).
    pub operation_type: String,
    /// Link to the resource the operation acts on.
    pub target_link: String,
    /// Current status.
    pub status: OperationStatus,
    /// Optional status message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
    /// Progress percentage, not guaranteed to be monotonic.
    pub progress: i32,
    /// When the operation was requested.
    #[serde(
        with = "crate::utils::datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub insert_time: Option<DateTime<Utc>>,
    /// When the operation finished.
    #[serde(
        with = "crate::utils::datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_time: Option<DateTime<Utc>>,
    /// Error payload, present when the operation finished with errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<OperationErrors>,
    /// HTTP status the operation would have produced on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_error_status_code: Option<u16>,
    /// HTTP message matching `http_error_status_code`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_error_message: Option<String>,
}

impl Operation {
    /// Bare zone name, taken from the last segment of the zone link.
    pub fn zone_name(&self) -> Option<&str> {
        self.zone
            .rsplit('/')
            .next()
            .filter(|segment| !segment.is_empty())
    }

    /// Messages of the error payload, in reported order.
    pub fn error_messages(&self) -> Vec<&str> {
        self.error
            .iter()
            .flat_map(|e| e.errors.iter().map(|entry| entry.message.as_str()))
            .collect()
    }

    /// `true` once the operation reached its terminal success status.
    pub fn is_done(&self) -> bool {
        self.status == OperationStatus::Done
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_known_values() {
        for s in ["PENDING", "RUNNING", "DONE"] {
            assert_eq!(OperationStatus::from(s).as_str(), s);
        }
        assert!(OperationStatus::Running.is_in_progress());
        assert!(!OperationStatus::Done.is_in_progress());
    }

    #[test]
    fn status_keeps_unknown_values() {
        let status = OperationStatus::from("WEIRD");
        assert_eq!(status, OperationStatus::Other("WEIRD".to_string()));
        assert!(!status.is_in_progress());
        assert_eq!(status.to_string(), "WEIRD");
    }

    #[test]
    fn operation_decodes_from_json() {
        let json = r#"{
            "kind": "compute#operation",
            "id": "7080013935316640891",
            "name": "operation-1418-insert",
            "zone": "https://www.googleapis.com/compute/v1/projects/p/zones/asia-east1-c",
            "operationType": "insert",
            "targetLink": "https://www.googleapis.com/compute/v1/projects/p/zones/asia-east1-c/instances/web-0",
            "status": "DONE",
            "progress": 100,
            "insertTime": "2014-12-04T10:00:00.000-08:00",
            "error": {"errors": [{"code": "QUOTA_EXCEEDED", "message": "Quota 'CPUS' exceeded."}]}
        }"#;
        let op: Operation = serde_json::from_str(json).unwrap();
        assert_eq!(op.name, "operation-1418-insert");
        assert_eq!(op.zone_name(), Some("asia-east1-c"));
        assert!(op.is_done());
        assert_eq!(op.progress, 100);
        assert!(op.insert_time.is_some());
        assert_eq!(op.error_messages(), ["Quota 'CPUS' exceeded."]);
    }

    #[test]
    fn zone_name_accepts_bare_zone() {
        let op = Operation {
            zone: "us-central1-a".to_string(),
            ..Operation::default()
        };
        assert_eq!(op.zone_name(), Some("us-central1-a"));
        assert_eq!(Operation::default().zone_name(), None);
    }

    #[test]
    fn region_lookup() {
        let region = Region::by_name("eu-west-1").unwrap();
        assert_eq!(region.ec2_endpoint, "https://ec2.eu-west-1.amazonaws.com");
        assert!(Region::by_name("mars-north-1").is_none());
        assert!(Region::names().any(|n| n == "cn-north-1"));
    }

    #[test]
    fn credentials_debug_hides_secret() {
        let creds = Credentials::new("AKID", "very-secret").with_security_token("tok");
        let debug = format!("{creds:?}");
        assert!(debug.contains("AKID"));
        assert!(!debug.contains("very-secret"));
    }

    #[cfg(feature = "gce")]
    #[test]
    fn provider_config_parses_gce() {
        let config = ProviderConfig::from_json(
            r#"{"provider": "gce", "project": "p", "access_token": "t", "poll_interval_secs": 1}"#,
        )
        .unwrap();
        assert_eq!(config.provider_type(), ProviderType::Gce);
        let ProviderConfig::Gce {
            max_retries,
            poll_interval_secs,
            ..
        } = config
        else {
            panic!("expected gce config");
        };
        assert_eq!(max_retries, 0);
        assert_eq!(poll_interval_secs, Some(1));
    }

    #[cfg(feature = "ec2")]
    #[test]
    fn provider_config_parses_ec2() {
        let config = ProviderConfig::from_json(
            r#"{"provider": "ec2", "credentials": {"access_key": "a", "secret_key": "s"}, "region": "us-west-2"}"#,
        )
        .unwrap();
        assert_eq!(config.provider_type(), ProviderType::Ec2);
    }

    #[test]
    fn provider_config_rejects_unknown_provider() {
        let err = ProviderConfig::from_json(r#"{"provider": "azure"}"#).unwrap_err();
        assert!(matches!(err, crate::ProviderError::Configuration { .. }));
    }
}
