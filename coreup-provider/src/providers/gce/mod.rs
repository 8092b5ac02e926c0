//! GCE Compute JSON API provider
//!
//! Mutating calls return an [`Operation`](crate::Operation) handle; completion
//! is awaited with [`OperationPoller`].

mod error;
mod http;
mod instances;
mod operation;
mod template;
mod types;

use std::sync::Arc;
use std::time::Duration;

use crate::error::{ProviderError, Result};
use crate::http_client::{HttpTransport, ReqwestTransport};
use crate::providers::common::create_http_client;
use crate::utils::clock::{Clock, SystemClock};

pub use operation::{DEFAULT_POLL_INTERVAL, OperationPoller};
pub use template::{
    DEFAULT_DISK_SIZE_GB, DEFAULT_MACHINE_TYPE, DEFAULT_SOURCE_IMAGE, InstanceTemplate,
};
pub use types::{
    AccessConfig, AttachedDisk, InitializeParams, Instance, Metadata, MetadataItem,
    NetworkInterface, Tags,
};

pub(crate) const PROVIDER: &str = "gce";
/// Root of the per-project API paths.
pub const GCE_API_BASE: &str = "https://www.googleapis.com/compute/v1/projects";
/// Zone used when none is configured.
pub const DEFAULT_ZONE: &str = "asia-east1-c";

/// Client for the Compute JSON API, scoped to one project and zone.
#[derive(Clone)]
pub struct GceClient {
    pub(crate) transport: Arc<dyn HttpTransport>,
    pub(crate) base_url: String,
    pub(crate) project: String,
    pub(crate) zone: String,
    pub(crate) access_token: String,
    pub(crate) poll_interval: Duration,
    pub(crate) clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for GceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GceClient")
            .field("base_url", &self.base_url)
            .field("project", &self.project)
            .field("zone", &self.zone)
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}

/// Builder for [`GceClient`].
pub struct GceClientBuilder {
    project: String,
    access_token: String,
    zone: Option<String>,
    base_url: Option<String>,
    transport: Option<Arc<dyn HttpTransport>>,
    clock: Option<Arc<dyn Clock>>,
    max_retries: u32,
    poll_interval: Duration,
}

impl GceClientBuilder {
    fn new(project: String, access_token: String) -> Self {
        Self {
            project,
            access_token,
            zone: None,
            base_url: None,
            transport: None,
            clock: None,
            max_retries: 0,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Zone for instance calls (default: [`DEFAULT_ZONE`]).
    #[must_use]
    pub fn zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = Some(zone.into());
        self
    }

    /// API root replacing [`GCE_API_BASE`], e.g. a local test server.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Custom transport. `max_retries` is ignored when set.
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Clock used for generated instance names.
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Set the maximum number of automatic retries for transient errors (default: 0).
    ///
    /// Only `GET` calls are retried; instance inserts and deletes are sent once.
    #[must_use]
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Interval between operation status queries (default: 5s).
    #[must_use]
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Build the [`GceClient`] instance.
    pub fn build(self) -> Result<GceClient> {
        let configuration = |detail: &str| ProviderError::Configuration {
            provider: PROVIDER.to_string(),
            detail: detail.to_string(),
        };
        if self.project.trim().is_empty() {
            return Err(configuration("project id is empty"));
        }
        if self.access_token.trim().is_empty() {
            return Err(configuration("access token is empty"));
        }

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(
                ReqwestTransport::new(create_http_client(PROVIDER)?, PROVIDER)
                    .with_max_retries(self.max_retries),
            ),
        };

        Ok(GceClient {
            transport,
            base_url: self
                .base_url
                .unwrap_or_else(|| GCE_API_BASE.to_string())
                .trim_end_matches('/')
                .to_string(),
            project: self.project,
            zone: self.zone.unwrap_or_else(|| DEFAULT_ZONE.to_string()),
            access_token: self.access_token,
            poll_interval: self.poll_interval,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
        })
    }
}

impl GceClient {
    /// Client for `project` in the default zone.
    pub fn new(project: impl Into<String>, access_token: impl Into<String>) -> Result<Self> {
        Self::builder(project, access_token).build()
    }

    /// Returns a builder for customizing the client configuration.
    pub fn builder(
        project: impl Into<String>,
        access_token: impl Into<String>,
    ) -> GceClientBuilder {
        GceClientBuilder::new(project.into(), access_token.into())
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn zone(&self) -> &str {
        &self.zone
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let client = GceClient::builder("p", "t")
            .transport(Arc::new(testing::ScriptedTransport::default()))
            .build()
            .unwrap();
        assert_eq!(client.zone(), DEFAULT_ZONE);
        assert_eq!(client.base_url, GCE_API_BASE);
        assert_eq!(client.poll_interval(), Duration::from_secs(5));
        assert_eq!(GceClient::builder("p", "t").max_retries, 0);
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let client = GceClient::builder("p", "t")
            .base_url("http://127.0.0.1:9000/compute/v1/projects/")
            .zone("us-central1-a")
            .transport(Arc::new(testing::ScriptedTransport::default()))
            .build()
            .unwrap();
        assert_eq!(client.base_url, "http://127.0.0.1:9000/compute/v1/projects");
        assert_eq!(client.zone(), "us-central1-a");
    }

    #[test]
    fn empty_project_or_token_is_rejected() {
        for (project, token) in [("", "t"), ("p", " ")] {
            let result = GceClient::builder(project, token)
                .transport(Arc::new(testing::ScriptedTransport::default()))
                .build();
            assert!(matches!(result, Err(ProviderError::Configuration { .. })));
        }
    }

    #[test]
    fn debug_hides_token() {
        let client = GceClient::builder("p", "ya29.secret")
            .transport(Arc::new(testing::ScriptedTransport::default()))
            .build()
            .unwrap();
        assert!(!format!("{client:?}").contains("ya29.secret"));
    }
}
