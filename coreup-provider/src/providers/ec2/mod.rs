//! EC2 query API provider
//!
//! Requests are flattened into a [`ParameterSet`], signed with signature
//! version 2 and sent as a single `GET`; responses are XML.

mod addresses;
mod error;
mod http;
mod images;
mod instances;
mod key_pairs;
mod params;
mod security_groups;
mod sign;
mod snapshots;
mod tags;
mod types;
mod volumes;
mod xml;

use std::sync::Arc;

use url::Url;

use crate::error::{ProviderError, Result};
use crate::http_client::{HttpTransport, ReqwestTransport};
use crate::providers::common::create_http_client;
use crate::types::{Credentials, Region};
use crate::utils::clock::{Clock, SystemClock};

pub use images::{CopyImage, CreateImage, ModifyImageAttribute, RegisterImage};
pub use instances::{ModifyInstance, NetworkAttachment, RunInstances};
pub use addresses::AssociateAddress;
pub use params::{BlockDeviceMapping, Filter, GroupRef, ParameterSet};
pub use security_groups::{CreateSecurityGroup, IpPermission, SourceGroup};
pub use sign::RequestSigner;
pub use types::*;
pub use volumes::CreateVolume;

pub(crate) const PROVIDER: &str = "ec2";
/// Query API version sent as `Version`.
pub const EC2_API_VERSION: &str = "2013-07-15";
/// Region used when neither a region nor an endpoint is configured.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Client for the EC2 query API.
///
/// # Construction
///
/// ```rust,no_run
/// use coreup_provider::{Credentials, Ec2Client, Region};
///
/// let client = Ec2Client::builder(Credentials::new("AKID...", "secret"))
///     .region(Region::by_name("eu-west-1").unwrap())
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct Ec2Client {
    pub(crate) transport: Arc<dyn HttpTransport>,
    pub(crate) signer: RequestSigner,
    pub(crate) endpoint: Url,
}

/// Builder for [`Ec2Client`].
pub struct Ec2ClientBuilder {
    credentials: Credentials,
    region: Option<Region>,
    endpoint: Option<String>,
    api_version: Option<String>,
    transport: Option<Arc<dyn HttpTransport>>,
    clock: Option<Arc<dyn Clock>>,
    max_retries: u32,
}

impl Ec2ClientBuilder {
    fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            region: None,
            endpoint: None,
            api_version: None,
            transport: None,
            clock: None,
            max_retries: 0,
        }
    }

    /// Target region; its endpoint is used unless [`endpoint`](Self::endpoint) is set.
    #[must_use]
    pub fn region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    /// Explicit endpoint URL, e.g. for a compatible private cloud.
    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Overrides the `Version` parameter (default: [`EC2_API_VERSION`]).
    #[must_use]
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Custom transport. `max_retries` is ignored when set.
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Clock used for the `Timestamp` parameter (default: system clock).
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Set the maximum number of automatic retries for transient errors (default: 0).
    #[must_use]
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Build the [`Ec2Client`] instance.
    pub fn build(self) -> Result<Ec2Client> {
        let endpoint = match (self.endpoint, self.region) {
            (Some(endpoint), _) => endpoint,
            (None, Some(region)) => region.ec2_endpoint,
            (None, None) => Region::by_name(DEFAULT_REGION)
                .map(|r| r.ec2_endpoint)
                .unwrap_or_default(),
        };
        let endpoint = Url::parse(&endpoint).map_err(|e| ProviderError::Configuration {
            provider: PROVIDER.to_string(),
            detail: format!("invalid endpoint '{endpoint}': {e}"),
        })?;
        if endpoint.host_str().is_none() {
            return Err(ProviderError::Configuration {
                provider: PROVIDER.to_string(),
                detail: format!("endpoint '{endpoint}' has no host"),
            });
        }

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(
                ReqwestTransport::new(create_http_client(PROVIDER)?, PROVIDER)
                    .with_max_retries(self.max_retries),
            ),
        };

        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let mut signer = RequestSigner::new(self.credentials, clock);
        if let Some(version) = self.api_version {
            signer = signer.with_api_version(version);
        }

        Ok(Ec2Client {
            transport,
            signer,
            endpoint,
        })
    }
}

impl Ec2Client {
    /// Client for `region` with default settings (no retries, system clock).
    pub fn new(credentials: Credentials, region: Region) -> Result<Self> {
        Self::builder(credentials).region(region).build()
    }

    /// Returns a builder for customizing the client configuration.
    pub fn builder(credentials: Credentials) -> Ec2ClientBuilder {
        Ec2ClientBuilder::new(credentials)
    }

    /// The endpoint requests are sent to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted transport shared by the per-resource tests.

    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};

    use super::{Ec2Client, ParameterSet};
    use crate::error::Result;
    use crate::http_client::{HttpRequest, HttpTransport, RawResponse};
    use crate::types::Credentials;
    use crate::utils::clock::FixedClock;

    /// Replays canned responses and records every request.
    #[derive(Default)]
    pub(crate) struct ScriptedTransport {
        responses: Mutex<VecDeque<Result<RawResponse>>>,
        pub(crate) requests: Mutex<Vec<HttpRequest>>,
    }

    impl ScriptedTransport {
        pub(crate) fn push(&self, response: Result<RawResponse>) {
            self.responses.lock().unwrap().push_back(response);
        }

        pub(crate) fn ok(&self, body: &str) {
            self.push(Ok(RawResponse {
                status: 200,
                status_line: "200 OK".to_string(),
                body: body.to_string(),
            }));
        }

        /// Parameters of the `n`-th request, decoded from its URL.
        pub(crate) fn params(&self, n: usize) -> ParameterSet {
            let requests = self.requests.lock().unwrap();
            let url = url::Url::parse(&requests[n].url).unwrap();
            let mut params = ParameterSet::default();
            for (k, v) in url.query_pairs() {
                params.set(k.into_owned(), v.into_owned());
            }
            params
        }
    }

    #[async_trait]
    impl HttpTransport for ScriptedTransport {
        async fn execute(&self, request: HttpRequest) -> Result<RawResponse> {
            self.requests.lock().unwrap().push(request);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| panic!("no scripted response left"))
        }
    }

    pub(crate) fn client() -> (Ec2Client, Arc<ScriptedTransport>) {
        client_with_endpoint("https://ec2.us-east-1.amazonaws.com")
    }

    pub(crate) fn client_with_endpoint(endpoint: &str) -> (Ec2Client, Arc<ScriptedTransport>) {
        let transport = Arc::new(ScriptedTransport::default());
        let at = Utc.with_ymd_and_hms(2013, 7, 15, 8, 0, 0).unwrap();
        let client = Ec2Client::builder(Credentials::new("AKIDEXAMPLE", "secret"))
            .endpoint(endpoint)
            .transport(transport.clone())
            .clock(Arc::new(FixedClock(at)))
            .build()
            .unwrap();
        (client, transport)
    }
}
