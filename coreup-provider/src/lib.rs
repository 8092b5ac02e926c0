//! # coreup-provider
//!
//! Compute provisioning clients for two cloud API styles:
//!
//! | Provider | Feature Flag | Wire format | Auth Method |
//! |----------|-------------|-------------|-------------|
//! | EC2 query API | `ec2` | signed `GET`, XML responses | HMAC-SHA256 (signature version 2) |
//! | GCE Compute API | `gce` | JSON, asynchronous operations | OAuth2 Bearer Token |
//!
//! ## Feature Flags
//!
//! ### Provider Selection
//!
//! - **`all-providers`** *(default)*: enable both providers.
//! - **`ec2`**: enable only the EC2 query API client.
//! - **`gce`**: enable only the GCE client and the operation poller.
//!
//! ### TLS Backend
//!
//! - **`native-tls`** *(default)*: use the platform's native TLS implementation.
//! - **`rustls`**: use rustls. Recommended for cross-compilation.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! coreup-provider = { version = "0.1", default-features = false, features = ["ec2", "rustls"] }
//! ```
//!
//! ## EC2
//!
//! ```rust,no_run
//! use coreup_provider::{Credentials, Ec2Client, Region};
//! use coreup_provider::ec2::{Filter, RunInstances};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let region = Region::by_name("us-west-2").ok_or("unknown region")?;
//!     let client = Ec2Client::new(Credentials::new("AKID...", "secret"), region)?;
//!
//!     let mut run = RunInstances::new("ami-12345678", 3);
//!     run.instance_type = Some("m3.medium".to_string());
//!     run.user_data = Some(b"#cloud-config\n".to_vec());
//!     let reservation = client.run_instances(&run).await?;
//!
//!     let mut filter = Filter::new();
//!     filter.add("instance-state-name", ["running"]);
//!     for instance in client.describe_instances(&[], Some(&filter)).await?.instances() {
//!         println!("{} {}", instance.instance_id, instance.public_ip_address);
//!     }
//!     println!("launched {}", reservation.instances.len());
//!     Ok(())
//! }
//! ```
//!
//! ## GCE
//!
//! ```rust,no_run
//! use coreup_provider::{GceClient, OperationPoller};
//! use coreup_provider::gce::InstanceTemplate;
//!
//! # async fn run() -> coreup_provider::Result<()> {
//! let client = GceClient::new("my-project", "ya29...")?;
//! let template = InstanceTemplate::new("coreup").user_data("#cloud-config\n");
//! for op in client.run_instances(&template, 3).await? {
//!     OperationPoller::new(&client).wait(&op).await?;
//! }
//! # Ok(()) }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, ProviderError>`](ProviderError):
//!
//! - [`ProviderError::Api`]: the provider rejected the call; the first reported
//!   error is primary, the rest are in `additional`
//! - [`ProviderError::NetworkError`] / [`ProviderError::Timeout`]: no response
//! - [`ProviderError::ParseError`]: a response did not decode
//! - [`ProviderError::OperationFailed`]: an operation reached an unknown status
//!
//! Transient failures of `GET` requests are retried by [`ReqwestTransport`]
//! when it is configured with retries (clients default to none); `POST` and
//! `DELETE` are always sent once.

mod error;
mod factory;
mod http_client;
mod providers;
mod traits;
mod types;
mod utils;

// Re-export error types
pub use error::{ApiError, ProviderError, Result};

// Re-export factory functions
pub use factory::{Provider, available_providers, create_provider};

// Transport seam
pub use http_client::{HttpMethod, HttpRequest, HttpTransport, RawResponse, ReqwestTransport};

// Re-export public traits (internal traits are not exported)
pub use traits::OperationSource;

// Re-export types
pub use types::{
    Credentials, Operation, OperationErrorEntry, OperationErrors, OperationStatus,
    ProviderConfig, ProviderType, Region,
};

// Re-export utils module
pub use utils::clock::{Clock, FixedClock, SystemClock};
pub use utils::datetime;

// Re-export concrete providers (behind feature flags)
#[cfg(feature = "ec2")]
pub use providers::ec2;
#[cfg(feature = "ec2")]
pub use providers::{Ec2Client, Ec2ClientBuilder};

#[cfg(feature = "gce")]
pub use providers::gce;
#[cfg(feature = "gce")]
pub use providers::{GceClient, GceClientBuilder, OperationPoller};
