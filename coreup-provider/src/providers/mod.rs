//! Compute provider implementations

/// Shared utilities used by provider implementations.
pub mod common;

#[cfg(feature = "ec2")]
pub mod ec2;
#[cfg(feature = "gce")]
pub mod gce;

#[cfg(feature = "ec2")]
pub use ec2::{Ec2Client, Ec2ClientBuilder};
#[cfg(feature = "gce")]
pub use gce::{GceClient, GceClientBuilder, OperationPoller};
