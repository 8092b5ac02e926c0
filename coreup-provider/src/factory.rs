//! Provider factory functions.

#[cfg(feature = "gce")]
use std::time::Duration;

#[cfg(feature = "ec2")]
use crate::error::ProviderError;
use crate::error::Result;
use crate::types::{ProviderConfig, ProviderType};

#[cfg(feature = "ec2")]
use crate::providers::Ec2Client;
#[cfg(feature = "gce")]
use crate::providers::GceClient;
#[cfg(feature = "ec2")]
use crate::types::Region;

/// A configured client of either provider.
#[derive(Clone)]
pub enum Provider {
    #[cfg(feature = "ec2")]
    Ec2(Ec2Client),
    #[cfg(feature = "gce")]
    Gce(GceClient),
}

impl Provider {
    pub fn provider_type(&self) -> ProviderType {
        match self {
            #[cfg(feature = "ec2")]
            Self::Ec2(_) => ProviderType::Ec2,
            #[cfg(feature = "gce")]
            Self::Gce(_) => ProviderType::Gce,
        }
    }

    #[cfg(feature = "ec2")]
    pub fn as_ec2(&self) -> Option<&Ec2Client> {
        match self {
            Self::Ec2(client) => Some(client),
            #[allow(unreachable_patterns)]
            _ => None,
        }
    }

    #[cfg(feature = "gce")]
    pub fn as_gce(&self) -> Option<&GceClient> {
        match self {
            Self::Gce(client) => Some(client),
            #[allow(unreachable_patterns)]
            _ => None,
        }
    }
}

/// Creates a client from a declarative [`ProviderConfig`].
///
/// An unknown region name is a configuration error; an explicit endpoint
/// takes precedence over the region.
///
/// # Examples
///
/// ```rust,no_run
/// use coreup_provider::{create_provider, ProviderConfig};
///
/// let config = ProviderConfig::from_json(
///     r#"{"provider": "ec2", "credentials": {"access_key": "AKID", "secret_key": "s"}, "region": "eu-west-1"}"#,
/// ).unwrap();
/// let provider = create_provider(config).unwrap();
/// ```
pub fn create_provider(config: ProviderConfig) -> Result<Provider> {
    match config {
        #[cfg(feature = "ec2")]
        ProviderConfig::Ec2 {
            credentials,
            region,
            endpoint,
            max_retries,
        } => {
            let mut builder = Ec2Client::builder(credentials).max_retries(max_retries);
            if let Some(name) = region {
                let region = Region::by_name(&name).ok_or_else(|| ProviderError::Configuration {
                    provider: "ec2".to_string(),
                    detail: format!("unknown region '{name}'"),
                })?;
                builder = builder.region(region);
            }
            if let Some(endpoint) = endpoint {
                builder = builder.endpoint(endpoint);
            }
            Ok(Provider::Ec2(builder.build()?))
        }
        #[cfg(feature = "gce")]
        ProviderConfig::Gce {
            project,
            access_token,
            zone,
            max_retries,
            poll_interval_secs,
        } => {
            let mut builder = GceClient::builder(project, access_token).max_retries(max_retries);
            if let Some(zone) = zone {
                builder = builder.zone(zone);
            }
            if let Some(secs) = poll_interval_secs {
                builder = builder.poll_interval(Duration::from_secs(secs));
            }
            Ok(Provider::Gce(builder.build()?))
        }
    }
}

/// Providers compiled into this build.
pub fn available_providers() -> Vec<ProviderType> {
    vec![
        #[cfg(feature = "ec2")]
        ProviderType::Ec2,
        #[cfg(feature = "gce")]
        ProviderType::Gce,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "ec2")]
    #[test]
    fn ec2_from_region() {
        let config = ProviderConfig::from_json(
            r#"{"provider": "ec2", "credentials": {"access_key": "a", "secret_key": "s"}, "region": "sa-east-1"}"#,
        )
        .unwrap();
        let provider = create_provider(config).unwrap();
        assert_eq!(provider.provider_type(), ProviderType::Ec2);
        assert_eq!(
            provider.as_ec2().unwrap().endpoint().host_str(),
            Some("ec2.sa-east-1.amazonaws.com")
        );
    }

    #[cfg(feature = "ec2")]
    #[test]
    fn ec2_unknown_region() {
        let config = ProviderConfig::from_json(
            r#"{"provider": "ec2", "credentials": {"access_key": "a", "secret_key": "s"}, "region": "moon-1"}"#,
        )
        .unwrap();
        let Err(err) = create_provider(config) else {
            panic!("expected an error");
        };
        assert!(matches!(err, ProviderError::Configuration { .. }));
        assert!(err.to_string().contains("moon-1"));
    }

    #[cfg(feature = "gce")]
    #[test]
    fn gce_with_zone_and_interval() {
        let config = ProviderConfig::from_json(
            r#"{"provider": "gce", "project": "p", "access_token": "t", "zone": "europe-west1-b", "poll_interval_secs": 2}"#,
        )
        .unwrap();
        let provider = create_provider(config).unwrap();
        let gce = provider.as_gce().unwrap();
        assert_eq!(gce.zone(), "europe-west1-b");
        assert_eq!(gce.poll_interval(), Duration::from_secs(2));
    }

    #[test]
    fn all_default_providers_available() {
        let providers = available_providers();
        #[cfg(feature = "ec2")]
        assert!(providers.contains(&ProviderType::Ec2));
        #[cfg(feature = "gce")]
        assert!(providers.contains(&ProviderType::Gce));
    }
}
