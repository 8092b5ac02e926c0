//! Compute JSON API resource types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============ Instances ============

/// A VM instance, both as the insert body and as listed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Instance {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Machine type URL.
    pub machine_type: String,
    /// `PROVISIONING`, `STAGING`, `RUNNING`, `STOPPING`, `TERMINATED`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub status: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub zone: String,
    pub disks: Vec<AttachedDisk>,
    pub network_interfaces: Vec<NetworkInterface>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Tags>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub self_link: String,
    #[serde(
        with = "crate::utils::datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub creation_timestamp: Option<DateTime<Utc>>,
}

impl Instance {
    /// External address of the first access config of the first interface.
    pub fn nat_ip(&self) -> Option<&str> {
        self.network_interfaces
            .first()
            .and_then(|nic| nic.access_configs.first())
            .map(|ac| ac.nat_ip.as_str())
            .filter(|ip| !ip.is_empty())
    }

    /// Internal address of the first interface.
    pub fn network_ip(&self) -> Option<&str> {
        self.network_interfaces
            .first()
            .map(|nic| nic.network_ip.as_str())
            .filter(|ip| !ip.is_empty())
    }

    /// Value of a metadata item.
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata
            .as_ref()?
            .items
            .iter()
            .find(|item| item.key == key)
            .map(|item| item.value.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AttachedDisk {
    /// `PERSISTENT` or `SCRATCH`.
    #[serde(rename = "type")]
    pub disk_type: String,
    /// `READ_WRITE` or `READ_ONLY`.
    pub mode: String,
    pub boot: bool,
    pub auto_delete: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub device_name: String,
    /// Existing disk URL; unset when `initialize_params` creates one.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initialize_params: Option<InitializeParams>,
}

/// Parameters of a disk created together with the instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InitializeParams {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub disk_name: String,
    pub source_image: String,
    /// int64 encoded as a decimal string on the wire.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub disk_size_gb: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NetworkInterface {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Network URL.
    pub network: String,
    #[serde(rename = "networkIP", skip_serializing_if = "String::is_empty")]
    pub network_ip: String,
    pub access_configs: Vec<AccessConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccessConfig {
    /// Only `ONE_TO_ONE_NAT` is supported by the API.
    #[serde(rename = "type")]
    pub access_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(rename = "natIP", skip_serializing_if = "String::is_empty")]
    pub nat_ip: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub fingerprint: String,
    pub items: Vec<MetadataItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataItem {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tags {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub fingerprint: String,
    pub items: Vec<String>,
}

/// One page of `instances.list`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct InstanceList {
    pub items: Vec<Instance>,
    pub next_page_token: String,
}
