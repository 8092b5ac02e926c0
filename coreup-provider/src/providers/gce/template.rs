//! Insert body for cluster members

use super::GCE_API_BASE;
use super::types::{
    AccessConfig, AttachedDisk, InitializeParams, Instance, Metadata, MetadataItem,
    NetworkInterface, Tags,
};

pub const DEFAULT_MACHINE_TYPE: &str = "n1-standard-1";
pub const DEFAULT_SOURCE_IMAGE: &str = "https://www.googleapis.com/compute/v1/projects/coreos-cloud/global/images/coreos-stable-494-4-0-v20141204";
pub const DEFAULT_DISK_SIZE_GB: u64 = 20;

/// Describes the instances of one cluster.
///
/// Each instance gets a persistent boot disk deleted together with it, one
/// interface on the `default` network with an external NAT address, the
/// cloud-config as `user-data` metadata and the cluster name as tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceTemplate {
    /// Cluster name: instance name prefix, description and tag.
    pub cluster: String,
    pub machine_type: String,
    pub source_image: String,
    pub disk_size_gb: u64,
    pub user_data: String,
}

impl InstanceTemplate {
    pub fn new(cluster: impl Into<String>) -> Self {
        Self {
            cluster: cluster.into(),
            machine_type: DEFAULT_MACHINE_TYPE.to_string(),
            source_image: DEFAULT_SOURCE_IMAGE.to_string(),
            disk_size_gb: DEFAULT_DISK_SIZE_GB,
            user_data: String::new(),
        }
    }

    #[must_use]
    pub fn machine_type(mut self, machine_type: impl Into<String>) -> Self {
        self.machine_type = machine_type.into();
        self
    }

    #[must_use]
    pub fn source_image(mut self, image: impl Into<String>) -> Self {
        self.source_image = image.into();
        self
    }

    #[must_use]
    pub fn disk_size_gb(mut self, size: u64) -> Self {
        self.disk_size_gb = size;
        self
    }

    #[must_use]
    pub fn user_data(mut self, user_data: impl Into<String>) -> Self {
        self.user_data = user_data.into();
        self
    }

    /// `{cluster}-{unix_time}-{index}`
    pub fn instance_name(&self, unix_time: i64, index: usize) -> String {
        format!("{}-{unix_time}-{index}", self.cluster)
    }

    /// The insert body for one instance of `project` in `zone`.
    pub fn build(&self, name: impl Into<String>, project: &str, zone: &str) -> Instance {
        let project_url = format!("{GCE_API_BASE}/{project}");
        Instance {
            name: name.into(),
            description: self.cluster.clone(),
            machine_type: format!("{project_url}/zones/{zone}/machineTypes/{}", self.machine_type),
            disks: vec![AttachedDisk {
                disk_type: "PERSISTENT".to_string(),
                mode: "READ_WRITE".to_string(),
                boot: true,
                auto_delete: true,
                initialize_params: Some(InitializeParams {
                    source_image: self.source_image.clone(),
                    disk_size_gb: self.disk_size_gb.to_string(),
                    ..InitializeParams::default()
                }),
                ..AttachedDisk::default()
            }],
            network_interfaces: vec![NetworkInterface {
                network: format!("{project_url}/global/networks/default"),
                access_configs: vec![AccessConfig {
                    access_type: "ONE_TO_ONE_NAT".to_string(),
                    ..AccessConfig::default()
                }],
                ..NetworkInterface::default()
            }],
            metadata: Some(Metadata {
                items: vec![MetadataItem {
                    key: "user-data".to_string(),
                    value: self.user_data.clone(),
                }],
                ..Metadata::default()
            }),
            tags: Some(Tags {
                items: vec![self.cluster.clone()],
                ..Tags::default()
            }),
            ..Instance::default()
        }
    }
}
