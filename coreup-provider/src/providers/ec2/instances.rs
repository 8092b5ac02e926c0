//! Instance lifecycle: run, describe, start/stop/reboot, terminate, modify.

use crate::error::Result;

use super::params::{BlockDeviceMapping, Filter, GroupRef, ParameterSet};
use super::types::{
    AcceptedResponse, DescribeInstancesResponse, InstanceStateChangeResponse,
    RunInstancesResponse, SimpleResponse,
};
use super::{Ec2Client, PROVIDER};

/// Where a new instance's network interface goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkAttachment {
    /// Instance-level placement: optional `SubnetId`, groups by id or name.
    Classic {
        subnet_id: Option<String>,
    },
    /// A primary interface in `subnet_id` with a public address.
    ///
    /// Groups can only be referenced by id in this form.
    VpcWithPublicIp {
        subnet_id: String,
    },
}

impl Default for NetworkAttachment {
    fn default() -> Self {
        Self::Classic { subnet_id: None }
    }
}

impl NetworkAttachment {
    /// Interface form when a subnet is given and a public address requested,
    /// instance-level form otherwise.
    pub fn from_flags(subnet_id: Option<&str>, associate_public_ip: bool) -> Self {
        match subnet_id.filter(|s| !s.is_empty()) {
            Some(subnet_id) if associate_public_ip => Self::VpcWithPublicIp {
                subnet_id: subnet_id.to_string(),
            },
            subnet_id => Self::Classic {
                subnet_id: subnet_id.map(str::to_string),
            },
        }
    }
}

/// `RunInstances` request.
///
/// Counts: both zero launches exactly one instance; a zero `max_count` means
/// `max_count = min_count`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunInstances {
    pub image_id: String,
    pub min_count: i64,
    pub max_count: i64,
    /// Idempotency token; a random one is generated when unset.
    pub client_token: Option<String>,
    pub instance_type: Option<String>,
    pub key_name: Option<String>,
    pub security_groups: Vec<GroupRef>,
    pub iam_instance_profile: Option<String>,
    pub kernel_id: Option<String>,
    pub ramdisk_id: Option<String>,
    pub user_data: Option<Vec<u8>>,
    pub availability_zone: Option<String>,
    pub placement_group_name: Option<String>,
    pub monitoring: bool,
    pub network: NetworkAttachment,
    pub disable_api_termination: bool,
    pub shutdown_behavior: Option<String>,
    pub private_ip_address: Option<String>,
    pub block_devices: Vec<BlockDeviceMapping>,
}

impl RunInstances {
    /// Minimal request for `count` instances of `image_id`.
    pub fn new(image_id: impl Into<String>, count: i64) -> Self {
        Self {
            image_id: image_id.into(),
            min_count: count,
            max_count: count,
            ..Self::default()
        }
    }

    /// Normalised `(min, max)` counts.
    pub fn counts(&self) -> (i64, i64) {
        match (self.min_count, self.max_count) {
            (0, 0) => (1, 1),
            (min, 0) => (min, min),
            (min, max) => (min, max),
        }
    }

    pub fn params(&self) -> ParameterSet {
        let mut params = ParameterSet::new("RunInstances");
        params.set("ImageId", self.image_id.as_str());
        params.set_opt("InstanceType", self.instance_type.as_deref());

        let (min, max) = self.counts();
        params.set("MinCount", min.to_string());
        params.set("MaxCount", max.to_string());
        match self.client_token.as_deref().filter(|t| !t.is_empty()) {
            Some(token) => params.set("ClientToken", token),
            None => params.set("ClientToken", generate_client_token()),
        }

        params.set_opt("KeyName", self.key_name.as_deref());
        params.set_opt("KernelId", self.kernel_id.as_deref());
        params.set_opt("RamdiskId", self.ramdisk_id.as_deref());
        params.set_base64("UserData", self.user_data.as_deref());
        params.set_opt(
            "Placement.AvailabilityZone",
            self.availability_zone.as_deref(),
        );
        params.set_opt("Placement.GroupName", self.placement_group_name.as_deref());
        params.set_flag("Monitoring.Enabled", self.monitoring);

        match &self.network {
            NetworkAttachment::VpcWithPublicIp { subnet_id } => {
                params.set("NetworkInterface.0.DeviceIndex", "0");
                params.set("NetworkInterface.0.AssociatePublicIpAddress", "true");
                params.set("NetworkInterface.0.SubnetId", subnet_id.as_str());
                let skipped = params
                    .add_group_ids("NetworkInterface.0.SecurityGroupId", &self.security_groups);
                if skipped > 0 {
                    log::debug!(
                        "[{PROVIDER}] {skipped} security group name(s) dropped: network interfaces accept ids only"
                    );
                }
            }
            NetworkAttachment::Classic { subnet_id } => {
                params.set_opt("SubnetId", subnet_id.as_deref());
                params.add_group_refs("SecurityGroupId", "SecurityGroup", &self.security_groups);
            }
        }

        params.set_opt(
            "IamInstanceProfile.Name",
            self.iam_instance_profile.as_deref(),
        );
        params.set_flag("DisableApiTermination", self.disable_api_termination);
        params.set_opt(
            "InstanceInitiatedShutdownBehavior",
            self.shutdown_behavior.as_deref(),
        );
        params.set_opt("PrivateIpAddress", self.private_ip_address.as_deref());
        params.add_block_devices(&self.block_devices);
        params
    }
}

/// 64 hex characters, the maximum token length the API accepts.
fn generate_client_token() -> String {
    let a = uuid::Uuid::new_v4();
    let b = uuid::Uuid::new_v4();
    format!("{}{}", hex::encode(a.as_bytes()), hex::encode(b.as_bytes()))
}

/// `ModifyInstanceAttribute` request. Only set attributes are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModifyInstance {
    pub instance_type: Option<String>,
    pub block_devices: Vec<BlockDeviceMapping>,
    pub disable_api_termination: bool,
    pub ebs_optimized: bool,
    /// Only id references are sent.
    pub security_groups: Vec<GroupRef>,
    pub shutdown_behavior: Option<String>,
    pub kernel_id: Option<String>,
    pub ramdisk_id: Option<String>,
    pub source_dest_check: bool,
    pub sriov_net_support: bool,
    pub user_data: Option<Vec<u8>>,
}

impl ModifyInstance {
    pub fn params(&self, instance_id: &str) -> ParameterSet {
        let mut params = ParameterSet::new("ModifyInstanceAttribute");
        params.set("InstanceId", instance_id);
        params.add_block_devices(&self.block_devices);
        params.set_opt("InstanceType.Value", self.instance_type.as_deref());
        params.set_flag("DisableApiTermination.Value", self.disable_api_termination);
        params.set_flag("EbsOptimized", self.ebs_optimized);
        params.set_opt(
            "InstanceInitiatedShutdownBehavior.Value",
            self.shutdown_behavior.as_deref(),
        );
        params.set_opt("Kernel.Value", self.kernel_id.as_deref());
        params.set_opt("Ramdisk.Value", self.ramdisk_id.as_deref());
        params.set_flag("SourceDestCheck.Value", self.source_dest_check);
        if self.sriov_net_support {
            params.set("SriovNetSupport.Value", "simple");
        }
        params.set_base64("UserData", self.user_data.as_deref());
        params.add_group_ids("GroupId", &self.security_groups);
        params
    }
}

fn instance_ids_params(action: &str, instance_ids: &[&str]) -> ParameterSet {
    let mut params = ParameterSet::new(action);
    params.add_list("InstanceId", instance_ids);
    params
}

impl Ec2Client {
    /// Launches instances.
    pub async fn run_instances(&self, request: &RunInstances) -> Result<RunInstancesResponse> {
        self.query(request.params()).await
    }

    /// Terminates the given instances.
    pub async fn terminate_instances(
        &self,
        instance_ids: &[&str],
    ) -> Result<InstanceStateChangeResponse> {
        self.query(instance_ids_params("TerminateInstances", instance_ids))
            .await
    }

    /// Describes instances, optionally limited by id and filter.
    pub async fn describe_instances(
        &self,
        instance_ids: &[&str],
        filter: Option<&Filter>,
    ) -> Result<DescribeInstancesResponse> {
        let mut params = instance_ids_params("DescribeInstances", instance_ids);
        params.add_filter(filter);
        self.query(params).await
    }

    /// Starts previously stopped EBS-backed instances.
    pub async fn start_instances(
        &self,
        instance_ids: &[&str],
    ) -> Result<InstanceStateChangeResponse> {
        self.query(instance_ids_params("StartInstances", instance_ids))
            .await
    }

    /// Stops EBS-backed instances.
    pub async fn stop_instances(
        &self,
        instance_ids: &[&str],
    ) -> Result<InstanceStateChangeResponse> {
        self.query(instance_ids_params("StopInstances", instance_ids))
            .await
    }

    /// Queues a reboot of the given instances.
    pub async fn reboot_instances(&self, instance_ids: &[&str]) -> Result<SimpleResponse> {
        self.query(instance_ids_params("RebootInstances", instance_ids))
            .await
    }

    /// Modifies attributes of one instance.
    pub async fn modify_instance_attribute(
        &self,
        instance_id: &str,
        request: &ModifyInstance,
    ) -> Result<AcceptedResponse> {
        self.query(request.params(instance_id)).await
    }
}
