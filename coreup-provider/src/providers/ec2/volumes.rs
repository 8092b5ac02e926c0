//! EBS volumes.

use crate::error::Result;

use super::Ec2Client;
use super::params::{Filter, ParameterSet};
use super::types::{CreateVolumeResponse, DescribeVolumesResponse, SimpleResponse, VolumeAttachment};

/// `CreateVolume` request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateVolume {
    pub availability_zone: String,
    /// GiB; 0 means "size of the snapshot".
    pub size: i64,
    pub snapshot_id: Option<String>,
    pub volume_type: Option<String>,
    pub iops: i64,
}

impl CreateVolume {
    pub fn params(&self) -> ParameterSet {
        let mut params = ParameterSet::new("CreateVolume");
        params.set("AvailabilityZone", self.availability_zone.as_str());
        params.set_positive("Size", self.size);
        params.set_opt("SnapshotId", self.snapshot_id.as_deref());
        params.set_opt("VolumeType", self.volume_type.as_deref());
        params.set_positive("Iops", self.iops);
        params
    }
}

impl Ec2Client {
    pub async fn create_volume(&self, request: &CreateVolume) -> Result<CreateVolumeResponse> {
        self.query(request.params()).await
    }

    pub async fn delete_volume(&self, volume_id: &str) -> Result<SimpleResponse> {
        let mut params = ParameterSet::new("DeleteVolume");
        params.set("VolumeId", volume_id);
        self.query(params).await
    }

    /// Attaches a volume to an instance as `device` (e.g. `/dev/sdh`).
    pub async fn attach_volume(
        &self,
        volume_id: &str,
        instance_id: &str,
        device: &str,
    ) -> Result<VolumeAttachment> {
        let mut params = ParameterSet::new("AttachVolume");
        params.set("VolumeId", volume_id);
        params.set("InstanceId", instance_id);
        params.set("Device", device);
        self.query(params).await
    }

    pub async fn detach_volume(&self, volume_id: &str) -> Result<VolumeAttachment> {
        let mut params = ParameterSet::new("DetachVolume");
        params.set("VolumeId", volume_id);
        self.query(params).await
    }

    pub async fn describe_volumes(
        &self,
        volume_ids: &[&str],
        filter: Option<&Filter>,
    ) -> Result<DescribeVolumesResponse> {
        let mut params = ParameterSet::new("DescribeVolumes");
        params.add_list("VolumeId", volume_ids);
        params.add_filter(filter);
        self.query(params).await
    }
}
