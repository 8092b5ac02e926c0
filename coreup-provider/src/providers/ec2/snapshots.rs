//! Volume snapshots.

use crate::error::Result;

use super::Ec2Client;
use super::params::{Filter, ParameterSet};
use super::types::{CreateSnapshotResponse, DescribeSnapshotsResponse, SimpleResponse};

impl Ec2Client {
    /// Snapshots a volume. An empty description is sent as-is.
    pub async fn create_snapshot(
        &self,
        volume_id: &str,
        description: &str,
    ) -> Result<CreateSnapshotResponse> {
        let mut params = ParameterSet::new("CreateSnapshot");
        params.set("VolumeId", volume_id);
        params.set("Description", description);
        self.query(params).await
    }

    /// Deletes snapshots.
    ///
    /// Snapshots are incremental, but deleting older ones never breaks restoring
    /// from the most recent.
    pub async fn delete_snapshots(&self, snapshot_ids: &[&str]) -> Result<SimpleResponse> {
        let mut params = ParameterSet::new("DeleteSnapshot");
        params.add_list("SnapshotId", snapshot_ids);
        self.query(params).await
    }

    pub async fn describe_snapshots(
        &self,
        snapshot_ids: &[&str],
        filter: Option<&Filter>,
    ) -> Result<DescribeSnapshotsResponse> {
        let mut params = ParameterSet::new("DescribeSnapshots");
        params.add_list("SnapshotId", snapshot_ids);
        params.add_filter(filter);
        self.query(params).await
    }
}
