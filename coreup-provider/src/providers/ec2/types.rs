//! Query API response types
//!
//! Every response is decoded from the action's `<XxxResponse>` document; field
//! names follow the wire's camelCase element names. Absent elements decode to
//! their defaults.

use serde::{Deserialize, Serialize};

use super::xml::{item_list, trimmed};

// ============ Shared ============

/// Key/value tag on a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Response carrying nothing but the request id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimpleResponse {
    pub request_id: String,
}

/// Response carrying the request id and a `<return>` flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AcceptedResponse {
    pub request_id: String,
    #[serde(rename = "return")]
    pub accepted: bool,
}

// ============ Instances ============

/// `code` + `name` of an instance state (`16` / `running`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InstanceState {
    /// Bits 15-8 carry unpublished data; the low byte is the state.
    pub code: i32,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Placement {
    pub availability_zone: String,
    pub group_name: String,
    pub tenancy: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Monitoring {
    pub state: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IamInstanceProfile {
    pub arn: String,
    pub id: String,
}

/// A security group as referenced from an instance or reservation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GroupIdentifier {
    pub group_id: String,
    pub group_name: String,
}

/// A running (or stopped, or terminated) instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Instance {
    pub instance_id: String,
    pub image_id: String,
    pub instance_state: InstanceState,
    pub private_dns_name: String,
    pub dns_name: String,
    pub key_name: String,
    pub ami_launch_index: i32,
    pub instance_type: String,
    pub launch_time: String,
    pub placement: Placement,
    pub kernel_id: String,
    pub ramdisk_id: String,
    pub monitoring: Monitoring,
    pub subnet_id: String,
    pub vpc_id: String,
    pub private_ip_address: String,
    /// Public address; the wire element is `ipAddress`.
    #[serde(rename = "ipAddress")]
    pub public_ip_address: String,
    #[serde(deserialize_with = "item_list")]
    pub group_set: Vec<GroupIdentifier>,
    pub architecture: String,
    pub root_device_type: String,
    pub root_device_name: String,
    pub virtualization_type: String,
    pub hypervisor: String,
    pub iam_instance_profile: IamInstanceProfile,
    #[serde(deserialize_with = "item_list")]
    pub tag_set: Vec<Tag>,
}

impl Instance {
    /// Value of the tag `key`, if present.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tag_set
            .iter()
            .find(|t| t.key == key)
            .map(|t| t.value.as_str())
    }
}

/// `RunInstances` result: one reservation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunInstancesResponse {
    pub request_id: String,
    pub reservation_id: String,
    pub owner_id: String,
    #[serde(rename = "groupSet", deserialize_with = "item_list")]
    pub groups: Vec<GroupIdentifier>,
    #[serde(rename = "instancesSet", deserialize_with = "item_list")]
    pub instances: Vec<Instance>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Reservation {
    pub reservation_id: String,
    pub owner_id: String,
    pub requester_id: String,
    #[serde(rename = "groupSet", deserialize_with = "item_list")]
    pub groups: Vec<GroupIdentifier>,
    #[serde(rename = "instancesSet", deserialize_with = "item_list")]
    pub instances: Vec<Instance>,
}

/// `DescribeInstances` result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DescribeInstancesResponse {
    pub request_id: String,
    #[serde(rename = "reservationSet", deserialize_with = "item_list")]
    pub reservations: Vec<Reservation>,
}

impl DescribeInstancesResponse {
    /// All instances across reservations.
    pub fn instances(&self) -> impl Iterator<Item = &Instance> {
        self.reservations.iter().flat_map(|r| r.instances.iter())
    }
}

/// Previous and current state of an instance after a state change request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InstanceStateChange {
    pub instance_id: String,
    pub current_state: InstanceState,
    pub previous_state: InstanceState,
}

/// Result of `TerminateInstances`, `StartInstances` and `StopInstances`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InstanceStateChangeResponse {
    pub request_id: String,
    #[serde(rename = "instancesSet", deserialize_with = "item_list")]
    pub state_changes: Vec<InstanceStateChange>,
}

// ============ Volumes ============

/// `CreateVolume` result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateVolumeResponse {
    pub request_id: String,
    pub volume_id: String,
    pub size: i64,
    pub snapshot_id: String,
    pub availability_zone: String,
    pub status: String,
    pub create_time: String,
    pub volume_type: String,
    pub iops: i64,
}

/// `AttachVolume` / `DetachVolume` result, and one attachment of a volume.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VolumeAttachment {
    pub request_id: String,
    pub volume_id: String,
    pub instance_id: String,
    pub device: String,
    pub status: String,
    pub attach_time: String,
    pub delete_on_termination: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Volume {
    pub volume_id: String,
    pub size: i64,
    pub snapshot_id: String,
    pub availability_zone: String,
    pub status: String,
    pub create_time: String,
    #[serde(rename = "attachmentSet", deserialize_with = "item_list")]
    pub attachments: Vec<VolumeAttachment>,
    pub volume_type: String,
    pub iops: i64,
    #[serde(deserialize_with = "item_list")]
    pub tag_set: Vec<Tag>,
}

/// `DescribeVolumes` result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DescribeVolumesResponse {
    pub request_id: String,
    #[serde(rename = "volumeSet", deserialize_with = "item_list")]
    pub volumes: Vec<Volume>,
}

// ============ Images ============

/// `CreateImage` / `RegisterImage` / `CopyImage` result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageIdResponse {
    pub request_id: String,
    pub image_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EbsBlockDevice {
    pub snapshot_id: String,
    pub volume_size: i64,
    pub volume_type: String,
    pub iops: i64,
    pub delete_on_termination: bool,
}

/// Block device of an image, as described by the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageBlockDevice {
    pub device_name: String,
    pub virtual_name: String,
    pub ebs: EbsBlockDevice,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductCode {
    pub product_code: String,
    #[serde(rename = "type")]
    pub code_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StateReason {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Image {
    pub image_id: String,
    pub image_location: String,
    pub image_state: String,
    pub image_owner_id: String,
    pub image_owner_alias: String,
    pub is_public: bool,
    #[serde(deserialize_with = "item_list")]
    pub product_codes: Vec<ProductCode>,
    pub architecture: String,
    pub image_type: String,
    pub kernel_id: String,
    pub ramdisk_id: String,
    pub platform: String,
    pub state_reason: StateReason,
    pub name: String,
    pub description: String,
    pub root_device_type: String,
    pub root_device_name: String,
    #[serde(rename = "blockDeviceMapping", deserialize_with = "item_list")]
    pub block_devices: Vec<ImageBlockDevice>,
    pub virtualization_type: String,
    pub hypervisor: String,
    #[serde(deserialize_with = "item_list")]
    pub tag_set: Vec<Tag>,
}

/// `DescribeImages` result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DescribeImagesResponse {
    pub request_id: String,
    #[serde(rename = "imagesSet", deserialize_with = "item_list")]
    pub images: Vec<Image>,
}

// ============ Snapshots ============

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    pub snapshot_id: String,
    pub volume_id: String,
    pub status: String,
    pub start_time: String,
    pub progress: String,
    pub owner_id: String,
    pub owner_alias: String,
    pub volume_size: i64,
    pub description: String,
    #[serde(deserialize_with = "item_list")]
    pub tag_set: Vec<Tag>,
}

/// `CreateSnapshot` result: the new snapshot's fields at the top level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateSnapshotResponse {
    pub request_id: String,
    pub snapshot_id: String,
    pub volume_id: String,
    pub status: String,
    pub start_time: String,
    pub progress: String,
    pub owner_id: String,
    pub volume_size: i64,
    pub description: String,
}

/// `DescribeSnapshots` result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DescribeSnapshotsResponse {
    pub request_id: String,
    #[serde(rename = "snapshotSet", deserialize_with = "item_list")]
    pub snapshots: Vec<Snapshot>,
}

// ============ Security Groups ============

/// `CreateSecurityGroup` result.
///
/// The API echoes only the id; `group_name` is filled from the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateSecurityGroupResponse {
    pub request_id: String,
    #[serde(rename = "return")]
    pub accepted: bool,
    pub group_id: String,
    #[serde(skip_deserializing)]
    pub group_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IpRange {
    pub cidr_ip: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserIdGroupPair {
    pub user_id: String,
    pub group_id: String,
    pub group_name: String,
}

/// One ingress rule of a described group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IpPermissionInfo {
    pub ip_protocol: String,
    pub from_port: i32,
    pub to_port: i32,
    #[serde(deserialize_with = "item_list")]
    pub groups: Vec<UserIdGroupPair>,
    #[serde(deserialize_with = "item_list")]
    pub ip_ranges: Vec<IpRange>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SecurityGroupInfo {
    pub owner_id: String,
    pub group_id: String,
    pub group_name: String,
    pub group_description: String,
    pub vpc_id: String,
    #[serde(deserialize_with = "item_list")]
    pub ip_permissions: Vec<IpPermissionInfo>,
    #[serde(deserialize_with = "item_list")]
    pub tag_set: Vec<Tag>,
}

/// `DescribeSecurityGroups` result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DescribeSecurityGroupsResponse {
    pub request_id: String,
    #[serde(rename = "securityGroupInfo", deserialize_with = "item_list")]
    pub groups: Vec<SecurityGroupInfo>,
}

// ============ Addresses ============

/// `AllocateAddress` result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AllocateAddressResponse {
    pub request_id: String,
    pub public_ip: String,
    pub domain: String,
    pub allocation_id: String,
}

/// `AssociateAddress` result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssociateAddressResponse {
    pub request_id: String,
    #[serde(rename = "return")]
    pub accepted: bool,
    pub association_id: String,
}

// ============ Key Pairs ============

/// `CreateKeyPair` result, including the unencrypted private key.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateKeyPairResponse {
    pub request_id: String,
    pub key_name: String,
    #[serde(deserialize_with = "trimmed")]
    pub key_fingerprint: String,
    pub key_material: String,
}

impl std::fmt::Debug for CreateKeyPairResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateKeyPairResponse")
            .field("request_id", &self.request_id)
            .field("key_name", &self.key_name)
            .field("key_fingerprint", &self.key_fingerprint)
            .field("key_material", &"<redacted>")
            .finish()
    }
}
