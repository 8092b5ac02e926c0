//! Machine images: create, register, copy, describe, deregister, share.

use crate::error::Result;

use super::Ec2Client;
use super::params::{BlockDeviceMapping, Filter, ParameterSet};
use super::types::{AcceptedResponse, DescribeImagesResponse, ImageIdResponse, SimpleResponse};

/// `CreateImage` request: an EBS-backed image from an instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateImage {
    pub instance_id: String,
    pub name: String,
    pub description: Option<String>,
    pub no_reboot: bool,
    pub block_devices: Vec<BlockDeviceMapping>,
}

impl CreateImage {
    pub fn params(&self) -> ParameterSet {
        let mut params = ParameterSet::new("CreateImage");
        params.set("InstanceId", self.instance_id.as_str());
        params.set("Name", self.name.as_str());
        params.set_opt("Description", self.description.as_deref());
        params.set_flag("NoReboot", self.no_reboot);
        params.add_block_devices(&self.block_devices);
        params
    }
}

/// `RegisterImage` request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterImage {
    pub name: String,
    pub image_location: Option<String>,
    pub description: Option<String>,
    pub architecture: Option<String>,
    pub kernel_id: Option<String>,
    pub ramdisk_id: Option<String>,
    pub root_device_name: Option<String>,
    pub virtualization_type: Option<String>,
    pub block_devices: Vec<BlockDeviceMapping>,
}

impl RegisterImage {
    pub fn params(&self) -> ParameterSet {
        let mut params = ParameterSet::new("RegisterImage");
        params.set("Name", self.name.as_str());
        params.set_opt("ImageLocation", self.image_location.as_deref());
        params.set_opt("Description", self.description.as_deref());
        params.set_opt("Architecture", self.architecture.as_deref());
        params.set_opt("KernelId", self.kernel_id.as_deref());
        params.set_opt("RamdiskId", self.ramdisk_id.as_deref());
        params.set_opt("RootDeviceName", self.root_device_name.as_deref());
        params.set_opt(
            "VirtualizationType",
            self.virtualization_type.as_deref(),
        );
        params.add_block_devices(&self.block_devices);
        params
    }
}

/// `CopyImage` request: copies an image from another region into the client's.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyImage {
    pub source_region: Option<String>,
    pub source_image_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub client_token: Option<String>,
}

impl CopyImage {
    pub fn params(&self) -> ParameterSet {
        let mut params = ParameterSet::new("CopyImage");
        params.set_opt("SourceRegion", self.source_region.as_deref());
        params.set_opt("SourceImageId", self.source_image_id.as_deref());
        params.set_opt("Name", self.name.as_deref());
        params.set_opt("Description", self.description.as_deref());
        params.set_opt("ClientToken", self.client_token.as_deref());
        params
    }
}

/// `ModifyImageAttribute` request: launch permissions, product codes, description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModifyImageAttribute {
    pub add_users: Vec<String>,
    pub remove_users: Vec<String>,
    pub add_groups: Vec<String>,
    pub remove_groups: Vec<String>,
    pub product_codes: Vec<String>,
    pub description: Option<String>,
}

impl ModifyImageAttribute {
    pub fn params(&self, image_id: &str) -> ParameterSet {
        let mut params = ParameterSet::new("ModifyImageAttribute");
        params.set("ImageId", image_id);
        params.set_opt("Description.Value", self.description.as_deref());

        for (label, values, field) in [
            ("LaunchPermission.Add", &self.add_users, "UserId"),
            ("LaunchPermission.Remove", &self.remove_users, "UserId"),
            ("LaunchPermission.Add", &self.add_groups, "Group"),
            ("LaunchPermission.Remove", &self.remove_groups, "Group"),
        ] {
            for (i, value) in values.iter().enumerate() {
                params.set(format!("{label}.{}.{field}", i + 1), value.as_str());
            }
        }

        params.add_list("ProductCode", &self.product_codes);
        params
    }
}

impl Ec2Client {
    pub async fn create_image(&self, request: &CreateImage) -> Result<ImageIdResponse> {
        self.query(request.params()).await
    }

    /// Describes images, optionally limited by id, owner and filter.
    ///
    /// With no ids, owners or filter this lists every visible image, which is a lot.
    pub async fn describe_images(
        &self,
        image_ids: &[&str],
        owners: &[&str],
        filter: Option<&Filter>,
    ) -> Result<DescribeImagesResponse> {
        let mut params = ParameterSet::new("DescribeImages");
        params.add_list("ImageId", image_ids);
        params.add_list("Owner", owners);
        params.add_filter(filter);
        self.query(params).await
    }

    pub async fn register_image(&self, request: &RegisterImage) -> Result<ImageIdResponse> {
        self.query(request.params()).await
    }

    /// Deregisters an image. Backing snapshots are kept.
    pub async fn deregister_image(&self, image_id: &str) -> Result<AcceptedResponse> {
        let mut params = ParameterSet::new("DeregisterImage");
        params.set("ImageId", image_id);
        self.query(params).await
    }

    pub async fn copy_image(&self, request: &CopyImage) -> Result<ImageIdResponse> {
        self.query(request.params()).await
    }

    pub async fn modify_image_attribute(
        &self,
        image_id: &str,
        request: &ModifyImageAttribute,
    ) -> Result<SimpleResponse> {
        self.query(request.params(image_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::client;
    use super::*;

    #[test]
    fn create_image_params() {
        let params = CreateImage {
            instance_id: "i-1".to_string(),
            name: "coreup-base".to_string(),
            description: Some("base image".to_string()),
            no_reboot: true,
            block_devices: vec![BlockDeviceMapping {
                device_name: "/dev/sdb".to_string(),
                no_device: true,
                ..BlockDeviceMapping::default()
            }],
        }
        .params();
        assert_eq!(params.get("InstanceId"), Some("i-1"));
        assert_eq!(params.get("Name"), Some("coreup-base"));
        assert_eq!(params.get("Description"), Some("base image"));
        assert_eq!(params.get("NoReboot"), Some("true"));
        assert_eq!(params.get("BlockDeviceMapping.1.NoDevice"), Some("true"));
    }

    #[test]
    fn register_image_minimal() {
        let params = RegisterImage {
            name: "img".to_string(),
            ..RegisterImage::default()
        }
        .params();
        assert_eq!(params.keys().collect::<Vec<_>>(), ["Action", "Name"]);
    }

    #[test]
    fn register_image_full() {
        let params = RegisterImage {
            name: "img".to_string(),
            image_location: Some("bucket/manifest.xml".to_string()),
            architecture: Some("x86_64".to_string()),
            root_device_name: Some("/dev/sda1".to_string()),
            virtualization_type: Some("hvm".to_string()),
            ..RegisterImage::default()
        }
        .params();
        assert_eq!(params.get("ImageLocation"), Some("bucket/manifest.xml"));
        assert_eq!(params.get("Architecture"), Some("x86_64"));
        assert_eq!(params.get("RootDeviceName"), Some("/dev/sda1"));
        assert_eq!(params.get("VirtualizationType"), Some("hvm"));
    }

    #[test]
    fn copy_image_params() {
        let params = CopyImage {
            source_region: Some("us-west-2".to_string()),
            source_image_id: Some("ami-1".to_string()),
            client_token: Some("tok".to_string()),
            ..CopyImage::default()
        }
        .params();
        assert_eq!(params.get("SourceRegion"), Some("us-west-2"));
        assert_eq!(params.get("SourceImageId"), Some("ami-1"));
        assert_eq!(params.get("ClientToken"), Some("tok"));
        assert!(!params.contains_key("Name"));
    }

    #[test]
    fn launch_permissions() {
        let params = ModifyImageAttribute {
            add_users: vec!["111".to_string(), "222".to_string()],
            remove_users: vec!["333".to_string()],
            add_groups: vec!["all".to_string()],
            remove_groups: vec!["all".to_string()],
            product_codes: vec!["pc-1".to_string()],
            description: Some("shared".to_string()),
        }
        .params("ami-1");
        assert_eq!(params.get("ImageId"), Some("ami-1"));
        assert_eq!(params.get("Description.Value"), Some("shared"));
        assert_eq!(params.get("LaunchPermission.Add.1.UserId"), Some("111"));
        assert_eq!(params.get("LaunchPermission.Add.2.UserId"), Some("222"));
        assert_eq!(params.get("LaunchPermission.Remove.1.UserId"), Some("333"));
        assert_eq!(params.get("LaunchPermission.Add.1.Group"), Some("all"));
        assert_eq!(params.get("LaunchPermission.Remove.1.Group"), Some("all"));
        assert_eq!(params.get("ProductCode.1"), Some("pc-1"));
    }

    #[tokio::test]
    async fn describe_images_by_owner() {
        let (client, transport) = client();
        transport.ok(
            "<DescribeImagesResponse><requestId>r</requestId><imagesSet>\
             <item><imageId>ami-2</imageId><name>coreos-stable</name><imageOwnerId>595879546273</imageOwnerId></item>\
             </imagesSet></DescribeImagesResponse>",
        );
        let mut filter = Filter::new();
        filter.add("name", ["coreos-stable-*"]);
        let resp = client
            .describe_images(&[], &["595879546273"], Some(&filter))
            .await
            .unwrap();
        assert_eq!(resp.images[0].name, "coreos-stable");

        let params = transport.params(0);
        assert_eq!(params.get("Owner.1"), Some("595879546273"));
        assert!(!params.contains_key("ImageId.1"));
        assert_eq!(params.get("Filter.1.Value.1"), Some("coreos-stable-*"));
    }

    #[tokio::test]
    async fn create_copy_and_deregister() {
        let (client, transport) = client();
        transport.ok("<CreateImageResponse><requestId>r</requestId><imageId>ami-4</imageId></CreateImageResponse>");
        transport.ok("<CopyImageResponse><requestId>r</requestId><imageId>ami-5</imageId></CopyImageResponse>");
        transport.ok("<DeregisterImageResponse><requestId>r</requestId><return>true</return></DeregisterImageResponse>");

        let created = client
            .create_image(&CreateImage {
                instance_id: "i-1".to_string(),
                name: "n".to_string(),
                ..CreateImage::default()
            })
            .await
            .unwrap();
        assert_eq!(created.image_id, "ami-4");
        let copied = client.copy_image(&CopyImage::default()).await.unwrap();
        assert_eq!(copied.image_id, "ami-5");
        assert!(client.deregister_image("ami-4").await.unwrap().accepted);
        assert_eq!(transport.params(2).get("ImageId"), Some("ami-4"));
    }
}
