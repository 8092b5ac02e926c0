//! Security groups and ingress rules.

use crate::error::Result;

use super::Ec2Client;
use super::params::{Filter, GroupRef, ParameterSet};
use super::types::{CreateSecurityGroupResponse, DescribeSecurityGroupsResponse, SimpleResponse};

/// `CreateSecurityGroup` request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateSecurityGroup {
    pub name: String,
    pub description: String,
    /// Creates the group in a VPC when set.
    pub vpc_id: Option<String>,
}

/// Source group of an ingress rule, optionally owned by another account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceGroup {
    pub user_id: Option<String>,
    pub group: GroupRef,
}

/// One ingress rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IpPermission {
    pub protocol: String,
    pub from_port: i32,
    pub to_port: i32,
    pub source_ips: Vec<String>,
    pub source_groups: Vec<SourceGroup>,
}

impl IpPermission {
    /// A `tcp` rule for a single port, open to `cidr`.
    pub fn tcp(port: i32, cidr: impl Into<String>) -> Self {
        Self {
            protocol: "tcp".to_string(),
            from_port: port,
            to_port: port,
            source_ips: vec![cidr.into()],
            source_groups: Vec::new(),
        }
    }
}

fn add_ip_permissions(params: &mut ParameterSet, permissions: &[IpPermission]) {
    for (i, perm) in permissions.iter().enumerate() {
        let prefix = format!("IpPermissions.{}", i + 1);
        params.set(format!("{prefix}.IpProtocol"), perm.protocol.as_str());
        params.set(format!("{prefix}.FromPort"), perm.from_port.to_string());
        params.set(format!("{prefix}.ToPort"), perm.to_port.to_string());
        for (j, ip) in perm.source_ips.iter().enumerate() {
            params.set(format!("{prefix}.IpRanges.{}.CidrIp", j + 1), ip.as_str());
        }
        for (j, source) in perm.source_groups.iter().enumerate() {
            let sub = format!("{prefix}.Groups.{}", j + 1);
            params.set_opt(format!("{sub}.UserId"), source.user_id.as_deref());
            match &source.group {
                GroupRef::Id(id) => params.set(format!("{sub}.GroupId"), id.as_str()),
                GroupRef::Name(name) => params.set(format!("{sub}.GroupName"), name.as_str()),
            }
        }
    }
}

fn ingress_params(action: &str, group: &GroupRef, permissions: &[IpPermission]) -> ParameterSet {
    let mut params = ParameterSet::new(action);
    params.set_group(group);
    add_ip_permissions(&mut params, permissions);
    params
}

impl Ec2Client {
    /// Creates a group; the response carries the new id and the requested name.
    pub async fn create_security_group(
        &self,
        request: &CreateSecurityGroup,
    ) -> Result<CreateSecurityGroupResponse> {
        let mut params = ParameterSet::new("CreateSecurityGroup");
        params.set("GroupName", request.name.as_str());
        params.set("GroupDescription", request.description.as_str());
        params.set_opt("VpcId", request.vpc_id.as_deref());

        let mut resp: CreateSecurityGroupResponse = self.query(params).await?;
        resp.group_name.clone_from(&request.name);
        Ok(resp)
    }

    /// Describes groups, optionally limited by reference and filter.
    pub async fn describe_security_groups(
        &self,
        groups: &[GroupRef],
        filter: Option<&Filter>,
    ) -> Result<DescribeSecurityGroupsResponse> {
        let mut params = ParameterSet::new("DescribeSecurityGroups");
        params.add_group_refs("GroupId", "GroupName", groups);
        params.add_filter(filter);
        self.query(params).await
    }

    pub async fn delete_security_group(&self, group: &GroupRef) -> Result<SimpleResponse> {
        let mut params = ParameterSet::new("DeleteSecurityGroup");
        params.set_group(group);
        self.query(params).await
    }

    /// Allows traffic matching `permissions` into `group`.
    pub async fn authorize_security_group_ingress(
        &self,
        group: &GroupRef,
        permissions: &[IpPermission],
    ) -> Result<SimpleResponse> {
        self.query(ingress_params(
            "AuthorizeSecurityGroupIngress",
            group,
            permissions,
        ))
        .await
    }

    /// Removes rules previously authorized with the same values.
    pub async fn revoke_security_group_ingress(
        &self,
        group: &GroupRef,
        permissions: &[IpPermission],
    ) -> Result<SimpleResponse> {
        self.query(ingress_params(
            "RevokeSecurityGroupIngress",
            group,
            permissions,
        ))
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::client;
    use super::*;

    #[test]
    fn ip_permissions_encoding() {
        let params = ingress_params(
            "AuthorizeSecurityGroupIngress",
            &GroupRef::Name("web".to_string()),
            &[
                IpPermission::tcp(22, "10.0.0.0/8"),
                IpPermission {
                    protocol: "udp".to_string(),
                    from_port: 1000,
                    to_port: 2000,
                    source_ips: vec!["1.2.3.4/32".to_string(), "5.6.7.8/32".to_string()],
                    source_groups: vec![
                        SourceGroup {
                            user_id: Some("111122223333".to_string()),
                            group: GroupRef::Id("sg-2".to_string()),
                        },
                        SourceGroup {
                            user_id: None,
                            group: GroupRef::Name("db".to_string()),
                        },
                    ],
                },
            ],
        );

        assert_eq!(params.get("GroupName"), Some("web"));
        assert!(!params.contains_key("GroupId"));
        assert_eq!(params.get("IpPermissions.1.IpProtocol"), Some("tcp"));
        assert_eq!(params.get("IpPermissions.1.FromPort"), Some("22"));
        assert_eq!(params.get("IpPermissions.1.ToPort"), Some("22"));
        assert_eq!(params.get("IpPermissions.1.IpRanges.1.CidrIp"), Some("10.0.0.0/8"));
        assert_eq!(params.get("IpPermissions.2.IpRanges.2.CidrIp"), Some("5.6.7.8/32"));
        assert_eq!(params.get("IpPermissions.2.Groups.1.UserId"), Some("111122223333"));
        assert_eq!(params.get("IpPermissions.2.Groups.1.GroupId"), Some("sg-2"));
        assert!(!params.contains_key("IpPermissions.2.Groups.2.UserId"));
        assert_eq!(params.get("IpPermissions.2.Groups.2.GroupName"), Some("db"));
    }

    #[tokio::test]
    async fn create_fills_name_from_request() {
        let (client, transport) = client();
        transport.ok(
            "<CreateSecurityGroupResponse><requestId>r</requestId><return>true</return>\
             <groupId>sg-7</groupId></CreateSecurityGroupResponse>",
        );
        let resp = client
            .create_security_group(&CreateSecurityGroup {
                name: "coreup".to_string(),
                description: "CoreOS cluster".to_string(),
                vpc_id: None,
            })
            .await
            .unwrap();
        assert_eq!(resp.group_id, "sg-7");
        assert_eq!(resp.group_name, "coreup");

        let params = transport.params(0);
        assert_eq!(params.get("GroupName"), Some("coreup"));
        assert_eq!(params.get("GroupDescription"), Some("CoreOS cluster"));
        assert!(!params.contains_key("VpcId"));
    }

    #[tokio::test]
    async fn describe_mixes_ids_and_names() {
        let (client, transport) = client();
        transport.ok("<DescribeSecurityGroupsResponse><requestId>r</requestId><securityGroupInfo/></DescribeSecurityGroupsResponse>");
        let resp = client
            .describe_security_groups(
                &[
                    GroupRef::Id("sg-1".to_string()),
                    GroupRef::Name("web".to_string()),
                    GroupRef::Id("sg-2".to_string()),
                ],
                None,
            )
            .await
            .unwrap();
        assert!(resp.groups.is_empty());

        let params = transport.params(0);
        assert_eq!(params.get("GroupId.1"), Some("sg-1"));
        assert_eq!(params.get("GroupName.1"), Some("web"));
        assert_eq!(params.get("GroupId.2"), Some("sg-2"));
    }

    #[tokio::test]
    async fn delete_and_revoke_by_id() {
        let (client, transport) = client();
        transport.ok("<R><requestId>r</requestId></R>");
        transport.ok("<R><requestId>r</requestId></R>");
        let group = GroupRef::Id("sg-5".to_string());
        client
            .revoke_security_group_ingress(&group, &[IpPermission::tcp(80, "0.0.0.0/0")])
            .await
            .unwrap();
        client.delete_security_group(&group).await.unwrap();

        let revoke = transport.params(0);
        assert_eq!(revoke.get("Action"), Some("RevokeSecurityGroupIngress"));
        assert_eq!(revoke.get("GroupId"), Some("sg-5"));
        let delete = transport.params(1);
        assert_eq!(delete.get("Action"), Some("DeleteSecurityGroup"));
        assert_eq!(delete.get("GroupId"), Some("sg-5"));
        assert!(!delete.contains_key("GroupName"));
    }
}
