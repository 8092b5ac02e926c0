//! Elastic IP addresses (VPC).

use crate::error::Result;

use super::Ec2Client;
use super::params::ParameterSet;
use super::types::{AllocateAddressResponse, AssociateAddressResponse, SimpleResponse};

/// `AssociateAddress` request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssociateAddress {
    pub instance_id: String,
    pub allocation_id: String,
    pub allow_reassociation: bool,
}

impl Ec2Client {
    /// Allocates an address; `domain` is `vpc` for VPC addresses.
    pub async fn allocate_address(&self, domain: Option<&str>) -> Result<AllocateAddressResponse> {
        let mut params = ParameterSet::new("AllocateAddress");
        params.set_opt("Domain", domain);
        self.query(params).await
    }

    pub async fn release_address(&self, allocation_id: &str) -> Result<SimpleResponse> {
        let mut params = ParameterSet::new("ReleaseAddress");
        params.set("AllocationId", allocation_id);
        self.query(params).await
    }

    pub async fn associate_address(
        &self,
        request: &AssociateAddress,
    ) -> Result<AssociateAddressResponse> {
        let mut params = ParameterSet::new("AssociateAddress");
        params.set("InstanceId", request.instance_id.as_str());
        params.set("AllocationId", request.allocation_id.as_str());
        params.set_flag("AllowReassociation", request.allow_reassociation);
        self.query(params).await
    }

    pub async fn disassociate_address(&self, association_id: &str) -> Result<SimpleResponse> {
        let mut params = ParameterSet::new("DisassociateAddress");
        params.set("AssociationId", association_id);
        self.query(params).await
    }
}
