//! Resource tags.

use crate::error::Result;

use super::Ec2Client;
use super::params::ParameterSet;
use super::types::{SimpleResponse, Tag};

impl Ec2Client {
    /// Adds or overwrites `tags` on every resource in `resource_ids`.
    pub async fn create_tags(&self, resource_ids: &[&str], tags: &[Tag]) -> Result<SimpleResponse> {
        let mut params = ParameterSet::new("CreateTags");
        params.add_list("ResourceId", resource_ids);
        params.add_tags(tags);
        self.query(params).await
    }
}
