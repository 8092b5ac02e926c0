//! Instance operations

use crate::error::Result;
use crate::types::Operation;

use super::template::InstanceTemplate;
use super::types::{Instance, InstanceList};
use super::{GceClient, PROVIDER};

impl GceClient {
    /// Inserts an instance into the client zone.
    pub async fn insert_instance(&self, instance: &Instance) -> Result<Operation> {
        log::info!("[{PROVIDER}] Inserting instance {}", instance.name);
        self.post(&format!("zones/{}/instances", self.zone), instance)
            .await
    }

    pub async fn delete_instance(&self, name: &str) -> Result<Operation> {
        log::info!("[{PROVIDER}] Deleting instance {name}");
        self.delete(&format!("zones/{}/instances/{name}", self.zone))
            .await
    }

    /// Lists instances of the client zone, following page tokens.
    ///
    /// `filter` uses the list filter syntax, e.g. `name eq coreup-.*`.
    pub async fn list_instances(&self, filter: Option<&str>) -> Result<Vec<Instance>> {
        let path = format!("zones/{}/instances", self.zone);
        let mut instances = Vec::new();
        let mut page_token = String::new();
        loop {
            let mut query = Vec::new();
            if let Some(filter) = filter {
                query.push(("filter", filter));
            }
            if !page_token.is_empty() {
                query.push(("pageToken", page_token.as_str()));
            }
            let page: InstanceList = self.get(&path, &query).await?;
            instances.extend(page.items);
            if page.next_page_token.is_empty() {
                break;
            }
            page_token = page.next_page_token;
        }
        Ok(instances)
    }

    /// Inserts `count` instances built from `template`, named
    /// `{cluster}-{unix_time}-{i}`. Stops at the first failed insert.
    pub async fn run_instances(
        &self,
        template: &InstanceTemplate,
        count: usize,
    ) -> Result<Vec<Operation>> {
        let unix_time = self.clock.now().timestamp();
        let mut operations = Vec::with_capacity(count);
        for i in 0..count {
            let instance = template.build(
                template.instance_name(unix_time, i),
                &self.project,
                &self.zone,
            );
            operations.push(self.insert_instance(&instance).await?);
        }
        Ok(operations)
    }

    /// Deletes every instance whose name matches `{prefix}.*`.
    ///
    /// Returns the delete operations; stops at the first failed delete.
    pub async fn terminate_matching(&self, prefix: &str) -> Result<Vec<Operation>> {
        let filter = format!("name eq {prefix}.*");
        let instances = self.list_instances(Some(&filter)).await?;
        log::debug!("[{PROVIDER}] {} instance(s) match '{filter}'", instances.len());

        let mut operations = Vec::with_capacity(instances.len());
        for instance in &instances {
            operations.push(self.delete_instance(&instance.name).await?);
        }
        Ok(operations)
    }

    /// External addresses of the instances whose name matches `{prefix}.*`.
    pub async fn list_nat_ips(&self, prefix: &str) -> Result<Vec<String>> {
        let filter = format!("name eq {prefix}.*");
        Ok(self
            .list_instances(Some(&filter))
            .await?
            .iter()
            .filter_map(Instance::nat_ip)
            .map(str::to_string)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::client;
    use super::*;
    use crate::http_client::HttpMethod;

    #[tokio::test]
    async fn insert_posts_to_zone() {
        let (client, transport) = client();
        transport.ok(r#"{"name": "operation-1", "status": "PENDING", "operationType": "insert"}"#);
        let instance = InstanceTemplate::new("web").build("web-0", "p", "asia-east1-c");
        let op = client.insert_instance(&instance).await.unwrap();
        assert_eq!(op.operation_type, "insert");

        let request = transport.request(0);
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(
            request.url,
            "https://www.googleapis.com/compute/v1/projects/p/zones/asia-east1-c/instances"
        );
        let body: serde_json::Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["name"], "web-0");
    }

    #[tokio::test]
    async fn run_names_instances_by_time_and_index() {
        let (client, transport) = client();
        transport.ok(r#"{"name": "op-a"}"#);
        transport.ok(r#"{"name": "op-b"}"#);
        let ops = client
            .run_instances(&InstanceTemplate::new("web"), 2)
            .await
            .unwrap();
        assert_eq!(ops.len(), 2);

        let names: Vec<String> = (0..2)
            .map(|n| {
                let body: serde_json::Value =
                    serde_json::from_str(transport.request(n).body.as_deref().unwrap()).unwrap();
                body["name"].as_str().unwrap().to_string()
            })
            .collect();
        assert_eq!(names, ["web-1417716000-0", "web-1417716000-1"]);
    }

    #[tokio::test]
    async fn list_follows_page_tokens() {
        let (client, transport) = client();
        transport.ok(r#"{"items": [{"name": "a"}], "nextPageToken": "t2"}"#);
        transport.ok(r#"{"items": [{"name": "b"}]}"#);
        let instances = client.list_instances(None).await.unwrap();
        let names: Vec<&str> = instances.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
        assert!(!transport.request(0).url.contains('?'));
        assert!(transport.request(1).url.ends_with("/instances?pageToken=t2"));
    }

    #[tokio::test]
    async fn terminate_matching_deletes_each_match() {
        let (client, transport) = client();
        transport.ok(r#"{"items": [{"name": "web-1-0"}, {"name": "web-1-1"}]}"#);
        transport.ok(r#"{"name": "op-0", "operationType": "delete"}"#);
        transport.ok(r#"{"name": "op-1", "operationType": "delete"}"#);

        let ops = client.terminate_matching("web").await.unwrap();
        assert_eq!(ops.len(), 2);
        assert!(transport.request(0).url.ends_with("/instances?filter=name+eq+web.*"));
        let second = transport.request(2);
        assert_eq!(second.method, HttpMethod::Delete);
        assert!(second.url.ends_with("/zones/asia-east1-c/instances/web-1-1"));
    }

    #[tokio::test]
    async fn terminate_matching_nothing() {
        let (client, transport) = client();
        transport.ok(r#"{"kind": "compute#instanceList"}"#);
        assert!(client.terminate_matching("none").await.unwrap().is_empty());
        assert_eq!(transport.count(), 1);
    }

    #[tokio::test]
    async fn nat_ips_skip_instances_without_address() {
        let (client, transport) = client();
        transport.ok(
            r#"{"items": [
                {"name": "web-0", "networkInterfaces": [{"accessConfigs": [{"natIP": "104.155.1.1"}]}]},
                {"name": "web-1", "networkInterfaces": [{"accessConfigs": []}]}
            ]}"#,
        );
        assert_eq!(client.list_nat_ips("web").await.unwrap(), ["104.155.1.1"]);
    }
}
