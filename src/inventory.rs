//! Compute inventory access
//!
//! Trait-based seam over the two provider calls a scan needs: listing
//! instances and reading an instance's console output. `Ec2Inventory`
//! backs it with the AWS SDK; credentials and region come from the
//! SDK's default provider chain.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_ec2::config::Region;
use aws_sdk_ec2::error::DisplayErrorContext;
use aws_sdk_ec2::Client;
use tracing::debug;

use crate::types::{Instance, ScanError, Tag};

/// Trait for compute providers that expose console output
#[async_trait]
pub trait ComputeInventory: Send + Sync {
    /// List every instance visible to the caller
    async fn list_instances(&self) -> Result<Vec<Instance>, ScanError>;

    /// Fetch the base64 console output for an instance
    ///
    /// Returns `None` when the provider has no buffered output yet.
    async fn console_output(&self, instance_id: &str) -> Result<Option<String>, ScanError>;
}

/// EC2 inventory backed by the AWS SDK
pub struct Ec2Inventory {
    client: Client,
}

impl Ec2Inventory {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the ambient AWS configuration
    ///
    /// `region` and `profile` override the default chain when given.
    pub async fn from_env(region: Option<String>, profile: Option<String>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            debug!(region = %region, "Using region override");
            loader = loader.region(Region::new(region));
        }
        if let Some(profile) = profile {
            debug!(profile = %profile, "Using profile override");
            loader = loader.profile_name(profile);
        }

        let config = loader.load().await;
        Self::new(Client::new(&config))
    }
}

#[async_trait]
impl ComputeInventory for Ec2Inventory {
    async fn list_instances(&self) -> Result<Vec<Instance>, ScanError> {
        debug!("Describing instances");

        let response = self
            .client
            .describe_instances()
            .send()
            .await
            .map_err(|e| ScanError::Inventory(DisplayErrorContext(&e).to_string()))?;

        let instances: Vec<Instance> = response
            .reservations()
            .iter()
            .flat_map(|reservation| reservation.instances())
            .filter_map(instance_from_sdk)
            .collect();

        debug!(count = instances.len(), "Described instances");
        Ok(instances)
    }

    async fn console_output(&self, instance_id: &str) -> Result<Option<String>, ScanError> {
        debug!(instance_id = %instance_id, "Fetching console output");

        let response = self
            .client
            .get_console_output()
            .instance_id(instance_id)
            .send()
            .await
            .map_err(|e| ScanError::ConsoleOutput {
                instance_id: instance_id.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        Ok(response.output().map(str::to_string))
    }
}

/// Convert an SDK instance record, dropping records without an id
fn instance_from_sdk(instance: &aws_sdk_ec2::types::Instance) -> Option<Instance> {
    let id = instance.instance_id()?;

    Some(Instance {
        id: id.to_string(),
        public_address: instance.public_ip_address().map(str::to_string),
        tags: instance
            .tags()
            .iter()
            .map(|tag| Tag::new(tag.key().unwrap_or_default(), tag.value().unwrap_or_default()))
            .collect(),
    })
}
