/*!

This module defines the capability the orchestrator needs from a cloud provider. Three resource
families are covered: the network and IAM role stack, the cluster control plane, and worker groups.
Only a status string, the stack's named outputs, and the success or failure of each call are
relied upon, so any provider exposing this shape can be substituted.

!*/

mod error;

pub use error::{ClientError, ClientResult, ErrorMessage};

/// A request to create the network and IAM role stack from a template.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CreateStackRequest {
    pub stack_name: String,
    /// The infrastructure-as-code document. It is passed through without inspection.
    pub template: Vec<u8>,
    pub capabilities: Vec<StackCapability>,
}

/// Acknowledgements that a template creates IAM resources. Templates that declare named roles
/// are rejected by the provider unless both are given.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum StackCapability {
    Iam,
    NamedIam,
}

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct StackDescription {
    pub stack_name: String,
    pub status: String,
    pub outputs: Vec<StackOutput>,
}

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct StackOutput {
    pub key: String,
    pub value: String,
}

impl StackOutput {
    pub fn new<K, V>(key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CreateControlPlaneRequest {
    pub name: String,
    pub subnet_ids: Vec<String>,
    pub role_arn: String,
    pub version: String,
}

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct ControlPlaneDescription {
    pub name: String,
    pub status: String,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CreateWorkerGroupRequest {
    pub name: String,
    pub cluster_name: String,
    pub node_role_arn: String,
    pub subnet_ids: Vec<String>,
    pub scaling: ScalingConfig,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ScalingConfig {
    pub min_size: i32,
    pub desired_size: i32,
    pub max_size: i32,
}

impl ScalingConfig {
    /// Minimum, desired and maximum sizes are all `size`.
    pub fn fixed(size: i32) -> Self {
        Self {
            min_size: size,
            desired_size: size,
            max_size: size,
        }
    }
}

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct WorkerGroupDescription {
    pub name: String,
    pub cluster_name: String,
    pub status: String,
}

/// `ResourceClient` issues requests against the cloud provider. It is injected into the
/// [`Cluster`](crate::Cluster) so that the orchestrator can be exercised without a network. In
/// practice you will use [`AwsClient`](crate::aws::AwsClient).
#[async_trait::async_trait]
pub trait ResourceClient: Send + Sync {
    async fn create_stack(&self, request: CreateStackRequest) -> ClientResult<()>;

    /// Describe the stacks matching `stack_name`. A stack that does not exist yields an empty list.
    async fn describe_stack(&self, stack_name: &str) -> ClientResult<Vec<StackDescription>>;

    async fn delete_stack(&self, stack_name: &str) -> ClientResult<()>;

    async fn create_control_plane(&self, request: CreateControlPlaneRequest) -> ClientResult<()>;

    async fn describe_control_plane(&self, name: &str) -> ClientResult<ControlPlaneDescription>;

    async fn create_worker_group(&self, request: CreateWorkerGroupRequest) -> ClientResult<()>;

    async fn describe_worker_group(
        &self,
        cluster_name: &str,
        name: &str,
    ) -> ClientResult<WorkerGroupDescription>;
}
