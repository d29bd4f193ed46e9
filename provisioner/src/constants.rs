use std::time::Duration;

/// The default region for the cluster.
pub const DEFAULT_REGION: &str = "us-west-2";
/// The default control plane version.
pub const DEFAULT_VERSION: &str = "1.24";
/// The network and IAM role stack is named `<STACK_NAME_PREFIX><cluster name>`.
pub const STACK_NAME_PREFIX: &str = "eksctl-";

pub const STACK_POLL_INTERVAL: Duration = Duration::from_secs(15);
pub const STACK_POLL_TIMEOUT: Duration = Duration::from_secs(10 * 60);
pub const CLUSTER_POLL_INTERVAL: Duration = Duration::from_secs(30);
pub const CLUSTER_POLL_TIMEOUT: Duration = Duration::from_secs(30 * 60);

// Stack outputs declared by the network and IAM role template.
pub const OUTPUT_PUBLIC_SUBNETS: &str = "PublicSubnetIds";
pub const OUTPUT_PRIVATE_SUBNETS: &str = "PrivateSubnetIds";
pub const OUTPUT_CLUSTER_ROLE_ARN: &str = "ClusterRoleARN";
pub const OUTPUT_NODE_ROLE_ARN: &str = "NodeRoleARN";

pub const STACK_CREATE_COMPLETE: &str = "CREATE_COMPLETE";
pub const STACK_DELETE_COMPLETE: &str = "DELETE_COMPLETE";
pub const STACK_CREATE_FAILED_STATUSES: &[&str] = &[
    "CREATE_FAILED",
    "ROLLBACK_IN_PROGRESS",
    "ROLLBACK_COMPLETE",
    "ROLLBACK_FAILED",
];
pub const STACK_DELETE_FAILED_STATUSES: &[&str] = &["DELETE_FAILED"];

pub const CLUSTER_ACTIVE: &str = "ACTIVE";
pub const CLUSTER_FAILED_STATUSES: &[&str] = &["FAILED"];

pub const NODEGROUP_ACTIVE: &str = "ACTIVE";
pub const NODEGROUP_FAILED_STATUSES: &[&str] = &["CREATE_FAILED", "DEGRADED"];

/// Worker groups are created with min = desired = max = `NODEGROUP_SIZE` instances.
pub const NODEGROUP_SIZE: i32 = 1;
