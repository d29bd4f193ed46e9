/*!

`cluster-provisioner` drives a managed Kubernetes cluster to completion on a cloud provider. A
network and IAM role stack is created first, then the control plane bound to the stack's subnets,
then any number of worker groups. Every stage waits for its resources to converge with a bounded,
fixed-interval poll.

The cloud provider is injected as a [`ResourceClient`]. [`aws::AwsClient`] talks to CloudFormation
and EKS, and tests provide their own in-memory implementations.

!*/

pub mod aws;
pub mod client;
mod cluster;
pub mod config;
pub mod constants;
mod error;
pub mod poll;
pub mod stage;

pub use client::{ClientError, ClientResult, ResourceClient};
pub use cluster::{Cluster, ClusterHandle, ClusterState};
pub use config::ClusterConfig;
pub use error::{Error, Result};
pub use stage::foundation::StackOutputs;
pub use stage::CreatedResources;
