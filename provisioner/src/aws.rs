/*!

`aws` implements [`ResourceClient`] with CloudFormation for the network and IAM role stack and EKS
for the control plane and managed node groups.

!*/

use crate::client::{
    ClientError, ClientResult, ControlPlaneDescription, CreateControlPlaneRequest,
    CreateStackRequest, CreateWorkerGroupRequest, ResourceClient, StackCapability,
    StackDescription, StackOutput, WorkerGroupDescription,
};
use aws_config::retry::RetryConfig;
use aws_sdk_cloudformation::error::DescribeStacksError;
use aws_sdk_cloudformation::model::{Capability, Stack};
use aws_sdk_cloudformation::types::SdkError;
use aws_sdk_cloudformation::Region;
use aws_sdk_eks::model::{NodegroupScalingConfig, VpcConfigRequest};
use aws_smithy_types::retry::RetryMode;
use aws_types::SdkConfig;
use log::{debug, info, trace};

/// A [`ResourceClient`] backed by the AWS SDK.
#[derive(Debug, Clone)]
pub struct AwsClient {
    cfn_client: aws_sdk_cloudformation::Client,
    eks_client: aws_sdk_eks::Client,
}

impl AwsClient {
    /// Create clients for `region` using the default credential chain.
    pub async fn new(region: &str) -> Self {
        info!("Creating AWS clients for region '{}'", region);
        let config = aws_config::from_env()
            .retry_config(
                RetryConfig::standard()
                    .with_retry_mode(RetryMode::Adaptive)
                    .with_max_attempts(15),
            )
            .region(Region::new(region.to_string()))
            .load()
            .await;
        Self::from_config(&config)
    }

    pub fn from_config(config: &SdkConfig) -> Self {
        Self {
            cfn_client: aws_sdk_cloudformation::Client::new(config),
            eks_client: aws_sdk_eks::Client::new(config),
        }
    }
}

#[async_trait::async_trait]
impl ResourceClient for AwsClient {
    async fn create_stack(&self, request: CreateStackRequest) -> ClientResult<()> {
        let template_body = String::from_utf8(request.template)
            .map_err(|e| ClientError::Serialization(Some(Box::new(e))))?;
        let capabilities = request
            .capabilities
            .iter()
            .map(|capability| match capability {
                StackCapability::Iam => Capability::CapabilityIam,
                StackCapability::NamedIam => Capability::CapabilityNamedIam,
            })
            .collect();

        trace!("Calling CreateStack for '{}'", request.stack_name);
        self.cfn_client
            .create_stack()
            .stack_name(request.stack_name)
            .template_body(template_body)
            .set_capabilities(Some(capabilities))
            .send()
            .await
            .map_err(ClientError::request_failed)?;
        Ok(())
    }

    async fn describe_stack(&self, stack_name: &str) -> ClientResult<Vec<StackDescription>> {
        trace!("Calling DescribeStacks for '{}'", stack_name);
        let output = match self
            .cfn_client
            .describe_stacks()
            .stack_name(stack_name)
            .send()
            .await
        {
            Ok(output) => output,
            Err(e) if stack_does_not_exist(&e) => {
                debug!("Stack '{}' does not exist", stack_name);
                return Ok(Vec::new());
            }
            Err(e) => return Err(ClientError::request_failed(e)),
        };

        output
            .stacks()
            .unwrap_or_default()
            .iter()
            .map(stack_description)
            .collect()
    }

    async fn delete_stack(&self, stack_name: &str) -> ClientResult<()> {
        trace!("Calling DeleteStack for '{}'", stack_name);
        self.cfn_client
            .delete_stack()
            .stack_name(stack_name)
            .send()
            .await
            .map_err(ClientError::request_failed)?;
        Ok(())
    }

    async fn create_control_plane(&self, request: CreateControlPlaneRequest) -> ClientResult<()> {
        trace!("Calling CreateCluster for '{}'", request.name);
        self.eks_client
            .create_cluster()
            .name(request.name)
            .role_arn(request.role_arn)
            .version(request.version)
            .resources_vpc_config(
                VpcConfigRequest::builder()
                    .set_subnet_ids(Some(request.subnet_ids))
                    .build(),
            )
            .send()
            .await
            .map_err(ClientError::request_failed)?;
        Ok(())
    }

    async fn describe_control_plane(&self, name: &str) -> ClientResult<ControlPlaneDescription> {
        trace!("Calling DescribeCluster for '{}'", name);
        let output = self
            .eks_client
            .describe_cluster()
            .name(name)
            .send()
            .await
            .map_err(ClientError::request_failed)?;
        let status = output
            .cluster()
            .ok_or_else(|| ClientError::missing_data(format!("Cluster '{}' missing", name)))?
            .status()
            .ok_or_else(|| {
                ClientError::missing_data(format!("Cluster '{}' missing status field", name))
            })?;

        Ok(ControlPlaneDescription {
            name: name.to_string(),
            status: status.as_str().to_string(),
        })
    }

    async fn create_worker_group(&self, request: CreateWorkerGroupRequest) -> ClientResult<()> {
        trace!(
            "Calling CreateNodegroup for '{}' in cluster '{}'",
            request.name,
            request.cluster_name
        );
        self.eks_client
            .create_nodegroup()
            .cluster_name(request.cluster_name)
            .nodegroup_name(request.name)
            .node_role(request.node_role_arn)
            .set_subnets(Some(request.subnet_ids))
            .scaling_config(
                NodegroupScalingConfig::builder()
                    .min_size(request.scaling.min_size)
                    .desired_size(request.scaling.desired_size)
                    .max_size(request.scaling.max_size)
                    .build(),
            )
            .send()
            .await
            .map_err(ClientError::request_failed)?;
        Ok(())
    }

    async fn describe_worker_group(
        &self,
        cluster_name: &str,
        name: &str,
    ) -> ClientResult<WorkerGroupDescription> {
        trace!(
            "Calling DescribeNodegroup for '{}' in cluster '{}'",
            name,
            cluster_name
        );
        let output = self
            .eks_client
            .describe_nodegroup()
            .cluster_name(cluster_name)
            .nodegroup_name(name)
            .send()
            .await
            .map_err(ClientError::request_failed)?;
        let status = output
            .nodegroup()
            .ok_or_else(|| ClientError::missing_data(format!("Nodegroup '{}' missing", name)))?
            .status()
            .ok_or_else(|| {
                ClientError::missing_data(format!("Nodegroup '{}' missing status field", name))
            })?;

        Ok(WorkerGroupDescription {
            name: name.to_string(),
            cluster_name: cluster_name.to_string(),
            status: status.as_str().to_string(),
        })
    }
}

fn stack_description(stack: &Stack) -> ClientResult<StackDescription> {
    let stack_name = stack
        .stack_name()
        .ok_or_else(|| ClientError::missing_data("Stack missing name field"))?;
    let status = stack.stack_status().ok_or_else(|| {
        ClientError::missing_data(format!("Stack '{}' missing status field", stack_name))
    })?;
    let outputs = stack
        .outputs()
        .unwrap_or_default()
        .iter()
        .filter_map(|output| match (output.output_key(), output.output_value()) {
            (Some(key), Some(value)) => Some(StackOutput::new(key, value)),
            _ => None,
        })
        .collect();

    Ok(StackDescription {
        stack_name: stack_name.to_string(),
        status: status.as_str().to_string(),
        outputs,
    })
}

/// CloudFormation answers `DescribeStacks` for an unknown stack with a validation error rather
/// than an empty list.
fn stack_does_not_exist(error: &SdkError<DescribeStacksError>) -> bool {
    if let SdkError::ServiceError(service_error) = error {
        let err = service_error.err();
        return err.code() == Some("ValidationError")
            && err
                .message()
                .map(|message| message.contains("does not exist"))
                .unwrap_or(false);
    }
    false
}
