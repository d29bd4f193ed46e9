use crate::client::{
    CreateStackRequest, ResourceClient, StackCapability, StackDescription, StackOutput,
};
use crate::constants::{
    OUTPUT_CLUSTER_ROLE_ARN, OUTPUT_NODE_ROLE_ARN, OUTPUT_PRIVATE_SUBNETS, OUTPUT_PUBLIC_SUBNETS,
    STACK_CREATE_COMPLETE, STACK_CREATE_FAILED_STATUSES, STACK_DELETE_COMPLETE,
    STACK_DELETE_FAILED_STATUSES,
};
use crate::error::{MissingOutputSnafu, NotFoundSnafu, RequestSnafu, Result};
use crate::poll::{wait_for, PollPolicy, Target};
use crate::stage::CreatedResources;
use log::{debug, info, trace};
use snafu::{OptionExt, ResultExt};

/// The values the network and IAM role stack hands to the later stages.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct StackOutputs {
    /// In the order the provider returned them.
    pub public_subnet_ids: Vec<String>,
    /// In the order the provider returned them.
    pub private_subnet_ids: Vec<String>,
    pub cluster_role_arn: String,
    pub node_role_arn: String,
}

impl StackOutputs {
    /// Pick the four recognized outputs out of a stack description. Outputs with any other key are
    /// ignored so that templates can declare more than we consume.
    pub fn from_outputs(stack_name: &str, outputs: &[StackOutput]) -> Result<Self> {
        let mut public_subnet_ids = None;
        let mut private_subnet_ids = None;
        let mut cluster_role_arn = None;
        let mut node_role_arn = None;

        for output in outputs {
            match output.key.as_str() {
                OUTPUT_PUBLIC_SUBNETS => public_subnet_ids = Some(split_ids(&output.value)),
                OUTPUT_PRIVATE_SUBNETS => private_subnet_ids = Some(split_ids(&output.value)),
                OUTPUT_CLUSTER_ROLE_ARN => cluster_role_arn = Some(output.value.clone()),
                OUTPUT_NODE_ROLE_ARN => node_role_arn = Some(output.value.clone()),
                other => trace!("Ignoring output '{}' of stack '{}'", other, stack_name),
            }
        }

        Ok(Self {
            public_subnet_ids: public_subnet_ids.context(MissingOutputSnafu {
                stack_name,
                key: OUTPUT_PUBLIC_SUBNETS,
            })?,
            private_subnet_ids: private_subnet_ids.context(MissingOutputSnafu {
                stack_name,
                key: OUTPUT_PRIVATE_SUBNETS,
            })?,
            cluster_role_arn: cluster_role_arn.context(MissingOutputSnafu {
                stack_name,
                key: OUTPUT_CLUSTER_ROLE_ARN,
            })?,
            node_role_arn: node_role_arn.context(MissingOutputSnafu {
                stack_name,
                key: OUTPUT_NODE_ROLE_ARN,
            })?,
        })
    }
}

/// Subnet outputs are comma-joined ids.
fn split_ids(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

/// Create the network and IAM role stack from `template`, wait for it to complete, and return its
/// outputs. The stack is recorded in `created` as soon as the provider accepts the request.
pub async fn create_foundation<C>(
    client: &C,
    stack_name: &str,
    template: &[u8],
    policy: PollPolicy,
    created: &mut CreatedResources,
) -> Result<StackOutputs>
where
    C: ResourceClient,
{
    info!("Creating stack '{}'", stack_name);
    client
        .create_stack(CreateStackRequest {
            stack_name: stack_name.to_string(),
            template: template.to_vec(),
            capabilities: vec![StackCapability::Iam, StackCapability::NamedIam],
        })
        .await
        .context(RequestSnafu {
            action: format!("create stack '{}'", stack_name),
        })?;
    created.stack = Some(stack_name.to_string());

    info!("Waiting for stack '{}' to be created", stack_name);
    wait_for(
        &format!("stack '{}'", stack_name),
        Target::new(STACK_CREATE_COMPLETE, STACK_CREATE_FAILED_STATUSES),
        policy,
        || async move { Ok(describe_stack(client, stack_name).await?.status) },
    )
    .await?;

    let stack = describe_stack(client, stack_name).await?;
    let outputs = StackOutputs::from_outputs(stack_name, &stack.outputs)?;
    debug!("Outputs of stack '{}': {:?}", stack_name, outputs);
    Ok(outputs)
}

/// Wait until the stack is deleted. A stack that can no longer be found counts as deleted.
pub async fn wait_for_stack_deletion<C>(
    client: &C,
    stack_name: &str,
    policy: PollPolicy,
) -> Result<()>
where
    C: ResourceClient,
{
    info!("Waiting for stack '{}' to be deleted", stack_name);
    wait_for(
        &format!("stack '{}'", stack_name),
        Target::new(STACK_DELETE_COMPLETE, STACK_DELETE_FAILED_STATUSES),
        policy,
        || async move {
            let stacks = client.describe_stack(stack_name).await.context(RequestSnafu {
                action: format!("describe stack '{}'", stack_name),
            })?;
            Ok(stacks
                .into_iter()
                .next()
                .map(|stack| stack.status)
                .unwrap_or_else(|| STACK_DELETE_COMPLETE.to_string()))
        },
    )
    .await
}

/// Describe the stack, failing if the provider does not return one.
async fn describe_stack<C>(client: &C, stack_name: &str) -> Result<StackDescription>
where
    C: ResourceClient,
{
    client
        .describe_stack(stack_name)
        .await
        .context(RequestSnafu {
            action: format!("describe stack '{}'", stack_name),
        })?
        .into_iter()
        .next()
        .context(NotFoundSnafu {
            what: format!("stack '{}'", stack_name),
        })
}
