use crate::client::{CreateWorkerGroupRequest, ResourceClient, ScalingConfig};
use crate::constants::{NODEGROUP_ACTIVE, NODEGROUP_FAILED_STATUSES, NODEGROUP_SIZE};
use crate::error::{RequestSnafu, Result};
use crate::poll::{wait_for, PollPolicy, Target};
use crate::stage::CreatedResources;
use log::info;
use snafu::ResultExt;

/// What every worker group of one [`create_worker_groups`] call shares.
#[derive(Debug, Clone, Copy)]
pub struct WorkerGroupTarget<'a> {
    pub cluster_name: &'a str,
    pub node_role_arn: &'a str,
    /// Worker groups are only placed in public subnets.
    pub public_subnet_ids: &'a [String],
}

/// Create one worker group per name and wait for all of them to become active.
///
/// Create requests are issued one at a time. The first rejected request stops the stage before
/// anything is polled, and nothing that was already created is rolled back. Every name whose
/// create request was accepted is recorded in `created`, even when a later step fails.
///
/// Readiness is then awaited one group at a time, each with the full `policy.timeout`, so the
/// worst case wait is `names.len()` timeouts.
pub async fn create_worker_groups<C>(
    client: &C,
    names: &[String],
    target: WorkerGroupTarget<'_>,
    policy: PollPolicy,
    created: &mut CreatedResources,
) -> Result<()>
where
    C: ResourceClient,
{
    for name in names {
        info!(
            "Creating worker group '{}' for cluster '{}'",
            name, target.cluster_name
        );
        client
            .create_worker_group(CreateWorkerGroupRequest {
                name: name.clone(),
                cluster_name: target.cluster_name.to_string(),
                node_role_arn: target.node_role_arn.to_string(),
                subnet_ids: target.public_subnet_ids.to_vec(),
                scaling: ScalingConfig::fixed(NODEGROUP_SIZE),
            })
            .await
            .context(RequestSnafu {
                action: format!("create worker group '{}'", name),
            })?;
        created.worker_groups.push(name.clone());
    }

    for name in names {
        info!("Waiting for worker group '{}' to become active", name);
        let cluster_name = target.cluster_name;
        let name = name.as_str();
        wait_for(
            &format!("worker group '{}'", name),
            Target::new(NODEGROUP_ACTIVE, NODEGROUP_FAILED_STATUSES),
            policy,
            || async move {
                client
                    .describe_worker_group(cluster_name, name)
                    .await
                    .context(RequestSnafu {
                        action: format!("describe worker group '{}'", name),
                    })
                    .map(|description| description.status)
            },
        )
        .await?;
    }

    Ok(())
}
