/*!

The `cluster` module defines the [`Cluster`] orchestrator, which composes the stages in dependency
order: network and IAM roles, then the control plane, then worker groups.

!*/

use crate::client::ResourceClient;
use crate::config::ClusterConfig;
use crate::error::{InvalidStateSnafu, RequestSnafu, Result};
use crate::poll::PollPolicy;
use crate::stage::control_plane::{control_plane_subnets, create_control_plane};
use crate::stage::foundation::{create_foundation, wait_for_stack_deletion, StackOutputs};
use crate::stage::worker_groups::{create_worker_groups, WorkerGroupTarget};
use crate::stage::CreatedResources;
use log::{info, warn};
use snafu::ResultExt;
use std::fmt::{Display, Formatter};

/// Where a [`Cluster`] is in its lifecycle.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ClusterState {
    /// Nothing has been requested from the provider.
    Unprovisioned,
    /// The network and IAM role stack is complete.
    NetworkReady,
    /// The control plane is active and worker groups can be added.
    ControlPlaneReady,
    /// At least one call to add worker groups has completed. More can be added.
    Operational,
    /// The stack delete request was accepted.
    Deleting,
    /// The stack is gone.
    Deleted,
}

impl Display for ClusterState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ClusterState::Unprovisioned => "unprovisioned",
            ClusterState::NetworkReady => "network ready",
            ClusterState::ControlPlaneReady => "control plane ready",
            ClusterState::Operational => "operational",
            ClusterState::Deleting => "deleting",
            ClusterState::Deleted => "deleted",
        };
        Display::fmt(s, f)
    }
}

/// The client side record of one provisioning session. Identifiers derived from the stack outputs
/// are empty until the network stage completes and are never changed afterwards. The cloud
/// resources themselves belong to the account; the handle only refers to them by name and ARN.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ClusterHandle {
    cluster_name: String,
    stack_name: String,
    region: String,
    version: String,
    public_subnet_ids: Vec<String>,
    private_subnet_ids: Vec<String>,
    cluster_role_arn: String,
    node_role_arn: String,
    created: CreatedResources,
}

impl ClusterHandle {
    pub fn new(config: &ClusterConfig) -> Self {
        Self {
            cluster_name: config.name.clone(),
            stack_name: config.stack_name(),
            region: config.region.clone(),
            version: config.version.clone(),
            public_subnet_ids: Vec::new(),
            private_subnet_ids: Vec::new(),
            cluster_role_arn: String::new(),
            node_role_arn: String::new(),
            created: CreatedResources::default(),
        }
    }

    fn set_outputs(&mut self, outputs: StackOutputs) {
        self.public_subnet_ids = outputs.public_subnet_ids;
        self.private_subnet_ids = outputs.private_subnet_ids;
        self.cluster_role_arn = outputs.cluster_role_arn;
        self.node_role_arn = outputs.node_role_arn;
    }

    pub fn cluster_name(&self) -> &str {
        &self.cluster_name
    }

    pub fn stack_name(&self) -> &str {
        &self.stack_name
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn public_subnet_ids(&self) -> &[String] {
        &self.public_subnet_ids
    }

    pub fn private_subnet_ids(&self) -> &[String] {
        &self.private_subnet_ids
    }

    pub fn cluster_role_arn(&self) -> &str {
        &self.cluster_role_arn
    }

    pub fn node_role_arn(&self) -> &str {
        &self.node_role_arn
    }

    /// Everything the provider has accepted a create request for so far.
    pub fn created(&self) -> &CreatedResources {
        &self.created
    }
}

/// `Cluster` drives one cluster through its lifecycle using the injected [`ResourceClient`].
///
/// Nothing is rolled back when a stage fails. The handle keeps what had been created up to that
/// point (see [`ClusterHandle::created`]) and cleanup is left to the caller, typically by calling
/// [`Cluster::delete`].
pub struct Cluster<C>
where
    C: ResourceClient,
{
    client: C,
    handle: ClusterHandle,
    state: ClusterState,
    stack_policy: PollPolicy,
    cluster_policy: PollPolicy,
}

impl<C> Cluster<C>
where
    C: ResourceClient,
{
    /// Create the handle for the cluster described by `config`. No request is made.
    pub fn new(client: C, config: &ClusterConfig) -> Self {
        Self {
            client,
            handle: ClusterHandle::new(config),
            state: ClusterState::Unprovisioned,
            stack_policy: config.stack_policy(),
            cluster_policy: config.cluster_policy(),
        }
    }

    pub fn handle(&self) -> &ClusterHandle {
        &self.handle
    }

    pub fn state(&self) -> ClusterState {
        self.state
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Create the network and IAM role stack from `template` and then the control plane in the
    /// stack's subnets. The first failure is returned immediately.
    pub async fn provision(&mut self, template: &[u8]) -> Result<()> {
        self.expect_state("provision", &[ClusterState::Unprovisioned])?;
        info!(
            "Provisioning cluster '{}' in '{}'",
            self.handle.cluster_name, self.handle.region
        );

        let outputs = create_foundation(
            &self.client,
            &self.handle.stack_name,
            template,
            self.stack_policy,
            &mut self.handle.created,
        )
        .await?;
        self.handle.set_outputs(outputs);
        self.state = ClusterState::NetworkReady;
        info!("Stack '{}' is complete", self.handle.stack_name);

        let subnet_ids =
            control_plane_subnets(&self.handle.public_subnet_ids, &self.handle.private_subnet_ids);
        create_control_plane(
            &self.client,
            &self.handle.cluster_name,
            subnet_ids,
            &self.handle.cluster_role_arn,
            &self.handle.version,
            self.cluster_policy,
            &mut self.handle.created,
        )
        .await?;
        self.state = ClusterState::ControlPlaneReady;
        info!("Control plane '{}' is active", self.handle.cluster_name);
        Ok(())
    }

    /// Add worker groups to an active control plane. This may be called any number of times.
    pub async fn add_worker_groups<I, S>(&mut self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expect_state(
            "add worker groups",
            &[ClusterState::ControlPlaneReady, ClusterState::Operational],
        )?;
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Ok(());
        }

        create_worker_groups(
            &self.client,
            &names,
            WorkerGroupTarget {
                cluster_name: &self.handle.cluster_name,
                node_role_arn: &self.handle.node_role_arn,
                public_subnet_ids: &self.handle.public_subnet_ids,
            },
            self.cluster_policy,
            &mut self.handle.created,
        )
        .await?;
        self.state = ClusterState::Operational;
        info!(
            "Worker groups {:?} of cluster '{}' are active",
            names, self.handle.cluster_name
        );
        Ok(())
    }

    /// Request deletion of the network and IAM role stack.
    ///
    /// This does not delete the control plane or worker groups first. If they still exist, the
    /// provider may refuse to remove the resources they depend on, so callers that added them should
    /// delete them before calling this.
    pub async fn delete(&mut self) -> Result<()> {
        self.expect_state(
            "delete",
            &[
                ClusterState::Unprovisioned,
                ClusterState::NetworkReady,
                ClusterState::ControlPlaneReady,
                ClusterState::Operational,
            ],
        )?;

        let created = &self.handle.created;
        if created.control_plane.is_some() || !created.worker_groups.is_empty() {
            warn!(
                "Deleting stack '{}' while control plane {:?} and worker groups {:?} may still \
                depend on it",
                self.handle.stack_name, created.control_plane, created.worker_groups
            );
        }

        info!("Deleting stack '{}'", self.handle.stack_name);
        self.client
            .delete_stack(&self.handle.stack_name)
            .await
            .context(RequestSnafu {
                action: format!("delete stack '{}'", self.handle.stack_name),
            })?;
        self.state = ClusterState::Deleting;
        Ok(())
    }

    /// Wait for a stack deletion requested by [`Cluster::delete`] to finish.
    pub async fn wait_for_deletion(&mut self) -> Result<()> {
        self.expect_state("wait for deletion", &[ClusterState::Deleting])?;
        wait_for_stack_deletion(&self.client, &self.handle.stack_name, self.stack_policy).await?;
        self.state = ClusterState::Deleted;
        info!("Stack '{}' is deleted", self.handle.stack_name);
        Ok(())
    }

    fn expect_state(&self, operation: &'static str, allowed: &[ClusterState]) -> Result<()> {
        snafu::ensure!(
            allowed.contains(&self.state),
            InvalidStateSnafu {
                operation,
                state: self.state,
            }
        );
        Ok(())
    }
}
