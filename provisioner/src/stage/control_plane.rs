use crate::client::{CreateControlPlaneRequest, ResourceClient};
use crate::constants::{CLUSTER_ACTIVE, CLUSTER_FAILED_STATUSES};
use crate::error::{RequestSnafu, Result};
use crate::poll::{wait_for, PollPolicy, Target};
use crate::stage::CreatedResources;
use log::info;
use snafu::ResultExt;

/// The subnets the control plane is bound to: the public subnets followed by the private ones.
pub fn control_plane_subnets(public: &[String], private: &[String]) -> Vec<String> {
    public.iter().chain(private.iter()).cloned().collect()
}

/// Create the control plane and wait for it to become active. The control plane is recorded in
/// `created` as soon as the provider accepts the request.
///
/// `subnet_ids` is not validated here. If it is empty the provider's rejection is returned as-is.
pub async fn create_control_plane<C>(
    client: &C,
    name: &str,
    subnet_ids: Vec<String>,
    role_arn: &str,
    version: &str,
    policy: PollPolicy,
    created: &mut CreatedResources,
) -> Result<()>
where
    C: ResourceClient,
{
    info!(
        "Creating control plane '{}' with version '{}' in {} subnets",
        name,
        version,
        subnet_ids.len()
    );
    client
        .create_control_plane(CreateControlPlaneRequest {
            name: name.to_string(),
            subnet_ids,
            role_arn: role_arn.to_string(),
            version: version.to_string(),
        })
        .await
        .context(RequestSnafu {
            action: format!("create control plane '{}'", name),
        })?;
    created.control_plane = Some(name.to_string());

    info!("Waiting for control plane '{}' to become active", name);
    wait_for(
        &format!("control plane '{}'", name),
        Target::new(CLUSTER_ACTIVE, CLUSTER_FAILED_STATUSES),
        policy,
        || async move {
            client
                .describe_control_plane(name)
                .await
                .context(RequestSnafu {
                    action: format!("describe control plane '{}'", name),
                })
                .map(|description| description.status)
        },
    )
    .await
}

#[test]
fn public_subnets_come_first() {
    let public = vec!["pub-2".to_string(), "pub-1".to_string()];
    let private = vec!["priv-1".to_string()];
    assert_eq!(
        control_plane_subnets(&public, &private),
        vec!["pub-2", "pub-1", "priv-1"]
    );
    assert!(control_plane_subnets(&[], &[]).is_empty());
}
