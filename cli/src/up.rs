use anyhow::{Context, Result};
use clap::Parser;
use cluster_provisioner::{Cluster, ResourceClient};
use log::error;
use std::path::PathBuf;

/// The up subcommand provisions the network stack and control plane, then adds worker groups.
#[derive(Debug, Parser)]
pub(crate) struct Up {
    /// Path to the CloudFormation template that creates the VPC, subnets and IAM roles.
    #[clap(long = "template", short = 't')]
    template: PathBuf,

    /// The name of a worker group to add once the control plane is active. May be repeated.
    #[clap(long = "worker-group", short = 'w')]
    worker_groups: Vec<String>,
}

impl Up {
    pub(crate) async fn run<C>(self, mut cluster: Cluster<C>) -> Result<()>
    where
        C: ResourceClient,
    {
        let template = tokio::fs::read(&self.template).await.context(format!(
            "Unable to read template '{}'",
            self.template.display()
        ))?;

        let result = match cluster.provision(&template).await {
            Ok(()) => cluster.add_worker_groups(self.worker_groups).await,
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            error!(
                "Provisioning stopped while the cluster was {}, resources left behind: {:?}",
                cluster.state(),
                cluster.handle().created()
            );
            return Err(e).context(format!(
                "Unable to provision cluster '{}'",
                cluster.handle().cluster_name()
            ));
        }

        let handle = cluster.handle();
        println!(
            "Cluster '{}' is {} in '{}'",
            handle.cluster_name(),
            cluster.state(),
            handle.region()
        );
        println!("  stack: {}", handle.stack_name());
        println!("  public subnets: {}", handle.public_subnet_ids().join(","));
        println!("  private subnets: {}", handle.private_subnet_ids().join(","));
        println!("  cluster role: {}", handle.cluster_role_arn());
        println!("  node role: {}", handle.node_role_arn());
        println!("  worker groups: {}", handle.created().worker_groups.join(","));

        Ok(())
    }
}
