use anyhow::{Context, Result};
use clap::Parser;
use cluster_provisioner::{Cluster, ResourceClient};

/// The down subcommand deletes the network and IAM role stack. The control plane and worker
/// groups must be deleted beforehand, otherwise the stack deletion may fail.
#[derive(Debug, Parser)]
pub(crate) struct Down {
    /// Wait for the stack to be deleted before exiting.
    #[clap(long = "wait")]
    wait: bool,
}

impl Down {
    pub(crate) async fn run<C>(self, mut cluster: Cluster<C>) -> Result<()>
    where
        C: ResourceClient,
    {
        let stack_name = cluster.handle().stack_name().to_string();
        cluster
            .delete()
            .await
            .context(format!("Unable to delete stack '{}'", stack_name))?;

        if self.wait {
            cluster.wait_for_deletion().await.context(format!(
                "Stack '{}' was not deleted. (Some artifacts may be left behind)",
                stack_name
            ))?;
            println!("Stack '{}' was deleted.", stack_name);
        } else {
            println!("Deletion of stack '{}' was requested.", stack_name);
        }

        Ok(())
    }
}
