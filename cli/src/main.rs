/*!

This is the command line interface for provisioning a managed Kubernetes cluster and tearing down
its network stack.

!*/

mod down;
mod up;

use anyhow::{Context, Result};
use clap::Parser;
use cluster_provisioner::aws::AwsClient;
use cluster_provisioner::constants::{DEFAULT_REGION, DEFAULT_VERSION};
use cluster_provisioner::{Cluster, ClusterConfig};
use env_logger::Builder;
use log::LevelFilter;
use std::path::PathBuf;

/// The crates whose log output is shown at `--log-level`.
const LOG_MODULES: [&str; 2] = [env!("CARGO_CRATE_NAME"), "cluster_provisioner"];

/// The command line interface for provisioning EKS clusters.
#[derive(Debug, Parser)]
#[clap(author, version, about)]
struct Args {
    /// Set logging verbosity [trace|debug|info|warn|error]. If the environment variable `RUST_LOG`
    /// is present, it overrides the default logging behavior. See https://docs.rs/env_logger/latest
    #[clap(long = "log-level", default_value = "info")]
    log_level: LevelFilter,
    /// Path to a YAML cluster configuration file.
    #[clap(long = "config", short = 'f')]
    config: Option<PathBuf>,
    /// The name of the cluster. Required unless it is given in `--config`.
    #[clap(long = "name")]
    name: Option<String>,
    /// The region to create the cluster in. Overrides `--config`.
    #[clap(long = "region")]
    region: Option<String>,
    /// The control plane version. Overrides `--config`.
    #[clap(long = "kubernetes-version")]
    kubernetes_version: Option<String>,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Parser)]
enum Command {
    /// Create the network stack, the control plane and any worker groups.
    Up(up::Up),
    /// Delete the network stack. The control plane and worker groups are not deleted.
    Down(down::Down),
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logger(args.log_level);
    if let Err(e) = run(args).await {
        eprintln!("{:?}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let config = cluster_config(&args)?;
    let client = AwsClient::new(&config.region).await;
    let cluster = Cluster::new(client, &config);
    match args.command {
        Command::Up(up) => up.run(cluster).await,
        Command::Down(down) => down.run(cluster).await,
    }
}

/// Load `--config` if it was given and apply the command line overrides on top of it.
fn cluster_config(args: &Args) -> Result<ClusterConfig> {
    let mut config = match (&args.config, &args.name) {
        (Some(path), _) => ClusterConfig::from_path(path)
            .context(format!("Unable to load cluster configuration '{}'", path.display()))?,
        (None, Some(name)) => ClusterConfig::new(name, DEFAULT_REGION, DEFAULT_VERSION),
        (None, None) => anyhow::bail!("Either '--config' or '--name' must be provided"),
    };
    if let Some(name) = &args.name {
        config.name = name.clone();
    }
    if let Some(region) = &args.region {
        config.region = region.clone();
    }
    if let Some(version) = &args.kubernetes_version {
        config.version = version.clone();
    }
    Ok(config)
}

/// Initialize the logger with the value passed by `--log-level` (or its default) when the
/// `RUST_LOG` environment variable is not present. If present, the `RUST_LOG` environment variable
/// overrides `--log-level`/`level`.
fn init_logger(level: LevelFilter) {
    match std::env::var(env_logger::DEFAULT_FILTER_ENV).ok() {
        Some(_) => {
            // RUST_LOG exists; env_logger will use it.
            Builder::from_default_env().init();
        }
        None => {
            // RUST_LOG does not exist; use default log level for our crates only.
            let mut builder = Builder::new();
            for module in LOG_MODULES {
                builder.filter(Some(module), level);
            }
            builder.init();
        }
    }
}

#[test]
fn log_level_applies_to_the_cli_and_library() {
    assert_eq!(LOG_MODULES, ["clusterctl", "cluster_provisioner"]);
}
