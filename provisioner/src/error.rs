use crate::client::ClientError;
use crate::cluster::ClusterState;
use snafu::Snafu;
use std::path::PathBuf;
use std::time::Duration;

/// The error type returned by the stages and the [`Cluster`](crate::Cluster) orchestrator. No
/// variant is retried or rolled back; resources created before the error remain in the account
/// until they are explicitly deleted.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("Unable to parse cluster configuration: {}", source))]
    ConfigParse { source: serde_yaml::Error },

    #[snafu(display("Unable to read cluster configuration '{}': {}", path.display(), source))]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("{} reached the failure status '{}'", what, status))]
    FatalStatus { what: String, status: String },

    #[snafu(display("Unable to {} while the cluster is {}", operation, state))]
    InvalidState {
        operation: &'static str,
        state: ClusterState,
    },

    #[snafu(display("Stack '{}' is missing the '{}' output", stack_name, key))]
    MissingOutput {
        stack_name: String,
        key: &'static str,
    },

    #[snafu(display("{} was not found", what))]
    NotFound { what: String },

    #[snafu(display("Failed to {}: {}", action, source))]
    Request { action: String, source: ClientError },

    #[snafu(display(
        "Timed out after {:?} waiting for {} to reach '{}', last status was '{}'",
        elapsed,
        what,
        want,
        last_status
    ))]
    Timeout {
        what: String,
        want: String,
        last_status: String,
        elapsed: Duration,
    },

    #[snafu(display("The {} polling interval must be at least one second", which))]
    ZeroPollInterval { which: &'static str },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// The last status observed before a poll gave up, if this is a timeout.
    pub fn last_status(&self) -> Option<&str> {
        match self {
            Error::Timeout { last_status, .. } => Some(last_status),
            _ => None,
        }
    }
}
