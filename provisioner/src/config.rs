use crate::constants::{DEFAULT_REGION, DEFAULT_VERSION, STACK_NAME_PREFIX};
use crate::error::{ConfigParseSnafu, ConfigReadSnafu, Result, ZeroPollIntervalSnafu};
use crate::poll::PollPolicy;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use std::path::Path;
use std::time::Duration;

/// The user supplied description of the cluster to provision.
///
/// ```yaml
/// name: test
/// region: us-west-2
/// version: "1.21"
/// clusterPolling:
///   timeoutSeconds: 3600
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterConfig {
    /// The name of the control plane. The network stack is named after it.
    pub name: String,

    #[serde(default = "default_region")]
    pub region: String,

    /// The control plane version, e.g. `1.24`.
    #[serde(default = "default_version")]
    pub version: String,

    /// Overrides for how the network and IAM role stack is polled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_polling: Option<PollingConfig>,

    /// Overrides for how the control plane and worker groups are polled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_polling: Option<PollingConfig>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollingConfig {
    pub interval_seconds: Option<u64>,
    pub timeout_seconds: Option<u64>,
}

impl PollingConfig {
    fn apply(&self, policy: PollPolicy) -> PollPolicy {
        PollPolicy {
            interval: self
                .interval_seconds
                .map(Duration::from_secs)
                .unwrap_or(policy.interval),
            timeout: self
                .timeout_seconds
                .map(Duration::from_secs)
                .unwrap_or(policy.timeout),
        }
    }
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

fn default_version() -> String {
    DEFAULT_VERSION.to_string()
}

impl ClusterConfig {
    pub fn new<S1, S2, S3>(name: S1, region: S2, version: S3) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        Self {
            name: name.into(),
            region: region.into(),
            version: version.into(),
            stack_polling: None,
            cluster_polling: None,
        }
    }

    /// Parse a configuration. A polling interval of zero seconds is rejected.
    pub fn from_yaml(s: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(s).context(ConfigParseSnafu)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for (which, polling) in [
            ("stack", &self.stack_polling),
            ("cluster", &self.cluster_polling),
        ] {
            let interval = polling.as_ref().and_then(|polling| polling.interval_seconds);
            snafu::ensure!(interval != Some(0), ZeroPollIntervalSnafu { which });
        }
        Ok(())
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path).context(ConfigReadSnafu { path })?;
        Self::from_yaml(&s)
    }

    /// The name of the network and IAM role stack, `eksctl-<name>`.
    pub fn stack_name(&self) -> String {
        format!("{}{}", STACK_NAME_PREFIX, self.name)
    }

    pub fn stack_policy(&self) -> PollPolicy {
        match &self.stack_polling {
            Some(polling) => polling.apply(PollPolicy::stack()),
            None => PollPolicy::stack(),
        }
    }

    pub fn cluster_policy(&self) -> PollPolicy {
        match &self.cluster_polling {
            Some(polling) => polling.apply(PollPolicy::cluster()),
            None => PollPolicy::cluster(),
        }
    }
}
