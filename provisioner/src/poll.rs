/*!

Cloud resources are created asynchronously by the provider. `poll` turns a single status check into
a bounded wait: the check is invoked immediately and then on a fixed interval until it reports the
wanted status, reports a status that can never lead there, or the timeout elapses.

!*/

use crate::constants::{
    CLUSTER_POLL_INTERVAL, CLUSTER_POLL_TIMEOUT, STACK_POLL_INTERVAL, STACK_POLL_TIMEOUT,
};
use crate::error::{FatalStatusSnafu, Result, TimeoutSnafu};
use log::{debug, trace};
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// How often a status is checked and how long to keep checking it.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub timeout: Duration,
}

impl PollPolicy {
    pub const fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }

    /// The policy for the network and IAM role stack, which converges quickly.
    pub const fn stack() -> Self {
        Self::new(STACK_POLL_INTERVAL, STACK_POLL_TIMEOUT)
    }

    /// The policy for the control plane and worker groups.
    pub const fn cluster() -> Self {
        Self::new(CLUSTER_POLL_INTERVAL, CLUSTER_POLL_TIMEOUT)
    }
}

/// The status a poll is waiting for, and the statuses that mean it will never be reached.
#[derive(Debug, Copy, Clone)]
pub struct Target<'a> {
    pub want: &'a str,
    pub fatal: &'a [&'a str],
}

impl<'a> Target<'a> {
    pub const fn new(want: &'a str, fatal: &'a [&'a str]) -> Self {
        Self { want, fatal }
    }
}

/// Call `check` until it returns `target.want`.
///
/// - An error from `check` is returned as-is and is never treated as "not ready yet".
/// - A status listed in `target.fatal` ends the wait with [`Error::FatalStatus`].
/// - Once `policy.timeout` has elapsed the wait ends with [`Error::Timeout`], carrying the last
///   status that was observed. This happens no later than one interval past the timeout.
///
/// `what` describes the resource in log messages and errors, e.g. `stack 'eksctl-test'`.
///
/// [`Error::FatalStatus`]: crate::Error::FatalStatus
/// [`Error::Timeout`]: crate::Error::Timeout
pub async fn wait_for<F, Fut>(
    what: &str,
    target: Target<'_>,
    policy: PollPolicy,
    mut check: F,
) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<String>>,
{
    let start = Instant::now();
    let mut checks = 0usize;
    loop {
        let status = check().await?;
        checks += 1;
        trace!("Check {} of {}: status is '{}'", checks, what, status);

        if status == target.want {
            debug!(
                "{} reached '{}' after {} checks ({:?})",
                what,
                status,
                checks,
                start.elapsed()
            );
            return Ok(());
        }

        if target.fatal.contains(&status.as_str()) {
            return FatalStatusSnafu { what, status }.fail();
        }

        let elapsed = start.elapsed();
        if elapsed >= policy.timeout {
            return TimeoutSnafu {
                what,
                want: target.want,
                last_status: status,
                elapsed,
            }
            .fail();
        }

        trace!(
            "{} is not '{}' yet, checking again in {:?}",
            what,
            target.want,
            policy.interval
        );
        sleep(policy.interval).await;
    }
}
