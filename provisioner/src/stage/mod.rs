/*!

Each stage issues the create request for one resource family and then waits for the resources to
become ready. Stages do not know about each other; the [`Cluster`](crate::Cluster) feeds the
outputs of one stage into the next.

!*/

pub mod control_plane;
pub mod foundation;
pub mod worker_groups;

/// The resources whose create request the provider has accepted, whether or not they ever became
/// ready. After a failure this is what a caller has to clean up.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct CreatedResources {
    pub stack: Option<String>,
    pub control_plane: Option<String>,
    pub worker_groups: Vec<String>,
}
