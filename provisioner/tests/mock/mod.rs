/*!

This test module provides a mock implementation of the [`ResourceClient`] so that the orchestrator
can be tested without a cloud account. Each resource reports a scripted sequence of statuses (the
last status repeats forever), every call is recorded, and individual requests can be rejected.

!*/

use async_trait::async_trait;
use cluster_provisioner::client::{
    ClientError, ClientResult, ControlPlaneDescription, CreateControlPlaneRequest,
    CreateStackRequest, CreateWorkerGroupRequest, ErrorMessage, ResourceClient, StackCapability,
    StackDescription, StackOutput, WorkerGroupDescription,
};
use std::collections::HashMap;
use std::sync::Mutex;

/// A request received by the [`MockResourceClient`].
#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) enum Call {
    CreateStack(CreateStackRequest),
    DescribeStack(String),
    DeleteStack(String),
    CreateControlPlane(CreateControlPlaneRequest),
    DescribeControlPlane(String),
    CreateWorkerGroup(CreateWorkerGroupRequest),
    DescribeWorkerGroup(String),
}

/// A request that the [`MockResourceClient`] will refuse.
#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) enum Reject {
    CreateStack,
    CreateWorkerGroup(String),
    DeleteStack,
}

pub(crate) struct MockResourceClient {
    calls: Mutex<Vec<Call>>,
    rejections: Vec<Reject>,
    stack_statuses: Vec<String>,
    stack_outputs: Vec<StackOutput>,
    stack_missing: bool,
    control_plane_statuses: Vec<String>,
    worker_group_statuses: Vec<String>,
    /// Scripts for individual worker groups, keyed by name.
    worker_group_overrides: HashMap<String, Vec<String>>,
    /// Statuses reported once the stack delete was accepted. An empty status means the stack can no
    /// longer be found.
    deletion_statuses: Vec<String>,
    /// How many times each resource has been described, keyed by resource name.
    describes: Mutex<HashMap<String, usize>>,
    stack_deleted: Mutex<bool>,
}

pub(crate) fn default_outputs() -> Vec<StackOutput> {
    vec![
        StackOutput::new("PublicSubnetIds", "subnet-pub-a,subnet-pub-b"),
        StackOutput::new("PrivateSubnetIds", "subnet-priv-a,subnet-priv-b"),
        StackOutput::new("ClusterRoleARN", "arn:aws:iam::123456789012:role/cluster"),
        StackOutput::new("NodeRoleARN", "arn:aws:iam::123456789012:role/node"),
        StackOutput::new("VpcId", "vpc-0123"),
    ]
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn rejected(operation: &str) -> ClientError {
    ClientError::request_failed(ErrorMessage::from(format!("{} was rejected", operation)))
}

impl MockResourceClient {
    pub(crate) fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            rejections: Vec::new(),
            stack_statuses: strings(&[
                "CREATE_IN_PROGRESS",
                "CREATE_IN_PROGRESS",
                "CREATE_COMPLETE",
            ]),
            stack_outputs: default_outputs(),
            stack_missing: false,
            control_plane_statuses: strings(&["CREATING", "CREATING", "ACTIVE"]),
            worker_group_statuses: strings(&["CREATING", "ACTIVE"]),
            worker_group_overrides: HashMap::new(),
            deletion_statuses: strings(&["DELETE_IN_PROGRESS", ""]),
            describes: Mutex::new(HashMap::new()),
            stack_deleted: Mutex::new(false),
        }
    }

    pub(crate) fn reject(mut self, reject: Reject) -> Self {
        self.rejections.push(reject);
        self
    }

    pub(crate) fn stack_statuses(mut self, statuses: &[&str]) -> Self {
        self.stack_statuses = strings(statuses);
        self
    }

    pub(crate) fn stack_outputs(mut self, outputs: Vec<StackOutput>) -> Self {
        self.stack_outputs = outputs;
        self
    }

    /// Describe calls for the stack return an empty list.
    pub(crate) fn stack_missing(mut self) -> Self {
        self.stack_missing = true;
        self
    }

    pub(crate) fn control_plane_statuses(mut self, statuses: &[&str]) -> Self {
        self.control_plane_statuses = strings(statuses);
        self
    }

    pub(crate) fn worker_group_statuses(mut self, name: &str, statuses: &[&str]) -> Self {
        self.worker_group_overrides
            .insert(name.to_string(), strings(statuses));
        self
    }

    pub(crate) fn deletion_statuses(mut self, statuses: &[&str]) -> Self {
        self.deletion_statuses = strings(statuses);
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn count<F>(&self, f: F) -> usize
    where
        F: Fn(&Call) -> bool,
    {
        self.calls().iter().filter(|call| f(call)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn is_rejected(&self, reject: &Reject) -> bool {
        self.rejections.contains(reject)
    }

    /// Returns the status for the `n`th describe of `key`, repeating the last status once the
    /// script runs out.
    fn next_status(&self, key: &str, statuses: &[String]) -> String {
        let mut describes = self.describes.lock().unwrap();
        let n = describes.entry(key.to_string()).or_insert(0);
        let status = statuses
            .get(*n)
            .or_else(|| statuses.last())
            .cloned()
            .unwrap_or_default();
        *n += 1;
        status
    }
}

#[async_trait]
impl ResourceClient for MockResourceClient {
    async fn create_stack(&self, request: CreateStackRequest) -> ClientResult<()> {
        self.record(Call::CreateStack(request.clone()));
        if self.is_rejected(&Reject::CreateStack) {
            return Err(rejected("CreateStack"));
        }
        // Templates with named roles need both acknowledgements.
        if !(request.capabilities.contains(&StackCapability::Iam)
            && request.capabilities.contains(&StackCapability::NamedIam))
        {
            return Err(rejected("CreateStack without IAM capabilities"));
        }
        Ok(())
    }

    async fn describe_stack(&self, stack_name: &str) -> ClientResult<Vec<StackDescription>> {
        self.record(Call::DescribeStack(stack_name.to_string()));
        if self.stack_missing {
            return Ok(Vec::new());
        }
        let status = if *self.stack_deleted.lock().unwrap() {
            let status = self.next_status("deleted stack", &self.deletion_statuses);
            if status.is_empty() {
                return Ok(Vec::new());
            }
            status
        } else {
            self.next_status(stack_name, &self.stack_statuses)
        };
        Ok(vec![StackDescription {
            stack_name: stack_name.to_string(),
            status,
            outputs: self.stack_outputs.clone(),
        }])
    }

    async fn delete_stack(&self, stack_name: &str) -> ClientResult<()> {
        self.record(Call::DeleteStack(stack_name.to_string()));
        if self.is_rejected(&Reject::DeleteStack) {
            return Err(rejected("DeleteStack"));
        }
        *self.stack_deleted.lock().unwrap() = true;
        Ok(())
    }

    async fn create_control_plane(&self, request: CreateControlPlaneRequest) -> ClientResult<()> {
        self.record(Call::CreateControlPlane(request.clone()));
        if request.subnet_ids.is_empty() {
            return Err(rejected("CreateCluster with no subnets"));
        }
        Ok(())
    }

    async fn describe_control_plane(&self, name: &str) -> ClientResult<ControlPlaneDescription> {
        self.record(Call::DescribeControlPlane(name.to_string()));
        Ok(ControlPlaneDescription {
            name: name.to_string(),
            status: self.next_status(name, &self.control_plane_statuses),
        })
    }

    async fn create_worker_group(&self, request: CreateWorkerGroupRequest) -> ClientResult<()> {
        self.record(Call::CreateWorkerGroup(request.clone()));
        if self.is_rejected(&Reject::CreateWorkerGroup(request.name.clone())) {
            return Err(rejected("CreateNodegroup"));
        }
        Ok(())
    }

    async fn describe_worker_group(
        &self,
        cluster_name: &str,
        name: &str,
    ) -> ClientResult<WorkerGroupDescription> {
        self.record(Call::DescribeWorkerGroup(name.to_string()));
        let key = format!("{}/{}", cluster_name, name);
        let statuses = self
            .worker_group_overrides
            .get(name)
            .unwrap_or(&self.worker_group_statuses);
        Ok(WorkerGroupDescription {
            name: name.to_string(),
            cluster_name: cluster_name.to_string(),
            status: self.next_status(&key, statuses),
        })
    }
}
