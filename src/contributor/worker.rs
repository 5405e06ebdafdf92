use crate::config::{DeploymentContext, QueueConfig};
use crate::identifier::{self, FUNCTION_NAME_MAX_LEN, WORKER_NAME_SUFFIX};
use serde::{Deserialize, Serialize};

/// The worker function the host must declare for a queue construct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerFunction {
    /// Key in the host's function registry, e.g. `emailsWorker`.
    pub key: String,
    pub logical_id: String,
    pub name: String,
    pub handler: String,
    pub timeout_seconds: u32,
    pub memory_size: Option<u32>,
}

pub fn worker_for(
    context: &DeploymentContext,
    construct: &str,
    config: &QueueConfig,
) -> WorkerFunction {
    let key = identifier::worker_function_key(construct);
    WorkerFunction {
        logical_id: identifier::function_logical_id(&key),
        name: identifier::physical_name(
            context,
            construct,
            WORKER_NAME_SUFFIX,
            FUNCTION_NAME_MAX_LEN,
        ),
        key,
        handler: config.worker_handler.clone(),
        timeout_seconds: config.function_timeout_seconds,
        memory_size: config.worker_memory_size,
    }
}
