use serde::{Deserialize, Serialize};

/// A queue construct exactly as the user wrote it.
///
/// Integers are kept signed so that out-of-range input reaches the resolver
/// and is reported with its real value instead of a parse failure.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawQueueConfig {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub construct_type: Option<String>,
    #[serde(default)]
    pub worker: Option<RawWorkerConfig>,
    #[serde(default)]
    pub max_retries: Option<i64>,
    #[serde(default)]
    pub batch_size: Option<i64>,
    #[serde(default)]
    pub max_batching_window: Option<i64>,
    #[serde(default)]
    pub alarm: Option<String>,
}

/// The worker function attached to a queue.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawWorkerConfig {
    #[serde(default)]
    pub handler: Option<String>,
    #[serde(default)]
    pub timeout: Option<i64>,
    #[serde(default)]
    pub memory_size: Option<u32>,
}

impl RawQueueConfig {
    /// Shorthand for the minimal valid input: a worker with just a handler.
    pub fn with_handler(handler: impl Into<String>) -> Self {
        Self {
            worker: Some(RawWorkerConfig {
                handler: Some(handler.into()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }
}
