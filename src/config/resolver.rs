use super::{RawQueueConfig, RawWorkerConfig};
use crate::error::ConfigValidationError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::sync::LazyLock;

pub const DEFAULT_BATCH_SIZE: u32 = 1;
pub const DEFAULT_MAX_BATCHING_WINDOW_SECONDS: u32 = 60;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_FUNCTION_TIMEOUT_SECONDS: u32 = 6;

pub const BATCH_SIZE_RANGE: RangeInclusive<u32> = 1..=10;
pub const FUNCTION_TIMEOUT_RANGE: RangeInclusive<u32> = 1..=900;
pub const BATCHING_WINDOW_RANGE: RangeInclusive<u32> = 0..=300;

const QUEUE_TYPE: &str = "queue";

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$").expect("email pattern is a valid regex")
});

/// Whether an optional alerting sub-graph is attached to the dead-letter queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alerting {
    Disabled,
    Email(String),
}

/// A fully defaulted and validated queue construct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueConfig {
    pub worker_handler: String,
    pub worker_memory_size: Option<u32>,
    pub batch_size: u32,
    pub max_batching_window_seconds: u32,
    pub max_retries: u32,
    pub function_timeout_seconds: u32,
    pub alerting: Alerting,
}

/// Applies defaults to absent fields and validates everything else.
pub fn resolve(raw: RawQueueConfig) -> Result<QueueConfig, ConfigValidationError> {
    if let Some(kind) = raw.construct_type.as_deref() {
        if kind != QUEUE_TYPE {
            return Err(ConfigValidationError::UnsupportedType(kind.to_string()));
        }
    }

    let RawWorkerConfig {
        handler,
        timeout,
        memory_size,
    } = raw.worker.ok_or(ConfigValidationError::MissingWorkerHandler)?;
    let worker_handler = handler
        .filter(|h| !h.trim().is_empty())
        .ok_or(ConfigValidationError::MissingWorkerHandler)?;

    let batch_size = match raw.batch_size {
        None => DEFAULT_BATCH_SIZE,
        Some(value) => in_range(value, &BATCH_SIZE_RANGE).ok_or(
            ConfigValidationError::BatchSizeOutOfRange {
                value,
                min: *BATCH_SIZE_RANGE.start(),
                max: *BATCH_SIZE_RANGE.end(),
            },
        )?,
    };

    let max_retries = match raw.max_retries {
        None => DEFAULT_MAX_RETRIES,
        Some(value) if value < 0 => return Err(ConfigValidationError::NegativeRetries(value)),
        Some(value) => u32::try_from(value).map_err(|_| {
            ConfigValidationError::RetriesOutOfRange {
                value,
                max: u32::MAX,
            }
        })?,
    };

    let function_timeout_seconds = match timeout {
        None => DEFAULT_FUNCTION_TIMEOUT_SECONDS,
        Some(value) => in_range(value, &FUNCTION_TIMEOUT_RANGE).ok_or(
            ConfigValidationError::TimeoutOutOfRange {
                value,
                min: *FUNCTION_TIMEOUT_RANGE.start(),
                max: *FUNCTION_TIMEOUT_RANGE.end(),
            },
        )?,
    };

    let max_batching_window_seconds = match raw.max_batching_window {
        None => DEFAULT_MAX_BATCHING_WINDOW_SECONDS,
        Some(value) => in_range(value, &BATCHING_WINDOW_RANGE).ok_or(
            ConfigValidationError::BatchingWindowOutOfRange {
                value,
                min: *BATCHING_WINDOW_RANGE.start(),
                max: *BATCHING_WINDOW_RANGE.end(),
            },
        )?,
    };

    let alerting = match raw.alarm {
        None => Alerting::Disabled,
        Some(email) if EMAIL_PATTERN.is_match(&email) => Alerting::Email(email),
        Some(email) => return Err(ConfigValidationError::InvalidAlarmEmail(email)),
    };

    Ok(QueueConfig {
        worker_handler,
        worker_memory_size: memory_size,
        batch_size,
        max_batching_window_seconds,
        max_retries,
        function_timeout_seconds,
        alerting,
    })
}

/// Parses an untyped JSON construct definition, then resolves it.
pub fn resolve_value(value: &serde_json::Value) -> Result<QueueConfig, ConfigValidationError> {
    let raw: RawQueueConfig = serde_json::from_value(value.clone())
        .map_err(|e| ConfigValidationError::Malformed(e.to_string()))?;
    resolve(raw)
}

/// Construct names namespace every identifier, so they must survive inside
/// provider names unchanged.
pub fn validate_construct_name(name: &str) -> Result<(), ConfigValidationError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(ConfigValidationError::InvalidConstructName(name.to_string()))
    }
}

fn in_range(value: i64, range: &RangeInclusive<u32>) -> Option<u32> {
    u32::try_from(value).ok().filter(|v| range.contains(v))
}
