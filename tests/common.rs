//! Common test utilities for building construct definitions.
#![allow(dead_code)]

use queue_construct::prelude::*;

pub const QUEUE_ID: &str = "emailsQueueF057328A";
pub const DLQ_ID: &str = "emailsDlq47F8494C";
pub const ALARM_ID: &str = "emailsAlarm1821C14F";
pub const ALARM_TOPIC_ID: &str = "emailsAlarmTopic594BAEC9";
pub const ALARM_SUBSCRIPTION_ID: &str = "emailsAlarmTopicSubscription688AECB6";
pub const BINDING_ID: &str = "EmailsWorkerEventSourceMappingSQSEmailsQueueF057328A";
pub const WORKER_FUNCTION_ID: &str = "EmailsWorkerLambdaFunction";
pub const EXECUTION_ROLE_ID: &str = "IamRoleLambdaExecution";

/// The context every fixture is compiled in.
pub fn test_context() -> DeploymentContext {
    DeploymentContext::new("test-queues", "dev")
}

/// A queue with only the required worker handler set.
pub fn minimal_config() -> RawQueueConfig {
    RawQueueConfig::with_handler("worker.handler")
}

/// A queue with every option set explicitly.
pub fn full_config() -> RawQueueConfig {
    RawQueueConfig {
        construct_type: Some("queue".to_string()),
        worker: Some(RawWorkerConfig {
            handler: Some("worker.handler".to_string()),
            timeout: Some(7),
            memory_size: Some(1024),
        }),
        max_retries: Some(1),
        batch_size: Some(10),
        max_batching_window: Some(20),
        alarm: Some("alerting@example.com".to_string()),
    }
}

/// Compiles the `emails` construct, panicking on failure.
pub fn compile_emails(raw: RawQueueConfig) -> CompiledQueue {
    compile_construct(&test_context(), "emails", raw).expect("Failed to compile")
}

/// Compiles the `emails` construct with an alarm email configured.
pub fn compile_emails_with_alarm() -> CompiledQueue {
    let mut raw = minimal_config();
    raw.alarm = Some("alerting@example.com".to_string());
    compile_emails(raw)
}

/// Looks up a node that the test expects to exist.
pub fn node<'a>(queue: &'a CompiledQueue, logical_id: &str) -> &'a ResourceNode {
    queue
        .graph
        .node(logical_id)
        .unwrap_or_else(|| panic!("node '{}' not found", logical_id))
}

/// Reads an integer property of a node.
pub fn int_property(node: &ResourceNode, key: &str) -> i64 {
    node.property(key)
        .and_then(PropertyValue::as_integer)
        .unwrap_or_else(|| panic!("'{}' is not an integer on {}", key, node.logical_id))
}
