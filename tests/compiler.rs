//! Tests for compiling queue constructs into resource graphs.
mod common;
use common::*;
use queue_construct::identifier::{FUNCTION_NAME_MAX_LEN, MAX_STAGE_LEN, QUEUE_NAME_MAX_LEN};
use queue_construct::prelude::*;
use serde_json::json;

#[test]
fn test_compiler_creates_all_required_resources() {
    let queue = compile_emails(minimal_config());

    let ids: Vec<_> = queue
        .graph
        .nodes()
        .iter()
        .map(|n| n.logical_id.as_str())
        .collect();
    assert_eq!(ids, vec![DLQ_ID, QUEUE_ID, BINDING_ID]);

    assert_eq!(queue.graph.nodes_of(ResourceKind::Queue).count(), 1);
    assert_eq!(queue.graph.nodes_of(ResourceKind::DeadLetterQueue).count(), 1);
}

#[test]
fn test_queue_defaults() {
    let queue = compile_emails(minimal_config());
    let main = node(&queue, QUEUE_ID);

    assert_eq!(main.kind, ResourceKind::Queue);
    assert_eq!(
        main.property("QueueName").and_then(PropertyValue::as_str),
        Some("test-queues-dev-emails")
    );
    assert_eq!(int_property(main, "VisibilityTimeout"), 36);

    let redrive = main.property("RedrivePolicy").expect("redrive policy");
    assert_eq!(
        redrive.get("deadLetterTargetArn").and_then(PropertyValue::as_reference),
        Some(&Reference::GetAtt(DLQ_ID.to_string(), Attribute::Arn))
    );
    assert_eq!(
        redrive.get("maxReceiveCount").and_then(PropertyValue::as_integer),
        Some(3)
    );
}

#[test]
fn test_dead_letter_queue_retention_is_fixed() {
    for raw in [minimal_config(), full_config()] {
        let queue = compile_emails(raw);
        let dlq = node(&queue, DLQ_ID);
        assert_eq!(dlq.kind, ResourceKind::DeadLetterQueue);
        assert_eq!(int_property(dlq, "MessageRetentionPeriod"), 1_209_600);
        assert_eq!(
            dlq.property("QueueName").and_then(PropertyValue::as_str),
            Some("test-queues-dev-emails-dlq")
        );
    }
}

#[test]
fn test_visibility_timeout_is_six_times_function_timeout() {
    for (timeout, expected) in [(1, 6), (6, 36), (7, 42), (900, 5400)] {
        let mut raw = minimal_config();
        raw.worker.as_mut().unwrap().timeout = Some(timeout);
        let queue = compile_emails(raw);

        assert_eq!(int_property(node(&queue, QUEUE_ID), "VisibilityTimeout"), expected);
        assert_eq!(queue.worker.timeout_seconds as i64, timeout);
    }
}

#[test]
fn test_max_retries_propagates_to_redrive_policy() {
    for retries in [0, 1, 3, 25] {
        let mut raw = minimal_config();
        raw.max_retries = Some(retries);
        let queue = compile_emails(raw);

        let redrive = node(&queue, QUEUE_ID).property("RedrivePolicy").unwrap();
        assert_eq!(
            redrive.get("maxReceiveCount").and_then(PropertyValue::as_integer),
            Some(retries)
        );
    }
}

#[test]
fn test_binding_carries_batching_options() {
    for batch_size in 1..=10 {
        let mut raw = minimal_config();
        raw.batch_size = Some(batch_size);
        let queue = compile_emails(raw);
        assert_eq!(int_property(node(&queue, BINDING_ID), "BatchSize"), batch_size);
    }

    let queue = compile_emails(minimal_config());
    let binding = node(&queue, BINDING_ID);
    assert_eq!(binding.kind, ResourceKind::EventSourceBinding);
    assert_eq!(int_property(binding, "BatchSize"), 1);
    assert_eq!(int_property(binding, "MaximumBatchingWindowInSeconds"), 60);
    assert_eq!(binding.property("Enabled"), Some(&PropertyValue::Bool(true)));
    assert_eq!(
        binding.property("EventSourceArn").and_then(PropertyValue::as_reference),
        Some(&Reference::GetAtt(QUEUE_ID.to_string(), Attribute::Arn))
    );
    assert_eq!(
        binding.property("FunctionName").and_then(PropertyValue::as_reference),
        Some(&Reference::GetAtt(WORKER_FUNCTION_ID.to_string(), Attribute::Arn))
    );
    assert_eq!(binding.depends_on, vec![EXECUTION_ROLE_ID.to_string()]);
}

#[test]
fn test_binding_imports_host_resources() {
    let queue = compile_emails(minimal_config());
    let imports: Vec<_> = queue.graph.host_imports().collect();
    assert_eq!(imports, vec![WORKER_FUNCTION_ID, EXECUTION_ROLE_ID]);
    assert!(queue.graph.validate().is_ok());
}

#[test]
fn test_alarm_adds_exactly_three_nodes() {
    let without = compile_emails(minimal_config());
    let with = compile_emails_with_alarm();

    assert_eq!(with.graph.len(), without.graph.len() + 3);
    let extra: Vec<_> = with
        .graph
        .nodes()
        .iter()
        .filter(|n| without.graph.node(&n.logical_id).is_none())
        .map(|n| n.logical_id.as_str())
        .collect();
    assert_eq!(extra, vec![ALARM_TOPIC_ID, ALARM_SUBSCRIPTION_ID, ALARM_ID]);

    // The shared nodes are untouched by the switch.
    for shared in without.graph.nodes() {
        assert_eq!(with.graph.node(&shared.logical_id), Some(shared));
    }
}

#[test]
fn test_alarm_watches_dead_letter_queue() {
    let queue = compile_emails_with_alarm();
    let rendered = queue_construct::template::render_node(node(&queue, ALARM_ID));

    assert_eq!(
        rendered,
        json!({
            "Type": "AWS::CloudWatch::Alarm",
            "Properties": {
                "AlarmActions": [{ "Ref": ALARM_TOPIC_ID }],
                "AlarmDescription": "Alert triggered when there are failed jobs in the dead letter queue.",
                "AlarmName": "test-queues-dev-emails-dlq-alarm",
                "ComparisonOperator": "GreaterThanThreshold",
                "Dimensions": [{
                    "Name": "QueueName",
                    "Value": { "Fn::GetAtt": [DLQ_ID, "QueueName"] },
                }],
                "EvaluationPeriods": 1,
                "MetricName": "ApproximateNumberOfMessagesVisible",
                "Namespace": "AWS/SQS",
                "Period": 60,
                "Statistic": "Sum",
                "Threshold": 0,
            },
        })
    );
}

#[test]
fn test_alarm_topic_and_subscription() {
    let queue = compile_emails_with_alarm();

    let topic = node(&queue, ALARM_TOPIC_ID);
    assert_eq!(
        topic.property("TopicName").and_then(PropertyValue::as_str),
        Some("test-queues-dev-emails-dlq-alarm-topic")
    );
    assert_eq!(
        topic.property("DisplayName").and_then(PropertyValue::as_str),
        Some("[Alert][emails] There are failed jobs in the dead letter queue.")
    );

    let subscription = node(&queue, ALARM_SUBSCRIPTION_ID);
    assert_eq!(
        subscription.property("Endpoint").and_then(PropertyValue::as_str),
        Some("alerting@example.com")
    );
    assert_eq!(
        subscription.property("Protocol").and_then(PropertyValue::as_str),
        Some("email")
    );
    assert_eq!(
        subscription.property("TopicArn").and_then(PropertyValue::as_reference),
        Some(&Reference::Ref(ALARM_TOPIC_ID.to_string()))
    );
}

#[test]
fn test_every_reference_resolves_within_fragment() {
    let queue = compile_emails(full_config());
    let imports: Vec<_> = queue.graph.host_imports().collect();
    for node in queue.graph.nodes() {
        for reference in node.references() {
            let target = reference.target();
            assert!(
                queue.graph.node(target).is_some() || imports.contains(&target),
                "{} points at unknown '{}'",
                node.logical_id,
                target
            );
        }
    }
}

#[test]
fn test_compilation_is_deterministic() {
    let first = compile_emails(full_config());
    let second = compile_emails(full_config());
    assert_eq!(first, second);

    let first_json = serde_json::to_string(&render_fragment(&first)).unwrap();
    let second_json = serde_json::to_string(&render_fragment(&second)).unwrap();
    assert_eq!(first_json, second_json);
}

#[test]
fn test_constructs_compile_independently_across_threads() {
    let names = ["emails", "thumbnails", "reports", "exports"];
    let sequential: Vec<_> = names
        .iter()
        .map(|name| compile_construct(&test_context(), name, full_config()).unwrap())
        .collect();

    let parallel: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = names
            .iter()
            .map(|name| {
                scope.spawn(move || compile_construct(&test_context(), name, full_config()))
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap().unwrap())
            .collect()
    });

    assert_eq!(sequential, parallel);
}

#[test]
fn test_compiler_builder_orders_and_compiles_constructs() {
    let compiled = Compiler::builder(test_context())
        .with_construct("thumbnails", minimal_config())
        .with_construct_value("emails", json!({ "worker": { "handler": "emails.handler" } }))
        .build()
        .compile()
        .expect("Failed to compile");

    let names: Vec<_> = compiled.iter().map(|q| q.construct.as_str()).collect();
    assert_eq!(names, vec!["emails", "thumbnails"]);
    assert_eq!(compiled[0].worker.handler, "emails.handler");
}

#[test]
fn test_compiler_rejects_duplicate_constructs() {
    let result = Compiler::builder(test_context())
        .with_construct("emails", minimal_config())
        .with_construct("emails", full_config())
        .build()
        .compile();

    match result {
        Err(CompileError::DuplicateConstruct(name)) => assert_eq!(name, "emails"),
        other => panic!("Expected DuplicateConstruct error, got {:?}", other),
    }
}

#[test]
fn test_compiler_aborts_on_invalid_construct() {
    let mut bad = minimal_config();
    bad.batch_size = Some(11);
    let result = Compiler::builder(test_context())
        .with_construct("emails", minimal_config())
        .with_construct("reports", bad)
        .build()
        .compile();

    match result {
        Err(CompileError::Config { construct, source }) => {
            assert_eq!(construct, "reports");
            assert_eq!(
                source,
                ConfigValidationError::BatchSizeOutOfRange {
                    value: 11,
                    min: 1,
                    max: 10
                }
            );
        }
        other => panic!("Expected Config error, got {:?}", other),
    }
}

#[test]
fn test_compiler_rejects_invalid_names_and_context() {
    let result = compile_construct(&test_context(), "my queue", minimal_config());
    assert!(matches!(
        result,
        Err(CompileError::Config {
            source: ConfigValidationError::InvalidConstructName(_),
            ..
        })
    ));

    let result = compile_construct(
        &DeploymentContext::new("test-queues", ""),
        "emails",
        minimal_config(),
    );
    assert!(matches!(result, Err(CompileError::InvalidContext(_))));
}

#[test]
fn test_compiler_accepts_project_file() {
    let project: ProjectFile = serde_json::from_value(json!({
        "service": "test-queues",
        "constructs": {
            "emails": { "type": "queue", "worker": { "handler": "worker.handler" }, "alarm": "alerting@example.com" },
            "reports": { "worker": { "handler": "reports.handler", "timeout": 30 } },
        },
    }))
    .unwrap();

    let compiled = Compiler::builder(project.context(None))
        .with_project(&project)
        .build()
        .compile()
        .expect("Failed to compile project");

    assert_eq!(compiled.len(), 2);
    assert_eq!(compiled[0].graph.len(), 6);
    assert_eq!(compiled[1].graph.len(), 3);
    assert_eq!(compiled[1].config.function_timeout_seconds, 30);
}

#[test]
fn test_long_construct_names_keep_distinct_physical_names() {
    let first = format!("{}1", "x".repeat(90));
    let second = format!("{}2", "x".repeat(90));
    let compiled = Compiler::builder(test_context())
        .with_construct(&first, minimal_config())
        .with_construct(&second, minimal_config())
        .build()
        .compile()
        .expect("Failed to compile long construct names");

    let queue_names: Vec<_> = compiled
        .iter()
        .flat_map(|q| q.graph.nodes())
        .filter_map(|n| n.property("QueueName").and_then(PropertyValue::as_str))
        .collect();
    assert_eq!(queue_names.len(), 4);
    for (i, name) in queue_names.iter().enumerate() {
        assert!(name.len() <= QUEUE_NAME_MAX_LEN, "{} is too long", name);
        assert!(name.starts_with("test-queues-dev-"));
        assert!(!queue_names[i + 1..].contains(name), "{} is not unique", name);
    }

    assert_ne!(compiled[0].worker.name, compiled[1].worker.name);
    assert!(compiled[0].worker.name.len() <= FUNCTION_NAME_MAX_LEN);
    assert!(compiled[0].worker.name.ends_with("Worker"));
}

#[test]
fn test_compiler_rejects_stage_without_room_in_names() {
    let result = compile_construct(
        &DeploymentContext::new("app", "s".repeat(100)),
        "emails",
        minimal_config(),
    );
    assert!(matches!(result, Err(CompileError::InvalidContext(_))));

    let context = DeploymentContext::new("app", "s".repeat(MAX_STAGE_LEN));
    let queue = compile_construct(&context, &"w".repeat(80), full_config())
        .expect("Failed to compile with the longest stage");
    assert!(queue.worker.name.len() <= FUNCTION_NAME_MAX_LEN);
    for node in queue.graph.nodes() {
        if let Some(name) = node.property("QueueName").and_then(PropertyValue::as_str) {
            assert!(name.len() <= QUEUE_NAME_MAX_LEN);
        }
    }
}

#[test]
fn test_compiler_rejects_constructs_sharing_a_worker() {
    let result = Compiler::builder(test_context())
        .with_construct("emails", minimal_config())
        .with_construct("Emails", minimal_config())
        .build()
        .compile();

    match result {
        Err(CompileError::WorkerIdCollision {
            first,
            second,
            logical_id,
        }) => {
            assert_eq!(first, "Emails");
            assert_eq!(second, "emails");
            assert_eq!(logical_id, WORKER_FUNCTION_ID);
        }
        other => panic!("Expected WorkerIdCollision error, got {:?}", other),
    }
}
