use crate::config::{Alerting, DeploymentContext, QueueConfig};
use crate::graph::{
    Attribute, DeletionPolicy, PropertyValue, Reference, ResourceGraph, ResourceKind, ResourceNode,
};
use crate::identifier::{
    self, ALARM_NAME_MAX_LEN, EXECUTION_ROLE_LOGICAL_ID, QUEUE_NAME_MAX_LEN, TOPIC_NAME_MAX_LEN,
};
use std::collections::BTreeMap;

/// Longest retention the provider supports; failed jobs must outlive any
/// realistic operator response time.
pub const DLQ_RETENTION_SECONDS: u32 = 14 * 24 * 60 * 60;
/// Visibility timeout is this many times the worker timeout, leaving room for
/// the engine's internal retries of one received batch.
pub const VISIBILITY_TIMEOUT_MULTIPLIER: u32 = 6;
pub const ALARM_PERIOD_SECONDS: u32 = 60;
pub const ALARM_EVALUATION_PERIODS: u32 = 1;
pub const ALARM_THRESHOLD: u32 = 0;

pub const QUEUE_ROLE: &str = "Queue";
pub const DLQ_ROLE: &str = "Dlq";
pub const ALARM_ROLE: &str = "Alarm";
pub const ALARM_TOPIC_ROLE: &str = "AlarmTopic";
pub const ALARM_SUBSCRIPTION_ROLE: &str = "AlarmTopicSubscription";

const DLQ_SUFFIX: &str = "-dlq";
const ALARM_SUFFIX: &str = "-dlq-alarm";
const ALARM_TOPIC_SUFFIX: &str = "-dlq-alarm-topic";

/// The optional alerting sub-graph watching the dead-letter queue.
///
/// Building it is a single step: either all three nodes exist or none do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertingSubgraph {
    Absent,
    Present {
        topic: ResourceNode,
        subscription: ResourceNode,
        alarm: ResourceNode,
    },
}

impl AlertingSubgraph {
    pub fn plan(
        context: &DeploymentContext,
        construct: &str,
        alerting: &Alerting,
        dlq_id: &str,
    ) -> Self {
        let email = match alerting {
            Alerting::Disabled => return AlertingSubgraph::Absent,
            Alerting::Email(email) => email,
        };

        let topic_id = identifier::logical_id(construct, ALARM_TOPIC_ROLE);
        let topic = ResourceNode::new(&topic_id, ResourceKind::AlarmTopic)
            .with_property(
                "TopicName",
                identifier::physical_name(context, construct, ALARM_TOPIC_SUFFIX, TOPIC_NAME_MAX_LEN),
            )
            .with_property(
                "DisplayName",
                format!(
                    "[Alert][{}] There are failed jobs in the dead letter queue.",
                    construct
                ),
            );

        let subscription = ResourceNode::new(
            identifier::logical_id(construct, ALARM_SUBSCRIPTION_ROLE),
            ResourceKind::AlarmSubscription,
        )
        .with_property("Endpoint", email.as_str())
        .with_property("Protocol", "email")
        .with_property("TopicArn", Reference::Ref(topic_id.clone()));

        let dimension = PropertyValue::Map(BTreeMap::from([
            ("Name".to_string(), PropertyValue::from("QueueName")),
            (
                "Value".to_string(),
                Reference::GetAtt(dlq_id.to_string(), Attribute::QueueName).into(),
            ),
        ]));
        let alarm = ResourceNode::new(
            identifier::logical_id(construct, ALARM_ROLE),
            ResourceKind::Alarm,
        )
        .with_property(
            "AlarmName",
            identifier::physical_name(context, construct, ALARM_SUFFIX, ALARM_NAME_MAX_LEN),
        )
        .with_property(
            "AlarmDescription",
            "Alert triggered when there are failed jobs in the dead letter queue.",
        )
        .with_property(
            "AlarmActions",
            PropertyValue::List(vec![Reference::Ref(topic_id).into()]),
        )
        .with_property("Namespace", "AWS/SQS")
        .with_property("MetricName", "ApproximateNumberOfMessagesVisible")
        .with_property("Dimensions", PropertyValue::List(vec![dimension]))
        .with_property("Statistic", "Sum")
        .with_property("Period", ALARM_PERIOD_SECONDS)
        .with_property("EvaluationPeriods", ALARM_EVALUATION_PERIODS)
        .with_property("Threshold", ALARM_THRESHOLD)
        .with_property("ComparisonOperator", "GreaterThanThreshold");

        AlertingSubgraph::Present {
            topic,
            subscription,
            alarm,
        }
    }

    pub fn into_nodes(self) -> Vec<ResourceNode> {
        match self {
            AlertingSubgraph::Absent => Vec::new(),
            AlertingSubgraph::Present {
                topic,
                subscription,
                alarm,
            } => vec![topic, subscription, alarm],
        }
    }
}

/// Emits the resource graph of a single queue construct.
pub(super) struct GraphBuilder<'a> {
    context: &'a DeploymentContext,
    construct: &'a str,
    config: &'a QueueConfig,
    graph: ResourceGraph,
}

impl<'a> GraphBuilder<'a> {
    pub(super) fn new(
        context: &'a DeploymentContext,
        construct: &'a str,
        config: &'a QueueConfig,
    ) -> Self {
        Self {
            context,
            construct,
            config,
            graph: ResourceGraph::new(construct),
        }
    }

    pub(super) fn build(mut self) -> ResourceGraph {
        let dlq_id = self.dead_letter_queue();
        let queue_id = self.queue(&dlq_id);
        self.binding(&queue_id);

        let alerting =
            AlertingSubgraph::plan(self.context, self.construct, &self.config.alerting, &dlq_id);
        for node in alerting.into_nodes() {
            self.graph.push(node);
        }
        self.graph
    }

    fn dead_letter_queue(&mut self) -> String {
        let id = identifier::logical_id(self.construct, DLQ_ROLE);
        self.graph.push(
            ResourceNode::new(&id, ResourceKind::DeadLetterQueue)
                .with_property(
                    "QueueName",
                    identifier::physical_name(
                        self.context,
                        self.construct,
                        DLQ_SUFFIX,
                        QUEUE_NAME_MAX_LEN,
                    ),
                )
                .with_property("MessageRetentionPeriod", DLQ_RETENTION_SECONDS)
                .with_deletion_policy(DeletionPolicy::Delete),
        );
        id
    }

    fn queue(&mut self, dlq_id: &str) -> String {
        let id = identifier::logical_id(self.construct, QUEUE_ROLE);
        let redrive_policy = PropertyValue::Map(BTreeMap::from([
            (
                "deadLetterTargetArn".to_string(),
                Reference::GetAtt(dlq_id.to_string(), Attribute::Arn).into(),
            ),
            (
                "maxReceiveCount".to_string(),
                PropertyValue::from(self.config.max_retries),
            ),
        ]));
        self.graph.push(
            ResourceNode::new(&id, ResourceKind::Queue)
                .with_property(
                    "QueueName",
                    identifier::physical_name(self.context, self.construct, "", QUEUE_NAME_MAX_LEN),
                )
                .with_property(
                    "VisibilityTimeout",
                    self.config.function_timeout_seconds * VISIBILITY_TIMEOUT_MULTIPLIER,
                )
                .with_property("RedrivePolicy", redrive_policy)
                .with_deletion_policy(DeletionPolicy::Delete),
        );
        id
    }

    /// The binding's permissions come from the shared execution role, which the
    /// engine cannot see through the function reference alone.
    fn binding(&mut self, queue_id: &str) {
        let function_key = identifier::worker_function_key(self.construct);
        let function_id = identifier::function_logical_id(&function_key);
        self.graph.import(EXECUTION_ROLE_LOGICAL_ID);
        self.graph.import(&function_id);

        self.graph.push(
            ResourceNode::new(
                identifier::event_source_mapping_id(&function_key, queue_id),
                ResourceKind::EventSourceBinding,
            )
            .with_property("BatchSize", self.config.batch_size)
            .with_property(
                "MaximumBatchingWindowInSeconds",
                self.config.max_batching_window_seconds,
            )
            .with_property("Enabled", true)
            .with_property(
                "EventSourceArn",
                Reference::GetAtt(queue_id.to_string(), Attribute::Arn),
            )
            .with_property("FunctionName", Reference::GetAtt(function_id, Attribute::Arn))
            .with_dependency(EXECUTION_ROLE_LOGICAL_ID),
        );
    }
}

/// Builds the graph for `construct` from an already resolved configuration.
pub fn build(context: &DeploymentContext, construct: &str, config: &QueueConfig) -> ResourceGraph {
    GraphBuilder::new(context, construct, config).build()
}
