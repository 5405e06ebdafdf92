use crate::error::IncompleteGraphError;
use crate::graph::{Attribute, Reference, ResourceGraph, ResourceKind};
use crate::identifier;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A value the host exposes once the deployment is realized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    pub description: String,
    pub value: Reference,
}

/// The queue's ARN and URL, keyed by deterministic output ids.
pub fn outputs_for(
    construct: &str,
    graph: &ResourceGraph,
) -> Result<BTreeMap<String, Output>, IncompleteGraphError> {
    let queue = graph
        .find(ResourceKind::Queue)
        .ok_or_else(|| IncompleteGraphError {
            construct: construct.to_string(),
            missing: ResourceKind::Queue,
        })?;

    let arn = Output {
        description: format!("ARN of the \"{}\" SQS queue.", construct),
        value: Reference::GetAtt(queue.logical_id.clone(), Attribute::Arn),
    };
    let url = Output {
        description: format!("URL of the \"{}\" SQS queue.", construct),
        value: Reference::Ref(queue.logical_id.clone()),
    };

    Ok(BTreeMap::from([
        (identifier::output_id(construct, "QueueArn"), arn),
        (identifier::output_id(construct, "QueueUrl"), url),
    ]))
}
