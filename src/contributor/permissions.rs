use crate::error::IncompleteGraphError;
use crate::graph::{Attribute, Reference, ResourceGraph, ResourceKind};
use serde::{Deserialize, Serialize};

pub const SEND_MESSAGE_ACTION: &str = "sqs:SendMessage";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Allow,
}

impl Effect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Effect::Allow => "Allow",
        }
    }
}

/// A statement to merge into the host's shared execution role.
///
/// Resources are always references to declared nodes, so a statement can
/// never widen into a wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionStatement {
    pub effect: Effect,
    pub action: String,
    pub resources: Vec<Reference>,
}

/// Lets every worker sharing the execution role enqueue onto this queue.
pub fn permissions_for(
    graph: &ResourceGraph,
) -> Result<Vec<PermissionStatement>, IncompleteGraphError> {
    let queue = graph
        .find(ResourceKind::Queue)
        .ok_or_else(|| IncompleteGraphError {
            construct: graph.construct().to_string(),
            missing: ResourceKind::Queue,
        })?;

    Ok(vec![PermissionStatement {
        effect: Effect::Allow,
        action: SEND_MESSAGE_ACTION.to_string(),
        resources: vec![Reference::GetAtt(queue.logical_id.clone(), Attribute::Arn)],
    }])
}
