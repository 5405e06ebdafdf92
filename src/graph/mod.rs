//! The resource graph produced by compiling one construct.
//!
//! A graph owns its nodes and lists the host resources it is allowed to point
//! at. Every [`Reference`] and every `depends_on` entry must land on one of
//! the two; [`ResourceGraph::validate`] enforces this.

use crate::error::GraphError;
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

mod value;

pub use value::*;

/// The kind of a declared resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceKind {
    Queue,
    DeadLetterQueue,
    EventSourceBinding,
    Alarm,
    AlarmTopic,
    AlarmSubscription,
}

impl ResourceKind {
    /// The provider's type tag for this kind.
    pub fn type_tag(&self) -> &'static str {
        match self {
            ResourceKind::Queue | ResourceKind::DeadLetterQueue => "AWS::SQS::Queue",
            ResourceKind::EventSourceBinding => "AWS::Lambda::EventSourceMapping",
            ResourceKind::Alarm => "AWS::CloudWatch::Alarm",
            ResourceKind::AlarmTopic => "AWS::SNS::Topic",
            ResourceKind::AlarmSubscription => "AWS::SNS::Subscription",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Queue => "queue",
            ResourceKind::DeadLetterQueue => "dead-letter-queue",
            ResourceKind::EventSourceBinding => "event-source-binding",
            ResourceKind::Alarm => "alarm",
            ResourceKind::AlarmTopic => "alarm-topic",
            ResourceKind::AlarmSubscription => "alarm-subscription",
        };
        f.write_str(name)
    }
}

/// What the provider does with a resource when it leaves the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeletionPolicy {
    Delete,
}

impl DeletionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeletionPolicy::Delete => "Delete",
        }
    }
}

/// A single typed resource declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceNode {
    pub logical_id: String,
    pub kind: ResourceKind,
    pub properties: BTreeMap<String, PropertyValue>,
    pub depends_on: Vec<String>,
    pub deletion_policy: Option<DeletionPolicy>,
}

impl ResourceNode {
    pub fn new(logical_id: impl Into<String>, kind: ResourceKind) -> Self {
        Self {
            logical_id: logical_id.into(),
            kind,
            properties: BTreeMap::new(),
            depends_on: Vec::new(),
            deletion_policy: None,
        }
    }

    pub fn with_property(mut self, key: &str, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    pub fn with_dependency(mut self, logical_id: impl Into<String>) -> Self {
        self.depends_on.push(logical_id.into());
        self
    }

    pub fn with_deletion_policy(mut self, policy: DeletionPolicy) -> Self {
        self.deletion_policy = Some(policy);
        self
    }

    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Every reference held anywhere in the property bag.
    pub fn references(&self) -> Vec<&Reference> {
        let mut out = Vec::new();
        for value in self.properties.values() {
            value.collect_references(&mut out);
        }
        out
    }
}

/// The self-contained output of compiling one construct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceGraph {
    construct: String,
    nodes: Vec<ResourceNode>,
    host_imports: BTreeSet<String>,
}

impl ResourceGraph {
    pub fn new(construct: impl Into<String>) -> Self {
        Self {
            construct: construct.into(),
            nodes: Vec::new(),
            host_imports: BTreeSet::new(),
        }
    }

    pub fn construct(&self) -> &str {
        &self.construct
    }

    /// Declares a host-owned resource that nodes may reference.
    pub fn import(&mut self, logical_id: impl Into<String>) {
        self.host_imports.insert(logical_id.into());
    }

    pub fn push(&mut self, node: ResourceNode) {
        self.nodes.push(node);
    }

    /// Nodes in emission order.
    pub fn nodes(&self) -> &[ResourceNode] {
        &self.nodes
    }

    pub fn host_imports(&self) -> impl Iterator<Item = &str> {
        self.host_imports.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, logical_id: &str) -> Option<&ResourceNode> {
        self.nodes.iter().find(|n| n.logical_id == logical_id)
    }

    /// The first node of the given kind.
    pub fn find(&self, kind: ResourceKind) -> Option<&ResourceNode> {
        self.nodes.iter().find(|n| n.kind == kind)
    }

    pub fn nodes_of(&self, kind: ResourceKind) -> impl Iterator<Item = &ResourceNode> {
        self.nodes.iter().filter(move |n| n.kind == kind)
    }

    /// Checks that logical ids are unique and that every reference and
    /// dependency is closed over the graph plus its host imports.
    pub fn validate(&self) -> Result<(), GraphError> {
        let mut known: AHashSet<&str> = AHashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !known.insert(node.logical_id.as_str()) {
                return Err(GraphError::DuplicateLogicalId(node.logical_id.clone()));
            }
        }
        let resolves =
            |target: &str| known.contains(target) || self.host_imports.contains(target);

        for node in &self.nodes {
            let dangling = node
                .references()
                .into_iter()
                .find(|r| !resolves(r.target()));
            if let Some(reference) = dangling {
                return Err(GraphError::DanglingReference {
                    from: node.logical_id.clone(),
                    target: reference.target().to_string(),
                });
            }
            if let Some(target) = node.depends_on.iter().find(|t| !resolves(t.as_str())) {
                return Err(GraphError::DanglingDependency {
                    from: node.logical_id.clone(),
                    target: target.clone(),
                });
            }
        }
        Ok(())
    }
}
