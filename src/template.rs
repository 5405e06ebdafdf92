//! Rendering compiled constructs into the provider's declarative template
//! format.
//!
//! This is the only place where a [`Reference`] turns into provider syntax:
//! `Ref` becomes `{"Ref": id}` and `GetAtt` becomes `{"Fn::GetAtt": [id, attr]}`.

use crate::compiler::CompiledQueue;
use crate::contributor::{Output, PermissionStatement, WorkerFunction};
use crate::graph::{PropertyValue, Reference, ResourceNode};
use serde_json::{Map, Value, json};

pub fn render_reference(reference: &Reference) -> Value {
    match reference {
        Reference::Ref(target) => json!({ "Ref": target }),
        Reference::GetAtt(target, attribute) => {
            json!({ "Fn::GetAtt": [target, attribute.as_str()] })
        }
    }
}

pub fn render_value(value: &PropertyValue) -> Value {
    match value {
        PropertyValue::String(s) => Value::String(s.clone()),
        PropertyValue::Integer(n) => Value::from(*n),
        PropertyValue::Bool(b) => Value::Bool(*b),
        PropertyValue::List(items) => Value::Array(items.iter().map(render_value).collect()),
        PropertyValue::Map(entries) => Value::Object(
            entries
                .iter()
                .map(|(key, value)| (key.clone(), render_value(value)))
                .collect(),
        ),
        PropertyValue::Reference(reference) => render_reference(reference),
    }
}

pub fn render_node(node: &ResourceNode) -> Value {
    let mut resource = Map::new();
    resource.insert("Type".to_string(), json!(node.kind.type_tag()));
    let properties: Map<String, Value> = node
        .properties
        .iter()
        .map(|(key, value)| (key.clone(), render_value(value)))
        .collect();
    resource.insert("Properties".to_string(), Value::Object(properties));
    if !node.depends_on.is_empty() {
        resource.insert("DependsOn".to_string(), json!(node.depends_on));
    }
    if let Some(policy) = node.deletion_policy {
        resource.insert("DeletionPolicy".to_string(), json!(policy.as_str()));
        resource.insert("UpdateReplacePolicy".to_string(), json!(policy.as_str()));
    }
    Value::Object(resource)
}

pub fn render_output(output: &Output) -> Value {
    json!({
        "Description": output.description,
        "Value": render_reference(&output.value),
    })
}

pub fn render_statement(statement: &PermissionStatement) -> Value {
    json!({
        "Effect": statement.effect.as_str(),
        "Action": statement.action,
        "Resource": statement.resources.iter().map(render_reference).collect::<Vec<_>>(),
    })
}

pub fn render_worker(worker: &WorkerFunction) -> Value {
    let mut function = Map::new();
    function.insert("name".to_string(), json!(worker.name));
    function.insert("handler".to_string(), json!(worker.handler));
    function.insert("timeout".to_string(), json!(worker.timeout_seconds));
    if let Some(memory_size) = worker.memory_size {
        function.insert("memorySize".to_string(), json!(memory_size));
    }
    Value::Object(function)
}

/// The `Resources` and `Outputs` sections contributed by one construct.
pub fn render_fragment(queue: &CompiledQueue) -> Value {
    let resources: Map<String, Value> = queue
        .graph
        .nodes()
        .iter()
        .map(|node| (node.logical_id.clone(), render_node(node)))
        .collect();
    let outputs: Map<String, Value> = queue
        .outputs
        .iter()
        .map(|(id, output)| (id.clone(), render_output(output)))
        .collect();
    json!({ "Resources": resources, "Outputs": outputs })
}

/// Merges the fragments of several constructs into one document together
/// with the contributions the host applies to its own resources.
///
/// Logical ids never collide across constructs with distinct names, so the
/// merge is a plain union.
pub fn render_template(queues: &[CompiledQueue]) -> Value {
    let mut resources = Map::new();
    let mut outputs = Map::new();
    let mut statements = Vec::new();
    let mut functions = Map::new();

    for queue in queues {
        for node in queue.graph.nodes() {
            resources.insert(node.logical_id.clone(), render_node(node));
        }
        for (id, output) in &queue.outputs {
            outputs.insert(id.clone(), render_output(output));
        }
        statements.extend(queue.permissions.iter().map(render_statement));
        functions.insert(queue.worker.key.clone(), render_worker(&queue.worker));
    }

    json!({
        "Resources": resources,
        "Outputs": outputs,
        "HostContributions": {
            "ExecutionRoleStatements": statements,
            "Functions": functions,
        },
    })
}
