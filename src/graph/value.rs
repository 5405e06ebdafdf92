use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A runtime-resolved attribute of a declared resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Attribute {
    Arn,
    QueueName,
}

impl Attribute {
    pub fn as_str(&self) -> &'static str {
        match self {
            Attribute::Arn => "Arn",
            Attribute::QueueName => "QueueName",
        }
    }
}

/// A symbolic pointer to another node, resolved by the host after merging.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reference {
    /// The node's primary identifier (a queue's URL, a topic's ARN).
    Ref(String),
    /// A named attribute of the node.
    GetAtt(String, Attribute),
}

impl Reference {
    pub fn target(&self) -> &str {
        match self {
            Reference::Ref(target) | Reference::GetAtt(target, _) => target,
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::Ref(target) => write!(f, "!Ref {}", target),
            Reference::GetAtt(target, attribute) => {
                write!(f, "!GetAtt {}.{}", target, attribute.as_str())
            }
        }
    }
}

/// A value in a resource's property bag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyValue {
    String(String),
    Integer(i64),
    Bool(bool),
    List(Vec<PropertyValue>),
    Map(BTreeMap<String, PropertyValue>),
    Reference(Reference),
}

impl PropertyValue {
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            PropertyValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            PropertyValue::Reference(r) => Some(r),
            _ => None,
        }
    }

    /// Looks up a key when this value is a map.
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        match self {
            PropertyValue::Map(entries) => entries.get(key),
            _ => None,
        }
    }

    /// Collects every reference nested inside this value, depth first.
    pub fn collect_references<'a>(&'a self, out: &mut Vec<&'a Reference>) {
        match self {
            PropertyValue::Reference(r) => out.push(r),
            PropertyValue::List(items) => items.iter().for_each(|v| v.collect_references(out)),
            PropertyValue::Map(entries) => {
                entries.values().for_each(|v| v.collect_references(out))
            }
            PropertyValue::String(_) | PropertyValue::Integer(_) | PropertyValue::Bool(_) => {}
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<u32> for PropertyValue {
    fn from(value: u32) -> Self {
        PropertyValue::Integer(i64::from(value))
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<Reference> for PropertyValue {
    fn from(value: Reference) -> Self {
        PropertyValue::Reference(value)
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::String(s) => write!(f, "{:?}", s),
            PropertyValue::Integer(n) => write!(f, "{}", n),
            PropertyValue::Bool(b) => write!(f, "{}", b),
            PropertyValue::Reference(r) => write!(f, "{}", r),
            PropertyValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            PropertyValue::Map(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}
