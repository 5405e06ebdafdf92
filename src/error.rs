use crate::graph::ResourceKind;
use thiserror::Error;

/// Errors raised while resolving user-supplied construct configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("Failed to parse construct configuration: {0}")]
    Malformed(String),

    #[error("Construct '{0}' is not of type 'queue'")]
    UnsupportedType(String),

    #[error("Invalid construct name '{0}': only letters, digits, '-' and '_' are allowed")]
    InvalidConstructName(String),

    #[error("The 'worker' of a queue must be defined with a 'handler'")]
    MissingWorkerHandler,

    #[error("'batchSize' must be between {min} and {max}, but found {value}")]
    BatchSizeOutOfRange { value: i64, min: u32, max: u32 },

    #[error("'maxRetries' must be zero or positive, but found {0}")]
    NegativeRetries(i64),

    #[error("'maxRetries' must be at most {max}, but found {value}")]
    RetriesOutOfRange { value: i64, max: u32 },

    #[error("'worker.timeout' must be between {min} and {max} seconds, but found {value}")]
    TimeoutOutOfRange { value: i64, min: u32, max: u32 },

    #[error("'maxBatchingWindow' must be between {min} and {max} seconds, but found {value}")]
    BatchingWindowOutOfRange { value: i64, min: u32, max: u32 },

    #[error("'alarm' must be an email address, but found '{0}'")]
    InvalidAlarmEmail(String),
}

/// A contributor was handed a graph that lacks a node it depends on.
///
/// This is a sequencing defect in the caller, not a user input problem.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Resource graph for construct '{construct}' has no {missing} node")]
pub struct IncompleteGraphError {
    pub construct: String,
    pub missing: ResourceKind,
}

/// Structural violations found when validating a built graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Node '{from}' references '{target}', which is neither in the graph nor a host import")]
    DanglingReference { from: String, target: String },

    #[error("Node '{from}' depends on '{target}', which is neither in the graph nor a host import")]
    DanglingDependency { from: String, target: String },

    #[error("Logical id '{0}' is declared more than once")]
    DuplicateLogicalId(String),
}

/// Errors that can occur while compiling constructs for a deployment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("Invalid deployment context: {0}")]
    InvalidContext(String),

    #[error("Construct '{0}' is declared more than once")]
    DuplicateConstruct(String),

    #[error("Constructs '{first}' and '{second}' both derive the worker id '{logical_id}'")]
    WorkerIdCollision {
        first: String,
        second: String,
        logical_id: String,
    },

    #[error("Construct '{construct}': {source}")]
    Config {
        construct: String,
        #[source]
        source: ConfigValidationError,
    },

    #[error(transparent)]
    IncompleteGraph(#[from] IncompleteGraphError),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Errors that can occur while persisting or loading compiled artifacts.
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("Could not access artifact file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization failed: {0}")]
    Encode(String),

    #[error("Deserialization failed: {0}")]
    Decode(String),
}
