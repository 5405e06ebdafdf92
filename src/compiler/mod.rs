use crate::config::{
    self, Alerting, DeploymentContext, ProjectFile, QueueConfig, RawQueueConfig,
    validate_construct_name,
};
use crate::contributor::{
    Output, PermissionStatement, WorkerFunction, outputs_for, permissions_for, worker_for,
};
use crate::error::{CompileError, ConfigValidationError};
use crate::graph::ResourceGraph;
use crate::identifier::{function_logical_id, worker_function_key};
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, debug_span};

mod builder;

pub use builder::{
    ALARM_EVALUATION_PERIODS, ALARM_PERIOD_SECONDS, ALARM_THRESHOLD, AlertingSubgraph,
    DLQ_RETENTION_SECONDS, VISIBILITY_TIMEOUT_MULTIPLIER, build,
};

/// Everything compiling one queue construct produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledQueue {
    pub construct: String,
    pub config: QueueConfig,
    pub graph: ResourceGraph,
    pub permissions: Vec<PermissionStatement>,
    pub outputs: BTreeMap<String, Output>,
    pub worker: WorkerFunction,
}

/// A construct definition waiting to be resolved.
#[derive(Debug, Clone)]
enum ConstructInput {
    Typed(RawQueueConfig),
    Json(serde_json::Value),
}

impl ConstructInput {
    fn resolve(&self) -> Result<QueueConfig, ConfigValidationError> {
        match self {
            ConstructInput::Typed(raw) => config::resolve(raw.clone()),
            ConstructInput::Json(value) => config::resolve_value(value),
        }
    }
}

pub struct Compiler {
    context: DeploymentContext,
    constructs: Vec<(String, ConstructInput)>,
}

pub struct CompilerBuilder {
    context: DeploymentContext,
    constructs: Vec<(String, ConstructInput)>,
}

impl CompilerBuilder {
    pub fn new(context: DeploymentContext) -> Self {
        Self {
            context,
            constructs: Vec::new(),
        }
    }

    pub fn with_construct(mut self, name: &str, raw: RawQueueConfig) -> Self {
        self.constructs
            .push((name.to_string(), ConstructInput::Typed(raw)));
        self
    }

    /// Adds a construct from an untyped JSON definition; parse errors surface
    /// from [`Compiler::compile`].
    pub fn with_construct_value(mut self, name: &str, value: serde_json::Value) -> Self {
        self.constructs
            .push((name.to_string(), ConstructInput::Json(value)));
        self
    }

    pub fn with_project(mut self, project: &ProjectFile) -> Self {
        for (name, value) in &project.constructs {
            self.constructs
                .push((name.clone(), ConstructInput::Json(value.clone())));
        }
        self
    }

    pub fn build(self) -> Compiler {
        Compiler {
            context: self.context,
            constructs: self.constructs,
        }
    }
}

impl Compiler {
    pub fn builder(context: DeploymentContext) -> CompilerBuilder {
        CompilerBuilder::new(context)
    }

    pub fn context(&self) -> &DeploymentContext {
        &self.context
    }

    /// Compiles every registered construct, ordered by construct name.
    ///
    /// The first failure aborts the whole compilation; no partial output is
    /// returned.
    pub fn compile(self) -> Result<Vec<CompiledQueue>, CompileError> {
        self.context.validate()?;

        let mut seen = AHashSet::with_capacity(self.constructs.len());
        for (name, _) in &self.constructs {
            if !seen.insert(name.as_str()) {
                return Err(CompileError::DuplicateConstruct(name.clone()));
            }
        }

        // Host function ids normalize case and separators, so distinct names
        // can still land on the same worker.
        let mut workers: AHashMap<String, &str> = AHashMap::with_capacity(self.constructs.len());
        for (name, _) in self.constructs.iter().sorted_by(|(a, _), (b, _)| a.cmp(b)) {
            let logical_id = function_logical_id(&worker_function_key(name));
            if let Some(first) = workers.get(&logical_id) {
                return Err(CompileError::WorkerIdCollision {
                    first: first.to_string(),
                    second: name.clone(),
                    logical_id,
                });
            }
            workers.insert(logical_id, name.as_str());
        }

        let compiled = self
            .constructs
            .iter()
            .sorted_by(|(a, _), (b, _)| a.cmp(b))
            .map(|(name, input)| {
                let config = input.resolve().map_err(|source| CompileError::Config {
                    construct: name.clone(),
                    source,
                })?;
                compile_resolved(&self.context, name, config)
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            app = %self.context.app,
            stage = %self.context.stage,
            constructs = compiled.len(),
            "compiled deployment"
        );
        Ok(compiled)
    }
}

/// Compiles a single construct in isolation.
pub fn compile_construct(
    context: &DeploymentContext,
    name: &str,
    raw: RawQueueConfig,
) -> Result<CompiledQueue, CompileError> {
    context.validate()?;
    let config = config::resolve(raw).map_err(|source| CompileError::Config {
        construct: name.to_string(),
        source,
    })?;
    compile_resolved(context, name, config)
}

fn compile_resolved(
    context: &DeploymentContext,
    name: &str,
    config: QueueConfig,
) -> Result<CompiledQueue, CompileError> {
    let _span = debug_span!("compile_construct", construct = name).entered();

    validate_construct_name(name).map_err(|source| CompileError::Config {
        construct: name.to_string(),
        source,
    })?;

    let graph = build(context, name, &config);
    graph.validate()?;
    let permissions = permissions_for(&graph)?;
    let outputs = outputs_for(name, &graph)?;
    let worker = worker_for(context, name, &config);

    debug!(
        nodes = graph.len(),
        alerting = !matches!(config.alerting, Alerting::Disabled),
        "built resource graph"
    );

    Ok(CompiledQueue {
        construct: name.to_string(),
        config,
        graph,
        permissions,
        outputs,
        worker,
    })
}
