//! Configuration consumed by the compiler.
//!
//! [`DeploymentContext`] names the application and stage every physical name
//! is scoped to. [`RawQueueConfig`] is the user's per-construct input and
//! [`resolve`] turns it into a validated [`QueueConfig`].

use crate::error::CompileError;
use crate::identifier::MAX_STAGE_LEN;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;

mod raw;
mod resolver;

pub use raw::*;
pub use resolver::*;

/// The application and stage a deployment is compiled for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeploymentContext {
    pub app: String,
    pub stage: String,
}

impl DeploymentContext {
    pub fn new(app: impl Into<String>, stage: impl Into<String>) -> Self {
        Self {
            app: app.into(),
            stage: stage.into(),
        }
    }

    /// Both parts end up inside provider-visible names, so they are limited to
    /// alphanumerics and `-`. The stage is never truncated and must leave room
    /// for the shortest name budget.
    pub fn validate(&self) -> Result<(), CompileError> {
        for (label, value) in [("app", &self.app), ("stage", &self.stage)] {
            if value.is_empty() {
                return Err(CompileError::InvalidContext(format!("{} must not be empty", label)));
            }
            if !value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
                return Err(CompileError::InvalidContext(format!(
                    "{} '{}' may only contain letters, digits and '-'",
                    label, value
                )));
            }
        }
        let stage_len = self.stage.chars().count();
        if stage_len > MAX_STAGE_LEN {
            return Err(CompileError::InvalidContext(format!(
                "stage '{}' is {} characters long, the limit is {}",
                self.stage, stage_len, MAX_STAGE_LEN
            )));
        }
        Ok(())
    }
}

/// Stage used when neither the project file nor the caller picks one.
pub const DEFAULT_STAGE: &str = "dev";

/// A deployment file declaring any number of constructs.
///
/// ```json
/// {
///   "service": "shop",
///   "stage": "prod",
///   "constructs": {
///     "emails": { "type": "queue", "worker": { "handler": "worker.handler" } }
///   }
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ProjectFile {
    pub service: String,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub constructs: BTreeMap<String, serde_json::Value>,
}

impl ProjectFile {
    /// Load a project file from a JSON document on disk.
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let project = serde_json::from_str(&content)?;
        Ok(project)
    }

    /// Builds the deployment context, letting `stage_override` win over the
    /// stage written in the file.
    pub fn context(&self, stage_override: Option<&str>) -> DeploymentContext {
        let stage = stage_override
            .or(self.stage.as_deref())
            .unwrap_or(DEFAULT_STAGE);
        DeploymentContext::new(self.service.clone(), stage)
    }
}
