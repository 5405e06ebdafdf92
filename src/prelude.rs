//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and functions from the
//! queue-construct crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use queue_construct::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let project = ProjectFile::from_file("path/to/project.json")?;
//! let context = project.context(Some("prod"));
//!
//! let compiled = Compiler::builder(context.clone())
//!     .with_project(&project)
//!     .build()
//!     .compile()?;
//!
//! CompiledDeployment::new(context, compiled).save("path/to/deployment.bin")?;
//! # Ok(())
//! # }
//! ```

// Compilation
pub use crate::compiler::{CompiledQueue, Compiler, CompilerBuilder, compile_construct};

// Configuration
pub use crate::config::{
    Alerting, DeploymentContext, ProjectFile, QueueConfig, RawQueueConfig, RawWorkerConfig,
    resolve,
};

// Graph model
pub use crate::graph::{
    Attribute, PropertyValue, Reference, ResourceGraph, ResourceKind, ResourceNode,
};

// Host contributions
pub use crate::contributor::{Output, PermissionStatement, WorkerFunction};

// Rendering and persistence
pub use crate::artifact::CompiledDeployment;
pub use crate::template::{render_fragment, render_template};

// Error types
pub use crate::error::{
    ArtifactError, CompileError, ConfigValidationError, GraphError, IncompleteGraphError,
};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
