//! # queue-construct - Work Queue Construct Compiler
//!
//! **queue-construct** compiles a small declarative description of an
//! asynchronous work queue ("a named queue with a worker function") into a
//! complete graph of cloud resource declarations: the queue, its dead-letter
//! companion, the binding that feeds the worker, and, when requested, an
//! alarm that emails an operator about failed jobs.
//!
//! Compilation is pure. Identifiers are derived deterministically from the
//! construct name, so compiling the same input twice yields identical
//! output, and independent constructs can be compiled in any order or on
//! separate threads.
//!
//! ## Core Workflow
//!
//! 1.  **Describe the deployment**: a [`config::DeploymentContext`] names the
//!     application and stage every physical resource name is scoped to.
//! 2.  **Register constructs**: pass each construct's raw options to the
//!     [`compiler::Compiler`] builder, either typed ([`config::RawQueueConfig`])
//!     or as JSON.
//! 3.  **Compile**: options are defaulted and validated, then each construct
//!     yields a [`compiler::CompiledQueue`] holding its resource graph, the
//!     permissions the shared execution role needs, its outputs and its worker
//!     function declaration.
//! 4.  **Render**: [`template::render_template`] turns the compiled constructs
//!     into provider template JSON, resolving every reference edge into
//!     intrinsic-function syntax.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use queue_construct::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let context = DeploymentContext::new("shop", "dev");
//!
//!     let mut emails = RawQueueConfig::with_handler("worker.handler");
//!     emails.alarm = Some("alerting@example.com".to_string());
//!
//!     let compiled = Compiler::builder(context)
//!         .with_construct("emails", emails)
//!         .build()
//!         .compile()?;
//!
//!     for queue in &compiled {
//!         println!("{}: {} resources", queue.construct, queue.graph.len());
//!     }
//!
//!     let template = render_template(&compiled);
//!     println!("{}", serde_json::to_string_pretty(&template)?);
//!     Ok(())
//! }
//! ```

pub mod artifact;
pub mod compiler;
pub mod config;
pub mod contributor;
pub mod error;
pub mod graph;
pub mod identifier;
pub mod prelude;
pub mod template;
