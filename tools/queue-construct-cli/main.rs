use clap::Parser;
use queue_construct::prelude::*;
use std::fs;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Compiles the queue constructs of a project file into a deployment template
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the project JSON file declaring the constructs
    project_path: String,

    /// Stage to compile for, overriding the one in the project file
    #[arg(short, long)]
    stage: Option<String>,

    /// Write the rendered template to this path instead of stdout
    #[arg(short, long)]
    output: Option<String>,

    /// Also save the compiled deployment as a binary artifact
    #[arg(long)]
    artifact: Option<String>,

    /// Print the resource graph of each construct
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run(cli);
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose {
        "queue_construct=debug"
    } else {
        "queue_construct=info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) {
    let total_start = Instant::now();

    // --- 1. Project Loading ---
    let project = ProjectFile::from_file(&cli.project_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to load project file '{}': {}",
            cli.project_path, e
        ))
    });
    let context = project.context(cli.stage.as_deref());
    info!(
        app = %context.app,
        stage = %context.stage,
        constructs = project.constructs.len(),
        "loaded project"
    );

    // --- 2. Compilation ---
    let compile_start = Instant::now();
    let compiled = Compiler::builder(context.clone())
        .with_project(&project)
        .build()
        .compile()
        .unwrap_or_else(|e| exit_with_error(&format!("Compilation failed: {}", e)));
    info!(
        constructs = compiled.len(),
        elapsed = ?compile_start.elapsed(),
        "compilation successful"
    );

    if cli.verbose {
        for queue in &compiled {
            print_graph(queue);
        }
    }

    // --- 3. Rendering ---
    let template = render_template(&compiled);
    let rendered = serde_json::to_string_pretty(&template)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to render template: {}", e)));
    match &cli.output {
        Some(path) => {
            fs::write(path, rendered).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to write template '{}': {}", path, e))
            });
            info!(path = %path, "template written");
        }
        None => println!("{}", rendered),
    }

    // --- 4. Artifact ---
    if let Some(path) = &cli.artifact {
        CompiledDeployment::new(context, compiled)
            .save(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to save artifact: {}", e)));
        info!(path = %path, "artifact saved");
    }

    info!(elapsed = ?total_start.elapsed(), "done");
}

fn print_graph(queue: &CompiledQueue) {
    eprintln!("\n--- Construct '{}' ---", queue.construct);
    for node in queue.graph.nodes() {
        eprintln!("{} ({})", node.logical_id, node.kind);
        for (key, value) in &node.properties {
            eprintln!("    {}: {}", key, value);
        }
        if !node.depends_on.is_empty() {
            eprintln!("    DependsOn: {}", node.depends_on.join(", "));
        }
    }
    eprintln!(
        "Worker: {} (handler {}, timeout {}s)",
        queue.worker.name, queue.worker.handler, queue.worker.timeout_seconds
    );
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
