//! Workflow Studio: entry point
//!
//! Inspect a phase graph from snapshot files, or (with the `desktop` feature)
//! launch the Tauri shell that renders it.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use workflow_studio::config::StudioConfig;
use workflow_studio::error::{ErrorCode, Result, StudioError};
use workflow_studio::graph::PhaseGraph;
use workflow_studio::navigation::{NavKey, NavOutcome};
use workflow_studio::snapshot::{read_phases, read_status};
use workflow_studio::{logging, studio_err};

#[derive(Parser)]
#[command(name = "workflow-studio", version, about = "Phase graph for methodology workflows")]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level, overridden by RUST_LOG
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print nodes, phase columns and edges
    Graph {
        #[arg(long)]
        phases: PathBuf,
        #[arg(long)]
        status: PathBuf,
        /// Emit the graph as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the upstream artifacts a workflow reads
    Trace {
        workflow_id: String,
        #[arg(long)]
        phases: PathBuf,
        #[arg(long)]
        status: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Enter the graph and replay key presses (ArrowUp, ArrowDown, ArrowLeft, ArrowRight, Enter, Space)
    Navigate {
        #[arg(long)]
        phases: PathBuf,
        #[arg(long)]
        status: PathBuf,
        keys: Vec<String>,
    },
    /// Launch the desktop app
    #[cfg(feature = "desktop")]
    Desktop,
}

fn main() {
    let cli = Cli::parse();

    let config = match StudioConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    logging::init(cli.log_level.as_deref().unwrap_or(&config.log_level));

    if let Err(e) = run(cli.command, config) {
        eprintln!("{}", e);
        for hint in &e.recovery_hints {
            eprintln!("  hint: {}", hint);
        }
        std::process::exit(1);
    }
}

fn run(command: Command, config: StudioConfig) -> Result<()> {
    match command {
        #[cfg(feature = "desktop")]
        Command::Desktop => {
            workflow_studio::commands::run(config);
            Ok(())
        }
        other => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(run_cli(other, config))
        }
    }
}

async fn run_cli(command: Command, config: StudioConfig) -> Result<()> {
    match command {
        Command::Graph {
            phases,
            status,
            json,
        } => {
            let graph = load_graph(&config, &phases, &status).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&graph)?);
            } else {
                print_graph(&graph);
            }
        }
        Command::Trace {
            workflow_id,
            phases,
            status,
            json,
        } => {
            let phases = read_phases(&phases).await?;
            if phases.find_workflow(&workflow_id).is_none() {
                return Err(studio_err!(WorkflowNotFound, "Unknown workflow: {}", workflow_id));
            }
            let mut session = config.session();
            session.set_phases(phases);
            if let Some(path) = status {
                session.set_status(read_status(&path).await?);
            }
            let entries = session.trace_context(&workflow_id).unwrap_or_default();
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else if entries.is_empty() {
                println!("{} reads no upstream artifacts", workflow_id);
            } else {
                for entry in entries {
                    let marker = if entry.available { "available" } else { "missing" };
                    println!(
                        "{:<10} {} ({})",
                        marker, entry.dependency.label, entry.dependency.output_path
                    );
                }
            }
        }
        Command::Navigate {
            phases,
            status,
            keys,
        } => {
            let keys = keys
                .iter()
                .map(|k| k.parse::<NavKey>())
                .collect::<Result<Vec<_>>>()?;

            let mut session = config.session();
            session.set_phases(read_phases(&phases).await?);
            session.set_status(read_status(&status).await?);
            if session.graph().is_empty() {
                return Err(StudioError::new(ErrorCode::GraphNotLoaded, "Phase graph is empty"));
            }

            print_outcome(&session.focus_entry());
            for key in keys {
                print_outcome(&session.handle_key(key));
            }
        }
        #[cfg(feature = "desktop")]
        Command::Desktop => unreachable!("handled before the runtime starts"),
    }
    Ok(())
}

async fn load_graph(config: &StudioConfig, phases: &Path, status: &Path) -> Result<PhaseGraph> {
    let mut session = config.session();
    session.set_phases(read_phases(phases).await?);
    let graph = session.set_status(read_status(status).await?);
    Ok((*graph).clone())
}

fn print_graph(graph: &PhaseGraph) {
    if graph.is_empty() {
        println!("(empty graph)");
        return;
    }
    if let Some(method) = &graph.method_name {
        println!("{} ({}% complete)", method, graph.total_progress);
    }
    for column in &graph.columns {
        println!(
            "\nPhase {} - {}  {}/{} required ({:.0}%)",
            column.phase_num,
            column.name,
            column.completed_count,
            column.total_required,
            column.percent_complete
        );
        for node in graph.nodes.iter().filter(|n| n.phase_num == column.phase_num) {
            println!("  {:<12} {}", node.visual_state.as_str(), node.aria_label);
        }
    }
    if !graph.edges.is_empty() {
        println!("\nEdges:");
        for edge in &graph.edges {
            let style = if edge.is_optional { " (optional)" } else { "" };
            println!("  {} -> {}{}", edge.from, edge.to, style);
        }
    }
}

fn print_outcome(outcome: &NavOutcome) {
    match outcome {
        NavOutcome::Unchanged => println!("(no change)"),
        NavOutcome::Focused { announcement, .. } => println!("focus: {}", announcement),
        NavOutcome::Selected(event) => {
            println!("select: {} [{}]", event.workflow_id, event.visual_state)
        }
        NavOutcome::OpenArtifact(event) => println!(
            "open: {}",
            event.artifact_path.as_deref().unwrap_or(&event.workflow_id)
        ),
    }
}
