use clap::{Parser, Subcommand};
use flowchart::codec;
use flowchart::prelude::*;
use std::fs;
use std::time::Instant;

/// Validate flowchart editor content and inspect stored type masks
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the final-save validation pipeline on a JSON unit array
    Check {
        /// Path to the flowchart content JSON file
        path: String,
        /// Optional path to a JSON configuration file
        #[arg(short, long)]
        config: Option<String>,
    },
    /// Print the type names a stored bitmask stands for
    Decode {
        /// Task type mask
        #[arg(long)]
        task: Option<i32>,
        /// Work-order type mask
        #[arg(long)]
        work_order: Option<i32>,
    },
}

fn main() {
    let cli = Cli::parse();
    match cli.command {
        Command::Check { path, config } => run_check(&path, config.as_deref()),
        Command::Decode { task, work_order } => run_decode(task, work_order),
    }
}

fn run_check(path: &str, config_path: Option<&str>) {
    let config = match config_path {
        Some(config_path) => FlowchartConfig::from_file(config_path).unwrap_or_else(|e| {
            exit_with_error(&format!(
                "Failed to load configuration '{}': {}",
                config_path, e
            ))
        }),
        None => FlowchartConfig::default(),
    };
    let content = fs::read(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to read '{}': {}", path, e)));

    let resolver = Resolver::builder().with_config(config.resolver).build();
    let start = Instant::now();
    let graph = match resolver.resolve(&content) {
        Ok(graph) => graph,
        Err(e) => exit_with_error(&format!("[{}] {}", e.code(), e)),
    };
    let duration = start.elapsed();

    println!("Flowchart is valid ({:?})", duration);
    print_graph(&graph);
}

fn print_graph(graph: &ResolvedGraph) {
    println!("\n--- Stages ---");
    for stage in &graph.stages {
        println!("  {:>3}. {} ({})", stage.order, stage.name, stage.unit_id);
    }

    println!("\n--- Nodes ---");
    for node in &graph.nodes {
        let stage = node
            .parent_id
            .and_then(|id| graph.stages.iter().find(|s| s.id == id))
            .map(|s| s.name.as_str())
            .unwrap_or("-");
        println!("  {} [stage: {}]", node.name, stage);
        if let Some(task) = graph.task_for(node.id) {
            println!(
                "      tasks: {:?}, work orders: {:?}, role: {}",
                task.task_type_names(),
                task.work_order_type_names(),
                task.role_id.as_deref().unwrap_or("-")
            );
        }
    }

    println!("\n--- Connectors ---");
    for connector in &graph.connectors {
        let name = |id| graph.node(id).map(|n| n.name.as_str()).unwrap_or("?");
        println!(
            "  {} -> {}",
            name(connector.source_id),
            name(connector.target_id)
        );
    }

    println!("\n--- Summary ---");
    println!("Stages:      {}", graph.stages.len());
    println!("Nodes:       {}", graph.nodes.len());
    println!("Connectors:  {}", graph.connectors.len());
    if let (Some(start), Some(end)) = (graph.start_node(), graph.end_node()) {
        println!("Start:       {}", start.name);
        println!("End:         {}", end.name);
    }
}

fn run_decode(task: Option<i32>, work_order: Option<i32>) {
    if task.is_none() && work_order.is_none() {
        exit_with_error("Pass --task and/or --work-order");
    }
    if let Some(mask) = task {
        println!("Task types ({}): {:?}", mask, codec::decode::<TaskType>(mask));
    }
    if let Some(mask) = work_order {
        println!(
            "Work-order types ({}): {:?}",
            mask,
            codec::decode::<WorkOrderType>(mask)
        );
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
