use clap::Parser;
use flowchart::codec::{TaskType, TypeFlag, WorkOrderType};
use rand::Rng;
use rand::seq::IndexedRandom;
use serde_json::{Value, json};
use std::fs;
use uuid::Uuid;

/// A CLI tool to generate structurally valid flowchart content
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_flowchart.json")]
    output: String,

    /// Number of stages
    #[arg(long, default_value_t = 5)]
    stages: usize,

    /// Number of nodes
    #[arg(long, default_value_t = 20)]
    nodes: usize,

    /// Probability of an extra forward connector per node
    #[arg(long, default_value_t = 0.3)]
    branching: f64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut rng = rand::rng();

    if cli.nodes == 0 {
        eprintln!("Error: --nodes must be at least 1");
        std::process::exit(1);
    }
    if !(0.0..=1.0).contains(&cli.branching) {
        eprintln!("Error: --branching must be between 0 and 1");
        std::process::exit(1);
    }

    println!(
        "Generating flowchart ({} stages, {} nodes)...",
        cli.stages, cli.nodes
    );

    let stage_ids: Vec<String> = (0..cli.stages).map(|_| Uuid::new_v4().to_string()).collect();
    let node_ids: Vec<String> = (0..cli.nodes).map(|_| Uuid::new_v4().to_string()).collect();

    let mut units: Vec<Value> = Vec::with_capacity(cli.stages + cli.nodes * 2);
    units.extend(generate_stages(&stage_ids));
    units.extend(generate_nodes(&mut rng, &node_ids, &stage_ids));
    units.extend(generate_connectors(&mut rng, &node_ids, cli.branching));

    let json_output = serde_json::to_string_pretty(&units)?;
    fs::write(&cli.output, json_output)?;

    println!(
        "Successfully generated {} units and saved them to '{}'",
        units.len(),
        cli.output
    );
    Ok(())
}

/// Lays stages out left to right so their order follows their index.
fn generate_stages(stage_ids: &[String]) -> Vec<Value> {
    let stages: Vec<Value> = stage_ids
        .iter()
        .enumerate()
        .map(|(i, id)| {
            json!({
                "id": id,
                "shape": "stage",
                "position": { "x": i as f64 * 320.0, "y": 0.0 },
                "data": { "name": format!("Stage {}", i + 1) },
            })
        })
        .collect();
    println!("-> Generated {} stages.", stages.len());
    stages
}

fn generate_nodes(rng: &mut impl Rng, node_ids: &[String], stage_ids: &[String]) -> Vec<Value> {
    let start_modes = ["any_node_completion", "all_node_completion", "any_node_start"];
    let nodes: Vec<Value> = node_ids
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let mut data = json!({
                "name": format!("Node {}", i + 1),
                "node_config": {
                    "start_mode": start_modes.choose(rng).copied().unwrap_or("any_node_completion"),
                    "completion_mode": "auto",
                },
            });
            if rng.random_bool(0.5) {
                data["task_config"] = json!({ "value": random_names::<TaskType>(rng) });
            }
            if rng.random_bool(0.3) {
                data["work_order_config"] = json!({ "value": random_names::<WorkOrderType>(rng) });
            }

            let mut node = json!({ "id": id, "shape": "input_node", "data": data });
            if !stage_ids.is_empty() {
                // Spread nodes over the stages in flow order.
                let stage = i * stage_ids.len() / node_ids.len();
                node["parent"] = json!(stage_ids[stage]);
            }
            node
        })
        .collect();
    println!("-> Generated {} nodes.", nodes.len());
    nodes
}

/// A chain through every node plus random forward shortcuts, so the graph
/// keeps a single start and a single end.
fn generate_connectors(rng: &mut impl Rng, node_ids: &[String], branching: f64) -> Vec<Value> {
    let mut connectors = Vec::new();
    let mut edge = |source: &str, target: &str| {
        connectors.push(json!({
            "id": Uuid::new_v4().to_string(),
            "shape": "edge",
            "source": { "cell": source },
            "target": { "cell": target },
        }));
    };

    for pair in node_ids.windows(2) {
        edge(pair[0].as_str(), pair[1].as_str());
    }
    for i in 0..node_ids.len().saturating_sub(2) {
        if rng.random_bool(branching) {
            let target = rng.random_range(i + 2..node_ids.len());
            edge(node_ids[i].as_str(), node_ids[target].as_str());
        }
    }
    println!("-> Generated {} connectors.", connectors.len());
    connectors
}

/// A JSON-encoded, non-empty subset of a vocabulary.
fn random_names<F: TypeFlag>(rng: &mut impl Rng) -> String {
    let mut names: Vec<&str> = F::ALL
        .iter()
        .filter(|_| rng.random_bool(0.5))
        .map(|flag| flag.name())
        .collect();
    if names.is_empty() {
        names.push(F::ALL[rng.random_range(0..F::ALL.len())].name());
    }
    serde_json::to_string(&names).unwrap_or_else(|_| "[]".to_string())
}
