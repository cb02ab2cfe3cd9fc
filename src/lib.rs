//! # Flowchart Resolver - Validation and Persistence Core for Flowchart Editors
//!
//! **flowchart** turns the unit array produced by a visual flowchart editor into a
//! validated graph of stages, nodes and connectors, and applies it to storage under
//! optimistic concurrency.
//!
//! ## Core Workflow
//!
//! 1.  **Bind**: The raw JSON payload is parsed into typed unit descriptors. Field rules
//!     (UUIDs, names, enums) are checked here.
//! 2.  **Resolve**: The `Resolver` enforces the structural invariants: unique ids and
//!     names, stage and node limits, stage membership, connector endpoints, stage order,
//!     and a single start and end with no loop and no orphan node.
//! 3.  **Persist**: The `SaveCoordinator` writes a temporary draft verbatim, or the
//!     resolved records of a final save, retrying once when another editor won the race.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use flowchart::prelude::*;
//! use std::sync::Arc;
//!
//! fn main() -> Result<()> {
//!     let content = std::fs::read_to_string("path/to/flowchart.json")?;
//!
//!     // Validate only.
//!     let resolver = Resolver::builder().with_max_nodes(100).build();
//!     let graph = resolver.resolve(content.as_bytes())?;
//!     for stage in &graph.stages {
//!         println!("{} -> order {}", stage.name, stage.order);
//!     }
//!
//!     // Validate and persist.
//!     let store = Arc::new(InMemoryFlowchartStore::new());
//!     let flowchart_id = store.create("Monthly report")?;
//!     let coordinator = SaveCoordinator::new(store, resolver);
//!     let outcome = coordinator.save(&SaveRequest {
//!         flowchart_id,
//!         save_type: SaveType::Final,
//!         content,
//!         image: Some(std::fs::read("path/to/thumbnail.png")?),
//!     })?;
//!     println!("Saved '{}' ({})", outcome.name, outcome.id);
//!     Ok(())
//! }
//! ```

pub mod codec;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod flowchart;
pub mod prelude;
pub mod resolver;
pub mod store;
pub mod ui;
