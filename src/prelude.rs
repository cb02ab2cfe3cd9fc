//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the flowchart crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use flowchart::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let content = std::fs::read("path/to/flowchart.json")?;
//! let graph = Resolver::default().resolve(&content)?;
//! let start = graph.start_node().map(|n| n.name.as_str()).unwrap_or("?");
//! println!("Flowchart starts at {}", start);
//! # Ok(())
//! # }
//! ```

// Resolution and persistence
pub use crate::coordinator::{SaveCoordinator, SaveOutcome, SaveRequest, SaveType};
pub use crate::resolver::{Resolver, ResolverBuilder};

// Resolved model
pub use crate::flowchart::{
    CompletionMode, Connector, Node, NodeConfig, NodeTask, ResolvedGraph, Stage, StartMode, Unit,
};

// Type vocabularies
pub use crate::codec::{TaskType, TypeFlag, WorkOrderType};

// Collaborators
pub use crate::store::{
    FlowchartStore, FlowchartTarget, InMemoryFlowchartStore, InMemoryRoleDirectory, RoleLookup,
};

// Configuration
pub use crate::config::{CoordinatorConfig, FlowchartConfig, ResolverConfig, RetryPolicy};

// Error types
pub use crate::error::{BindError, CodecError, ResolveError, SaveError, StoreError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
