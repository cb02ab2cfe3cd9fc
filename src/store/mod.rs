//! Collaborator contracts consumed by the resolver and the save coordinator.
//!
//! Relational storage and role management live outside this crate; they are
//! reached only through [`FlowchartStore`] and [`RoleLookup`]. In-memory
//! implementations for tests and tools are in [`memory`].

use crate::error::StoreError;
use crate::flowchart::{NodeConfig, NodeTask, Unit};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod memory;

pub use memory::{InMemoryFlowchartStore, InMemoryRoleDirectory};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowchartStatus {
    Draft,
    Final,
}

/// The mutable state of one flowchart version.
///
/// `revision` is the optimistic guard: a conditional write succeeds only if
/// the stored revision still equals the one carried by the candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowchartTarget {
    pub id: Uuid,
    pub name: String,
    pub revision: i64,
    pub status: FlowchartStatus,
    pub draw_properties: String,
    pub image: Option<Vec<u8>>,
}

/// A role as reported by the role collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: String,
    pub active: bool,
}

/// Storage for flowchart versions and their resolved records.
pub trait FlowchartStore: Send + Sync {
    /// Reads a fresh copy of the flowchart version.
    fn load_target(&self, id: Uuid) -> Result<FlowchartTarget, StoreError>;

    /// Stores draw properties (and the image when `has_image`) of a draft.
    ///
    /// Returns `Ok(false)` when the optimistic guard did not hold.
    fn update_draw_properties_and_image(
        &self,
        target: &FlowchartTarget,
        has_image: bool,
    ) -> Result<bool, StoreError>;

    /// Atomically replaces the version's units, node configs and node tasks,
    /// together with its draw properties and image.
    ///
    /// Returns `Ok(false)` when the optimistic guard did not hold.
    fn save_content(
        &self,
        target: &FlowchartTarget,
        units: &[Unit],
        node_configs: &[NodeConfig],
        node_tasks: &[NodeTask],
        has_image: bool,
    ) -> Result<bool, StoreError>;
}

/// Looks up roles referenced by node tasks.
pub trait RoleLookup: Send + Sync {
    /// Returns `None` when no role with this id exists.
    fn lookup_role(&self, role_id: &str) -> Result<Option<Role>, StoreError>;
}
