use super::definition::{CompletionMode, StartMode};
use crate::codec::{self, TaskType, WorkOrderType};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A resolved stage. `order` is 1-based, left to right.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub id: Uuid,
    pub unit_id: String,
    pub name: String,
    pub order: u32,
}

/// A resolved node. `parent_id` is the generated id of the owning stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: Uuid,
    pub unit_id: String,
    pub name: String,
    pub parent_id: Option<Uuid>,
}

/// A resolved connector between the generated ids of two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connector {
    pub id: Uuid,
    pub unit_id: String,
    pub source_id: Uuid,
    pub target_id: Uuid,
}

/// A persistable flowchart unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Unit {
    Stage(Stage),
    Node(Node),
    Connector(Connector),
}

impl Unit {
    pub fn id(&self) -> Uuid {
        match self {
            Unit::Stage(s) => s.id,
            Unit::Node(n) => n.id,
            Unit::Connector(c) => c.id,
        }
    }

    pub fn unit_id(&self) -> &str {
        match self {
            Unit::Stage(s) => &s.unit_id,
            Unit::Node(n) => &n.unit_id,
            Unit::Connector(c) => &c.unit_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    pub id: Uuid,
    pub node_id: Uuid,
    pub start_mode: StartMode,
    pub completion_mode: CompletionMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeTask {
    pub id: Uuid,
    pub node_id: Uuid,
    pub unit_id: String,
    pub completion_mode: CompletionMode,
    pub task_type: i32,
    pub work_order_type: i32,
    pub role_id: Option<String>,
}

impl NodeTask {
    pub fn task_type_names(&self) -> Vec<&'static str> {
        codec::decode::<TaskType>(self.task_type)
    }

    pub fn work_order_type_names(&self) -> Vec<&'static str> {
        codec::decode::<WorkOrderType>(self.work_order_type)
    }
}
