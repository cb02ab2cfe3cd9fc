use super::units::{Connector, Node, NodeConfig, NodeTask, Stage, Unit};
use uuid::Uuid;

/// A flowchart that passed every structural check and is ready to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedGraph {
    /// Stages sorted by `order`.
    pub stages: Vec<Stage>,
    pub nodes: Vec<Node>,
    pub connectors: Vec<Connector>,
    pub node_configs: Vec<NodeConfig>,
    pub node_tasks: Vec<NodeTask>,
    /// Generated id of the single node without incoming connectors.
    pub start_id: Uuid,
    /// Generated id of the single node without outgoing connectors.
    pub end_id: Uuid,
}

impl ResolvedGraph {
    /// All units in persistence order: stages, nodes, then connectors.
    pub fn units(&self) -> Vec<Unit> {
        self.stages
            .iter()
            .cloned()
            .map(Unit::Stage)
            .chain(self.nodes.iter().cloned().map(Unit::Node))
            .chain(self.connectors.iter().cloned().map(Unit::Connector))
            .collect()
    }

    pub fn node(&self, id: Uuid) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_by_unit_id(&self, unit_id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.unit_id == unit_id)
    }

    pub fn start_node(&self) -> Option<&Node> {
        self.node(self.start_id)
    }

    pub fn end_node(&self) -> Option<&Node> {
        self.node(self.end_id)
    }

    pub fn task_for(&self, node_id: Uuid) -> Option<&NodeTask> {
        self.node_tasks.iter().find(|t| t.node_id == node_id)
    }
}
