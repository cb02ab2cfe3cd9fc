use crate::codec::{self, TaskType, WorkOrderType};
use crate::config::ResolverConfig;
use crate::error::ResolveError;
use crate::flowchart::{
    CompletionMode, Connector, ConnectorDescriptor, Node, NodeConfig, NodeDescriptor, NodeTask,
    Stage, StageDescriptor, UnitDescriptor,
};
use crate::store::RoleLookup;
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;
use uuid::Uuid;

/// A stage whose `order` is not known until every stage has been seen.
#[derive(Debug)]
struct PendingStage {
    id: Uuid,
    unit_id: String,
    name: String,
    x: f64,
}

/// Collects descriptors into resolved records, enforcing the per-kind
/// uniqueness and cardinality rules as units arrive.
pub(super) struct UnitCollector<'a> {
    config: &'a ResolverConfig,
    roles: Option<&'a dyn RoleLookup>,
    stages: Vec<PendingStage>,
    stage_ids: AHashMap<String, Uuid>,
    stage_names: AHashSet<String>,
    nodes: Vec<Node>,
    node_parents: Vec<Option<String>>,
    node_ids: AHashMap<String, Uuid>,
    node_names: AHashSet<String>,
    node_configs: Vec<NodeConfig>,
    node_tasks: Vec<NodeTask>,
    connectors: Vec<(Uuid, ConnectorDescriptor)>,
    connector_ids: AHashSet<String>,
}

/// Everything the topology check and the persistence layer need.
pub(super) struct CollectedUnits {
    pub stages: Vec<Stage>,
    pub nodes: Vec<Node>,
    pub connectors: Vec<Connector>,
    pub node_configs: Vec<NodeConfig>,
    pub node_tasks: Vec<NodeTask>,
}

impl<'a> UnitCollector<'a> {
    pub(super) fn new(config: &'a ResolverConfig, roles: Option<&'a dyn RoleLookup>) -> Self {
        Self {
            config,
            roles,
            stages: Vec::new(),
            stage_ids: AHashMap::new(),
            stage_names: AHashSet::new(),
            nodes: Vec::new(),
            node_parents: Vec::new(),
            node_ids: AHashMap::new(),
            node_names: AHashSet::new(),
            node_configs: Vec::new(),
            node_tasks: Vec::new(),
            connectors: Vec::new(),
            connector_ids: AHashSet::new(),
        }
    }

    pub(super) fn add(&mut self, unit: UnitDescriptor) -> Result<(), ResolveError> {
        match unit {
            UnitDescriptor::Stage(stage) => self.add_stage(stage),
            UnitDescriptor::Node(node) => self.add_node(node),
            UnitDescriptor::Connector(connector) => self.add_connector(connector),
        }
    }

    fn add_stage(&mut self, stage: StageDescriptor) -> Result<(), ResolveError> {
        if self.stage_ids.contains_key(&stage.unit_id) {
            return Err(ResolveError::StageUnitIdRepeat {
                unit_id: stage.unit_id,
            });
        }
        if self.stage_names.contains(&stage.name) {
            return Err(ResolveError::StageNameRepeat { name: stage.name });
        }
        if self.stages.len() >= self.config.max_stages {
            return Err(ResolveError::StageCountTooMuch {
                limit: self.config.max_stages,
            });
        }

        let id = Uuid::new_v4();
        self.stage_ids.insert(stage.unit_id.clone(), id);
        self.stage_names.insert(stage.name.clone());
        self.stages.push(PendingStage {
            id,
            unit_id: stage.unit_id,
            name: stage.name,
            x: stage.x,
        });
        Ok(())
    }

    fn add_node(&mut self, node: NodeDescriptor) -> Result<(), ResolveError> {
        if self.node_ids.contains_key(&node.unit_id) {
            return Err(ResolveError::NodeUnitIdRepeat {
                unit_id: node.unit_id,
            });
        }
        if self.node_names.contains(&node.name) {
            return Err(ResolveError::NodeNameRepeat { name: node.name });
        }
        if self.nodes.len() >= self.config.max_nodes {
            return Err(ResolveError::NodeCountTooMuch {
                limit: self.config.max_nodes,
            });
        }

        let task_type = encode_types::<TaskType>(&node, "task_config", &node.task_types)?;
        let work_order_type =
            encode_types::<WorkOrderType>(&node, "work_order_config", &node.work_order_types)?;
        if let Some(role_id) = &node.role_id {
            self.check_role(&node.name, role_id)?;
        }

        let id = Uuid::new_v4();
        self.node_configs.push(NodeConfig {
            id: Uuid::new_v4(),
            node_id: id,
            start_mode: node.start_mode,
            completion_mode: CompletionMode::Auto,
        });
        if task_type.is_some() || work_order_type.is_some() || node.role_id.is_some() {
            self.node_tasks.push(NodeTask {
                id: Uuid::new_v4(),
                node_id: id,
                unit_id: node.unit_id.clone(),
                completion_mode: CompletionMode::Manual,
                task_type: task_type.unwrap_or(0),
                work_order_type: work_order_type.unwrap_or(0),
                role_id: node.role_id.clone(),
            });
        }

        self.node_ids.insert(node.unit_id.clone(), id);
        self.node_names.insert(node.name.clone());
        self.node_parents.push(node.parent);
        self.nodes.push(Node {
            id,
            unit_id: node.unit_id,
            name: node.name,
            parent_id: None,
        });
        Ok(())
    }

    fn add_connector(&mut self, connector: ConnectorDescriptor) -> Result<(), ResolveError> {
        if !self.connector_ids.insert(connector.unit_id.clone()) {
            return Err(ResolveError::ConnectorUnitIdRepeat {
                unit_id: connector.unit_id,
            });
        }
        self.connectors.push((Uuid::new_v4(), connector));
        Ok(())
    }

    fn check_role(&self, node_name: &str, role_id: &str) -> Result<(), ResolveError> {
        let Some(roles) = self.roles else {
            return Ok(());
        };
        match roles.lookup_role(role_id)? {
            Some(role) if role.active => Ok(()),
            _ => Err(ResolveError::NodeRoleNotFound {
                name: node_name.to_string(),
                role_id: role_id.to_string(),
            }),
        }
    }

    /// Resolves stage membership and connector endpoints, then orders stages.
    pub(super) fn finish(mut self) -> Result<CollectedUnits, ResolveError> {
        self.resolve_parents()?;
        let connectors = self.resolve_connectors()?;
        let stages = order_stages(self.stages)?;
        Ok(CollectedUnits {
            stages,
            nodes: self.nodes,
            connectors,
            node_configs: self.node_configs,
            node_tasks: self.node_tasks,
        })
    }

    fn resolve_parents(&mut self) -> Result<(), ResolveError> {
        let mut parented = 0;
        for (node, parent) in self.nodes.iter_mut().zip(&self.node_parents) {
            let Some(parent) = parent else { continue };
            let stage_id =
                self.stage_ids
                    .get(parent)
                    .ok_or_else(|| ResolveError::NodeStageNotFound {
                        name: node.name.clone(),
                        parent: parent.clone(),
                    })?;
            node.parent_id = Some(*stage_id);
            parented += 1;
        }
        if self.stages.is_empty() {
            return Ok(());
        }
        let first_unassigned = self.nodes.iter().find(|node| node.parent_id.is_none());
        if let Some(node) = first_unassigned {
            return Err(ResolveError::NodeNotStage {
                name: node.name.clone(),
                unit_id: node.unit_id.clone(),
                unassigned: self.nodes.len() - parented,
            });
        }
        Ok(())
    }

    fn resolve_connectors(&self) -> Result<Vec<Connector>, ResolveError> {
        let endpoint = |connector: &ConnectorDescriptor, unit_id: &str| {
            self.node_ids
                .get(unit_id)
                .copied()
                .ok_or_else(|| ResolveError::NodeNotExist {
                    connector: connector.unit_id.clone(),
                    node: unit_id.to_string(),
                })
        };
        let mut resolved = Vec::with_capacity(self.connectors.len());
        for (id, connector) in &self.connectors {
            resolved.push(Connector {
                id: *id,
                unit_id: connector.unit_id.clone(),
                source_id: endpoint(connector, &connector.source)?,
                target_id: endpoint(connector, &connector.target)?,
            });
        }
        Ok(resolved)
    }
}

fn encode_types<F: codec::TypeFlag>(
    node: &NodeDescriptor,
    field: &'static str,
    json: &Option<String>,
) -> Result<Option<i32>, ResolveError> {
    json.as_deref()
        .map(|json| {
            codec::encode_json::<F>(json).map_err(|source| ResolveError::InvalidContent {
                name: node.name.clone(),
                field,
                source,
            })
        })
        .transpose()
}

/// Sorts stages left to right and assigns 1-based orders.
fn order_stages(mut stages: Vec<PendingStage>) -> Result<Vec<Stage>, ResolveError> {
    stages.sort_by(|a, b| a.x.total_cmp(&b.x));
    if let Some((first, second)) = stages.iter().tuple_windows().find(|(a, b)| a.x == b.x) {
        return Err(ResolveError::StagePositionOverlap {
            first: first.name.clone(),
            second: second.name.clone(),
            x: first.x,
        });
    }
    if !stages.is_empty() {
        log::debug!(
            "Stage order: {}",
            stages.iter().map(|s| s.name.as_str()).join(" -> ")
        );
    }
    Ok(stages
        .into_iter()
        .enumerate()
        .map(|(index, stage)| Stage {
            id: stage.id,
            unit_id: stage.unit_id,
            name: stage.name,
            order: index as u32 + 1,
        })
        .collect())
}
