use crate::config::ResolverConfig;
use crate::error::{BindError, ResolveError, SaveError};
use crate::flowchart::{ResolvedGraph, UnitDescriptor};
use crate::store::RoleLookup;
use std::sync::Arc;

mod binding;
pub mod topology;
mod units;

pub use binding::{MAX_NAME_CHARS, bind};
pub use topology::Endpoints;

use units::UnitCollector;

/// Turns raw editor content into a validated, persistable flowchart graph.
///
/// A `Resolver` holds no per-request state; one instance can serve every save
/// request of a process.
#[derive(Clone)]
pub struct Resolver {
    config: ResolverConfig,
    roles: Option<Arc<dyn RoleLookup>>,
}

pub struct ResolverBuilder {
    config: ResolverConfig,
    roles: Option<Arc<dyn RoleLookup>>,
}

impl ResolverBuilder {
    pub fn new() -> Self {
        Self {
            config: ResolverConfig::default(),
            roles: None,
        }
    }
    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }
    pub fn with_max_stages(mut self, max_stages: usize) -> Self {
        self.config.max_stages = max_stages;
        self
    }
    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.config.max_nodes = max_nodes;
        self
    }
    pub fn with_max_content_bytes(mut self, max_content_bytes: usize) -> Self {
        self.config.max_content_bytes = max_content_bytes;
        self
    }
    /// Enables role checks: nodes assigned a missing or inactive role are rejected.
    pub fn with_role_lookup(mut self, roles: Arc<dyn RoleLookup>) -> Self {
        self.roles = Some(roles);
        self
    }
    pub fn build(self) -> Resolver {
        Resolver {
            config: self.config,
            roles: self.roles,
        }
    }
}

impl Default for ResolverBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for Resolver {
    fn default() -> Self {
        ResolverBuilder::new().build()
    }
}

impl Resolver {
    pub fn builder() -> ResolverBuilder {
        ResolverBuilder::new()
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Binds raw content into unit descriptors, applying the field rules.
    pub fn bind(&self, raw: &[u8]) -> Result<Vec<UnitDescriptor>, BindError> {
        bind(raw, self.config.max_content_bytes)
    }

    /// Runs the structural checks over bound units.
    ///
    /// The first violation aborts resolution.
    pub fn resolve_units(&self, units: Vec<UnitDescriptor>) -> Result<ResolvedGraph, ResolveError> {
        let mut collector = UnitCollector::new(&self.config, self.roles.as_deref());
        for unit in units {
            collector.add(unit)?;
        }
        let collected = collector.finish()?;
        log::debug!(
            "Resolved {} stages, {} nodes, {} connectors",
            collected.stages.len(),
            collected.nodes.len(),
            collected.connectors.len()
        );

        let endpoints = topology::check(&collected.nodes, &collected.connectors)?;

        Ok(ResolvedGraph {
            stages: collected.stages,
            nodes: collected.nodes,
            connectors: collected.connectors,
            node_configs: collected.node_configs,
            node_tasks: collected.node_tasks,
            start_id: endpoints.start,
            end_id: endpoints.end,
        })
    }

    /// Binds and resolves raw content in one step.
    pub fn resolve(&self, raw: &[u8]) -> Result<ResolvedGraph, SaveError> {
        let units = self.bind(raw)?;
        Ok(self.resolve_units(units)?)
    }
}
