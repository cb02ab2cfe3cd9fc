use super::{FlowchartStatus, FlowchartStore, FlowchartTarget, Role, RoleLookup};
use crate::error::StoreError;
use crate::flowchart::{NodeConfig, NodeTask, Unit};
use ahash::AHashMap;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// Everything stored for one flowchart version.
#[derive(Debug, Clone)]
pub struct StoredFlowchart {
    pub target: FlowchartTarget,
    pub units: Vec<Unit>,
    pub node_configs: Vec<NodeConfig>,
    pub node_tasks: Vec<NodeTask>,
}

#[derive(Default)]
struct State {
    flowcharts: AHashMap<Uuid, StoredFlowchart>,
    /// Writes that lose the guard to a simulated concurrent editor.
    pending_interference: u32,
    pending_failure: Option<StoreError>,
    write_attempts: u32,
}

/// Non-durable `FlowchartStore` for tests and tools.
#[derive(Default)]
pub struct InMemoryFlowchartStore {
    state: Mutex<State>,
}

impl InMemoryFlowchartStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, StoreError> {
        self.state
            .lock()
            .map_err(|e| StoreError::Backend(format!("mutex poisoned: {}", e)))
    }

    /// Creates an empty draft and returns its id.
    pub fn create(&self, name: &str) -> Result<Uuid, StoreError> {
        let id = Uuid::new_v4();
        let target = FlowchartTarget {
            id,
            name: name.to_string(),
            revision: 0,
            status: FlowchartStatus::Draft,
            draw_properties: String::new(),
            image: None,
        };
        self.lock()?.flowcharts.insert(
            id,
            StoredFlowchart {
                target,
                units: Vec::new(),
                node_configs: Vec::new(),
                node_tasks: Vec::new(),
            },
        );
        Ok(id)
    }

    pub fn get(&self, id: Uuid) -> Result<Option<StoredFlowchart>, StoreError> {
        Ok(self.lock()?.flowcharts.get(&id).cloned())
    }

    /// Makes the next `writes` conditional writes lose their guard, as if
    /// another editor had committed just before each of them.
    pub fn interfere_with_next(&self, writes: u32) -> Result<(), StoreError> {
        self.lock()?.pending_interference = writes;
        Ok(())
    }

    /// Makes the next conditional write fail with `error`.
    pub fn fail_next_write(&self, error: StoreError) -> Result<(), StoreError> {
        self.lock()?.pending_failure = Some(error);
        Ok(())
    }

    /// Number of conditional writes attempted so far.
    pub fn write_attempts(&self) -> Result<u32, StoreError> {
        Ok(self.lock()?.write_attempts)
    }

    fn conditional_write(
        &self,
        target: &FlowchartTarget,
        has_image: bool,
        apply: impl FnOnce(&mut StoredFlowchart),
    ) -> Result<bool, StoreError> {
        let mut state = self.lock()?;
        state.write_attempts += 1;
        if let Some(error) = state.pending_failure.take() {
            return Err(error);
        }
        let interfere = state.pending_interference > 0;
        if interfere {
            state.pending_interference -= 1;
        }

        let stored = state
            .flowcharts
            .get_mut(&target.id)
            .ok_or_else(|| StoreError::NotFound(target.id.to_string()))?;
        if interfere {
            stored.target.revision += 1;
        }
        if stored.target.revision != target.revision {
            return Ok(false);
        }

        let image = if has_image {
            target.image.clone()
        } else {
            stored.target.image.take()
        };
        stored.target = FlowchartTarget {
            revision: target.revision + 1,
            image,
            ..target.clone()
        };
        apply(stored);
        Ok(true)
    }
}

impl FlowchartStore for InMemoryFlowchartStore {
    fn load_target(&self, id: Uuid) -> Result<FlowchartTarget, StoreError> {
        self.lock()?
            .flowcharts
            .get(&id)
            .map(|stored| stored.target.clone())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn update_draw_properties_and_image(
        &self,
        target: &FlowchartTarget,
        has_image: bool,
    ) -> Result<bool, StoreError> {
        self.conditional_write(target, has_image, |_| {})
    }

    fn save_content(
        &self,
        target: &FlowchartTarget,
        units: &[Unit],
        node_configs: &[NodeConfig],
        node_tasks: &[NodeTask],
        has_image: bool,
    ) -> Result<bool, StoreError> {
        self.conditional_write(target, has_image, |stored| {
            stored.units = units.to_vec();
            stored.node_configs = node_configs.to_vec();
            stored.node_tasks = node_tasks.to_vec();
        })
    }
}

/// Fixed role table implementing `RoleLookup`.
#[derive(Default)]
pub struct InMemoryRoleDirectory {
    roles: Mutex<AHashMap<String, Role>>,
}

impl InMemoryRoleDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, role_id: &str, active: bool) -> Result<(), StoreError> {
        let role = Role {
            id: role_id.to_string(),
            active,
        };
        self.roles
            .lock()
            .map_err(|e| StoreError::Backend(format!("mutex poisoned: {}", e)))?
            .insert(role_id.to_string(), role);
        Ok(())
    }
}

impl RoleLookup for InMemoryRoleDirectory {
    fn lookup_role(&self, role_id: &str) -> Result<Option<Role>, StoreError> {
        let roles = self
            .roles
            .lock()
            .map_err(|e| StoreError::Backend(format!("mutex poisoned: {}", e)))?;
        Ok(roles.get(role_id).cloned())
    }
}
