use crate::config::CoordinatorConfig;
use crate::error::{BindError, SaveError, StoreError};
use crate::flowchart::ResolvedGraph;
use crate::resolver::Resolver;
use crate::store::{FlowchartStatus, FlowchartStore, FlowchartTarget};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::thread;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveType {
    /// Stores the drawing verbatim, without structural validation.
    Temp,
    /// Validates the drawing and replaces the version's resolved records.
    Final,
}

impl SaveType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaveType::Temp => "temp",
            SaveType::Final => "final",
        }
    }
}

impl fmt::Display for SaveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveRequest {
    pub flowchart_id: Uuid,
    pub save_type: SaveType,
    /// Raw editor content, the JSON unit array.
    pub content: String,
    #[serde(default)]
    pub image: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveOutcome {
    pub id: Uuid,
    pub name: String,
    pub save_type: SaveType,
}

/// Applies save requests to a `FlowchartStore` under optimistic concurrency.
///
/// Each attempt reloads the target, derives a fresh candidate from it and
/// issues one conditional write. A lost guard is retried after a random
/// back-off until the policy's attempts are used up.
pub struct SaveCoordinator<S: FlowchartStore> {
    store: Arc<S>,
    resolver: Resolver,
    config: CoordinatorConfig,
}

impl<S: FlowchartStore> SaveCoordinator<S> {
    pub fn new(store: Arc<S>, resolver: Resolver) -> Self {
        Self::with_config(store, resolver, CoordinatorConfig::default())
    }

    pub fn with_config(store: Arc<S>, resolver: Resolver, config: CoordinatorConfig) -> Self {
        Self {
            store,
            resolver,
            config,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn save(&self, request: &SaveRequest) -> Result<SaveOutcome, SaveError> {
        let limit = self.resolver.config().max_content_bytes;
        if request.content.len() > limit {
            return Err(BindError::ContentTooLarge {
                size: request.content.len(),
                limit,
            }
            .into());
        }

        match request.save_type {
            SaveType::Temp => self.write_with_retry(request, FlowchartStatus::Draft, |target| {
                self.store
                    .update_draw_properties_and_image(target, request.image.is_some())
            }),
            SaveType::Final => {
                if request.image.is_none() {
                    return Err(SaveError::ImageRequired);
                }
                let graph = self.resolver.resolve(request.content.as_bytes())?;
                self.save_graph(request, &graph)
            }
        }
    }

    fn save_graph(
        &self,
        request: &SaveRequest,
        graph: &ResolvedGraph,
    ) -> Result<SaveOutcome, SaveError> {
        let units = graph.units();
        self.write_with_retry(request, FlowchartStatus::Final, |target| {
            self.store.save_content(
                target,
                &units,
                &graph.node_configs,
                &graph.node_tasks,
                request.image.is_some(),
            )
        })
    }

    fn write_with_retry<W>(
        &self,
        request: &SaveRequest,
        status: FlowchartStatus,
        write: W,
    ) -> Result<SaveOutcome, SaveError>
    where
        W: Fn(&FlowchartTarget) -> Result<bool, StoreError>,
    {
        let policy = &self.config.retry;
        let attempts = policy.attempts();
        let mut rng = rand::rng();

        for attempt in 1..=attempts {
            let current = self.store.load_target(request.flowchart_id)?;
            let candidate = FlowchartTarget {
                status,
                draw_properties: request.content.clone(),
                image: request.image.clone(),
                ..current
            };

            if write(&candidate)? {
                log::info!(
                    "Saved flowchart '{}' ({}) as {} on attempt {}",
                    candidate.name,
                    candidate.id,
                    request.save_type,
                    attempt
                );
                return Ok(SaveOutcome {
                    id: candidate.id,
                    name: candidate.name,
                    save_type: request.save_type,
                });
            }

            if attempt < attempts {
                let backoff = policy.backoff(&mut rng);
                log::warn!(
                    "Flowchart '{}' changed during attempt {}/{}, retrying in {:?}",
                    request.flowchart_id,
                    attempt,
                    attempts,
                    backoff
                );
                thread::sleep(backoff);
            } else {
                log::warn!(
                    "Flowchart '{}' changed during attempt {}/{}, giving up",
                    request.flowchart_id,
                    attempt,
                    attempts
                );
            }
        }

        Err(SaveError::FlowchartAlreadyEdited(
            request.flowchart_id.to_string(),
        ))
    }
}
