use crate::error::BindError;
use crate::flowchart::{
    ConnectorDescriptor, NodeDescriptor, StageDescriptor, StartMode, UnitDescriptor,
};
use crate::ui::{UiCompletionMode, UiShape, UiTypeConfig, UiUnit, UiUnitData};
use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

/// Maximum length of a stage or node name, in characters.
pub const MAX_NAME_CHARS: usize = 50;

static NAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\p{L}\p{N} _\-.()]+$").expect("valid name pattern")
});

/// Binds the raw editor payload into typed unit descriptors.
///
/// Schema mismatches (including unknown `shape`/`start_mode` values) are
/// reported as `ContentInvalid`; field rules as `FieldInvalid`.
pub fn bind(raw: &[u8], max_content_bytes: usize) -> Result<Vec<UnitDescriptor>, BindError> {
    if raw.len() > max_content_bytes {
        return Err(BindError::ContentTooLarge {
            size: raw.len(),
            limit: max_content_bytes,
        });
    }
    let units: Vec<UiUnit> =
        serde_json::from_slice(raw).map_err(|e| BindError::ContentInvalid(e.to_string()))?;
    if units.is_empty() {
        return Err(BindError::ContentEmpty);
    }

    units
        .into_iter()
        .enumerate()
        .map(|(index, unit)| bind_unit(index, unit))
        .collect()
}

fn bind_unit(index: usize, unit: UiUnit) -> Result<UnitDescriptor, BindError> {
    let check = FieldCheck {
        index,
        unit_id: &unit.id,
    };
    check.uuid("id", &unit.id)?;
    if unit.shape != UiShape::Edge {
        if unit.source.is_some() {
            return Err(check.invalid("source", "is only allowed on edges"));
        }
        if unit.target.is_some() {
            return Err(check.invalid("target", "is only allowed on edges"));
        }
    }

    match unit.shape {
        UiShape::Stage => {
            let position = check.required("position", unit.position)?;
            let data = check.required("data", unit.data.as_ref())?;
            let name = check.name(data)?;
            Ok(UnitDescriptor::Stage(StageDescriptor {
                unit_id: unit.id.clone(),
                name,
                x: position.x,
                y: position.y,
            }))
        }
        UiShape::InputNode => {
            let data = check.required("data", unit.data.as_ref())?;
            let name = check.name(data)?;
            if let Some(parent) = &unit.parent {
                check.uuid("parent", parent)?;
            }
            let config = check.required("data.node_config", data.node_config.as_ref())?;
            if config.completion_mode != UiCompletionMode::Auto {
                return Err(check.invalid(
                    "data.node_config.completion_mode",
                    "only 'auto' is allowed",
                ));
            }
            if let Some(role_id) = &data.role_id {
                check.uuid("data.role_id", role_id)?;
            }
            Ok(UnitDescriptor::Node(NodeDescriptor {
                unit_id: unit.id.clone(),
                name,
                parent: unit.parent.clone(),
                start_mode: StartMode::from(config.start_mode),
                task_types: type_list(data.task_config.as_ref()),
                work_order_types: type_list(data.work_order_config.as_ref()),
                role_id: data.role_id.clone(),
            }))
        }
        UiShape::Edge => {
            let source = check.required("source", unit.source.as_ref())?;
            let target = check.required("target", unit.target.as_ref())?;
            check.uuid("source.cell", &source.cell)?;
            check.uuid("target.cell", &target.cell)?;
            Ok(UnitDescriptor::Connector(ConnectorDescriptor {
                unit_id: unit.id.clone(),
                source: source.cell.clone(),
                target: target.cell.clone(),
            }))
        }
    }
}

fn type_list(config: Option<&UiTypeConfig>) -> Option<String> {
    config
        .map(|c| c.value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Field rules evaluated against one unit, reporting its index and id.
struct FieldCheck<'a> {
    index: usize,
    unit_id: &'a str,
}

impl FieldCheck<'_> {
    fn invalid(&self, field: &str, reason: &str) -> BindError {
        BindError::FieldInvalid {
            index: self.index,
            unit_id: self.unit_id.to_string(),
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }

    fn required<T>(&self, field: &str, value: Option<T>) -> Result<T, BindError> {
        value.ok_or_else(|| self.invalid(field, "is required"))
    }

    fn uuid(&self, field: &str, value: &str) -> Result<(), BindError> {
        Uuid::parse_str(value)
            .map(|_| ())
            .map_err(|_| self.invalid(field, "must be a UUID"))
    }

    fn name(&self, data: &UiUnitData) -> Result<String, BindError> {
        let name = self.required("data.name", data.name.as_deref())?.trim();
        if name.is_empty() {
            return Err(self.invalid("data.name", "must not be blank"));
        }
        if name.chars().count() > MAX_NAME_CHARS {
            return Err(self.invalid(
                "data.name",
                &format!("must be at most {} characters", MAX_NAME_CHARS),
            ));
        }
        if !NAME_PATTERN.is_match(name) {
            return Err(self.invalid("data.name", "contains unsupported characters"));
        }
        Ok(name.to_string())
    }
}
