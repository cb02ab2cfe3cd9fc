use serde::Deserialize;

/// Kind of graph element drawn in the editor.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UiShape {
    Stage,
    InputNode,
    Edge,
}

/// How a node is started once its predecessors progress.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UiStartMode {
    AnyNodeCompletion,
    AllNodeCompletion,
    AnyNodeStart,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UiCompletionMode {
    Auto,
    Manual,
}

/// Endpoint of an edge, pointing at a cell by its unit id.
#[derive(Debug, Deserialize, Clone)]
pub struct UiCellRef {
    pub cell: String,
    #[serde(default)]
    pub port: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct UiPosition {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UiNodeConfig {
    #[serde(alias = "startMode")]
    pub start_mode: UiStartMode,
    #[serde(alias = "completionMode")]
    pub completion_mode: UiCompletionMode,
}

/// A type set as sent by the editor: a JSON-encoded array of names.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct UiTypeConfig {
    #[serde(default)]
    pub value: String,
}

/// Payload of a stage or node.
#[derive(Debug, Deserialize, Clone)]
pub struct UiUnitData {
    pub name: Option<String>,
    #[serde(default, alias = "nodeConfig")]
    pub node_config: Option<UiNodeConfig>,
    #[serde(default, alias = "taskConfig")]
    pub task_config: Option<UiTypeConfig>,
    #[serde(default, alias = "workOrderConfig")]
    pub work_order_config: Option<UiTypeConfig>,
    #[serde(default, alias = "roleId")]
    pub role_id: Option<String>,
}

/// One element of the editor's cell array.
#[derive(Debug, Deserialize, Clone)]
pub struct UiUnit {
    pub id: String,
    pub shape: UiShape,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub source: Option<UiCellRef>,
    #[serde(default)]
    pub target: Option<UiCellRef>,
    #[serde(default)]
    pub position: Option<UiPosition>,
    #[serde(default)]
    pub data: Option<UiUnitData>,
}
