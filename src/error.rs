use thiserror::Error;

/// Errors that can occur while binding the raw editor payload into unit descriptors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BindError {
    #[error("Flowchart content is {size} bytes, exceeding the limit of {limit} bytes")]
    ContentTooLarge { size: usize, limit: usize },

    #[error("Flowchart content is not a valid unit array: {0}")]
    ContentInvalid(String),

    #[error("Flowchart content contains no units")]
    ContentEmpty,

    #[error("Unit #{index} ('{unit_id}') has an invalid field '{field}': {reason}")]
    FieldInvalid {
        index: usize,
        unit_id: String,
        field: String,
        reason: String,
    },
}

impl BindError {
    /// The stable error code surfaced to callers.
    pub fn code(&self) -> &'static str {
        match self {
            BindError::ContentTooLarge { .. } => "ContentTooLarge",
            BindError::ContentInvalid(_) => "ContentInvalid",
            BindError::ContentEmpty => "ContentEmpty",
            BindError::FieldInvalid { .. } => "ContentFieldInvalid",
        }
    }
}

/// Errors raised by the task / work-order type codecs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Type list is empty")]
    Empty,

    #[error("Unknown type name '{0}'")]
    Unknown(String),

    #[error("Type name '{0}' is listed more than once")]
    Duplicate(String),

    #[error("Type list is not a JSON array of names: {0}")]
    Malformed(String),
}

/// Structural-invariant violations found while resolving a bound flowchart.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error("Stage unit id '{unit_id}' is used more than once")]
    StageUnitIdRepeat { unit_id: String },

    #[error("Stage name '{name}' is used more than once")]
    StageNameRepeat { name: String },

    #[error("Flowchart has more than {limit} stages")]
    StageCountTooMuch { limit: usize },

    #[error("Stages '{first}' and '{second}' share the same horizontal position {x}")]
    StagePositionOverlap {
        first: String,
        second: String,
        x: f64,
    },

    #[error("Node unit id '{unit_id}' is used more than once")]
    NodeUnitIdRepeat { unit_id: String },

    #[error("Node name '{name}' is used more than once")]
    NodeNameRepeat { name: String },

    #[error("Flowchart has more than {limit} nodes")]
    NodeCountTooMuch { limit: usize },

    #[error("Flowchart contains no node")]
    NodeMissing,

    #[error("Node '{name}' ({unit_id}) and {unassigned} node(s) in total do not belong to any stage")]
    NodeNotStage {
        name: String,
        unit_id: String,
        unassigned: usize,
    },

    #[error("Node '{name}' references stage '{parent}', which does not exist")]
    NodeStageNotFound { name: String, parent: String },

    #[error("Connector '{connector}' references node '{node}', which does not exist")]
    NodeNotExist { connector: String, node: String },

    #[error("Flowchart has more than one start node: {names:?}")]
    NodeMultiStart { names: Vec<String> },

    #[error("Flowchart has more than one end node: {names:?}")]
    NodeMultiEnd { names: Vec<String> },

    #[error("Flowchart contains a loop through node '{name}'")]
    NodeHasLoop { name: String },

    #[error("Node '{name}' is not reachable from the start node")]
    NodeExistFree { name: String },

    #[error("Connector unit id '{unit_id}' is used more than once")]
    ConnectorUnitIdRepeat { unit_id: String },

    #[error("Node '{name}' has an invalid {field}: {source}")]
    InvalidContent {
        name: String,
        field: &'static str,
        source: CodecError,
    },

    #[error("Node '{name}' is assigned role '{role_id}', which does not exist or was deleted")]
    NodeRoleNotFound { name: String, role_id: String },

    #[error("Role lookup failed: {0}")]
    RoleLookup(#[from] StoreError),
}

impl ResolveError {
    /// The stable error code surfaced to callers.
    pub fn code(&self) -> &'static str {
        match self {
            ResolveError::StageUnitIdRepeat { .. } => "StageUnitIDRepeat",
            ResolveError::StageNameRepeat { .. } => "StageNameRepeat",
            ResolveError::StageCountTooMuch { .. } => "StageCountTooMuch",
            ResolveError::StagePositionOverlap { .. } => "StagePositionOverlap",
            ResolveError::NodeUnitIdRepeat { .. } => "NodeUnitIDRepeat",
            ResolveError::NodeNameRepeat { .. } => "NodeNameRepeat",
            ResolveError::NodeCountTooMuch { .. } => "NodeCountTooMuch",
            ResolveError::NodeMissing => "NodeMissing",
            ResolveError::NodeNotStage { .. } => "NodeNotStage",
            ResolveError::NodeStageNotFound { .. } => "NodeStageNotFound",
            ResolveError::NodeNotExist { .. } => "NodeNotExist",
            ResolveError::NodeMultiStart { .. } => "NodeMultiStart",
            ResolveError::NodeMultiEnd { .. } => "NodeMultiEnd",
            ResolveError::NodeHasLoop { .. } => "NodeHasLoop",
            ResolveError::NodeExistFree { .. } => "NodeExistFree",
            ResolveError::ConnectorUnitIdRepeat { .. } => "ConnectorUnitIDRepeat",
            ResolveError::InvalidContent { .. } => "InvalidContent",
            ResolveError::NodeRoleNotFound { .. } => "NodeRoleNotFound",
            ResolveError::RoleLookup(e) => e.code(),
        }
    }
}

/// Errors reported by a storage or lookup collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Flowchart '{0}' not found")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::NotFound(_) => "FlowchartNotFound",
            StoreError::Backend(_) => "StorageError",
        }
    }
}

/// Top-level error of a save request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SaveError {
    #[error(transparent)]
    Bind(#[from] BindError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("A final save requires a flowchart image")]
    ImageRequired,

    #[error("Flowchart '{0}' was changed by another editor, reload and try again")]
    FlowchartAlreadyEdited(String),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl SaveError {
    /// The stable error code surfaced to callers.
    pub fn code(&self) -> &'static str {
        match self {
            SaveError::Bind(e) => e.code(),
            SaveError::Resolve(e) => e.code(),
            SaveError::ImageRequired => "FlowchartImageRequired",
            SaveError::FlowchartAlreadyEdited(_) => "FlowchartAlreadyEdited",
            SaveError::Storage(e) => e.code(),
        }
    }

    /// Whether resubmitting the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SaveError::FlowchartAlreadyEdited(_))
    }
}
