//! Typed unit descriptors produced by binding the editor payload.
//!
//! Every editor cell is bound into exactly one variant of [`UnitDescriptor`];
//! later phases never look at the `shape` string again.

use crate::ui::{UiCompletionMode, UiStartMode};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartMode {
    AnyNodeCompletion,
    AllNodeCompletion,
    AnyNodeStart,
}

impl StartMode {
    pub fn as_str(self) -> &'static str {
        match self {
            StartMode::AnyNodeCompletion => "any_node_completion",
            StartMode::AllNodeCompletion => "all_node_completion",
            StartMode::AnyNodeStart => "any_node_start",
        }
    }
}

impl From<UiStartMode> for StartMode {
    fn from(mode: UiStartMode) -> Self {
        match mode {
            UiStartMode::AnyNodeCompletion => StartMode::AnyNodeCompletion,
            UiStartMode::AllNodeCompletion => StartMode::AllNodeCompletion,
            UiStartMode::AnyNodeStart => StartMode::AnyNodeStart,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionMode {
    Auto,
    Manual,
}

impl CompletionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            CompletionMode::Auto => "auto",
            CompletionMode::Manual => "manual",
        }
    }
}

impl From<UiCompletionMode> for CompletionMode {
    fn from(mode: UiCompletionMode) -> Self {
        match mode {
            UiCompletionMode::Auto => CompletionMode::Auto,
            UiCompletionMode::Manual => CompletionMode::Manual,
        }
    }
}

impl fmt::Display for StartMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for CompletionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stage as drawn in the editor, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct StageDescriptor {
    pub unit_id: String,
    pub name: String,
    pub x: f64,
    pub y: f64,
}

/// A node as drawn in the editor, before validation.
///
/// `task_types` and `work_order_types` hold the editor's JSON-encoded name
/// arrays and are only decoded during resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDescriptor {
    pub unit_id: String,
    pub name: String,
    pub parent: Option<String>,
    pub start_mode: StartMode,
    pub task_types: Option<String>,
    pub work_order_types: Option<String>,
    pub role_id: Option<String>,
}

/// A directed edge between two node unit ids.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorDescriptor {
    pub unit_id: String,
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UnitDescriptor {
    Stage(StageDescriptor),
    Node(NodeDescriptor),
    Connector(ConnectorDescriptor),
}

impl UnitDescriptor {
    pub fn unit_id(&self) -> &str {
        match self {
            UnitDescriptor::Stage(s) => &s.unit_id,
            UnitDescriptor::Node(n) => &n.unit_id,
            UnitDescriptor::Connector(c) => &c.unit_id,
        }
    }
}
