//! Common test utilities for building flowchart editor payloads.
use serde_json::{Value, json};
use std::collections::HashMap;
use uuid::Uuid;

/// Builds a unit array the way the editor sends it.
///
/// Units are addressed by short labels; each label is bound to a fresh UUID
/// the first time it is used.
#[allow(dead_code)]
#[derive(Default)]
pub struct Flow {
    ids: HashMap<String, String>,
    pub units: Vec<Value>,
}

#[allow(dead_code)]
impl Flow {
    pub fn new() -> Self {
        Self::default()
    }

    /// The UUID bound to `label`.
    pub fn id(&mut self, label: &str) -> String {
        self.ids
            .entry(label.to_string())
            .or_insert_with(|| Uuid::new_v4().to_string())
            .clone()
    }

    pub fn stage(mut self, label: &str, name: &str, x: f64) -> Self {
        let id = self.id(label);
        self.units.push(json!({
            "id": id,
            "shape": "stage",
            "position": { "x": x, "y": 0.0 },
            "data": { "name": name },
        }));
        self
    }

    pub fn node(self, label: &str, name: &str, parent: Option<&str>) -> Self {
        self.node_with(label, name, parent, json!({}))
    }

    /// A node whose `data` is extended with the fields of `extra`.
    pub fn node_with(mut self, label: &str, name: &str, parent: Option<&str>, extra: Value) -> Self {
        let id = self.id(label);
        let mut data = json!({
            "name": name,
            "node_config": {
                "start_mode": "any_node_completion",
                "completion_mode": "auto",
            },
        });
        if let (Some(data), Value::Object(extra)) = (data.as_object_mut(), extra) {
            data.extend(extra);
        }
        let mut unit = json!({ "id": id, "shape": "input_node", "data": data });
        if let Some(parent) = parent {
            unit["parent"] = json!(self.id(parent));
        }
        self.units.push(unit);
        self
    }

    pub fn edge(mut self, label: &str, source: &str, target: &str) -> Self {
        let id = self.id(label);
        let source = self.id(source);
        let target = self.id(target);
        self.units.push(json!({
            "id": id,
            "shape": "edge",
            "source": { "cell": source },
            "target": { "cell": target },
        }));
        self
    }

    /// A chain of stage-less nodes `n0 -> n1 -> ...` named `Node 0`, `Node 1`, ...
    pub fn chain(mut self, len: usize) -> Self {
        for i in 0..len {
            self = self.node(&format!("n{}", i), &format!("Node {}", i), None);
        }
        for i in 1..len {
            self = self.edge(&format!("e{}", i), &format!("n{}", i - 1), &format!("n{}", i));
        }
        self
    }

    pub fn push(mut self, unit: Value) -> Self {
        self.units.push(unit);
        self
    }

    pub fn to_json(&self) -> String {
        Value::Array(self.units.clone()).to_string()
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.to_json().into_bytes()
    }
}

/// One stage holding a `Start -> End` chain.
#[allow(dead_code)]
pub fn create_simple_flow() -> Flow {
    Flow::new()
        .stage("S1", "Stage1", 0.0)
        .node("N1", "Start", Some("S1"))
        .node("N2", "End", Some("S1"))
        .edge("L1", "N1", "N2")
}

/// Two stages and a diamond `Collect -> (Clean | Analyse) -> Report`.
#[allow(dead_code)]
pub fn create_diamond_flow() -> Flow {
    Flow::new()
        .stage("S1", "Intake", 0.0)
        .stage("S2", "Processing", 400.0)
        .node_with(
            "A",
            "Collect",
            Some("S1"),
            json!({ "task_config": { "value": "[\"dataCollecting\"]" } }),
        )
        .node("B", "Clean", Some("S2"))
        .node("C", "Analyse", Some("S2"))
        .node_with(
            "D",
            "Report",
            Some("S2"),
            json!({
                "task_config": { "value": "[\"dataReporting\",\"dataArchiving\"]" },
                "work_order_config": { "value": "[\"data_security\"]" },
            }),
        )
        .edge("AB", "A", "B")
        .edge("AC", "A", "C")
        .edge("BD", "B", "D")
        .edge("CD", "C", "D")
}
