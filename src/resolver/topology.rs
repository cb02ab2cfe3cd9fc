use crate::error::ResolveError;
use crate::flowchart::{Connector, Node};
use ahash::{AHashMap, AHashSet};
use uuid::Uuid;

/// The single entry and exit of a validated flowchart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoints {
    pub start: Uuid,
    pub end: Uuid,
}

/// Adjacency over the nodes that take part in at least one connector.
struct Adjacency<'a> {
    outgoing: AHashMap<Uuid, Vec<Uuid>>,
    in_degree: AHashMap<Uuid, usize>,
    names: AHashMap<Uuid, &'a str>,
}

impl<'a> Adjacency<'a> {
    fn new(nodes: &'a [Node], connectors: &[Connector]) -> Self {
        let mut outgoing: AHashMap<Uuid, Vec<Uuid>> = AHashMap::new();
        let mut in_degree: AHashMap<Uuid, usize> = AHashMap::new();
        for connector in connectors {
            outgoing
                .entry(connector.source_id)
                .or_default()
                .push(connector.target_id);
            outgoing.entry(connector.target_id).or_default();
            *in_degree.entry(connector.target_id).or_default() += 1;
            in_degree.entry(connector.source_id).or_default();
        }
        let names = nodes.iter().map(|n| (n.id, n.name.as_str())).collect();
        Self {
            outgoing,
            in_degree,
            names,
        }
    }

    fn name(&self, id: Uuid) -> String {
        self.names.get(&id).copied().unwrap_or_default().to_string()
    }

    fn successors(&self, id: Uuid) -> &[Uuid] {
        self.outgoing.get(&id).map(Vec::as_slice).unwrap_or_default()
    }
}

/// Checks that the node graph has one start, one end, no loop and no orphan.
///
/// `nodes` must be in input order; the first offending node in that order is
/// the one reported.
pub fn check(nodes: &[Node], connectors: &[Connector]) -> Result<Endpoints, ResolveError> {
    let Some(first) = nodes.first() else {
        return Err(ResolveError::NodeMissing);
    };
    if connectors.is_empty() {
        if let Some(orphan) = nodes.get(1) {
            return Err(ResolveError::NodeExistFree {
                name: orphan.name.clone(),
            });
        }
        return Ok(Endpoints {
            start: first.id,
            end: first.id,
        });
    }

    let graph = Adjacency::new(nodes, connectors);
    let connected: Vec<&Node> = nodes
        .iter()
        .filter(|n| graph.in_degree.contains_key(&n.id))
        .collect();
    let starts: Vec<&Node> = connected
        .iter()
        .copied()
        .filter(|n| graph.in_degree.get(&n.id) == Some(&0))
        .collect();
    let ends: Vec<&Node> = connected
        .iter()
        .copied()
        .filter(|n| graph.successors(n.id).is_empty())
        .collect();

    if starts.len() > 1 {
        return Err(ResolveError::NodeMultiStart {
            names: starts.iter().map(|n| n.name.clone()).collect(),
        });
    }
    if ends.len() > 1 {
        return Err(ResolveError::NodeMultiEnd {
            names: ends.iter().map(|n| n.name.clone()).collect(),
        });
    }
    let (Some(start), Some(end)) = (starts.first(), ends.first()) else {
        // Every connected node has a predecessor, or every one has a successor.
        let looped = connected
            .first()
            .map(|n| n.name.clone())
            .unwrap_or_default();
        return Err(ResolveError::NodeHasLoop { name: looped });
    };

    let reached = walk(&graph, start.id)?;
    if let Some(orphan) = nodes.iter().find(|n| !reached.contains(&n.id)) {
        return Err(ResolveError::NodeExistFree {
            name: orphan.name.clone(),
        });
    }

    log::debug!("Flowchart runs from '{}' to '{}'", start.name, end.name);
    Ok(Endpoints {
        start: start.id,
        end: end.id,
    })
}

/// Depth-first walk from `start` along outgoing connectors.
///
/// `on_path` holds the nodes of the current branch only; meeting one of them
/// again closes a loop. `reached` accumulates every node seen across branches,
/// so a node finished on one branch is not walked again from a sibling.
fn walk(graph: &Adjacency<'_>, start: Uuid) -> Result<AHashSet<Uuid>, ResolveError> {
    let mut reached = AHashSet::new();
    let mut on_path = AHashSet::new();
    let mut stack: Vec<(Uuid, usize)> = vec![(start, 0)];
    reached.insert(start);
    on_path.insert(start);

    while let Some((current, next_child)) = stack.last_mut() {
        let current = *current;
        let successors = graph.successors(current);
        let Some(&child) = successors.get(*next_child) else {
            on_path.remove(&current);
            stack.pop();
            continue;
        };
        *next_child += 1;

        if on_path.contains(&child) {
            return Err(ResolveError::NodeHasLoop {
                name: graph.name(child),
            });
        }
        if reached.insert(child) {
            on_path.insert(child);
            stack.push((child, 0));
        }
    }
    Ok(reached)
}
