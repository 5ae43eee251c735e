//! Edge derivation over a populated node registry.

use std::collections::HashSet;

use crate::api::PetId;
use crate::graph::{Edge, NodeRegistry};
use crate::{PetlineageError, Result};

/// Derive all directed parent→child edges from the registry.
///
/// A relation is recorded on both endpoints (a parent lists the child,
/// the child lists the parent), so the same directed edge is typically
/// discoverable twice; the (from, to) key collapses the duplicates. Any
/// relation pointing at an id that never made it into the registry is a
/// discovery-phase logic error and fails the whole run.
pub fn derive_edges(registry: &mut NodeRegistry) -> Result<Vec<Edge>> {
    let mut seen: HashSet<(PetId, PetId)> = HashSet::new();
    let mut edges = Vec::new();

    // Child-direction pass: this node -> each listed child.
    let mut child_lists: Vec<(PetId, Vec<PetId>)> = Vec::new();
    for (&id, node) in registry.iter_mut() {
        node.visited_children = true;
        child_lists.push((id, node.record.children.clone()));
    }
    for (from, children) in child_lists {
        for to in children {
            push_edge(registry, &mut seen, &mut edges, from, to, "child")?;
        }
    }

    // Parent-direction pass: each listed parent -> this node.
    let mut parent_lists: Vec<(PetId, Vec<PetId>)> = Vec::new();
    for (&id, node) in registry.iter_mut() {
        node.visited_parents = true;
        parent_lists.push((id, node.record.parents.clone()));
    }
    for (to, parents) in parent_lists {
        for from in parents {
            push_edge(registry, &mut seen, &mut edges, from, to, "parent")?;
        }
    }

    log::debug!("Derived {} edges", edges.len());
    Ok(edges)
}

fn push_edge(
    registry: &NodeRegistry,
    seen: &mut HashSet<(PetId, PetId)>,
    edges: &mut Vec<Edge>,
    from: PetId,
    to: PetId,
    pass: &str,
) -> Result<()> {
    let from_node = registry.get(&from).ok_or_else(|| {
        PetlineageError::Consistency(format!(
            "{pass} pass references unregistered pet {from} (edge {from} -> {to})"
        ))
    })?;
    let to_node = registry.get(&to).ok_or_else(|| {
        PetlineageError::Consistency(format!(
            "{pass} pass references unregistered pet {to} (edge {from} -> {to})"
        ))
    })?;

    if seen.insert((from, to)) {
        let degraded = from_node.record.is_placeholder() || to_node.record.is_placeholder();
        edges.push(Edge { from, to, degraded });
    }
    Ok(())
}
