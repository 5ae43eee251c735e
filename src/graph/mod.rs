//! Genealogy graph construction: node discovery and edge derivation.
//!
//! Discovers every pet reachable from a root via parent/child links
//! (traversal), then materializes directed parent→child edges from the
//! discovered records (assembly).

mod assembly;
mod builder;
mod traversal;

pub use assembly::derive_edges;
pub use builder::GraphBuilder;
pub use traversal::{discover_all, TraversalOptions};

use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::api::{PetId, PetRecord};

/// One discovered pet in the graph.
///
/// The visited flags are touched only during edge derivation, never
/// during node discovery.
#[derive(Debug, Clone, Serialize)]
pub struct GraphNode {
    pub record: PetRecord,
    #[serde(skip)]
    pub visited_children: bool,
    #[serde(skip)]
    pub visited_parents: bool,
}

impl GraphNode {
    pub fn new(record: PetRecord) -> Self {
        Self {
            record,
            visited_children: false,
            visited_parents: false,
        }
    }
}

/// Directed parent→child edge.
///
/// `degraded` marks edges with an error-placeholder endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub from: PetId,
    pub to: PetId,
    pub degraded: bool,
}

/// Deduplication map from id to node; the traversal's visited-set.
pub type NodeRegistry = HashMap<PetId, GraphNode>;

/// The finished genealogy graph.
#[derive(Debug, Clone, Serialize)]
pub struct PetGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<Edge>,
}

impl PetGraph {
    /// Assemble from a populated registry and derived edges. Nodes are
    /// sorted by id so output is deterministic.
    pub fn from_parts(registry: NodeRegistry, edges: Vec<Edge>) -> Self {
        let mut nodes: Vec<GraphNode> = registry.into_values().collect();
        nodes.sort_by_key(|n| n.record.id);
        Self { nodes, edges }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

/// Receiver for the results of one graph load.
///
/// The label may arrive before graph construction completes; `ready`
/// arrives strictly after `graph`. On a fatal error `failed` is
/// delivered instead of `graph`/`ready`.
#[async_trait]
pub trait GraphSink: Send + Sync {
    async fn label(&self, label: String);
    async fn graph(&self, graph: PetGraph);
    async fn ready(&self, ready: bool);
    async fn failed(&self, message: String);
}

/// Cooperative cancellation token for an in-flight traversal.
///
/// Cloned into the caller's hands; the traversal checks it between
/// fetch batches.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of the traversal holding this token.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
