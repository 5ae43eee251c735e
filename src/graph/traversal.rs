//! Frontier-based discovery of every pet reachable from a root.

use std::collections::{HashSet, VecDeque};

use futures_util::future;

use crate::api::{PetFetcher, PetId, PetRecord};
use crate::graph::{CancellationToken, GraphNode, NodeRegistry};
use crate::{PetlineageError, Result};

/// Traversal tuning knobs.
#[derive(Debug, Clone)]
pub struct TraversalOptions {
    /// Sibling fetches in flight per frontier batch.
    pub fetch_concurrency: usize,
}

impl Default for TraversalOptions {
    fn default() -> Self {
        Self {
            fetch_concurrency: 8,
        }
    }
}

/// Discover every pet transitively reachable from `root` via parent or
/// child links and return the populated node registry.
///
/// Expansion is bidirectional from every newly discovered node: a pet
/// found through its parent still has its own children followed, and
/// vice versa. Registry membership is the sole cycle guard; each id is
/// fetched at most once per run (membership is checked before the fetch
/// is issued, unlike the upstream service client this replaces, which
/// fetched first and checked after).
///
/// A failed fetch registers an error-placeholder node for that id and
/// traversal continues; one bad record never aborts the run.
pub async fn discover_all<F: PetFetcher>(
    fetcher: &F,
    root: PetRecord,
    options: &TraversalOptions,
    cancel: &CancellationToken,
) -> Result<NodeRegistry> {
    let mut registry = NodeRegistry::new();
    let mut frontier: VecDeque<PetId> = VecDeque::new();

    frontier.extend(root.children.iter().copied());
    frontier.extend(root.parents.iter().copied());
    registry.insert(root.id, GraphNode::new(root));

    while let Some(batch) = next_batch(&mut frontier, &registry, options.fetch_concurrency) {
        if cancel.is_cancelled() {
            return Err(PetlineageError::Cancelled);
        }

        let fetches = batch
            .iter()
            .map(|&id| fetch_or_placeholder(fetcher, id));
        let records = future::join_all(fetches).await;

        // All batch fetches are resolved before the registry changes, so
        // check-then-insert stays a single logical step per id.
        for (id, record) in batch.into_iter().zip(records) {
            frontier.extend(record.children.iter().copied());
            frontier.extend(record.parents.iter().copied());
            registry.insert(id, GraphNode::new(record));
        }
    }

    log::debug!("Traversal discovered {} nodes", registry.len());
    Ok(registry)
}

/// Drain up to `limit` not-yet-registered ids from the frontier.
/// Returns `None` once the frontier holds only already-known ids.
fn next_batch(
    frontier: &mut VecDeque<PetId>,
    registry: &NodeRegistry,
    limit: usize,
) -> Option<Vec<PetId>> {
    let mut batch = Vec::new();
    let mut in_batch = HashSet::new();

    while let Some(id) = frontier.pop_front() {
        if registry.contains_key(&id) || !in_batch.insert(id) {
            continue;
        }
        batch.push(id);
        if batch.len() == limit {
            break;
        }
    }

    if batch.is_empty() {
        None
    } else {
        Some(batch)
    }
}

/// Fetch one record, substituting an error placeholder on failure so the
/// graph still gets a node for the id.
async fn fetch_or_placeholder<F: PetFetcher>(fetcher: &F, id: PetId) -> PetRecord {
    match fetcher.fetch(id).await {
        Ok(record) => record,
        Err(e) => {
            log::warn!("Fetch failed for pet {id}, substituting placeholder: {e}");
            PetRecord::placeholder(id, e.to_string())
        }
    }
}
