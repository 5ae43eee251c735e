//! Orchestration of one graph load: root fetch, traversal, assembly,
//! delivery to the sink.

use std::time::Duration;

use crate::api::{PetFetcher, PetId, PetRecord};
use crate::graph::{
    derive_edges, discover_all, CancellationToken, GraphSink, PetGraph, TraversalOptions,
};
use crate::{PetlineageError, Result};

/// Builds genealogy graphs on demand and hands them to a [`GraphSink`].
///
/// All per-run state (node and edge registries) lives inside a single
/// `load_graph` call; concurrent loads of different roots do not share
/// anything but the fetcher.
pub struct GraphBuilder<F> {
    fetcher: F,
    options: TraversalOptions,
    overall_timeout: Option<Duration>,
}

impl<F: PetFetcher> GraphBuilder<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            options: TraversalOptions::default(),
            overall_timeout: None,
        }
    }

    /// Sibling fetches in flight per frontier batch.
    pub fn with_fetch_concurrency(mut self, fetch_concurrency: usize) -> Self {
        self.options.fetch_concurrency = fetch_concurrency.max(1);
        self
    }

    /// Deadline for a whole `load_graph` run; `None` disables it.
    pub fn with_overall_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.overall_timeout = timeout;
        self
    }

    /// Build the genealogy graph rooted at `root_id`.
    ///
    /// Reports only through the sink: the display label as soon as the
    /// root record is in hand, then the finished graph, then
    /// `ready(true)` strictly after the graph. Fatal errors (consistency
    /// violation, cancellation, timeout) arrive as `failed` instead.
    pub async fn load_graph(&self, root_id: PetId, sink: &dyn GraphSink, cancel: &CancellationToken) {
        let run = self.run(root_id, sink, cancel);

        let outcome = match self.overall_timeout {
            Some(limit) => match tokio::time::timeout(limit, run).await {
                Ok(outcome) => outcome,
                Err(_) => Err(PetlineageError::Timeout),
            },
            None => run.await,
        };

        match outcome {
            Ok(graph) => {
                log::info!(
                    "Graph for pet {} complete: {} nodes, {} edges",
                    root_id,
                    graph.node_count(),
                    graph.edge_count()
                );
                sink.graph(graph).await;
                sink.ready(true).await;
            }
            Err(e) => {
                log::error!("Graph load for pet {root_id} failed: {e}");
                sink.failed(e.to_string()).await;
            }
        }
    }

    async fn run(
        &self,
        root_id: PetId,
        sink: &dyn GraphSink,
        cancel: &CancellationToken,
    ) -> Result<PetGraph> {
        // The fetch-failure policy applies to the root too: a bad root
        // yields a one-node placeholder graph, not an aborted run.
        let root = match self.fetcher.fetch(root_id).await {
            Ok(record) => record,
            Err(e) => {
                log::warn!("Root fetch failed for pet {root_id}: {e}");
                PetRecord::placeholder(root_id, e.to_string())
            }
        };

        sink.label(root.name.clone()).await;

        let mut registry = discover_all(&self.fetcher, root, &self.options, cancel).await?;
        let edges = derive_edges(&mut registry)?;

        Ok(PetGraph::from_parts(registry, edges))
    }
}
