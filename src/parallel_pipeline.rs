// THEORY:
// Once blocks are ordered and the `BlockIndex` is built, each block's red search is
// independent of every other: it only reads the grid and the index. The
// `ParallelGraphBuilder` exploits that by fanning the ordered block list out to a
// pool of blocking workers and stitching the per-block nodes back together in
// canonical order. The result is identical to the sequential `build_graph`.
//
// Shared inputs are frozen behind `Arc`s for the duration of the build. Each worker
// owns a contiguous slice of block positions and returns its nodes as one `Vec`, so
// no node list is ever mutated by more than one task.

use crate::core_modules::block_extractor::GreenBlock;
use crate::core_modules::grid::Grid;
use crate::core_modules::reachability::{BlockIndex, ConnectivityGraph, GraphNode, connections_for};
use crate::error::{GlyphError, GlyphResult};
use futures::future::join_all;
use std::ops::Range;
use std::sync::Arc;
use tracing::{debug, info};

/// Builds the connectivity graph on tokio's blocking pool.
#[derive(Debug, Clone, Copy)]
pub struct ParallelGraphBuilder {
    workers: usize,
}

impl ParallelGraphBuilder {
    /// A builder with at most `workers` concurrent tasks (at least one).
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    /// One worker per logical CPU.
    pub fn with_available_parallelism() -> Self {
        Self::new(num_cpus::get())
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Builds the graph for canonically ordered blocks.
    pub async fn build_graph(
        &self,
        grid: Arc<Grid>,
        ordered_blocks: Arc<Vec<GreenBlock>>,
    ) -> GlyphResult<ConnectivityGraph> {
        let index = Arc::new(BlockIndex::new(&ordered_blocks));
        let partitions = partition(ordered_blocks.len(), self.workers);
        debug!(
            blocks = ordered_blocks.len(),
            partitions = partitions.len(),
            "dispatching reachability searches"
        );

        let tasks = partitions.into_iter().map(|range| {
            let grid = Arc::clone(&grid);
            let blocks = Arc::clone(&ordered_blocks);
            let index = Arc::clone(&index);
            tokio::task::spawn_blocking(move || -> Vec<GraphNode> {
                blocks[range]
                    .iter()
                    .map(|block| connections_for(&grid, &index, block))
                    .collect()
            })
        });

        let mut nodes = Vec::with_capacity(ordered_blocks.len());
        for result in join_all(tasks).await {
            let partition_nodes = result.map_err(|e| GlyphError::Worker(e.to_string()))?;
            nodes.extend(partition_nodes);
        }

        let graph = ConnectivityGraph { nodes };
        info!(
            blocks = graph.len(),
            edges = graph.edge_count(),
            workers = self.workers,
            "connectivity graph built in parallel"
        );
        Ok(graph)
    }
}

impl Default for ParallelGraphBuilder {
    fn default() -> Self {
        Self::with_available_parallelism()
    }
}

/// Splits `0..len` into at most `parts` contiguous, near-equal, non-empty ranges.
fn partition(len: usize, parts: usize) -> Vec<Range<usize>> {
    if len == 0 {
        return Vec::new();
    }
    let parts = parts.clamp(1, len);
    let base = len / parts;
    let remainder = len % parts;

    let mut ranges = Vec::with_capacity(parts);
    let mut start = 0;
    for i in 0..parts {
        let size = base + usize::from(i < remainder);
        ranges.push(start..start + size);
        start += size;
    }
    ranges
}
