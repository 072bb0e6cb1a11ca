// THEORY:
// The `ReachabilityGraphBuilder` answers the second structural question: which pairs
// of green blocks are joined by a path made only of red cells?
//
// Algorithm, run once per block in canonical order:
// 1.  **Frontier**: Collect every red cell 4-adjacent to a member of the block,
//     each one once.
// 2.  **Red Flood**: Breadth-first search over red cells only, starting from the
//     whole frontier at once.
// 3.  **Absorbing Boundaries**: When the search looks at a green neighbour, it
//     resolves the owning block through the `BlockIndex` and records it as reachable
//     if it is not the current block. Green cells are never entered, so a path can
//     not run through a third block.
// 4.  **Canonical Edges**: The relation is symmetric, so it is stored once: under the
//     lower ID, listing only higher-ID neighbours, names sorted lexicographically.
//     Reachable targets are gathered in a set, so two disjoint red paths between the
//     same pair still make one edge.
//
// The per-block search only reads the grid and the index. `connections_for` is
// therefore safe to run for many blocks at once (see `parallel_pipeline`).

use crate::core_modules::block_extractor::{BlockId, GreenBlock};
use crate::core_modules::cell::cell::Cell;
use crate::core_modules::grid::{Grid, Point};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use tracing::{debug, info};

/// One node of the exported graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub name: String,
    /// Names of higher-ID blocks reachable over red cells, sorted.
    pub connections: Vec<String>,
    pub center: Point,
}

/// The block connectivity graph, one node per block in canonical order.
///
/// Edges are undirected but stored only on the lower-ID endpoint. Use
/// `are_connected` or `edges` rather than reading `connections` as directed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectivityGraph {
    pub nodes: Vec<GraphNode>,
}

impl ConnectivityGraph {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, name: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.name == name)
    }

    /// Symmetric edge lookup.
    pub fn are_connected(&self, a: &str, b: &str) -> bool {
        let lists = |from: &str, to: &str| {
            self.node(from)
                .is_some_and(|node| node.connections.iter().any(|c| c == to))
        };
        lists(a, b) || lists(b, a)
    }

    /// Every stored edge as `(lower, higher)` name pairs, in node order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.nodes.iter().flat_map(|node| {
            node.connections
                .iter()
                .map(move |target| (node.name.as_str(), target.as_str()))
        })
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|node| node.connections.len()).sum()
    }
}

/// Maps every green coordinate to the block that owns it.
#[derive(Debug, Clone, Default)]
pub struct BlockIndex {
    owners: HashMap<Point, BlockId>,
    names: HashMap<BlockId, String>,
}

impl BlockIndex {
    pub fn new(blocks: &[GreenBlock]) -> Self {
        let mut owners = HashMap::with_capacity(blocks.iter().map(GreenBlock::size).sum());
        let mut names = HashMap::with_capacity(blocks.len());
        for block in blocks {
            for &point in &block.points {
                owners.insert(point, block.id);
            }
            names.insert(block.id, block.name.clone());
        }
        Self { owners, names }
    }

    pub fn owner(&self, point: Point) -> Option<BlockId> {
        self.owners.get(&point).copied()
    }

    pub fn name(&self, id: BlockId) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }
}

/// Red cells 4-adjacent to the block, deduplicated, in first-seen order.
pub fn red_frontier(grid: &Grid, block: &GreenBlock) -> Vec<Point> {
    let mut seen = HashSet::new();
    let mut frontier = Vec::new();
    for &point in &block.points {
        for next in grid.neighbors(point) {
            if grid.matches(next, Cell::is_red) && seen.insert(next) {
                frontier.push(next);
            }
        }
    }
    frontier
}

/// IDs of every other block reachable from `block` over red cells only.
pub fn reachable_blocks(grid: &Grid, index: &BlockIndex, block: &GreenBlock) -> BTreeSet<BlockId> {
    let mut reachable = BTreeSet::new();

    let frontier = red_frontier(grid, block);
    let mut visited_red: HashSet<Point> = frontier.iter().copied().collect();
    let mut queue: VecDeque<Point> = frontier.into();

    while let Some(current) = queue.pop_front() {
        for next in grid.neighbors(current) {
            let Some(cell) = grid.cell(next) else {
                continue;
            };

            if cell.is_green() {
                if let Some(target) = index.owner(next) {
                    if target != block.id {
                        reachable.insert(target);
                    }
                }
                // Green is a boundary, never a pass-through.
                continue;
            }

            if cell.is_red() && visited_red.insert(next) {
                queue.push_back(next);
            }
        }
    }

    reachable
}

/// The graph node for `block`: its higher-ID reachable neighbours, by name.
pub fn connections_for(grid: &Grid, index: &BlockIndex, block: &GreenBlock) -> GraphNode {
    let reachable = reachable_blocks(grid, index, block);

    let mut connections: Vec<String> = reachable
        .into_iter()
        .filter(|&target| target > block.id)
        .filter_map(|target| index.name(target).map(str::to_owned))
        .collect();
    connections.sort();

    debug!(block = %block.name, connections = ?connections, "block reachability resolved");
    GraphNode {
        name: block.name.clone(),
        connections,
        center: block.center,
    }
}

/// Builds the connectivity graph over canonically ordered blocks.
pub fn build_graph(grid: &Grid, ordered_blocks: &[GreenBlock]) -> ConnectivityGraph {
    let index = BlockIndex::new(ordered_blocks);
    let nodes: Vec<GraphNode> = ordered_blocks
        .iter()
        .map(|block| connections_for(grid, &index, block))
        .collect();

    let graph = ConnectivityGraph { nodes };
    info!(blocks = graph.len(), edges = graph.edge_count(), "connectivity graph built");
    graph
}
