//! Property-based tests for the traversal and graph layers.
//!
//! Random grids of green, red and other cells are checked against the structural
//! invariants the engine promises, using brute-force references where one is cheap.

use glyph_graph::core_modules::block_extractor::extract_blocks;
use glyph_graph::core_modules::block_orderer::assign_canonical_order;
use glyph_graph::core_modules::green_cluster::find_connected_greens;
use glyph_graph::core_modules::reachability::build_graph;
use glyph_graph::core_modules::region_scanner::region_scanner::{find_all_components, scan};
use glyph_graph::{AnalysisConfig, Cell, GlyphPipeline, Grid, Point};
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap, HashSet};

fn cell_strategy() -> impl Strategy<Value = Cell> {
    prop_oneof![
        Just(Cell::GREEN),
        Just(Cell::RED),
        Just(Cell::BLUE),
        (any::<u8>(), any::<u8>(), any::<u8>()).prop_map(|(r, g, b)| Cell::new(r, g, b)),
    ]
}

fn grid_strategy() -> impl Strategy<Value = Grid> {
    (1u32..12, 1u32..12).prop_flat_map(|(width, height)| {
        prop::collection::vec(cell_strategy(), (width * height) as usize)
            .prop_map(move |cells| Grid::from_cells(width, height, cells).unwrap())
    })
}

fn all_greens(grid: &Grid) -> HashSet<Point> {
    grid.points()
        .filter(|&p| grid.matches(p, Cell::is_green))
        .collect()
}

proptest! {
    /// Every reported coordinate is green, and a green cell is reported exactly when
    /// its green-or-red component holds at least two greens.
    #[test]
    fn prop_connected_greens_sound_and_complete(grid in grid_strategy()) {
        let reported: Vec<Point> = find_connected_greens(&grid);
        let reported_set: HashSet<Point> = reported.iter().copied().collect();
        prop_assert_eq!(reported.len(), reported_set.len(), "duplicates in result");

        for point in all_greens(&grid) {
            let component = scan(&grid, point, Cell::is_green_or_red);
            let greens = component.count_where(&grid, Cell::is_green);
            prop_assert_eq!(
                reported_set.contains(&point),
                greens >= 2,
                "{} has {} greens in its component", point, greens
            );
        }
        for point in &reported {
            prop_assert!(grid.matches(*point, Cell::is_green));
        }
    }

    /// Blocks partition the green cells: disjoint, and their union is every green.
    #[test]
    fn prop_blocks_partition_greens(grid in grid_strategy()) {
        let blocks = extract_blocks(&grid);
        let mut union = HashSet::new();
        for block in &blocks {
            for point in &block.points {
                prop_assert!(union.insert(*point), "{} is in two blocks", point);
            }
        }
        prop_assert_eq!(union, all_greens(&grid));
    }

    /// Canonical order is sorted by (row, column) of the centre and is idempotent.
    #[test]
    fn prop_canonical_order_sorted_and_idempotent(grid in grid_strategy()) {
        let ordered = assign_canonical_order(extract_blocks(&grid));
        for pair in ordered.windows(2) {
            prop_assert!(
                (pair[0].center.y, pair[0].center.x) <= (pair[1].center.y, pair[1].center.x)
            );
        }
        for (position, block) in ordered.iter().enumerate() {
            prop_assert_eq!(block.id, position);
        }
        let again = assign_canonical_order(ordered.clone());
        prop_assert_eq!(again, ordered);
    }

    /// Edges are stored once, on the lower-ID endpoint, with sorted, unique names.
    #[test]
    fn prop_edges_stored_on_lower_endpoint(grid in grid_strategy()) {
        let blocks = assign_canonical_order(extract_blocks(&grid));
        let graph = build_graph(&grid, &blocks);
        prop_assert_eq!(graph.len(), blocks.len());

        let position = |name: &str| graph.nodes.iter().position(|n| n.name == name);
        let mut seen = HashSet::new();
        for (from, to) in graph.edges() {
            let from_id = position(from).unwrap();
            let to_id = position(to).unwrap();
            prop_assert!(from_id < to_id);
            prop_assert!(seen.insert((from_id, to_id)));
        }
        for node in &graph.nodes {
            let mut sorted = node.connections.clone();
            sorted.sort();
            prop_assert_eq!(&sorted, &node.connections);
        }
    }

    /// The edge set is exactly the pairs of blocks that touch a common red component.
    #[test]
    fn prop_edges_match_red_components(grid in grid_strategy()) {
        let blocks = assign_canonical_order(extract_blocks(&grid));
        let graph = build_graph(&grid, &blocks);

        let mut owners = HashMap::new();
        for block in &blocks {
            for point in &block.points {
                owners.insert(*point, block.id);
            }
        }

        let mut expected = BTreeSet::new();
        for component in find_all_components(&grid, Cell::is_red, Cell::is_red) {
            let touching: BTreeSet<usize> = component
                .points
                .iter()
                .flat_map(|&red| grid.neighbors(red))
                .filter_map(|point| owners.get(&point).copied())
                .collect();
            for &lower in &touching {
                for &higher in touching.range(lower + 1..) {
                    expected.insert((lower, higher));
                }
            }
        }

        let id_of = |name: &str| blocks.iter().find(|b| b.name == name).map(|b| b.id);
        let actual: BTreeSet<(usize, usize)> = graph
            .edges()
            .filter_map(|(from, to)| Some((id_of(from)?, id_of(to)?)))
            .collect();
        prop_assert_eq!(
            actual.len(),
            graph.edge_count(),
            "edges must be unique and name real blocks"
        );
        prop_assert_eq!(actual, expected);
    }
}

#[test]
fn pipeline_runs_the_documented_scenarios() {
    let pipeline = GlyphPipeline::new(AnalysisConfig::default());
    let greens = |text: &str| {
        pipeline
            .analyze(&Grid::from_ascii(text).unwrap())
            .connected_greens
            .len()
    };

    assert_eq!(greens("GRG"), 2);
    assert_eq!(greens("GB"), 0);
    assert_eq!(greens("GR"), 0);
    assert_eq!(greens("GRG\nRGR"), 3);

    let report = pipeline.analyze(&Grid::from_ascii("GR..\n...R\n...G").unwrap());
    assert_eq!(report.graph.len(), 2);
    assert!(report.graph.nodes.iter().all(|node| node.connections.is_empty()));
}
