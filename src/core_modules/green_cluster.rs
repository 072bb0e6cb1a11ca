// THEORY:
// The `GreenClusterFinder` answers the first structural question: which green cells
// are linked to at least one other green cell through a chain of green and red cells?
//
// Algorithm:
// 1.  Run the full-grid driver with "green or red" as both the start rule and the
//     traversal rule. Red cells act as bridges.
// 2.  Keep a component only if it holds two or more green cells. A lone green touching
//     only red, or an all-red component, contributes nothing.
// 3.  Report the green members of every kept component, grouped by component in
//     discovery order. Red bridges are never reported.

use crate::core_modules::cell::cell::Cell;
use crate::core_modules::grid::{Grid, Point};
use crate::core_modules::region_scanner::region_scanner::find_all_components;
use tracing::debug;

/// A component must contain at least this many green cells to be reported.
pub const MIN_CLUSTER_GREENS: usize = 2;

/// The green members of one qualifying green-or-red component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreenCluster {
    /// Green cells in discovery order.
    pub greens: Vec<Point>,
    /// Number of red cells bridging them.
    pub red_count: usize,
}

/// Every green-or-red component with at least `MIN_CLUSTER_GREENS` greens.
pub fn find_green_clusters(grid: &Grid) -> Vec<GreenCluster> {
    find_all_components(grid, Cell::is_green_or_red, Cell::is_green_or_red)
        .into_iter()
        .filter_map(|component| {
            let greens: Vec<Point> = component.members_where(grid, Cell::is_green).collect();
            if greens.len() < MIN_CLUSTER_GREENS {
                return None;
            }
            Some(GreenCluster {
                red_count: component.len() - greens.len(),
                greens,
            })
        })
        .collect()
}

/// Flat list of every green cell that belongs to a qualifying cluster.
pub fn find_connected_greens(grid: &Grid) -> Vec<Point> {
    let clusters = find_green_clusters(grid);
    debug!(clusters = clusters.len(), "green clusters found");
    clusters.into_iter().flat_map(|cluster| cluster.greens).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(text: &str) -> Grid {
        Grid::from_ascii(text).unwrap()
    }

    #[test]
    fn green_red_green_is_connected() {
        let result = find_connected_greens(&grid("GRG"));
        assert_eq!(result, vec![Point::new(0, 0), Point::new(2, 0)]);
    }

    #[test]
    fn isolated_green_is_excluded() {
        // Blue is neither green nor red.
        assert!(find_connected_greens(&grid("GB")).is_empty());
    }

    #[test]
    fn single_green_touching_red_is_excluded() {
        assert!(find_connected_greens(&grid("GR")).is_empty());
    }

    #[test]
    fn checkerboard_component_reports_all_greens() {
        let result = find_connected_greens(&grid("GRG\nRGR"));
        assert_eq!(result.len(), 3);
        assert!(result.contains(&Point::new(0, 0)));
        assert!(result.contains(&Point::new(2, 0)));
        assert!(result.contains(&Point::new(1, 1)));
    }

    #[test]
    fn adjacent_greens_need_no_red_bridge() {
        assert_eq!(find_connected_greens(&grid("GG")).len(), 2);
    }

    #[test]
    fn all_red_components_contribute_nothing() {
        assert!(find_connected_greens(&grid("RRR\n.G.")).is_empty());
    }

    #[test]
    fn clusters_keep_discovery_grouping() {
        let clusters = find_green_clusters(&grid("GRG.G\n....R\nG..RG"));
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].greens, vec![Point::new(0, 0), Point::new(2, 0)]);
        assert_eq!(clusters[0].red_count, 1);
        assert_eq!(clusters[1].greens.len(), 2);
        assert_eq!(clusters[1].red_count, 2);
        // The lone green at (0, 2) is in neither cluster.
        assert!(clusters.iter().all(|c| !c.greens.contains(&Point::new(0, 2))));
    }

    #[test]
    fn every_reported_cell_is_green() {
        let g = grid("GRRG.\nR..RG\nGG.R.\n..RRG");
        for point in find_connected_greens(&g) {
            assert!(g.matches(point, Cell::is_green));
        }
    }
}
