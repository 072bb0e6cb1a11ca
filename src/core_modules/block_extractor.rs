// THEORY:
// The `BlockExtractor` partitions every green cell of the grid into maximal
// 4-connected green blocks. A block is the unit the connectivity graph is built on:
// one node per block.
//
// Key principles:
// 1.  **Green-Only Scan**: The full-grid driver runs with "green" as both the start
//     and traversal rule, so red cells always separate blocks.
// 2.  **Bounding-Box Centre**: Each block carries the integer midpoint of its
//     bounding box. It is a sort and display key, not a centroid, and for concave
//     blocks it may sit outside the block.
// 3.  **Unordered Output**: Blocks come out in discovery order. IDs here are
//     provisional; the `block_orderer` assigns the canonical IDs and names.

use crate::core_modules::cell::cell::Cell;
use crate::core_modules::grid::{Grid, Point};
use crate::core_modules::region_scanner::region_scanner::{BoundingBox, find_all_components};

pub type BlockId = usize;

/// A maximal set of 4-connected green cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreenBlock {
    /// Ordinal ID. Provisional (discovery index) until canonical ordering runs.
    pub id: BlockId,
    /// Display name derived from the canonical ID. Empty until ordering runs.
    pub name: String,
    /// Member cells in discovery order.
    pub points: Vec<Point>,
    pub bounding_box: BoundingBox,
    pub center: Point,
}

impl GreenBlock {
    pub fn size(&self) -> usize {
        self.points.len()
    }
}

/// Every maximal green block, in discovery order.
pub fn extract_blocks(grid: &Grid) -> Vec<GreenBlock> {
    find_all_components(grid, Cell::is_green, Cell::is_green)
        .into_iter()
        .enumerate()
        .filter_map(|(discovery_index, component)| {
            let bounding_box = component.bounding_box()?;
            Some(GreenBlock {
                id: discovery_index,
                name: String::new(),
                center: bounding_box.center(),
                bounding_box,
                points: component.points,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn blocks_partition_all_green_cells() {
        let grid = Grid::from_ascii("GGRG\nR.RG\nGRGG\nG...").unwrap();
        let blocks = extract_blocks(&grid);
        assert_eq!(blocks.len(), 3);

        let mut seen = HashSet::new();
        for block in &blocks {
            for point in &block.points {
                assert!(grid.matches(*point, Cell::is_green));
                assert!(seen.insert(*point));
            }
        }
        assert_eq!(seen.len(), grid.count_where(Cell::is_green));
    }

    #[test]
    fn red_cells_separate_blocks() {
        let blocks = extract_blocks(&Grid::from_ascii("GRG").unwrap());
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].points, vec![Point::new(0, 0)]);
        assert_eq!(blocks[1].points, vec![Point::new(2, 0)]);
    }

    #[test]
    fn ids_are_discovery_order_and_names_unset() {
        let blocks = extract_blocks(&Grid::from_ascii("..G\nG..").unwrap());
        assert_eq!(blocks.iter().map(|b| b.id).collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(blocks[0].center, Point::new(2, 0));
        assert!(blocks.iter().all(|b| b.name.is_empty()));
    }

    #[test]
    fn center_is_bounding_box_midpoint() {
        // A U-shape whose bounding-box centre is the empty cell in the middle.
        let grid = Grid::from_ascii("G.G\nG.G\nGGG").unwrap();
        let blocks = extract_blocks(&grid);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].size(), 7);
        assert_eq!(blocks[0].center, Point::new(1, 1));
        assert!(!blocks[0].points.contains(&Point::new(1, 1)));
    }

    #[test]
    fn center_rounds_down() {
        let blocks = extract_blocks(&Grid::from_ascii("GG\nGG").unwrap());
        assert_eq!(blocks[0].center, Point::new(0, 0));
    }

    #[test]
    fn grid_without_greens_has_no_blocks() {
        assert!(extract_blocks(&Grid::from_ascii("RR\n..").unwrap()).is_empty());
    }
}
