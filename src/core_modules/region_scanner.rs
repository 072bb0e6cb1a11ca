// THEORY:
// The `RegionScanner` is the single traversal primitive of the engine. Both
// higher-level features are "find the connected regions of the grid" questions that
// differ only in which cells a region may contain, so the scanner takes that rule
// as a caller-supplied predicate and knows nothing about colours itself.
//
// Key architectural principles & algorithm steps:
// 1.  **Policy-Free Flood Fill**: `scan` performs a breadth-first search over
//     4-neighbours from one start cell, expanding only into in-bounds, unvisited
//     cells that satisfy `is_traversable`. A FIFO queue keeps the frontier bounded
//     on deep grids.
// 2.  **Full-Grid Driver**: `find_all_components` walks every cell in row-major
//     order and launches one scan per unvisited, start-eligible cell. Because the
//     visited-set is shared across scans, every eligible cell lands in exactly one
//     component and every component is maximal.
// 3.  **Transient Results**: A `Component` lives for one scan. Callers derive what
//     they need from it (green counts, bounding boxes) and drop it.

pub mod region_scanner {
    use crate::core_modules::cell::cell::Cell;
    use crate::core_modules::grid::{Grid, Point};
    use std::collections::{HashSet, VecDeque};

    /// The coordinates reached by one scan, in discovery order.
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct Component {
        pub points: Vec<Point>,
    }

    /// The smallest rectangle holding a set of points, as inclusive corners.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct BoundingBox {
        pub min: Point,
        pub max: Point,
    }

    impl BoundingBox {
        /// Integer midpoint of the box. This is not a centroid: for a concave shape it
        /// can fall on a cell outside the shape.
        pub fn center(&self) -> Point {
            Point::new(
                (self.min.x + self.max.x) / 2,
                (self.min.y + self.max.y) / 2,
            )
        }
    }

    impl Component {
        pub fn len(&self) -> usize {
            self.points.len()
        }

        pub fn is_empty(&self) -> bool {
            self.points.is_empty()
        }

        /// Members whose cell satisfies `predicate`, in discovery order.
        pub fn members_where<'a, F>(
            &'a self,
            grid: &'a Grid,
            predicate: F,
        ) -> impl Iterator<Item = Point> + 'a
        where
            F: Fn(&Cell) -> bool + 'a,
        {
            self.points
                .iter()
                .copied()
                .filter(move |&point| grid.matches(point, &predicate))
        }

        pub fn count_where<F>(&self, grid: &Grid, predicate: F) -> usize
        where
            F: Fn(&Cell) -> bool,
        {
            self.points
                .iter()
                .filter(|&&point| grid.matches(point, &predicate))
                .count()
        }

        pub fn bounding_box(&self) -> Option<BoundingBox> {
            let first = *self.points.first()?;
            let mut bounds = BoundingBox {
                min: first,
                max: first,
            };
            for point in &self.points {
                bounds.min.x = bounds.min.x.min(point.x);
                bounds.min.y = bounds.min.y.min(point.y);
                bounds.max.x = bounds.max.x.max(point.x);
                bounds.max.y = bounds.max.y.max(point.y);
            }
            Some(bounds)
        }
    }

    /// Scans the region around `start` with a fresh visited-set.
    ///
    /// Returns an empty component when `start` is out of bounds or not traversable.
    pub fn scan<F>(grid: &Grid, start: Point, is_traversable: F) -> Component
    where
        F: Fn(&Cell) -> bool,
    {
        let mut visited = HashSet::new();
        scan_with(grid, start, &mut visited, &is_traversable)
    }

    /// Breadth-first scan that records every reached coordinate in `visited`.
    ///
    /// Cells already in `visited` are never entered, so repeated calls with the same
    /// set partition the grid.
    pub fn scan_with<F>(
        grid: &Grid,
        start: Point,
        visited: &mut HashSet<Point>,
        is_traversable: &F,
    ) -> Component
    where
        F: Fn(&Cell) -> bool,
    {
        let mut component = Component::default();
        if visited.contains(&start) || !grid.matches(start, is_traversable) {
            return component;
        }

        let mut queue = VecDeque::from([start]);
        visited.insert(start);

        while let Some(current) = queue.pop_front() {
            component.points.push(current);

            for next in grid.neighbors(current) {
                if visited.contains(&next) {
                    continue;
                }
                if grid.matches(next, is_traversable) {
                    visited.insert(next);
                    queue.push_back(next);
                }
            }
        }

        component
    }

    /// Every maximal component of the grid.
    ///
    /// Cells are visited in row-major order; each unvisited cell satisfying
    /// `is_start_eligible` seeds one scan under `is_traversable`.
    pub fn find_all_components<S, T>(
        grid: &Grid,
        is_start_eligible: S,
        is_traversable: T,
    ) -> Vec<Component>
    where
        S: Fn(&Cell) -> bool,
        T: Fn(&Cell) -> bool,
    {
        let mut visited = HashSet::new();
        let mut components = Vec::new();

        for start in grid.points() {
            if visited.contains(&start) || !grid.matches(start, &is_start_eligible) {
                continue;
            }
            let component = scan_with(grid, start, &mut visited, &is_traversable);
            if !component.is_empty() {
                components.push(component);
            }
        }

        components
    }
}
