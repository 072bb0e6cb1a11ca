// THEORY:
// The `Grid` is the immutable model every traversal reads from. It owns a flat,
// row-major `Vec<Cell>` together with its explicit `width` and `height`, and it
// guarantees the rectangularity invariant at construction time: a grid whose
// declared size disagrees with its data is rejected, never silently indexed.
//
// Key architectural principles:
// 1.  **Fail Fast, Then Stay Total**: All validation happens in the constructors.
//     Once a `Grid` exists, lookups return `Option` and neighbour iteration is
//     bounds-checked, so the algorithms built on top never need an error path.
// 2.  **Value Coordinates**: `Point` is a small `Copy + Hash + Eq` value, used as the
//     key of every visited-set and membership map in the engine.
// 3.  **4-Connectivity Only**: `neighbors` yields up, down, right and left. Diagonals
//     are never adjacent.

use crate::core_modules::cell::cell::{Cell, CellClass};
use crate::error::{GlyphError, GlyphResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A column/row coordinate on the grid.
///
/// Serialized with upper-case `X`/`Y` keys, the shape consumers of the JSON output
/// already read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    pub const fn new(x: u32, y: u32) -> Self {
        Point { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Offsets for the four direct neighbours: down, up, right, left.
const DIRECTIONS: [(i64, i64); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// A row or column count that fits the `u32` coordinate space.
fn checked_dimension(len: usize) -> GlyphResult<u32> {
    u32::try_from(len).map_err(|_| GlyphError::SizeMismatch {
        expected: u32::MAX as usize,
        actual: len,
    })
}

/// A rectangular, row-major grid of classified cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Builds a grid from a flat row-major buffer.
    pub fn from_cells(width: u32, height: u32, cells: Vec<Cell>) -> GlyphResult<Self> {
        let expected = width as usize * height as usize;
        if cells.len() != expected {
            return Err(GlyphError::SizeMismatch {
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Builds a grid from rows, taking the width from the first row.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> GlyphResult<Self> {
        let height = checked_dimension(rows.len())?;
        let width = checked_dimension(rows.first().map_or(0, Vec::len))?;
        Self::with_dimensions(width, height, rows)
    }

    /// Builds a grid from rows and checks them against a declared size.
    pub fn with_dimensions(width: u32, height: u32, rows: Vec<Vec<Cell>>) -> GlyphResult<Self> {
        if rows.len() != height as usize {
            return Err(GlyphError::RowCountMismatch {
                expected: height as usize,
                actual: rows.len(),
            });
        }

        let mut cells = Vec::with_capacity(width as usize * height as usize);
        for (row_index, row) in rows.into_iter().enumerate() {
            if row.len() != width as usize {
                return Err(GlyphError::RaggedRow {
                    row: row_index,
                    expected: width as usize,
                    actual: row.len(),
                });
            }
            cells.extend(row);
        }

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Parses the ASCII form: one row per non-empty line, `G` green, `R` red,
    /// anything else "other". Surrounding whitespace on each line is ignored.
    pub fn from_ascii(text: &str) -> GlyphResult<Self> {
        let rows = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| {
                line.chars()
                    .map(|symbol| CellClass::from_symbol(symbol).cell())
                    .collect::<Vec<_>>()
            })
            .collect();
        Self::from_rows(rows)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x < self.width && point.y < self.height
    }

    pub fn cell(&self, point: Point) -> Option<&Cell> {
        if !self.contains(point) {
            return None;
        }
        let index = point.y as usize * self.width as usize + point.x as usize;
        self.cells.get(index)
    }

    /// True when `point` is in bounds and its cell satisfies `predicate`.
    pub fn matches<F>(&self, point: Point, predicate: F) -> bool
    where
        F: Fn(&Cell) -> bool,
    {
        self.cell(point).is_some_and(predicate)
    }

    /// The in-bounds 4-neighbours of `point`.
    pub fn neighbors(&self, point: Point) -> impl Iterator<Item = Point> + '_ {
        DIRECTIONS.iter().filter_map(move |&(dx, dy)| {
            let nx = point.x as i64 + dx;
            let ny = point.y as i64 + dy;
            if nx < 0 || ny < 0 || nx >= self.width as i64 || ny >= self.height as i64 {
                return None;
            }
            Some(Point::new(nx as u32, ny as u32))
        })
    }

    /// Every coordinate in row-major order.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Point::new(x, y)))
    }

    pub fn count_where<F>(&self, predicate: F) -> usize
    where
        F: Fn(&Cell) -> bool,
    {
        self.cells.iter().filter(|&cell| predicate(cell)).count()
    }
}

/// Renders the ASCII form accepted by `Grid::from_ascii`.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.width == 0 {
            return Ok(());
        }
        for row in self.cells.chunks(self.width as usize) {
            let line: String = row.iter().map(|cell| cell.class().symbol()).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
