// THEORY:
// The `Cell` module is the most fundamental unit of the engine. A cell is a "dumb"
// colour triple sampled from one square of the source picture, plus the two
// single-cell predicates every higher layer is built on.
//
// Key principles:
// 1.  **Two strict predicates**: A cell is green when its green channel is strictly
//     greater than its red channel, and red when red is strictly greater than green.
//     Because both comparisons are strict and use the same two channels, no cell can
//     ever be both. Everything else (ties, blues, greys) is "other".
// 2.  **Blue is carried, never consulted**: The blue channel is kept so that a cell is
//     a faithful copy of its source pixel, but classification ignores it.
// 3.  **Single-cell scope**: Nothing in here looks at neighbours. Connectivity lives in
//     the `region_scanner` and the layers above it.

pub mod cell {
    use crate::error::{GlyphError, GlyphResult};
    use serde::{Deserialize, Serialize};

    pub type Byte = u8;
    pub type Channel = Byte;

    const RGB_CHANNELS: usize = 3;
    const RGBA_CHANNELS: usize = 4;

    /// A single colour-classified square of the grid.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Cell {
        /// The red channel magnitude (0-255).
        pub red: Channel,
        /// The green channel magnitude (0-255).
        pub green: Channel,
        /// The blue channel magnitude (0-255). Not used by classification.
        pub blue: Channel,
    }

    /// The derived classification of a cell.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum CellClass {
        Green,
        Red,
        Other,
    }

    impl Cell {
        pub const GREEN: Cell = Cell::new(0, 255, 0);
        pub const RED: Cell = Cell::new(255, 0, 0);
        pub const BLUE: Cell = Cell::new(0, 0, 255);

        pub const fn new(red: Channel, green: Channel, blue: Channel) -> Self {
            Cell { red, green, blue }
        }

        #[inline]
        pub fn is_green(&self) -> bool {
            self.green > self.red
        }

        #[inline]
        pub fn is_red(&self) -> bool {
            self.red > self.green
        }

        /// Green or red: the cells a cluster may pass through.
        #[inline]
        pub fn is_green_or_red(&self) -> bool {
            self.is_green() || self.is_red()
        }

        pub fn class(&self) -> CellClass {
            if self.is_green() {
                CellClass::Green
            } else if self.is_red() {
                CellClass::Red
            } else {
                CellClass::Other
            }
        }
    }

    impl CellClass {
        /// The character used by the ASCII grid form.
        pub fn symbol(self) -> char {
            match self {
                CellClass::Green => 'G',
                CellClass::Red => 'R',
                CellClass::Other => '.',
            }
        }

        /// Inverse of `symbol`. Any character other than `G` or `R` reads as `Other`.
        pub fn from_symbol(symbol: char) -> Self {
            match symbol {
                'G' => CellClass::Green,
                'R' => CellClass::Red,
                _ => CellClass::Other,
            }
        }

        /// A representative cell for this class.
        pub fn cell(self) -> Cell {
            match self {
                CellClass::Green => Cell::GREEN,
                CellClass::Red => Cell::RED,
                CellClass::Other => Cell::BLUE,
            }
        }
    }

    /// Accepts RGB or RGBA byte slices. Alpha is dropped.
    impl TryFrom<&[Byte]> for Cell {
        type Error = GlyphError;

        fn try_from(bytes: &[Byte]) -> GlyphResult<Self> {
            match bytes.len() {
                RGB_CHANNELS | RGBA_CHANNELS => Ok(Cell::new(bytes[0], bytes[1], bytes[2])),
                other => Err(GlyphError::InvalidCellBytes(other)),
            }
        }
    }

    impl From<image::Rgb<Byte>> for Cell {
        fn from(pixel: image::Rgb<Byte>) -> Self {
            let [red, green, blue] = pixel.0;
            Cell::new(red, green, blue)
        }
    }
}
