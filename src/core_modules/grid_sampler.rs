// THEORY:
// The `GridSampler` is the bridge between a raw picture and the cell grid the
// engine works on. The source pictures are made of flat-coloured squares of a fixed
// pixel size, so one representative pixel per square is enough: the sampler reads
// the pixel at the centre of every square and turns it into a `Cell`.
//
// Key architectural principles:
// 1.  **Data Transformation**: It performs the slicing step from pixels into a
//     spatially organized grid, exactly once per picture. Everything downstream sees
//     only the `Grid`.
// 2.  **Centre Sampling**: The sample for square (x, y) is the pixel at
//     `(x * size + size / 2, y * size + size / 2)`, clamped to the last pixel so a
//     partial final square can never index past the image.
// 3.  **Size Discovery**: When the square size is unknown, `estimate_square_size`
//     recovers it from the most common run of near-identical pixels along a few
//     scan lines.

use crate::core_modules::cell::cell::Cell;
use crate::core_modules::grid::Grid;
use crate::error::{GlyphError, GlyphResult};
use image::RgbImage;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

const RGBA_CHANNELS: usize = 4;

/// Two pixels belong to the same run when every channel differs by less than this.
const RUN_TOLERANCE: i16 = 10;
/// Run lengths at or below this are treated as borders or anti-aliasing noise.
const MIN_SIGNIFICANT_RUN: u32 = 5;
/// How many of the most common run lengths are considered.
const RUN_CANDIDATES: usize = 5;

/// Samples pictures into grids of one cell per square.
#[derive(Debug, Clone, Copy)]
pub struct GridSampler {
    /// The side of one square in pixels.
    square_size: u32,
}

impl GridSampler {
    pub fn new(square_size: u32) -> GlyphResult<Self> {
        if square_size == 0 {
            return Err(GlyphError::ZeroSquareSize);
        }
        Ok(Self { square_size })
    }

    pub fn square_size(&self) -> u32 {
        self.square_size
    }

    /// The grid dimensions a `width` x `height` picture produces.
    pub fn grid_dimensions(&self, width: u32, height: u32) -> GlyphResult<(u32, u32)> {
        let grid_width = width / self.square_size;
        let grid_height = height / self.square_size;
        if grid_width == 0 || grid_height == 0 {
            return Err(GlyphError::ImageTooSmall {
                width,
                height,
                square_size: self.square_size,
            });
        }
        Ok((grid_width, grid_height))
    }

    /// Opens a picture from disk and samples it.
    pub fn load(&self, path: &Path) -> GlyphResult<Grid> {
        let image = image::open(path)?.to_rgb8();
        self.sample(&image)
    }

    /// Samples an RGB image.
    pub fn sample(&self, image: &RgbImage) -> GlyphResult<Grid> {
        let (width, height) = image.dimensions();
        let (grid_width, grid_height) = self.grid_dimensions(width, height)?;
        debug!(width, height, grid_width, grid_height, "sampling image into grid");

        let mut cells = Vec::with_capacity((grid_width * grid_height) as usize);
        for y in 0..grid_height {
            for x in 0..grid_width {
                let (px, py) = self.sample_position(x, y, width, height);
                cells.push(Cell::from(*image.get_pixel(px, py)));
            }
        }

        Grid::from_cells(grid_width, grid_height, cells)
    }

    /// Samples a tightly packed RGBA frame buffer of `image_width` x `image_height` pixels.
    pub fn sample_rgba(
        &self,
        frame_buffer: &[u8],
        image_width: u32,
        image_height: u32,
    ) -> GlyphResult<Grid> {
        let expected = image_width as usize * image_height as usize * RGBA_CHANNELS;
        if frame_buffer.len() != expected {
            return Err(GlyphError::SizeMismatch {
                expected,
                actual: frame_buffer.len(),
            });
        }
        let (grid_width, grid_height) = self.grid_dimensions(image_width, image_height)?;

        let mut cells = Vec::with_capacity((grid_width * grid_height) as usize);
        for y in 0..grid_height {
            for x in 0..grid_width {
                let (px, py) = self.sample_position(x, y, image_width, image_height);
                let byte_index = (py as usize * image_width as usize + px as usize) * RGBA_CHANNELS;
                let pixel_bytes = &frame_buffer[byte_index..byte_index + RGBA_CHANNELS];
                cells.push(Cell::try_from(pixel_bytes)?);
            }
        }

        Grid::from_cells(grid_width, grid_height, cells)
    }

    fn sample_position(&self, x: u32, y: u32, width: u32, height: u32) -> (u32, u32) {
        let half = self.square_size / 2;
        let px = (x * self.square_size + half).min(width - 1);
        let py = (y * self.square_size + half).min(height - 1);
        (px, py)
    }
}

/// The estimated square size along each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SquareEstimate {
    pub width: u32,
    pub height: u32,
}

/// Estimates the square size of a picture from its dominant run lengths.
///
/// Scans the rows at 1/4, 1/2 and 3/4 of the height for the horizontal size and the
/// matching columns for the vertical size. Falls back to 1 on an axis with no
/// significant run.
pub fn estimate_square_size(image: &RgbImage) -> SquareEstimate {
    let (width, height) = image.dimensions();

    let mut row_runs = Vec::new();
    for y in [height / 4, height / 2, 3 * height / 4] {
        if y < height {
            collect_runs((0..width).map(|x| *image.get_pixel(x, y)), &mut row_runs);
        }
    }

    let mut col_runs = Vec::new();
    for x in [width / 4, width / 2, 3 * width / 4] {
        if x < width {
            collect_runs((0..height).map(|y| *image.get_pixel(x, y)), &mut col_runs);
        }
    }

    let estimate = SquareEstimate {
        width: dominant_run(&row_runs).unwrap_or(1),
        height: dominant_run(&col_runs).unwrap_or(1),
    };
    if estimate.width == 1 || estimate.height == 1 {
        warn!(?estimate, "no significant run length found on at least one axis");
    }
    estimate
}

fn similar(a: &image::Rgb<u8>, b: &image::Rgb<u8>) -> bool {
    a.0.iter()
        .zip(b.0.iter())
        .all(|(&ca, &cb)| (ca as i16 - cb as i16).abs() < RUN_TOLERANCE)
}

/// Appends the lengths (> 1) of every run of similar pixels in `line`.
fn collect_runs<I>(line: I, runs: &mut Vec<u32>)
where
    I: Iterator<Item = image::Rgb<u8>>,
{
    let mut previous: Option<image::Rgb<u8>> = None;
    let mut current_run = 1u32;
    for pixel in line {
        if let Some(prev) = previous {
            if similar(&pixel, &prev) {
                current_run += 1;
            } else {
                if current_run > 1 {
                    runs.push(current_run);
                }
                current_run = 1;
            }
        }
        previous = Some(pixel);
    }
    if previous.is_some() && current_run > 1 {
        runs.push(current_run);
    }
}

/// Among the most common run lengths (ties broken by first appearance), the first
/// one long enough to be a square.
fn dominant_run(runs: &[u32]) -> Option<u32> {
    let mut counts: HashMap<u32, (usize, usize)> = HashMap::new();
    for (position, &run) in runs.iter().enumerate() {
        counts.entry(run).or_insert((0, position)).0 += 1;
    }

    let mut ranked: Vec<(u32, usize, usize)> = counts
        .into_iter()
        .map(|(run, (count, first_seen))| (run, count, first_seen))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .take(RUN_CANDIDATES)
        .map(|(run, _, _)| run)
        .find(|&run| run > MIN_SIGNIFICANT_RUN)
}
