// THEORY:
// This file is the main entry point for the `glyph_graph` library crate. The engine
// looks at a picture made of flat-coloured squares, reduces it to a grid of green,
// red and "other" cells, and answers two questions about it:
//
// 1.  Which green cells are linked to another green cell through green or red cells?
// 2.  Which maximal green blocks can reach each other over red cells alone?
//
// The high-level interface is `pipeline::GlyphPipeline` and its `AnalysisReport`.
// The layers it runs live in `core_modules`, leaves first: `cell`, `grid`,
// `region_scanner`, then `green_cluster`, `block_extractor`, `block_orderer` and
// `reachability`. `grid_sampler` builds grids from images and `export` writes the
// results as JSON.

pub mod core_modules;
pub mod error;
pub mod export;
pub mod parallel_pipeline;
pub mod pipeline;

pub use core_modules::block_extractor::{BlockId, GreenBlock};
pub use core_modules::cell::cell::{Cell, CellClass};
pub use core_modules::grid::{Grid, Point};
pub use core_modules::reachability::{ConnectivityGraph, GraphNode};
pub use error::{GlyphError, GlyphResult};
pub use pipeline::{AnalysisConfig, AnalysisReport, GlyphPipeline};
