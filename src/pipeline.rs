// THEORY:
// The `pipeline` module is the top-level API of the engine. It runs the full stack
// (cluster finding, block extraction, canonical ordering and reachability) over one
// grid and hands back a single `AnalysisReport` for an exporter to consume.
//
// The grid is read-only for the whole run. All intermediate state (visited-sets,
// queues, block maps) lives inside one `analyze` call and is dropped with it.

use crate::core_modules::block_extractor::{GreenBlock, extract_blocks};
use crate::core_modules::block_orderer::assign_canonical_order;
use crate::core_modules::grid::{Grid, Point};
use crate::core_modules::grid_sampler::GridSampler;
use crate::core_modules::green_cluster::find_connected_greens;
use crate::core_modules::reachability::{ConnectivityGraph, build_graph};
use crate::error::{GlyphError, GlyphResult};
use crate::parallel_pipeline::ParallelGraphBuilder;
use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

/// Side of one sampled square, in pixels, for the source pictures.
pub const DEFAULT_SQUARE_SIZE: u32 = 16;
/// Below this many blocks the parallel builder is not worth its overhead.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64;

pub const ENV_SQUARE_SIZE: &str = "GLYPH_SQUARE_SIZE";
pub const ENV_WORKERS: &str = "GLYPH_WORKERS";
pub const ENV_PARALLEL_THRESHOLD: &str = "GLYPH_PARALLEL_THRESHOLD";

/// Configuration for the `GlyphPipeline`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Side of one grid square in pixels when sampling images.
    pub square_size: u32,
    /// Upper bound on concurrent reachability workers.
    pub workers: usize,
    /// Minimum block count before `analyze_parallel` fans out.
    pub parallel_threshold: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            square_size: DEFAULT_SQUARE_SIZE,
            workers: num_cpus::get(),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl AnalysisConfig {
    /// Defaults overlaid with `GLYPH_*` environment variables.
    pub fn from_env() -> GlyphResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with whatever `lookup` returns for each `GLYPH_*` key.
    pub fn from_lookup<F>(lookup: F) -> GlyphResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(value) = lookup(ENV_SQUARE_SIZE) {
            config.square_size = parse_positive(ENV_SQUARE_SIZE, &value)?;
        }
        if let Some(value) = lookup(ENV_WORKERS) {
            config.workers = parse_positive(ENV_WORKERS, &value)?;
        }
        if let Some(value) = lookup(ENV_PARALLEL_THRESHOLD) {
            config.parallel_threshold = parse_positive(ENV_PARALLEL_THRESHOLD, &value)?;
        }
        Ok(config)
    }
}

fn parse_positive<T>(key: &str, value: &str) -> GlyphResult<T>
where
    T: FromStr + PartialEq + Default,
{
    match value.trim().parse::<T>() {
        Ok(parsed) if parsed != T::default() => Ok(parsed),
        _ => Err(GlyphError::Config(format!(
            "{key} must be a positive integer, got {value:?}"
        ))),
    }
}

/// Everything one analysis run produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisReport {
    /// Green cells in clusters of two or more greens.
    pub connected_greens: Vec<Point>,
    /// Blocks in canonical order, IDs and names assigned.
    pub blocks: Vec<GreenBlock>,
    pub graph: ConnectivityGraph,
}

/// The main entry point of the engine.
#[derive(Debug, Clone)]
pub struct GlyphPipeline {
    config: AnalysisConfig,
}

impl GlyphPipeline {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Samples an image with the configured square size.
    pub fn sample(&self, image: &RgbImage) -> GlyphResult<Grid> {
        GridSampler::new(self.config.square_size)?.sample(image)
    }

    /// Runs the full analysis on the calling thread.
    pub fn analyze(&self, grid: &Grid) -> AnalysisReport {
        let (connected_greens, blocks) = self.prepare(grid);
        let graph = build_graph(grid, &blocks);
        AnalysisReport {
            connected_greens,
            blocks,
            graph,
        }
    }

    /// Runs the analysis, spreading the reachability stage over worker tasks when
    /// the grid has at least `parallel_threshold` blocks.
    pub async fn analyze_parallel(&self, grid: Arc<Grid>) -> GlyphResult<AnalysisReport> {
        let (connected_greens, blocks) = self.prepare(&grid);

        let (graph, blocks) = if blocks.len() >= self.config.parallel_threshold {
            let shared = Arc::new(blocks);
            let graph = ParallelGraphBuilder::new(self.config.workers)
                .build_graph(grid, Arc::clone(&shared))
                .await?;
            // Workers have finished, so this is normally the last reference.
            let blocks = Arc::try_unwrap(shared).unwrap_or_else(|shared| shared.as_ref().clone());
            (graph, blocks)
        } else {
            (build_graph(&grid, &blocks), blocks)
        };

        Ok(AnalysisReport {
            connected_greens,
            blocks,
            graph,
        })
    }

    /// Samples then analyzes an image.
    pub fn analyze_image(&self, image: &RgbImage) -> GlyphResult<AnalysisReport> {
        let grid = self.sample(image)?;
        Ok(self.analyze(&grid))
    }

    fn prepare(&self, grid: &Grid) -> (Vec<Point>, Vec<GreenBlock>) {
        info!(width = grid.width(), height = grid.height(), "analyzing grid");

        let connected_greens = find_connected_greens(grid);
        info!(count = connected_greens.len(), "connected green squares found");

        let blocks = assign_canonical_order(extract_blocks(grid));
        info!(count = blocks.len(), "green blocks identified");

        (connected_greens, blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn config_defaults_without_overrides() {
        let config = AnalysisConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, AnalysisConfig::default());
        assert_eq!(config.square_size, DEFAULT_SQUARE_SIZE);
        assert!(config.workers >= 1);
    }

    #[test]
    fn config_reads_overrides() {
        let config = AnalysisConfig::from_lookup(lookup_from(&[
            (ENV_SQUARE_SIZE, "8"),
            (ENV_WORKERS, " 3 "),
            (ENV_PARALLEL_THRESHOLD, "10"),
        ]))
        .unwrap();
        assert_eq!(config.square_size, 8);
        assert_eq!(config.workers, 3);
        assert_eq!(config.parallel_threshold, 10);
    }

    #[test]
    fn config_rejects_zero_and_garbage() {
        for bad in ["0", "-4", "many", ""] {
            let result = AnalysisConfig::from_lookup(lookup_from(&[(ENV_SQUARE_SIZE, bad)]));
            assert!(matches!(result, Err(GlyphError::Config(_))), "accepted {bad:?}");
        }
    }

    #[test]
    fn analyze_reports_clusters_blocks_and_graph() {
        let grid = Grid::from_ascii("GRG\nRGR").unwrap();
        let report = GlyphPipeline::new(AnalysisConfig::default()).analyze(&grid);

        assert_eq!(report.connected_greens.len(), 3);
        assert_eq!(report.blocks.len(), 3);
        let names: Vec<&str> = report.blocks.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(report.graph.edge_count(), 3);
    }

    #[test]
    fn grid_without_greens_is_an_empty_report() {
        let grid = Grid::from_ascii("RR.\n.RR").unwrap();
        let report = GlyphPipeline::new(AnalysisConfig::default()).analyze(&grid);
        assert!(report.connected_greens.is_empty());
        assert!(report.blocks.is_empty());
        assert!(report.graph.is_empty());
    }

    #[test]
    fn analyze_image_samples_with_configured_square_size() {
        let image = RgbImage::from_fn(24, 8, |px, _| match px / 8 {
            1 => image::Rgb([200, 10, 10]),
            _ => image::Rgb([10, 200, 10]),
        });
        let config = AnalysisConfig {
            square_size: 8,
            ..AnalysisConfig::default()
        };
        let report = GlyphPipeline::new(config).analyze_image(&image).unwrap();
        assert_eq!(report.connected_greens, vec![Point::new(0, 0), Point::new(2, 0)]);
        assert!(report.graph.are_connected("A", "B"));
    }

    #[tokio::test]
    async fn parallel_and_sequential_reports_agree() {
        let grid = Grid::from_ascii(
            "GRG.GRG\n\
             R.R.R.R\n\
             GRGRGRG\n\
             .......\n\
             GGRRRGG",
        )
        .unwrap();
        let sequential = GlyphPipeline::new(AnalysisConfig::default()).analyze(&grid);

        let config = AnalysisConfig {
            workers: 3,
            parallel_threshold: 1,
            ..AnalysisConfig::default()
        };
        let parallel = GlyphPipeline::new(config)
            .analyze_parallel(Arc::new(grid))
            .await
            .unwrap();
        assert_eq!(parallel, sequential);
    }
}
