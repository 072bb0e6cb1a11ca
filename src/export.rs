// THEORY:
// The exporter is the outermost layer: it turns the engine's in-memory results into
// JSON files and back. Two documents are written per run:
//
// - `graph.json`: an array of `{ "name", "connections", "center": { "X", "Y" } }`,
//   pretty-printed with a two-space indent.
// - `connected_squares.json`: an array of `{ "X", "Y" }` coordinates.
//
// Only the graph is read back; it is the one format that has to round-trip.

use crate::core_modules::grid::Point;
use crate::core_modules::reachability::ConnectivityGraph;
use crate::error::GlyphResult;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

pub const GRAPH_FILE_NAME: &str = "graph.json";
pub const CONNECTED_SQUARES_FILE_NAME: &str = "connected_squares.json";

pub fn graph_to_json(graph: &ConnectivityGraph) -> GlyphResult<String> {
    let mut json = serde_json::to_string_pretty(graph)?;
    json.push('\n');
    Ok(json)
}

pub fn graph_from_json(json: &str) -> GlyphResult<ConnectivityGraph> {
    Ok(serde_json::from_str(json)?)
}

pub fn write_graph_json(graph: &ConnectivityGraph, path: &Path) -> GlyphResult<()> {
    write_pretty(graph, path)
}

pub fn read_graph_json(path: &Path) -> GlyphResult<ConnectivityGraph> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

pub fn write_points_json(points: &[Point], path: &Path) -> GlyphResult<()> {
    write_pretty(points, path)
}

fn write_pretty<T: Serialize + ?Sized>(value: &T, path: &Path) -> GlyphResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
