// THEORY:
// A single error taxonomy for everything that can fail at the edges of the engine:
// building a grid from caller data, sampling an image into a grid, reading
// configuration, and exporting results. The traversal algorithms themselves are
// total over a well-formed `Grid` and never return these errors.

/// Result type for fallible glyph-graph operations.
pub type GlyphResult<T> = Result<T, GlyphError>;

/// Errors raised while constructing inputs or persisting outputs.
#[derive(Debug, thiserror::Error)]
pub enum GlyphError {
    #[error("row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("grid has {actual} rows, expected {expected}")]
    RowCountMismatch { expected: usize, actual: usize },

    #[error("cell buffer holds {actual} cells, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("cannot build a cell from {0} bytes")]
    InvalidCellBytes(usize),

    #[error("square size must be greater than zero")]
    ZeroSquareSize,

    #[error("image {width}x{height} is smaller than a single {square_size}px square")]
    ImageTooSmall {
        width: u32,
        height: u32,
        square_size: u32,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("reachability worker failed: {0}")]
    Worker(String),
}
