use thiserror::Error;

#[derive(Debug, Error)]
pub enum TerrainError {
    #[error("not enough vertices to analyze: need at least 3, got {0}")]
    TooFewVertices(usize),
    #[error("the points do not span a plane")]
    DegeneratePlane,
    #[error("invalid options: {0}")]
    InvalidOptions(String),
    #[error("buffer length mismatch: expected {expected} elevations, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("heightmap image error: {0}")]
    Image(#[from] image::ImageError),
}
