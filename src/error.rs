use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("allocation rejected: {0}")]
    Allocation(String),

    #[error("tile render failed: {0}")]
    TileRender(String),

    #[error("decode failed: {0}")]
    Decode(#[source] image::ImageError),

    #[error("encode failed: {0}")]
    Encode(#[source] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
