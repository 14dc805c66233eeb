use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompressionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot access input directory {path:?}: {source}")]
    DirectoryAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode image {path:?}: {source}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to encode JPEG: {0}")]
    ImageEncode(#[from] jpeg_encoder::EncodingError),

    #[error("Destination already exists: {0:?}")]
    DestinationExists(PathBuf),

    #[error("Failed to remove original file {path:?}: {source}")]
    OriginalDeletion {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create output directory {path:?}: {source}")]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid quality value: {0}. Must be between 1 and 100")]
    InvalidQuality(u8),

    #[error("Invalid image dimensions: {0}x{1}. Maximum allowed: {2}x{2}")]
    InvalidDimensions(u32, u32, u32),

    #[error("File too large: {0} bytes. Maximum allowed: {1} bytes")]
    FileTooLarge(u64, u64),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("{path:?} is not inside input directory {root:?}")]
    NotUnderInputRoot { path: PathBuf, root: PathBuf },

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(String),

    #[error("Worker panicked: {0}")]
    WorkerPanicked(String),
}

pub type Result<T> = std::result::Result<T, CompressionError>;
