pub mod batch;
pub mod cli;
pub mod constants;
pub mod error;
pub mod events;
pub mod formats;
pub mod logger;
pub mod processing;
pub mod progress;
pub mod resolver;
pub mod scanner;
pub mod task;
pub mod utils;
pub mod validation;

pub use batch::{
    process, spawn_batch, BatchConfig, BatchHandle, BatchOrchestrator, BatchResult, ExecutionMode,
};
pub use error::{CompressionError, Result};
pub use events::{BatchEvent, Callbacks, EventSink, NullSink};
pub use logger::{Logger, Verbosity};
pub use processing::{
    compress_image, load_image_with_metadata, save_jpeg, CompressionStats, JpegOptions,
};
pub use resolver::{ensure_directory, resolve_output_path, Resolution};
pub use scanner::{collect_image_files, is_image_file};
pub use task::{CancelToken, ImageTask, TaskOutcome};
