pub const DEFAULT_QUALITY: u8 = 65;
pub const GUI_DEFAULT_QUALITY: u8 = 60;
pub const MIN_QUALITY: u8 = 1;
pub const MAX_QUALITY: u8 = 100;

/// Maximum source file size in bytes (100MB)
pub const MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;
/// Maximum decoded width or height in pixels
pub const MAX_IMAGE_DIMENSION: u32 = 16384;

pub const OUTPUT_PREFIX: &str = "compressed_";
pub const OUTPUT_EXTENSION: &str = "jpg";
pub const TEMP_FILE_PREFIX: &str = ".compressed_";
pub const TEMP_FILE_SUFFIX: &str = ".part";

pub const SKIP_REASON_EXISTS: &str = "destination already exists";
pub const SKIP_REASON_CANCELLED: &str = "batch cancelled";

pub const PROGRESS_BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";
pub const PROGRESS_BAR_CHARS: &str = "=>-";

// Common output message prefixes
pub const SUCCESS_PREFIX: &str = "✅";
pub const WARNING_PREFIX: &str = "⚠️ ";
pub const ERROR_PREFIX: &str = "❌";
pub const INFO_PREFIX: &str = "📋";
pub const VERBOSE_PREFIX: &str = "🔍";
