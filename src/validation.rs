use crate::constants::{MAX_FILE_SIZE, MAX_QUALITY, MIN_QUALITY};
use crate::error::{CompressionError, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Validate the input root and return its canonical form.
///
/// The root must exist, be a directory and be listable. Anything else is a
/// `DirectoryAccess` error, which aborts the batch.
pub fn validate_input_dir(path: &Path) -> Result<PathBuf> {
    let access = |source: io::Error| CompressionError::DirectoryAccess {
        path: path.to_path_buf(),
        source,
    };

    let canonical = path.canonicalize().map_err(access)?;
    if !canonical.is_dir() {
        return Err(access(io::Error::new(
            io::ErrorKind::InvalidInput,
            "input path is not a directory",
        )));
    }
    // Listing up front surfaces permission problems before any work is queued.
    fs::read_dir(&canonical).map_err(access)?;

    Ok(canonical)
}

pub fn validate_quality(quality: u8) -> Result<u8> {
    if !(MIN_QUALITY..=MAX_QUALITY).contains(&quality) {
        return Err(CompressionError::InvalidQuality(quality));
    }
    Ok(quality)
}

/// Check the source file size before it is decoded
pub fn validate_source_size(path: &Path) -> Result<u64> {
    let size = fs::metadata(path)?.len();
    if size > MAX_FILE_SIZE {
        return Err(CompressionError::FileTooLarge(size, MAX_FILE_SIZE));
    }
    Ok(size)
}
