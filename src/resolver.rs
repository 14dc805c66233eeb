use crate::constants::{OUTPUT_EXTENSION, OUTPUT_PREFIX};
use crate::error::{CompressionError, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Where a candidate's compressed copy goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Destination is free; its directory now exists.
    Ready(PathBuf),
    /// A previous run (or another candidate) already produced this file.
    Exists(PathBuf),
}

impl Resolution {
    pub fn dest_path(&self) -> &Path {
        match self {
            Resolution::Ready(path) | Resolution::Exists(path) => path,
        }
    }
}

/// Creates `path` (and parents) unless it is already a directory.
///
/// Returns `true` when this call created it. An `AlreadyExists` from a
/// concurrent creator counts as success.
pub fn ensure_directory(path: &Path) -> Result<bool> {
    if path.is_dir() {
        return Ok(false);
    }

    match fs::create_dir_all(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && path.is_dir() => Ok(false),
        Err(source) => Err(CompressionError::DirectoryCreationFailed {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Mirrors the directory of `source_path` from `input_root` into `output_root`.
pub fn output_subdir(source_path: &Path, input_root: &Path, output_root: &Path) -> Result<PathBuf> {
    let parent = source_path.parent().unwrap_or(Path::new(""));
    let relative_dir = parent
        .strip_prefix(input_root)
        .map_err(|_| CompressionError::NotUnderInputRoot {
            path: source_path.to_path_buf(),
            root: input_root.to_path_buf(),
        })?;

    Ok(output_root.join(relative_dir))
}

/// `compressed_<stem>.jpg`
pub fn output_file_name(source_path: &Path) -> Result<String> {
    let stem = source_path
        .file_stem()
        .ok_or_else(|| CompressionError::UnsupportedFormat("Invalid file name".to_string()))?;

    Ok(format!(
        "{}{}.{}",
        OUTPUT_PREFIX,
        stem.to_string_lossy(),
        OUTPUT_EXTENSION
    ))
}

/// Destination for `source_path` inside an existing `subdir`.
pub fn check_destination(subdir: &Path, source_path: &Path) -> Result<Resolution> {
    let dest_path = subdir.join(output_file_name(source_path)?);
    if dest_path.exists() {
        Ok(Resolution::Exists(dest_path))
    } else {
        Ok(Resolution::Ready(dest_path))
    }
}

/// Computes the destination for one candidate and makes sure its directory exists.
pub fn resolve_output_path(
    source_path: &Path,
    input_root: &Path,
    output_root: &Path,
) -> Result<Resolution> {
    let subdir = output_subdir(source_path, input_root, output_root)?;
    ensure_directory(&subdir)?;
    check_destination(&subdir, source_path)
}
