use crate::error::{CompressionError, Result};
use crate::formats::SourceFormat;
use crate::validation::validate_input_dir;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Candidates found under one input root, plus the subtrees that could not be read.
#[derive(Debug, Default)]
pub struct ScanReport {
    pub files: Vec<PathBuf>,
    pub unreadable: Vec<walkdir::Error>,
}

/// Collects every eligible image under `input_root`, recursively.
///
/// Paths are absolute (rooted at the canonical input root) and returned in
/// a stable, name-sorted walk order. An unreadable root is an error, never
/// an empty list. Unreadable subdirectories are left out.
pub fn collect_image_files(input_root: &Path) -> Result<Vec<PathBuf>> {
    let root = validate_input_dir(input_root)?;
    Ok(collect_under(&root, None)?.files)
}

/// Same walk as [`collect_image_files`] over an already-validated root.
///
/// The `excluded` subtree is pruned without being read.
pub(crate) fn collect_under(root: &Path, excluded: Option<&Path>) -> Result<ScanReport> {
    let mut report = ScanReport::default();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| excluded.map_or(true, |dir| entry.path() != dir));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => return Err(root_error(root, err)),
            Err(err) => {
                report.unreadable.push(err);
                continue;
            }
        };
        let path = entry.path();

        if path.is_file() && is_image_file(path) {
            report.files.push(path.to_path_buf());
        }
    }

    Ok(report)
}

fn root_error(root: &Path, err: walkdir::Error) -> CompressionError {
    let message = err.to_string();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, message));
    CompressionError::DirectoryAccess {
        path: root.to_path_buf(),
        source,
    }
}

pub fn is_image_file(path: &Path) -> bool {
    SourceFormat::from_path(path).is_some()
}
