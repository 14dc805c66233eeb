use crate::processing::CompressionStats;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// One discovered candidate and the settings it is processed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTask {
    source_path: PathBuf,
    input_root: PathBuf,
    output_root: PathBuf,
    quality: u8,
    keep_original: bool,
}

impl ImageTask {
    pub fn new(
        source_path: PathBuf,
        input_root: PathBuf,
        output_root: PathBuf,
        quality: u8,
        keep_original: bool,
    ) -> Self {
        Self {
            source_path,
            input_root,
            output_root,
            quality,
            keep_original,
        }
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn input_root(&self) -> &Path {
        &self.input_root
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    pub fn keep_original(&self) -> bool {
        self.keep_original
    }
}

/// Terminal state of one candidate. Exactly one is produced per task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Processed {
        source: PathBuf,
        dest: PathBuf,
        stats: CompressionStats,
        /// `false` when originals were kept or their removal failed
        original_removed: bool,
    },
    Skipped {
        source: PathBuf,
        reason: String,
    },
    Failed {
        source: PathBuf,
        error: String,
    },
}

impl TaskOutcome {
    pub fn source(&self) -> &Path {
        match self {
            TaskOutcome::Processed { source, .. }
            | TaskOutcome::Skipped { source, .. }
            | TaskOutcome::Failed { source, .. } => source,
        }
    }

    pub fn is_processed(&self) -> bool {
        matches!(self, TaskOutcome::Processed { .. })
    }
}

impl fmt::Display for TaskOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskOutcome::Processed { source, dest, .. } => {
                write!(f, "processed {} -> {}", source.display(), dest.display())
            }
            TaskOutcome::Skipped { source, reason } => {
                write!(f, "skipped {} ({})", source.display(), reason)
            }
            TaskOutcome::Failed { source, error } => {
                write!(f, "failed {}: {}", source.display(), error)
            }
        }
    }
}

/// Shared flag checked before each candidate starts.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_source() {
        let outcome = TaskOutcome::Skipped {
            source: PathBuf::from("/in/a.png"),
            reason: "destination already exists".to_string(),
        };
        assert_eq!(outcome.source(), Path::new("/in/a.png"));
        assert!(!outcome.is_processed());
        assert!(outcome.to_string().contains("destination already exists"));
    }

    #[test]
    fn test_cancel_token_shared() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }
}
