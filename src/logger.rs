use crate::constants::{ERROR_PREFIX, INFO_PREFIX, VERBOSE_PREFIX, WARNING_PREFIX};
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    Silent,
    Quiet,
    #[default]
    Normal,
    Verbose,
}

/// Console logger handed to the orchestrator at construction.
///
/// `Quiet` keeps errors only, `Silent` drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Logger {
    verbosity: Verbosity,
}

impl Logger {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    pub fn silent() -> Self {
        Self::new(Verbosity::Silent)
    }

    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        let verbosity = match (quiet, verbose) {
            (true, _) => Verbosity::Quiet,
            (false, true) => Verbosity::Verbose,
            (false, false) => Verbosity::Normal,
        };
        Self::new(verbosity)
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    pub fn is_quiet(&self) -> bool {
        self.verbosity <= Verbosity::Quiet
    }

    pub fn is_verbose(&self) -> bool {
        self.verbosity >= Verbosity::Verbose
    }

    pub fn info(&self, message: impl Display) {
        if self.verbosity >= Verbosity::Normal {
            println!("{} {}", INFO_PREFIX, message);
        }
    }

    /// Unprefixed line, for output that brings its own decoration.
    pub fn plain(&self, message: impl Display) {
        if self.verbosity >= Verbosity::Normal {
            println!("{}", message);
        }
    }

    pub fn verbose(&self, message: impl Display) {
        if self.is_verbose() {
            println!("{} {}", VERBOSE_PREFIX, message);
        }
    }

    pub fn warn(&self, message: impl Display) {
        if self.verbosity >= Verbosity::Normal {
            eprintln!("{} {}", WARNING_PREFIX, message);
        }
    }

    pub fn error(&self, message: impl Display) {
        if self.verbosity >= Verbosity::Quiet {
            eprintln!("{} {}", ERROR_PREFIX, message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flags() {
        assert_eq!(Logger::from_flags(false, false).verbosity(), Verbosity::Normal);
        assert_eq!(Logger::from_flags(false, true).verbosity(), Verbosity::Verbose);
        // quiet wins over verbose
        assert_eq!(Logger::from_flags(true, true).verbosity(), Verbosity::Quiet);
    }

    #[test]
    fn test_levels() {
        assert!(Logger::silent().is_quiet());
        assert!(!Logger::silent().is_verbose());
        assert!(Logger::new(Verbosity::Verbose).is_verbose());
        assert!(!Logger::default().is_quiet());
    }
}
