//! Error type shared by every reader and writer.

use std::io;
use std::path::{Path, PathBuf};

use crate::config::ConfigError;

/// Errors that can occur while reading or writing model and feature files
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// The target file does not exist
    #[error("File not found: {}", .path.display())]
    NotFound {
        /// Fully resolved path that was looked up
        path: PathBuf,
    },

    /// Read, write or close failure on an open file
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// File the operation was bound to
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The file content violates the expected layout or schema
    #[error("Invalid data in {}{}: {message}", .file.display(), at_line(.line))]
    Structural {
        /// File being decoded
        file: PathBuf,
        /// Line of the offending element (XML layouts only)
        line: Option<u64>,
        /// Description of the violation
        message: String,
    },

    /// The file is well formed but holds a variant this crate does not handle
    /// (e.g. an HTK waveform, or a GF mixture requested as GD)
    #[error("Unsupported content in {}: {message}", .file.display())]
    Unsupported {
        /// File being decoded
        file: PathBuf,
        /// Description of the unsupported variant
        message: String,
    },

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

fn at_line(line: &Option<u64>) -> String {
    match line {
        Some(line) => format!(" (line {line})"),
        None => String::new(),
    }
}

impl PersistError {
    /// Wrap an I/O error, promoting `ErrorKind::NotFound` to [`PersistError::NotFound`]
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        if source.kind() == io::ErrorKind::NotFound {
            PersistError::NotFound { path }
        } else {
            PersistError::Io { path, source }
        }
    }

    /// Build a structural error
    pub fn structural(file: impl AsRef<Path>, line: Option<u64>, message: impl Into<String>) -> Self {
        PersistError::Structural {
            file: file.as_ref().to_path_buf(),
            line,
            message: message.into(),
        }
    }

    /// Build an unsupported-variant error
    pub fn unsupported(file: impl AsRef<Path>, message: impl Into<String>) -> Self {
        PersistError::Unsupported {
            file: file.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    /// True for [`PersistError::NotFound`]
    pub fn is_not_found(&self) -> bool {
        matches!(self, PersistError::NotFound { .. })
    }

    /// True for [`PersistError::Structural`]
    pub fn is_structural(&self) -> bool {
        matches!(self, PersistError::Structural { .. })
    }

    /// True for [`PersistError::Unsupported`]
    pub fn is_unsupported(&self) -> bool {
        matches!(self, PersistError::Unsupported { .. })
    }

    /// Line number attached to a structural error, if any
    pub fn line(&self) -> Option<u64> {
        match self {
            PersistError::Structural { line, .. } => *line,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_not_found_is_promoted() {
        let err = PersistError::io("missing.xml", io::Error::from(io::ErrorKind::NotFound));
        assert!(err.is_not_found());

        let err = PersistError::io("busy.xml", io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(err, PersistError::Io { .. }));
    }

    #[test]
    fn test_structural_display_carries_line() {
        let err = PersistError::structural("world.xml", Some(12), "Unknown tag in the path <foo>");
        assert_eq!(err.line(), Some(12));
        let text = err.to_string();
        assert!(text.contains("world.xml"));
        assert!(text.contains("line 12"));
        assert!(text.contains("<foo>"));
    }

    #[test]
    fn test_structural_without_line() {
        let err = PersistError::structural("feat.prm", None, "Wrong header");
        assert_eq!(err.to_string(), "Invalid data in feat.prm: Wrong header");
    }
}
