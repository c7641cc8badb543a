use std::io;
use std::path::Path;

use crate::error::PersistError;

/// Errors that can occur while streaming a tag-nested file
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    /// Unbalanced or mismatched tags, bad UTF-8, bad escapes
    #[error("line {line}: malformed markup: {message}")]
    Malformed {
        /// Line where the reader stopped
        line: u64,
        /// Reader diagnostic
        message: String,
    },

    /// The input ended while elements were still open
    #[error("line {line}: unexpected end of file inside {open}")]
    UnexpectedEof {
        /// Last line of the input
        line: u64,
        /// Path of the elements left open
        open: String,
    },

    /// The element handler refused an event
    #[error("line {line}: {message}")]
    Rejected {
        /// Line of the refused element
        line: u64,
        /// Handler diagnostic
        message: String,
    },

    /// The underlying stream failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl XmlError {
    /// Line number, when known
    pub fn line(&self) -> Option<u64> {
        match self {
            XmlError::Malformed { line, .. }
            | XmlError::UnexpectedEof { line, .. }
            | XmlError::Rejected { line, .. } => Some(*line),
            XmlError::Io(_) => None,
        }
    }

    /// Attach the file name
    pub(crate) fn into_persist(self, file: &Path) -> PersistError {
        match self {
            XmlError::Io(source) => PersistError::io(file, source),
            XmlError::Malformed { line, message } => PersistError::structural(file, Some(line), message),
            XmlError::UnexpectedEof { line, open } => PersistError::structural(
                file,
                Some(line),
                format!("unexpected end of file inside {open}"),
            ),
            XmlError::Rejected { line, message } => PersistError::structural(file, Some(line), message),
        }
    }
}

/// A handler's refusal of an element event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation(pub String);

impl Violation {
    /// Violation with the given message
    pub fn new(message: impl Into<String>) -> Self {
        Violation(message.into())
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
