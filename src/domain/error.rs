//! Domain-level errors (no external dependencies)

use std::path::PathBuf;
use thiserror::Error;

/// Domain errors raised while scanning directories or assembling the kind registry.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("cannot scan directory {path}: {reason}")]
    Scan { path: PathBuf, reason: String },

    #[error("unknown category kind: {0}")]
    UnknownKind(String),

    #[error("category kind already registered: {0}")]
    DuplicateKind(String),

    #[error("cycle in category kind hierarchy at: {0}")]
    KindCycle(String),

    #[error("category kind {kind} declares unknown parent {parent}")]
    UnknownParent { kind: String, parent: String },

    #[error("process-wide kind registry already installed")]
    RegistryInstalled,
}

impl DomainError {
    /// Create a scan error for a directory that could not be listed.
    pub fn scan(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Scan {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Path of the directory that failed to scan, if this is a scan error.
    pub fn scan_path(&self) -> Option<&PathBuf> {
        match self {
            Self::Scan { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
