//! Error conversion helpers for directory listing
//!
//! Provides an extension trait for attaching the scanned path to I/O errors.

use std::io;
use std::path::Path;

use crate::domain::{DomainError, DomainResult};

/// Extension trait for converting `io::Result` to `DomainResult` with the scanned path.
pub trait IoResultExt<T> {
    /// Turn an I/O failure into a scan error for `path`.
    ///
    /// # Example
    /// ```ignore
    /// lister.list(&dir, true).with_scan_context(&dir)?;
    /// ```
    fn with_scan_context(self, path: &Path) -> DomainResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_scan_context(self, path: &Path) -> DomainResult<T> {
        self.map_err(|e| DomainError::scan(path, e))
    }
}
