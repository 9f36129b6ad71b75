//! I/O boundary traits for testability
//!
//! Directory listing is abstracted so the category builder can be driven by
//! a mock lister in tests (e.g. to inject unreadable subdirectories).

use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

/// One entry directly inside a listed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    /// File name of the entry
    pub name: String,
    /// Full path (listed directory joined with `name`)
    pub path: PathBuf,
    /// Whether the entry is a directory (after following links, if enabled)
    pub is_dir: bool,
}

impl DirEntryInfo {
    /// True if the name carries an extension-like dot anywhere.
    pub fn has_extension(&self) -> bool {
        self.name.contains('.')
    }

    /// Lowercased extension after the last dot, if any.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
    }
}

/// Non-recursive directory listing.
pub trait DirectoryLister: Send + Sync {
    /// List entries directly inside `dir`, excluding `dir` itself.
    ///
    /// Fails only if `dir` cannot be opened; unreadable entries are skipped.
    ///
    /// With `sorted`, entries are ordered by file name; otherwise the
    /// platform's enumeration order is kept.
    fn list(&self, dir: &Path, sorted: bool) -> io::Result<Vec<DirEntryInfo>>;
}

/// Real filesystem lister backed by `walkdir` at depth 1.
#[derive(Debug, Default)]
pub struct RealDirectoryLister {
    follow_links: bool,
}

impl RealDirectoryLister {
    pub fn new(follow_links: bool) -> Self {
        Self { follow_links }
    }
}

impl DirectoryLister for RealDirectoryLister {
    fn list(&self, dir: &Path, sorted: bool) -> io::Result<Vec<DirEntryInfo>> {
        let mut walker = WalkDir::new(dir)
            .min_depth(0)
            .max_depth(1)
            .follow_links(self.follow_links);
        if sorted {
            walker = walker.sort_by_file_name();
        }

        let mut entries = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                // depth 0 means `dir` itself could not be opened
                Err(err) if err.depth() == 0 => return Err(io::Error::from(err)),
                Err(err) => {
                    debug!("skip unreadable entry in {}: {}", dir.display(), err);
                    continue;
                }
            };
            // depth 0 is the directory itself
            if entry.depth() == 0 {
                if !entry.file_type().is_dir() {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("not a directory: {}", dir.display()),
                    ));
                }
                continue;
            }
            entries.push(DirEntryInfo {
                name: entry.file_name().to_string_lossy().into_owned(),
                path: entry.path().to_path_buf(),
                is_dir: entry.file_type().is_dir(),
            });
        }
        Ok(entries)
    }
}
