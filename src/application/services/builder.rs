//! Category tree builder
//!
//! Scans a category directory, resolves each extensionless subdirectory to a
//! registered kind, keeps the kinds compatible with the one being built and
//! recurses depth-first. Children are attached in discovery order.

use std::path::Path;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, instrument, warn};

use crate::application::IoResultExt;
use crate::config::Settings;
use crate::domain::{CategoryKind, CategoryNode, DomainError, DomainResult, ImageRef, KindRegistry};
use crate::infrastructure::traits::{DirEntryInfo, DirectoryLister};

/// Output of a build: the tree plus subtrees that could not be scanned.
#[derive(Debug)]
pub struct CategoryTree {
    /// Root category node
    pub root: CategoryNode,
    /// Scan failures of omitted subtrees, in discovery order
    pub scan_errors: Vec<DomainError>,
}

impl CategoryTree {
    pub fn root(&self) -> &CategoryNode {
        &self.root
    }

    pub fn scan_errors(&self) -> &[DomainError] {
        &self.scan_errors
    }

    /// True if every accepted subdirectory was scanned.
    pub fn is_complete(&self) -> bool {
        self.scan_errors.is_empty()
    }

    pub fn height(&self) -> usize {
        self.root.height()
    }

    pub fn into_root(self) -> CategoryNode {
        self.root
    }
}

type NodeOutcome = DomainResult<(CategoryNode, Vec<DomainError>)>;

/// Depth-first category resolver.
pub struct CategoryBuilder {
    registry: Arc<KindRegistry>,
    lister: Arc<dyn DirectoryLister>,
    settings: Arc<Settings>,
}

impl CategoryBuilder {
    pub fn new(
        registry: Arc<KindRegistry>,
        lister: Arc<dyn DirectoryLister>,
        settings: Arc<Settings>,
    ) -> Self {
        Self {
            registry,
            lister,
            settings,
        }
    }

    /// Build the tree rooted at `dir`, whose own kind is `kind`.
    ///
    /// The root kind is not checked; it is the expected kind for the root's
    /// children. Fails if `dir` itself cannot be listed.
    #[instrument(level = "debug", skip(self, kind))]
    pub fn build(&self, name: &str, kind: CategoryKind, dir: &Path) -> DomainResult<CategoryTree> {
        let (root, scan_errors) = self.build_node(name, kind, dir)?;
        Ok(CategoryTree { root, scan_errors })
    }

    fn build_node(&self, name: &str, kind: CategoryKind, dir: &Path) -> NodeOutcome {
        debug!("scan: {} ({})", dir.display(), kind);
        let entries = self
            .lister
            .list(dir, self.settings.sort_entries)
            .with_scan_context(dir)?;

        let images = self.collect_images(&entries);
        let accepted: Vec<(&DirEntryInfo, CategoryKind)> = entries
            .iter()
            .filter(|e| e.is_dir && !e.has_extension())
            .filter_map(|e| self.resolve_child(e, &kind).map(|k| (e, k)))
            .collect();

        // indexed par_iter collects in input order
        let outcomes: Vec<NodeOutcome> = if self.settings.parallel {
            accepted
                .par_iter()
                .map(|(entry, child_kind)| {
                    self.build_node(&entry.name, child_kind.clone(), &entry.path)
                })
                .collect()
        } else {
            accepted
                .iter()
                .map(|(entry, child_kind)| {
                    self.build_node(&entry.name, child_kind.clone(), &entry.path)
                })
                .collect()
        };

        let mut children = Vec::with_capacity(outcomes.len());
        let mut scan_errors = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok((child, child_errors)) => {
                    children.push(child);
                    scan_errors.extend(child_errors);
                }
                Err(e) if self.settings.strict => return Err(e),
                Err(e) => {
                    warn!("skipping subtree: {}", e);
                    scan_errors.push(e);
                }
            }
        }

        debug!(
            "built {}: {} images, {} subcategories",
            name,
            images.len(),
            children.len()
        );
        let node = CategoryNode::new(name, kind, dir, images, children);
        Ok((node, scan_errors))
    }

    fn collect_images(&self, entries: &[DirEntryInfo]) -> Vec<ImageRef> {
        entries
            .iter()
            .filter(|e| !e.is_dir)
            .filter(|e| {
                e.extension()
                    .is_some_and(|ext| self.settings.is_image_extension(&ext))
            })
            .map(|e| ImageRef::new(&e.path))
            .collect()
    }

    /// Registered kind for `entry` if it may appear under `expected`.
    fn resolve_child(&self, entry: &DirEntryInfo, expected: &CategoryKind) -> Option<CategoryKind> {
        let Some(kind) = self.registry.resolve(&entry.name) else {
            debug!("skip {}: no registered kind", entry.path.display());
            return None;
        };
        if !self.registry.is_compatible(&kind, expected) {
            debug!(
                "skip {}: kind {} does not specialize {}",
                entry.path.display(),
                kind.name,
                expected.name
            );
            return None;
        }
        Some(kind)
    }
}
