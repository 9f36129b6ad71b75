//! Category catalog service
//!
//! Entry point for host applications: builds the tree for a registered root
//! kind found under the configured catalog directory.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, instrument};

use crate::application::services::builder::{CategoryBuilder, CategoryTree};
use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::domain::{height, CategoryNode, DomainError, KindRegistry};
use crate::infrastructure::traits::DirectoryLister;

/// Service for building category trees from the catalog directory.
pub struct CatalogService {
    registry: Arc<KindRegistry>,
    settings: Arc<Settings>,
    builder: CategoryBuilder,
}

impl CatalogService {
    pub fn new(
        registry: Arc<KindRegistry>,
        lister: Arc<dyn DirectoryLister>,
        settings: Arc<Settings>,
    ) -> Self {
        let builder = CategoryBuilder::new(
            Arc::clone(&registry),
            lister,
            Arc::clone(&settings),
        );
        Self {
            registry,
            settings,
            builder,
        }
    }

    /// Build the tree for `root_key`, read from `<root_dir>/<root_key>`.
    #[instrument(level = "debug", skip(self))]
    pub fn build_category_tree(&self, root_key: &str) -> ApplicationResult<CategoryTree> {
        let dir = self.settings.root_dir.join(root_key);
        self.build_category_tree_at(root_key, &dir)
    }

    /// Build the tree for `root_key` from an explicit directory.
    #[instrument(level = "debug", skip(self))]
    pub fn build_category_tree_at(&self, root_key: &str, dir: &Path) -> ApplicationResult<CategoryTree> {
        let kind = self
            .registry
            .resolve(root_key)
            .ok_or_else(|| DomainError::UnknownKind(root_key.to_string()))?;

        let tree = self.builder.build(root_key, kind, dir)?;
        info!(
            "built category tree {}: {} categories, {} images, height {}, {} scan errors",
            root_key,
            tree.root.node_count(),
            tree.root.total_images(),
            tree.height(),
            tree.scan_errors.len()
        );
        Ok(tree)
    }

    pub fn height(&self, node: &CategoryNode) -> usize {
        height(node)
    }

    pub fn registry(&self) -> &KindRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}
