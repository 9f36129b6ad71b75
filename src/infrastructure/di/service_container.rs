//! Service container for dependency injection
//!
//! Wires settings, the kind registry and the directory lister into services.

use std::path::Path;
use std::sync::Arc;

use crate::application::services::CatalogService;
use crate::application::ApplicationResult;
use crate::config::{KindDecl, Settings};
use crate::domain::{DomainResult, KindRegistry};
use crate::infrastructure::traits::{DirectoryLister, RealDirectoryLister};

/// Build a registry from kinds declared in configuration.
pub fn registry_from_decls(decls: &[KindDecl]) -> DomainResult<KindRegistry> {
    let mut builder = KindRegistry::builder();
    for decl in decls {
        builder.register_kind(&decl.name, decl.parent.as_deref())?;
    }
    builder.build()
}

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Registered category kinds
    pub registry: Arc<KindRegistry>,

    /// Category tree service
    pub catalog: CatalogService,
}

impl ServiceContainer {
    /// Create a container with the real filesystem lister.
    pub fn new(settings: Settings, registry: Arc<KindRegistry>) -> Self {
        let lister = Arc::new(RealDirectoryLister::new(settings.follow_links));
        Self::with_deps(settings, registry, lister)
    }

    /// Create a container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        registry: Arc<KindRegistry>,
        lister: Arc<dyn DirectoryLister>,
    ) -> Self {
        let settings = Arc::new(settings);
        let catalog = CatalogService::new(
            Arc::clone(&registry),
            lister,
            Arc::clone(&settings),
        );

        Self {
            settings,
            registry,
            catalog,
        }
    }

    /// Create a container whose registry comes from the `kinds` declared in settings.
    pub fn from_settings(settings: Settings) -> ApplicationResult<Self> {
        let registry = Arc::new(registry_from_decls(&settings.kinds)?);
        Ok(Self::new(settings, registry))
    }

    /// Load layered settings for `catalog_dir` and wire a container from them.
    ///
    /// Uses the process-wide registry when one is installed, otherwise the
    /// kinds declared in configuration.
    pub fn load(catalog_dir: Option<&Path>) -> ApplicationResult<Self> {
        let settings = Settings::load(catalog_dir)?;
        match KindRegistry::global() {
            Some(registry) => Ok(Self::new(settings, registry)),
            None => Self::from_settings(settings),
        }
    }
}
