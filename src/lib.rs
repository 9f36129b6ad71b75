//! Typed image category trees built from a directory hierarchy.
//!
//! Each directory is a category holding the images found directly inside it.
//! Extensionless subdirectories whose names are registered kinds, and whose
//! kinds specialize the kind being built, become subcategories.
//!
//! ```ignore
//! use std::sync::Arc;
//! use catscan::{KindRegistry, ServiceContainer, Settings};
//!
//! let mut kinds = KindRegistry::builder();
//! kinds.register_kind("Easy", None)?.register_kind("Medium", Some("Easy"))?;
//! let container = ServiceContainer::new(Settings::default(), Arc::new(kinds.build()?));
//! let tree = container.catalog.build_category_tree("Easy")?;
//! println!("{}", tree.root.describe());
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod util;

pub use application::services::{CatalogService, CategoryBuilder, CategoryTree};
pub use application::{ApplicationError, ApplicationResult};
pub use config::{KindDecl, Settings};
pub use domain::{
    height, height_of, CategoryKind, CategoryNode, DomainError, DomainResult, ImageRef,
    KindRegistry, KindRegistryBuilder, TreeNodeConvert,
};
pub use infrastructure::traits::{DirEntryInfo, DirectoryLister, RealDirectoryLister};
pub use infrastructure::ServiceContainer;
