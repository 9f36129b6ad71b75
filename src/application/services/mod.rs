//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (DirectoryLister)
//! but are themselves concrete structs, not traits.

mod builder;
mod catalog;

pub use builder::{CategoryBuilder, CategoryTree};
pub use catalog::CatalogService;
