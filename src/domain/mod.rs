//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no config loading).

pub mod entities;
pub mod error;
pub mod registry;
pub mod tree;

pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use registry::{KindFactory, KindRegistry, KindRegistryBuilder};
pub use tree::{height, height_of, CategoryIter, TreeNodeConvert};
