//! Category kind registry.
//!
//! Maps directory names to zero-argument kind factories. The table is
//! assembled with [`KindRegistryBuilder`], validated once, and is immutable
//! afterwards so it can be shared across build threads without locking.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, OnceLock};

use tracing::{debug, instrument};

use crate::domain::entities::CategoryKind;
use crate::domain::error::{DomainError, DomainResult};

/// Zero-argument constructor for a category kind.
pub type KindFactory = Box<dyn Fn() -> CategoryKind + Send + Sync>;

static GLOBAL_REGISTRY: OnceLock<Arc<KindRegistry>> = OnceLock::new();

/// Mutable staging area for kind registrations.
#[derive(Default)]
pub struct KindRegistryBuilder {
    factories: BTreeMap<String, KindFactory>,
}

impl KindRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `factory` under the directory name `key`.
    pub fn register<F>(&mut self, key: impl Into<String>, factory: F) -> DomainResult<&mut Self>
    where
        F: Fn() -> CategoryKind + Send + Sync + 'static,
    {
        let key = key.into();
        if self.factories.contains_key(&key) {
            return Err(DomainError::DuplicateKind(key));
        }
        debug!("register kind: {}", key);
        self.factories.insert(key, Box::new(factory));
        Ok(self)
    }

    /// Register a kind whose name equals its directory key.
    pub fn register_kind(&mut self, name: &str, parent: Option<&str>) -> DomainResult<&mut Self> {
        let kind = CategoryKind {
            name: name.to_string(),
            parent: parent.map(str::to_string),
        };
        self.register(name, move || kind.clone())
    }

    /// Validate parent links and freeze the table.
    pub fn build(self) -> DomainResult<KindRegistry> {
        let mut lineage: HashMap<String, Option<String>> = HashMap::new();
        for factory in self.factories.values() {
            let kind = factory();
            // two keys may alias one kind, but not with different parents
            if let Some(existing) = lineage.get(&kind.name) {
                if *existing != kind.parent {
                    return Err(DomainError::DuplicateKind(kind.name));
                }
                continue;
            }
            lineage.insert(kind.name, kind.parent);
        }

        for (name, parent) in &lineage {
            if let Some(parent) = parent {
                if !lineage.contains_key(parent) {
                    return Err(DomainError::UnknownParent {
                        kind: name.clone(),
                        parent: parent.clone(),
                    });
                }
            }
        }

        for name in lineage.keys() {
            let mut seen = HashSet::new();
            let mut current = Some(name);
            while let Some(n) = current {
                if !seen.insert(n) {
                    return Err(DomainError::KindCycle(name.clone()));
                }
                current = lineage.get(n).and_then(|p| p.as_ref());
            }
        }

        Ok(KindRegistry {
            factories: self.factories,
            lineage,
        })
    }
}

/// Immutable table of registered category kinds.
pub struct KindRegistry {
    factories: BTreeMap<String, KindFactory>,
    lineage: HashMap<String, Option<String>>,
}

impl KindRegistry {
    pub fn builder() -> KindRegistryBuilder {
        KindRegistryBuilder::new()
    }

    /// Instantiate the kind registered under `key`, if any.
    pub fn resolve(&self, key: &str) -> Option<CategoryKind> {
        self.factories.get(key).map(|factory| factory())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.factories.contains_key(key)
    }

    /// Registered directory keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// True if `candidate` is `expected` or declares it somewhere up its parent chain.
    pub fn is_compatible(&self, candidate: &CategoryKind, expected: &CategoryKind) -> bool {
        if candidate.name == expected.name {
            return true;
        }
        let mut current = candidate.parent.as_ref();
        // chain length is bounded by the table size; cycles are rejected at build time
        for _ in 0..=self.lineage.len() {
            match current {
                Some(name) if *name == expected.name => return true,
                Some(name) => current = self.lineage.get(name).and_then(|p| p.as_ref()),
                None => return false,
            }
        }
        false
    }

    /// Install `self` as the process-wide registry. Only the first install succeeds.
    #[instrument(level = "debug", skip(self))]
    pub fn install_global(self) -> DomainResult<Arc<KindRegistry>> {
        let registry = Arc::new(self);
        GLOBAL_REGISTRY
            .set(Arc::clone(&registry))
            .map_err(|_| DomainError::RegistryInstalled)?;
        Ok(registry)
    }

    /// Process-wide registry, if one has been installed.
    pub fn global() -> Option<Arc<KindRegistry>> {
        GLOBAL_REGISTRY.get().cloned()
    }
}

impl fmt::Debug for KindRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KindRegistry")
            .field("keys", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}
