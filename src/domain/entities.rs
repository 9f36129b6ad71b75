//! Domain entities: core data structures

use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

/// Locator of an image discovered during a scan.
///
/// Holds the path as listed (joined onto the scanned directory).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageRef(PathBuf);

impl ImageRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// File name of the image, e.g. `cat1.jpg`.
    pub fn file_name(&self) -> Option<&str> {
        self.0.file_name().and_then(|n| n.to_str())
    }

    /// Locator relative to `base` (usually the catalog root directory).
    pub fn relative_to(&self, base: &Path) -> Option<PathBuf> {
        pathdiff::diff_paths(&self.0, base)
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl AsRef<Path> for ImageRef {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

/// Registrable category type, tagged by name.
///
/// `parent` names the kind this one specializes. A kind is compatible with
/// itself and with every kind along its parent chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CategoryKind {
    pub name: String,
    pub parent: Option<String>,
}

impl CategoryKind {
    /// Kind without a parent (a tree root kind).
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
        }
    }

    /// Kind specializing `parent`.
    pub fn child_of(name: impl Into<String>, parent: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: Some(parent.into()),
        }
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.parent {
            Some(parent) => write!(f, "{} < {}", self.name, parent),
            None => write!(f, "{}", self.name),
        }
    }
}

/// One category folder: its images and its accepted subcategories.
///
/// Nodes are assembled once by the builder and never mutated afterwards.
/// Equality is identity by kind and name, not a structural comparison.
#[derive(Debug, Clone)]
pub struct CategoryNode {
    name: String,
    kind: CategoryKind,
    path: PathBuf,
    images: Vec<ImageRef>,
    children: Vec<CategoryNode>,
}

impl CategoryNode {
    pub fn new(
        name: impl Into<String>,
        kind: CategoryKind,
        path: impl Into<PathBuf>,
        images: Vec<ImageRef>,
        children: Vec<CategoryNode>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            path: path.into(),
            images,
            children,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &CategoryKind {
        &self.kind
    }

    /// Directory this node was scanned from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Images found directly inside this node's directory.
    pub fn images(&self) -> &[ImageRef] {
        &self.images
    }

    pub fn sub_categories(&self) -> &[CategoryNode] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Diagnostic dump: name, subcategory names, image locators.
    pub fn describe(&self) -> String {
        let mut out = format!("{} :\n  Sub categories :\n", self.name);
        for child in &self.children {
            out.push_str(&format!("    - {}\n", child.name));
        }
        out.push_str("  Images :\n");
        for image in &self.images {
            out.push_str(&format!("    - {}\n", image));
        }
        out
    }
}

impl PartialEq for CategoryNode {
    fn eq(&self, other: &Self) -> bool {
        self.kind.name == other.kind.name && self.name == other.name
    }
}

impl Eq for CategoryNode {}

impl Hash for CategoryNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.name.hash(state);
        self.name.hash(state);
    }
}

impl fmt::Display for CategoryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
///
/// Falls back to the input when a variable cannot be resolved.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}
