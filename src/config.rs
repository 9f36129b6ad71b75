//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/catscan/catscan.toml`
//! 3. Local config: `<catalog_dir>/.catscan.toml`
//! 4. Environment variables: `CATSCAN_*` prefix

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::expand_env_vars;

/// Category kind declared in a config file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KindDecl {
    /// Directory name and kind tag
    pub name: String,
    /// Kind this one specializes
    #[serde(default)]
    pub parent: Option<String>,
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub root_dir: Option<PathBuf>,
    pub image_extensions: Option<Vec<String>>,
    pub sort_entries: Option<bool>,
    pub parallel: Option<bool>,
    pub strict: Option<bool>,
    pub follow_links: Option<bool>,
    pub kinds: Option<Vec<KindDecl>>,
}

/// Unified configuration for catscan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the root category folders (default: current directory)
    pub root_dir: PathBuf,
    /// Extensions counted as images, compared case-insensitively
    pub image_extensions: Vec<String>,
    /// Sort directory listings by name for deterministic order
    pub sort_entries: bool,
    /// Build sibling subtrees in parallel
    pub parallel: bool,
    /// Abort on the first unreadable subdirectory instead of collecting it
    pub strict: bool,
    /// Follow symbolic links when listing category directories
    pub follow_links: bool,
    /// Category kinds declared in configuration
    pub kinds: Vec<KindDecl>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("."),
            image_extensions: vec!["jpg".into(), "jpeg".into(), "png".into()],
            sort_entries: true,
            parallel: false,
            strict: false,
            follow_links: false,
            kinds: vec![],
        }
    }
}

/// Get the XDG config directory for catscan.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "catscan").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("catscan.toml"))
}

/// Get the path to the local config file in a catalog directory.
pub fn local_config_path(catalog_dir: &Path) -> PathBuf {
    catalog_dir.join(".catscan.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Merge arrays with union semantics and negation support.
    ///
    /// - Items from overlay are added to base
    /// - Items prefixed with `!` remove the corresponding item from the result
    ///
    /// # Examples
    /// ```ignore
    /// merge_array(&["jpg", "png"], &["gif"])   // → ["gif", "jpg", "png"]
    /// merge_array(&["jpg", "png"], &["!jpg"])  // → ["png"]
    /// ```
    pub fn merge_array(base: &[String], overlay: &[String]) -> Vec<String> {
        let mut result: HashSet<String> = base.iter().map(|s| s.to_ascii_lowercase()).collect();

        for pattern in overlay {
            if let Some(negated) = pattern.strip_prefix('!') {
                result.remove(&negated.to_ascii_lowercase());
            } else {
                result.insert(pattern.to_ascii_lowercase());
            }
        }

        // Convert to sorted Vec for deterministic output
        let mut vec: Vec<String> = result.into_iter().collect();
        vec.sort();
        vec
    }

    /// True if `extension` (without dot) counts as an image.
    pub fn is_image_extension(&self, extension: &str) -> bool {
        self.image_extensions
            .iter()
            .any(|e| e.eq_ignore_ascii_case(extension))
    }

    /// Expand shell variables and tilde in `root_dir`.
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.root_dir.to_string_lossy().as_ref());
        self.root_dir = PathBuf::from(expanded);
    }

    /// Apply global config onto defaults. Arrays REPLACE the defaults.
    fn apply_global(&self, global: &RawSettings) -> Self {
        Self {
            root_dir: global
                .root_dir
                .clone()
                .unwrap_or_else(|| self.root_dir.clone()),
            image_extensions: global
                .image_extensions
                .clone()
                .unwrap_or_else(|| self.image_extensions.clone()),
            sort_entries: global.sort_entries.unwrap_or(self.sort_entries),
            parallel: global.parallel.unwrap_or(self.parallel),
            strict: global.strict.unwrap_or(self.strict),
            follow_links: global.follow_links.unwrap_or(self.follow_links),
            kinds: global.kinds.clone().unwrap_or_else(|| self.kinds.clone()),
        }
    }

    /// Merge local config onto self.
    ///
    /// - Scalars: overlay wins if present
    /// - `image_extensions`: union with negation support
    /// - `kinds`: appended after the inherited declarations
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        let mut kinds = self.kinds.clone();
        if let Some(extra) = &overlay.kinds {
            kinds.extend(extra.iter().cloned());
        }
        Self {
            root_dir: overlay
                .root_dir
                .clone()
                .unwrap_or_else(|| self.root_dir.clone()),
            image_extensions: overlay
                .image_extensions
                .as_ref()
                .map(|o| Self::merge_array(&self.image_extensions, o))
                .unwrap_or_else(|| self.image_extensions.clone()),
            sort_entries: overlay.sort_entries.unwrap_or(self.sort_entries),
            parallel: overlay.parallel.unwrap_or(self.parallel),
            strict: overlay.strict.unwrap_or(self.strict),
            follow_links: overlay.follow_links.unwrap_or(self.follow_links),
            kinds,
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `catalog_dir` - Optional directory holding a local `.catscan.toml`
    pub fn load(catalog_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.apply_global(&raw);
            }
        }

        if let Some(dir) = catalog_dir {
            current = current.with_local(dir)?;
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Merge the local config of `catalog_dir` onto `self`, if the file exists.
    pub fn with_local(self, catalog_dir: &Path) -> Result<Self, ApplicationError> {
        let local_path = local_config_path(catalog_dir);
        if !local_path.exists() {
            return Ok(self);
        }
        let raw = load_raw_settings(&local_path)?;
        Ok(self.merge_with(&raw))
    }

    /// Apply CATSCAN_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("CATSCAN")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("image_extensions")
                    .try_parsing(true),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("root_dir") {
            settings.root_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get::<Vec<String>>("image_extensions") {
            settings.image_extensions = val;
        }
        if let Ok(val) = config.get_bool("sort_entries") {
            settings.sort_entries = val;
        }
        if let Ok(val) = config.get_bool("parallel") {
            settings.parallel = val;
        }
        if let Ok(val) = config.get_bool("strict") {
            settings.strict = val;
        }
        if let Ok(val) = config.get_bool("follow_links") {
            settings.follow_links = val;
        }

        Ok(settings)
    }
}
