//! Bootstrap pipeline: reads the bridge config, opens the saved-item store,
//! and builds a registry with the built-in providers seeded.
//!
//! The config may be written as RON, TOML or JSON; the extension decides.

use crate::saved::{SaveError, SavedItemProvider};
use crate::schema::BridgeConfig;
use crossitem_core::Key;
use crossitem_core::registry::{BuildError, Registry};
use crossitem_core::vanilla::{MaterialCatalog, VanillaProvider};
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Owner identity recorded for the saved-item group.
pub const SAVED_OWNER: &str = "crossitem-saved";

/// Base name of the bridge config file.
pub const CONFIG_BASE_NAME: &str = "bridge";

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur during bootstrap.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// The config file has an extension we don't read.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// More than one `bridge.*` config exists.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// Seeding the reserved providers failed.
    #[error(transparent)]
    Build(#[from] BuildError),

    /// The saved-item store could not be opened.
    #[error(transparent)]
    Save(#[from] SaveError),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Config discovery
// ===========================================================================

/// Extensions a bridge config may carry, in lookup order.
pub const CONFIG_EXTENSIONS: [&str; 3] = ["ron", "toml", "json"];

/// The `bridge.*` file in `dir`, if any. Two configs with different
/// extensions are an error rather than a silent pick.
pub fn find_config(dir: &Path) -> Result<Option<PathBuf>, DataLoadError> {
    let mut present = CONFIG_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{CONFIG_BASE_NAME}.{ext}")))
        .filter(|path| path.exists());
    let found = present.next();
    if let (Some(a), Some(b)) = (&found, present.next()) {
        return Err(DataLoadError::ConflictingFormats { a: a.clone(), b });
    }
    Ok(found)
}

/// Parse a config file with the format named by its extension.
pub fn read_config(path: &Path) -> Result<BridgeConfig, DataLoadError> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    if !CONFIG_EXTENSIONS.contains(&ext) {
        return Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path)?;
    let parsed = match ext {
        "ron" => ron::from_str(&content).map_err(|e| e.to_string()),
        "toml" => toml::from_str(&content).map_err(|e| e.to_string()),
        _ => serde_json::from_str(&content).map_err(|e| e.to_string()),
    };
    parsed.map_err(|detail| DataLoadError::Parse {
        file: path.to_path_buf(),
        detail,
    })
}

/// Read `bridge.{ron,toml,json}` from `dir`, or the defaults when absent.
pub fn load_config(dir: &Path) -> Result<BridgeConfig, DataLoadError> {
    match find_config(dir)? {
        Some(path) => {
            tracing::debug!(file = %path.display(), "reading bridge config");
            read_config(&path)
        }
        None => Ok(BridgeConfig::default()),
    }
}

// ===========================================================================
// Bootstrap
// ===========================================================================

/// A registry with the built-in providers seeded, and a handle to the
/// saved-item store so the host can save into it.
#[derive(Debug)]
pub struct Bridge {
    pub registry: Registry,
    pub saved: Rc<SavedItemProvider>,
}

impl Bridge {
    /// Every stored saved item, keyed under the saved provider's default
    /// namespace.
    pub fn saved_keys(&self) -> Vec<Key> {
        let Some(namespace) = self
            .registry
            .groups()
            .find(|(_, g)| g.is_seeded() && g.owner() == SAVED_OWNER)
            .and_then(|(_, g)| g.default_alias())
        else {
            return Vec::new();
        };
        self.saved
            .stored_keys()
            .into_iter()
            .filter_map(|key| Key::new(namespace, key).ok())
            .collect()
    }
}

/// Load the config in `dir` and build the bridge from it.
pub fn load_bridge(dir: &Path) -> Result<Bridge, DataLoadError> {
    let config = load_config(dir)?;
    build_bridge(dir, &config)
}

/// Build the bridge from an already-loaded config. `saves_dir` is resolved
/// against `root`.
pub fn build_bridge(root: &Path, config: &BridgeConfig) -> Result<Bridge, DataLoadError> {
    let mut catalog = MaterialCatalog::with_defaults();
    for material in &config.materials {
        catalog.add(&material.name, material.block);
    }

    let saved = Rc::new(SavedItemProvider::open(root.join(&config.saves_dir))?);

    let mut builder = Registry::builder();
    builder.vanilla(Rc::new(VanillaProvider::new(catalog)));
    if let Some(aliases) = &config.vanilla_aliases {
        builder.vanilla_aliases(aliases.iter().cloned());
    }
    builder.reserved_provider(SAVED_OWNER, config.saved_aliases.iter().cloned(), saved.clone());
    let registry = builder.build()?;

    tracing::info!(
        saves = %saved.dir().display(),
        cached = saved.cached_keys().len(),
        namespaces = registry.enabled_namespaces().len(),
        "bridge ready"
    );
    Ok(Bridge { registry, saved })
}

// ===========================================================================
// Tests
// ===========================================================================
