//! Serde data file structs for bridge configuration and saved items.
//!
//! [`BridgeConfig`] is read from `bridge.{ron,toml,json}`; every field has a
//! default so an absent or partial file is valid. [`SavedItemRecord`] is the
//! on-disk form of one saved stack.

use crossitem_core::ItemStack;
use serde::{Deserialize, Serialize};

// ===========================================================================
// Bridge configuration
// ===========================================================================

/// Aliases the saved-item provider is seeded under by default.
pub const DEFAULT_SAVED_ALIASES: [&str; 4] = ["itembridge", "saved", "save", "saves"];

/// Top-level bootstrap configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Directory holding saved-item records, relative to the config directory.
    pub saves_dir: String,
    /// Replaces the `minecraft`/`mc` aliases of the vanilla provider.
    pub vanilla_aliases: Option<Vec<String>>,
    pub saved_aliases: Vec<String>,
    /// Materials added to the built-in vanilla catalog.
    pub materials: Vec<MaterialData>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            saves_dir: "saves".to_string(),
            vanilla_aliases: None,
            saved_aliases: DEFAULT_SAVED_ALIASES.iter().map(|s| s.to_string()).collect(),
            materials: Vec::new(),
        }
    }
}

/// An extra vanilla material.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MaterialData {
    pub name: String,
    #[serde(default)]
    pub block: bool,
}

// ===========================================================================
// Saved items
// ===========================================================================

/// Current on-disk version of [`SavedItemRecord`].
pub const RECORD_FORMAT_VERSION: u32 = 1;

/// One saved stack and who saved it.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SavedItemRecord {
    pub key: String,
    pub format_version: u32,
    /// Unix time in milliseconds.
    pub saved_at: u64,
    pub save_method: String,
    pub saved_by: String,
    pub item: ItemStack,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: BridgeConfig = ron::from_str("()").unwrap();
        assert_eq!(config, BridgeConfig::default());
        assert_eq!(config.saves_dir, "saves");
        assert_eq!(config.saved_aliases, DEFAULT_SAVED_ALIASES);
    }

    #[test]
    fn toml_config_parses() {
        let config: BridgeConfig = toml::from_str(
            r#"
            saves_dir = "stash"
            vanilla_aliases = ["minecraft"]

            [[materials]]
            name = "copper_block"
            block = true

            [[materials]]
            name = "copper_ingot"
            "#,
        )
        .unwrap();
        assert_eq!(config.saves_dir, "stash");
        assert_eq!(config.vanilla_aliases, Some(vec!["minecraft".to_string()]));
        assert_eq!(config.materials.len(), 2);
        assert!(config.materials[0].block);
        assert!(!config.materials[1].block);
        assert_eq!(config.saved_aliases, DEFAULT_SAVED_ALIASES);
    }

    #[test]
    fn record_survives_ron() {
        let record = SavedItemRecord {
            key: "sword".into(),
            format_version: RECORD_FORMAT_VERSION,
            saved_at: 1_700_000_000_000,
            save_method: "api".into(),
            saved_by: "tester".into(),
            item: ItemStack::new("DIAMOND_SWORD", 1)
                .with_display_name("Blade")
                .with_tag("sharpness", 5),
        };
        let text = ron::ser::to_string_pretty(&record, ron::ser::PrettyConfig::default()).unwrap();
        let back: SavedItemRecord = ron::from_str(&text).unwrap();
        assert_eq!(back, record);
    }
}
