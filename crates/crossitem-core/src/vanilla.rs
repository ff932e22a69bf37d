//! The built-in provider for plain materials.
//!
//! [`VanillaProvider`] answers for the reserved `minecraft`/`mc` namespace and
//! sits at [`Priority::Lowest`], so any other provider claiming a stack wins a
//! reverse lookup over it.

use crate::item::ItemStack;
use crate::listener::Listener;
use crate::priority::Priority;
use crate::world::{BlockPos, BlockState, World};
use std::collections::BTreeMap;

/// Materials known to the vanilla provider, keyed by upper-case name.
#[derive(Debug, Clone, Default)]
pub struct MaterialCatalog {
    /// name -> placeable as a block
    materials: BTreeMap<String, bool>,
}

const DEFAULT_BLOCKS: &[&str] = &[
    "STONE",
    "DIRT",
    "GRASS_BLOCK",
    "COBBLESTONE",
    "OAK_PLANKS",
    "OAK_LOG",
    "SAND",
    "GRAVEL",
    "GLASS",
    "GLOWSTONE",
    "SEA_LANTERN",
    "REDSTONE_LAMP",
    "DIAMOND_ORE",
    "IRON_ORE",
    "GOLD_ORE",
    "COAL_ORE",
    "DIAMOND_BLOCK",
    "OBSIDIAN",
    "BEDROCK",
    "TORCH",
    "CHEST",
    "CRAFTING_TABLE",
    "FURNACE",
    "BOOKSHELF",
    "WHITE_WOOL",
    "TNT",
];

const DEFAULT_ITEMS: &[&str] = &[
    "DIAMOND",
    "EMERALD",
    "COAL",
    "REDSTONE",
    "IRON_INGOT",
    "GOLD_INGOT",
    "STICK",
    "APPLE",
    "BREAD",
    "BOW",
    "ARROW",
    "DIAMOND_SWORD",
    "DIAMOND_PICKAXE",
];

impl MaterialCatalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in material list.
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();
        for name in DEFAULT_BLOCKS {
            catalog.add(name, true);
        }
        for name in DEFAULT_ITEMS {
            catalog.add(name, false);
        }
        catalog
    }

    /// Add or replace a material. The name is normalized first.
    pub fn add(&mut self, name: &str, is_block: bool) {
        self.materials.insert(normalize_material(name), is_block);
    }

    /// Find a material by loose name: case-insensitive, optional
    /// `minecraft:` prefix, spaces and dashes read as underscores.
    pub fn match_material(&self, name: &str) -> Option<&str> {
        let normalized = normalize_material(name);
        self.materials
            .get_key_value(&normalized)
            .map(|(k, _)| k.as_str())
    }

    pub fn is_block(&self, name: &str) -> bool {
        self.materials
            .get(&normalize_material(name))
            .copied()
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.materials.keys().map(String::as_str)
    }

    pub fn block_names(&self) -> impl Iterator<Item = &str> {
        self.materials
            .iter()
            .filter(|(_, block)| **block)
            .map(|(k, _)| k.as_str())
    }
}

fn normalize_material(name: &str) -> String {
    let trimmed = name.trim();
    let bare = match trimmed.split_once(':') {
        Some((ns, rest)) if ns.eq_ignore_ascii_case("minecraft") => rest,
        _ => trimmed,
    };
    bare.chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            c => c.to_ascii_uppercase(),
        })
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

/// Listener for plain materials.
#[derive(Debug, Clone)]
pub struct VanillaProvider {
    catalog: MaterialCatalog,
}

impl VanillaProvider {
    pub fn new(catalog: MaterialCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &MaterialCatalog {
        &self.catalog
    }
}

impl Default for VanillaProvider {
    fn default() -> Self {
        Self::new(MaterialCatalog::with_defaults())
    }
}

impl Listener for VanillaProvider {
    fn fetch(&self, identifier: &str) -> Option<ItemStack> {
        self.catalog
            .match_material(identifier)
            .map(|m| ItemStack::new(m, 1))
    }

    fn priority(&self) -> Priority {
        Priority::Lowest
    }

    fn available_items(&self) -> Vec<String> {
        self.catalog.names().map(str::to_string).collect()
    }

    fn available_blocks(&self) -> Vec<String> {
        self.catalog.block_names().map(str::to_string).collect()
    }

    /// Every stack has a material, so vanilla names any stack.
    fn item_name(&self, stack: &ItemStack) -> Option<String> {
        Some(stack.material.clone())
    }

    fn block_name(&self, world: &dyn World, pos: &BlockPos) -> Option<String> {
        let state = world.block(pos);
        (!state.is_air()).then_some(state.material)
    }

    fn set_block(&self, world: &mut dyn World, pos: &BlockPos, identifier: &str) -> bool {
        match self.catalog.match_material(identifier) {
            Some(m) if self.catalog.is_block(m) => {
                world.set_block(pos.clone(), BlockState::new(m));
                true
            }
            _ => false,
        }
    }
}
