//! Shared test helpers for integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use crate::id::GroupId;
use crate::item::{ItemStack, Parameters};
use crate::listener::Listener;
use crate::priority::Priority;
use crate::registry::Registry;
use crate::world::{BlockPos, BlockState, World};
use serde_json::Value;
use std::cell::Cell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

// ===========================================================================
// Value helpers
// ===========================================================================

/// Build a parameter map from literal pairs.
pub fn params(entries: &[(&str, Value)]) -> Parameters {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

pub fn no_params() -> Parameters {
    Parameters::new()
}

pub fn pos(x: i32, y: i32, z: i32) -> BlockPos {
    BlockPos::new("world", x, y, z)
}

// ===========================================================================
// Catalog listener
// ===========================================================================

/// A provider that marks its stacks and blocks with a tag.
///
/// Every stack or block it produces carries `tag = identifier`; reverse
/// lookups read that tag back. Parameters passed to a fetch or placement are
/// stored as further tags and, when `track_parameters` is set, reported by
/// the parameter getters.
#[derive(Debug)]
pub struct CatalogListener {
    tag: String,
    items: BTreeMap<String, String>,
    blocks: BTreeSet<String>,
    priority: Priority,
    track_parameters: bool,
    ready: bool,
    fetches: Cell<u32>,
}

impl CatalogListener {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            items: BTreeMap::new(),
            blocks: BTreeSet::new(),
            priority: Priority::Medium,
            track_parameters: false,
            ready: true,
            fetches: Cell::new(0),
        }
    }

    pub fn item(mut self, identifier: &str, material: &str) -> Self {
        self.items.insert(identifier.to_string(), material.to_string());
        self
    }

    /// An item that can also be placed as a block.
    pub fn block(mut self, identifier: &str, material: &str) -> Self {
        self.blocks.insert(identifier.to_string());
        self.item(identifier, material)
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn track_parameters(mut self) -> Self {
        self.track_parameters = true;
        self
    }

    pub fn not_ready(mut self) -> Self {
        self.ready = false;
        self
    }

    /// Number of forward lookups this listener has answered or refused.
    pub fn fetches(&self) -> u32 {
        self.fetches.get()
    }

    fn extra_tags(&self, tags: &Parameters) -> Option<Parameters> {
        self.track_parameters.then(|| {
            tags.iter()
                .filter(|(k, _)| **k != self.tag)
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()
        })
    }

    fn own_name(&self, tags: &Parameters) -> Option<String> {
        let name = tags.get(&self.tag)?.as_str()?;
        self.items.contains_key(name).then(|| name.to_string())
    }
}

impl Listener for CatalogListener {
    fn fetch(&self, identifier: &str) -> Option<ItemStack> {
        self.fetch_with(identifier, &Parameters::new())
    }

    fn fetch_with(&self, identifier: &str, parameters: &Parameters) -> Option<ItemStack> {
        self.fetches.set(self.fetches.get() + 1);
        let material = self.items.get(identifier)?;
        let mut stack = ItemStack::new(material.as_str(), 1).with_tag(self.tag.as_str(), identifier);
        for (k, v) in parameters {
            stack.set_tag(k.as_str(), v.clone());
        }
        Some(stack)
    }

    fn priority(&self) -> Priority {
        self.priority
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn available_items(&self) -> Vec<String> {
        self.items.keys().cloned().collect()
    }

    fn available_blocks(&self) -> Vec<String> {
        self.blocks.iter().cloned().collect()
    }

    fn item_name(&self, stack: &ItemStack) -> Option<String> {
        self.own_name(&stack.tags)
    }

    fn item_parameters(&self, stack: &ItemStack) -> Option<Parameters> {
        self.own_name(&stack.tags)?;
        self.extra_tags(&stack.tags)
    }

    fn block_name(&self, world: &dyn World, pos: &BlockPos) -> Option<String> {
        self.own_name(&world.block(pos).tags)
    }

    fn block_parameters(&self, world: &dyn World, pos: &BlockPos) -> Option<Parameters> {
        let state = world.block(pos);
        self.own_name(&state.tags)?;
        self.extra_tags(&state.tags)
    }

    fn set_block(&self, world: &mut dyn World, pos: &BlockPos, identifier: &str) -> bool {
        self.set_block_with(world, pos, identifier, &Parameters::new())
    }

    fn set_block_with(
        &self,
        world: &mut dyn World,
        pos: &BlockPos,
        identifier: &str,
        parameters: &Parameters,
    ) -> bool {
        if !self.blocks.contains(identifier) {
            return false;
        }
        let Some(material) = self.items.get(identifier) else {
            return false;
        };
        let mut state = BlockState::new(material.as_str()).with_tag(self.tag.as_str(), identifier);
        state.tags.extend(parameters.clone());
        world.set_block(pos.clone(), state);
        true
    }

    fn remove_block(&self, world: &mut dyn World, pos: &BlockPos) -> bool {
        if self.own_name(&world.block(pos).tags).is_none() {
            return false;
        }
        world.clear_block(pos);
        true
    }
}

// ===========================================================================
// Registry setup helpers
// ===========================================================================

/// Create a group under `alias` (owner = alias) and register `listener`.
pub fn register_catalog(
    registry: &mut Registry,
    alias: &str,
    listener: CatalogListener,
) -> (GroupId, Rc<CatalogListener>) {
    let group = registry
        .group_for(alias)
        .unwrap_or_else(|| registry.create_group(alias, [alias]).expect("valid owner"));
    let listener = Rc::new(listener);
    registry
        .register_listener(group, listener.clone())
        .expect("group accepts listeners");
    (group, listener)
}

/// A registry with a `decor` namespace offering a lamp and a chair, where
/// the lamp is placeable.
pub fn decor_registry() -> (Registry, GroupId, Rc<CatalogListener>) {
    let mut registry = Registry::new();
    let listener = CatalogListener::new("decor:id")
        .block("lamp", "GLOWSTONE")
        .item("chair", "OAK_PLANKS")
        .track_parameters();
    let (group, listener) = register_catalog(&mut registry, "decor", listener);
    (registry, group, listener)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::GridWorld;
    use serde_json::json;

    #[test]
    fn catalog_round_trips_its_own_stacks() {
        let catalog = CatalogListener::new("t").item("lamp", "GLOWSTONE");
        let stack = catalog.fetch("lamp").unwrap();
        assert_eq!(catalog.item_name(&stack).as_deref(), Some("lamp"));
        assert!(catalog.item_name(&ItemStack::new("GLOWSTONE", 1)).is_none());
        assert_eq!(catalog.fetches(), 1);
    }

    #[test]
    fn catalog_reports_parameters_only_when_tracking() {
        let plain = CatalogListener::new("t").item("lamp", "GLOWSTONE");
        let tracking = CatalogListener::new("t")
            .item("lamp", "GLOWSTONE")
            .track_parameters();
        let p = params(&[("color", json!("red"))]);
        let stack = tracking.fetch_with("lamp", &p).unwrap();
        assert!(plain.item_parameters(&stack).is_none());
        assert_eq!(tracking.item_parameters(&stack), Some(p));
    }

    #[test]
    fn catalog_places_only_blocks() {
        let catalog = CatalogListener::new("t")
            .block("lamp", "GLOWSTONE")
            .item("chair", "OAK_PLANKS");
        let mut world = GridWorld::new();
        assert!(!catalog.set_block(&mut world, &pos(0, 0, 0), "chair"));
        assert_eq!(world.block_count(), 0);
        assert!(catalog.set_block(&mut world, &pos(0, 0, 0), "lamp"));
        assert_eq!(catalog.block_name(&world, &pos(0, 0, 0)).as_deref(), Some("lamp"));
        assert!(catalog.remove_block(&mut world, &pos(0, 0, 0)));
        assert_eq!(world.block_count(), 0);
    }
}
