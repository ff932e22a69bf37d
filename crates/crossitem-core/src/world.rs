//! Block positions and the world the block operations act on.
//!
//! The registry never mutates blocks itself. Block-capable listeners receive
//! a [`World`] and decide what to change. [`GridWorld`] is a sparse in-memory
//! implementation used by hosts without their own block storage and by tests.

use crate::item::Parameters;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Material reported for positions with no block.
pub const AIR: &str = "AIR";

/// A block position in a named world.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockPos {
    pub world: String,
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub fn new(world: impl Into<String>, x: i32, y: i32, z: i32) -> Self {
        Self {
            world: world.into(),
            x,
            y,
            z,
        }
    }
}

/// The material and producer tags of a placed block.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BlockState {
    pub material: String,
    #[serde(default)]
    pub tags: Parameters,
}

impl BlockState {
    pub fn new(material: impl Into<String>) -> Self {
        Self {
            material: material.into(),
            tags: Parameters::new(),
        }
    }

    pub fn air() -> Self {
        Self::new(AIR)
    }

    pub fn is_air(&self) -> bool {
        self.material == AIR
    }

    pub fn with_tag(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.tags.insert(name.into(), value.into());
        self
    }
}

/// Block storage the block operations read and write.
pub trait World {
    /// The block at `pos`, or air.
    fn block(&self, pos: &BlockPos) -> BlockState;

    fn set_block(&mut self, pos: BlockPos, state: BlockState);

    /// Reset `pos` to air.
    fn clear_block(&mut self, pos: &BlockPos);
}

/// Sparse in-memory [`World`]. Unset positions are air.
#[derive(Debug, Clone, Default)]
pub struct GridWorld {
    blocks: BTreeMap<BlockPos, BlockState>,
}

impl GridWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of non-air blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }
}

impl World for GridWorld {
    fn block(&self, pos: &BlockPos) -> BlockState {
        self.blocks.get(pos).cloned().unwrap_or_else(BlockState::air)
    }

    fn set_block(&mut self, pos: BlockPos, state: BlockState) {
        if state.is_air() {
            self.blocks.remove(&pos);
        } else {
            self.blocks.insert(pos, state);
        }
    }

    fn clear_block(&mut self, pos: &BlockPos) {
        self.blocks.remove(pos);
    }
}
