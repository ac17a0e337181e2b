//! Shared types used throughout the library.

mod direction;
mod location;
mod transform;

pub use direction::{Axis, Direction};
pub use location::{ResourceLocation, LOCAL_MARKER};
pub(crate) use location::split_location;
pub use transform::{BlockTransform, ElementRotation};

use std::collections::HashMap;

/// Tag on model faces selecting a paint/override channel.
pub type TintIndex = u32;

/// A block position in 3D space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockPosition {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPosition {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Get the neighboring position in the given direction.
    pub fn neighbor(&self, direction: Direction) -> Self {
        let (dx, dy, dz) = direction.offset();
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }
}

/// A block state: block name plus its properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockState {
    /// Block name, e.g., "minecraft:stone"
    pub name: String,
    /// Block properties, e.g., {"axis": "y"}
    pub properties: HashMap<String, String>,
}

impl BlockState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: HashMap::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// The block identity, ignoring properties.
    pub fn block(&self) -> ResourceLocation {
        ResourceLocation::parse(&self.name)
    }

    /// Whether both states belong to the same block, regardless of properties.
    pub fn same_block(&self, other: &BlockState) -> bool {
        self.block() == other.block()
    }

    /// Check if this is an air block.
    pub fn is_air(&self) -> bool {
        matches!(
            self.name.as_str(),
            "minecraft:air" | "minecraft:cave_air" | "minecraft:void_air" | "air"
        )
    }
}

/// Read-only world access used for neighbor queries.
pub trait BlockReader {
    /// Get the block state at a position, if any.
    fn block_state(&self, pos: BlockPosition) -> Option<&BlockState>;
}

impl BlockReader for HashMap<BlockPosition, BlockState> {
    fn block_state(&self, pos: BlockPosition) -> Option<&BlockState> {
        self.get(&pos).filter(|state| !state.is_air())
    }
}
