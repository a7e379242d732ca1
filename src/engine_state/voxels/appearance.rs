//! # Block Appearance
//!
//! Maps block ids to per-face texture coordinates. The mesher consumes this
//! through [`AppearanceProvider`]; how tiles were packed into the atlas is not
//! its concern.
//!
//! [`BlockRegistry`] is the provider used by the engine. It is filled from the
//! built-in tile table and can be extended at runtime; every change bumps its
//! revision so a chunk that failed on an unknown id knows when to try again.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use cgmath::Vector2;
use log::debug;

use crate::core::MtResource;
use crate::error::{MeshingError, Result};

use super::block::{block_side::BlockSide, block_type::BlockType, BlockId};

/// Texture coordinates for the four corners of every face of one block type.
///
/// Indexed by `BlockSide`; the corner order matches the face table's corner order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockAppearance {
    /// Four UVs per face, in `BlockSide` order.
    pub faces: [[Vector2<f32>; 4]; 6],
}

impl BlockAppearance {
    /// Uses the same four UVs on every face.
    pub fn uniform(uvs: [Vector2<f32>; 4]) -> Self {
        BlockAppearance { faces: [uvs; 6] }
    }

    /// Builds an appearance from one atlas tile per face.
    ///
    /// # Arguments
    /// * `atlas` - The atlas the tiles live in
    /// * `tiles` - Tile index per face, in `BlockSide` order
    pub fn from_tiles(atlas: &TextureAtlas, tiles: [u32; 6]) -> Self {
        BlockAppearance {
            faces: tiles.map(|tile| atlas.tile_uvs(tile)),
        }
    }

    /// The four UVs of one face.
    #[inline]
    pub fn face(&self, side: BlockSide) -> &[Vector2<f32>; 4] {
        &self.faces[side.index()]
    }
}

/// Supplies texture coordinates for block ids.
pub trait AppearanceProvider: Send + Sync {
    /// Looks up the appearance of `block_id`.
    ///
    /// # Errors
    /// `MeshingError::UnregisteredBlock` when the id is unknown.
    fn appearance_for(&self, block_id: BlockId) -> Result<BlockAppearance>;

    /// A counter that changes whenever the set of known appearances changes.
    fn revision(&self) -> u64 {
        0
    }
}

/// A square texture atlas split into equal tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureAtlas {
    /// Number of tiles per row (and per column).
    pub tiles_per_row: u32,
}

impl TextureAtlas {
    /// Creates an atlas with `tiles_per_row` x `tiles_per_row` tiles.
    pub fn new(tiles_per_row: u32) -> Self {
        TextureAtlas {
            tiles_per_row: tiles_per_row.max(1),
        }
    }

    /// UVs of a tile's corners, ordered lower-start, upper-start, upper-end, lower-end.
    ///
    /// Tiles are numbered row by row from the top-left; `v` grows downward.
    pub fn tile_uvs(&self, tile: u32) -> [Vector2<f32>; 4] {
        let size = 1.0 / self.tiles_per_row as f32;
        let u0 = (tile % self.tiles_per_row) as f32 * size;
        let v0 = (tile / self.tiles_per_row) as f32 * size;
        let (u1, v1) = (u0 + size, v0 + size);
        [
            Vector2::new(u0, v1),
            Vector2::new(u0, v0),
            Vector2::new(u1, v0),
            Vector2::new(u1, v1),
        ]
    }
}

/// Runtime registry of block appearances.
pub struct BlockRegistry {
    appearances: MtResource<HashMap<BlockId, BlockAppearance>>,
    revision: AtomicU64,
}

impl BlockRegistry {
    /// Creates a registry with no blocks.
    pub fn new() -> Self {
        BlockRegistry {
            appearances: MtResource::new(HashMap::new()),
            revision: AtomicU64::new(0),
        }
    }

    /// Creates a registry holding every built-in `BlockType`.
    pub fn with_default_blocks(atlas: TextureAtlas) -> Self {
        let registry = Self::new();
        for block_type in BlockType::all() {
            registry.register(
                block_type.id(),
                BlockAppearance::from_tiles(&atlas, block_type.texture_indices()),
            );
        }
        registry
    }

    /// Adds or replaces the appearance of `block_id` and bumps the revision.
    pub fn register(&self, block_id: BlockId, appearance: BlockAppearance) {
        self.appearances.get_mut().insert(block_id, appearance);
        let revision = self.revision.fetch_add(1, Ordering::AcqRel) + 1;
        debug!("Registered block {} (registry revision {})", block_id, revision);
    }

    /// Whether `block_id` has an appearance.
    pub fn contains(&self, block_id: BlockId) -> bool {
        self.appearances.get().contains_key(&block_id)
    }

    /// Number of registered blocks.
    pub fn len(&self) -> usize {
        self.appearances.get().len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.appearances.get().is_empty()
    }
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AppearanceProvider for BlockRegistry {
    fn appearance_for(&self, block_id: BlockId) -> Result<BlockAppearance> {
        self.appearances
            .get()
            .get(&block_id)
            .copied()
            .ok_or(MeshingError::UnregisteredBlock { block_id })
    }

    fn revision(&self) -> u64 {
        self.revision.load(Ordering::Acquire)
    }
}
