//! # Chunk Module
//!
//! This module provides the `Chunk` struct, a dense reference implementation of
//! [`VoxelGrid`], with generators for the test and demo worlds.
//!
//! ## Storage
//!
//! - `blocks`: one `BlockId` per cell, x fastest, then y, then z
//! - `solid_array`: one bit per cell mirroring `is_solid_id(blocks[i])`
//!
//! The bit vector gives the exposure test an O(1) solidity check without
//! decoding block ids.

use std::sync::atomic::{AtomicBool, Ordering};

use bitvec::prelude::BitVec;
use cgmath::{Point3, Vector3};
use noise::{NoiseFn, Perlin};

use super::block::{block_type::BlockType, is_solid_id, BlockId, AIR_BLOCK_ID};
use super::grid::VoxelGrid;

mod chunk_creation;

pub use chunk_creation::ChunkCreationIterator;

/// Threshold above which Perlin noise is considered solid for terrain generation.
pub const PERLIN_POSITIVE_THRESHOLD: f64 = 0.2;
/// Threshold below which Perlin noise is considered solid for terrain generation.
pub const PERLIN_NEGATIVE_THRESHOLD: f64 = -0.2;
/// Scaling factor applied to world coordinates when sampling Perlin noise.
pub const PERLIN_SCALE_FACTOR: f64 = 0.02;

/// A fixed-size box of voxels treated as one meshing unit.
pub struct Chunk {
    /// The position of this chunk in chunk coordinates (not block coordinates).
    pub position: Point3<i32>,

    /// Width, height and depth in blocks.
    dimensions: Vector3<usize>,

    /// Block id of every cell in x, then y, then z order.
    blocks: Vec<BlockId>,

    /// A bit per cell, set when the cell is solid.
    solid_array: BitVec,

    /// Grid-level dirty bit, set on every edit and on creation.
    modified: AtomicBool,
}

impl Chunk {
    /// Creates a chunk of the given size filled with air.
    pub fn new(position: Point3<i32>, dimensions: Vector3<usize>) -> Self {
        ChunkCreationIterator::new(position, dimensions).return_chunk()
    }

    /// Creates a new, completely empty chunk (all blocks are air).
    pub fn empty(position: Point3<i32>, dimensions: Vector3<usize>) -> Self {
        Self::new(position, dimensions)
    }

    /// Creates a new chunk filled with solid dirt blocks.
    pub fn solid(position: Point3<i32>, dimensions: Vector3<usize>) -> Self {
        let mut cci = ChunkCreationIterator::new(position, dimensions);
        while !cci.is_full() {
            cci.push_block_id(BlockType::DIRT.id());
        }
        cci.return_chunk()
    }

    /// Creates a chunk with a 3D checkerboard pattern.
    ///
    /// A cell is solid when `x + y + z` is even.
    pub fn checkerboard(position: Point3<i32>, dimensions: Vector3<usize>) -> Self {
        let mut cci = ChunkCreationIterator::new(position, dimensions);
        for k in 0..dimensions.z {
            for j in 0..dimensions.y {
                for i in 0..dimensions.x {
                    if (i + j + k) % 2 == 0 {
                        cci.push_block_id(BlockType::DIRT.id());
                    } else {
                        cci.push_block_id(AIR_BLOCK_ID);
                    }
                }
            }
        }
        cci.return_chunk()
    }

    /// Creates a chunk with randomly placed dirt blocks.
    ///
    /// # Arguments
    /// * `sparseness` - Probability that any given cell is air
    pub fn random(position: Point3<i32>, dimensions: Vector3<usize>, sparseness: f64) -> Self {
        let mut cci = ChunkCreationIterator::new(position, dimensions);
        while !cci.is_full() {
            if fastrand::f64() < sparseness {
                cci.push_block_id(AIR_BLOCK_ID);
            } else {
                cci.push_block_id(BlockType::DIRT.id());
            }
        }
        cci.return_chunk()
    }

    /// Generates a chunk using Perlin noise for natural-looking terrain.
    ///
    /// Noise is sampled in world space, so neighboring chunks line up. Cells
    /// whose sample falls outside the `[NEGATIVE, POSITIVE]` threshold band are
    /// solid and get a random built-in block type.
    pub fn perlin(position: Point3<i32>, dimensions: Vector3<usize>, seed: u32) -> Self {
        let perlin = Perlin::new(seed);
        let mut cci = ChunkCreationIterator::new(position, dimensions);

        for k in 0..dimensions.z {
            for j in 0..dimensions.y {
                for i in 0..dimensions.x {
                    let world = [
                        (i as i64 + dimensions.x as i64 * position.x as i64) as f64,
                        (j as i64 + dimensions.y as i64 * position.y as i64) as f64,
                        (k as i64 + dimensions.z as i64 * position.z as i64) as f64,
                    ];
                    let sample = perlin.get(world.map(|c| c * PERLIN_SCALE_FACTOR));
                    if !(PERLIN_NEGATIVE_THRESHOLD..=PERLIN_POSITIVE_THRESHOLD).contains(&sample)
                    {
                        cci.push_block_id(BlockType::random().id());
                    } else {
                        cci.push_block_id(AIR_BLOCK_ID);
                    }
                }
            }
        }

        cci.return_chunk()
    }

    /// Number of cells in the chunk.
    pub fn volume(&self) -> usize {
        self.blocks.len()
    }

    /// Number of solid cells in the chunk.
    pub fn solid_count(&self) -> usize {
        self.solid_array.count_ones()
    }

    fn offset(&self, x: usize, y: usize, z: usize) -> Option<usize> {
        let d = self.dimensions;
        if x < d.x && y < d.y && z < d.z {
            Some(x + d.x * (y + d.y * z))
        } else {
            None
        }
    }

    /// Checks if the block at the specified chunk-relative coordinates is solid.
    ///
    /// # Returns
    /// `true` if the block is solid, `false` if it's air or out of bounds.
    pub fn is_block_solid(&self, x: usize, y: usize, z: usize) -> bool {
        self.offset(x, y, z)
            .is_some_and(|offset| self.solid_array[offset])
    }

    /// Replaces the block at `(x, y, z)` and flags the chunk as modified.
    ///
    /// # Returns
    /// `false` (and no change) when the coordinates are out of bounds.
    pub fn set_block(&mut self, x: usize, y: usize, z: usize, block_id: BlockId) -> bool {
        let Some(offset) = self.offset(x, y, z) else {
            return false;
        };
        self.blocks[offset] = block_id;
        self.solid_array.set(offset, is_solid_id(block_id));
        self.modified.store(true, Ordering::Release);
        true
    }
}

impl VoxelGrid for Chunk {
    fn dimensions(&self) -> Vector3<usize> {
        self.dimensions
    }

    fn voxel_at(&self, x: usize, y: usize, z: usize) -> Option<BlockId> {
        self.offset(x, y, z).map(|offset| self.blocks[offset])
    }

    fn is_modified(&self) -> bool {
        self.modified.load(Ordering::Acquire)
    }

    fn take_modified(&self) -> bool {
        self.modified.swap(false, Ordering::AcqRel)
    }

    fn is_solid(&self, x: usize, y: usize, z: usize) -> bool {
        self.is_block_solid(x, y, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(x: usize, y: usize, z: usize) -> Vector3<usize> {
        Vector3::new(x, y, z)
    }

    #[test]
    fn new_chunk_is_air_and_modified() {
        let chunk = Chunk::new(Point3::new(0, 0, 0), dims(2, 3, 4));
        assert_eq!(chunk.volume(), 24);
        assert_eq!(chunk.solid_count(), 0);
        assert_eq!(chunk.voxel_at(1, 2, 3), Some(AIR_BLOCK_ID));
        assert!(chunk.is_modified());
    }

    #[test]
    fn out_of_bounds_reads_are_absent() {
        let chunk = Chunk::solid(Point3::new(0, 0, 0), dims(2, 2, 2));
        assert_eq!(chunk.voxel_at(2, 0, 0), None);
        assert!(!chunk.is_block_solid(0, 5, 0));
    }

    #[test]
    fn set_block_updates_solidity_and_modified_bit() {
        let mut chunk = Chunk::new(Point3::new(0, 0, 0), dims(3, 3, 3));
        assert!(chunk.take_modified());
        assert!(!chunk.is_modified());

        assert!(chunk.set_block(1, 1, 1, BlockType::WOOD.id()));
        assert!(chunk.is_block_solid(1, 1, 1));
        assert!(chunk.is_modified());

        assert!(chunk.set_block(1, 1, 1, AIR_BLOCK_ID));
        assert!(!chunk.is_block_solid(1, 1, 1));
    }

    #[test]
    fn set_block_out_of_bounds_is_rejected() {
        let mut chunk = Chunk::new(Point3::new(0, 0, 0), dims(1, 1, 1));
        chunk.take_modified();
        assert!(!chunk.set_block(1, 0, 0, 0));
        assert!(!chunk.is_modified());
    }

    #[test]
    fn checkerboard_alternates() {
        let chunk = Chunk::checkerboard(Point3::new(0, 0, 0), dims(4, 4, 4));
        assert!(chunk.is_block_solid(0, 0, 0));
        assert!(!chunk.is_block_solid(1, 0, 0));
        assert!(chunk.is_block_solid(1, 1, 0));
        assert_eq!(chunk.solid_count(), 32);
    }

    #[test]
    fn perlin_only_places_known_types() {
        let chunk = Chunk::perlin(Point3::new(1, -1, 0), dims(8, 8, 8), 7);
        for z in 0..8 {
            for y in 0..8 {
                for x in 0..8 {
                    let id = chunk.voxel_at(x, y, z).unwrap();
                    assert!(id == AIR_BLOCK_ID || BlockType::from_id(id).is_some());
                }
            }
        }
    }
}
