//! # Chunk Creation Module
//!
//! A builder that fills a chunk one cell at a time, keeping the block id
//! storage and the solidity bit vector in step.

use std::sync::atomic::AtomicBool;

use bitvec::vec::BitVec;
use cgmath::{Point3, Vector3};

use crate::engine_state::voxels::block::{is_solid_id, BlockId, AIR_BLOCK_ID};

use super::Chunk;

/// A builder for creating and populating chunks.
///
/// Cells are pushed in x-fastest, then y, then z order. Cells never pushed are
/// air when the chunk is returned.
pub struct ChunkCreationIterator {
    /// The position of the chunk being created
    position: Point3<i32>,
    /// Size of the chunk being created
    dimensions: Vector3<usize>,
    /// Block ids pushed so far
    blocks: Vec<BlockId>,
    /// One bit per pushed cell, set when solid
    solid_array: BitVec,
}

impl ChunkCreationIterator {
    /// Creates a new `ChunkCreationIterator` for building a chunk at the given position.
    pub fn new(position: Point3<i32>, dimensions: Vector3<usize>) -> Self {
        let volume = dimensions.x * dimensions.y * dimensions.z;
        ChunkCreationIterator {
            position,
            dimensions,
            blocks: Vec::with_capacity(volume),
            solid_array: BitVec::with_capacity(volume),
        }
    }

    fn volume(&self) -> usize {
        self.dimensions.x * self.dimensions.y * self.dimensions.z
    }

    /// Whether every cell of the chunk has been pushed.
    pub fn is_full(&self) -> bool {
        self.blocks.len() >= self.volume()
    }

    /// Adds a block at the current position and advances the position.
    ///
    /// Pushes past the end of the chunk are ignored.
    pub fn push_block_id(&mut self, block_id: BlockId) {
        if self.is_full() {
            return;
        }
        self.blocks.push(block_id);
        self.solid_array.push(is_solid_id(block_id));
    }

    /// Finalizes the chunk creation and returns the constructed `Chunk`.
    ///
    /// The returned chunk is flagged modified so its first mesh gets built.
    pub fn return_chunk(mut self) -> Chunk {
        while !self.is_full() {
            self.push_block_id(AIR_BLOCK_ID);
        }
        Chunk {
            position: self.position,
            dimensions: self.dimensions,
            blocks: self.blocks,
            solid_array: self.solid_array,
            modified: AtomicBool::new(true),
        }
    }
}
