//! # World Module
//!
//! This module provides the `World` struct which manages a collection of chunks.
//! It is the chunk container the mesher reads from: it owns every grid and lends
//! shared handles to mesh passes.
//!
//! ## Chunk Generation
//!
//! New chunks are filled according to the configured [`ChunkGenerationMethod`]:
//! - Perlin noise for natural-looking terrain
//! - Checkerboard pattern for testing
//! - Solid chunks (all blocks filled)
//! - Empty chunks (all blocks air)
//! - Sparse random blocks

use std::collections::HashMap;

use cgmath::{Point3, Vector3};

use crate::config::ChunkGenerationMethod;
use crate::core::MtResource;
use crate::engine_state::voxels::chunk::Chunk;

/// Fraction of air cells in randomly generated chunks.
const RANDOM_SPARSENESS: f64 = 0.9;

/// A sparse 3D grid of chunks.
///
/// Chunks are stored in thread-safe containers so a background mesh pass can
/// read one while the owner keeps a handle for edits.
pub struct World {
    chunks: HashMap<Point3<i32>, MtResource<Chunk>>,
    chunk_dimensions: Vector3<usize>,
    generation_method: ChunkGenerationMethod,
    seed: u32,
}

impl World {
    /// Creates a new, empty world.
    pub fn new(
        chunk_dimensions: Vector3<usize>,
        generation_method: ChunkGenerationMethod,
        seed: u32,
    ) -> Self {
        World {
            chunks: HashMap::new(),
            chunk_dimensions,
            generation_method,
            seed,
        }
    }

    /// Adds a new chunk at the specified chunk coordinates if one doesn't already exist.
    ///
    /// # Returns
    /// A handle to the chunk at `position`, freshly generated or pre-existing.
    pub fn add_chunk_at(&mut self, position: Point3<i32>) -> MtResource<Chunk> {
        if let Some(chunk) = self.chunks.get(&position) {
            return chunk.clone();
        }

        let dimensions = self.chunk_dimensions;
        let chunk = match self.generation_method {
            ChunkGenerationMethod::Perlin => Chunk::perlin(position, dimensions, self.seed),
            ChunkGenerationMethod::Checkerboard => Chunk::checkerboard(position, dimensions),
            ChunkGenerationMethod::Solid => Chunk::solid(position, dimensions),
            ChunkGenerationMethod::Empty => Chunk::empty(position, dimensions),
            ChunkGenerationMethod::Random => {
                Chunk::random(position, dimensions, RANDOM_SPARSENESS)
            }
        };

        self.insert_chunk(chunk)
    }

    /// Stores an externally built chunk at its own position, replacing any previous one.
    pub fn insert_chunk(&mut self, chunk: Chunk) -> MtResource<Chunk> {
        let position = chunk.position;
        let chunk = MtResource::new(chunk);
        self.chunks.insert(position, chunk.clone());
        chunk
    }

    /// Retrieves a handle to the chunk at the specified chunk coordinates.
    pub fn get_chunk_at(&self, position: Point3<i32>) -> Option<MtResource<Chunk>> {
        self.chunks.get(&position).cloned()
    }

    /// Positions of every loaded chunk, in no particular order.
    pub fn positions(&self) -> impl Iterator<Item = Point3<i32>> + '_ {
        self.chunks.keys().copied()
    }

    /// Number of loaded chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether no chunk is loaded.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::grid::VoxelGrid;

    #[test]
    fn add_chunk_at_is_idempotent() {
        let mut world = World::new(Vector3::new(4, 4, 4), ChunkGenerationMethod::Solid, 0);
        let first = world.add_chunk_at(Point3::new(0, 0, 0));
        first.get_mut().set_block(0, 0, 0, -1);

        let second = world.add_chunk_at(Point3::new(0, 0, 0));
        assert_eq!(world.len(), 1);
        assert_eq!(world.positions().collect::<Vec<_>>(), vec![Point3::new(0, 0, 0)]);
        assert!(!second.get().is_solid(0, 0, 0));
    }

    #[test]
    fn generated_chunk_uses_configured_size() {
        let mut world = World::new(Vector3::new(3, 5, 2), ChunkGenerationMethod::Empty, 0);
        let chunk = world.add_chunk_at(Point3::new(-1, 2, 0));
        assert_eq!(chunk.get().dimensions(), Vector3::new(3, 5, 2));
        assert_eq!(chunk.get().position, Point3::new(-1, 2, 0));
    }
}
