//! Generated mesh snapshots and the triangle-to-voxel lookup table.

use std::sync::Arc;

use cgmath::{Point3, Vector2};

use crate::engine_state::rendering::Vertex;
use crate::error::{MeshingError, Result};

use super::face::Color;

/// Number of vertices every exposed face contributes.
pub const VERTICES_PER_FACE: usize = 4;
/// Number of indices every exposed face contributes.
pub const INDICES_PER_FACE: usize = 6;

/// Maps every index slot of a mesh back to the voxel that emitted it.
///
/// The table is keyed per index, not per triangle: entry `k` is the voxel that
/// produced `indices[k]`. Triangle `t` resolves through entry `t * 3`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriangleLookup {
    voxels: Vec<Point3<usize>>,
}

impl TriangleLookup {
    /// Creates an empty table with room for `capacity` index slots.
    pub fn with_capacity(capacity: usize) -> Self {
        TriangleLookup {
            voxels: Vec::with_capacity(capacity),
        }
    }

    /// Appends `count` slots that all map to `voxel`.
    pub(crate) fn push_repeated(&mut self, voxel: Point3<usize>, count: usize) {
        self.voxels
            .extend(std::iter::repeat(voxel).take(count));
    }

    /// The voxel behind index slot `index`.
    pub fn get(&self, index: usize) -> Option<Point3<usize>> {
        self.voxels.get(index).copied()
    }

    /// Number of index slots in the table.
    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    /// Whether the table holds no slots.
    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    /// Number of triangles the table covers.
    pub fn triangle_count(&self) -> usize {
        self.voxels.len() / 3
    }

    /// Iterates `(index slot, voxel)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Point3<usize>)> + '_ {
        self.voxels.iter().copied().enumerate()
    }

    /// Resolves a triangle (one per emitted triangle, not per index) to its voxel.
    ///
    /// # Errors
    /// `MeshingError::NoSuchTriangle` if `triangle * 3` is outside the table.
    pub fn resolve_triangle(&self, triangle: usize) -> Result<Point3<usize>> {
        triangle
            .checked_mul(3)
            .and_then(|index| self.get(index))
            .ok_or(MeshingError::NoSuchTriangle {
                triangle,
                triangle_count: self.triangle_count(),
            })
    }
}

/// Element counts of a generated mesh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeshStats {
    /// Number of vertices
    pub vertices: usize,
    /// Number of indices
    pub indices: usize,
    /// Number of exposed faces (quads)
    pub faces: usize,
    /// Number of triangles
    pub triangles: usize,
}

/// One complete, immutable output of a generation pass.
///
/// `colors[i]` and `uvs[i]` belong to `vertices[i]`. Every exposed face
/// contributes 4 vertices and 6 indices.
#[derive(Debug, Clone, Default)]
pub struct GeneratedMesh {
    /// Chunk-local vertex positions
    pub vertices: Vec<Point3<f32>>,
    /// Triangle list indexing into `vertices`
    pub indices: Vec<u32>,
    /// One color per vertex
    pub colors: Vec<Color>,
    /// One texture coordinate per vertex
    pub uvs: Vec<Vector2<f32>>,
    /// Per-index voxel lookup, shared with the scheduler for picking queries
    pub triangle_lookup: Arc<TriangleLookup>,
}

impl GeneratedMesh {
    /// Number of exposed faces in the mesh.
    pub fn face_count(&self) -> usize {
        self.indices.len() / INDICES_PER_FACE
    }

    /// Number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Whether the mesh has no geometry.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Element counts of the mesh.
    pub fn stats(&self) -> MeshStats {
        MeshStats {
            vertices: self.vertices.len(),
            indices: self.indices.len(),
            faces: self.face_count(),
            triangles: self.triangle_count(),
        }
    }

    /// Resolves a hit triangle to the voxel that produced it.
    pub fn resolve_voxel_for_triangle(&self, triangle: usize) -> Result<Point3<usize>> {
        self.triangle_lookup.resolve_triangle(triangle)
    }

    /// Packs positions, colors and UVs into one interleaved vertex buffer.
    pub fn interleaved(&self) -> Vec<Vertex> {
        self.vertices
            .iter()
            .zip(&self.colors)
            .zip(&self.uvs)
            .map(|((position, color), uv)| Vertex {
                position: [position.x, position.y, position.z],
                color: *color,
                tex_coords: [uv.x, uv.y],
            })
            .collect()
    }
}
