//! Mesh side of the voxel engine.
//!
//! This module turns voxel grids into plain mesh buffers and schedules that work
//! off the consuming thread. Drawing and collision are left to whoever drains
//! the meshes.
//!
//! # Modules
//! - `meshing`: Mesh data, the face-culling builder and the per-chunk scheduler
//! - `tasks`: Background task wrapping one mesh pass
//! - `Vertex`: Interleaved upload layout

pub mod meshing;
pub mod tasks;
mod vertex;

// Re-export commonly used types
pub use meshing::{ChunkMeshScheduler, GeneratedMesh, MeshBuilder, MeshingState, TriangleLookup};
pub use vertex::Vertex;
