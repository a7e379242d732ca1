//! # Mesher Error Types
//!
//! All errors that can occur while generating, handing off, or querying chunk meshes.
//! None of them are fatal to the process: each one is scoped to a single chunk's
//! generation attempt or a single query.

use cgmath::Point3;
use thiserror::Error;

use crate::engine_state::voxels::block::BlockId;

/// Errors produced by the voxel mesher.
#[derive(Error, Debug)]
pub enum MeshingError {
    /// The appearance provider has no entry for a block id found in the grid.
    ///
    /// This is a configuration error of the collaborator; the pass that hit it
    /// is aborted without producing a snapshot.
    #[error("no appearance registered for block id {block_id}")]
    UnregisteredBlock {
        /// The block id that could not be resolved.
        block_id: BlockId,
    },

    /// A triangle index outside the last consumed mesh was queried.
    #[error("no such triangle: {triangle} (mesh has {triangle_count} triangles)")]
    NoSuchTriangle {
        /// The triangle that was requested.
        triangle: usize,
        /// Number of triangles in the mesh that was queried.
        triangle_count: usize,
    },

    /// A pass emitted more vertices than a `u32` index can address.
    #[error("mesh too large for u32 indices at {vertices} vertices")]
    MeshTooLarge {
        /// Vertex count reached when the pass was aborted.
        vertices: usize,
    },

    /// A grid or appearance provider panicked during a pass.
    #[error("mesh pass panicked: {0}")]
    PassPanicked(String),

    /// No chunk is loaded at the requested position.
    #[error("no chunk loaded at {0:?}")]
    UnknownChunk(Point3<i32>),

    /// The configuration file could not be read.
    #[error("could not read configuration: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// The configuration file is not valid JSON for `MesherConfig`.
    #[error("could not parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// The configuration parsed but holds unusable values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MeshingError>;
