//! Mesh generation for voxel chunks.
//!
//! This module converts voxel data into plain triangle buffers plus a lookup
//! table from emitted triangles back to the voxels that produced them.
//!
//! # Architecture
//! - [`FACE_TABLE`]: Constant corner offsets, indices and debug colors per cube face
//! - [`MeshBuilder`]: Scans a grid and emits one quad per exposed face
//! - [`GeneratedMesh`]: The immutable snapshot a pass produces
//! - [`TriangleLookup`]: Per-index voxel table used for picking
//!
//! # Usage
//! ```
//! use cgmath::{Point3, Vector3};
//! use voxel_mesher::{BlockRegistry, Chunk, MeshBuilder, TextureAtlas};
//!
//! let registry = BlockRegistry::with_default_blocks(TextureAtlas::new(4));
//! let chunk = Chunk::solid(Point3::new(0, 0, 0), Vector3::new(1, 1, 1));
//! let mesh = MeshBuilder::new(&registry).build(&chunk).unwrap();
//! assert_eq!(mesh.vertices.len(), 24);
//! assert_eq!(mesh.resolve_voxel_for_triangle(11).unwrap(), Point3::new(0, 0, 0));
//! ```

mod builder;
mod face;
mod mesh;

pub use builder::{face_is_exposed, MeshBuilder};
pub use face::{Color, FaceDefinition, FACE_TABLE};
pub use mesh::*;
