//! # Voxel Data
//!
//! The voxel side of the mesher: what a grid is, what a block is, and how a
//! block looks.
//!
//! ## Architecture
//!
//! * **Block**: Block ids, built-in block types and the six block faces
//! * **Grid**: The read-only [`grid::VoxelGrid`] boundary a mesh pass scans
//! * **Chunk**: A dense grid implementation with test and demo generators
//! * **World**: The chunk container that owns every grid
//! * **Appearance**: Block id to per-face texture coordinates
//!
//! ## Thread Safety
//!
//! * Grids are shared with mesh passes behind `MtResource` read guards
//! * The block registry can be extended while passes read it

pub mod appearance;
pub mod block;
pub mod chunk;
pub mod grid;
pub mod world;
