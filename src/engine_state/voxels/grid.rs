//! # Voxel Grid Interface
//!
//! The read-only view a mesh pass needs of a chunk's voxel storage. Storage,
//! allocation and editing belong to the implementor; the mesher only reads.

use cgmath::Vector3;

use super::block::{is_solid_id, BlockId};

/// A bounded 3D grid of voxels, readable from a background thread.
///
/// Implementors must not resize or free their storage while a pass holds a
/// read guard on them.
pub trait VoxelGrid: Send + Sync {
    /// Width, height and depth of the grid. Any component may be zero.
    fn dimensions(&self) -> Vector3<usize>;

    /// The block id at `(x, y, z)`.
    ///
    /// # Returns
    /// `None` when the cell is outside `[0, width) x [0, height) x [0, depth)` or
    /// holds no voxel. A returned negative id also denotes an empty cell.
    fn voxel_at(&self, x: usize, y: usize, z: usize) -> Option<BlockId>;

    /// Whether the grid has been edited since the last `take_modified`.
    fn is_modified(&self) -> bool {
        false
    }

    /// Clears the grid-level modified bit, returning its previous value.
    fn take_modified(&self) -> bool {
        false
    }

    /// Whether `(x, y, z)` holds a solid voxel.
    fn is_solid(&self, x: usize, y: usize, z: usize) -> bool {
        self.voxel_at(x, y, z).is_some_and(is_solid_id)
    }
}
