//! # Block Module
//!
//! Block ids, the built-in block types, and block face handling.

use block_type::BlockType;

pub mod block_side;
pub mod block_type;

/// The integer id stored per voxel. Non-negative ids are solid, negative ids are empty.
pub type BlockId = i32;

/// The id used for empty (air) cells.
pub const AIR_BLOCK_ID: BlockId = -1;

/// Returns whether a block id denotes a present, solid voxel.
#[inline]
pub fn is_solid_id(block_id: BlockId) -> bool {
    block_id >= 0
}

/// Maps each built-in block type to the atlas tile used on each face.
///
/// The outer array is indexed by `BlockType` id.
/// The inner array holds 6 tile indices in `BlockSide` order:
/// [Front, Back, Bottom, Top, Left, Right]
pub static BLOCK_TYPE_TO_TEXTURE_INDICES: [[u32; 6]; 4] = [
    [1, 1, 1, 1, 1, 1], // DIRT (all sides use tile 1)
    [2, 2, 1, 3, 2, 2], // GRASS (top: 3, bottom: 1, sides: 2)
    [0, 0, 0, 0, 0, 0], // WOOD (all sides use tile 0)
    [4, 4, 4, 4, 4, 4], // WHITE (all sides use tile 4)
];

impl BlockType {
    /// Gets the atlas tile indices for all faces of this block type.
    pub fn texture_indices(self) -> [u32; 6] {
        BLOCK_TYPE_TO_TEXTURE_INDICES[self as usize]
    }
}
