//! # Block Type Module
//!
//! The block types the mesher ships appearance data for.
//! Grids may hold any non-negative id; only ids known to the appearance
//! provider can be meshed.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use super::BlockId;

/// Enumerates the built-in block types.
///
/// The discriminant is the block id stored in the grid. Air is not a variant:
/// empty cells carry a negative id instead.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// A basic dirt block, used as a common building material.
    DIRT = 0,

    /// A grass block with different textures on top and sides.
    /// The top is green, sides have grass on dirt, and bottom is plain dirt.
    GRASS = 1,

    /// A wooden block with a bark texture on all sides.
    WOOD = 2,

    /// A plain white block, often used for testing.
    WHITE = 3,
}

impl BlockType {
    /// Every built-in block type, in id order.
    pub fn all() -> [BlockType; 4] {
        [
            BlockType::DIRT,
            BlockType::GRASS,
            BlockType::WOOD,
            BlockType::WHITE,
        ]
    }

    /// Converts a stored block id to a `BlockType`.
    ///
    /// # Returns
    /// `None` for negative (air) ids and for ids with no built-in type.
    pub fn from_id(block_id: BlockId) -> Option<Self> {
        <Self as FromPrimitive>::from_i32(block_id)
    }

    /// The id stored in the grid for this type.
    pub fn id(self) -> BlockId {
        self as BlockId
    }

    /// Picks a random built-in block type.
    ///
    /// Used for procedural test and demo grids.
    pub fn random() -> Self {
        let all = Self::all();
        all[fastrand::usize(..all.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_from_id() {
        for block_type in BlockType::all() {
            assert_eq!(BlockType::from_id(block_type.id()), Some(block_type));
        }
    }

    #[test]
    fn air_and_unknown_ids_have_no_type() {
        assert_eq!(BlockType::from_id(-1), None);
        assert_eq!(BlockType::from_id(42), None);
    }
}
