use crate::engine_state::voxels::block::block_side::BlockSide;

/// An RGBA color with components in `0.0..=1.0`.
pub type Color = [f32; 4];

/// Static geometry for one cube face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceDefinition {
    /// The side this face belongs to
    pub side: BlockSide,
    /// Corner offsets from the voxel's minimum corner, counter-clockwise seen from outside
    pub corners: [[f32; 3]; 4],
    /// Two triangles over `corners`
    pub indices: [u32; 6],
    /// Flat debug color shared by every vertex of this face
    pub debug_color: Color,
}

impl FaceDefinition {
    /// The face definition for `side`.
    #[inline]
    pub fn for_side(side: BlockSide) -> &'static FaceDefinition {
        &FACE_TABLE[side.index()]
    }
}

const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

/// Geometry for every cube face, indexed by `BlockSide`.
pub const FACE_TABLE: [FaceDefinition; 6] = [
    FaceDefinition {
        side: BlockSide::FRONT,
        corners: [
            [1.0, 0.0, 1.0],
            [1.0, 1.0, 1.0],
            [0.0, 1.0, 1.0],
            [0.0, 0.0, 1.0],
        ],
        indices: QUAD_INDICES,
        debug_color: [0.0, 0.0, 1.0, 1.0],
    },
    FaceDefinition {
        side: BlockSide::BACK,
        corners: [
            [0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [1.0, 1.0, 0.0],
            [1.0, 0.0, 0.0],
        ],
        indices: QUAD_INDICES,
        debug_color: [1.0, 1.0, 0.0, 1.0],
    },
    FaceDefinition {
        side: BlockSide::BOTTOM,
        corners: [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 0.0, 1.0],
            [0.0, 0.0, 1.0],
        ],
        indices: QUAD_INDICES,
        debug_color: [1.0, 0.0, 1.0, 1.0],
    },
    FaceDefinition {
        side: BlockSide::TOP,
        corners: [
            [0.0, 1.0, 0.0],
            [0.0, 1.0, 1.0],
            [1.0, 1.0, 1.0],
            [1.0, 1.0, 0.0],
        ],
        indices: QUAD_INDICES,
        debug_color: [0.0, 1.0, 0.0, 1.0],
    },
    FaceDefinition {
        side: BlockSide::LEFT,
        corners: [
            [0.0, 0.0, 1.0],
            [0.0, 1.0, 1.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0],
        ],
        indices: QUAD_INDICES,
        debug_color: [1.0, 0.0, 0.0, 1.0],
    },
    FaceDefinition {
        side: BlockSide::RIGHT,
        corners: [
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [1.0, 1.0, 1.0],
            [1.0, 0.0, 1.0],
        ],
        indices: QUAD_INDICES,
        debug_color: [0.0, 1.0, 1.0, 1.0],
    },
];
