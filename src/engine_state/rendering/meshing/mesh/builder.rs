//! Face-culled mesh generation.
//!
//! Every solid voxel is tested against its six neighbors; each face that borders
//! empty space or the grid boundary becomes one unmerged quad. The pass reads the
//! whole grid before the snapshot is handed back, and an appearance lookup
//! failure aborts it with no snapshot.

use std::sync::Arc;

use cgmath::{Point3, Vector2};
use log::debug;
use web_time::Instant;

use crate::engine_state::voxels::{
    appearance::AppearanceProvider,
    block::{block_side::BlockSide, is_solid_id},
    grid::VoxelGrid,
};
use crate::error::{MeshingError, Result};

use super::{
    face::FaceDefinition,
    mesh::{GeneratedMesh, TriangleLookup, INDICES_PER_FACE, VERTICES_PER_FACE},
};

/// Whether `side` of the voxel at `voxel` is visible.
///
/// A face is exposed when its neighbor lies outside the grid, is absent, or
/// holds a negative (empty) block id.
pub fn face_is_exposed<G: VoxelGrid + ?Sized>(
    grid: &G,
    voxel: Point3<usize>,
    side: BlockSide,
) -> bool {
    let normal = side.normal();
    let neighbor = (
        voxel.x.checked_add_signed(normal.x as isize),
        voxel.y.checked_add_signed(normal.y as isize),
        voxel.z.checked_add_signed(normal.z as isize),
    );
    match neighbor {
        (Some(x), Some(y), Some(z)) => !grid.is_solid(x, y, z),
        _ => true,
    }
}

/// First index of a quad appended after `vertex_count` vertices.
///
/// Fails when the quad's last vertex would not be addressable by a `u32` index.
fn face_index_base(vertex_count: usize) -> Result<u32> {
    vertex_count
        .checked_add(VERTICES_PER_FACE - 1)
        .and_then(|last| u32::try_from(last).ok())
        .map(|_| vertex_count as u32)
        .ok_or(MeshingError::MeshTooLarge {
            vertices: vertex_count,
        })
}

/// Growing output buffers of one pass.
struct FaceBuffers {
    vertices: Vec<Point3<f32>>,
    indices: Vec<u32>,
    colors: Vec<[f32; 4]>,
    uvs: Vec<Vector2<f32>>,
    lookup: TriangleLookup,
}

impl FaceBuffers {
    fn new() -> Self {
        FaceBuffers {
            vertices: Vec::new(),
            indices: Vec::new(),
            colors: Vec::new(),
            uvs: Vec::new(),
            lookup: TriangleLookup::default(),
        }
    }

    /// Appends one quad for `side` of the voxel at `voxel`.
    ///
    /// Indices are offset by the running vertex count; all six index slots map
    /// to `voxel` in the lookup table.
    ///
    /// # Errors
    /// `MeshingError::MeshTooLarge` if the quad's indices would not fit in `u32`.
    fn emit_face(
        &mut self,
        voxel: Point3<usize>,
        side: BlockSide,
        uvs: &[Vector2<f32>; 4],
    ) -> Result<()> {
        let face = FaceDefinition::for_side(side);
        let base = face_index_base(self.vertices.len())?;
        let origin = voxel.cast::<f32>().unwrap_or_else(|| Point3::new(0.0, 0.0, 0.0));

        for corner in &face.corners {
            self.vertices.push(Point3::new(
                origin.x + corner[0],
                origin.y + corner[1],
                origin.z + corner[2],
            ));
        }
        self.indices.extend(face.indices.iter().map(|index| base + index));
        self.colors
            .extend(std::iter::repeat(face.debug_color).take(VERTICES_PER_FACE));
        self.uvs.extend_from_slice(uvs);
        self.lookup.push_repeated(voxel, INDICES_PER_FACE);
        Ok(())
    }

    fn finish(self) -> GeneratedMesh {
        GeneratedMesh {
            vertices: self.vertices,
            indices: self.indices,
            colors: self.colors,
            uvs: self.uvs,
            triangle_lookup: Arc::new(self.lookup),
        }
    }
}

/// Builds one [`GeneratedMesh`] per call from a voxel grid.
pub struct MeshBuilder<'a> {
    appearance: &'a dyn AppearanceProvider,
}

impl<'a> MeshBuilder<'a> {
    /// Creates a builder that takes texture coordinates from `appearance`.
    pub fn new(appearance: &'a dyn AppearanceProvider) -> Self {
        MeshBuilder { appearance }
    }

    /// Scans `grid` once and emits a quad for every exposed face.
    ///
    /// Cells are visited x fastest, then y, then z.
    ///
    /// # Errors
    /// Propagates the appearance provider's error for the first solid voxel with
    /// an exposed face whose block id is unregistered. No partial mesh is returned.
    pub fn build<G: VoxelGrid + ?Sized>(&self, grid: &G) -> Result<GeneratedMesh> {
        let start = Instant::now();
        let dimensions = grid.dimensions();
        let mut buffers = FaceBuffers::new();

        for z in 0..dimensions.z {
            for y in 0..dimensions.y {
                for x in 0..dimensions.x {
                    let Some(block_id) = grid.voxel_at(x, y, z).filter(|id| is_solid_id(*id))
                    else {
                        continue;
                    };
                    let voxel = Point3::new(x, y, z);

                    let mut exposed = BlockSide::all()
                        .into_iter()
                        .filter(|side| face_is_exposed(grid, voxel, *side))
                        .peekable();
                    if exposed.peek().is_none() {
                        continue;
                    }

                    let appearance = self.appearance.appearance_for(block_id)?;
                    for side in exposed {
                        buffers.emit_face(voxel, side, appearance.face(side))?;
                    }
                }
            }
        }

        let mesh = buffers.finish();
        debug!(
            "Built mesh for {}x{}x{} grid: {} faces in {:?}",
            dimensions.x,
            dimensions.y,
            dimensions.z,
            mesh.face_count(),
            start.elapsed()
        );
        Ok(mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::{
        appearance::{BlockRegistry, TextureAtlas},
        block::{BlockId, AIR_BLOCK_ID},
        chunk::Chunk,
    };
    use cgmath::Vector3;

    #[test]
    fn boundary_faces_are_exposed() {
        let chunk = Chunk::solid(Point3::new(0, 0, 0), Vector3::new(2, 1, 1));
        let voxel = Point3::new(0, 0, 0);
        assert!(face_is_exposed(&chunk, voxel, BlockSide::LEFT));
        assert!(!face_is_exposed(&chunk, voxel, BlockSide::RIGHT));
        assert!(face_is_exposed(&chunk, voxel, BlockSide::TOP));
        assert!(face_is_exposed(&chunk, voxel, BlockSide::BOTTOM));
        assert!(face_is_exposed(&chunk, voxel, BlockSide::FRONT));
        assert!(face_is_exposed(&chunk, voxel, BlockSide::BACK));
    }

    /// Reports every in-bounds cell as id 0 but only `x == 0` as solid.
    struct MaskedGrid;

    impl VoxelGrid for MaskedGrid {
        fn dimensions(&self) -> Vector3<usize> {
            Vector3::new(2, 1, 1)
        }

        fn voxel_at(&self, x: usize, y: usize, z: usize) -> Option<BlockId> {
            (x < 2 && y == 0 && z == 0).then_some(0)
        }

        fn is_solid(&self, x: usize, y: usize, z: usize) -> bool {
            x == 0 && y == 0 && z == 0
        }
    }

    #[test]
    fn exposure_asks_the_grid_for_solidity() {
        let voxel = Point3::new(0, 0, 0);
        assert!(face_is_exposed(&MaskedGrid, voxel, BlockSide::RIGHT));
        assert!(!face_is_exposed(
            &MaskedGrid,
            Point3::new(1, 0, 0),
            BlockSide::LEFT
        ));
    }

    #[test]
    fn chunk_solid_mask_drives_exposure() {
        let mut chunk = Chunk::solid(Point3::new(0, 0, 0), Vector3::new(3, 1, 1));
        let middle = Point3::new(1, 0, 0);
        assert!(!face_is_exposed(&chunk, middle, BlockSide::RIGHT));

        chunk.set_block(2, 0, 0, AIR_BLOCK_ID);
        assert!(!chunk.is_block_solid(2, 0, 0));
        assert!(face_is_exposed(&chunk, middle, BlockSide::RIGHT));
        assert!(!face_is_exposed(&chunk, middle, BlockSide::LEFT));
    }

    #[test]
    fn index_base_stays_within_u32() {
        assert_eq!(face_index_base(0).unwrap(), 0);
        let last_fit = u32::MAX as usize - 3;
        assert_eq!(face_index_base(last_fit).unwrap(), u32::MAX - 3);
        assert!(matches!(
            face_index_base(last_fit + 1),
            Err(MeshingError::MeshTooLarge { vertices }) if vertices == last_fit + 1
        ));
        assert!(face_index_base(usize::MAX).is_err());
    }

    #[test]
    fn emitted_indices_follow_running_vertex_count() {
        let registry = BlockRegistry::with_default_blocks(TextureAtlas::new(4));
        let chunk = Chunk::solid(Point3::new(0, 0, 0), Vector3::new(2, 1, 1));
        let mesh = MeshBuilder::new(&registry).build(&chunk).unwrap();

        assert_eq!(mesh.face_count(), 10);
        for (face, quad) in mesh.indices.chunks(INDICES_PER_FACE).enumerate() {
            let base = (face * VERTICES_PER_FACE) as u32;
            assert_eq!(quad, &[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
    }
}
