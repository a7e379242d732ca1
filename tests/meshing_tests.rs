use approx::assert_relative_eq;
use cgmath::{Point3, Vector3};
use test_case::test_case;
use voxel_mesher::{
    BlockAppearance, BlockRegistry, BlockType, Chunk, GeneratedMesh, MeshBuilder, MeshingError,
    TextureAtlas, VoxelGrid,
};

fn origin() -> Point3<i32> {
    Point3::new(0, 0, 0)
}

fn registry() -> BlockRegistry {
    BlockRegistry::with_default_blocks(TextureAtlas::new(4))
}

fn build(chunk: &Chunk) -> GeneratedMesh {
    MeshBuilder::new(&registry())
        .build(chunk)
        .expect("every block in the chunk is registered")
}

#[test]
fn empty_grid_produces_empty_mesh() {
    let mesh = build(&Chunk::empty(origin(), Vector3::new(4, 4, 4)));

    assert!(mesh.vertices.is_empty());
    assert!(mesh.indices.is_empty());
    assert!(mesh.colors.is_empty());
    assert!(mesh.uvs.is_empty());
    assert!(mesh.triangle_lookup.is_empty());
    assert!(mesh.is_empty());
}

#[test_case(Vector3::new(0, 4, 4) ; "zero width")]
#[test_case(Vector3::new(4, 0, 4) ; "zero height")]
#[test_case(Vector3::new(4, 4, 0) ; "zero depth")]
fn zero_sized_grid_produces_empty_mesh(dimensions: Vector3<usize>) {
    let mesh = build(&Chunk::solid(origin(), dimensions));
    assert!(mesh.is_empty());
    assert!(mesh.triangle_lookup.is_empty());
}

#[test]
fn single_voxel_exposes_all_six_faces() {
    let mesh = build(&Chunk::solid(origin(), Vector3::new(1, 1, 1)));

    assert_eq!(mesh.vertices.len(), 24);
    assert_eq!(mesh.indices.len(), 36);
    assert_eq!(mesh.triangle_lookup.len(), 36);
    assert!(mesh
        .triangle_lookup
        .iter()
        .all(|(_, voxel)| voxel == Point3::new(0, 0, 0)));
    for triangle in 0..12 {
        assert_eq!(
            mesh.resolve_voxel_for_triangle(triangle).unwrap(),
            Point3::new(0, 0, 0)
        );
    }
}

#[test]
fn interior_voxel_contributes_no_faces() {
    let mesh = build(&Chunk::solid(origin(), Vector3::new(3, 3, 3)));

    // 3x3 faces on each of the 6 outer sides
    assert_eq!(mesh.face_count(), 54);
    assert!(mesh
        .triangle_lookup
        .iter()
        .all(|(_, voxel)| voxel != Point3::new(1, 1, 1)));
}

#[test_case(3, 3, 3 ; "cube")]
#[test_case(4, 3, 5 ; "box")]
#[test_case(6, 6, 6 ; "larger cube")]
fn solid_box_only_exposes_its_surface(width: usize, height: usize, depth: usize) {
    let mesh = build(&Chunk::solid(origin(), Vector3::new(width, height, depth)));
    let surface = 2 * (width * height + height * depth + width * depth);
    assert_eq!(mesh.face_count(), surface);

    let interior = |v: usize, max: usize| v > 0 && v + 1 < max;
    assert!(mesh.triangle_lookup.iter().all(|(_, voxel)| {
        !(interior(voxel.x, width) && interior(voxel.y, height) && interior(voxel.z, depth))
    }));
}

#[test]
fn faces_toward_an_empty_neighbor_are_exposed() {
    let registry = registry();
    let atlas = TextureAtlas::new(4);
    registry.register(5, BlockAppearance::uniform(atlas.tile_uvs(0)));

    let mut chunk = Chunk::new(origin(), Vector3::new(2, 1, 1));
    assert!(chunk.set_block(0, 0, 0, 5));

    let mesh = MeshBuilder::new(&registry).build(&chunk).unwrap();

    assert_eq!(mesh.face_count(), 6);
    assert!(mesh
        .triangle_lookup
        .iter()
        .all(|(_, voxel)| voxel == Point3::new(0, 0, 0)));
}

#[test]
fn touching_voxels_hide_their_shared_faces() {
    let mesh = build(&Chunk::solid(origin(), Vector3::new(2, 1, 1)));
    assert_eq!(mesh.face_count(), 10);
}

#[test]
fn isolated_voxels_expose_every_face() {
    let chunk = Chunk::checkerboard(origin(), Vector3::new(4, 4, 4));
    let mesh = build(&chunk);
    assert_eq!(mesh.face_count(), chunk.solid_count() * 6);
}

fn checkerboard() -> Chunk {
    Chunk::checkerboard(origin(), Vector3::new(5, 4, 3))
}

fn sparse_random() -> Chunk {
    Chunk::random(origin(), Vector3::new(8, 8, 8), 0.5)
}

fn perlin_terrain() -> Chunk {
    Chunk::perlin(Point3::new(1, -1, 2), Vector3::new(16, 16, 16), 7)
}

fn flat_slab() -> Chunk {
    Chunk::solid(origin(), Vector3::new(5, 1, 5))
}

#[test_case(checkerboard ; "checkerboard")]
#[test_case(sparse_random ; "sparse random")]
#[test_case(perlin_terrain ; "perlin terrain")]
#[test_case(flat_slab ; "flat slab")]
fn mesh_buffers_stay_consistent(make_chunk: fn() -> Chunk) {
    let chunk = make_chunk();
    let mesh = build(&chunk);

    assert_eq!(mesh.colors.len(), mesh.vertices.len());
    assert_eq!(mesh.uvs.len(), mesh.vertices.len());
    assert_eq!(mesh.indices.len() % 6, 0);
    assert_eq!(mesh.triangle_lookup.len(), mesh.indices.len());
    assert!(mesh
        .indices
        .iter()
        .all(|index| (*index as usize) < mesh.vertices.len()));

    for (slot, voxel) in mesh.triangle_lookup.iter() {
        assert!(slot < mesh.indices.len());
        let resolved = mesh.resolve_voxel_for_triangle(slot / 3).unwrap();
        assert!(
            chunk.is_solid(resolved.x, resolved.y, resolved.z),
            "triangle {} resolved to non-solid voxel {:?}",
            slot / 3,
            resolved
        );
        assert_eq!(resolved, mesh.triangle_lookup.get(slot - slot % 3).unwrap());
        assert!(chunk.is_solid(voxel.x, voxel.y, voxel.z));
    }
}

#[test]
fn vertices_stay_inside_their_voxel() {
    let mesh = build(&Chunk::checkerboard(origin(), Vector3::new(3, 3, 3)));

    for (face, quad) in mesh.vertices.chunks(4).enumerate() {
        let voxel = mesh.triangle_lookup.get(face * 6).unwrap();
        for vertex in quad {
            for (coordinate, start) in [
                (vertex.x, voxel.x),
                (vertex.y, voxel.y),
                (vertex.z, voxel.z),
            ] {
                let start = start as f32;
                assert!(coordinate == start || coordinate == start + 1.0);
            }
        }
    }
}

#[test]
fn regenerating_unchanged_grid_gives_same_counts() {
    let chunk = Chunk::perlin(origin(), Vector3::new(12, 12, 12), 3);
    let first = build(&chunk);
    let second = build(&chunk);

    assert_eq!(first.stats(), second.stats());
    assert_eq!(first.colors.len(), second.colors.len());
    assert_eq!(first.uvs.len(), second.uvs.len());
}

#[test]
fn face_uvs_come_from_the_block_appearance() {
    let atlas = TextureAtlas::new(4);
    let mut chunk = Chunk::new(origin(), Vector3::new(1, 1, 1));
    chunk.set_block(0, 0, 0, BlockType::GRASS.id());
    let mesh = build(&chunk);

    let top_face = mesh
        .vertices
        .chunks(4)
        .position(|quad| quad.iter().all(|vertex| vertex.y == 1.0))
        .expect("the top face is exposed");
    let expected = atlas.tile_uvs(3);
    for (uv, expected) in mesh.uvs[top_face * 4..top_face * 4 + 4].iter().zip(expected) {
        assert_relative_eq!(uv.x, expected.x);
        assert_relative_eq!(uv.y, expected.y);
    }
}

#[test]
fn each_face_carries_one_debug_color() {
    let mesh = build(&Chunk::solid(origin(), Vector3::new(1, 1, 1)));

    let face_colors: Vec<[f32; 4]> = mesh
        .colors
        .chunks(4)
        .map(|quad| {
            assert!(quad.iter().all(|color| color == &quad[0]));
            quad[0]
        })
        .collect();
    for (i, a) in face_colors.iter().enumerate() {
        for b in &face_colors[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn unregistered_block_aborts_the_pass() {
    let mut chunk = Chunk::new(origin(), Vector3::new(2, 2, 2));
    chunk.set_block(1, 0, 1, 42);

    let result = MeshBuilder::new(&registry()).build(&chunk);
    assert!(matches!(
        result,
        Err(MeshingError::UnregisteredBlock { block_id: 42 })
    ));
}

#[test]
fn enclosed_unregistered_block_is_never_looked_up() {
    let mut chunk = Chunk::solid(origin(), Vector3::new(3, 3, 3));
    chunk.set_block(1, 1, 1, 42);

    let mesh = MeshBuilder::new(&registry()).build(&chunk).unwrap();
    assert_eq!(mesh.face_count(), 54);
}

#[test]
fn out_of_range_triangle_is_reported() {
    let mesh = build(&Chunk::solid(origin(), Vector3::new(1, 1, 1)));
    assert!(matches!(
        mesh.resolve_voxel_for_triangle(12),
        Err(MeshingError::NoSuchTriangle {
            triangle: 12,
            triangle_count: 12
        })
    ));
}

#[test]
fn interleaved_vertices_mirror_the_buffers() {
    let mesh = build(&Chunk::solid(origin(), Vector3::new(2, 2, 1)));
    let interleaved = mesh.interleaved();

    assert_eq!(interleaved.len(), mesh.vertices.len());
    for (i, vertex) in interleaved.iter().enumerate() {
        assert_relative_eq!(vertex.position[0], mesh.vertices[i].x);
        assert_relative_eq!(vertex.position[1], mesh.vertices[i].y);
        assert_relative_eq!(vertex.position[2], mesh.vertices[i].z);
        assert_eq!(vertex.color, mesh.colors[i]);
        assert_relative_eq!(vertex.tex_coords[0], mesh.uvs[i].x);
        assert_relative_eq!(vertex.tex_coords[1], mesh.uvs[i].y);
    }
}
