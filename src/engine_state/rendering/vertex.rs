//! Interleaved vertex layout for handing a generated mesh to a renderer.

/// A vertex with position, debug color and texture coordinates packed together.
///
/// # Memory Layout
/// - Position: 3x f32 (12 bytes)
/// - Color: 4x f32 (16 bytes)
/// - Texture Coordinates: 2x f32 (8 bytes)
///
/// Total size: 36 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Chunk-local position
    pub position: [f32; 3],
    /// RGBA debug color
    pub color: [f32; 4],
    /// Atlas texture coordinates
    pub tex_coords: [f32; 2],
}

impl Vertex {
    /// Size of one vertex in bytes.
    pub const SIZE: usize = std::mem::size_of::<Vertex>();

    /// Views a vertex slice as raw bytes for upload.
    pub fn as_bytes(vertices: &[Vertex]) -> &[u8] {
        bytemuck::cast_slice(vertices)
    }
}
