//! Vertex layout for the textured quad.

use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Unit screen space: (0,0) top-left, (1,1) bottom-right.
    pub position: [f32; 2],
    pub tex_coords: [f32; 2],
}

impl Vertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Corner coordinates of the two triangles covering the unit square.
const QUAD_CORNERS: [[f32; 2]; 6] = [
    [0.0, 0.0],
    [1.0, 0.0],
    [0.0, 1.0],
    [0.0, 1.0],
    [1.0, 0.0],
    [1.0, 1.0],
];

/// Full-viewport quad as a plain triangle list (no index buffer).
///
/// Screen position and texture coordinate coincide, so the image is drawn
/// upright with texel (0,0) in the top-left corner.
pub fn quad_vertices() -> [Vertex; 6] {
    QUAD_CORNERS.map(|corner| Vertex {
        position: corner,
        tex_coords: corner,
    })
}
