//! Vertex layouts shared by the pipelines and the CPU reference stages.

use bytemuck::{Pod, Zeroable};

/// Vertex for both textured-quad pipelines.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
    pub tex_coords: [f32; 2],
}

impl QuadVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x2, // position
        1 => Float32x4, // color
        2 => Float32x2, // tex_coords
    ];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Full-viewport quad, drawn as a triangle strip.
///
/// Texture `v` grows downwards while clip-space `y` grows upwards, so the
/// bottom edge samples `v = 1`.
pub const FULLSCREEN_QUAD: [QuadVertex; 4] = [
    QuadVertex {
        position: [-1.0, -1.0],
        color: [0.0, 0.0, 0.0, 1.0],
        tex_coords: [0.0, 1.0],
    },
    QuadVertex {
        position: [1.0, -1.0],
        color: [1.0, 0.0, 0.0, 1.0],
        tex_coords: [1.0, 1.0],
    },
    QuadVertex {
        position: [-1.0, 1.0],
        color: [0.0, 1.0, 0.0, 1.0],
        tex_coords: [0.0, 0.0],
    },
    QuadVertex {
        position: [1.0, 1.0],
        color: [1.0, 1.0, 0.0, 1.0],
        tex_coords: [1.0, 0.0],
    },
];

/// Vertex for the rotated mesh pipeline.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl MeshVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x4, // color
    ];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Corners of the unit cube `[-1, 1]^3`, coloured by their position.
#[rustfmt::skip]
pub const CUBE_VERTICES: [MeshVertex; 8] = [
    MeshVertex { position: [-1.0, -1.0, -1.0], color: [0.0, 0.0, 0.0, 1.0] },
    MeshVertex { position: [1.0, -1.0, -1.0], color: [1.0, 0.0, 0.0, 1.0] },
    MeshVertex { position: [-1.0, 1.0, -1.0], color: [0.0, 1.0, 0.0, 1.0] },
    MeshVertex { position: [1.0, 1.0, -1.0], color: [1.0, 1.0, 0.0, 1.0] },
    MeshVertex { position: [-1.0, -1.0, 1.0], color: [0.0, 0.0, 1.0, 1.0] },
    MeshVertex { position: [1.0, -1.0, 1.0], color: [1.0, 0.0, 1.0, 1.0] },
    MeshVertex { position: [-1.0, 1.0, 1.0], color: [0.0, 1.0, 1.0, 1.0] },
    MeshVertex { position: [1.0, 1.0, 1.0], color: [1.0, 1.0, 1.0, 1.0] },
];

/// Two triangles per face, indexing into [`CUBE_VERTICES`].
#[rustfmt::skip]
pub const CUBE_INDICES: [u16; 36] = [
    0, 1, 3, 3, 2, 0, // back (z = -1)
    4, 5, 7, 7, 6, 4, // front (z = 1)
    0, 4, 6, 6, 2, 0, // left
    1, 5, 7, 7, 3, 1, // right
    0, 1, 5, 5, 4, 0, // bottom
    2, 3, 7, 7, 6, 2, // top
];
