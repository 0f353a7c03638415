//! CPU mirror of the shader stages in `src/shaders/`.
//!
//! Each function computes what the matching WGSL entry point computes for a
//! single invocation, so the stage math can be checked without a GPU.
//! Keep these in lockstep with the WGSL.

use glam::{Vec2, Vec3, Vec4};
use image::RgbaImage;

use crate::uniform::{RotationUniform, VisibleRect};
use crate::vertex::{MeshVertex, QuadVertex};

/// Outputs of the quad vertex stage (`quad.wgsl`, `cropped_quad.wgsl`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadVaryings {
    pub clip_position: Vec4,
    pub color: Vec4,
    pub tex_coords: Vec2,
}

/// Outputs of the mesh vertex stage (`mesh.wgsl`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshVaryings {
    pub clip_position: Vec4,
    pub color: Vec4,
}

/// Something a fragment stage can sample a color from.
pub trait TextureSampler {
    fn sample(&self, uv: Vec2) -> Vec4;
}

/// How out-of-range coordinates are folded back into the texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressMode {
    ClampToEdge,
    Repeat,
}

/// Nearest-neighbour sampler over an RGBA8 image, returning unorm values.
pub struct ImageSampler<'a> {
    image: &'a RgbaImage,
    address_mode: AddressMode,
}

impl<'a> ImageSampler<'a> {
    pub fn new(image: &'a RgbaImage, address_mode: AddressMode) -> Self {
        Self {
            image,
            address_mode,
        }
    }

    fn texel_index(&self, coord: f32, size: u32) -> u32 {
        let texel = (coord * size as f32).floor() as i64;
        let size = size as i64;
        let folded = match self.address_mode {
            AddressMode::ClampToEdge => texel.clamp(0, size - 1),
            AddressMode::Repeat => texel.rem_euclid(size),
        };
        folded as u32
    }
}

impl TextureSampler for ImageSampler<'_> {
    fn sample(&self, uv: Vec2) -> Vec4 {
        let (width, height) = self.image.dimensions();
        if width == 0 || height == 0 {
            return Vec4::ZERO;
        }
        let x = self.texel_index(uv.x, width);
        let y = self.texel_index(uv.y, height);
        let [r, g, b, a] = self.image.get_pixel(x, y).0;
        Vec4::new(r as f32, g as f32, b as f32, a as f32) / 255.0
    }
}

/// `vs_main` of both quad shaders: clip position `(x, y, 0, 1)`.
pub fn quad_vertex(vertex: &QuadVertex) -> QuadVaryings {
    QuadVaryings {
        clip_position: Vec2::from(vertex.position).extend(0.0).extend(1.0),
        color: Vec4::from(vertex.color),
        tex_coords: Vec2::from(vertex.tex_coords),
    }
}

/// `vs_main` of `mesh.wgsl`: clip position `M * (p, 1)`.
pub fn mesh_vertex(vertex: &MeshVertex, rotation: &RotationUniform) -> MeshVaryings {
    MeshVaryings {
        clip_position: rotation.to_mat4() * Vec3::from(vertex.position).extend(1.0),
        color: Vec4::from(vertex.color),
    }
}

/// `fs_main` of `quad.wgsl`. The interpolated color is not read.
pub fn quad_fragment(sampler: &impl TextureSampler, input: &QuadVaryings) -> Vec4 {
    sampler.sample(input.tex_coords)
}

/// `fs_main` of `mesh.wgsl`.
pub fn mesh_fragment(input: &MeshVaryings) -> Vec4 {
    input.color
}

/// Texture coordinate `cropped_quad.wgsl` samples at. Not clamped.
pub fn remap_tex_coords(tex_coords: Vec2, visible: &VisibleRect) -> Vec2 {
    Vec2::new(
        visible.min_x + (visible.max_x - visible.min_x) * tex_coords.x,
        visible.min_y + (visible.max_y - visible.min_y) * tex_coords.y,
    )
}

/// `fs_main` of `cropped_quad.wgsl`.
pub fn cropped_quad_fragment(
    sampler: &impl TextureSampler,
    visible: &VisibleRect,
    input: &QuadVaryings,
) -> Vec4 {
    sampler.sample(remap_tex_coords(input.tex_coords, visible))
}
