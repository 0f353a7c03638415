//! Uniform types for the GPU rendering pipelines.

use bytemuck::{Pod, Zeroable};

/// 4x4 column-major matrix applied to mesh vertices.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct RotationUniform {
    pub matrix: [[f32; 4]; 4],
}

impl RotationUniform {
    pub fn new() -> Self {
        Self::from_mat4(glam::Mat4::IDENTITY)
    }

    pub fn from_mat4(matrix: glam::Mat4) -> Self {
        Self {
            matrix: matrix.to_cols_array_2d(),
        }
    }

    pub fn to_mat4(&self) -> glam::Mat4 {
        glam::Mat4::from_cols_array_2d(&self.matrix)
    }
}

impl Default for RotationUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalized sub-rectangle of a texture, in `[0, 1]` texture space.
///
/// Nothing enforces the range: inverted or out-of-range bounds are passed
/// to the shader as they are.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct VisibleRect {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl VisibleRect {
    /// The whole texture.
    pub const FULL: VisibleRect = VisibleRect {
        min_x: 0.0,
        min_y: 0.0,
        max_x: 1.0,
        max_y: 1.0,
    };

    pub fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Fraction of `rect` that lies inside `viewport`.
    ///
    /// Both rectangles are `[min_x, min_y, max_x, max_y]` in the same space
    /// (usually window pixels). When they do not overlap the result is an
    /// empty or inverted range and the caller should skip drawing.
    pub fn from_rects(rect: [f32; 4], viewport: [f32; 4]) -> Self {
        let [x0, y0, x1, y1] = rect;
        let ix0 = x0.max(viewport[0]);
        let iy0 = y0.max(viewport[1]);
        let ix1 = x1.min(viewport[2]);
        let iy1 = y1.min(viewport[3]);

        fn frac(range: (f32, f32), value: f32) -> f32 {
            (value - range.0) / (range.1 - range.0)
        }

        Self {
            min_x: frac((x0, x1), ix0),
            min_y: frac((y0, y1), iy0),
            max_x: frac((x0, x1), ix1),
            max_y: frac((y0, y1), iy1),
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.max_x > self.min_x && self.max_y > self.min_y)
    }
}

impl Default for VisibleRect {
    fn default() -> Self {
        Self::FULL
    }
}
