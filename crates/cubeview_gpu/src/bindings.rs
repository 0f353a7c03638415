//! Shader binding constants.
//!
//! Binding numbers shared between the Rust pipeline setup and the WGSL
//! shaders in `src/shaders/`. Every pipeline uses a single bind group.
//!
//! # Usage
//!
//! In Rust code:
//! ```ignore
//! use cubeview_gpu::bindings::cropped_quad::*;
//! layout_builder.add_uniform_buffer(VISIBLE_RECT_BINDING, ...);
//! ```
//!
//! In WGSL shaders, these same numbers must be used:
//! ```wgsl
//! @group(0) @binding(2)  // GROUP, VISIBLE_RECT_BINDING
//! var<uniform> visible: VisibleRect;
//! ```

/// Binding constants for the plain textured-quad pipeline.
pub mod quad {
    /// Group 0: everything
    pub const GROUP: u32 = 0;
    /// Binding 0: rotation matrix uniform (declared, not read by the quad math)
    pub const ROTATION_BINDING: u32 = 0;
    /// Binding 1: Texture 2D
    pub const TEXTURE_BINDING: u32 = 1;
    /// Binding 2: Sampler
    pub const SAMPLER_BINDING: u32 = 2;
}

/// Binding constants for the rotated mesh pipeline.
pub mod mesh {
    /// Group 0: Uniforms
    pub const GROUP: u32 = 0;
    /// Binding 0: rotation matrix uniform
    pub const ROTATION_BINDING: u32 = 0;
}

/// Binding constants for the cropped textured-quad pipeline.
pub mod cropped_quad {
    /// Group 0: everything
    pub const GROUP: u32 = 0;
    /// Binding 0: Texture 2D
    pub const TEXTURE_BINDING: u32 = 0;
    /// Binding 1: Sampler
    pub const SAMPLER_BINDING: u32 = 1;
    /// Binding 2: visible sub-rectangle uniform
    pub const VISIBLE_RECT_BINDING: u32 = 2;
}
