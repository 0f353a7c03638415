//! GPU side of cubeview: WGSL shaders, their vertex and uniform layouts,
//! wgpu pipelines, offscreen targets, and a CPU mirror of every shader stage.

pub mod bindings;
pub mod camera;
pub mod config;
pub mod context;
pub mod error;
pub mod pipeline;
pub mod readback;
pub mod reference;
#[cfg(test)]
mod shader_eval;
pub mod target;
pub mod texture;
pub mod uniform;
pub mod vertex;

pub use camera::Orbit;
pub use config::{ClearColor, GpuConfig, TextureConfig};
pub use context::GpuContext;
pub use error::{GpuError, Result};
pub use pipeline::{CroppedQuadPipeline, MeshPipeline, QuadPipeline};
pub use target::{RenderTarget, TargetKey};
pub use texture::Texture;
pub use uniform::{RotationUniform, VisibleRect};
pub use vertex::{MeshVertex, QuadVertex};
