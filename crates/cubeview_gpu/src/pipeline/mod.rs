//! Render pipelines.
//!
//! One pipeline per shader in `src/shaders/`. Each owns its static geometry
//! and uniform buffer; textures are bound per draw through bind groups.

pub mod builder;
pub mod cropped_quad;
pub mod mesh;
pub mod quad;

pub use builder::{BindGroupLayoutBuilder, PipelineBuilder};
pub use cropped_quad::CroppedQuadPipeline;
pub use mesh::MeshPipeline;
pub use quad::QuadPipeline;

