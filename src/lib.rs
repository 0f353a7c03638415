//! cubeview - a rotating coloured cube rendered offscreen with wgpu and
//! shown through a full-window or cropped textured quad.

pub mod app;
pub mod config;
pub mod logging;
pub mod panel;

pub use app::{run, AppError};
pub use config::{AppConfig, DisplayMode};
