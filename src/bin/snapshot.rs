//! Render the cube once without a window and save it as a PNG.
//!
//! Usage: `snapshot [OUTPUT]` (defaults to `cube.png`). Size, background,
//! GPU preset and log level come from `cubeview.json` when present.

use cubeview::logging::init_logging;
use cubeview::{AppConfig, AppError};
use cubeview_gpu::camera::view_projection;
use cubeview_gpu::context::OFFSCREEN_FORMAT;
use cubeview_gpu::readback::save_png;
use cubeview_gpu::target::DEPTH_FORMAT;
use cubeview_gpu::{GpuContext, MeshPipeline, RenderTarget, TargetKey};

const DEFAULT_OUTPUT: &str = "cube.png";

/// Tilted so three faces are visible.
fn snapshot_rotation() -> glam::Quat {
    glam::Quat::from_rotation_y(0.6) * glam::Quat::from_rotation_x(0.5)
}

fn run(output: &str) -> Result<(), AppError> {
    let config = AppConfig::load(AppConfig::default_filename())?;
    init_logging(config.log_level.to_level_filter());

    let ctx = pollster::block_on(GpuContext::headless(config.gpu.to_gpu_config()))?;

    let key = TargetKey::for_rect(config.panel_size.0, config.panel_size.1, 1.0);
    let target = RenderTarget::new(&ctx.device, key);
    let mesh = MeshPipeline::new(&ctx.device, OFFSCREEN_FORMAT, Some(DEPTH_FORMAT));

    let aspect = target.key().aspect_ratio();
    mesh.update_rotation(&ctx.queue, view_projection(snapshot_rotation(), aspect));
    target.render(&ctx, config.clear_color(), |pass| mesh.draw(pass));

    save_png(&ctx, &target.texture().texture, output)?;
    Ok(())
}

fn main() {
    let output = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_OUTPUT.to_string());

    if let Err(e) = run(&output) {
        eprintln!("Snapshot failed: {}", e);
        std::process::exit(1);
    }
}
