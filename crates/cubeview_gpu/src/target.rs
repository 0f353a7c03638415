//! Offscreen color + depth target that a scene is rendered into before a
//! quad pipeline shows it on screen.

use crate::config::{ClearColor, TextureConfig};
use crate::context::{GpuContext, OFFSCREEN_FORMAT};
use crate::texture::Texture;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Identifies the physical size of a target. A target is recreated only
/// when its key changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetKey {
    pub pixels_per_point: f32,
    pub size: (u32, u32),
}

impl TargetKey {
    /// Key for a rectangle of `width` x `height` logical points.
    ///
    /// Fractional pixels are truncated; each side is at least one pixel.
    pub fn for_rect(width: f32, height: f32, pixels_per_point: f32) -> Self {
        let to_px = |points: f32| ((points * pixels_per_point) as u32).max(1);
        Self {
            pixels_per_point,
            size: (to_px(width), to_px(height)),
        }
    }

    /// Limit each side to `max_dimension` pixels, e.g. the device's
    /// `max_texture_dimension_2d`.
    pub fn clamped(self, max_dimension: u32) -> Self {
        let max = max_dimension.max(1);
        Self {
            size: (self.size.0.min(max), self.size.1.min(max)),
            ..self
        }
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.size.0 as f32 / self.size.1 as f32
    }
}

pub struct RenderTarget {
    key: TargetKey,
    color: Texture,
    depth_view: wgpu::TextureView,
}

impl RenderTarget {
    /// Create a target for `key`, clamped to the device's texture size limit.
    pub fn new(device: &wgpu::Device, key: TargetKey) -> Self {
        let key = key.clamped(device.limits().max_texture_dimension_2d);
        let size = wgpu::Extent3d {
            width: key.size.0.max(1),
            height: key.size.1.max(1),
            depth_or_array_layers: 1,
        };

        let color_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Render Target Color"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: OFFSCREEN_FORMAT,
            usage: wgpu::TextureUsages::COPY_SRC
                | wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let color = Texture::from_wgpu(device, color_texture, &TextureConfig::render_target());

        let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Render Target Depth"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let depth_view = depth_texture.create_view(&wgpu::TextureViewDescriptor::default());

        log::debug!("Created {}x{} render target", size.width, size.height);

        Self {
            key,
            color,
            depth_view,
        }
    }

    /// Recreate the target if `key` differs from the current one.
    ///
    /// Returns `true` when the textures were replaced; bind groups referring
    /// to the old color texture must then be rebuilt.
    pub fn ensure(&mut self, device: &wgpu::Device, key: TargetKey) -> bool {
        let key = key.clamped(device.limits().max_texture_dimension_2d);
        if self.key == key {
            return false;
        }
        *self = Self::new(device, key);
        true
    }

    /// Key of the current textures, after clamping.
    pub fn key(&self) -> TargetKey {
        self.key
    }

    /// Color texture, for binding to a quad pipeline or reading back.
    pub fn texture(&self) -> &Texture {
        &self.color
    }

    /// Clear color and depth, let `draw` record into the pass, and submit.
    pub fn render(
        &self,
        ctx: &GpuContext,
        clear: ClearColor,
        draw: impl FnOnce(&mut wgpu::RenderPass<'_>),
    ) {
        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Target Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Target Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.color.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear.into()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            draw(&mut render_pass);
        }

        ctx.queue.submit(std::iter::once(encoder.finish()));
    }
}
