//! Copy an RGBA8 texture back to the CPU and save it as an image.

use std::path::Path;
use std::sync::mpsc;

use image::RgbaImage;

use crate::context::GpuContext;
use crate::error::{GpuError, Result};

const BYTES_PER_PIXEL: u32 = 4;

/// Row pitch of a texture-to-buffer copy, rounded up to
/// `COPY_BYTES_PER_ROW_ALIGNMENT`.
pub fn padded_bytes_per_row(width: u32) -> u32 {
    let unpadded = width * BYTES_PER_PIXEL;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}

/// Drop the per-row padding of a mapped copy buffer.
fn strip_padding(data: &[u8], width: u32, height: u32, padded_row: u32) -> Vec<u8> {
    let row = (width * BYTES_PER_PIXEL) as usize;
    let mut pixels = Vec::with_capacity(row * height as usize);
    for chunk in data.chunks(padded_row as usize).take(height as usize) {
        pixels.extend_from_slice(&chunk[..row]);
    }
    pixels
}

/// Read an `Rgba8Unorm`/`Rgba8UnormSrgb` texture into an image.
///
/// Blocks until the GPU has finished the copy.
pub fn read_rgba8(ctx: &GpuContext, texture: &wgpu::Texture) -> Result<RgbaImage> {
    let size = texture.size();
    match texture.format() {
        wgpu::TextureFormat::Rgba8Unorm | wgpu::TextureFormat::Rgba8UnormSrgb => {}
        other => {
            return Err(GpuError::Readback(format!(
                "unsupported texture format {:?}",
                other
            )))
        }
    }
    if size.depth_or_array_layers != 1 {
        return Err(GpuError::Readback("array textures are not supported".into()));
    }

    let padded_row = padded_bytes_per_row(size.width);
    let buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Readback Buffer"),
        size: (padded_row * size.height) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder = ctx
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Readback Encoder"),
        });

    encoder.copy_texture_to_buffer(
        texture.as_image_copy(),
        wgpu::TexelCopyBufferInfo {
            buffer: &buffer,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(padded_row),
                rows_per_image: Some(size.height),
            },
        },
        size,
    );

    ctx.queue.submit(std::iter::once(encoder.finish()));

    let slice = buffer.slice(..);
    let (tx, rx) = mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        // The receiver only goes away if we already returned with an error.
        let _ = tx.send(result);
    });
    ctx.device.poll(wgpu::PollType::wait_indefinitely())?;
    rx.recv()
        .map_err(|_| GpuError::Readback("map callback was dropped".into()))??;

    let pixels = {
        let data = slice.get_mapped_range();
        strip_padding(&data, size.width, size.height, padded_row)
    };
    buffer.unmap();

    RgbaImage::from_raw(size.width, size.height, pixels)
        .ok_or_else(|| GpuError::Readback("pixel buffer size mismatch".into()))
}

/// Read a texture and write it to `path`; the format follows the extension.
pub fn save_png(ctx: &GpuContext, texture: &wgpu::Texture, path: impl AsRef<Path>) -> Result<()> {
    let image = read_rgba8(ctx, texture)?;
    image.save(path.as_ref())?;
    log::info!(
        "Saved {}x{} image to {}",
        image.width(),
        image.height(),
        path.as_ref().display()
    );
    Ok(())
}
