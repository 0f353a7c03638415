//! Textured quad pipeline: shows a texture over the whole viewport.

use wgpu::util::DeviceExt;

use super::{BindGroupLayoutBuilder, PipelineBuilder};
use crate::bindings::quad as bindings;
use crate::texture::Texture;
use crate::uniform::RotationUniform;
use crate::vertex::{QuadVertex, FULLSCREEN_QUAD};

pub struct QuadPipeline {
    pub render_pipeline: wgpu::RenderPipeline,
    pub vertex_buffer: wgpu::Buffer,
    pub uniform_buffer: wgpu::Buffer,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl QuadPipeline {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Quad Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/quad.wgsl").into()),
        });

        // The shader declares the rotation uniform without reading it; the
        // buffer only exists to satisfy the layout and stays identity.
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Quad Rotation Buffer"),
            contents: bytemuck::cast_slice(&[RotationUniform::new()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = BindGroupLayoutBuilder::new(device)
            .with_label("Quad Bind Group Layout")
            .add_uniform_buffer::<RotationUniform>(
                bindings::ROTATION_BINDING,
                wgpu::ShaderStages::VERTEX,
            )
            .add_texture_2d(bindings::TEXTURE_BINDING, wgpu::ShaderStages::FRAGMENT)
            .add_sampler(bindings::SAMPLER_BINDING, wgpu::ShaderStages::FRAGMENT)
            .build();

        let render_pipeline = PipelineBuilder::new(device, format)
            .with_label("Quad Render Pipeline")
            .with_shader(&shader, "vs_main", "fs_main")
            .with_vertex_buffer(QuadVertex::desc())
            .with_bind_group_layouts(&[&bind_group_layout])
            .with_blend_state(wgpu::BlendState::REPLACE)
            .with_topology(wgpu::PrimitiveTopology::TriangleStrip)
            .build();

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Quad Vertex Buffer"),
            contents: bytemuck::cast_slice(&FULLSCREEN_QUAD),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Self {
            render_pipeline,
            vertex_buffer,
            uniform_buffer,
            bind_group_layout,
        }
    }

    /// Create bind group for a texture
    pub fn create_bind_group(&self, device: &wgpu::Device, texture: &Texture) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Quad Bind Group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: bindings::ROTATION_BINDING,
                    resource: self.uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: bindings::TEXTURE_BINDING,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: bindings::SAMPLER_BINDING,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
            ],
        })
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>, bind_group: &wgpu::BindGroup) {
        render_pass.set_pipeline(&self.render_pipeline);
        render_pass.set_bind_group(bindings::GROUP, bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.draw(0..FULLSCREEN_QUAD.len() as u32, 0..1);
    }
}
