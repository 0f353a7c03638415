//! Vertex-colored cube transformed by a single matrix uniform.

use wgpu::util::DeviceExt;

use super::{BindGroupLayoutBuilder, PipelineBuilder};
use crate::bindings::mesh as bindings;
use crate::uniform::RotationUniform;
use crate::vertex::{MeshVertex, CUBE_INDICES, CUBE_VERTICES};

pub struct MeshPipeline {
    pub render_pipeline: wgpu::RenderPipeline,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_indices: u32,
    pub uniform_buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl MeshPipeline {
    /// Create the pipeline. Pass `depth_format` when the target pass has a
    /// depth attachment.
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        depth_format: Option<wgpu::TextureFormat>,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Mesh Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/mesh.wgsl").into()),
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Rotation Buffer"),
            contents: bytemuck::cast_slice(&[RotationUniform::new()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = BindGroupLayoutBuilder::new(device)
            .with_label("Mesh Bind Group Layout")
            .add_uniform_buffer::<RotationUniform>(
                bindings::ROTATION_BINDING,
                wgpu::ShaderStages::VERTEX,
            )
            .build();

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Mesh Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: bindings::ROTATION_BINDING,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let render_pipeline = PipelineBuilder::new(device, format)
            .with_label("Mesh Render Pipeline")
            .with_shader(&shader, "vs_main", "fs_main")
            .with_vertex_buffer(MeshVertex::desc())
            .with_bind_group_layouts(&[&bind_group_layout])
            .with_blend_state(wgpu::BlendState::REPLACE)
            .with_depth(depth_format)
            .build();

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Vertex Buffer"),
            contents: bytemuck::cast_slice(&CUBE_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Index Buffer"),
            contents: bytemuck::cast_slice(&CUBE_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            render_pipeline,
            vertex_buffer,
            index_buffer,
            num_indices: CUBE_INDICES.len() as u32,
            uniform_buffer,
            bind_group,
        }
    }

    /// Write the matrix used by the next draw.
    pub fn update_rotation(&self, queue: &wgpu::Queue, rotation: RotationUniform) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[rotation]));
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_pipeline(&self.render_pipeline);
        render_pass.set_bind_group(bindings::GROUP, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        render_pass.draw_indexed(0..self.num_indices, 0, 0..1);
    }
}
