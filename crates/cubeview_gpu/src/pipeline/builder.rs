//! Pipeline builder for reducing boilerplate in render pipeline creation.
//!
//! Provides a fluent API for creating wgpu render pipelines with sensible
//! defaults: one color target, no depth, no culling, triangle list.

use std::num::NonZeroU64;

/// Builder for creating wgpu render pipelines with common defaults.
///
/// # Example
/// ```ignore
/// let pipeline = PipelineBuilder::new(&device, format)
///     .with_shader(&shader, "vs_main", "fs_main")
///     .with_vertex_buffer(QuadVertex::desc())
///     .with_topology(wgpu::PrimitiveTopology::TriangleStrip)
///     .with_bind_group_layouts(&[&layout])
///     .build();
/// ```
pub struct PipelineBuilder<'a> {
    device: &'a wgpu::Device,
    format: wgpu::TextureFormat,
    label: Option<&'a str>,
    shader: Option<&'a wgpu::ShaderModule>,
    vs_entry: &'a str,
    fs_entry: &'a str,
    vertex_buffers: Vec<wgpu::VertexBufferLayout<'a>>,
    bind_group_layouts: Vec<&'a wgpu::BindGroupLayout>,
    blend_state: Option<wgpu::BlendState>,
    topology: wgpu::PrimitiveTopology,
    depth_format: Option<wgpu::TextureFormat>,
}

impl<'a> PipelineBuilder<'a> {
    /// Create a new pipeline builder with default settings.
    pub fn new(device: &'a wgpu::Device, format: wgpu::TextureFormat) -> Self {
        Self {
            device,
            format,
            label: None,
            shader: None,
            vs_entry: "vs_main",
            fs_entry: "fs_main",
            vertex_buffers: Vec::new(),
            bind_group_layouts: Vec::new(),
            blend_state: None,
            topology: wgpu::PrimitiveTopology::TriangleList,
            depth_format: None,
        }
    }

    /// Set the pipeline label for debugging.
    pub fn with_label(mut self, label: &'a str) -> Self {
        self.label = Some(label);
        self
    }

    /// Set the shader module and entry points.
    pub fn with_shader(
        mut self,
        shader: &'a wgpu::ShaderModule,
        vs_entry: &'a str,
        fs_entry: &'a str,
    ) -> Self {
        self.shader = Some(shader);
        self.vs_entry = vs_entry;
        self.fs_entry = fs_entry;
        self
    }

    /// Add a vertex buffer layout.
    pub fn with_vertex_buffer(mut self, layout: wgpu::VertexBufferLayout<'a>) -> Self {
        self.vertex_buffers.push(layout);
        self
    }

    /// Set all bind group layouts.
    pub fn with_bind_group_layouts(mut self, layouts: &[&'a wgpu::BindGroupLayout]) -> Self {
        self.bind_group_layouts = layouts.to_vec();
        self
    }

    /// Set the blend state (default: none, i.e. replace).
    pub fn with_blend_state(mut self, blend: wgpu::BlendState) -> Self {
        self.blend_state = Some(blend);
        self
    }

    /// Set the primitive topology (default: TriangleList).
    pub fn with_topology(mut self, topology: wgpu::PrimitiveTopology) -> Self {
        self.topology = topology;
        self
    }

    /// Enable depth testing against a depth attachment of `format`.
    ///
    /// Fragments closer than the stored depth pass (`Less`) and write depth.
    pub fn with_depth(mut self, format: Option<wgpu::TextureFormat>) -> Self {
        self.depth_format = format;
        self
    }

    /// Build the render pipeline.
    ///
    /// # Panics
    /// Panics if no shader module was provided.
    pub fn build(self) -> wgpu::RenderPipeline {
        let shader = self.shader.expect("PipelineBuilder requires a shader module");

        let pipeline_layout = self.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: self.label.map(|l| format!("{} Layout", l)).as_deref(),
            bind_group_layouts: &self.bind_group_layouts,
            push_constant_ranges: &[],
        });

        let depth_stencil = self.depth_format.map(|format| wgpu::DepthStencilState {
            format,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        });

        self.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: self.label,
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some(self.vs_entry),
                buffers: &self.vertex_buffers,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some(self.fs_entry),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.format,
                    blend: self.blend_state,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: self.topology,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        })
    }
}

/// Helper for creating common bind group layout entries.
pub struct BindGroupLayoutBuilder<'a> {
    device: &'a wgpu::Device,
    label: Option<&'a str>,
    entries: Vec<wgpu::BindGroupLayoutEntry>,
}

impl<'a> BindGroupLayoutBuilder<'a> {
    /// Create a new bind group layout builder.
    pub fn new(device: &'a wgpu::Device) -> Self {
        Self {
            device,
            label: None,
            entries: Vec::new(),
        }
    }

    /// Set the layout label.
    pub fn with_label(mut self, label: &'a str) -> Self {
        self.label = Some(label);
        self
    }

    /// Add a uniform buffer entry holding a `T`.
    pub fn add_uniform_buffer<T>(mut self, binding: u32, visibility: wgpu::ShaderStages) -> Self {
        self.entries.push(uniform_entry::<T>(binding, visibility));
        self
    }

    /// Add a 2D texture entry.
    pub fn add_texture_2d(mut self, binding: u32, visibility: wgpu::ShaderStages) -> Self {
        self.entries.push(wgpu::BindGroupLayoutEntry {
            binding,
            visibility,
            ty: wgpu::BindingType::Texture {
                multisampled: false,
                view_dimension: wgpu::TextureViewDimension::D2,
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
            },
            count: None,
        });
        self
    }

    /// Add a filtering sampler entry.
    pub fn add_sampler(mut self, binding: u32, visibility: wgpu::ShaderStages) -> Self {
        self.entries.push(wgpu::BindGroupLayoutEntry {
            binding,
            visibility,
            // Must match the `filterable` flag of the texture entry.
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        });
        self
    }

    /// Build the bind group layout.
    pub fn build(self) -> wgpu::BindGroupLayout {
        self.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: self.label,
            entries: &self.entries,
        })
    }
}

fn uniform_entry<T>(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: NonZeroU64::new(std::mem::size_of::<T>() as u64),
        },
        count: None,
    }
}
