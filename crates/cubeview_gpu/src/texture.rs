use crate::config::TextureConfig;

/// GPU texture wrapper: the texture, a view of it, and the sampler used to
/// read it from a quad pipeline.
pub struct Texture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    /// Wrap an existing texture, creating its default view and a sampler.
    pub fn from_wgpu(
        device: &wgpu::Device,
        texture: wgpu::Texture,
        config: &TextureConfig,
    ) -> Self {
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&config.sampler_descriptor("Texture Sampler"));
        let size = texture.size();

        Self {
            texture,
            view,
            sampler,
            width: size.width,
            height: size.height,
        }
    }
}
