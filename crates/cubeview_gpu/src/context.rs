use std::sync::Arc;
use winit::window::Window;

use crate::config::GpuConfig;
use crate::error::{GpuError, Result};

/// Format of offscreen targets and of headless contexts.
pub const OFFSCREEN_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// Window surface and its current configuration.
pub struct SurfaceState {
    pub surface: wgpu::Surface<'static>,
    pub config: wgpu::SurfaceConfiguration,
}

/// Main GPU context managing wgpu device, queue, and (optionally) a window surface.
pub struct GpuContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub surface: Option<SurfaceState>,
    pub config: GpuConfig,
}

impl GpuContext {
    /// Initialize GPU context for a window.
    ///
    /// On native, use `pollster::block_on()` to call this.
    pub async fn with_config(window: Arc<Window>, config: GpuConfig) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: config.power_preference,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        log::info!("Using GPU adapter: {:?}", adapter.get_info());

        let (device, queue) = Self::request_device(&adapter).await?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or(GpuError::SurfaceConfigError)?;

        // Use present mode from config, falling back to Fifo if not supported
        let present_mode = if surface_caps.present_modes.contains(&config.present_mode) {
            config.present_mode
        } else {
            log::warn!(
                "Present mode {:?} unsupported, falling back to Fifo",
                config.present_mode
            );
            wgpu::PresentMode::Fifo // Always supported
        };

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: config.max_frame_latency,
        };

        surface.configure(&device, &surface_config);

        Ok(Self {
            device,
            queue,
            surface: Some(SurfaceState {
                surface,
                config: surface_config,
            }),
            config,
        })
    }

    /// Initialize a GPU context without a window, for offscreen rendering.
    pub async fn headless(config: GpuConfig) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: config.power_preference,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await?;

        log::info!("Using headless GPU adapter: {:?}", adapter.get_info());

        let (device, queue) = Self::request_device(&adapter).await?;

        Ok(Self {
            device,
            queue,
            surface: None,
            config,
        })
    }

    async fn request_device(adapter: &wgpu::Adapter) -> Result<(wgpu::Device, wgpu::Queue)> {
        let limits = wgpu::Limits::downlevel_webgl2_defaults().using_resolution(adapter.limits());

        let device = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Main Device"),
                required_features: wgpu::Features::empty(),
                required_limits: limits,
                memory_hints: wgpu::MemoryHints::default(),
                experimental_features: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;
        Ok(device)
    }

    /// Handle window resize. No-op for headless contexts.
    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if let Some(state) = &mut self.surface {
            state.config.width = new_width.max(1);
            state.config.height = new_height.max(1);
            state.surface.configure(&self.device, &state.config);
        }
    }

    /// Reconfigure the surface with its current size, after it was lost.
    pub fn reconfigure(&mut self) {
        let (width, height) = (self.width(), self.height());
        self.resize(width, height);
    }

    /// Acquire the next frame of the window surface.
    pub fn current_frame(&self) -> Result<wgpu::SurfaceTexture> {
        let state = self.surface.as_ref().ok_or(GpuError::NoSurface)?;
        Ok(state.surface.get_current_texture()?)
    }

    /// Format that pipelines drawing to the main output must target.
    pub fn target_format(&self) -> wgpu::TextureFormat {
        self.surface
            .as_ref()
            .map(|s| s.config.format)
            .unwrap_or(OFFSCREEN_FORMAT)
    }

    /// Get current surface width (1 when headless)
    pub fn width(&self) -> u32 {
        self.surface.as_ref().map(|s| s.config.width).unwrap_or(1)
    }

    /// Get current surface height (1 when headless)
    pub fn height(&self) -> u32 {
        self.surface.as_ref().map(|s| s.config.height).unwrap_or(1)
    }
}
