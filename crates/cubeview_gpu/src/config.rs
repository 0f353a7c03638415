//! Configuration structs for GPU settings.
//!
//! Provides configurable options for GPU context, textures, and render
//! passes, with defaults suited to a small interactive 3D viewport.

/// Configuration for GPU context initialization.
#[derive(Debug, Clone)]
pub struct GpuConfig {
    /// Power preference for adapter selection.
    pub power_preference: wgpu::PowerPreference,
    /// Present mode (VSync behavior). Ignored by headless contexts.
    pub present_mode: wgpu::PresentMode,
    /// Maximum frames in flight.
    pub max_frame_latency: u32,
}

impl Default for GpuConfig {
    fn default() -> Self {
        Self {
            power_preference: wgpu::PowerPreference::default(),
            present_mode: wgpu::PresentMode::Fifo, // VSync on
            max_frame_latency: 2,
        }
    }
}

impl GpuConfig {
    /// Create config optimized for low latency (interactive dragging).
    pub fn low_latency() -> Self {
        Self::default()
            .with_power_preference(wgpu::PowerPreference::HighPerformance)
            .with_present_mode(wgpu::PresentMode::Mailbox) // Low latency, may tear
            .with_max_frame_latency(1)
    }

    /// Create config optimized for power efficiency.
    pub fn power_saving() -> Self {
        Self::default().with_power_preference(wgpu::PowerPreference::LowPower)
    }

    /// Set power preference.
    pub fn with_power_preference(mut self, pref: wgpu::PowerPreference) -> Self {
        self.power_preference = pref;
        self
    }

    /// Set present mode.
    pub fn with_present_mode(mut self, mode: wgpu::PresentMode) -> Self {
        self.present_mode = mode;
        self
    }

    /// Set maximum frame latency.
    pub fn with_max_frame_latency(mut self, latency: u32) -> Self {
        self.max_frame_latency = latency;
        self
    }
}

/// Configuration for texture sampling.
#[derive(Debug, Clone)]
pub struct TextureConfig {
    /// Magnification filter mode.
    pub mag_filter: wgpu::FilterMode,
    /// Minification filter mode.
    pub min_filter: wgpu::FilterMode,
    /// Mipmap filter mode.
    pub mipmap_filter: wgpu::FilterMode,
    /// Address mode for U coordinate.
    pub address_mode_u: wgpu::AddressMode,
    /// Address mode for V coordinate.
    pub address_mode_v: wgpu::AddressMode,
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
        }
    }
}

impl TextureConfig {
    /// Sampler used when showing an offscreen render target.
    ///
    /// Linear when magnified, nearest when minified.
    pub fn render_target() -> Self {
        Self::default()
            .with_address_mode(wgpu::AddressMode::ClampToEdge)
            .with_mag_filter(wgpu::FilterMode::Linear)
            .with_min_filter(wgpu::FilterMode::Nearest)
    }

    /// Set magnification filter.
    pub fn with_mag_filter(mut self, filter: wgpu::FilterMode) -> Self {
        self.mag_filter = filter;
        self
    }

    /// Set minification filter.
    pub fn with_min_filter(mut self, filter: wgpu::FilterMode) -> Self {
        self.min_filter = filter;
        self
    }

    /// Set address mode for both U and V.
    pub fn with_address_mode(mut self, mode: wgpu::AddressMode) -> Self {
        self.address_mode_u = mode;
        self.address_mode_v = mode;
        self
    }

    pub(crate) fn sampler_descriptor(
        &self,
        label: &'static str,
    ) -> wgpu::SamplerDescriptor<'static> {
        wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: self.address_mode_u,
            address_mode_v: self.address_mode_v,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: self.mag_filter,
            min_filter: self.min_filter,
            mipmap_filter: self.mipmap_filter,
            ..Default::default()
        }
    }
}

/// Clear color for render passes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl ClearColor {
    /// Dark gray (window background).
    pub const DARK_GRAY: ClearColor = ClearColor {
        r: 0.1,
        g: 0.1,
        b: 0.1,
        a: 1.0,
    };
    /// Black.
    pub const BLACK: ClearColor = ClearColor {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };

    /// Create a custom clear color.
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Create from 8-bit RGB (alpha = 1.0).
    pub fn from_rgb8(rgb: [u8; 3]) -> Self {
        Self {
            r: rgb[0] as f64 / 255.0,
            g: rgb[1] as f64 / 255.0,
            b: rgb[2] as f64 / 255.0,
            a: 1.0,
        }
    }

    /// Convert to wgpu::Color.
    pub fn to_wgpu(&self) -> wgpu::Color {
        wgpu::Color {
            r: self.r,
            g: self.g,
            b: self.b,
            a: self.a,
        }
    }
}

impl From<ClearColor> for wgpu::Color {
    fn from(c: ClearColor) -> Self {
        c.to_wgpu()
    }
}
