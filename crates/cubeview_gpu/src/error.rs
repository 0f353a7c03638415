use thiserror::Error;

#[derive(Debug, Error)]
pub enum GpuError {
    #[error("Failed to request adapter: {0}")]
    AdapterRequest(#[from] wgpu::RequestAdapterError),

    #[error("Failed to request device: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),

    #[error("Failed to create surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),

    #[error("Surface configuration error: incompatible surface")]
    SurfaceConfigError,

    #[error("Surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    #[error("Headless context has no surface")]
    NoSurface,

    #[error("Failed to map readback buffer: {0}")]
    BufferMap(#[from] wgpu::BufferAsyncError),

    #[error("Device poll failed: {0}")]
    Poll(#[from] wgpu::PollError),

    #[error("Readback error: {0}")]
    Readback(String),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, GpuError>;
