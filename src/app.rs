//! Interactive window: the cube is rendered offscreen every frame and then
//! shown through one of the two textured-quad pipelines.

use std::sync::Arc;

use cubeview_gpu::context::OFFSCREEN_FORMAT;
use cubeview_gpu::target::DEPTH_FORMAT;
use cubeview_gpu::{
    ClearColor, CroppedQuadPipeline, GpuContext, GpuError, MeshPipeline, Orbit, QuadPipeline,
    RenderTarget, TargetKey,
};
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::config::{AppConfig, ConfigError, DisplayMode};
use crate::panel::Panel;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("Failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

struct InputState {
    rotating: bool,
    moving_panel: bool,
    last_mouse_pos: Option<(f64, f64)>,
}

impl InputState {
    fn new() -> Self {
        Self {
            rotating: false,
            moving_panel: false,
            last_mouse_pos: None,
        }
    }
}

struct AppState {
    window: Arc<Window>,
    gpu_ctx: GpuContext,
    mesh: MeshPipeline,
    quad: QuadPipeline,
    cropped_quad: CroppedQuadPipeline,
    target: RenderTarget,
    quad_bind_group: wgpu::BindGroup,
    cropped_bind_group: wgpu::BindGroup,
    orbit: Orbit,
    panel: Panel,
    display_mode: DisplayMode,
    clear_color: ClearColor,
    input: InputState,
}

impl AppState {
    async fn new(window: Arc<Window>, config: &AppConfig) -> Result<Self, AppError> {
        let gpu_config = config.gpu.to_gpu_config();
        let gpu_ctx = GpuContext::with_config(window.clone(), gpu_config).await?;
        let format = gpu_ctx.target_format();

        let mesh = MeshPipeline::new(&gpu_ctx.device, OFFSCREEN_FORMAT, Some(DEPTH_FORMAT));
        let quad = QuadPipeline::new(&gpu_ctx.device, format);
        let cropped_quad = CroppedQuadPipeline::new(&gpu_ctx.device, format);

        let scale = window.scale_factor() as f32;
        let target = RenderTarget::new(
            &gpu_ctx.device,
            TargetKey::for_rect(config.panel_size.0, config.panel_size.1, scale),
        );
        let quad_bind_group = quad.create_bind_group(&gpu_ctx.device, target.texture());
        let cropped_bind_group = cropped_quad.create_bind_group(&gpu_ctx.device, target.texture());

        let logical = window.inner_size().to_logical::<f32>(scale as f64);
        let panel = Panel::centered(config.panel_size, (logical.width, logical.height));

        Ok(Self {
            window,
            gpu_ctx,
            mesh,
            quad,
            cropped_quad,
            target,
            quad_bind_group,
            cropped_bind_group,
            orbit: Orbit::new(config.drag_sensitivity),
            panel,
            display_mode: config.display_mode,
            clear_color: config.clear_color(),
            input: InputState::new(),
        })
    }

    fn scale(&self) -> f32 {
        self.window.scale_factor() as f32
    }

    fn resize(&mut self, new_width: u32, new_height: u32) {
        self.gpu_ctx.resize(new_width, new_height);
    }

    fn reset(&mut self) {
        self.orbit.reset();
        let scale = self.scale();
        let window = (
            self.gpu_ctx.width() as f32 / scale,
            self.gpu_ctx.height() as f32 / scale,
        );
        self.panel = Panel::centered(self.panel.size, window);
    }

    fn input(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::MouseInput { state, button, .. } => {
                let pressed = *state == ElementState::Pressed;
                match button {
                    MouseButton::Left => self.input.rotating = pressed,
                    // Only grab the panel when the press lands on it.
                    MouseButton::Right => {
                        self.input.moving_panel = pressed && self.cursor_over_panel();
                    }
                    _ => return false,
                }
                return true;
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Some((last_x, last_y)) = self.input.last_mouse_pos {
                    let dx = (position.x - last_x) as f32;
                    let dy = (position.y - last_y) as f32;
                    if self.input.rotating {
                        self.orbit.drag(dx, dy);
                    }
                    if self.input.moving_panel && self.display_mode == DisplayMode::Cropped {
                        let scale = self.scale();
                        self.panel.translate(dx / scale, dy / scale);
                    }
                }
                self.input.last_mouse_pos = Some((position.x, position.y));
                return self.input.rotating || self.input.moving_panel;
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(keycode),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => match keycode {
                KeyCode::KeyR => {
                    self.reset();
                    return true;
                }
                KeyCode::KeyC => {
                    self.display_mode = self.display_mode.toggled();
                    log::info!("Display mode: {:?}", self.display_mode);
                    return true;
                }
                _ => {}
            },
            _ => {}
        }
        false
    }

    fn cursor_over_panel(&self) -> bool {
        let Some((x, y)) = self.input.last_mouse_pos else {
            return false;
        };
        let scale = self.scale() as f64;
        self.panel.contains(((x / scale) as f32, (y / scale) as f32))
    }

    /// Size the offscreen target for the current display mode.
    fn target_key(&self) -> TargetKey {
        let scale = self.scale();
        match self.display_mode {
            DisplayMode::Full => TargetKey::for_rect(
                self.gpu_ctx.width() as f32 / scale,
                self.gpu_ctx.height() as f32 / scale,
                scale,
            ),
            DisplayMode::Cropped => {
                TargetKey::for_rect(self.panel.size.0, self.panel.size.1, scale)
            }
        }
    }

    fn render(&mut self) -> cubeview_gpu::Result<()> {
        let key = self.target_key();
        if self.target.ensure(&self.gpu_ctx.device, key) {
            let device = &self.gpu_ctx.device;
            self.quad_bind_group = self.quad.create_bind_group(device, self.target.texture());
            self.cropped_bind_group = self
                .cropped_quad
                .create_bind_group(device, self.target.texture());
        }

        let aspect = self.target.key().aspect_ratio();
        self.mesh.update_rotation(&self.gpu_ctx.queue, self.orbit.uniform(aspect));
        self.target
            .render(&self.gpu_ctx, self.clear_color, |pass| self.mesh.draw(pass));

        let placement = match self.display_mode {
            DisplayMode::Full => None,
            DisplayMode::Cropped => {
                let window_px = (self.gpu_ctx.width(), self.gpu_ctx.height());
                let placement = self.panel.placement(window_px, self.scale());
                if let Some(placement) = &placement {
                    self.cropped_quad
                        .update_visible_rect(&self.gpu_ctx.queue, placement.visible);
                }
                placement
            }
        };

        let output = self.gpu_ctx.current_frame()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu_ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Window Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(ClearColor::DARK_GRAY.into()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            match (self.display_mode, placement) {
                (DisplayMode::Full, _) => {
                    self.quad.draw(&mut render_pass, &self.quad_bind_group);
                }
                (DisplayMode::Cropped, Some(placement)) => {
                    let [x, y, w, h] = placement.viewport;
                    render_pass.set_viewport(x, y, w, h, 0.0, 1.0);
                    self.cropped_quad
                        .draw(&mut render_pass, &self.cropped_bind_group);
                }
                (DisplayMode::Cropped, None) => {}
            }
        }

        self.gpu_ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

struct CubeViewApp {
    config: AppConfig,
    window: Option<Arc<Window>>,
    state: Option<AppState>,
    error: Option<AppError>,
}

impl CubeViewApp {
    fn new(config: AppConfig) -> Self {
        Self {
            config,
            window: None,
            state: None,
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let window_attrs = WindowAttributes::default()
            .with_title(self.config.window.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        self.window = Some(window.clone());
        self.state = Some(pollster::block_on(AppState::new(window, &self.config))?);
        Ok(())
    }
}

impl ApplicationHandler for CubeViewApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init(event_loop) {
                log::error!("Failed to initialize: {}", e);
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };
        if state.input(&event) {
            return;
        }

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                state.resize(physical_size.width, physical_size.height);
            }
            WindowEvent::RedrawRequested => match state.render() {
                Ok(()) => {}
                Err(GpuError::Surface(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                    log::debug!("Surface lost, reconfiguring");
                    state.gpu_ctx.reconfigure();
                }
                Err(GpuError::Surface(wgpu::SurfaceError::OutOfMemory)) => {
                    log::error!("GPU out of memory");
                    event_loop.exit();
                }
                Err(e) => log::warn!("Render error: {}", e),
            },
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Open the window and run until it is closed.
pub fn run(config: AppConfig) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = CubeViewApp::new(config);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
