mod config;

use anyhow::{Context, Result};
use clap::Parser;
use config::Settings;
use cubecam_camera::{Camera, PoseReadout, Projection};
use cubecam_input::{Action, FlyController, FrameClock, FrameInput};
use cubecam_render::{FrameMatrices, LinkedProgram, TextureData};
use cubecam_render_wgpu::CubeRenderer;
use egui::Context as EguiContext;
use glam::{Vec2, Vec3};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

#[derive(Parser)]
#[command(name = "cubecam-desktop", about = "Fly around a textured cube")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory containing vertex.wgsl and fragment.wgsl
    #[arg(long)]
    shader_dir: Option<PathBuf>,

    /// Image file used as the cube texture
    #[arg(long)]
    texture: Option<PathBuf>,

    /// Start looking at this point (x,y,z)
    #[arg(long, value_delimiter = ',', num_args = 3, allow_negative_numbers = true)]
    look_at: Option<Vec<f32>>,
}

/// Per-run application state. Owned by the event loop handler and passed by
/// reference to the update and input routines.
struct AppState {
    camera: Camera,
    controller: FlyController,
    projection: Projection,
    clock: FrameClock,
    keys_held: HashSet<KeyCode>,
    look_delta: Vec2,
    mouse_captured: bool,
    show_hud: bool,
    last_dt: f32,
}

impl AppState {
    fn new(settings: &Settings) -> Self {
        let mut projection = settings.projection;
        projection.resize(settings.window.width, settings.window.height);

        let mut state = Self {
            camera: Camera::new(settings.camera.position, settings.camera.eulers),
            controller: FlyController::new(settings.controls),
            projection,
            clock: FrameClock::default(),
            keys_held: HashSet::new(),
            look_delta: Vec2::ZERO,
            mouse_captured: false,
            show_hud: true,
            last_dt: 0.0,
        };
        if let Some(target) = settings.camera.target {
            state.look_at(target);
        }
        state
    }

    /// Capture change for a right-button event. A release always ends mouse
    /// look, even when the HUD consumed it; a press over the HUD is ignored.
    fn look_capture(pressed: bool, over_hud: bool) -> Option<bool> {
        match (pressed, over_hud) {
            (false, _) => Some(false),
            (true, false) => Some(true),
            (true, true) => None,
        }
    }

    fn bound_action(key: KeyCode) -> Option<Action> {
        match key {
            KeyCode::KeyW => Some(Action::MoveForward),
            KeyCode::KeyS => Some(Action::MoveBackward),
            KeyCode::KeyA => Some(Action::StrafeLeft),
            KeyCode::KeyD => Some(Action::StrafeRight),
            KeyCode::Space => Some(Action::Ascend),
            KeyCode::ControlLeft => Some(Action::Descend),
            KeyCode::ShiftLeft | KeyCode::ShiftRight => Some(Action::Sprint),
            _ => None,
        }
    }

    /// Drain accumulated mouse motion and collect held actions.
    fn frame_input(&mut self, dt: f32) -> FrameInput {
        let mut input = FrameInput::new(dt).with_look(std::mem::take(&mut self.look_delta));
        input
            .actions
            .extend(self.keys_held.iter().copied().filter_map(Self::bound_action));
        input
    }

    fn update(&mut self, dt: f32) {
        self.last_dt = dt;
        let input = self.frame_input(dt);
        self.controller.apply(&mut self.camera, &input);
    }

    /// Raw mouse motion, `dy` positive downwards.
    fn mouse_moved(&mut self, dx: f32, dy: f32) {
        if self.mouse_captured {
            self.look_delta += Vec2::new(dx, -dy);
        }
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.keys_held.insert(key);
        } else {
            self.keys_held.remove(&key);
        }

        if !pressed {
            return;
        }

        match key {
            KeyCode::F1 => {
                self.show_hud = !self.show_hud;
            }
            KeyCode::KeyR => {
                self.look_at(Vec3::ZERO);
            }
            _ => {}
        }
    }

    fn look_at(&mut self, target: Vec3) {
        if !self.camera.can_look_at(target) {
            tracing::warn!("look-at target is straight above, below, or at the camera; ignored");
            return;
        }
        self.camera.look_at(target);
        tracing::info!("looking at ({:.1}, {:.1}, {:.1})", target.x, target.y, target.z);
    }

    fn draw_hud(&mut self, ctx: &EguiContext) {
        if !self.show_hud {
            return;
        }

        let pose = PoseReadout::capture(&self.camera);
        let fps = if self.last_dt > 0.0 { 1.0 / self.last_dt } else { 0.0 };
        let frames = self.clock.frame_count();
        let mut look_at_origin = false;

        egui::Window::new("Camera")
            .default_pos([10.0, 10.0])
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(format!(
                    "Position: ({:.2}, {:.2}, {:.2})",
                    pose.position[0], pose.position[1], pose.position[2]
                ));
                ui.label(format!(
                    "Pitch: {:.1}  Yaw: {:.1}  Roll: {:.1}",
                    pose.eulers.pitch, pose.eulers.yaw, pose.eulers.roll
                ));
                ui.label(format!(
                    "Forward: ({:.2}, {:.2}, {:.2})",
                    pose.forward[0], pose.forward[1], pose.forward[2]
                ));
                ui.label(format!("FPS: {fps:.0}  Frame: {frames}"));
                ui.separator();
                if ui.button("Look at origin (R)").clicked() {
                    look_at_origin = true;
                }
                ui.small("RMB: Look | WASD: Move | Space/Ctrl: Up/Down | Shift: Sprint | F1: HUD");
            });

        if look_at_origin {
            self.look_at(Vec3::ZERO);
        }
    }
}

/// GPU and windowing resources, created once the event loop resumes.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: CubeRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.renderer
            .resize(&self.device, self.config.width, self.config.height);
    }

    fn paint_hud(
        &mut self,
        ctx: &EguiContext,
        view: &wgpu::TextureView,
        full_output: egui::FullOutput,
    ) {
        self.egui_winit
            .handle_platform_output(&self.window, full_output.platform_output);

        let paint_jobs = ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            self.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

struct GpuApp {
    state: AppState,
    settings: Settings,
    program: LinkedProgram,
    texture: TextureData,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
    fatal: Option<anyhow::Error>,
}

impl GpuApp {
    fn new(settings: Settings, program: LinkedProgram, texture: TextureData) -> Self {
        Self {
            state: AppState::new(&settings),
            settings,
            program,
            texture,
            gpu: None,
            egui_ctx: EguiContext::default(),
            fatal: None,
        }
    }

    fn init_gpu(&mut self, event_loop: &ActiveEventLoop) -> Result<Gpu> {
        let attrs = Window::default_attributes()
            .with_title(self.settings.window.title.clone())
            .with_inner_size(PhysicalSize::new(
                self.settings.window.width,
                self.settings.window.height,
            ));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("failed to create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no compatible GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("cubecam_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("failed to create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        self.state.projection.resize(config.width, config.height);

        let renderer = CubeRenderer::new(
            &device,
            &queue,
            surface_format,
            config.width,
            config.height,
            &self.program,
            &self.texture,
        )
        .context("failed to build shader pipeline")?;

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(Gpu {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn set_mouse_captured(&mut self, captured: bool) {
        self.state.mouse_captured = captured;
        let Some(gpu) = &self.gpu else {
            return;
        };
        gpu.window.set_cursor_visible(!captured);
        let grab = if captured {
            gpu.window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| gpu.window.set_cursor_grab(CursorGrabMode::Confined))
        } else {
            gpu.window.set_cursor_grab(CursorGrabMode::None)
        };
        if let Err(e) = grab {
            tracing::debug!("cursor grab unavailable: {e}");
        }
    }

    fn redraw(&mut self) {
        let dt = self.state.clock.tick();
        self.state.update(dt);
        let time = self.state.clock.elapsed().as_secs_f32();

        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let matrices = FrameMatrices::new(&self.state.camera, &self.state.projection);
        gpu.renderer
            .render(&gpu.device, &gpu.queue, &view, &matrices, time);

        let raw_input = gpu.egui_winit.take_egui_input(&gpu.window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            self.state.draw_hud(ctx);
        });
        gpu.paint_hud(&self.egui_ctx, &view, full_output);

        output.present();
        gpu.window.request_redraw();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() || self.fatal.is_some() {
            return;
        }

        match self.init_gpu(event_loop) {
            Ok(gpu) => {
                self.gpu = Some(gpu);
                self.state.clock.start();
            }
            Err(e) => {
                tracing::error!("startup failed: {e:#}");
                self.fatal = Some(e);
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
        let over_hud = match &mut self.gpu {
            Some(gpu) => gpu.egui_winit.on_window_event(&gpu.window, &event).consumed,
            None => false,
        };

        if let WindowEvent::MouseInput {
            button: MouseButton::Right,
            state: btn_state,
            ..
        } = &event
        {
            let pressed = *btn_state == ElementState::Pressed;
            if let Some(captured) = AppState::look_capture(pressed, over_hud) {
                self.set_mouse_captured(captured);
            }
            return;
        }
        if over_hud {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size.width, new_size.height);
                    self.state
                        .projection
                        .resize(gpu.config.width, gpu.config.height);
                }
            }
            WindowEvent::Focused(false) => {
                self.state.keys_held.clear();
                self.set_mouse_captured(false);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                let pressed = key_state == ElementState::Pressed;
                if key == KeyCode::Escape && pressed {
                    if self.state.mouse_captured {
                        self.set_mouse_captured(false);
                    } else {
                        event_loop.exit();
                    }
                    return;
                }
                self.state.handle_key(key, pressed);
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.state.mouse_moved(delta.0 as f32, delta.1 as f32);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("cubecam-desktop starting");

    let mut settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if let Some([x, y, z]) = cli.look_at.as_deref().and_then(|v| <[f32; 3]>::try_from(v).ok()) {
        settings.camera.target = Some(Vec3::new(x, y, z));
    }

    // Shader build failure is fatal; never run with an unlinked program.
    let program = cubecam_render::build_program(cli.shader_dir.as_deref())
        .context("failed to build shader program")?;

    let texture = match &cli.texture {
        Some(path) => TextureData::load(path)?,
        None => TextureData::default(),
    };

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(settings, program, texture);
    event_loop.run_app(&mut app)?;

    match app.fatal.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        AppState::new(&Settings::default())
    }

    #[test]
    fn keys_map_to_actions() {
        assert_eq!(AppState::bound_action(KeyCode::KeyW), Some(Action::MoveForward));
        assert_eq!(AppState::bound_action(KeyCode::ShiftRight), Some(Action::Sprint));
        assert_eq!(AppState::bound_action(KeyCode::KeyQ), None);
    }

    #[test]
    fn mouse_motion_only_counts_while_captured() {
        let mut s = state();
        s.mouse_moved(5.0, 5.0);
        assert_eq!(s.look_delta, Vec2::ZERO);

        s.mouse_captured = true;
        s.mouse_moved(5.0, 2.0);
        s.mouse_moved(1.0, 1.0);
        // Screen y grows downwards; look y grows upwards.
        assert_eq!(s.look_delta, Vec2::new(6.0, -3.0));
    }

    #[test]
    fn frame_input_drains_look_delta() {
        let mut s = state();
        s.mouse_captured = true;
        s.mouse_moved(3.0, 0.0);
        s.handle_key(KeyCode::KeyW, true);
        s.handle_key(KeyCode::KeyQ, true);

        let input = s.frame_input(0.016);
        assert_eq!(input.look_delta, Vec2::new(3.0, 0.0));
        assert!(input.holds(Action::MoveForward));
        assert_eq!(input.actions.len(), 1);
        assert_eq!(s.look_delta, Vec2::ZERO);
    }

    #[test]
    fn update_moves_camera_forward() {
        let mut s = state();
        let start = s.camera.position;
        s.handle_key(KeyCode::KeyW, true);
        s.update(0.5);
        assert!(s.camera.position.z < start.z);

        s.handle_key(KeyCode::KeyW, false);
        let stopped = s.camera.position;
        s.update(0.5);
        assert_eq!(s.camera.position, stopped);
    }

    #[test]
    fn settings_target_starts_in_look_at_mode() {
        let mut settings = Settings::default();
        settings.camera.position = Vec3::new(0.0, 0.0, 5.0);
        settings.camera.target = Some(Vec3::ZERO);
        let s = AppState::new(&settings);
        assert!(s.camera.forward().abs_diff_eq(Vec3::NEG_Z, 1e-5));
    }

    #[test]
    fn settings_vertical_target_is_ignored() {
        let mut settings = Settings::default();
        settings.camera.position = Vec3::new(0.0, 0.0, 3.0);
        settings.camera.target = Some(Vec3::new(0.0, 5.0, 3.0));
        let s = AppState::new(&settings);

        let plain = Camera::new(settings.camera.position, settings.camera.eulers);
        assert_eq!(s.camera, plain);
        assert!(s.camera.view().is_finite());
        assert!(s.camera.eulers.roll.is_finite());
    }

    #[test]
    fn look_release_always_ends_capture() {
        assert_eq!(AppState::look_capture(false, true), Some(false));
        assert_eq!(AppState::look_capture(false, false), Some(false));
        assert_eq!(AppState::look_capture(true, false), Some(true));
        assert_eq!(AppState::look_capture(true, true), None);
    }

    #[test]
    fn vertical_look_at_is_ignored() {
        let mut s = state();
        let before = s.camera.clone();
        s.look_at(s.camera.position + Vec3::Y);
        assert_eq!(s.camera, before);
    }

    #[test]
    fn projection_tracks_window_size() {
        let s = state();
        assert!((s.projection.aspect - 800.0 / 600.0).abs() < 1e-6);
    }
}
