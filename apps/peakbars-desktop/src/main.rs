use anyhow::Result;
use clap::Parser;
use egui::Context as EguiContext;
use glam::Vec2;
use peakbars_assets::{DEFAULT_DATA_PATH, DatasetSource, ViewerConfig};
use peakbars_input::{ChartAction, DragButton, DragTracker};
use peakbars_render_wgpu::WgpuRenderer;
use peakbars_scene::ChartScene;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Fullscreen, Window, WindowId};

#[derive(Parser)]
#[command(name = "peakbars-desktop", about = "Interactive 3D population peak chart")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Dataset path or http(s) URL
    #[arg(long, default_value = DEFAULT_DATA_PATH)]
    data: DatasetSource,

    /// Viewer config (YAML)
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Application state.
struct AppState {
    scene: ChartScene,
    config: ViewerConfig,
    drag: DragTracker,
    fullscreen: bool,
}

impl AppState {
    fn new(scene: ChartScene, config: ViewerConfig) -> Self {
        Self {
            scene,
            fullscreen: config.window.fullscreen,
            config,
            drag: DragTracker::default(),
        }
    }

    fn cursor_moved(&mut self, position: Vec2) {
        for action in self.drag.cursor_moved(position) {
            self.scene.apply(action);
        }
    }

    /// Draw tooltips and the settings panel. Returns the fullscreen state
    /// when the checkbox changed it this frame.
    fn draw_ui(&mut self, ctx: &EguiContext) -> Option<bool> {
        let pixels_per_point = ctx.pixels_per_point();
        let widget = self.scene.widget();
        for (name, tooltip) in [("name_tooltip", widget.name_tooltip()), ("value_tooltip", widget.value_tooltip())] {
            if !tooltip.visible {
                continue;
            }
            let pos = tooltip.position / pixels_per_point;
            egui::Area::new(egui::Id::new(name))
                .fixed_pos(egui::pos2(pos.x, pos.y))
                .interactable(false)
                .show(ctx, |ui| {
                    egui::Frame::new()
                        .fill(egui::Color32::WHITE)
                        .stroke(egui::Stroke::new(1.0, egui::Color32::BLACK))
                        .inner_margin(egui::Margin::same(5))
                        .show(ui, |ui| {
                            ui.label(
                                egui::RichText::new(&tooltip.text)
                                    .size(14.0)
                                    .color(egui::Color32::BLACK),
                            );
                        });
                });
        }

        let mut toggled = None;
        egui::Window::new("Settings")
            .resizable(false)
            .default_pos(egui::pos2(12.0, 12.0))
            .show(ctx, |ui| {
                if ui.checkbox(&mut self.fullscreen, "Toggle Fullscreen").changed() {
                    toggled = Some(self.fullscreen);
                }
            });
        toggled
    }
}

/// Borderless fullscreen on the window's monitor, falling back to the
/// primary monitor.
fn borderless_fullscreen(window: &Window) -> Fullscreen {
    Fullscreen::Borderless(window.current_monitor().or_else(|| window.primary_monitor()))
}

fn set_fullscreen(window: &Window, enabled: bool) {
    if enabled {
        window.set_fullscreen(Some(borderless_fullscreen(window)));
        tracing::info!("entered fullscreen");
    } else {
        window.set_fullscreen(None);
        tracing::info!("left fullscreen");
    }
}

struct GpuApp {
    state: AppState,
    window: Option<Arc<Window>>,
    surface: Option<wgpu::Surface<'static>>,
    device: Option<wgpu::Device>,
    queue: Option<wgpu::Queue>,
    config: Option<wgpu::SurfaceConfiguration>,
    renderer: Option<WgpuRenderer>,
    egui_ctx: EguiContext,
    egui_winit: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
}

impl GpuApp {
    fn new(state: AppState) -> Self {
        Self {
            state,
            window: None,
            surface: None,
            device: None,
            queue: None,
            config: None,
            renderer: None,
            egui_ctx: EguiContext::default(),
            egui_winit: None,
            egui_renderer: None,
        }
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if let (Some(surface), Some(device), Some(config)) =
            (&self.surface, &self.device, &mut self.config)
        {
            config.width = new_size.width.max(1);
            config.height = new_size.height.max(1);
            surface.configure(device, config);
            if let Some(renderer) = &mut self.renderer {
                renderer.resize(device, config.width, config.height);
            }
        }
        self.state.scene.apply(ChartAction::Resize(Vec2::new(
            new_size.width as f32,
            new_size.height as f32,
        )));
    }

    fn redraw(&mut self) {
        if let Err(e) = self.state.scene.frame() {
            tracing::error!("frame update failed: {e}");
        }

        let (Some(window), Some(surface), Some(device), Some(queue), Some(config)) = (
            &self.window,
            &self.surface,
            &self.device,
            &self.queue,
            &self.config,
        ) else {
            return;
        };

        let output = match surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                surface.configure(device, config);
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

        if let Some(renderer) = &mut self.renderer {
            renderer.render(device, queue, &view, &self.state.scene.render_frame());
        }

        let (Some(egui_winit), Some(egui_renderer)) =
            (self.egui_winit.as_mut(), self.egui_renderer.as_mut())
        else {
            output.present();
            return;
        };

        let raw_input = egui_winit.take_egui_input(window);
        let mut fullscreen_request = None;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            fullscreen_request = self.state.draw_ui(ctx);
        });
        egui_winit.handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [config.width, config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            egui_renderer.update_texture(device, queue, *id, image_delta);
        }
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("egui_encoder"),
        });
        egui_renderer.update_buffers(device, queue, &mut encoder, &paint_jobs, &screen_descriptor);
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
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
            egui_renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            egui_renderer.free_texture(id);
        }

        output.present();

        if let Some(enabled) = fullscreen_request {
            set_fullscreen(window, enabled);
        }
        window.request_redraw();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_config = &self.state.config.window;
        let attrs = Window::default_attributes()
            .with_title(window_config.title.clone())
            .with_inner_size(PhysicalSize::new(window_config.width, window_config.height));
        let window = Arc::new(event_loop.create_window(attrs).expect("create window"));
        if self.state.fullscreen {
            set_fullscreen(&window, true);
        }

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .expect("create surface");

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .expect("find adapter");

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("peakbars_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .expect("create device");

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        self.state.scene.resize(size.width, size.height);

        let renderer = WgpuRenderer::new(&device, surface_format, size.width, size.height);

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        self.window = Some(window);
        self.surface = Some(surface);
        self.device = Some(device);
        self.queue = Some(queue);
        self.config = Some(config);
        self.renderer = Some(renderer);
        self.egui_winit = Some(egui_winit);
        self.egui_renderer = Some(egui_renderer);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let (Some(egui_winit), Some(window)) = (&mut self.egui_winit, &self.window) {
            let response = egui_winit.on_window_event(window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                self.resize(new_size);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.state
                    .cursor_moved(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::CursorLeft { .. } => {
                self.state.drag.reset();
            }
            WindowEvent::MouseInput { button, state, .. } => {
                let pressed = state == ElementState::Pressed;
                match button {
                    MouseButton::Left => self.state.drag.button(DragButton::Primary, pressed),
                    MouseButton::Right => self.state.drag.button(DragButton::Secondary, pressed),
                    _ => {}
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let steps = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => (p.y as f32).signum(),
                };
                if steps != 0.0 {
                    self.state.scene.apply(ChartAction::Zoom(steps));
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("peakbars-desktop starting");

    let config = match &cli.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };

    // No window is created unless the dataset loads.
    let scene = match ChartScene::load(&cli.data, &config) {
        Ok(scene) => scene,
        Err(e) => {
            tracing::error!(source = %cli.data, "failed to load dataset: {e}");
            return Err(e.into());
        }
    };

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(AppState::new(scene, config));
    event_loop.run_app(&mut app)?;

    Ok(())
}
