//! charon: Digital Forensics Explorer
//!
//! A GPU-rendered window showing an evidence container's file records as a
//! navigation tree, a detail/preview panel and a rotating 3D structure view.
//!
//! Uses vello/wgpu for rendering and winit for the window and input.

use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use vello::peniko::{Color, FontData};
use vello::util::{RenderContext, RenderSurface};
use vello::{AaConfig, Renderer, RendererOptions, Scene};
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, StartCause, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key as WinitKey, NamedKey};
use winit::window::{Fullscreen, Window};

use vello::wgpu;

use charon::composer;
use charon::config::ExplorerConfig;
use charon::draw::{ScenePainter, load_mono_font};
use charon::ingest::{BootstrapSource, ManifestSource, RecordSource};
use charon::input::{CONTROLS_HELP, InputEvent, Key, Reaction, Router};
use charon::layout::PanelLayout;
use charon::logging;
use charon::view::Explorer;

const BASE_COLOR: Color = Color::new([0.1, 0.1, 0.1, 1.0]);

/// Digital Forensics Explorer
#[derive(Parser, Debug)]
#[command(name = "charon", version, about = "Digital Forensics Explorer")]
struct Args {
    /// Configuration file (defaults to ~/.config/charon/config.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Evidence manifest (TOML) to load instead of the built-in sample image
    #[arg(short, long)]
    manifest: Option<PathBuf>,

    /// Seed for simulated preview bytes and timestamps
    #[arg(long, value_parser = clap::value_parser!(u64).range(..=i64::MAX as u64))]
    seed: Option<u64>,

    /// Start fullscreen
    #[arg(short, long)]
    fullscreen: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

#[derive(Debug)]
enum RenderState {
    Active {
        surface: Box<RenderSurface<'static>>,
        valid_surface: bool,
        window: Arc<Window>,
    },
    Suspended(Option<Arc<Window>>),
}

struct App {
    context: RenderContext,
    renderers: Vec<Option<Renderer>>,
    state: RenderState,
    scene: Scene,
    explorer: Explorer,
    router: Router,
    font_data: Option<FontData>,
    fullscreen: bool,
    cursor: PhysicalPosition<f64>,
    next_tick: Instant,
    /// Startup failure to report once the loop exits.
    fatal: Option<anyhow::Error>,
}

impl App {
    fn activate(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let RenderState::Suspended(cached_window) = &mut self.state else {
            return Ok(());
        };

        let window = match cached_window.take() {
            Some(window) => window,
            None => create_window(event_loop, self.explorer.config(), self.fullscreen)?,
        };

        let size = window.inner_size();
        let surface_future = self.context.create_surface(
            window.clone(),
            size.width,
            size.height,
            wgpu::PresentMode::AutoVsync,
        );
        let surface = pollster::block_on(surface_future)
            .map_err(|e| anyhow!("creating render surface: {e}"))?;

        self.renderers.resize_with(self.context.devices.len(), || None);
        if self.renderers[surface.dev_id].is_none() {
            self.renderers[surface.dev_id] = Some(create_renderer(&self.context, &surface)?);
        }

        info!(width = size.width, height = size.height, "Render surface ready");
        window.request_redraw();
        self.state = RenderState::Active {
            surface: Box::new(surface),
            valid_surface: true,
            window,
        };
        Ok(())
    }

    fn active_window(&self) -> Option<&Arc<Window>> {
        match &self.state {
            RenderState::Active { window, .. } => Some(window),
            RenderState::Suspended(_) => None,
        }
    }

    fn dispatch(&mut self, event_loop: &ActiveEventLoop, event: InputEvent) {
        let Some(window) = self.active_window().cloned() else {
            return;
        };
        let layout = layout_for(window.inner_size());
        match self.router.route(&mut self.explorer, &layout, event, Utc::now()) {
            Reaction::Redraw => window.request_redraw(),
            Reaction::Ignored => {}
            Reaction::ToggleFullscreen => {
                let next = match window.fullscreen() {
                    Some(_) => None,
                    None => Some(Fullscreen::Borderless(None)),
                };
                debug!(fullscreen = next.is_some(), "Toggling fullscreen");
                window.set_fullscreen(next);
                window.request_redraw();
            }
            Reaction::Quit => {
                info!("Quit requested");
                event_loop.exit();
            }
        }
    }
}

impl ApplicationHandler for App {
    fn new_events(&mut self, _event_loop: &ActiveEventLoop, cause: StartCause) {
        if let StartCause::ResumeTimeReached { .. } = cause {
            self.next_tick = Instant::now() + self.explorer.config().camera.idle_period();
            if let Some(window) = self.active_window().cloned() {
                let layout = layout_for(window.inner_size());
                self.router
                    .route(&mut self.explorer, &layout, InputEvent::Tick, Utc::now());
                window.request_redraw();
            }
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let Err(err) = self.activate(event_loop) {
            error!("Startup failed: {err:#}");
            self.fatal = Some(err);
            event_loop.exit();
        }
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        if let RenderState::Active { window, .. } = &self.state {
            self.state = RenderState::Suspended(Some(window.clone()));
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_tick));
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match &self.state {
            RenderState::Active { window, .. } if window.id() == window_id => {}
            _ => return,
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key,
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                if let Some(key) = translate_key(&logical_key) {
                    self.dispatch(event_loop, InputEvent::Key(key));
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = position;
                self.dispatch(
                    event_loop,
                    InputEvent::PointerMoved {
                        x: position.x,
                        y: position.y,
                    },
                );
            }

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                let event = match state {
                    ElementState::Pressed => InputEvent::PointerPressed {
                        x: self.cursor.x,
                        y: self.cursor.y,
                    },
                    ElementState::Released => InputEvent::PointerReleased,
                };
                self.dispatch(event_loop, event);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32,
                };
                self.dispatch(event_loop, InputEvent::Wheel(lines));
            }

            WindowEvent::Resized(size) => {
                if let RenderState::Active {
                    surface,
                    valid_surface,
                    window,
                } = &mut self.state
                {
                    if size.width != 0 && size.height != 0 {
                        self.context
                            .resize_surface(surface, size.width, size.height);
                        *valid_surface = true;
                        window.request_redraw();
                    } else {
                        *valid_surface = false;
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                let RenderState::Active {
                    surface,
                    valid_surface: true,
                    ..
                } = &mut self.state
                else {
                    return;
                };

                self.explorer.advance_progress();
                self.scene.reset();

                let layout = PanelLayout::compute(
                    surface.config.width as f64,
                    surface.config.height as f64,
                );
                {
                    let mut painter = ScenePainter::new(&mut self.scene, self.font_data.as_ref());
                    composer::render_frame(&mut painter, &self.explorer, &layout);
                }

                let Some(renderer) = self.renderers[surface.dev_id].as_mut() else {
                    error!(dev_id = surface.dev_id, "No renderer for surface device");
                    return;
                };
                if let Err(err) = present(&self.context, renderer, surface, &self.scene) {
                    error!("Frame presentation failed: {err:#}");
                }
            }

            _ => {}
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = logging::init();

    let mut config = ExplorerConfig::load(args.config.as_deref())?;
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    if args.print_config {
        print!("{}", config.to_toml().context("serializing config")?);
        return Ok(());
    }

    println!("{CONTROLS_HELP}");

    let ingested = match &args.manifest {
        Some(path) => ManifestSource::new(path).load()?,
        None => BootstrapSource::default().load()?,
    };

    let font_data = load_mono_font();
    if font_data.is_some() {
        info!("Loaded monospace font");
    } else {
        warn!("No system monospace font found, using bitmap fallback");
    }

    let next_tick = Instant::now() + config.camera.idle_period();
    let explorer = Explorer::new(ingested, config, Utc::now());

    let mut app = App {
        context: RenderContext::new(),
        renderers: vec![],
        state: RenderState::Suspended(None),
        scene: Scene::new(),
        explorer,
        router: Router::new(),
        font_data,
        fullscreen: args.fullscreen,
        cursor: PhysicalPosition::new(0.0, 0.0),
        next_tick,
        fatal: None,
    };

    let event_loop = EventLoop::new().context("creating event loop")?;
    event_loop.run_app(&mut app).context("running event loop")?;

    match app.fatal.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn translate_key(key: &WinitKey) -> Option<Key> {
    match key {
        WinitKey::Named(NamedKey::Escape) => Some(Key::Escape),
        WinitKey::Named(NamedKey::ArrowUp) => Some(Key::Up),
        WinitKey::Named(NamedKey::ArrowDown) => Some(Key::Down),
        WinitKey::Named(NamedKey::ArrowLeft) => Some(Key::Left),
        WinitKey::Named(NamedKey::ArrowRight) => Some(Key::Right),
        WinitKey::Named(NamedKey::PageUp) => Some(Key::PageUp),
        WinitKey::Named(NamedKey::PageDown) => Some(Key::PageDown),
        WinitKey::Character(s) => s.chars().next().map(Key::Char),
        _ => None,
    }
}

fn layout_for(size: PhysicalSize<u32>) -> PanelLayout {
    PanelLayout::compute(size.width as f64, size.height as f64)
}

fn present(
    context: &RenderContext,
    renderer: &mut Renderer,
    surface: &RenderSurface<'_>,
    scene: &Scene,
) -> Result<()> {
    let device_handle = &context.devices[surface.dev_id];

    renderer
        .render_to_texture(
            &device_handle.device,
            &device_handle.queue,
            scene,
            &surface.target_view,
            &vello::RenderParams {
                base_color: BASE_COLOR,
                width: surface.config.width,
                height: surface.config.height,
                antialiasing_method: AaConfig::Msaa16,
            },
        )
        .map_err(|e| anyhow!("rendering scene: {e}"))?;

    let surface_texture = surface
        .surface
        .get_current_texture()
        .context("acquiring surface texture")?;

    let mut encoder = device_handle
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Surface Blit"),
        });
    surface.blitter.copy(
        &device_handle.device,
        &mut encoder,
        &surface.target_view,
        &surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default()),
    );
    device_handle.queue.submit([encoder.finish()]);
    surface_texture.present();
    if let Err(err) = device_handle.device.poll(wgpu::PollType::Poll) {
        warn!("Device poll failed: {err}");
    }
    Ok(())
}

fn create_window(
    event_loop: &ActiveEventLoop,
    config: &ExplorerConfig,
    fullscreen: bool,
) -> Result<Arc<Window>> {
    let mut attr = Window::default_attributes()
        .with_title(config.window.title.clone())
        .with_inner_size(PhysicalSize::new(config.window.width, config.window.height));
    if fullscreen {
        attr = attr.with_fullscreen(Some(Fullscreen::Borderless(None)));
    }
    let window = event_loop.create_window(attr).context("creating window")?;
    Ok(Arc::new(window))
}

fn create_renderer(render_cx: &RenderContext, surface: &RenderSurface<'_>) -> Result<Renderer> {
    Renderer::new(
        &render_cx.devices[surface.dev_id].device,
        RendererOptions::default(),
    )
    .map_err(|e| anyhow!("creating renderer: {e}"))
}
