#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Result};
use vello::Scene;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{CursorIcon, Window, WindowAttributes, WindowId};

use sunburst_rs::app::{App, AppPhase};
use sunburst_rs::config::ChartConfig;
use sunburst_rs::render::text::TextRenderer;
use sunburst_rs::render::{vello_scene, RenderState};
use sunburst_rs::ui::input::{self, ChartViewport, InputAction, MouseState};
use sunburst_rs::ui::overlay::{self, SidebarHitId, SidebarHitRegion};

const DEFAULT_CSV: &str = "companies.csv";

/// Main application handler for winit's event loop.
struct SunburstViewer {
    app: App,
    render_state: Option<RenderState>,
    window: Option<Arc<Window>>,
    scene: Scene,
    text_renderer: TextRenderer,
    mouse: MouseState,
    sidebar_hits: Vec<SidebarHitRegion>,
    viewport_width: f32,
    viewport_height: f32,
}

impl SunburstViewer {
    fn new(app: App) -> Self {
        let mut text_renderer = TextRenderer::new();
        if let Err(e) = text_renderer.load_system_font("default") {
            tracing::warn!("{}; labels will not be drawn", e);
        }

        Self {
            app,
            render_state: None,
            window: None,
            scene: Scene::new(),
            text_renderer,
            mouse: MouseState::default(),
            sidebar_hits: Vec::new(),
            viewport_width: 1280.0,
            viewport_height: 900.0,
        }
    }

    fn viewport(&self) -> ChartViewport {
        ChartViewport::fit(
            self.viewport_width as f64,
            self.viewport_height as f64,
            overlay::sidebar_inset() as f64,
            self.app.config.width,
        )
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn update_window_title(&self) {
        let Some(window) = &self.window else {
            return;
        };
        match (self.app.selector.current(), self.app.focus()) {
            (Some(root), Some(focus)) => {
                window.set_title(&format!("Sunburst - {} / {}", root, focus))
            }
            (Some(root), None) => window.set_title(&format!("Sunburst - {}", root)),
            _ => window.set_title("Sunburst"),
        }
    }

    fn update_cursor(&mut self) {
        let (x, y) = self.viewport().to_chart(self.mouse.x, self.mouse.y);
        let over_sidebar =
            overlay::hit_test_sidebar(&self.sidebar_hits, self.mouse.x, self.mouse.y).is_some();
        let clickable = over_sidebar
            || self
                .app
                .scene()
                .is_some_and(|s| input::click_target(s, x, y).is_some());
        if let Some(window) = &self.window {
            window.set_cursor(if clickable {
                CursorIcon::Pointer
            } else {
                CursorIcon::Default
            });
        }
    }

    fn open_file_dialog(&mut self) {
        let picked = rfd::FileDialog::new()
            .set_title("Open company CSV")
            .add_filter("CSV", &["csv"])
            .pick_file();
        if let Some(path) = picked {
            self.load(&path, None);
        }
    }

    fn load(&mut self, path: &Path, root: Option<&str>) {
        if let Err(e) = self.app.load_file(path, root) {
            tracing::error!("{:#}", e);
            self.app.last_error = Some(format!("{:#}", e));
        }
        self.update_window_title();
        self.request_redraw();
    }

    fn handle_action(&mut self, action: InputAction) {
        let now = Instant::now();
        match action {
            InputAction::Click { x, y, slow } => {
                if let Some(hit) = overlay::hit_test_sidebar(&self.sidebar_hits, x, y) {
                    match hit {
                        SidebarHitId::SelectRoot(index) => self.app.select_root_index(index),
                        SidebarHitId::OpenFile => self.open_file_dialog(),
                    }
                } else {
                    let (cx, cy) = self.viewport().to_chart(x, y);
                    if !self.app.click(cx, cy, slow, now) {
                        return;
                    }
                }
            }
            InputAction::ZoomOut { slow } => self.app.zoom_out(slow, now),
            InputAction::NextRoot => self.app.next_root(),
            InputAction::PreviousRoot => self.app.previous_root(),
            InputAction::OpenFile => self.open_file_dialog(),
            InputAction::Resize { width, height } => {
                self.viewport_width = width as f32;
                self.viewport_height = height as f32;
            }
            InputAction::Hover { .. } | InputAction::None => return,
        }
        self.update_window_title();
        self.request_redraw();
    }

    fn redraw(&mut self) {
        let animating = self.app.tick(Instant::now());
        let viewport = self.viewport();

        let message = match (&self.app.phase, &self.app.last_error) {
            (_, Some(error)) => Some(format!("Cannot draw this group: {}", error)),
            (AppPhase::WaitingForData, None) => {
                Some("No data loaded. Press O to open a CSV file.".to_string())
            }
            _ => None,
        };

        self.scene.reset();
        match self.app.scene() {
            Some(chart) => {
                vello_scene::paint_chart(&mut self.scene, chart, &viewport, &mut self.text_renderer)
            }
            None => {
                if let Some(message) = message {
                    overlay::render_message(
                        &mut self.scene,
                        &mut self.text_renderer,
                        &message,
                        viewport.center_x as f32,
                        viewport.center_y as f32,
                    );
                }
            }
        }

        self.sidebar_hits = overlay::render_left_sidebar(
            &mut self.scene,
            &mut self.text_renderer,
            self.viewport_height,
            self.app.selector.options(),
            self.app.selector.selected_index(),
        );

        if !animating {
            if let Some(info) = self.app.tooltip() {
                overlay::render_tooltip(
                    &mut self.scene,
                    &mut self.text_renderer,
                    &info,
                    self.mouse.x,
                    self.mouse.y,
                    self.viewport_width,
                    self.viewport_height,
                );
            }
        }

        if let Some(render) = &mut self.render_state {
            if let Err(e) = render.render(&self.scene) {
                tracing::error!("Render error: {}", e);
            }
        }

        if animating {
            self.request_redraw();
        }
    }
}

impl ApplicationHandler for SunburstViewer {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title("Sunburst")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 900));

        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                tracing::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());

        match pollster::block_on(RenderState::new(window.clone())) {
            Ok(state) => {
                let size = window.inner_size();
                tracing::info!(
                    "Window initialized: scale_factor={:.3}, physical_size={}x{}",
                    window.scale_factor(),
                    size.width,
                    size.height
                );
                self.viewport_width = size.width as f32;
                self.viewport_height = size.height as f32;
                self.render_state = Some(state);
                self.update_window_title();
                window.request_redraw();
            }
            Err(e) => {
                tracing::error!("Failed to initialize GPU: {:#}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(render) = &mut self.render_state {
                    render.resize(size.width, size.height);
                }
                self.handle_action(InputAction::Resize {
                    width: size.width,
                    height: size.height,
                });
            }

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                tracing::info!("Scale factor changed: {:.3}", scale_factor);
                if let Some(window) = self.window.clone() {
                    let size = window.inner_size();
                    if let Some(render) = &mut self.render_state {
                        render.resize(size.width, size.height);
                    }
                    self.handle_action(InputAction::Resize {
                        width: size.width,
                        height: size.height,
                    });
                }
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                self.mouse.alt_held = modifiers.state().alt_key();
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.mouse.x = position.x as f32;
                self.mouse.y = position.y as f32;
                let (x, y) = self.viewport().to_chart(self.mouse.x, self.mouse.y);
                if self.app.hover(x, y) {
                    self.request_redraw();
                }
                // Tooltips follow the pointer
                if self.app.hover_node.is_some() {
                    self.request_redraw();
                }
                self.update_cursor();
            }

            WindowEvent::CursorLeft { .. } => {
                if self.app.hover(f64::INFINITY, f64::INFINITY) {
                    self.request_redraw();
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Left {
                    self.mouse.left_pressed = state == ElementState::Pressed;
                }
                let action = input::process_mouse_button(button, state, &self.mouse);
                self.handle_action(action);
            }

            WindowEvent::KeyboardInput { event, .. } => {
                let action =
                    input::process_key(event.logical_key.clone(), event.state, self.mouse.alt_held);
                self.handle_action(action);
            }

            WindowEvent::RedrawRequested => self.redraw(),

            _ => {}
        }
    }
}

struct Args {
    csv: Option<PathBuf>,
    root: Option<String>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        csv: None,
        root: None,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--root" => match iter.next() {
                Some(root) => args.root = Some(root),
                None => bail!("--root needs a group name"),
            },
            "-h" | "--help" => {
                println!("Usage: sunburst [CSV] [--root NAME]");
                std::process::exit(0);
            }
            _ if args.csv.is_none() => args.csv = Some(PathBuf::from(arg)),
            _ => bail!("Unexpected argument '{}'", arg),
        }
    }
    Ok(args)
}

fn main() -> Result<()> {
    sunburst_rs::init_logging();
    let args = parse_args()?;

    let mut viewer = SunburstViewer::new(App::new(ChartConfig::default()));

    let csv = args.csv.or_else(|| {
        let fallback = PathBuf::from(DEFAULT_CSV);
        if fallback.exists() {
            Some(fallback)
        } else {
            rfd::FileDialog::new()
                .set_title("Open company CSV")
                .add_filter("CSV", &["csv"])
                .pick_file()
        }
    });
    match csv {
        Some(path) => {
            tracing::info!("Sunburst starting with {}", path.display());
            viewer.load(&path, args.root.as_deref());
        }
        None => tracing::warn!("No CSV selected; press O in the window to open one"),
    }

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);
    event_loop.run_app(&mut viewer)?;

    Ok(())
}
