use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use variant_viewer::cli::Cli;
use variant_viewer::core::{Button, Controller, FrameClock, WinitController};
use variant_viewer::loaders;
use variant_viewer::renderer::Renderer;
use variant_viewer::viewer::{ScrollKey, Viewer, ViewerConfig, ViewerEvent};

const INITIAL_WINDOW_WIDTH: u32 = 1280;
const INITIAL_WINDOW_HEIGHT: u32 = 800;

struct App {
    cli: Cli,
    config: ViewerConfig,
    proxy: EventLoopProxy<ViewerEvent>,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    viewer: Option<Viewer>,
    input: WinitController,
    clock: FrameClock,
}

impl App {
    fn new(cli: Cli, config: ViewerConfig, proxy: EventLoopProxy<ViewerEvent>) -> Self {
        Self {
            cli,
            config,
            proxy,
            window: None,
            renderer: None,
            viewer: None,
            input: WinitController::new(),
            clock: FrameClock::new(),
        }
    }

    fn start_model_load(&mut self) {
        let path = self.cli.model_path();
        log::info!("Loading model from {:?}", path);

        let proxy = self.proxy.clone();
        let spawned = loaders::spawn_model_load(path, move |result| {
            if proxy.send_event(ViewerEvent::ModelLoaded(result)).is_err() {
                log::warn!("Event loop closed before the model finished loading");
            }
        });

        if let (Err(e), Some(viewer)) = (spawned, &mut self.viewer) {
            viewer.fail_loading(&e);
        }
    }

    fn scroll_key(keycode: KeyCode) -> Option<ScrollKey> {
        match keycode {
            KeyCode::ArrowUp => Some(ScrollKey::LineUp),
            KeyCode::ArrowDown => Some(ScrollKey::LineDown),
            KeyCode::PageUp => Some(ScrollKey::PageUp),
            KeyCode::PageDown | KeyCode::Space => Some(ScrollKey::PageDown),
            KeyCode::Home => Some(ScrollKey::Home),
            KeyCode::End => Some(ScrollKey::End),
            _ => None,
        }
    }
}

impl ApplicationHandler<ViewerEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(
            Window::default_attributes()
                .with_title("Variant Viewer")
                .with_inner_size(winit::dpi::LogicalSize::new(
                    INITIAL_WINDOW_WIDTH,
                    INITIAL_WINDOW_HEIGHT,
                )),
        ) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        let viewer = Viewer::new(
            self.config.clone(),
            size.width,
            size.height,
            window.scale_factor() as f32,
        );

        let renderer = match pollster::block_on(Renderer::new(window.clone(), &viewer.context.settings)) {
            Ok(r) => r,
            Err(e) => {
                log::error!("Failed to initialize renderer: {}", e);
                event_loop.exit();
                return;
            }
        };

        self.window = Some(window);
        self.renderer = Some(renderer);
        self.viewer = Some(viewer);
        self.start_model_load();
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: ViewerEvent) {
        let (Some(window), Some(renderer), Some(viewer)) = (&self.window, &mut self.renderer, &mut self.viewer)
        else {
            return;
        };

        match event {
            ViewerEvent::ModelLoaded(Ok(assets)) => {
                renderer.upload_model(&assets);
                let report = viewer.install_model(assets, window.as_ref());
                // upload stalls the loop; start a fresh frame-rate window
                self.clock.reset();
                log::info!(
                    "Variant {:?}: {} meshes mapped, {} restored",
                    viewer.selected_variant(),
                    report.mapped,
                    report.restored
                );
            }
            ViewerEvent::ModelLoaded(Err(e)) => {
                viewer.fail_loading(&e);
                window.request_redraw();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let (Some(window), Some(renderer), Some(viewer)) = (&self.window, &mut self.renderer, &mut self.viewer)
        else {
            return;
        };

        // Let egui handle the event first
        if renderer.handle_event(window, &event) {
            return;
        }

        self.input.process_event(&event);

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
            } => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(keycode),
                        ..
                    },
                ..
            } => {
                if let Some(key) = Self::scroll_key(keycode) {
                    viewer.on_scroll_key(key, window.as_ref());
                }
            }
            WindowEvent::CursorMoved { .. } => {
                let (dx, dy) = self.input.take_mouse_delta();
                if self.input.is_down(Button::MouseLeft) {
                    viewer.on_orbit(dx, dy, window.as_ref());
                }
            }
            WindowEvent::MouseWheel { .. } => {
                let delta = self.input.take_wheel_delta();
                if self.input.is_down(Button::Control) {
                    viewer.on_zoom(delta, window.as_ref());
                } else if self.input.is_down(Button::Shift) && delta != 0.0 {
                    let key = if delta > 0.0 { ScrollKey::PageDown } else { ScrollKey::PageUp };
                    viewer.on_scroll_key(key, window.as_ref());
                } else {
                    viewer.on_scroll(delta, window.as_ref());
                }
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                viewer.set_pixel_ratio(scale_factor as f32);
            }
            WindowEvent::Resized(size) => {
                if viewer.on_resize(size.width, size.height, window.as_ref()) {
                    renderer.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                self.clock.tick();

                match renderer.render(viewer, window, self.clock.fps()) {
                    Ok(actions) => {
                        for action in actions {
                            viewer.handle_action(action, window.as_ref());
                        }
                    }
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => renderer.reconfigure(),
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of GPU memory");
                        event_loop.exit();
                    }
                    Err(e) => log::warn!("Render error: {}", e),
                }
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
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.viewer_config()?;

    let event_loop = EventLoop::<ViewerEvent>::with_user_event().build()?;
    let mut app = App::new(cli, config, event_loop.create_proxy());

    log::info!("Variant Viewer - Controls: scroll/arrows/PageUp/PageDown, Shift+wheel pages, drag to orbit, Ctrl+wheel to zoom, Escape to quit");
    event_loop.run_app(&mut app)?;

    Ok(())
}
