// Window module - hosts a graphics context in a desktop window
//
// Uses winit for the window and event loop and pixels to put the software
// rendered FrameSurface on screen. Window resizes are forwarded to the
// context so every virtual screen's geometry follows the window.

use super::surface::FrameSurface;
use crate::capture::save_screen_png;
use crate::color::{colors, Color4u};
use crate::config::GfxConfig;
use crate::context::GfxContext;
use crate::math::Vec2i;
use log::{error, info, warn};
use pixels::{Pixels, SurfaceTexture};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

/// Directory captures are written to
pub const CAPTURE_DIR: &str = "captures";

/// Application content drawn into the context each frame
pub trait Scene {
    /// Called once before the first frame to create screens and load assets
    fn setup(&mut self, gfx: &mut GfxContext);

    /// Draw one frame into the context's screens
    fn draw(&mut self, gfx: &mut GfxContext, frame: u64);

    /// Color the window is cleared to before screens are presented
    fn clear_color(&self) -> Color4u {
        colors::BLACK
    }
}

/// Desktop window presenting a graphics context
pub struct GfxWindow<S: Scene> {
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    surface: FrameSurface,
    gfx: GfxContext,
    scene: S,
    frame_duration: Duration,
    last_frame_time: Instant,
    frame: u64,
}

impl<S: Scene> GfxWindow<S> {
    /// Create the window host (the OS window is created when the event loop starts)
    pub fn new(config: GfxConfig, mut scene: S) -> Self {
        let frame_duration =
            Duration::from_micros(1_000_000 / config.window.target_fps.max(1) as u64);
        let size = config.window.size();

        let mut gfx = GfxContext::initialize(config);
        scene.setup(&mut gfx);

        Self {
            window: None,
            pixels: None,
            surface: FrameSurface::new(size),
            gfx,
            scene,
            frame_duration,
            last_frame_time: Instant::now(),
            frame: 0,
        }
    }

    pub fn context(&self) -> &GfxContext {
        &self.gfx
    }

    /// Tear down the window host, keeping the context
    pub fn into_context(self) -> GfxContext {
        self.gfx
    }

    /// Draw the scene, composite every screen and render the frame
    fn render(&mut self) -> Result<(), pixels::Error> {
        self.scene.draw(&mut self.gfx, self.frame);
        self.frame += 1;

        self.gfx.clear_window(self.scene.clear_color(), &mut self.surface);
        self.gfx.present(&mut self.surface);

        if let Some(pixels) = &mut self.pixels {
            self.surface.copy_to(pixels.frame_mut());
            pixels.render()?;
        }
        Ok(())
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        // Minimized windows report zero size; keep the last geometry
        if size.width == 0 || size.height == 0 {
            return;
        }

        if let Some(pixels) = &mut self.pixels {
            if let Err(err) = pixels
                .resize_surface(size.width, size.height)
                .and_then(|_| pixels.resize_buffer(size.width, size.height))
            {
                error!("failed to resize pixel buffer: {}", err);
                return;
            }
        }

        let size = Vec2i::new(size.width as i32, size.height as i32);
        self.surface.resize(size);
        self.gfx.on_window_resize(size);
    }

    /// Save every enabled screen as a PNG
    fn capture(&self) {
        let dir = PathBuf::from(CAPTURE_DIR);
        for id in self.gfx.screen_ids() {
            let screen = self.gfx.screen(id);
            if !screen.is_enabled() {
                continue;
            }
            if let Err(err) = save_screen_png(id, screen, &dir) {
                warn!("failed to capture {}: {}", id, err);
            }
        }
    }

    /// Check if enough time has passed for the next frame
    fn should_render_frame(&mut self) -> bool {
        if self.last_frame_time.elapsed() >= self.frame_duration {
            self.last_frame_time = Instant::now();
            true
        } else {
            false
        }
    }
}

impl<S: Scene> ApplicationHandler for GfxWindow<S> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let config = &self.gfx.config().window;
        let window_attributes = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(PhysicalSize::new(
                config.width.max(1) as u32,
                config.height.max(1) as u32,
            ))
            .with_resizable(true);

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                error!("failed to create window: {}", err);
                event_loop.exit();
                return;
            }
        };
        let window_size = window.inner_size();

        let surface_texture =
            SurfaceTexture::new(window_size.width, window_size.height, window.clone());

        let pixels = match Pixels::new(window_size.width, window_size.height, surface_texture) {
            Ok(pixels) => pixels,
            Err(err) => {
                error!("failed to create pixel buffer: {}", err);
                event_loop.exit();
                return;
            }
        };

        self.window = Some(window);
        self.pixels = Some(pixels);
        self.resize(window_size);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("close requested, exiting");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => self.resize(size),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => match code {
                KeyCode::Escape => event_loop.exit(),
                KeyCode::F12 => self.capture(),
                _ => {}
            },
            WindowEvent::RedrawRequested => {
                if self.should_render_frame() {
                    if let Err(err) = self.render() {
                        error!("render error: {}", err);
                        event_loop.exit();
                    }
                }

                if let Some(window) = &self.window {
                    window.request_redraw();
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

/// Create a window for `scene` and run until it is closed
pub fn run_window<S: Scene>(config: GfxConfig, scene: S) -> Result<(), Box<dyn std::error::Error>> {
    let event_loop = EventLoop::new()?;

    if config.window.vsync {
        event_loop.set_control_flow(ControlFlow::Wait);
    } else {
        event_loop.set_control_flow(ControlFlow::Poll);
    }

    info!(
        "starting window {}x{} at {} fps",
        config.window.width, config.window.height, config.window.target_fps
    );

    let mut host = GfxWindow::new(config, scene);
    event_loop.run_app(&mut host)?;

    host.into_context().shutdown();
    Ok(())
}
