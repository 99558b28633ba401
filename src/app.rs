//! Window and event loop.
//!
//! Keyboard:
//! - Left / Right: move the control by one step
//! - PageDown / PageUp: move the control by ten steps
//! - Home: reset the control
//! - Tab: switch to the next effect
//! - O: open an image
//! - S: save the current result next to the input image
//! - Escape: quit

use std::path::PathBuf;
use std::sync::Arc;

use chroma_gpu::{GpuConfig, GpuContext};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::config::DemoConfig;
use crate::demo::Demo;
use crate::effect::EffectKind;
use crate::error::{DemoError, Result};
use crate::image_io;
use crate::pixel_filter::PixelBuffer;

const TEST_PATTERN_SIZE: (u32, u32) = (512, 512);

pub struct DemoApp {
    config: DemoConfig,
    image_path: Option<PathBuf>,
    source: Option<PixelBuffer>,
    effect: EffectKind,
    window: Option<Arc<Window>>,
    gpu_ctx: Option<GpuContext>,
    demo: Option<Demo>,
    /// Startup failure reported once the loop exits.
    fatal: Option<DemoError>,
}

impl DemoApp {
    pub fn new(config: DemoConfig) -> Self {
        Self {
            image_path: config.image_path.clone(),
            effect: config.effect,
            config,
            source: None,
            window: None,
            gpu_ctx: None,
            demo: None,
            fatal: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window_attrs = WindowAttributes::default()
            .with_title(self.config.window.title.clone())
            .with_inner_size(PhysicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));
        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .map_err(|e| DemoError::EventLoop(e.to_string()))?,
        );
        self.window = Some(window.clone());

        let gpu_ctx = pollster::block_on(GpuContext::with_config(window, GpuConfig::default()))?;
        self.gpu_ctx = Some(gpu_ctx);

        let source = match &self.image_path {
            Some(path) => image_io::load_image(path)?,
            None => {
                log::info!("No image configured, using test pattern");
                image_io::test_pattern(TEST_PATTERN_SIZE.0, TEST_PATTERN_SIZE.1)?
            }
        };
        self.source = Some(source);

        self.rebuild(self.effect)
    }

    /// Tear down the current demo and build `effect` over the current image.
    ///
    /// On failure the previous demo stays in place.
    fn rebuild(&mut self, effect: EffectKind) -> Result<()> {
        let (Some(ctx), Some(source)) = (&self.gpu_ctx, &self.source) else {
            return Ok(());
        };

        let demo = pollster::block_on(Demo::setup(ctx, &self.config, effect, source.clone()))?;
        let (width, height) = demo.image_size();
        self.demo = Some(demo);
        self.effect = effect;
        self.fit_window(width, height);
        self.update_title();
        Ok(())
    }

    /// Resize the window (and the surface with it) to the image.
    fn fit_window(&mut self, width: u32, height: u32) {
        let Some(window) = &self.window else {
            return;
        };
        if let Some(size) = window.request_inner_size(PhysicalSize::new(width, height)) {
            if let Some(ctx) = &mut self.gpu_ctx {
                ctx.resize(size.width, size.height);
            }
        }
    }

    fn update_title(&self) {
        let (Some(window), Some(demo)) = (&self.window, &self.demo) else {
            return;
        };
        let state = demo.state();
        window.set_title(&format!(
            "{} - {} {:.2}",
            self.config.window.title,
            demo.effect(),
            state.value()
        ));
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn open_image(&mut self) -> Result<()> {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &["png", "jpg", "jpeg", "bmp", "gif", "webp", "tif", "tiff"])
            .pick_file()
        else {
            return Ok(());
        };

        let source = image_io::load_image(&path)?;
        let previous = self.source.replace(source);
        if let Err(e) = self.rebuild(self.effect) {
            self.source = previous;
            return Err(e);
        }
        self.image_path = Some(path);
        Ok(())
    }

    fn save(&self) -> Result<()> {
        let Some(demo) = &self.demo else {
            return Ok(());
        };
        let input = self
            .image_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("test_pattern.png"));
        let path = demo.save_next_to(&input)?;
        log::info!("Saved {} result to {:?}", demo.effect(), path);
        Ok(())
    }

    /// Returns true when the frame needs to be redrawn.
    fn handle_key(&mut self, keycode: KeyCode) -> Result<bool> {
        let steps = match keycode {
            KeyCode::ArrowLeft => Some(-1),
            KeyCode::ArrowRight => Some(1),
            KeyCode::PageDown => Some(-10),
            KeyCode::PageUp => Some(10),
            _ => None,
        };

        if let Some(steps) = steps {
            if let (Some(demo), Some(ctx)) = (&mut self.demo, &self.gpu_ctx) {
                demo.step(ctx, steps)?;
                self.update_title();
                return Ok(true);
            }
            return Ok(false);
        }

        match keycode {
            KeyCode::Home => {
                if let (Some(demo), Some(ctx)) = (&mut self.demo, &self.gpu_ctx) {
                    demo.reset(ctx)?;
                    self.update_title();
                    return Ok(true);
                }
                Ok(false)
            }
            KeyCode::Tab => {
                let next = self.effect.next();
                // Restored if the next demo fails to build.
                let previous = self.demo.take();
                if let Err(e) = self.rebuild(next) {
                    self.demo = previous;
                    return Err(e);
                }
                log::info!("Switched to {} demo", next);
                Ok(true)
            }
            KeyCode::KeyO => {
                self.open_image()?;
                Ok(true)
            }
            KeyCode::KeyS => {
                self.save()?;
                Ok(false)
            }
            _ => Ok(false),
        }
    }

    fn render(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(demo), Some(ctx)) = (&self.demo, &mut self.gpu_ctx) else {
            return;
        };
        match demo.render(ctx) {
            Ok(_) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                ctx.resize(ctx.width(), ctx.height())
            }
            Err(wgpu::SurfaceError::OutOfMemory) => event_loop.exit(),
            Err(e) => log::error!("Render error: {:?}", e),
        }
    }

    /// Startup failure, if the app exited because of one.
    pub fn take_error(&mut self) -> Option<DemoError> {
        self.fatal.take()
    }
}

impl ApplicationHandler for DemoApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            log::error!("Failed to start: {}", e);
            self.fatal = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
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
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(keycode),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => match self.handle_key(keycode) {
                Ok(true) => self.request_redraw(),
                Ok(false) => {}
                Err(e) => log::error!("{}", e),
            },
            WindowEvent::Resized(physical_size) => {
                if let Some(ctx) = &mut self.gpu_ctx {
                    ctx.resize(physical_size.width, physical_size.height);
                }
                self.request_redraw();
            }
            WindowEvent::RedrawRequested => self.render(event_loop),
            _ => {}
        }
    }
}

/// Open the window and block until it closes.
pub fn run(config: DemoConfig) -> Result<()> {
    let event_loop = EventLoop::new().map_err(|e| DemoError::EventLoop(e.to_string()))?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = DemoApp::new(config);
    event_loop
        .run_app(&mut app)
        .map_err(|e| DemoError::EventLoop(e.to_string()))?;

    match app.take_error() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
