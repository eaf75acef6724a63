use anyhow::{anyhow, Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId};

use crate::camera::Camera;
use crate::config::SystemConfig;
use crate::device::{Gpu, DEPTH_FORMAT};
use crate::input::platform::winit::translate_window_event;
use crate::input::{Input, KeyCode};
use crate::render::Graphics;
use crate::scene::TriangleModel;
use crate::shader::{ColorShader, ShaderSources};
use crate::time::FrameClock;

/// The demo scene: one color-shaded triangle.
pub type TriangleScene = Graphics<ColorShader, TriangleModel>;

/// Entry point for the runtime.
///
/// Opens the window, initializes the GPU and the scene, and renders until
/// the window is closed or Escape is pressed.
pub struct System;

impl System {
    /// Runs the message loop to completion.
    ///
    /// Startup failures and the first frame error end the loop and are
    /// returned; a close request or Escape ends it with `Ok`.
    pub fn run(config: SystemConfig) -> Result<()> {
        config.validate().context("invalid system configuration")?;

        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        state.shutdown();

        match state.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    input: Input,
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

enum FrameOutcome {
    Rendered,
    ExitRequested,
}

struct AppState {
    config: SystemConfig,

    // Field order is drop order: scene resources before the GPU context and window.
    graphics: Option<TriangleScene>,
    entry: Option<WindowEntry>,

    fatal: Option<anyhow::Error>,
    exit_requested: bool,
}

impl AppState {
    fn new(config: SystemConfig) -> Self {
        Self {
            config,
            graphics: None,
            entry: None,
            fatal: None,
            exit_requested: false,
        }
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_requested = true;
        event_loop.exit();
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        if self.fatal.is_none() {
            self.fatal = Some(err);
        }
        self.request_exit(event_loop);
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = window_attributes(event_loop, &self.config);
        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.config.gpu_init();
        let entry = WindowEntryTryBuilder {
            input: Input::new(),
            clock: FrameClock::new(),
            window,
            gpu_builder: |w| {
                pollster::block_on(Gpu::new(w, gpu_init))
                    .context("could not initialize the graphics context")
            },
        }
        .try_build()?;

        let graphics = entry.with_gpu(|gpu| build_scene(gpu, &self.config))?;

        entry.with_window(|w| w.request_redraw());
        self.graphics = Some(graphics);
        self.entry = Some(entry);
        log::info!("system initialized");
        Ok(())
    }

    /// Releases the scene, then the GPU context, then the window.
    fn shutdown(&mut self) {
        if self.graphics.take().is_some() {
            log::debug!("scene released");
        }
        if self.entry.take().is_some() {
            log::debug!("graphics context and window released");
        }
    }

    fn render_frame(&mut self) -> Result<FrameOutcome> {
        let (Some(graphics), Some(entry)) = (self.graphics.as_mut(), self.entry.as_mut()) else {
            return Err(anyhow!("frame requested before initialization"));
        };

        entry.with_mut(|fields| -> Result<FrameOutcome> {
            if fields.input.is_key_down(KeyCode::ESCAPE) {
                return Ok(FrameOutcome::ExitRequested);
            }

            let ft = fields.clock.tick();
            graphics.frame(fields.gpu, ft.dt)?;
            Ok(FrameOutcome::Rendered)
        })
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        let Some(entry) = self.entry.as_mut() else { return };
        entry.with_mut(|fields| {
            fields.gpu.resize(new_size);
            fields.clock.reset();
            fields.window.request_redraw();
        });
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() || self.exit_requested {
            return;
        }

        if let Err(e) = self.initialize(event_loop) {
            self.fail(event_loop, e.context("startup failed"));
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        // Render continuously, like a game loop.
        event_loop.set_control_flow(ControlFlow::Poll);
        if let Some(entry) = &self.entry {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        if let Some(ev) = translate_window_event(&event) {
            if let Some(entry) = self.entry.as_mut() {
                entry.with_mut(|fields| fields.input.apply_event(ev));
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                log::info!("close requested");
                self.request_exit(event_loop);
            }

            WindowEvent::Resized(new_size) => self.resize(new_size),

            WindowEvent::ScaleFactorChanged { .. } => {
                let Some(size) = self.entry.as_ref().map(|e| e.with_window(|w| w.inner_size()))
                else {
                    return;
                };
                self.resize(size);
            }

            WindowEvent::RedrawRequested => match self.render_frame() {
                Ok(FrameOutcome::Rendered) => {}
                Ok(FrameOutcome::ExitRequested) => {
                    log::info!("escape pressed, exiting");
                    self.request_exit(event_loop);
                }
                Err(e) => self.fail(event_loop, e),
            },

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.shutdown();
    }
}

fn build_scene(gpu: &Gpu<'_>, config: &SystemConfig) -> Result<TriangleScene> {
    let sources = ShaderSources::load_color(&config.shader_dir)
        .context("could not load the color shader")?;
    let shader = ColorShader::new(gpu.device(), gpu.surface_format(), DEPTH_FORMAT, &sources)
        .context("could not initialize the color shader")?;
    let model = TriangleModel::new(gpu.device());

    Ok(Graphics::new(Camera::default(), shader, model, config.clear_color))
}

fn window_attributes(event_loop: &ActiveEventLoop, config: &SystemConfig) -> WindowAttributes {
    let attrs = Window::default_attributes().with_title(config.title.clone());

    if config.fullscreen {
        return attrs.with_fullscreen(Some(Fullscreen::Borderless(event_loop.primary_monitor())));
    }

    let (w, h) = config.windowed_size;
    let size = PhysicalSize::new(w, h);
    let attrs = attrs.with_inner_size(size);

    match event_loop.primary_monitor() {
        Some(monitor) => {
            attrs.with_position(centered_position(monitor.position(), monitor.size(), size))
        }
        None => attrs,
    }
}

/// Top-left corner that centers `window` on a monitor.
fn centered_position(
    monitor_origin: PhysicalPosition<i32>,
    monitor_size: PhysicalSize<u32>,
    window: PhysicalSize<u32>,
) -> PhysicalPosition<i32> {
    let offset = |screen: u32, win: u32| (i64::from(screen) - i64::from(win)) / 2;
    PhysicalPosition::new(
        (i64::from(monitor_origin.x) + offset(monitor_size.width, window.width)) as i32,
        (i64::from(monitor_origin.y) + offset(monitor_size.height, window.height)) as i32,
    )
}
