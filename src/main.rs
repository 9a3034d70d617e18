//! Wavescape - animated procedural ocean surface
//!
//! A subdivided plane displaced and shaded by a WGSL shader pair, a debug
//! panel over the shared wave parameters, and a render loop that orbits the
//! camera and re-uploads uniforms every frame.

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use wavescape::camera::OrbitCamera;
use wavescape::cli::Args;
use wavescape::clock::SceneClock;
use wavescape::ocean::{waves, OceanGrid, PLANE_EXTENT};
use wavescape::panel::DebugPanel;
use wavescape::params::{
    format_hex_color, CameraOrbit, ParamId, ParamValue, RecordingConfig, RenderConfig, WaveParams,
};
use wavescape::rendering::{OceanUniforms, RenderSystem, SkyUniforms};

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,
    panel: Option<DebugPanel>,

    // Scene state
    grid: OceanGrid,
    params: WaveParams,
    camera: OrbitCamera,
    render_config: RenderConfig,
    clock: SceneClock,

    // Configuration
    recording: Option<RecordingConfig>,
    panel_visible_at_start: bool,

    // First error raised inside the loop; reported after run_app returns.
    exit_error: Option<anyhow::Error>,
}

impl App {
    fn new(args: &Args) -> Result<Self> {
        let grid = OceanGrid::new(args.effective_subdivisions());
        let recording = args.create_recording_config()?;

        Ok(Self {
            window: None,
            render_system: None,
            panel: None,
            grid,
            params: WaveParams::default(),
            camera: OrbitCamera::new(CameraOrbit::default()),
            render_config: RenderConfig::default(),
            clock: SceneClock::new(),
            recording,
            panel_visible_at_start: !args.no_panel,
            exit_error: None,
        })
    }

    /// Scene composition: window, GPU bring-up, panel. Runs once.
    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window_attributes = Window::default_attributes()
            .with_title("Wavescape")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .context("failed to create window")?,
        );

        let render_system = pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            &self.grid,
            &self.render_config,
            self.recording.clone(),
        ))
        .context("failed to initialize rendering")?;

        let (width, height) = render_system.surface_extent();
        self.render_config.set_surface_size(width, height);

        let panel = DebugPanel::new(
            &window,
            &render_system.device,
            render_system.surface_format(),
            self.panel_visible_at_start,
        );

        info!(
            "scene composed: {0}x{0} grid, {1}x{2} surface",
            self.grid.subdivisions(),
            width,
            height
        );

        self.window = Some(window);
        self.render_system = Some(render_system);
        self.panel = Some(panel);

        // Elapsed time starts at first frame, not at GPU bring-up.
        self.clock = SceneClock::new();
        Ok(())
    }

    /// Render a single frame
    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        let Some(ref window) = self.window else {
            return;
        };
        let Some(ref render_system) = self.render_system else {
            return;
        };
        let Some(ref mut panel) = self.panel else {
            return;
        };

        // Strict per-frame order: sample the clock, publish the time slot,
        // evaluate the orbit, upload, render.
        let time_s = self.clock.elapsed_secs();
        self.params.set(ParamId::Time, ParamValue::Scalar(time_s));

        let (view_proj, _eye) = self.camera.view_proj(time_s, &self.render_config);

        let uniforms = OceanUniforms::new(view_proj, OceanGrid::model_matrix(), &self.params);
        render_system.update_uniforms(&uniforms);
        render_system.update_sky_uniforms(&SkyUniforms::new(view_proj.inverse()));

        let frame_num = self.clock.advance_frame() as usize;

        match render_system.render(window, panel, &mut self.params, frame_num) {
            Ok(()) => {}
            // Lost/outdated surfaces re-enter through the resize mechanism.
            Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                render_system.reconfigure();
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("surface timeout, skipping frame");
            }
            // Everything else is fatal to the loop.
            Err(e) => {
                error!("fatal surface error: {e}");
                self.exit_error = Some(anyhow!("fatal surface error: {e}"));
                event_loop.exit();
            }
        }

        if let Some(ref recording) = self.recording {
            if frame_num + 1 >= recording.total_frames() {
                info!("captured {} frames, exiting", recording.total_frames());
                event_loop.exit();
            }
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }
        if let Err(e) = self.init(event_loop) {
            self.exit_error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // The panel sees events first; interactions it consumes stop here.
        if let (Some(window), Some(panel)) = (self.window.as_ref(), self.panel.as_mut()) {
            if panel.on_window_event(window, &event) {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(code),
                        repeat: false,
                        ..
                    },
                ..
            } => match code {
                KeyCode::Escape => event_loop.exit(),
                KeyCode::KeyH => {
                    if let Some(panel) = self.panel.as_mut() {
                        panel.toggle();
                    }
                }
                _ => {}
            },
            WindowEvent::Resized(size) => {
                let scale_factor = self
                    .window
                    .as_ref()
                    .map(|w| w.scale_factor())
                    .unwrap_or(1.0);
                if let Some(render_system) = self.render_system.as_mut() {
                    let (width, height) = render_system.resize(size, scale_factor);
                    self.render_config.set_surface_size(width, height);
                }
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                let size = self.window.as_ref().map(|w| w.inner_size());
                if let (Some(size), Some(render_system)) = (size, self.render_system.as_mut()) {
                    let (width, height) = render_system.resize(size, scale_factor);
                    self.render_config.set_surface_size(width, height);
                }
            }
            WindowEvent::RedrawRequested => {
                self.render_frame(event_loop);
            }
            _ => {}
        }
    }
}

fn run(args: Args) -> Result<()> {
    let mut app = App::new(&args)?;
    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.run_app(&mut app).context("event loop error")?;

    match app.exit_error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// No window, no GPU: print the defaults, walk the orbit, and bound the wave
/// elevation with the CPU twin of the shader math.
fn headless_summary(args: &Args) -> Result<()> {
    let params = WaveParams::default();
    let camera = OrbitCamera::new(CameraOrbit::default());

    println!("wavescape headless summary");
    println!("parameters:");
    for id in ParamId::ALL {
        match params.get(id) {
            ParamValue::Scalar(v) => println!("  {:<22} {}", id.name(), v),
            ParamValue::Vec2([x, y]) => println!("  {:<22} ({}, {})", id.name(), x, y),
            ParamValue::Rgb(rgb) => println!("  {:<22} {}", id.name(), format_hex_color(rgb)),
        }
    }

    println!("camera orbit:");
    for t in [0.0f32, 1.0, 5.0] {
        let eye = camera.eye(t);
        let target = camera.target(t);
        println!(
            "  t={:<4} eye=({:.2}, {:.2}, {:.2}) target=({:.2}, {:.2}, {:.2})",
            t, eye.x, eye.y, eye.z, target.x, target.y, target.z
        );
    }

    // Clamp the sample count; elevation bounds converge well before 64.
    let n = args.effective_subdivisions().min(64);
    let half = PLANE_EXTENT / 2.0;
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for iy in 0..=n {
        for ix in 0..=n {
            let x = ix as f32 / n as f32 * PLANE_EXTENT - half;
            let z = iy as f32 / n as f32 * PLANE_EXTENT - half;
            let e = waves::surface_elevation(x, z, 0.0, &params);
            min = min.min(e);
            max = max.max(e);
        }
    }
    println!(
        "elevation over {n}x{n} samples at t=0: min={:.4} max={:.4}",
        min, max
    );

    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let result = if args.headless {
        headless_summary(&args)
    } else {
        run(args)
    };

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}
