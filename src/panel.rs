//! Floating egui debug panel bound to the wave parameters.
//!
//! One slider per scalar parameter using the store's declared range, plus RGB
//! pickers for the two colors. Writes land in the store synchronously on the
//! event-loop thread; the next frame's uniform upload picks them up. Clamping
//! happens only at the UI layer.

use winit::event::WindowEvent;
use winit::window::Window;

use crate::params::{ParamId, WaveParams};

/// Fixed panel width (logical pixels).
pub const PANEL_WIDTH: f32 = 300.0;

pub struct DebugPanel {
    ctx: egui::Context,
    winit_state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
    visible: bool,
}

impl DebugPanel {
    pub fn new(
        window: &Window,
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        visible: bool,
    ) -> Self {
        let ctx = egui::Context::default();
        let winit_state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let renderer = egui_wgpu::Renderer::new(device, surface_format, None, 1, false);
        Self {
            ctx,
            winit_state,
            renderer,
            visible,
        }
    }

    /// Feed a window event to egui. Returns true when egui consumed it.
    pub fn on_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.winit_state.on_window_event(window, event).consumed
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Run the panel UI and draw it over the current frame.
    pub fn draw(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        window: &Window,
        view: &wgpu::TextureView,
        screen_size: [u32; 2],
        params: &mut WaveParams,
    ) {
        if !self.visible {
            return;
        }

        let raw_input = self.winit_state.take_egui_input(window);
        let full_output = self.ctx.run(raw_input, |ctx| {
            Self::controls(ctx, params);
        });
        self.winit_state
            .handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: screen_size,
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, image_delta);
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Panel Encoder"),
        });
        self.renderer
            .update_buffers(device, queue, &mut encoder, &paint_jobs, &screen_descriptor);

        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Panel Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                })
                .forget_lifetime();
            self.renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
        }

        queue.submit(std::iter::once(encoder.finish()));

        for id in &full_output.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }

    fn controls(ctx: &egui::Context, params: &mut WaveParams) {
        egui::Window::new("waves")
            .anchor(egui::Align2::RIGHT_TOP, [-8.0, 8.0])
            .default_width(PANEL_WIDTH)
            .resizable(false)
            .show(ctx, |ui| {
                slider(ui, &mut params.wavelength, ParamId::Wavelength);
                if let Some(r) = ParamId::Frequency.range() {
                    ui.add(
                        egui::Slider::new(&mut params.frequency[0], r.min..=r.max)
                            .step_by(r.step)
                            .text("frequency x"),
                    );
                    ui.add(
                        egui::Slider::new(&mut params.frequency[1], r.min..=r.max)
                            .step_by(r.step)
                            .text("frequency y"),
                    );
                }
                slider(ui, &mut params.wave_speed, ParamId::WaveSpeed);

                ui.separator();
                ui.horizontal(|ui| {
                    ui.color_edit_button_rgb(&mut params.depth_color);
                    ui.label(ParamId::DepthColor.name());
                });
                ui.horizontal(|ui| {
                    ui.color_edit_button_rgb(&mut params.surface_color);
                    ui.label(ParamId::SurfaceColor.name());
                });
                slider(ui, &mut params.color_offset, ParamId::ColorOffset);
                slider(ui, &mut params.color_multiplier, ParamId::ColorMultiplier);

                ui.separator();
                slider(ui, &mut params.small_wave_elevation, ParamId::SmallWaveElevation);
                slider(ui, &mut params.small_wave_frequency, ParamId::SmallWaveFrequency);
                slider(ui, &mut params.small_wave_speed, ParamId::SmallWaveSpeed);
            });
    }
}

fn slider(ui: &mut egui::Ui, value: &mut f32, id: ParamId) {
    if let Some(r) = id.range() {
        ui.add(
            egui::Slider::new(value, r.min..=r.max)
                .step_by(r.step)
                .text(id.name()),
        );
    }
}
