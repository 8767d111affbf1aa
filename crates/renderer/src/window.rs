use std::sync::Arc;

use anyhow::{anyhow, Result};
use tracing::{error, info, warn};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowBuilder};

use crate::controls::{Control, HeldControls, InteractionState};
use crate::gpu::GpuState;
use crate::transform::model_matrix;
use crate::types::ViewerConfig;

/// Aggregates the window, GPU state, and interaction state for the viewer loop.
struct ViewerState {
    window: Arc<Window>,
    gpu: GpuState,
    held: HeldControls,
    interaction: InteractionState,
    close_requested: bool,
}

impl ViewerState {
    fn new(window: Arc<Window>, config: &ViewerConfig) -> Result<Self> {
        let size = window.inner_size();
        let gpu = GpuState::new(window.as_ref(), size, config)?;
        Ok(Self {
            window,
            gpu,
            held: HeldControls::new(),
            interaction: InteractionState::new(),
            close_requested: false,
        })
    }

    fn window(&self) -> &Window {
        self.window.as_ref()
    }

    fn size(&self) -> PhysicalSize<u32> {
        self.gpu.size()
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.gpu.resize(new_size);
    }

    fn handle_key_event(&mut self, event: &KeyEvent) {
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        let Some(control) = control_for_key(code) else {
            return;
        };
        // Repeat events re-press an already held control, which is a no-op.
        match event.state {
            ElementState::Pressed => self.held.press(control),
            ElementState::Released => self.held.release(control),
        }
    }

    /// Applies every held control to the interaction state, then draws the
    /// frame with the resulting transform.
    fn advance_frame(&mut self) -> Result<(), wgpu::SurfaceError> {
        let update = self.interaction.apply_held(&self.held);
        if update.close_requested {
            self.close_requested = true;
        }
        if let Some(mode) = update.raster_mode {
            self.gpu.set_raster_mode(mode);
        }
        let transform = model_matrix(&self.interaction);
        self.gpu.render(&self.interaction, transform)
    }
}

/// Maps a physical key to the control it drives. Keys outside this table are
/// ignored.
fn control_for_key(code: KeyCode) -> Option<Control> {
    let control = match code {
        KeyCode::Escape => Control::Quit,
        KeyCode::Digit1 => Control::LineMode,
        KeyCode::Digit2 => Control::FillMode,
        KeyCode::Digit3 => Control::PointMode,
        KeyCode::ArrowUp => Control::MixUp,
        KeyCode::ArrowDown => Control::MixDown,
        KeyCode::ArrowRight => Control::ColorUp,
        KeyCode::ArrowLeft => Control::ColorDown,
        KeyCode::KeyW => Control::PanUp,
        KeyCode::KeyA => Control::PanLeft,
        KeyCode::KeyS => Control::PanDown,
        KeyCode::KeyD => Control::PanRight,
        KeyCode::KeyQ => Control::ScaleDown,
        KeyCode::KeyE => Control::ScaleUp,
        KeyCode::KeyI => Control::PitchUp,
        KeyCode::KeyK => Control::PitchDown,
        KeyCode::KeyU => Control::YawUp,
        KeyCode::KeyO => Control::YawDown,
        KeyCode::KeyJ => Control::RollUp,
        KeyCode::KeyL => Control::RollDown,
        _ => return None,
    };
    Some(control)
}

/// Opens the viewer window and runs the event loop until the user quits.
pub(crate) fn run_viewer(config: ViewerConfig) -> Result<()> {
    let event_loop =
        EventLoop::new().map_err(|err| anyhow!("failed to create event loop: {err}"))?;
    let window_size = PhysicalSize::new(config.surface_size.0, config.surface_size.1);
    let window = WindowBuilder::new()
        .with_title(config.window_title.clone())
        .with_inner_size(window_size)
        .build(&event_loop)
        .map_err(|err| anyhow!("failed to create viewer window: {err}"))?;
    let window = Arc::new(window);

    let mut state = ViewerState::new(window.clone(), &config)?;

    let reports = state.gpu.texture_reports();
    info!(
        textures_loaded = reports.iter().filter(|report| report.loaded).count(),
        raster_mode = %state.gpu.raster_mode(),
        "viewer initialised"
    );
    if !state.gpu.program_usable() {
        warn!("shader program unavailable; presenting clear frames only");
    }

    state.window().request_redraw();

    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent { window_id, event } if window_id == state.window().id() => {
                match event {
                    WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                        elwt.exit();
                    }
                    WindowEvent::KeyboardInput { event, .. } => {
                        state.handle_key_event(&event);
                    }
                    WindowEvent::Focused(false) => {
                        // Releases are lost while unfocused; drop held keys so
                        // the quad does not keep drifting.
                        state.held.clear();
                    }
                    WindowEvent::Resized(new_size) => {
                        state.resize(new_size);
                    }
                    WindowEvent::ScaleFactorChanged {
                        mut inner_size_writer,
                        ..
                    } => {
                        let _ = inner_size_writer.request_inner_size(state.size());
                    }
                    WindowEvent::RedrawRequested => {
                        let frame = state.advance_frame();
                        if state.close_requested {
                            elwt.exit();
                        }
                        match frame {
                            Ok(()) => {}
                            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                                state.resize(state.size());
                            }
                            Err(wgpu::SurfaceError::OutOfMemory) => {
                                error!("surface out of memory; exiting viewer");
                                elwt.exit();
                            }
                            Err(other) => {
                                warn!(error = ?other, "surface error; retrying next frame");
                            }
                        }
                    }
                    _ => {}
                }
            }
            Event::AboutToWait => {
                state.window().request_redraw();
                elwt.set_control_flow(ControlFlow::Poll);
            }
            _ => {}
        })
        .map_err(|err| anyhow!("window event loop error: {err}"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::EVALUATION_ORDER;
    use std::collections::HashSet;

    const BOUND_KEYS: [KeyCode; 20] = [
        KeyCode::Escape,
        KeyCode::Digit1,
        KeyCode::Digit2,
        KeyCode::Digit3,
        KeyCode::ArrowUp,
        KeyCode::ArrowDown,
        KeyCode::ArrowRight,
        KeyCode::ArrowLeft,
        KeyCode::KeyW,
        KeyCode::KeyA,
        KeyCode::KeyS,
        KeyCode::KeyD,
        KeyCode::KeyQ,
        KeyCode::KeyE,
        KeyCode::KeyI,
        KeyCode::KeyK,
        KeyCode::KeyU,
        KeyCode::KeyO,
        KeyCode::KeyJ,
        KeyCode::KeyL,
    ];

    #[test]
    fn every_control_has_exactly_one_key() {
        let mapped: HashSet<Control> = BOUND_KEYS
            .iter()
            .filter_map(|code| control_for_key(*code))
            .collect();
        assert_eq!(mapped.len(), BOUND_KEYS.len());
        assert_eq!(mapped.len(), EVALUATION_ORDER.len());
        for control in EVALUATION_ORDER {
            assert!(mapped.contains(&control), "unbound control {control:?}");
        }
    }

    #[test]
    fn spot_check_bindings() {
        assert_eq!(control_for_key(KeyCode::Escape), Some(Control::Quit));
        assert_eq!(control_for_key(KeyCode::Digit2), Some(Control::FillMode));
        assert_eq!(control_for_key(KeyCode::ArrowUp), Some(Control::MixUp));
        assert_eq!(control_for_key(KeyCode::KeyD), Some(Control::PanRight));
        assert_eq!(control_for_key(KeyCode::KeyL), Some(Control::RollDown));
    }

    #[test]
    fn unbound_keys_are_ignored() {
        assert_eq!(control_for_key(KeyCode::Space), None);
        assert_eq!(control_for_key(KeyCode::KeyZ), None);
        assert_eq!(control_for_key(KeyCode::F1), None);
    }
}
