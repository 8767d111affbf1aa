//! Renderer crate for Quadpilot, an interactive textured-quad viewer.
//!
//! The crate glues the winit window, the `wgpu` render pipeline, and the
//! keyboard interaction model together. The overall flow is:
//!
//! ```text
//!   CLI / quadpilot
//!          │ ViewerConfig
//!          ▼
//!   run_windowed ──▶ winit event loop ──▶ advance_frame()
//!                           │                   │
//!                           │                   ├─▶ InteractionState::apply_held()
//!                           │                   ├─▶ model_matrix() ─▶ GPU UBO
//!                           │                   └─▶ GpuState::render()
//!                           └─▶ key events ─▶ HeldControls
//! ```
//!
//! `GpuState` owns every GPU resource (surface, device, pipelines, mesh,
//! textures, uniforms), `InteractionState` owns the keyboard-driven values
//! feeding the transform and blend uniforms, and the window module owns the
//! event loop tying them together. Shader compilation and texture loading
//! degrade instead of aborting: a failed shader leaves the viewer presenting
//! clear frames, a failed texture becomes a 1x1 placeholder, and both states
//! stay queryable for logging and tests.

mod compile;
mod controls;
mod gpu;
mod transform;
mod types;
mod window;

pub use compile::ShaderError;
pub use controls::{
    Control, FrameUpdate, HeldControls, InteractionState, BLEND_STEP, EVALUATION_ORDER,
    MAX_SCALE, MAX_X_OFFSET, MAX_Y_OFFSET, MIN_SCALE, MIN_X_OFFSET, MIN_Y_OFFSET, OFFSET_STEP,
    ROTATE_STEP, SCALE_STEP,
};
pub use gpu::TextureReport;
pub use transform::model_matrix;
pub use types::{ColorChannels, RasterMode, TextureSource, ViewerConfig, TEXTURE_SLOT_COUNT};

use anyhow::Result;

/// Opens the viewer window and blocks until the user closes it.
///
/// Window or GPU acquisition failures are fatal and propagate out; shader
/// and texture problems are downgraded inside and only show up in the log
/// and in the degraded-state flags.
pub fn run_windowed(config: ViewerConfig) -> Result<()> {
    window::run_viewer(config)
}
