//! Keyboard-driven interaction state.
//!
//! The viewer polls held keys once per frame and folds every held control
//! into [`InteractionState`] in a fixed order. All updates are absolute
//! steps against clamped or wrapped fields, so holding opposing keys can
//! never drift the state outside its documented ranges.

use std::collections::HashSet;
use std::f32::consts::TAU;

use crate::types::RasterMode;

/// Per-frame step for the two blend factors.
pub const BLEND_STEP: f32 = 0.01;
/// Per-frame step for the x/y pan offsets.
pub const OFFSET_STEP: f32 = 0.01;
/// Per-frame step for the uniform scale factor.
pub const SCALE_STEP: f32 = 0.01;
/// Per-frame step for the rotation angles, in radians.
pub const ROTATE_STEP: f32 = 0.02;

pub const MIN_X_OFFSET: f32 = -0.4;
pub const MAX_X_OFFSET: f32 = 0.4;
pub const MIN_Y_OFFSET: f32 = -0.4;
pub const MAX_Y_OFFSET: f32 = 0.4;
pub const MIN_SCALE: f32 = 0.1;
pub const MAX_SCALE: f32 = 1.0;

/// One keyboard-addressable action.
///
/// Controls are deliberately named after what they do to the state rather
/// than after the physical key bound to them; the key map lives with the
/// window layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    /// Request a clean shutdown at the next frame boundary.
    Quit,
    /// Rasterize triangle edges only.
    LineMode,
    /// Rasterize filled triangles (the startup mode).
    FillMode,
    /// Rasterize vertices as points.
    PointMode,
    /// Blend further towards the second texture.
    MixUp,
    /// Blend back towards the first texture.
    MixDown,
    /// Strengthen the per-vertex color overlay.
    ColorUp,
    /// Weaken the per-vertex color overlay.
    ColorDown,
    PanUp,
    PanLeft,
    PanDown,
    PanRight,
    ScaleDown,
    ScaleUp,
    PitchUp,
    PitchDown,
    YawUp,
    YawDown,
    RollUp,
    RollDown,
}

/// Order in which held controls are applied within a single frame.
///
/// The order is part of the observable behaviour: when several raster-mode
/// controls are held at once the last one in this list wins, and quit is
/// latched before any state mutation.
pub const EVALUATION_ORDER: [Control; 20] = [
    Control::Quit,
    Control::LineMode,
    Control::FillMode,
    Control::PointMode,
    Control::MixUp,
    Control::MixDown,
    Control::ColorUp,
    Control::ColorDown,
    Control::PanUp,
    Control::PanLeft,
    Control::PanDown,
    Control::PanRight,
    Control::ScaleDown,
    Control::ScaleUp,
    Control::PitchUp,
    Control::PitchDown,
    Control::YawUp,
    Control::YawDown,
    Control::RollUp,
    Control::RollDown,
];

/// Set of controls whose keys are currently held down.
///
/// Press and release are idempotent, so key-repeat events need no special
/// treatment. The window layer clears the whole set on focus loss because
/// release events stop arriving once another surface has the keyboard.
#[derive(Debug, Clone, Default)]
pub struct HeldControls {
    held: HashSet<Control>,
}

impl HeldControls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, control: Control) {
        self.held.insert(control);
    }

    pub fn release(&mut self, control: Control) {
        self.held.remove(&control);
    }

    pub fn clear(&mut self) {
        self.held.clear();
    }

    pub fn is_held(&self, control: Control) -> bool {
        self.held.contains(&control)
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }
}

/// Everything the keyboard can change about the rendered quad.
///
/// The transform inputs are absolute values rebuilt into a matrix every
/// frame; nothing here accumulates matrices across frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionState {
    /// Blend factor between the two textures, in `[0, 1]`.
    pub mix_value: f32,
    /// Weight of the per-vertex color overlay, in `[0, 1]`.
    pub color_value: f32,
    /// Horizontal pan, in `[-0.4, 0.4]` clip-space units.
    pub x_offset: f32,
    /// Vertical pan, in `[-0.4, 0.4]` clip-space units.
    pub y_offset: f32,
    /// Uniform scale applied to the quad, in `[0.1, 1.0]`.
    pub current_scale: f32,
    /// Rotation about the x axis, radians wrapped to `(-2pi, 2pi]`.
    pub x_rotate: f32,
    /// Rotation about the y axis, radians wrapped to `(-2pi, 2pi]`.
    pub y_rotate: f32,
    /// Rotation about the z axis, radians wrapped to `(-2pi, 2pi]`.
    pub z_rotate: f32,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self {
            mix_value: 0.2,
            color_value: 0.5,
            x_offset: 0.0,
            y_offset: 0.0,
            current_scale: 1.0,
            x_rotate: 0.0,
            y_rotate: 0.0,
            z_rotate: 0.0,
        }
    }
}

/// Frame-level requests produced while applying held controls.
///
/// Raster-mode switches are fire-and-forget: the GPU layer holds the active
/// mode, so a held key simply reissues the same request every frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameUpdate {
    /// Set when quit was held; honoured after the current frame presents.
    pub close_requested: bool,
    /// Last raster mode requested this frame, if any mode key was held.
    pub raster_mode: Option<RasterMode>,
}

impl InteractionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies every held control once, in [`EVALUATION_ORDER`].
    pub fn apply_held(&mut self, held: &HeldControls) -> FrameUpdate {
        let mut update = FrameUpdate::default();
        for control in EVALUATION_ORDER {
            if !held.is_held(control) {
                continue;
            }
            match control {
                Control::Quit => update.close_requested = true,
                Control::LineMode => update.raster_mode = Some(RasterMode::Line),
                Control::FillMode => update.raster_mode = Some(RasterMode::Fill),
                Control::PointMode => update.raster_mode = Some(RasterMode::Point),
                Control::MixUp => self.mix_value = (self.mix_value + BLEND_STEP).min(1.0),
                Control::MixDown => self.mix_value = (self.mix_value - BLEND_STEP).max(0.0),
                Control::ColorUp => self.color_value = (self.color_value + BLEND_STEP).min(1.0),
                Control::ColorDown => self.color_value = (self.color_value - BLEND_STEP).max(0.0),
                Control::PanUp => {
                    self.y_offset = (self.y_offset + OFFSET_STEP).min(MAX_Y_OFFSET);
                }
                Control::PanLeft => {
                    self.x_offset = (self.x_offset - OFFSET_STEP).max(MIN_X_OFFSET);
                }
                Control::PanDown => {
                    self.y_offset = (self.y_offset - OFFSET_STEP).max(MIN_Y_OFFSET);
                }
                Control::PanRight => {
                    self.x_offset = (self.x_offset + OFFSET_STEP).min(MAX_X_OFFSET);
                }
                Control::ScaleDown => {
                    self.current_scale = (self.current_scale - SCALE_STEP).max(MIN_SCALE);
                }
                Control::ScaleUp => {
                    self.current_scale = (self.current_scale + SCALE_STEP).min(MAX_SCALE);
                }
                Control::PitchUp => self.x_rotate = wrap_increment(self.x_rotate),
                Control::PitchDown => self.x_rotate = wrap_decrement(self.x_rotate),
                Control::YawUp => self.y_rotate = wrap_increment(self.y_rotate),
                Control::YawDown => self.y_rotate = wrap_decrement(self.y_rotate),
                Control::RollUp => self.z_rotate = wrap_increment(self.z_rotate),
                Control::RollDown => self.z_rotate = wrap_decrement(self.z_rotate),
            }
        }
        update
    }
}

/// Steps an angle forward, wrapping past `2pi` back by a full turn.
fn wrap_increment(angle: f32) -> f32 {
    let next = angle + ROTATE_STEP;
    if next > TAU {
        next - TAU
    } else {
        next
    }
}

/// Steps an angle backward, wrapping at or below `-2pi` forward by a turn.
fn wrap_decrement(angle: f32) -> f32 {
    let next = angle - ROTATE_STEP;
    if next <= -TAU {
        next + TAU
    } else {
        next
    }
}
