//! Model matrix assembly for the quad.

use glam::{Mat4, Vec3};

use crate::controls::InteractionState;

/// Builds the quad's model matrix from the current interaction state.
///
/// The matrix is rebuilt from identity every frame rather than accumulated,
/// so parameter changes stay absolute and repeated frames with unchanged
/// state produce bit-identical matrices. Composition order is translate,
/// rotate x, rotate y, rotate z, then uniform scale; putting translation
/// outermost keeps panning independent of the quad's own spin.
pub fn model_matrix(state: &InteractionState) -> Mat4 {
    Mat4::from_translation(Vec3::new(state.x_offset, state.y_offset, 0.0))
        * Mat4::from_rotation_x(state.x_rotate)
        * Mat4::from_rotation_y(state.y_rotate)
        * Mat4::from_rotation_z(state.z_rotate)
        * Mat4::from_scale(Vec3::splat(state.current_scale))
}
