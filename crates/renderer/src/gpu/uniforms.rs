use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// CPU mirror of the shader's `QuadParams` std140 block.
///
/// Field order and padding must match the GLSL declaration in `compile.rs`:
/// a column-major mat4, the two blend scalars, then two floats of padding
/// rounding the block up to a 16-byte multiple.
#[repr(C, align(16))]
#[derive(Clone, Copy)]
pub(crate) struct QuadUniforms {
    pub transform: [[f32; 4]; 4],
    pub mix_value: f32,
    pub color_value: f32,
    pub _padding: [f32; 2],
}

unsafe impl Zeroable for QuadUniforms {}
unsafe impl Pod for QuadUniforms {}

impl QuadUniforms {
    /// Identity transform plus the startup blend values.
    pub(crate) fn new() -> Self {
        Self {
            transform: Mat4::IDENTITY.to_cols_array_2d(),
            mix_value: 0.2,
            color_value: 0.5,
            _padding: [0.0; 2],
        }
    }

    pub(crate) fn set_transform(&mut self, transform: Mat4) {
        self.transform = transform.to_cols_array_2d();
    }

    pub(crate) fn set_blend(&mut self, mix_value: f32, color_value: f32) {
        self.mix_value = mix_value;
        self.color_value = color_value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{align_of, size_of};

    #[test]
    fn quad_uniforms_follow_std140_layout() {
        let uniforms = QuadUniforms::new();
        let base = &uniforms as *const _ as usize;

        assert_eq!(align_of::<QuadUniforms>(), 16);
        assert_eq!(size_of::<QuadUniforms>(), 80);
        assert_eq!((&uniforms.transform as *const _ as usize) - base, 0);
        assert_eq!((&uniforms.mix_value as *const _ as usize) - base, 64);
        assert_eq!((&uniforms.color_value as *const _ as usize) - base, 68);
        assert_eq!((&uniforms._padding as *const _ as usize) - base, 72);
    }

    #[test]
    fn transform_is_stored_column_major() {
        let mut uniforms = QuadUniforms::new();
        let translation = Mat4::from_translation(glam::Vec3::new(0.1, -0.2, 0.0));
        uniforms.set_transform(translation);
        // glam writes the translation into the fourth column.
        assert_eq!(uniforms.transform[3][0], 0.1);
        assert_eq!(uniforms.transform[3][1], -0.2);
        assert_eq!(uniforms.transform[0][0], 1.0);
    }

    #[test]
    fn blend_setters_write_both_scalars() {
        let mut uniforms = QuadUniforms::new();
        uniforms.set_blend(0.75, 0.25);
        assert_eq!(uniforms.mix_value, 0.75);
        assert_eq!(uniforms.color_value, 0.25);
    }
}
