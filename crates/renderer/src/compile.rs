//! Embedded GLSL for the quad program and its compilation path.
//!
//! Both stages go through naga's GLSL front end. Compilation problems are
//! caught with a validation error scope and surfaced as [`ShaderError`]
//! values so the caller can log them and keep running instead of panicking
//! inside wgpu's uncaptured-error handler.

use std::borrow::Cow;

use thiserror::Error;
use wgpu::naga::ShaderStage;

/// Failure raised while turning GLSL into a usable render pipeline.
#[derive(Debug, Error)]
pub enum ShaderError {
    /// A single stage was rejected by the GLSL front end.
    #[error("{stage} shader failed to compile: {message}")]
    Compile {
        stage: &'static str,
        message: String,
    },
    /// The compiled stages could not be assembled into a pipeline.
    #[error("render pipeline rejected the shader program: {message}")]
    Link { message: String },
}

/// Compiles the quad vertex stage.
pub(crate) fn compile_vertex_shader(device: &wgpu::Device) -> Result<wgpu::ShaderModule, ShaderError> {
    compile_stage(
        device,
        "quad vertex",
        QUAD_VERTEX_GLSL,
        ShaderStage::Vertex,
        "vertex",
    )
}

/// Compiles the quad fragment stage.
pub(crate) fn compile_fragment_shader(
    device: &wgpu::Device,
) -> Result<wgpu::ShaderModule, ShaderError> {
    compile_stage(
        device,
        "quad fragment",
        QUAD_FRAGMENT_GLSL,
        ShaderStage::Fragment,
        "fragment",
    )
}

fn compile_stage(
    device: &wgpu::Device,
    label: &str,
    source: &'static str,
    stage: ShaderStage,
    stage_name: &'static str,
) -> Result<wgpu::ShaderModule, ShaderError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(source),
            stage,
            defines: &[],
        },
    });
    if let Some(error) = pollster::block_on(device.pop_error_scope()) {
        return Err(ShaderError::Compile {
            stage: stage_name,
            message: error.to_string(),
        });
    }
    Ok(module)
}

/// Vertex stage: applies the model transform and forwards color and UV.
///
/// The uniform block layout must match `QuadUniforms` in `gpu/uniforms.rs`.
/// OpenGL-style clip depth spans `[-w, w]` while wgpu expects `[0, w]`, so
/// the depth coordinate is remapped here; without it the quad clips out of
/// the view volume as soon as it pitches or yaws.
pub(crate) const QUAD_VERTEX_GLSL: &str = r"#version 450

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_color;
layout(location = 2) in vec2 a_tex_coord;

layout(location = 0) out vec4 v_color;
layout(location = 1) out vec2 v_tex_coord;

layout(std140, set = 0, binding = 0) uniform QuadParams {
    mat4 transform;
    float mix_value;
    float color_value;
    vec2 _padding;
} params;

void main() {
    gl_Position = params.transform * vec4(a_position, 1.0);
    gl_Position.z = (gl_Position.z + gl_Position.w) * 0.5;
    v_color = vec4(a_color, 1.0);
    v_tex_coord = a_tex_coord;
}
";

/// Fragment stage: blends the two textures, then overlays the vertex color.
pub(crate) const QUAD_FRAGMENT_GLSL: &str = r"#version 450

layout(location = 0) in vec4 v_color;
layout(location = 1) in vec2 v_tex_coord;

layout(location = 0) out vec4 out_color;

layout(std140, set = 0, binding = 0) uniform QuadParams {
    mat4 transform;
    float mix_value;
    float color_value;
    vec2 _padding;
} params;

layout(set = 1, binding = 0) uniform texture2D t_texture1;
layout(set = 1, binding = 1) uniform sampler s_texture1;
layout(set = 1, binding = 2) uniform texture2D t_texture2;
layout(set = 1, binding = 3) uniform sampler s_texture2;

void main() {
    vec4 first = texture(sampler2D(t_texture1, s_texture1), v_tex_coord);
    vec4 second = texture(sampler2D(t_texture2, s_texture2), v_tex_coord);
    out_color = mix(mix(first, second, params.mix_value), v_color, params.color_value / 2.0);
}
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_stages_declare_the_shared_uniform_block() {
        for source in [QUAD_VERTEX_GLSL, QUAD_FRAGMENT_GLSL] {
            assert!(source.contains("layout(std140, set = 0, binding = 0) uniform QuadParams"));
            assert!(source.contains("mat4 transform;"));
            assert!(source.contains("float mix_value;"));
            assert!(source.contains("float color_value;"));
        }
    }

    #[test]
    fn vertex_stage_consumes_three_attributes_and_remaps_depth() {
        assert!(QUAD_VERTEX_GLSL.contains("layout(location = 0) in vec3 a_position"));
        assert!(QUAD_VERTEX_GLSL.contains("layout(location = 1) in vec3 a_color"));
        assert!(QUAD_VERTEX_GLSL.contains("layout(location = 2) in vec2 a_tex_coord"));
        assert!(QUAD_VERTEX_GLSL.contains("gl_Position.z = (gl_Position.z + gl_Position.w) * 0.5"));
    }

    #[test]
    fn fragment_stage_applies_the_two_level_blend() {
        assert!(QUAD_FRAGMENT_GLSL.contains("sampler2D(t_texture1, s_texture1)"));
        assert!(QUAD_FRAGMENT_GLSL.contains("sampler2D(t_texture2, s_texture2)"));
        assert!(QUAD_FRAGMENT_GLSL.contains("mix(mix(first, second, params.mix_value)"));
        assert!(QUAD_FRAGMENT_GLSL.contains("params.color_value / 2.0"));
    }
}
