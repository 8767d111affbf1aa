use anyhow::Result;
use glam::Mat4;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use winit::dpi::PhysicalSize;

use crate::controls::InteractionState;
use crate::types::{RasterMode, ViewerConfig, TEXTURE_SLOT_COUNT};

use super::context::GpuContext;
use super::mesh::QuadMesh;
use super::pipeline::{PipelineLayouts, PipelineSet};
use super::textures::{self, TextureReport, TextureResources};
use super::uniforms::QuadUniforms;

/// Background color behind the quad.
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.2,
    g: 0.3,
    b: 0.3,
    a: 1.0,
};

/// Owns every GPU resource of the viewer and draws one frame at a time.
///
/// Construction fails only for fatal conditions (no surface, no adapter,
/// no device). Shader and texture problems degrade instead: a failed
/// program leaves `pipelines` empty and frames clear-only, a failed
/// texture binds a placeholder, and both are visible through
/// [`GpuState::program_usable`] and [`GpuState::texture_reports`].
pub(crate) struct GpuState {
    context: GpuContext,
    mesh: QuadMesh,
    uniforms: QuadUniforms,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    textures: [TextureResources; TEXTURE_SLOT_COUNT],
    texture_bind_group: wgpu::BindGroup,
    pipelines: Option<PipelineSet>,
    raster_mode: RasterMode,
}

impl GpuState {
    pub(crate) fn new<T>(
        target: &T,
        initial_size: PhysicalSize<u32>,
        config: &ViewerConfig,
    ) -> Result<Self>
    where
        T: HasDisplayHandle + HasWindowHandle,
    {
        let context = GpuContext::new(target, initial_size)?;
        let layouts = PipelineLayouts::new(&context.device);
        let mesh = QuadMesh::new(&context.device);

        let uniform_buffer = context.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("uniform buffer"),
            size: std::mem::size_of::<QuadUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_bind_group = context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("uniform bind group"),
                layout: &layouts.uniform_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                }],
            });

        let textures = [
            textures::load_texture(&context.device, &context.queue, 0, &config.textures[0]),
            textures::load_texture(&context.device, &context.queue, 1, &config.textures[1]),
        ];
        let texture_bind_group = context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("texture bind group"),
                layout: &layouts.texture_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&textures[0].view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&textures[0].sampler),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::TextureView(&textures[1].view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: wgpu::BindingResource::Sampler(&textures[1].sampler),
                    },
                ],
            });

        let pipelines = match PipelineSet::build(&context.device, &layouts, context.surface_format)
        {
            Ok(set) => Some(set),
            Err(error) => {
                tracing::error!(error = %error, "shader program unusable; frames will only clear");
                None
            }
        };

        let uniforms = QuadUniforms::new();
        Self::write_uniforms(&context.queue, &uniform_buffer, &uniforms);

        Ok(Self {
            context,
            mesh,
            uniforms,
            uniform_buffer,
            uniform_bind_group,
            textures,
            texture_bind_group,
            pipelines,
            raster_mode: config.raster_mode,
        })
    }

    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.context.resize(new_size);
    }

    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        self.context.size
    }

    /// Fire-and-forget raster mode switch; the active mode lives here, not
    /// in the interaction state.
    pub(crate) fn set_raster_mode(&mut self, mode: RasterMode) {
        self.raster_mode = mode;
    }

    pub(crate) fn raster_mode(&self) -> RasterMode {
        self.raster_mode
    }

    /// False when shader compilation or pipeline assembly failed at startup.
    pub(crate) fn program_usable(&self) -> bool {
        self.pipelines.is_some()
    }

    pub(crate) fn texture_reports(&self) -> [&TextureReport; TEXTURE_SLOT_COUNT] {
        [&self.textures[0].report, &self.textures[1].report]
    }

    /// Draws one frame: uniforms are rewritten unconditionally, the pass
    /// clears, and the quad is drawn when the program is usable.
    pub(crate) fn render(
        &mut self,
        state: &InteractionState,
        transform: Mat4,
    ) -> Result<(), wgpu::SurfaceError> {
        let frame = self.context.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.uniforms.set_transform(transform);
        self.uniforms.set_blend(state.mix_value, state.color_value);
        Self::write_uniforms(&self.context.queue, &self.uniform_buffer, &self.uniforms);

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("quad pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            if let Some(pipelines) = &self.pipelines {
                render_pass.set_pipeline(pipelines.select(self.raster_mode));
                render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
                render_pass.set_bind_group(1, &self.texture_bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.mesh.vertex_slice());
                render_pass.set_index_buffer(self.mesh.index_slice(), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..self.mesh.index_count(), 0, 0..1);
            }
        }
        self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }

    fn write_uniforms(queue: &wgpu::Queue, buffer: &wgpu::Buffer, uniforms: &QuadUniforms) {
        queue.write_buffer(buffer, 0, bytemuck::bytes_of(uniforms));
    }
}
