use crate::compile::{compile_fragment_shader, compile_vertex_shader, ShaderError};
use crate::types::{RasterMode, TEXTURE_SLOT_COUNT};

use super::mesh::Vertex;

/// Bind group layouts shared by every pipeline variant.
///
/// Group 0 carries the uniform block, visible to both stages; group 1
/// carries the two texture/sampler pairs for the fragment stage.
pub(crate) struct PipelineLayouts {
    pub uniform_layout: wgpu::BindGroupLayout,
    pub texture_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
}

impl PipelineLayouts {
    pub(crate) fn new(device: &wgpu::Device) -> Self {
        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture layout"),
            entries: &build_texture_layout_entries(),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("quad pipeline layout"),
            bind_group_layouts: &[&uniform_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        Self {
            uniform_layout,
            texture_layout,
            pipeline_layout,
        }
    }
}

fn build_texture_layout_entries() -> Vec<wgpu::BindGroupLayoutEntry> {
    let mut entries = Vec::with_capacity(TEXTURE_SLOT_COUNT * 2);
    for slot in 0..TEXTURE_SLOT_COUNT as u32 {
        entries.push(wgpu::BindGroupLayoutEntry {
            binding: slot * 2,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        });
        entries.push(wgpu::BindGroupLayoutEntry {
            binding: slot * 2 + 1,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        });
    }
    entries
}

/// One render pipeline per raster mode.
///
/// Fill always exists; line and point are built only when the device was
/// created with the matching polygon-mode feature.
pub(crate) struct PipelineSet {
    fill: wgpu::RenderPipeline,
    line: Option<wgpu::RenderPipeline>,
    point: Option<wgpu::RenderPipeline>,
}

impl PipelineSet {
    pub(crate) fn build(
        device: &wgpu::Device,
        layouts: &PipelineLayouts,
        surface_format: wgpu::TextureFormat,
    ) -> Result<Self, ShaderError> {
        let vertex_module = compile_vertex_shader(device)?;
        let fragment_module = compile_fragment_shader(device)?;

        let fill = create_variant(
            device,
            layouts,
            surface_format,
            &vertex_module,
            &fragment_module,
            wgpu::PolygonMode::Fill,
        )?;

        let features = device.features();
        let line = if features.contains(wgpu::Features::POLYGON_MODE_LINE) {
            Some(create_variant(
                device,
                layouts,
                surface_format,
                &vertex_module,
                &fragment_module,
                wgpu::PolygonMode::Line,
            )?)
        } else {
            tracing::warn!("adapter lacks line rasterization; line mode will fall back to fill");
            None
        };
        let point = if features.contains(wgpu::Features::POLYGON_MODE_POINT) {
            Some(create_variant(
                device,
                layouts,
                surface_format,
                &vertex_module,
                &fragment_module,
                wgpu::PolygonMode::Point,
            )?)
        } else {
            tracing::warn!("adapter lacks point rasterization; point mode will fall back to fill");
            None
        };

        Ok(Self { fill, line, point })
    }

    /// Pipeline for the requested mode, falling back to fill when the
    /// variant was unavailable at startup.
    pub(crate) fn select(&self, mode: RasterMode) -> &wgpu::RenderPipeline {
        match mode {
            RasterMode::Fill => &self.fill,
            RasterMode::Line => self.line.as_ref().unwrap_or(&self.fill),
            RasterMode::Point => self.point.as_ref().unwrap_or(&self.fill),
        }
    }
}

fn create_variant(
    device: &wgpu::Device,
    layouts: &PipelineLayouts,
    surface_format: wgpu::TextureFormat,
    vertex_module: &wgpu::ShaderModule,
    fragment_module: &wgpu::ShaderModule,
    polygon_mode: wgpu::PolygonMode,
) -> Result<wgpu::RenderPipeline, ShaderError> {
    let label = match polygon_mode {
        wgpu::PolygonMode::Fill => "quad pipeline (fill)",
        wgpu::PolygonMode::Line => "quad pipeline (line)",
        wgpu::PolygonMode::Point => "quad pipeline (point)",
    };

    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&layouts.pipeline_layout),
        vertex: wgpu::VertexState {
            module: vertex_module,
            entry_point: Some("main"),
            buffers: &[Vertex::layout()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        fragment: Some(wgpu::FragmentState {
            module: fragment_module,
            entry_point: Some("main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        multiview: None,
        cache: None,
    });
    if let Some(error) = pollster::block_on(device.pop_error_scope()) {
        return Err(ShaderError::Link {
            message: error.to_string(),
        });
    }
    Ok(pipeline)
}
