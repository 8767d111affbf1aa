use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

/// One interleaved vertex: position, color, texture coordinate.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub(crate) struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub tex_coord: [f32; 2],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// The quad's four corners. Each carries a distinct color so the overlay
/// blend stays visible whatever the textures contain.
pub(crate) const QUAD_VERTICES: [Vertex; 4] = [
    // top right
    Vertex {
        position: [0.5, 0.5, 0.0],
        color: [1.0, 0.0, 0.0],
        tex_coord: [1.0, 1.0],
    },
    // bottom right
    Vertex {
        position: [0.5, -0.5, 0.0],
        color: [0.0, 1.0, 0.0],
        tex_coord: [1.0, 0.0],
    },
    // bottom left
    Vertex {
        position: [-0.5, -0.5, 0.0],
        color: [0.0, 0.0, 1.0],
        tex_coord: [0.0, 0.0],
    },
    // top left
    Vertex {
        position: [-0.5, 0.5, 0.0],
        color: [1.0, 1.0, 0.0],
        tex_coord: [0.0, 1.0],
    },
];

/// Two triangles sharing the top-right/bottom-left-adjacent diagonal.
pub(crate) const QUAD_INDICES: [u32; 6] = [0, 1, 3, 1, 2, 3];

/// Immutable vertex and index buffers for the quad, uploaded once.
pub(crate) struct QuadMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
}

impl QuadMesh {
    pub(crate) fn new(device: &wgpu::Device) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad vertex buffer"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad index buffer"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
        }
    }

    pub(crate) fn vertex_slice(&self) -> wgpu::BufferSlice<'_> {
        self.vertex_buffer.slice(..)
    }

    pub(crate) fn index_slice(&self) -> wgpu::BufferSlice<'_> {
        self.index_buffer.slice(..)
    }

    pub(crate) fn index_count(&self) -> u32 {
        QUAD_INDICES.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_layout_interleaves_position_color_uv() {
        let layout = Vertex::layout();
        assert_eq!(layout.array_stride, 32);
        assert_eq!(layout.step_mode, wgpu::VertexStepMode::Vertex);

        let offsets: Vec<u64> = layout.attributes.iter().map(|attr| attr.offset).collect();
        let locations: Vec<u32> = layout
            .attributes
            .iter()
            .map(|attr| attr.shader_location)
            .collect();
        assert_eq!(offsets, vec![0, 12, 24]);
        assert_eq!(locations, vec![0, 1, 2]);
    }

    #[test]
    fn indices_form_two_triangles_over_four_vertices() {
        assert_eq!(QUAD_INDICES.len(), 6);
        assert!(QUAD_INDICES
            .iter()
            .all(|&index| (index as usize) < QUAD_VERTICES.len()));

        // Both triangles share the 1-3 diagonal.
        let first = &QUAD_INDICES[..3];
        let second = &QUAD_INDICES[3..];
        for shared in [1, 3] {
            assert!(first.contains(&shared));
            assert!(second.contains(&shared));
        }
    }

    #[test]
    fn corners_span_the_centered_half_unit_square() {
        for vertex in QUAD_VERTICES {
            assert_eq!(vertex.position[0].abs(), 0.5);
            assert_eq!(vertex.position[1].abs(), 0.5);
            assert_eq!(vertex.position[2], 0.0);
            // Texture coordinates follow the corner positions.
            assert_eq!(vertex.tex_coord[0], vertex.position[0] + 0.5);
            assert_eq!(vertex.tex_coord[1], vertex.position[1] + 0.5);
        }
    }
}
