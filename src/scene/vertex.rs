use ash::vk;
use memoffset::offset_of;

/// A single model vertex as it appears in the vertex buffer.
///
/// Packed so the in-memory layout matches the vertex input attribute
/// offsets exactly.
#[derive(Debug, Copy, Clone, PartialEq)]
#[repr(C, packed)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub fn new(
        position: [f32; 3],
        color: [f32; 3],
        uv: [f32; 2],
    ) -> Self {
        Self {
            position,
            color,
            uv,
        }
    }

    pub fn binding_description() -> vk::VertexInputBindingDescription {
        vk::VertexInputBindingDescription {
            binding: 0,
            stride: std::mem::size_of::<Vertex>() as u32,
            input_rate: vk::VertexInputRate::VERTEX,
        }
    }

    pub fn attribute_descriptions() -> [vk::VertexInputAttributeDescription; 3]
    {
        [
            vk::VertexInputAttributeDescription {
                binding: 0,
                location: 0,
                format: vk::Format::R32G32B32_SFLOAT,
                offset: offset_of!(Vertex, position) as u32,
            },
            vk::VertexInputAttributeDescription {
                binding: 0,
                location: 1,
                format: vk::Format::R32G32B32_SFLOAT,
                offset: offset_of!(Vertex, color) as u32,
            },
            vk::VertexInputAttributeDescription {
                binding: 0,
                location: 2,
                format: vk::Format::R32G32_SFLOAT,
                offset: offset_of!(Vertex, uv) as u32,
            },
        ]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn the_vertex_layout_has_no_padding() {
        assert_eq!(std::mem::size_of::<Vertex>(), 8 * 4);
    }

    #[test]
    fn attribute_offsets_match_the_field_layout() {
        let [position, color, uv] = Vertex::attribute_descriptions();
        assert_eq!(position.offset, 0);
        assert_eq!(color.offset, 12);
        assert_eq!(uv.offset, 24);
    }

    #[test]
    fn the_binding_stride_covers_a_whole_vertex() {
        assert_eq!(
            Vertex::binding_description().stride as usize,
            std::mem::size_of::<Vertex>()
        );
    }
}
