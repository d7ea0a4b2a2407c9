use super::Vertex;

/// Vertices for two textured quads, one floating above the other. The lower
/// quad shows that depth testing keeps it behind the upper one regardless of
/// draw order.
pub fn quad_vertices() -> Vec<Vertex> {
    vec![
        Vertex::new([-0.5, -0.5, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0]),
        Vertex::new([0.5, -0.5, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0]),
        Vertex::new([0.5, 0.5, 0.0], [0.0, 0.0, 1.0], [1.0, 1.0]),
        Vertex::new([-0.5, 0.5, 0.0], [1.0, 1.0, 1.0], [0.0, 1.0]),
        //
        Vertex::new([-0.5, -0.5, -0.5], [1.0, 0.0, 0.0], [0.0, 0.0]),
        Vertex::new([0.5, -0.5, -0.5], [0.0, 1.0, 0.0], [1.0, 0.0]),
        Vertex::new([0.5, 0.5, -0.5], [0.0, 0.0, 1.0], [1.0, 1.0]),
        Vertex::new([-0.5, 0.5, -0.5], [1.0, 1.0, 1.0], [0.0, 1.0]),
    ]
}

/// Indices for the two quads, two counter-clockwise triangles each.
pub fn quad_indices() -> Vec<u16> {
    vec![
        0, 1, 2, 2, 3, 0, //
        4, 5, 6, 6, 7, 4,
    ]
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn every_index_points_at_a_real_vertex() {
        let vertex_count = quad_vertices().len();
        for index in quad_indices() {
            assert!((index as usize) < vertex_count);
        }
    }

    #[test]
    fn the_quads_are_stacked_along_z() {
        let vertices = quad_vertices();
        for vertex in &vertices[0..4] {
            let position = vertex.position;
            assert_eq!(position[2], 0.0);
        }
        for vertex in &vertices[4..8] {
            let position = vertex.position;
            assert_eq!(position[2], -0.5);
        }
    }
}
