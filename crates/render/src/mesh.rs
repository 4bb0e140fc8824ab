use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

/// Unit cube centred on the origin, one texture per face.
///
/// Faces wind counter-clockwise seen from outside. Each face lists its
/// corners bottom-left, bottom-right, top-right, top-left.
pub fn cube_mesh() -> (Vec<MeshVertex>, Vec<u16>) {
    let p = 0.5_f32;
    #[rustfmt::skip]
    let corners: [[[f32; 3]; 4]; 6] = [
        // +Z
        [[-p, -p,  p], [ p, -p,  p], [ p,  p,  p], [-p,  p,  p]],
        // -Z
        [[ p, -p, -p], [-p, -p, -p], [-p,  p, -p], [ p,  p, -p]],
        // +X
        [[ p, -p,  p], [ p, -p, -p], [ p,  p, -p], [ p,  p,  p]],
        // -X
        [[-p, -p, -p], [-p, -p,  p], [-p,  p,  p], [-p,  p, -p]],
        // +Y
        [[-p,  p,  p], [ p,  p,  p], [ p,  p, -p], [-p,  p, -p]],
        // -Y
        [[-p, -p, -p], [ p, -p, -p], [ p, -p,  p], [-p, -p,  p]],
    ];
    // Texture rows run top to bottom.
    let uvs = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for face in corners {
        let base = vertices.len() as u16;
        for (position, uv) in face.into_iter().zip(uvs) {
            vertices.push(MeshVertex { position, uv });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }
    (vertices, indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn cube_has_six_quads() {
        let (vertices, indices) = cube_mesh();
        assert_eq!(vertices.len(), 24);
        assert_eq!(indices.len(), 36);
        assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
    }

    #[test]
    fn vertices_lie_on_unit_cube() {
        let (vertices, _) = cube_mesh();
        for v in &vertices {
            assert!(v.position.iter().all(|c| c.abs() == 0.5));
            assert!(v.uv.iter().all(|c| (0.0..=1.0).contains(c)));
        }
    }

    #[test]
    fn triangles_face_outward() {
        let (vertices, indices) = cube_mesh();
        for tri in indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]]
                .map(|i| Vec3::from_array(vertices[i as usize].position));
            let normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(normal.dot(centroid) > 0.0, "inward triangle {tri:?}");
        }
    }

    #[test]
    fn vertex_layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<MeshVertex>(), 20);
        let (vertices, _) = cube_mesh();
        assert_eq!(bytemuck::cast_slice::<_, u8>(&vertices).len(), 24 * 20);
    }
}
