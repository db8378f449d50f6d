//! Non-indexed icosphere generation with flat shading.

use glam::Vec3;

/// Golden ratio
const PHI: f32 = 1.618_034;

#[rustfmt::skip]
const ICOSAHEDRON_VERTICES: [[f32; 3]; 12] = [
    [-1.0, PHI, 0.0], [1.0, PHI, 0.0], [-1.0, -PHI, 0.0], [1.0, -PHI, 0.0],
    [0.0, -1.0, PHI], [0.0, 1.0, PHI], [0.0, -1.0, -PHI], [0.0, 1.0, -PHI],
    [PHI, 0.0, -1.0], [PHI, 0.0, 1.0], [-PHI, 0.0, -1.0], [-PHI, 0.0, 1.0],
];

#[rustfmt::skip]
const ICOSAHEDRON_FACES: [[usize; 3]; 20] = [
    [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
    [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
    [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
    [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
];

/// Triangle soup of an icosphere: every 3 consecutive positions are one face
///
/// Each icosahedron face is split into `(detail + 1)^2` triangles before the
/// points are pushed out to `radius`, giving `20 * (detail + 1)^2 * 3` vertices.
pub fn icosphere(radius: f32, detail: u32) -> Vec<Vec3> {
    let cols = detail as usize + 1;
    let mut positions = Vec::with_capacity(20 * cols * cols * 3);

    for face in ICOSAHEDRON_FACES {
        let [a, b, c] = face.map(|i| Vec3::from_array(ICOSAHEDRON_VERTICES[i]));
        subdivide_face(a, b, c, cols, &mut positions);
    }

    for p in &mut positions {
        *p = p.normalize() * radius;
    }
    positions
}

fn subdivide_face(a: Vec3, b: Vec3, c: Vec3, cols: usize, out: &mut Vec<Vec3>) {
    // rows[i] walks from the a-c edge to the b-c edge, `cols - i + 1` points long
    let rows: Vec<Vec<Vec3>> = (0..=cols)
        .map(|i| {
            let t = i as f32 / cols as f32;
            let aj = a.lerp(c, t);
            let bj = b.lerp(c, t);
            let len = cols - i;
            if len == 0 {
                vec![aj]
            } else {
                (0..=len).map(|j| aj.lerp(bj, j as f32 / len as f32)).collect()
            }
        })
        .collect();

    for i in 0..cols {
        for j in 0..2 * (cols - i) - 1 {
            let k = j / 2;
            if j % 2 == 0 {
                out.extend([rows[i][k + 1], rows[i + 1][k], rows[i][k]]);
            } else {
                out.extend([rows[i][k + 1], rows[i + 1][k + 1], rows[i + 1][k]]);
            }
        }
    }
}

/// Per-face normals, repeated for each of the face's three vertices
pub fn flat_normals(positions: &[Vec3]) -> Vec<Vec3> {
    let mut normals = Vec::with_capacity(positions.len());
    flat_normals_into(positions, &mut normals);
    normals
}

/// Same as [`flat_normals`], reusing `normals`' allocation
pub fn flat_normals_into(positions: &[Vec3], normals: &mut Vec<Vec3>) {
    normals.clear();
    for tri in positions.chunks_exact(3) {
        let n = (tri[1] - tri[0]).cross(tri[2] - tri[0]).normalize_or_zero();
        normals.extend([n, n, n]);
    }
}

/// LineList indices tracing every triangle edge of a triangle soup
pub fn wireframe_indices(vertex_count: usize) -> Vec<u32> {
    let mut indices = Vec::with_capacity(vertex_count * 2);
    for base in (0..vertex_count as u32).step_by(3) {
        indices.extend_from_slice(&[base, base + 1, base + 1, base + 2, base + 2, base]);
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_vertex_counts() {
        assert_eq!(icosphere(1.0, 0).len(), 60);
        assert_eq!(icosphere(10.0, 1).len(), 240);
        assert_eq!(icosphere(25.0, 2).len(), 540);
    }

    #[test]
    fn test_vertices_lie_on_sphere() {
        for p in icosphere(25.0, 2) {
            assert_relative_eq!(p.length(), 25.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_faces_point_outward() {
        let positions = icosphere(25.0, 2);
        let normals = flat_normals(&positions);
        assert_eq!(normals.len(), positions.len());

        for (tri, n) in positions.chunks_exact(3).zip(normals.chunks_exact(3)) {
            let centroid = (tri[0] + tri[1] + tri[2]) / 3.0;
            assert!(n[0].dot(centroid) > 0.0);
            assert_relative_eq!(n[0].length(), 1.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_wireframe_indices() {
        let indices = wireframe_indices(6);
        assert_eq!(indices, vec![0, 1, 1, 2, 2, 0, 3, 4, 4, 5, 5, 3]);
    }
}
