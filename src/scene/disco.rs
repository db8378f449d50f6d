//! Disco room: six inward-facing walls of square tiles.

use glam::Vec3;

use super::StaticMesh;
use crate::params::DiscoParams;

/// Wall outward axis with the two in-plane axes spanning it
const WALLS: [(Vec3, Vec3, Vec3); 6] = [
    (Vec3::X, Vec3::Y, Vec3::Z),
    (Vec3::NEG_X, Vec3::Z, Vec3::Y),
    (Vec3::Y, Vec3::Z, Vec3::X),
    (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    (Vec3::Z, Vec3::X, Vec3::Y),
    (Vec3::NEG_Z, Vec3::Y, Vec3::X),
];

/// Build the tile triangles of the room, normals facing the centre
pub fn disco_room(params: &DiscoParams) -> StaticMesh {
    let half = params.size / 2.0;
    let tile = params.tile_size();
    let half_tile = tile / 2.0;
    let tiles_per_wall = params.length * params.length;

    let mut mesh = StaticMesh::with_capacity(WALLS.len() * tiles_per_wall * 6);

    for (out, u, v) in WALLS {
        let normal = -out;
        for i in 0..params.length {
            for j in 0..params.length {
                let du = -half + half_tile + i as f32 * (tile + params.gap);
                let dv = -half + half_tile + j as f32 * (tile + params.gap);
                let center = out * half + u * du + v * dv;

                let corners = [
                    center - u * half_tile - v * half_tile,
                    center + u * half_tile - v * half_tile,
                    center + u * half_tile + v * half_tile,
                    center - u * half_tile + v * half_tile,
                ];
                mesh.push_triangle([corners[0], corners[1], corners[2]], normal);
                mesh.push_triangle([corners[0], corners[2], corners[3]], normal);
            }
        }
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_room_tile_count() {
        let mesh = disco_room(&DiscoParams::default());
        // 6 walls * 100 tiles * 2 triangles * 3 vertices
        assert_eq!(mesh.positions.len(), 3600);
        assert_eq!(mesh.normals.len(), 3600);
    }

    #[test]
    fn test_tiles_stay_on_walls() {
        let params = DiscoParams::default();
        let mesh = disco_room(&params);
        let half = params.size / 2.0;

        for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
            // On its wall plane, within the room
            assert_relative_eq!(p.dot(-*n), half, epsilon = 1e-3);
            assert!(p.abs().max_element() <= half + 1e-3);
            // Normal faces the centre
            assert!(n.dot(-*p) > 0.0);
        }
    }
}
