//! Audio-deformed outer shell mesh.

use glam::Vec3;

use super::icosphere::{flat_normals, flat_normals_into, icosphere};
use crate::params::SphereParams;

/// Icosphere whose vertices move along their rest directions
///
/// Rest directions are captured once at construction; every reshape starts
/// from them, so deformations never accumulate.
pub struct ShellMesh {
    radius: f32,
    directions: Vec<Vec3>,
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    dirty: bool,
}

impl ShellMesh {
    pub fn new(params: &SphereParams) -> Self {
        let directions = icosphere(1.0, params.detail);
        let positions: Vec<Vec3> = directions.iter().map(|&d| d * params.radius).collect();
        let normals = flat_normals(&positions);

        Self {
            radius: params.radius,
            directions,
            positions,
            normals,
            // First frame uploads the rest shape
            dirty: true,
        }
    }

    /// Rest radius
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Unit rest direction of every vertex
    pub fn directions(&self) -> &[Vec3] {
        &self.directions
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Vertices changed since the compositor last consumed them
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Place every vertex at `distance(direction)` from the origin
    ///
    /// Recomputes face normals and flags the mesh for upload.
    pub fn reshape(&mut self, mut distance: impl FnMut(Vec3) -> f32) {
        for (position, &dir) in self.positions.iter_mut().zip(&self.directions) {
            *position = dir * distance(dir);
        }
        flat_normals_into(&self.positions, &mut self.normals);
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn shell() -> ShellMesh {
        ShellMesh::new(&SphereParams {
            radius: 25.0,
            detail: 2,
        })
    }

    #[test]
    fn test_new_shell_is_at_rest_and_dirty() {
        let mesh = shell();
        assert_eq!(mesh.positions().len(), 540);
        assert_eq!(mesh.normals().len(), 540);
        assert!(mesh.is_dirty());
        for (p, d) in mesh.positions().iter().zip(mesh.directions()) {
            assert_relative_eq!(p.length(), 25.0, epsilon = 1e-3);
            assert_relative_eq!(d.length(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_reshape_sets_distance_and_dirty_flag() {
        let mut mesh = shell();
        mesh.mark_clean();
        assert!(!mesh.is_dirty());

        mesh.reshape(|_| 30.0);
        assert!(mesh.is_dirty());
        for p in mesh.positions() {
            assert_relative_eq!(p.length(), 30.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_reshape_does_not_accumulate() {
        let mut mesh = shell();
        mesh.reshape(|d| 25.0 + d.x.abs());
        let first = mesh.positions().to_vec();
        mesh.reshape(|d| 25.0 + d.x.abs());
        assert_eq!(first, mesh.positions());
    }
}
