//! Orbit paths shared by the camera and light rigs, plus the camera projection.

use glam::{Mat4, Vec3};

use crate::params::RenderConfig;

/// Film gauge of the cinematic lens (mm); it spans the frame's longer side
const FILM_GAUGE_MM: f32 = 35.0;

/// Point on the rig orbit at `angle_deg`, scaled by `radius`
///
/// X and Y both follow `sin`, so the orbit is a tilted ellipse through the
/// poles rather than a horizontal circle. A negative radius mirrors the point
/// through the origin.
pub fn orbit_position(angle_deg: f32, radius: f32) -> Vec3 {
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    Vec3::new(sin, sin, cos) * radius
}

/// Vertical field of view (degrees) of a lens on a 35 mm gauge at `aspect`
///
/// Landscape frames fit the gauge to the width, so the film height shrinks
/// with the aspect; portrait frames use the full gauge vertically.
pub fn fov_from_focal_length(focal_length_mm: f32, aspect: f32) -> f32 {
    let film_height = FILM_GAUGE_MM / aspect.max(1.0);
    (2.0 * (0.5 * film_height / focal_length_mm).atan()).to_degrees()
}

/// Camera placement for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub eye: Vec3,
    pub target: Vec3,
    pub fov_degrees: f32,
}

impl CameraPose {
    /// Create view-projection matrix for rendering
    pub fn view_proj(&self, aspect: f32, render_config: &RenderConfig) -> Mat4 {
        // Keep Y as up vector; fall back to Z at the poles of the orbit
        let forward = (self.target - self.eye).normalize_or_zero();
        let up = if forward.cross(Vec3::Y).length_squared() < 1e-6 {
            Vec3::Z
        } else {
            Vec3::Y
        };

        let view = Mat4::look_at_rh(self.eye, self.target, up);
        let proj = Mat4::perspective_rh(
            self.fov_degrees.to_radians(),
            aspect,
            render_config.near_plane,
            render_config.far_plane,
        );
        proj * view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_orbit_starts_on_z_axis() {
        assert_eq!(orbit_position(0.0, 100.0), Vec3::new(0.0, 0.0, 100.0));
    }

    #[test]
    fn test_orbit_shares_sin_on_x_and_y() {
        for angle in [12.5f32, 90.0, 211.0, 359.9] {
            let p = orbit_position(angle, 400.0);
            assert_eq!(p.x, p.y);
            assert_relative_eq!(p.z, angle.to_radians().cos() * 400.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_negative_radius_mirrors_through_origin() {
        for angle in [0.0f32, 33.0, 170.0, 305.0] {
            assert_eq!(orbit_position(angle, -250.0), -orbit_position(angle, 250.0));
        }
    }

    #[test]
    fn test_fov_from_focal_length() {
        // 15 mm at 16:9: film height 35 / 1.78, fov = 2 * atan(0.65625)
        assert_relative_eq!(fov_from_focal_length(15.0, 16.0 / 9.0), 66.549_8, epsilon = 1e-3);
        // Longer lens, narrower view
        assert!(fov_from_focal_length(50.0, 16.0 / 9.0) < fov_from_focal_length(15.0, 16.0 / 9.0));
    }

    #[test]
    fn test_fov_uses_full_gauge_when_not_landscape() {
        let square = fov_from_focal_length(15.0, 1.0);
        assert_relative_eq!(square, 98.797_4, epsilon = 1e-3);
        // Portrait frames keep the square frame's vertical extent
        assert_relative_eq!(fov_from_focal_length(15.0, 0.5), square);
        // Wider landscape frames narrow the vertical view
        assert!(fov_from_focal_length(15.0, 21.0 / 9.0) < fov_from_focal_length(15.0, 16.0 / 9.0));
    }

    #[test]
    fn test_view_proj_matrix_generation() {
        let pose = CameraPose {
            eye: orbit_position(30.0, 100.0),
            target: Vec3::ZERO,
            fov_degrees: fov_from_focal_length(15.0, 16.0 / 9.0),
        };
        let view_proj = pose.view_proj(16.0 / 9.0, &RenderConfig::default());

        assert_ne!(view_proj, Mat4::IDENTITY);
        assert!(view_proj.is_finite());

        // The origin sits in front of the camera, inside the clip volume
        let clip = view_proj * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!(clip.w > 0.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-3 && ndc.y.abs() < 1e-3);
        assert!((0.0..=1.0).contains(&ndc.z));
    }

    #[test]
    fn test_view_proj_finite_at_pole() {
        let pose = CameraPose {
            eye: Vec3::new(0.0, 100.0, 0.0),
            target: Vec3::ZERO,
            fov_degrees: 60.0,
        };
        assert!(pose.view_proj(1.0, &RenderConfig::default()).is_finite());
    }
}
