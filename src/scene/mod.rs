//! Scene content and the per-frame render state the modulators write into.

mod cloud;
mod disco;
mod icosphere;
mod shell;

pub use cloud::particle_cloud;
pub use disco::disco_room;
pub use icosphere::{flat_normals, icosphere, wireframe_indices};
pub use shell::ShellMesh;

use glam::Vec3;

use crate::camera::{fov_from_focal_length, orbit_position, CameraPose};
use crate::params::{hex_to_linear, Afterimage, Bloom, Film, PostEffects, SceneParams};

/// Flat-shaded triangle soup that never changes after setup
#[derive(Debug, Clone, Default)]
pub struct StaticMesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
}

impl StaticMesh {
    pub fn with_capacity(vertices: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            normals: Vec::with_capacity(vertices),
        }
    }

    pub fn push_triangle(&mut self, corners: [Vec3; 3], normal: Vec3) {
        self.positions.extend(corners);
        self.normals.extend([normal; 3]);
    }
}

/// Geometry built once at startup and uploaded once
pub struct SceneContent {
    /// Solid inner planet
    pub planet: StaticMesh,
    /// Cloud points in model space; the cloud transform scales them
    pub cloud_points: Vec<Vec3>,
    pub disco: StaticMesh,
}

impl SceneContent {
    pub fn build(params: &SceneParams) -> Self {
        let positions = icosphere(params.planet.radius, params.planet.detail);
        let normals = flat_normals(&positions);

        Self {
            planet: StaticMesh { positions, normals },
            cloud_points: particle_cloud(&params.cloud, u64::from(params.seed)),
            disco: disco_room(&params.disco),
        }
    }
}

/// Orbiting point light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub intensity: f32,
    /// Linear RGB
    pub color: Vec3,
}

/// Uniform scale applied to the particle cloud
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloudTransform {
    pub scale: Vec3,
}

/// Everything the compositor needs for one frame
///
/// Owned by the frame driver. Each modulator writes a fixed subset of these
/// fields; fields no modulator touched this frame keep last frame's values.
pub struct RenderState {
    pub camera: CameraPose,
    /// Light A then light B (B mirrors A through the origin)
    pub lights: [PointLight; 2],
    pub bloom: Bloom,
    pub afterimage: Afterimage,
    pub film: Film,
    pub shell: ShellMesh,
    pub cloud: CloudTransform,
    /// Wall-clock time of the current frame (milliseconds)
    pub clock_ms: f64,
}

impl RenderState {
    /// Initial state; the lens field of view is fixed from `aspect` here and
    /// kept when the window is later resized
    pub fn new(scene: &SceneParams, post: &PostEffects, aspect: f32) -> Self {
        let light_a = orbit_position(0.0, scene.lights.radius);

        Self {
            camera: CameraPose {
                eye: orbit_position(0.0, scene.camera.radius),
                target: Vec3::ZERO,
                fov_degrees: fov_from_focal_length(scene.camera.focal_length_mm, aspect),
            },
            lights: [
                PointLight {
                    position: light_a,
                    intensity: 0.5,
                    color: hex_to_linear(scene.palette.magenta),
                },
                PointLight {
                    position: -light_a,
                    intensity: 0.5,
                    color: hex_to_linear(scene.palette.purple),
                },
            ],
            bloom: post.bloom,
            afterimage: post.afterimage,
            film: post.film,
            shell: ShellMesh::new(&scene.shell),
            cloud: CloudTransform { scale: Vec3::ONE },
            clock_ms: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_render_state() {
        let state = RenderState::new(&SceneParams::default(), &PostEffects::default(), 16.0 / 9.0);

        assert_eq!(state.camera.eye, Vec3::new(0.0, 0.0, 100.0));
        assert!((state.camera.fov_degrees - 66.55).abs() < 0.01);
        assert_eq!(state.lights[0].position, -state.lights[1].position);
        assert_eq!(state.bloom.strength, 1.8);
        assert_eq!(state.afterimage.damp, 0.75);
        assert_eq!(state.cloud.scale, Vec3::ONE);
        assert!(state.shell.is_dirty());
    }

    #[test]
    fn test_scene_content() {
        let content = SceneContent::build(&SceneParams::default());
        assert_eq!(content.planet.positions.len(), 240);
        assert_eq!(content.cloud_points.len(), 2000);
        assert_eq!(content.disco.positions.len(), 3600);
    }
}
