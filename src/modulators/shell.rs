//! Outer-shell deformer.
//!
//! Writes: `RenderState::shell` (positions, normals, dirty flag).

use crate::analysis::FrequencyDescriptor;
use crate::modulation::modulate;
use crate::noise::ShellNoise;
use crate::params::ShellMapping;
use crate::scene::ShellMesh;

/// Displacement drivers derived from one descriptor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShellLevels {
    /// Uniform radial push (world units)
    pub bass: f32,
    /// Noise amplitude multiplier
    pub treble: f32,
}

pub fn shell_levels(d: &FrequencyDescriptor, mapping: &ShellMapping) -> ShellLevels {
    let (bass_min, bass_max) = mapping.bass_offset_range;
    let (treble_min, treble_max) = mapping.treble_scale_range;

    ShellLevels {
        bass: modulate(
            d.lower_max_fr.powf(mapping.bass_exponent),
            0.0,
            1.0,
            bass_min,
            bass_max,
        ),
        treble: modulate(d.upper_avg_fr, 0.0, 1.0, treble_min, treble_max),
    }
}

/// Push every shell vertex to `radius + bass + noise * amplitude * treble`
///
/// The noise is sampled at the vertex's rest direction drifted by `time_ms`,
/// so identical inputs give bit-identical positions.
pub fn deform_shell(
    d: &FrequencyDescriptor,
    shell: &mut ShellMesh,
    noise: &ShellNoise,
    time_ms: f64,
    mapping: &ShellMapping,
) -> ShellLevels {
    let levels = shell_levels(d, mapping);
    let radius = shell.radius();

    shell.reshape(|dir| {
        let n = noise.drifting(dir, time_ms, mapping.drift_rate, mapping.drift_axes);
        radius + levels.bass + n * mapping.noise_amplitude * levels.treble
    });
    levels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::SphereParams;
    use approx::assert_relative_eq;

    fn shell() -> ShellMesh {
        ShellMesh::new(&SphereParams {
            radius: 25.0,
            detail: 2,
        })
    }

    fn descriptor(lower_max_fr: f32, upper_avg_fr: f32) -> FrequencyDescriptor {
        FrequencyDescriptor {
            lower_max_fr,
            upper_avg_fr,
            ..Default::default()
        }
    }

    #[test]
    fn test_shell_levels() {
        let mapping = ShellMapping::default();

        let quiet = shell_levels(&descriptor(0.0, 0.0), &mapping);
        assert_eq!(quiet, ShellLevels { bass: 0.0, treble: 0.0 });

        let full = shell_levels(&descriptor(1.0, 1.0), &mapping);
        assert_relative_eq!(full.bass, 8.0);
        assert_relative_eq!(full.treble, 8.0);

        // 0.8 exponent lifts quiet bass
        let soft = shell_levels(&descriptor(0.25, 0.25), &mapping);
        assert!(soft.bass > soft.treble);
        assert_relative_eq!(soft.bass, 8.0 * 0.25f32.powf(0.8), epsilon = 1e-5);
    }

    #[test]
    fn test_silence_leaves_rest_sphere() {
        let mut mesh = shell();
        let noise = ShellNoise::new(42);
        deform_shell(
            &FrequencyDescriptor::default(),
            &mut mesh,
            &noise,
            1_000.0,
            &ShellMapping::default(),
        );
        for p in mesh.positions() {
            assert_relative_eq!(p.length(), 25.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_bass_only_pushes_uniformly() {
        let mut mesh = shell();
        let noise = ShellNoise::new(42);
        let levels = deform_shell(
            &descriptor(1.0, 0.0),
            &mut mesh,
            &noise,
            5_000.0,
            &ShellMapping::default(),
        );
        assert_relative_eq!(levels.bass, 8.0);
        for p in mesh.positions() {
            assert_relative_eq!(p.length(), 33.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_deformation_is_deterministic() {
        let d = descriptor(0.6, 0.4);
        let mapping = ShellMapping::default();
        let noise = ShellNoise::new(42);

        let mut a = shell();
        let mut b = shell();
        deform_shell(&d, &mut a, &noise, 123_456.0, &mapping);
        deform_shell(&d, &mut b, &noise, 123_456.0, &mapping);

        let bits = |m: &ShellMesh| -> Vec<[u32; 3]> {
            m.positions()
                .iter()
                .map(|p| p.to_array().map(f32::to_bits))
                .collect()
        };
        assert_eq!(bits(&a), bits(&b));
        assert!(a.is_dirty());
    }

    #[test]
    fn test_normals_follow_deformed_faces() {
        let rest = shell();
        let mut mesh = shell();
        let noise = ShellNoise::new(42);
        deform_shell(
            &descriptor(0.3, 0.5),
            &mut mesh,
            &noise,
            2_500.0,
            &ShellMapping::default(),
        );

        let tilted = mesh
            .normals()
            .iter()
            .zip(rest.normals())
            .filter(|(n, r)| (**n - **r).length() > 1e-3)
            .count();
        assert!(tilted > 0, "no face normal moved with the surface");

        for (tri, normals) in mesh.positions().chunks_exact(3).zip(mesh.normals().chunks_exact(3)) {
            let expected = (tri[1] - tri[0]).cross(tri[2] - tri[0]).normalize();
            for n in normals {
                assert_relative_eq!(n.x, expected.x, epsilon = 1e-5);
                assert_relative_eq!(n.y, expected.y, epsilon = 1e-5);
                assert_relative_eq!(n.z, expected.z, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn test_treble_roughens_surface() {
        let mut mesh = shell();
        let noise = ShellNoise::new(42);
        deform_shell(
            &descriptor(0.0, 0.5),
            &mut mesh,
            &noise,
            0.0,
            &ShellMapping::default(),
        );

        // treble 4 * amplitude 10: displacement up to +-40 around the rest radius
        let lengths: Vec<f32> = mesh.positions().iter().map(|p| p.length()).collect();
        let spread = lengths.iter().cloned().fold(f32::MIN, f32::max)
            - lengths.iter().cloned().fold(f32::MAX, f32::min);
        assert!(spread > 1.0);
    }
}
