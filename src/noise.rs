//! Noise field for the outer-shell deformation.
//!
//! OpenSimplex noise, sampled on the unit sphere and drifted slowly through
//! 3D noise space over wall-clock time.

use glam::Vec3;
use noise::{NoiseFn, OpenSimplex};

/// Seeded 3D simplex noise field
pub struct ShellNoise {
    simplex: OpenSimplex,
}

impl ShellNoise {
    /// Create new noise field with seed
    pub fn new(seed: u32) -> Self {
        Self {
            simplex: OpenSimplex::new(seed),
        }
    }

    /// Sample 3D simplex noise at position
    ///
    /// Returns value in range [-1, 1]
    pub fn sample(&self, x: f64, y: f64, z: f64) -> f32 {
        self.simplex.get([x, y, z]) as f32
    }

    /// Sample at unit direction `dir`, offset by `time_ms * rate * axes`
    pub fn drifting(&self, dir: Vec3, time_ms: f64, rate: f64, axes: [f64; 3]) -> f32 {
        let drift = time_ms * rate;
        self.sample(
            f64::from(dir.x) + drift * axes[0],
            f64::from(dir.y) + drift * axes[1],
            f64::from(dir.z) + drift * axes[2],
        )
    }
}
