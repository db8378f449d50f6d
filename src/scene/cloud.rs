//! Particle cloud layout.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::params::CloudParams;

/// Scatter `params.count` points in a thick spherical shell around the origin
///
/// Each point picks a side (in or out of `radius`) and a cubic falloff, so most
/// points hug the mean radius and a few stray toward the spread limits.
/// Directions are uniform on the sphere.
pub fn particle_cloud(params: &CloudParams, seed: u64) -> Vec<Vec3> {
    let mut rng = StdRng::seed_from_u64(seed);

    (0..params.count)
        .map(|_| {
            let side: f32 = (rng.gen::<f32>() - 0.5) * 2.0;
            let limit = if side >= 0.0 {
                params.outer_spread
            } else {
                params.inner_spread
            };
            let r = params.radius + rng.gen::<f32>().powi(3) * limit * side;

            let theta = TAU * rng.gen::<f32>();
            let phi = (2.0 * rng.gen::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
            let (sin_phi, cos_phi) = phi.sin_cos();
            Vec3::new(
                r * sin_phi * theta.cos(),
                r * sin_phi * theta.sin(),
                r * cos_phi,
            )
        })
        .collect()
}
