//! Particle-cloud scaler.
//!
//! Writes: `RenderState::cloud.scale`.

use glam::Vec3;

use crate::analysis::FrequencyDescriptor;
use crate::modulation::modulate;
use crate::params::CloudMapping;
use crate::scene::CloudTransform;

pub fn cloud_scale(d: &FrequencyDescriptor, mapping: &CloudMapping) -> f32 {
    let (level_min, level_max) = mapping.level_range;
    let (scale_min, scale_max) = mapping.scale_range;
    modulate(d.overall_avg, level_min, level_max, scale_min, scale_max)
}

/// Scale the cloud uniformly with the track's overall level
pub fn scale_cloud(d: &FrequencyDescriptor, cloud: &mut CloudTransform, mapping: &CloudMapping) -> f32 {
    let scale = cloud_scale(d, mapping);
    cloud.scale = Vec3::splat(scale);
    scale
}
