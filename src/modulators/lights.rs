//! Light modulator.
//!
//! Writes: `RenderState::lights` (position, intensity) and `RenderState::bloom.strength`.

use crate::analysis::FrequencyDescriptor;
use crate::camera::orbit_position;
use crate::modulation::modulate;
use crate::params::{Bloom, LightsMapping};
use crate::scene::PointLight;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightLevels {
    pub intensity: f32,
    pub bloom: f32,
    /// Orbit radius of light A; light B uses its negation
    pub radius: f32,
}

pub fn light_levels(d: &FrequencyDescriptor, base_radius: f32, mapping: &LightsMapping) -> LightLevels {
    let (level_min, level_max) = mapping.level_range;
    let (intensity_min, intensity_max) = mapping.intensity_range;
    let (bloom_min, bloom_max) = mapping.bloom_range;

    let intensity = modulate(d.overall_avg, level_min, level_max, intensity_min, intensity_max);
    let bloom = modulate(d.overall_avg, level_min, level_max, bloom_min, bloom_max);
    let radius = modulate(
        intensity,
        0.0,
        1.0,
        base_radius * mapping.min_radius_fraction,
        base_radius,
    );

    LightLevels {
        intensity,
        bloom,
        radius,
    }
}

/// Dim, re-bloom and reposition both lights at orbit angle `angle_deg`
pub fn modulate_lights(
    d: &FrequencyDescriptor,
    lights: &mut [PointLight; 2],
    bloom: &mut Bloom,
    angle_deg: f32,
    base_radius: f32,
    mapping: &LightsMapping,
) -> LightLevels {
    let levels = light_levels(d, base_radius, mapping);
    let [a, b] = lights;

    a.intensity = levels.intensity;
    b.intensity = levels.intensity;
    a.position = orbit_position(angle_deg, levels.radius);
    b.position = orbit_position(angle_deg, -levels.radius);
    bloom.strength = levels.bloom;

    levels
}
