//! Post-effect modulator.
//!
//! Writes: `RenderState::afterimage.damp`. The bass level is computed and
//! reported but drives nothing.

use crate::analysis::FrequencyDescriptor;
use crate::modulation::modulate;
use crate::params::{Afterimage, EffectsMapping};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectLevels {
    /// Gated bass level
    pub bass: f32,
    /// Afterimage damp
    pub treble: f32,
}

pub fn effect_levels(d: &FrequencyDescriptor, mapping: &EffectsMapping) -> EffectLevels {
    let reduced = d.lower_max_fr.powf(mapping.bass_exponent);
    let bass = if reduced < mapping.bass_gate {
        mapping.bass_resting
    } else {
        let (min, max) = mapping.bass_range;
        modulate(reduced, 0.0, 1.0, min, max)
    };

    let (level_min, level_max) = mapping.level_range;
    let (damp_min, damp_max) = mapping.damp_range;
    let treble = modulate(d.overall_avg, level_min, level_max, damp_min, damp_max);

    EffectLevels { bass, treble }
}

/// Overwrite the afterimage damp from the track's overall level
pub fn modulate_effects(
    d: &FrequencyDescriptor,
    afterimage: &mut Afterimage,
    mapping: &EffectsMapping,
) -> EffectLevels {
    let levels = effect_levels(d, mapping);
    afterimage.damp = levels.treble;
    levels
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn descriptor(overall_avg: f32, lower_max_fr: f32) -> FrequencyDescriptor {
        FrequencyDescriptor {
            overall_avg,
            lower_max_fr,
            ..Default::default()
        }
    }

    #[test]
    fn test_bass_gate_applies_to_compressed_level() {
        let mapping = EffectsMapping::default();

        // 0.2^0.8 ~ 0.276, below the gate
        assert_eq!(effect_levels(&descriptor(0.0, 0.2), &mapping).bass, 0.75);

        // 0.3^0.8 ~ 0.382, above the gate: modulated branch
        let bass = effect_levels(&descriptor(0.0, 0.3), &mapping).bass;
        assert_relative_eq!(bass, 0.42 + 0.3f32.powf(0.8) * 1.25, epsilon = 1e-5);

        // Gate sits at reduced == 0.3, i.e. lower_max_fr == 0.3^(1/0.8)
        let at_gate = 0.3f32.powf(1.0 / 0.8) * 1.001;
        assert_ne!(effect_levels(&descriptor(0.0, at_gate), &mapping).bass, 0.75);
        let below_gate = 0.3f32.powf(1.0 / 0.8) * 0.999;
        assert_eq!(effect_levels(&descriptor(0.0, below_gate), &mapping).bass, 0.75);

        assert_relative_eq!(effect_levels(&descriptor(0.0, 1.0), &mapping).bass, 1.67);
    }

    #[test]
    fn test_damp_follows_overall_level() {
        let mapping = EffectsMapping::default();
        assert_relative_eq!(effect_levels(&descriptor(10.0, 0.0), &mapping).treble, 0.5);
        assert_relative_eq!(effect_levels(&descriptor(30.0, 0.0), &mapping).treble, 0.75);
        assert_relative_eq!(effect_levels(&descriptor(50.0, 0.0), &mapping).treble, 1.0);
        // Silence extrapolates below the range
        assert_relative_eq!(effect_levels(&descriptor(0.0, 0.0), &mapping).treble, 0.375);
    }

    #[test]
    fn test_only_damp_is_written() {
        let mut afterimage = Afterimage { damp: 0.75 };
        let levels = modulate_effects(&descriptor(50.0, 1.0), &mut afterimage, &EffectsMapping::default());
        assert_relative_eq!(afterimage.damp, 1.0);
        assert_eq!(afterimage.damp, levels.treble);
    }
}
