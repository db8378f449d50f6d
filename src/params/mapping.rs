//! Mapping constants from frequency descriptors to visual parameters.
//!
//! Ranges are `(min, max)` pairs fed to [`crate::modulation::modulate`].

/// Outer-shell deformer constants (lower/upper band → radial displacement)
#[derive(Debug, Clone)]
pub struct ShellMapping {
    /// Compression applied to the lower-band peak before remapping
    pub bass_exponent: f32,

    /// Radial push from bass (world units)
    /// Formula: bass = modulate(lower_max_fr^bass_exponent, 0, 1, range.0, range.1)
    pub bass_offset_range: (f32, f32),

    /// Noise amplitude multiplier from treble
    /// Formula: treble = modulate(upper_avg_fr, 0, 1, range.0, range.1)
    pub treble_scale_range: (f32, f32),

    /// Noise displacement amplitude (world units per unit noise per unit treble)
    pub noise_amplitude: f32,

    /// Noise field drift per millisecond of wall-clock time
    pub drift_rate: f64,

    /// Per-axis drift multipliers so the field does not slide along a diagonal
    pub drift_axes: [f64; 3],
}

impl Default for ShellMapping {
    fn default() -> Self {
        Self {
            bass_exponent: 0.8,
            bass_offset_range: (0.0, 8.0),
            treble_scale_range: (0.0, 8.0),
            noise_amplitude: 10.0,
            drift_rate: 0.00001,
            drift_axes: [7.0, 8.0, 9.0],
        }
    }
}

/// Particle-cloud scaler constants (overall level → uniform scale)
#[derive(Debug, Clone)]
pub struct CloudMapping {
    /// Overall average magnitude range (bytes)
    pub level_range: (f32, f32),

    /// Resulting uniform scale
    pub scale_range: (f32, f32),
}

impl Default for CloudMapping {
    fn default() -> Self {
        Self {
            level_range: (0.0, 100.0),
            scale_range: (1.0, 3.0),
        }
    }
}

/// Post-effect modulator constants
#[derive(Debug, Clone)]
pub struct EffectsMapping {
    /// Compression applied to the lower-band peak
    pub bass_exponent: f32,

    /// Below this compressed bass level the resting value is used
    pub bass_gate: f32,

    /// Bass value below the gate
    pub bass_resting: f32,

    /// Bass value range above the gate (from compressed level 0..1)
    pub bass_range: (f32, f32),

    /// Overall average magnitude range (bytes) driving the afterimage
    pub level_range: (f32, f32),

    /// Afterimage damp range
    pub damp_range: (f32, f32),
}

impl Default for EffectsMapping {
    fn default() -> Self {
        Self {
            bass_exponent: 0.8,
            bass_gate: 0.3,
            bass_resting: 0.75,
            bass_range: (0.42, 1.67),
            level_range: (10.0, 50.0),
            damp_range: (0.5, 1.0),
        }
    }
}

/// Light modulator constants
///
/// Both output ranges are reversed: louder tracks dim the lights and the bloom.
#[derive(Debug, Clone)]
pub struct LightsMapping {
    /// Overall average magnitude range (bytes)
    pub level_range: (f32, f32),

    /// Point-light intensity range
    pub intensity_range: (f32, f32),

    /// Bloom strength range
    pub bloom_range: (f32, f32),

    /// Innermost orbit as a fraction of the rig radius
    pub min_radius_fraction: f32,
}

impl Default for LightsMapping {
    fn default() -> Self {
        Self {
            level_range: (0.0, 20.0),
            intensity_range: (0.5, 0.0),
            bloom_range: (1.67, 0.42),
            min_radius_fraction: 0.5,
        }
    }
}

/// Mapping from audio descriptors to every visual modulator
#[derive(Debug, Clone, Default)]
pub struct AudioReactiveMapping {
    pub shell: ShellMapping,
    pub cloud: CloudMapping,
    pub effects: EffectsMapping,
    pub lights: LightsMapping,
}
