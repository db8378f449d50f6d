//! Parameter definitions with units and documented semantics.
//!
//! All magic numbers live here with:
//! - Units (world units, degrees, milliseconds, decibels)
//! - Documented ranges and meanings
//! - Validation where a bad value would break the frame loop

mod audio;
mod mapping;
mod render;
mod scene;

pub use audio::{audio_constants, AnalyserConfig, PlaybackConfig, MAX_TRACKS};
pub use mapping::{AudioReactiveMapping, CloudMapping, EffectsMapping, LightsMapping, ShellMapping};
pub use render::{Afterimage, Bloom, Film, PostEffects, RenderConfig};
pub use scene::{
    hex_to_linear, CameraRig, CloudParams, DiscoParams, LightRig, Palette, SceneParams,
    SphereParams,
};

use crate::error::ConfigError;

/// Every tunable of the visualizer
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub analyser: AnalyserConfig,
    pub playback: PlaybackConfig,
    pub scene: SceneParams,
    pub mapping: AudioReactiveMapping,
    pub render: RenderConfig,
    pub post: PostEffects,
}

impl Settings {
    /// Reject values that would produce NaN or an empty scene
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.analyser.validate()?;

        let positive = [
            ("camera radius", self.scene.camera.radius),
            ("focal length", self.scene.camera.focal_length_mm),
            ("light radius", self.scene.lights.radius),
            ("shell radius", self.scene.shell.radius),
            ("near plane", self.render.near_plane),
            ("scanline count", self.post.film.scanline_count),
        ];
        for (name, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::NotPositive { name, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        assert_eq!(Settings::default().validate(), Ok(()));
    }

    #[test]
    fn test_non_positive_values_are_rejected() {
        let mut settings = Settings::default();
        settings.scene.camera.focal_length_mm = 0.0;
        assert_eq!(
            settings.validate(),
            Err(ConfigError::NotPositive {
                name: "focal length",
                value: 0.0
            })
        );

        let mut settings = Settings::default();
        settings.scene.lights.radius = f32::NAN;
        assert!(settings.validate().is_err());
    }
}
