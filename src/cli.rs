//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::error::ConfigError;
use crate::params::{Settings, MAX_TRACKS};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "Discosphere")]
#[command(about = "Audio-reactive 3D disco planet visualizer", long_about = None)]
pub struct Args {
    /// WAV file for the next track (repeat up to 4 times; default: synthesized demo tracks)
    #[arg(long = "track", value_name = "WAV")]
    pub tracks: Vec<PathBuf>,

    /// Restart tracks when they end
    #[arg(long = "loop")]
    pub looping: bool,

    /// Start playing immediately
    #[arg(long)]
    pub autoplay: bool,

    /// Camera orbit speed (degrees per frame)
    #[arg(long, value_name = "DEGREES", default_value = "0.1")]
    pub camera_velocity: f32,

    /// Camera orbit radius (world units)
    #[arg(long, value_name = "UNITS", default_value = "100")]
    pub camera_radius: f32,

    /// Camera lens focal length (mm, 35 mm film gauge)
    #[arg(long, value_name = "MM", default_value = "15")]
    pub focal_length: f32,

    /// Bloom luminance threshold
    #[arg(long, value_name = "LEVEL", default_value = "0")]
    pub bloom_threshold: f32,

    /// Bloom blur radius (0..1)
    #[arg(long, value_name = "RADIUS", default_value = "0.57")]
    pub bloom_radius: f32,

    /// Film grain intensity (0..1)
    #[arg(long, value_name = "LEVEL", default_value = "1")]
    pub film_noise: f32,

    /// Scanline intensity (0..1)
    #[arg(long, value_name = "LEVEL", default_value = "0.25")]
    pub film_scanlines: f32,

    /// Number of scanlines
    #[arg(long, value_name = "COUNT", default_value = "1080")]
    pub scanline_count: f32,

    /// Render in grayscale
    #[arg(long)]
    pub grayscale: bool,

    /// Analyser FFT size (power of two)
    #[arg(long, value_name = "SAMPLES", default_value = "512")]
    pub fft_size: usize,

    /// Seed for the shell noise and cloud layout
    #[arg(long, default_value = "42")]
    pub seed: u32,
}

impl Args {
    /// Build validated settings from the defaults plus these overrides
    pub fn into_settings(self) -> Result<(Settings, Vec<PathBuf>), ConfigError> {
        if self.tracks.len() > MAX_TRACKS {
            return Err(ConfigError::TooManyTracks {
                count: self.tracks.len(),
                max: MAX_TRACKS,
            });
        }

        let mut settings = Settings::default();

        settings.playback.looping = self.looping;
        settings.playback.autoplay = self.autoplay;
        settings.analyser.fft_size = self.fft_size;

        let camera = &mut settings.scene.camera;
        camera.velocity_deg = self.camera_velocity;
        camera.radius = self.camera_radius;
        camera.focal_length_mm = self.focal_length;
        settings.scene.seed = self.seed;

        let post = &mut settings.post;
        post.bloom.threshold = self.bloom_threshold;
        post.bloom.radius = self.bloom_radius;
        post.film.noise_intensity = self.film_noise;
        post.film.scanline_intensity = self.film_scanlines;
        post.film.scanline_count = self.scanline_count;
        post.film.grayscale = self.grayscale;

        settings.validate()?;
        Ok((settings, self.tracks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_settings() {
        let args = Args::parse_from(["discosphere"]);
        let (settings, tracks) = args.into_settings().unwrap();
        let defaults = Settings::default();

        assert!(tracks.is_empty());
        assert_eq!(settings.scene.camera.focal_length_mm, defaults.scene.camera.focal_length_mm);
        assert_eq!(settings.scene.camera.velocity_deg, defaults.scene.camera.velocity_deg);
        assert_eq!(settings.post.bloom, defaults.post.bloom);
        assert_eq!(settings.post.film, defaults.post.film);
        assert_eq!(settings.analyser.fft_size, 512);
        assert!(!settings.playback.looping);
    }

    #[test]
    fn test_overrides() {
        let args = Args::parse_from([
            "discosphere",
            "--track",
            "a.wav",
            "--track",
            "b.wav",
            "--loop",
            "--grayscale",
            "--focal-length",
            "35",
            "--fft-size",
            "1024",
        ]);
        let (settings, tracks) = args.into_settings().unwrap();

        assert_eq!(tracks, vec![PathBuf::from("a.wav"), PathBuf::from("b.wav")]);
        assert!(settings.playback.looping);
        assert!(settings.post.film.grayscale);
        assert_eq!(settings.scene.camera.focal_length_mm, 35.0);
        assert_eq!(settings.analyser.bin_count(), 512);
    }

    #[test]
    fn test_rejects_bad_values() {
        let five: Vec<String> = std::iter::once("discosphere".to_string())
            .chain((0..5).flat_map(|i| ["--track".to_string(), format!("{}.wav", i)]))
            .collect();
        assert_eq!(
            Args::parse_from(five).into_settings().unwrap_err(),
            ConfigError::TooManyTracks { count: 5, max: 4 }
        );

        let args = Args::parse_from(["discosphere", "--fft-size", "500"]);
        assert_eq!(
            args.into_settings().unwrap_err(),
            ConfigError::FftSizeNotPowerOfTwo(500)
        );
    }
}
