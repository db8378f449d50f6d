//! Audio analysis and playback configuration.

use crate::analysis::MIN_SPECTRUM_BINS;
use crate::error::ConfigError;

/// Most tracks the scene has modulators for
pub const MAX_TRACKS: usize = 4;

/// Per-tap spectrum analyser configuration (Web Audio `AnalyserNode` semantics)
#[derive(Debug, Clone)]
pub struct AnalyserConfig {
    /// FFT window size (must be power of 2); bins = fft_size / 2
    pub fft_size: usize,

    /// Exponential smoothing between analyses (0 = none, 1 = frozen)
    pub smoothing_time_constant: f32,

    /// Magnitude mapped to byte 0 (dBFS)
    pub min_decibels: f32,

    /// Magnitude mapped to byte 255 (dBFS)
    pub max_decibels: f32,

    /// Analysis thread period (milliseconds)
    /// 16 ms keeps one fresh spectrum per 60 Hz frame
    pub update_interval_ms: u64,
}

impl Default for AnalyserConfig {
    fn default() -> Self {
        Self {
            fft_size: 512,
            smoothing_time_constant: 0.8,
            min_decibels: -100.0,
            max_decibels: -30.0,
            update_interval_ms: 16,
        }
    }
}

impl AnalyserConfig {
    /// Number of frequency bins each tap delivers
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Validate configuration (FFT size must be power of 2, etc.)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.fft_size.is_power_of_two() {
            return Err(ConfigError::FftSizeNotPowerOfTwo(self.fft_size));
        }
        if self.bin_count() < MIN_SPECTRUM_BINS {
            return Err(ConfigError::FftSizeTooSmall {
                size: self.fft_size,
                min_bins: MIN_SPECTRUM_BINS,
            });
        }
        if self.min_decibels >= self.max_decibels {
            return Err(ConfigError::DecibelRange {
                min: self.min_decibels,
                max: self.max_decibels,
            });
        }
        if !(0.0..=1.0).contains(&self.smoothing_time_constant) {
            return Err(ConfigError::Smoothing(self.smoothing_time_constant));
        }
        Ok(())
    }
}

/// Track playback configuration
#[derive(Debug, Clone)]
pub struct PlaybackConfig {
    /// Restart each track when it reaches its end
    pub looping: bool,

    /// Start playing as soon as the stream is up
    pub autoplay: bool,

    /// Length of each synthesized demo track (seconds)
    pub synth_duration_secs: f32,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            looping: false,
            autoplay: false,
            synth_duration_secs: 48.0,
        }
    }
}

/// Audio constants (compile-time, match Glicol engine setup)
pub mod audio_constants {
    /// Audio block size (samples per buffer)
    /// 128 samples = 2.9ms @ 44.1kHz
    pub const BLOCK_SIZE: usize = 128;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_analyser_config() {
        let config = AnalyserConfig::default();
        assert_eq!(config.bin_count(), 256);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_analyser_config_rejects_bad_values() {
        let mut config = AnalyserConfig {
            fft_size: 500,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::FftSizeNotPowerOfTwo(500)));

        config.fft_size = 4;
        assert_eq!(
            config.validate(),
            Err(ConfigError::FftSizeTooSmall {
                size: 4,
                min_bins: 4
            })
        );

        config.fft_size = 512;
        config.min_decibels = -30.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DecibelRange { .. })
        ));

        config.min_decibels = -100.0;
        config.smoothing_time_constant = 1.5;
        assert_eq!(config.validate(), Err(ConfigError::Smoothing(1.5)));
    }
}
