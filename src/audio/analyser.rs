//! Byte spectrum analyser with Web Audio `AnalyserNode` semantics.

use std::f32::consts::PI;
use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use crate::error::ConfigError;
use crate::params::AnalyserConfig;

/// Blackman window coefficients
const BLACKMAN_A0: f32 = 0.42;
const BLACKMAN_A1: f32 = 0.5;
const BLACKMAN_A2: f32 = 0.08;

/// Blackman window function (periodic form)
fn blackman_window(i: usize, n: usize) -> f32 {
    let x = 2.0 * PI * i as f32 / n as f32;
    BLACKMAN_A0 - BLACKMAN_A1 * x.cos() + BLACKMAN_A2 * (2.0 * x).cos()
}

/// Windowed FFT, smoothed magnitudes and decibel quantisation for one tap
pub struct ByteAnalyser {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    buffer: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    smoothed: Vec<f32>,
    smoothing: f32,
    min_decibels: f32,
    max_decibels: f32,
}

impl ByteAnalyser {
    pub fn new(config: &AnalyserConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let n = config.fft_size;
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(n);
        let scratch = vec![Complex::new(0.0, 0.0); fft.get_inplace_scratch_len()];

        Ok(Self {
            fft,
            window: (0..n).map(|i| blackman_window(i, n)).collect(),
            buffer: vec![Complex::new(0.0, 0.0); n],
            scratch,
            smoothed: vec![0.0; config.bin_count()],
            smoothing: config.smoothing_time_constant,
            min_decibels: config.min_decibels,
            max_decibels: config.max_decibels,
        })
    }

    pub fn fft_size(&self) -> usize {
        self.window.len()
    }

    pub fn bin_count(&self) -> usize {
        self.smoothed.len()
    }

    /// Analyse the most recent `fft_size` samples of `samples` into `out`
    ///
    /// `samples` must hold at least `fft_size` values and `out` exactly
    /// `bin_count` bytes.
    pub fn analyse(&mut self, samples: &[f32], out: &mut [u8]) {
        let n = self.fft_size();
        debug_assert!(samples.len() >= n && out.len() == self.bin_count());

        let frame = &samples[samples.len() - n..];
        for ((slot, &sample), &w) in self.buffer.iter_mut().zip(frame).zip(&self.window) {
            *slot = Complex::new(sample * w, 0.0);
        }

        self.fft
            .process_with_scratch(&mut self.buffer, &mut self.scratch);

        let scale = 1.0 / n as f32;
        let range = self.max_decibels - self.min_decibels;
        let tau = self.smoothing;

        for ((smoothed, bin), byte) in self.smoothed.iter_mut().zip(&self.buffer).zip(out.iter_mut()) {
            let magnitude = bin.norm() * scale;
            *smoothed = tau * *smoothed + (1.0 - tau) * magnitude;

            // Zero magnitude is -inf dB, which clamps to 0 below
            let db = 20.0 * smoothed.log10();
            let level = 255.0 / range * (db - self.min_decibels);
            *byte = if level.is_nan() {
                0
            } else {
                level.clamp(0.0, 255.0) as u8
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyser(smoothing: f32) -> ByteAnalyser {
        ByteAnalyser::new(&AnalyserConfig {
            smoothing_time_constant: smoothing,
            ..Default::default()
        })
        .unwrap()
    }

    /// Unit sine centred on bin `k` of a 512-point transform
    fn tone(k: usize) -> Vec<f32> {
        (0..512)
            .map(|i| (2.0 * PI * k as f32 * i as f32 / 512.0).sin())
            .collect()
    }

    #[test]
    fn test_blackman_window_shape() {
        assert!(blackman_window(0, 512).abs() < 1e-6);
        assert!((blackman_window(256, 512) - 1.0).abs() < 1e-6);
        assert!((blackman_window(100, 512) - blackman_window(412, 512)).abs() < 1e-5);
    }

    #[test]
    fn test_silence_is_all_zero() {
        let mut analyser = analyser(0.8);
        let mut out = vec![255u8; 256];
        analyser.analyse(&[0.0; 512], &mut out);
        assert!(out.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_tone_lights_up_its_bin_only() {
        let mut analyser = analyser(0.0);
        let mut out = vec![0u8; 256];
        analyser.analyse(&tone(32), &mut out);

        // Peak magnitude is a0 / 2 = 0.21, about -13.6 dB: above the -30 dB ceiling
        assert_eq!(out[32], 255);
        assert!(out[72] < 10, "leakage at bin 72: {}", out[72]);
        assert!(out[200] < 10);
    }

    #[test]
    fn test_uses_most_recent_window() {
        let mut analyser = analyser(0.0);
        let mut out = vec![0u8; 256];

        // Old tone followed by a full window of silence
        let mut samples = tone(32);
        samples.extend(std::iter::repeat(0.0).take(512));
        analyser.analyse(&samples, &mut out);
        assert!(out.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_smoothing_carries_energy_forward() {
        let mut smoothed = analyser(0.8);
        let mut instant = analyser(0.0);
        let mut out = vec![0u8; 256];

        smoothed.analyse(&tone(32), &mut out);
        instant.analyse(&tone(32), &mut out);

        smoothed.analyse(&[0.0; 512], &mut out);
        assert!(out[32] > 0);

        instant.analyse(&[0.0; 512], &mut out);
        assert_eq!(out[32], 0);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let result = ByteAnalyser::new(&AnalyserConfig {
            fft_size: 300,
            ..Default::default()
        });
        assert!(matches!(result, Err(ConfigError::FftSizeNotPowerOfTwo(300))));
    }
}
