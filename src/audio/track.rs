//! Decoded mono tracks and WAV loading.

use std::path::Path;

use crate::error::AudioError;

/// One mono track at the output device rate
#[derive(Debug, Clone)]
pub struct Track {
    pub name: String,
    samples: Vec<f32>,
    sample_rate: u32,
    position: usize,
    gain: f32,
}

impl Track {
    pub fn new(name: impl Into<String>, samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            name: name.into(),
            samples,
            sample_rate,
            position: 0,
            gain: 1.0,
        }
    }

    /// Next sample after gain, advancing the playhead
    ///
    /// Past the end a non-looping track yields silence.
    pub fn next_sample(&mut self, looping: bool) -> f32 {
        if self.position >= self.samples.len() {
            if !looping || self.samples.is_empty() {
                return 0.0;
            }
            self.position = 0;
        }
        let sample = self.samples[self.position] * self.gain;
        self.position += 1;
        sample
    }

    pub fn is_finished(&self) -> bool {
        self.position >= self.samples.len()
    }

    pub fn rewind(&mut self) {
        self.position = 0;
    }

    /// Flip gain between 0 and 1; returns whether the track is now muted
    pub fn toggle_mute(&mut self) -> bool {
        self.gain = if self.gain > 0.0 { 0.0 } else { 1.0 };
        self.is_muted()
    }

    pub fn is_muted(&self) -> bool {
        self.gain == 0.0
    }

    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// Load a WAV file as a mono track resampled to `target_rate`
pub fn load_wav(path: &Path, target_rate: u32) -> Result<Track, AudioError> {
    let wav_error = |source| AudioError::Wav {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = hound::WavReader::open(path).map_err(wav_error)?;
    let spec = reader.spec();

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(wav_error)?,
        hound::SampleFormat::Int => {
            let scale = 1.0 / (1u64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<Result<_, _>>()
                .map_err(wav_error)?
        }
    };

    let channels = usize::from(spec.channels.max(1));
    let mono: Vec<f32> = interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect();

    if mono.is_empty() {
        return Err(AudioError::EmptyTrack {
            path: path.to_path_buf(),
        });
    }

    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(Track::new(
        name,
        resample(&mono, spec.sample_rate, target_rate),
        target_rate,
    ))
}

/// Linear-interpolation resampling from `from_rate` to `to_rate`
pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let step = f64::from(from_rate) / f64::from(to_rate);
    let out_len = ((samples.len() as f64 / step).round() as usize).max(1);
    let last = samples.len() - 1;

    (0..out_len)
        .map(|i| {
            let pos = i as f64 * step;
            let index = (pos.floor() as usize).min(last);
            let frac = (pos - index as f64) as f32;
            let a = samples[index];
            let b = samples[(index + 1).min(last)];
            a + (b - a) * frac
        })
        .collect()
}
