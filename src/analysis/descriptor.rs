//! Five-scalar summary of one byte spectrum.

use std::ops::Range;

use crate::error::SpectrumError;
use crate::modulation::{average, peak};

/// Smallest spectrum whose lower and upper bands are both non-empty
pub const MIN_SPECTRUM_BINS: usize = 4;

/// Frequency summary of one tap for one frame
///
/// The `*_fr` fields divide a band statistic by the band's length, so for byte
/// input they are bounded by `255 / band_len`, not by 1.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrequencyDescriptor {
    /// Mean magnitude over the whole spectrum (0..=255)
    pub overall_avg: f32,
    pub lower_max_fr: f32,
    pub lower_avg_fr: f32,
    pub upper_max_fr: f32,
    pub upper_avg_fr: f32,
}

/// Lower and upper band index ranges for a spectrum of `len` bins
///
/// The split point is `len / 2 - 1` and the last bin belongs to neither band.
/// Requires `len >= 2`.
pub fn band_ranges(len: usize) -> (Range<usize>, Range<usize>) {
    let split = len / 2 - 1;
    (0..split, split..len - 1)
}

/// Reduce a byte spectrum to its descriptor
pub fn extract(samples: &[u8]) -> Result<FrequencyDescriptor, SpectrumError> {
    let too_short = SpectrumError::TooShort {
        len: samples.len(),
        min: MIN_SPECTRUM_BINS,
    };
    if samples.len() < MIN_SPECTRUM_BINS {
        return Err(too_short);
    }

    let (lower_range, upper_range) = band_ranges(samples.len());
    let lower = &samples[lower_range];
    let upper = &samples[upper_range];

    let overall_avg = average(samples).ok_or(too_short)?;
    let lower_max = peak(lower).ok_or(too_short)?;
    let lower_avg = average(lower).ok_or(too_short)?;
    let upper_max = peak(upper).ok_or(too_short)?;
    let upper_avg = average(upper).ok_or(too_short)?;

    let lower_len = lower.len() as f32;
    let upper_len = upper.len() as f32;

    Ok(FrequencyDescriptor {
        overall_avg,
        lower_max_fr: f32::from(lower_max) / lower_len,
        lower_avg_fr: lower_avg / lower_len,
        upper_max_fr: f32::from(upper_max) / upper_len,
        upper_avg_fr: upper_avg / upper_len,
    })
}
