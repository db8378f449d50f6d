//! Spectrum reduction and per-frame routing.

mod descriptor;
mod router;

pub use descriptor::{band_ranges, extract, FrequencyDescriptor, MIN_SPECTRUM_BINS};
pub use router::{ModulatorKind, SignalRouter, SpectrumTap, TrackBinding};
