//! Track playback and per-track spectrum analysis.
//!
//! Tracks come from WAV files or Glicol demo compositions. Each track's
//! post-gain signal feeds its own analyser, read through an [`AnalyserTap`].

mod analyser;
mod synthesis;
mod system;
mod track;
mod transport;

pub use analyser::ByteAnalyser;
pub use synthesis::{demo_tracks, render_composition, DEMO_TRACKS};
pub use system::{AnalyserTap, AudioSystem};
pub use track::{load_wav, resample, Track};
pub use transport::{Mixer, TransportCommand};
