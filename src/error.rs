//! Error types shared across the crate.

use std::path::PathBuf;

use thiserror::Error;

/// Spectrum too short to split into a lower and an upper band
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpectrumError {
    #[error("spectrum has {len} bins, at least {min} are required")]
    TooShort { len: usize, min: usize },
}

/// Why a tap could not deliver a snapshot this frame
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapError {
    /// No analysis has completed yet
    #[error("tap has no spectrum yet")]
    NotReady,

    /// The analysis thread holds the snapshot right now
    #[error("tap snapshot is being written")]
    Busy,

    /// The producing side panicked while holding the snapshot
    #[error("tap producer is gone")]
    Disconnected,
}

/// Invalid static configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("FFT size must be a power of two, got {0}")]
    FftSizeNotPowerOfTwo(usize),

    #[error("FFT size {size} yields fewer than {min_bins} bins")]
    FftSizeTooSmall { size: usize, min_bins: usize },

    #[error("decibel range [{min}, {max}] is empty")]
    DecibelRange { min: f32, max: f32 },

    #[error("smoothing time constant {0} is outside [0, 1]")]
    Smoothing(f32),

    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: f32 },

    #[error("at most {max} tracks are supported, got {count}")]
    TooManyTracks { count: usize, max: usize },
}

/// Transport command rejected
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    #[error("track {index} does not exist ({count} tracks loaded)")]
    UnknownTrack { index: usize, count: usize },
}

/// Audio backend setup failures
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("no audio output device found")]
    NoOutputDevice,

    #[error("failed to query output config: {0}")]
    OutputConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start output stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("failed to read {path}: {source}")]
    Wav {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    #[error("{path} contains no samples")]
    EmptyTrack { path: PathBuf },

    #[error("glicol synthesis failed: {0}")]
    Synthesis(String),

    #[error("no tracks to play")]
    NoTracks,

    #[error("invalid analyser config: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// GPU setup and per-frame presentation failures
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter")]
    NoAdapter,

    #[error("failed to request device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}

/// A frame could not be completed
#[derive(Error, Debug)]
pub enum FrameError {
    #[error(transparent)]
    Spectrum(#[from] SpectrumError),

    #[error(transparent)]
    Render(#[from] RenderError),
}
