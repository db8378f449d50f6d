//! Discosphere library - Audio-reactive disco planet
//!
//! Four tracks each feed an analyser; every frame their spectra are reduced to
//! frequency descriptors that drive the shell, cloud, afterimage and lights.

pub mod analysis;
pub mod audio;
pub mod camera;
pub mod cli;
pub mod controls;
pub mod error;
pub mod frame;
pub mod modulation;
pub mod modulators;
pub mod noise;
pub mod params;
pub mod rendering;
pub mod scene;
