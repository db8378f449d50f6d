//! Per-frame routing from analyser taps to descriptors.

use log::trace;

use super::descriptor::{extract, FrequencyDescriptor, MIN_SPECTRUM_BINS};
use crate::error::{SpectrumError, TapError};

/// Source of byte spectra for one track
///
/// `read_into` must never block: a producer that cannot hand over a snapshot
/// right now reports a [`TapError`] instead.
pub trait SpectrumTap {
    /// Number of frequency bins, fixed for the tap's lifetime
    fn bin_count(&self) -> usize;

    /// Copy the latest magnitudes into `out` (`out.len() == bin_count()`)
    fn read_into(&self, out: &mut [u8]) -> Result<(), TapError>;
}

/// Which visual modulator consumes a track's descriptor
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModulatorKind {
    /// Outer-shell deformer
    Shell,
    /// Particle-cloud scaler
    Cloud,
    /// Post-effect modulator
    Effects,
    /// Light modulator
    Lights,
}

impl ModulatorKind {
    /// Modulators in frame order
    pub const ALL: [ModulatorKind; 4] = [
        ModulatorKind::Shell,
        ModulatorKind::Cloud,
        ModulatorKind::Effects,
        ModulatorKind::Lights,
    ];
}

/// Association of one track with the modulator fed by its tap
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrackBinding {
    pub track: usize,
    pub modulator: ModulatorKind,
}

impl TrackBinding {
    /// Default layout for `track_count` tracks: track i feeds `ModulatorKind::ALL[i]`
    ///
    /// Tracks past the fourth are left unbound.
    pub fn default_layout(track_count: usize) -> Vec<TrackBinding> {
        ModulatorKind::ALL
            .iter()
            .take(track_count)
            .enumerate()
            .map(|(track, &modulator)| TrackBinding { track, modulator })
            .collect()
    }
}

struct Route {
    binding: TrackBinding,
    tap: Box<dyn SpectrumTap>,
    buffer: Vec<u8>,
    descriptor: Option<FrequencyDescriptor>,
}

/// Pulls every tap once per frame and keeps this frame's descriptors
#[derive(Default)]
pub struct SignalRouter {
    routes: Vec<Route>,
}

impl SignalRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a tap; its spectrum buffer is allocated once here
    pub fn attach(
        &mut self,
        binding: TrackBinding,
        tap: Box<dyn SpectrumTap>,
    ) -> Result<(), SpectrumError> {
        let bins = tap.bin_count();
        if bins < MIN_SPECTRUM_BINS {
            return Err(SpectrumError::TooShort {
                len: bins,
                min: MIN_SPECTRUM_BINS,
            });
        }

        self.routes.push(Route {
            binding,
            tap,
            buffer: vec![0; bins],
            descriptor: None,
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Refresh every tap's descriptor for this frame
    ///
    /// A tap that cannot deliver leaves its descriptor empty until the next poll.
    pub fn poll(&mut self) -> Result<(), SpectrumError> {
        for route in &mut self.routes {
            route.descriptor = match route.tap.read_into(&mut route.buffer) {
                Ok(()) => Some(extract(&route.buffer)?),
                Err(e) => {
                    trace!("track {}: skipped ({})", route.binding.track, e);
                    None
                }
            };
        }
        Ok(())
    }

    /// This frame's descriptors in attach order
    pub fn routes(&self) -> impl Iterator<Item = (TrackBinding, Option<&FrequencyDescriptor>)> {
        self.routes
            .iter()
            .map(|route| (route.binding, route.descriptor.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Tap replaying a fixed spectrum
    struct FixedTap(Vec<u8>);

    impl SpectrumTap for FixedTap {
        fn bin_count(&self) -> usize {
            self.0.len()
        }

        fn read_into(&self, out: &mut [u8]) -> Result<(), TapError> {
            out.copy_from_slice(&self.0);
            Ok(())
        }
    }

    /// Tap that fails on its first `misses` reads
    struct LateTap {
        misses: Cell<usize>,
        level: u8,
    }

    impl SpectrumTap for LateTap {
        fn bin_count(&self) -> usize {
            16
        }

        fn read_into(&self, out: &mut [u8]) -> Result<(), TapError> {
            if self.misses.get() > 0 {
                self.misses.set(self.misses.get() - 1);
                return Err(TapError::NotReady);
            }
            out.fill(self.level);
            Ok(())
        }
    }

    #[test]
    fn test_default_layout() {
        let layout = TrackBinding::default_layout(4);
        assert_eq!(layout.len(), 4);
        for (i, binding) in layout.iter().enumerate() {
            assert_eq!(binding.track, i);
            assert_eq!(binding.modulator, ModulatorKind::ALL[i]);
        }

        assert_eq!(TrackBinding::default_layout(2).len(), 2);
        assert_eq!(TrackBinding::default_layout(9).len(), 4);
    }

    #[test]
    fn test_poll_produces_one_descriptor_per_tap() {
        let mut router = SignalRouter::new();
        for (binding, level) in TrackBinding::default_layout(4).into_iter().zip([0u8, 10, 20, 30]) {
            router
                .attach(binding, Box::new(FixedTap(vec![level; 256])))
                .unwrap();
        }

        router.poll().unwrap();

        let routed: Vec<_> = router.routes().collect();
        assert_eq!(routed.len(), 4);
        for (i, (binding, descriptor)) in routed.into_iter().enumerate() {
            assert_eq!(binding.track, i);
            let d = descriptor.expect("fixed taps always deliver");
            assert_eq!(d.overall_avg, (i * 10) as f32);
        }
    }

    #[test]
    fn test_unready_tap_is_skipped_then_recovers() {
        let mut router = SignalRouter::new();
        router
            .attach(
                TrackBinding::default_layout(1)[0],
                Box::new(LateTap {
                    misses: Cell::new(1),
                    level: 50,
                }),
            )
            .unwrap();

        let first = |router: &SignalRouter| router.routes().next().and_then(|(_, d)| d.copied());

        router.poll().unwrap();
        assert_eq!(first(&router), None);

        router.poll().unwrap();
        assert_eq!(first(&router).map(|d| d.overall_avg), Some(50.0));
    }

    #[test]
    fn test_attach_rejects_short_taps() {
        let mut router = SignalRouter::new();
        let result = router.attach(
            TrackBinding::default_layout(1)[0],
            Box::new(FixedTap(vec![0; 2])),
        );

        assert_eq!(result, Err(SpectrumError::TooShort { len: 2, min: 4 }));
        assert!(router.is_empty());
    }
}
