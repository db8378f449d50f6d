//! Audio system managing playback, per-track taps and spectrum analysis.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use log::{debug, error, info, warn};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, TryLockError};
use std::thread;
use std::time::Duration;

use super::analyser::ByteAnalyser;
use super::synthesis::demo_tracks;
use super::track::{load_wav, Track};
use super::transport::{Mixer, TransportCommand};
use crate::analysis::SpectrumTap;
use crate::error::{AudioError, TapError, TransportError};
use crate::params::{AnalyserConfig, PlaybackConfig};

/// Latest byte spectrum of one track
struct Snapshot {
    bytes: Vec<u8>,
    ready: bool,
}

/// Non-blocking reader of one track's analyser output
pub struct AnalyserTap {
    snapshot: Arc<Mutex<Snapshot>>,
    bins: usize,
}

impl SpectrumTap for AnalyserTap {
    fn bin_count(&self) -> usize {
        self.bins
    }

    fn read_into(&self, out: &mut [u8]) -> Result<(), TapError> {
        let snapshot = match self.snapshot.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::WouldBlock) => return Err(TapError::Busy),
            Err(TryLockError::Poisoned(_)) => return Err(TapError::Disconnected),
        };
        if !snapshot.ready {
            return Err(TapError::NotReady);
        }
        out.copy_from_slice(&snapshot.bytes);
        Ok(())
    }
}

/// Audio system managing playback and analysis
pub struct AudioSystem {
    mixer: Arc<Mutex<Mixer>>,

    /// Mirror of the mixer's play state, readable without locking
    playing: Arc<AtomicBool>,

    snapshots: Vec<Arc<Mutex<Snapshot>>>,
    bins: usize,

    /// Analysis thread keeps running while set
    running: Arc<AtomicBool>,
    analysis_thread: Option<thread::JoinHandle<()>>,

    /// Audio output stream (kept alive)
    _stream: cpal::Stream,
}

impl AudioSystem {
    /// Open the default output device, load or synthesize tracks and start analysis
    pub fn new(
        track_paths: &[PathBuf],
        analyser: &AnalyserConfig,
        playback: &PlaybackConfig,
    ) -> Result<Self, AudioError> {
        analyser.validate()?;

        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioError::NoOutputDevice)?;
        let config = device.default_output_config()?;
        let sample_rate = config.sample_rate().0;
        let channels = usize::from(config.channels());

        info!(
            "Audio: {} @ {}Hz, {} channels",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            sample_rate,
            channels
        );

        let tracks = if track_paths.is_empty() {
            info!(
                "No tracks given, synthesizing {:.0}s demo tracks",
                playback.synth_duration_secs
            );
            demo_tracks(sample_rate, playback.synth_duration_secs)?
        } else {
            track_paths
                .iter()
                .map(|path| load_wav(path, sample_rate))
                .collect::<Result<Vec<Track>, _>>()?
        };
        if tracks.is_empty() {
            return Err(AudioError::NoTracks);
        }
        for (i, track) in tracks.iter().enumerate() {
            info!("Track {}: {} ({:.1}s)", i + 1, track.name, track.duration_secs());
        }

        let track_count = tracks.len();
        let mut mixer = Mixer::new(tracks, playback.looping);
        if playback.autoplay {
            mixer.apply(TransportCommand::Play)?;
        }
        let playing = Arc::new(AtomicBool::new(mixer.is_playing()));
        let mixer = Arc::new(Mutex::new(mixer));

        // Per-track post-gain samples waiting for analysis
        let fft_size = analyser.fft_size;
        let inputs: Vec<Vec<f32>> = (0..track_count)
            .map(|_| Vec::with_capacity(fft_size * 2 + 4096))
            .collect();
        let inputs = Arc::new(Mutex::new(inputs));

        let mixer_clone = Arc::clone(&mixer);
        let inputs_clone = Arc::clone(&inputs);
        let playing_clone = Arc::clone(&playing);
        let mut taps = vec![0.0f32; track_count];

        let stream = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                let mut mixer = mixer_clone.lock().unwrap_or_else(PoisonError::into_inner);
                let mut inputs = inputs_clone.lock().unwrap_or_else(PoisonError::into_inner);

                for frame in data.chunks_mut(channels) {
                    // Hard clip so a loud mix never reaches the device past full scale
                    let sample = mixer.next_frame(&mut taps).clamp(-1.0, 1.0);
                    frame.fill(sample);

                    for (buffer, &tap) in inputs.iter_mut().zip(&taps) {
                        buffer.push(tap);
                    }
                }

                // Keep only the most recent window
                for buffer in inputs.iter_mut() {
                    if buffer.len() > fft_size * 2 {
                        let excess = buffer.len() - fft_size;
                        buffer.drain(..excess);
                    }
                }

                playing_clone.store(mixer.is_playing(), Ordering::Relaxed);
            },
            |err| error!("Audio stream error: {}", err),
            None,
        )?;
        stream.play()?;

        let bins = analyser.bin_count();
        let snapshots: Vec<_> = (0..track_count)
            .map(|_| {
                Arc::new(Mutex::new(Snapshot {
                    bytes: vec![0; bins],
                    ready: false,
                }))
            })
            .collect();

        let analysers = (0..track_count)
            .map(|_| ByteAnalyser::new(analyser))
            .collect::<Result<Vec<_>, _>>()?;

        let running = Arc::new(AtomicBool::new(true));
        let analysis_thread = spawn_analysis_thread(
            analysers,
            Duration::from_millis(analyser.update_interval_ms),
            inputs,
            snapshots.clone(),
            Arc::clone(&running),
        );

        Ok(Self {
            mixer,
            playing,
            snapshots,
            bins,
            running,
            analysis_thread: Some(analysis_thread),
            _stream: stream,
        })
    }

    /// One tap per track, in track order
    pub fn taps(&self) -> Vec<AnalyserTap> {
        self.snapshots
            .iter()
            .map(|snapshot| AnalyserTap {
                snapshot: Arc::clone(snapshot),
                bins: self.bins,
            })
            .collect()
    }

    pub fn track_count(&self) -> usize {
        self.snapshots.len()
    }

    pub fn send(&self, command: TransportCommand) -> Result<(), TransportError> {
        let mut mixer = self.mixer.lock().unwrap_or_else(PoisonError::into_inner);
        mixer.apply(command)?;
        self.playing.store(mixer.is_playing(), Ordering::Relaxed);
        debug!("Transport: {:?}", command);
        Ok(())
    }

    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Relaxed)
    }

    pub fn duration_secs(&self) -> f32 {
        self.mixer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .duration_secs()
    }
}

impl Drop for AudioSystem {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.analysis_thread.take() {
            if handle.join().is_err() {
                warn!("Analysis thread panicked");
            }
        }
    }
}

/// Spawn spectrum analysis thread
fn spawn_analysis_thread(
    mut analysers: Vec<ByteAnalyser>,
    interval: Duration,
    inputs: Arc<Mutex<Vec<Vec<f32>>>>,
    snapshots: Vec<Arc<Mutex<Snapshot>>>,
    running: Arc<AtomicBool>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut windows: Vec<Vec<f32>> = analysers
            .iter()
            .map(|a| vec![0.0; a.fft_size()])
            .collect();
        let mut filled = vec![false; analysers.len()];
        let mut bytes: Vec<Vec<u8>> = analysers.iter().map(|a| vec![0; a.bin_count()]).collect();

        while running.load(Ordering::Relaxed) {
            thread::sleep(interval);

            // Copy out under the lock, analyse after releasing it
            {
                let inputs = inputs.lock().unwrap_or_else(PoisonError::into_inner);
                for ((buffer, window), filled) in inputs.iter().zip(&mut windows).zip(&mut filled) {
                    *filled = buffer.len() >= window.len();
                    if *filled {
                        let len = window.len();
                        window.copy_from_slice(&buffer[buffer.len() - len..]);
                    }
                }
            }

            for (i, analyser) in analysers.iter_mut().enumerate() {
                if !filled[i] {
                    continue;
                }
                analyser.analyse(&windows[i], &mut bytes[i]);

                let mut snapshot = snapshots[i].lock().unwrap_or_else(PoisonError::into_inner);
                snapshot.bytes.copy_from_slice(&bytes[i]);
                snapshot.ready = true;
            }
        }
    })
}
