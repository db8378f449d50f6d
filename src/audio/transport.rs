//! Transport commands and the track mixer.

use log::debug;

use super::track::Track;
use crate::error::TransportError;

/// Playback control surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportCommand {
    Play,
    Pause,
    /// Pause and rewind every track
    Stop,
    /// Toggle one track's gain between 0 and 1
    Mute(usize),
}

/// Sums the tracks and exposes each one's post-gain signal for analysis
pub struct Mixer {
    tracks: Vec<Track>,
    playing: bool,
    looping: bool,
}

impl Mixer {
    pub fn new(tracks: Vec<Track>, looping: bool) -> Self {
        Self {
            tracks,
            playing: false,
            looping,
        }
    }

    pub fn apply(&mut self, command: TransportCommand) -> Result<(), TransportError> {
        match command {
            TransportCommand::Play => {
                if self.has_ended() {
                    debug!("replaying from the start");
                    self.rewind();
                }
                self.playing = true;
            }
            TransportCommand::Pause => self.playing = false,
            TransportCommand::Stop => self.stop(),
            TransportCommand::Mute(index) => {
                let count = self.tracks.len();
                let track = self
                    .tracks
                    .get_mut(index)
                    .ok_or(TransportError::UnknownTrack { index, count })?;
                let muted = track.toggle_mute();
                debug!("{}: {}", track.name, if muted { "muted" } else { "unmuted" });
            }
        }
        Ok(())
    }

    fn stop(&mut self) {
        self.playing = false;
        self.rewind();
    }

    fn rewind(&mut self) {
        for track in &mut self.tracks {
            track.rewind();
        }
    }

    /// Every non-looping track has played out
    fn has_ended(&self) -> bool {
        !self.looping && self.tracks.iter().all(Track::is_finished)
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Longest track length
    pub fn duration_secs(&self) -> f32 {
        self.tracks
            .iter()
            .map(Track::duration_secs)
            .fold(0.0, f32::max)
    }

    /// Produce one output sample; `taps[i]` receives track i's contribution
    ///
    /// While paused every value is 0. Tracks that have ended contribute 0 but
    /// the mixer keeps playing until paused or stopped.
    pub fn next_frame(&mut self, taps: &mut [f32]) -> f32 {
        if !self.playing {
            taps.fill(0.0);
            return 0.0;
        }

        let mut mix = 0.0;
        for (track, tap) in self.tracks.iter_mut().zip(taps.iter_mut()) {
            let sample = track.next_sample(self.looping);
            *tap = sample;
            mix += sample;
        }
        mix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_tracks(looping: bool) -> Mixer {
        Mixer::new(
            vec![
                Track::new("a", vec![0.1, 0.1, 0.1], 3),
                Track::new("b", vec![0.2; 6], 3),
            ],
            looping,
        )
    }

    #[test]
    fn test_paused_mixer_is_silent() {
        let mut mixer = two_tracks(false);
        let mut taps = [1.0; 2];
        assert_eq!(mixer.next_frame(&mut taps), 0.0);
        assert_eq!(taps, [0.0; 2]);
    }

    #[test]
    fn test_mix_and_taps() {
        let mut mixer = two_tracks(false);
        mixer.apply(TransportCommand::Play).unwrap();

        let mut taps = [0.0; 2];
        let mix = mixer.next_frame(&mut taps);
        assert_eq!(taps, [0.1, 0.2]);
        assert!((mix - 0.3).abs() < 1e-6);
        assert_eq!(mixer.duration_secs(), 2.0);
    }

    #[test]
    fn test_mute_silences_tap() {
        let mut mixer = two_tracks(false);
        mixer.apply(TransportCommand::Play).unwrap();
        mixer.apply(TransportCommand::Mute(1)).unwrap();

        let mut taps = [0.0; 2];
        mixer.next_frame(&mut taps);
        assert_eq!(taps, [0.1, 0.0]);

        assert_eq!(
            mixer.apply(TransportCommand::Mute(4)),
            Err(TransportError::UnknownTrack { index: 4, count: 2 })
        );
    }

    #[test]
    fn test_stop_rewinds() {
        let mut mixer = two_tracks(false);
        mixer.apply(TransportCommand::Play).unwrap();
        let mut taps = [0.0; 2];
        mixer.next_frame(&mut taps);
        mixer.next_frame(&mut taps);

        mixer.apply(TransportCommand::Stop).unwrap();
        assert!(!mixer.is_playing());

        mixer.apply(TransportCommand::Play).unwrap();
        mixer.next_frame(&mut taps);
        assert_eq!(taps, [0.1, 0.2]);
    }

    #[test]
    fn test_playing_survives_end_of_tracks() {
        let mut mixer = two_tracks(false);
        mixer.apply(TransportCommand::Play).unwrap();
        let mut taps = [0.0; 2];
        for _ in 0..10 {
            mixer.next_frame(&mut taps);
        }
        assert!(mixer.is_playing());
        assert_eq!(mixer.next_frame(&mut taps), 0.0);
        assert_eq!(taps, [0.0; 2]);

        let mut looping = two_tracks(true);
        looping.apply(TransportCommand::Play).unwrap();
        for _ in 0..20 {
            looping.next_frame(&mut taps);
        }
        assert!(looping.is_playing());
    }

    #[test]
    fn test_play_after_end_starts_over() {
        let mut mixer = two_tracks(false);
        mixer.apply(TransportCommand::Play).unwrap();
        let mut taps = [0.0; 2];
        for _ in 0..6 {
            mixer.next_frame(&mut taps);
        }

        mixer.apply(TransportCommand::Pause).unwrap();
        mixer.apply(TransportCommand::Play).unwrap();
        mixer.next_frame(&mut taps);
        assert_eq!(taps, [0.1, 0.2]);

        // Pausing mid-track resumes where it left off
        mixer.apply(TransportCommand::Pause).unwrap();
        mixer.apply(TransportCommand::Play).unwrap();
        mixer.next_frame(&mut taps);
        assert_eq!(taps, [0.1, 0.2]);
        mixer.next_frame(&mut taps);
        assert_eq!(taps, [0.1, 0.2]);
        mixer.next_frame(&mut taps);
        assert_eq!(taps, [0.0, 0.2]);
    }
}
