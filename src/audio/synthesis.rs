//! Procedural demo tracks rendered offline with Glicol.
//!
//! Used when no WAV files are given. Each composition is written to exercise
//! the modulator its track feeds: low kicks for the shell, a slow pad for the
//! cloud, the arpeggiated lead for the post effects and hats for the lights.

use glicol::Engine;

use super::track::Track;
use crate::error::AudioError;
use crate::params::audio_constants::BLOCK_SIZE;

/// Bass kick pattern (feeds the outer shell)
pub const BASS_COMPOSITION: &str = r#"
~gate: speed 2.0 >> seq 36 _36 _ 36
~amp: ~gate >> envperc 0.005 0.3
~pit: ~gate >> mul 261.63
~bass: saw ~pit >> mul ~amp >> lpf 400.0 1.0 >> mul 0.4
o: ~bass >> plate 0.05
"#;

/// Slow pad (feeds the particle cloud)
pub const PAD_COMPOSITION: &str = r#"
~gate: speed 1.0 >> seq 60 _ 67 _
~amp: ~gate >> envperc 0.05 1.5
~pit: ~gate >> mul 261.63
~pad: tri ~pit >> mul ~amp >> mul 0.3
o: ~pad >> plate 0.3
"#;

/// Rising square arpeggio under a slow filter sweep (feeds the post effects)
pub const LEAD_COMPOSITION: &str = r#"
~gate: speed 4.0 >> seq 67 _ 72 _67 _ 64 _
~amp: ~gate >> envperc 0.002 0.2
~pit: ~gate >> mul 261.63
~lead: squ ~pit >> mul ~amp >> lpf ~sweep 3.0 >> mul 0.12
~sweep: sin 0.5 >> mul 900 >> add 1800
o: ~lead >> plate 0.15
"#;

/// Noise hats (feeds the lights)
pub const HATS_COMPOSITION: &str = r#"
~gate: speed 8.0 >> seq 60 60 _60 60
~amp: ~gate >> envperc 0.001 0.05
~hat: noise 42 >> hpf 8000.0 1.0 >> mul ~amp >> mul 0.2
o: ~hat >> plate 0.1
"#;

/// Name and code of each demo track, in track order
pub const DEMO_TRACKS: [(&str, &str); 4] = [
    ("bass", BASS_COMPOSITION),
    ("pad", PAD_COMPOSITION),
    ("lead", LEAD_COMPOSITION),
    ("hats", HATS_COMPOSITION),
];

/// Render `duration_secs` of a composition's left channel
pub fn render_composition(
    code: &str,
    sample_rate: u32,
    duration_secs: f32,
) -> Result<Vec<f32>, AudioError> {
    let mut engine = Engine::<BLOCK_SIZE>::new();
    engine.set_sr(sample_rate as usize);
    engine.update_with_code(code);
    engine
        .update()
        .map_err(|e| AudioError::Synthesis(format!("{:?}", e)))?;

    let total = (duration_secs * sample_rate as f32).ceil() as usize;
    let mut samples = Vec::with_capacity(total + BLOCK_SIZE);

    while samples.len() < total {
        let (buffers, _) = engine.next_block(vec![]);
        let take = (total - samples.len()).min(BLOCK_SIZE);
        samples.extend((0..take).map(|i| buffers[0][i]));
    }
    Ok(samples)
}

/// Render every demo track at `sample_rate`
pub fn demo_tracks(sample_rate: u32, duration_secs: f32) -> Result<Vec<Track>, AudioError> {
    DEMO_TRACKS
        .iter()
        .map(|&(name, code)| {
            let samples = render_composition(code, sample_rate, duration_secs)?;
            Ok(Track::new(name, samples, sample_rate))
        })
        .collect()
}
