//! Keyboard transport bindings.

use winit::keyboard::KeyCode;

use crate::audio::TransportCommand;

/// Transport command for a key press, given the current play state
///
/// Space toggles play/pause, S stops, 1-4 toggle mute on tracks 1-4.
pub fn command_for_key(key: KeyCode, playing: bool) -> Option<TransportCommand> {
    let command = match key {
        KeyCode::Space if playing => TransportCommand::Pause,
        KeyCode::Space => TransportCommand::Play,
        KeyCode::KeyS => TransportCommand::Stop,
        KeyCode::Digit1 => TransportCommand::Mute(0),
        KeyCode::Digit2 => TransportCommand::Mute(1),
        KeyCode::Digit3 => TransportCommand::Mute(2),
        KeyCode::Digit4 => TransportCommand::Mute(3),
        _ => return None,
    };
    Some(command)
}
