use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode as WinitKeyCode, PhysicalKey};

use crate::input::{InputEvent, KeyCode, KeyState};

/// Translates a winit `WindowEvent` into an engine `InputEvent`.
///
/// Returns `None` for events not represented by the input subsystem,
/// including keys with no virtual-key equivalent.
pub fn translate_window_event(event: &WindowEvent) -> Option<InputEvent> {
    match event {
        WindowEvent::Focused(f) => Some(InputEvent::Focused(*f)),

        WindowEvent::KeyboardInput { event, .. } => {
            let code = map_key(event.physical_key)?;
            let state = match event.state {
                ElementState::Pressed => KeyState::Pressed,
                ElementState::Released => KeyState::Released,
            };
            Some(InputEvent::Key { code, state })
        }

        _ => None,
    }
}

/// Maps a physical key to its virtual-key code.
pub fn map_key(pk: PhysicalKey) -> Option<KeyCode> {
    let PhysicalKey::Code(code) = pk else {
        return None;
    };

    let key = match code {
        WinitKeyCode::Escape => KeyCode::ESCAPE,
        WinitKeyCode::Enter | WinitKeyCode::NumpadEnter => KeyCode::ENTER,
        WinitKeyCode::Tab => KeyCode::TAB,
        WinitKeyCode::Backspace => KeyCode::BACKSPACE,
        WinitKeyCode::Space => KeyCode::SPACE,

        WinitKeyCode::Insert => KeyCode::INSERT,
        WinitKeyCode::Delete => KeyCode::DELETE,
        WinitKeyCode::Home => KeyCode::HOME,
        WinitKeyCode::End => KeyCode::END,
        WinitKeyCode::PageUp => KeyCode::PAGE_UP,
        WinitKeyCode::PageDown => KeyCode::PAGE_DOWN,

        WinitKeyCode::ArrowUp => KeyCode::UP,
        WinitKeyCode::ArrowDown => KeyCode::DOWN,
        WinitKeyCode::ArrowLeft => KeyCode::LEFT,
        WinitKeyCode::ArrowRight => KeyCode::RIGHT,

        WinitKeyCode::ShiftLeft | WinitKeyCode::ShiftRight => KeyCode::SHIFT,
        WinitKeyCode::ControlLeft | WinitKeyCode::ControlRight => KeyCode::CONTROL,
        WinitKeyCode::AltLeft | WinitKeyCode::AltRight => KeyCode::ALT,

        WinitKeyCode::KeyA => KeyCode(b'A'),
        WinitKeyCode::KeyB => KeyCode(b'B'),
        WinitKeyCode::KeyC => KeyCode(b'C'),
        WinitKeyCode::KeyD => KeyCode(b'D'),
        WinitKeyCode::KeyE => KeyCode(b'E'),
        WinitKeyCode::KeyF => KeyCode(b'F'),
        WinitKeyCode::KeyG => KeyCode(b'G'),
        WinitKeyCode::KeyH => KeyCode(b'H'),
        WinitKeyCode::KeyI => KeyCode(b'I'),
        WinitKeyCode::KeyJ => KeyCode(b'J'),
        WinitKeyCode::KeyK => KeyCode(b'K'),
        WinitKeyCode::KeyL => KeyCode(b'L'),
        WinitKeyCode::KeyM => KeyCode(b'M'),
        WinitKeyCode::KeyN => KeyCode(b'N'),
        WinitKeyCode::KeyO => KeyCode(b'O'),
        WinitKeyCode::KeyP => KeyCode(b'P'),
        WinitKeyCode::KeyQ => KeyCode(b'Q'),
        WinitKeyCode::KeyR => KeyCode(b'R'),
        WinitKeyCode::KeyS => KeyCode(b'S'),
        WinitKeyCode::KeyT => KeyCode(b'T'),
        WinitKeyCode::KeyU => KeyCode(b'U'),
        WinitKeyCode::KeyV => KeyCode(b'V'),
        WinitKeyCode::KeyW => KeyCode(b'W'),
        WinitKeyCode::KeyX => KeyCode(b'X'),
        WinitKeyCode::KeyY => KeyCode(b'Y'),
        WinitKeyCode::KeyZ => KeyCode(b'Z'),

        WinitKeyCode::Digit0 => KeyCode(b'0'),
        WinitKeyCode::Digit1 => KeyCode(b'1'),
        WinitKeyCode::Digit2 => KeyCode(b'2'),
        WinitKeyCode::Digit3 => KeyCode(b'3'),
        WinitKeyCode::Digit4 => KeyCode(b'4'),
        WinitKeyCode::Digit5 => KeyCode(b'5'),
        WinitKeyCode::Digit6 => KeyCode(b'6'),
        WinitKeyCode::Digit7 => KeyCode(b'7'),
        WinitKeyCode::Digit8 => KeyCode(b'8'),
        WinitKeyCode::Digit9 => KeyCode(b'9'),

        WinitKeyCode::F1 => KeyCode(0x70),
        WinitKeyCode::F2 => KeyCode(0x71),
        WinitKeyCode::F3 => KeyCode(0x72),
        WinitKeyCode::F4 => KeyCode(0x73),
        WinitKeyCode::F5 => KeyCode(0x74),
        WinitKeyCode::F6 => KeyCode(0x75),
        WinitKeyCode::F7 => KeyCode(0x76),
        WinitKeyCode::F8 => KeyCode(0x77),
        WinitKeyCode::F9 => KeyCode(0x78),
        WinitKeyCode::F10 => KeyCode(0x79),
        WinitKeyCode::F11 => KeyCode(0x7A),
        WinitKeyCode::F12 => KeyCode(0x7B),

        _ => return None,
    };

    Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::NativeKeyCode;

    #[test]
    fn escape_maps_to_virtual_escape() {
        assert_eq!(map_key(PhysicalKey::Code(WinitKeyCode::Escape)), Some(KeyCode::ESCAPE));
    }

    #[test]
    fn letters_digits_and_function_keys() {
        assert_eq!(map_key(PhysicalKey::Code(WinitKeyCode::KeyA)), KeyCode::letter('a'));
        assert_eq!(map_key(PhysicalKey::Code(WinitKeyCode::Digit5)), KeyCode::digit(5));
        assert_eq!(map_key(PhysicalKey::Code(WinitKeyCode::F12)), KeyCode::function(12));
        assert_eq!(map_key(PhysicalKey::Code(WinitKeyCode::ArrowLeft)), Some(KeyCode::LEFT));
    }

    #[test]
    fn unmapped_keys_are_ignored() {
        assert_eq!(map_key(PhysicalKey::Code(WinitKeyCode::MediaPlayPause)), None);
        assert_eq!(map_key(PhysicalKey::Unidentified(NativeKeyCode::Unidentified)), None);
    }

    #[test]
    fn focus_events_translate() {
        assert_eq!(
            translate_window_event(&WindowEvent::Focused(false)),
            Some(InputEvent::Focused(false))
        );
        assert_eq!(translate_window_event(&WindowEvent::CloseRequested), None);
    }
}
