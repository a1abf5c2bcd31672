//! Keyboard shortcuts: a fixed leather palette on the digit keys.

use corelib::Color;
use winit::keyboard::{KeyCode, PhysicalKey};

/// Leather tones bound to keys 1-9, in order: black, saddle, tan,
/// burgundy, navy, olive, cream, red, gray.
pub const PALETTE: [u32; 9] = [
    0x1a1a1a, 0x8b4513, 0xd2b48c, 0x800020, 0x1f2a44, 0x556b2f, 0xf5f5dc, 0xb22222, 0x808080,
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum KeyAction {
    Exit,
    Recolor(Color),
    RestoreColor,
    None,
}

pub fn key_action(key: PhysicalKey) -> KeyAction {
    let PhysicalKey::Code(code) = key else {
        return KeyAction::None;
    };
    let slot = match code {
        KeyCode::Escape => return KeyAction::Exit,
        KeyCode::Digit0 | KeyCode::Numpad0 => return KeyAction::RestoreColor,
        KeyCode::Digit1 | KeyCode::Numpad1 => 0,
        KeyCode::Digit2 | KeyCode::Numpad2 => 1,
        KeyCode::Digit3 | KeyCode::Numpad3 => 2,
        KeyCode::Digit4 | KeyCode::Numpad4 => 3,
        KeyCode::Digit5 | KeyCode::Numpad5 => 4,
        KeyCode::Digit6 | KeyCode::Numpad6 => 5,
        KeyCode::Digit7 | KeyCode::Numpad7 => 6,
        KeyCode::Digit8 | KeyCode::Numpad8 => 7,
        KeyCode::Digit9 | KeyCode::Numpad9 => 8,
        _ => return KeyAction::None,
    };
    KeyAction::Recolor(Color::from_hex(PALETTE[slot]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_pick_palette_entries() {
        assert_eq!(
            key_action(PhysicalKey::Code(KeyCode::Digit2)),
            KeyAction::Recolor(Color::from_hex(0x8b4513))
        );
        assert_eq!(
            key_action(PhysicalKey::Code(KeyCode::Numpad9)),
            KeyAction::Recolor(Color::from_hex(0x808080))
        );
        assert_eq!(
            key_action(PhysicalKey::Code(KeyCode::Digit0)),
            KeyAction::RestoreColor
        );
        assert_eq!(key_action(PhysicalKey::Code(KeyCode::Escape)), KeyAction::Exit);
        assert_eq!(key_action(PhysicalKey::Code(KeyCode::KeyQ)), KeyAction::None);
    }
}
