use std::fmt;

/// Virtual key code: an index into the 256-entry key table.
///
/// Values follow the classic virtual-key numbering, so letters and digits
/// are their ASCII uppercase codes.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct KeyCode(pub u8);

impl KeyCode {
    pub const BACKSPACE: KeyCode = KeyCode(0x08);
    pub const TAB: KeyCode = KeyCode(0x09);
    pub const ENTER: KeyCode = KeyCode(0x0D);
    pub const SHIFT: KeyCode = KeyCode(0x10);
    pub const CONTROL: KeyCode = KeyCode(0x11);
    pub const ALT: KeyCode = KeyCode(0x12);
    pub const ESCAPE: KeyCode = KeyCode(0x1B);
    pub const SPACE: KeyCode = KeyCode(0x20);
    pub const PAGE_UP: KeyCode = KeyCode(0x21);
    pub const PAGE_DOWN: KeyCode = KeyCode(0x22);
    pub const END: KeyCode = KeyCode(0x23);
    pub const HOME: KeyCode = KeyCode(0x24);
    pub const LEFT: KeyCode = KeyCode(0x25);
    pub const UP: KeyCode = KeyCode(0x26);
    pub const RIGHT: KeyCode = KeyCode(0x27);
    pub const DOWN: KeyCode = KeyCode(0x28);
    pub const INSERT: KeyCode = KeyCode(0x2D);
    pub const DELETE: KeyCode = KeyCode(0x2E);

    pub const DIGIT_0: KeyCode = KeyCode(b'0');
    pub const A: KeyCode = KeyCode(b'A');

    pub const F1: KeyCode = KeyCode(0x70);
    pub const F12: KeyCode = KeyCode(0x7B);

    /// `'0'..='9'` → digit keys.
    pub const fn digit(n: u8) -> Option<KeyCode> {
        if n <= 9 {
            Some(KeyCode(b'0' + n))
        } else {
            None
        }
    }

    /// `'A'..='Z'` (either case) → letter keys.
    pub const fn letter(c: char) -> Option<KeyCode> {
        let upper = c.to_ascii_uppercase();
        if upper.is_ascii_uppercase() {
            Some(KeyCode(upper as u8))
        } else {
            None
        }
    }

    /// `1..=12` → F1..F12.
    pub const fn function(n: u8) -> Option<KeyCode> {
        if n >= 1 && n <= 12 {
            Some(KeyCode(Self::F1.0 + n - 1))
        } else {
            None
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            KeyCode::ESCAPE => f.write_str("Escape"),
            KeyCode(c @ (b'0'..=b'9' | b'A'..=b'Z')) => write!(f, "{}", c as char),
            KeyCode(c) => write!(f, "0x{c:02X}"),
        }
    }
}
