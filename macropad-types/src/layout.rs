//! US keyboard layout for typing ASCII text through the boot keyboard report.
use crate::keycode::HidKeyCode;

/// A character as typed on a US layout: the key and whether Shift is held.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Keystroke {
    pub key: HidKeyCode,
    pub shift: bool,
}

const fn plain(key: HidKeyCode) -> Option<Keystroke> {
    Some(Keystroke { key, shift: false })
}

const fn shifted(key: HidKeyCode) -> Option<Keystroke> {
    Some(Keystroke { key, shift: true })
}

/// Map an ASCII character to its US-layout keystroke, `None` for characters
/// that cannot be typed.
pub fn keystroke_for(c: char) -> Option<Keystroke> {
    use HidKeyCode::*;

    if c.is_ascii_lowercase() {
        return HidKeyCode::from_repr(c as u8 - b'a' + A as u8).and_then(plain);
    }
    if c.is_ascii_uppercase() {
        return HidKeyCode::from_repr(c as u8 - b'A' + A as u8).and_then(shifted);
    }
    match c {
        '1'..='9' => HidKeyCode::from_repr(c as u8 - b'1' + Kc1 as u8).and_then(plain),
        '0' => plain(Kc0),
        '\n' => plain(Enter),
        '\t' => plain(Tab),
        ' ' => plain(Space),
        '!' => shifted(Kc1),
        '@' => shifted(Kc2),
        '#' => shifted(Kc3),
        '$' => shifted(Kc4),
        '%' => shifted(Kc5),
        '^' => shifted(Kc6),
        '&' => shifted(Kc7),
        '*' => shifted(Kc8),
        '(' => shifted(Kc9),
        ')' => shifted(Kc0),
        '-' => plain(Minus),
        '_' => shifted(Minus),
        '=' => plain(Equal),
        '+' => shifted(Equal),
        '[' => plain(LeftBracket),
        '{' => shifted(LeftBracket),
        ']' => plain(RightBracket),
        '}' => shifted(RightBracket),
        '\\' => plain(Backslash),
        '|' => shifted(Backslash),
        ';' => plain(Semicolon),
        ':' => shifted(Semicolon),
        '\'' => plain(Quote),
        '"' => shifted(Quote),
        '`' => plain(Grave),
        '~' => shifted(Grave),
        ',' => plain(Comma),
        '<' => shifted(Comma),
        '.' => plain(Dot),
        '>' => shifted(Dot),
        '/' => plain(Slash),
        '?' => shifted(Slash),
        _ => None,
    }
}
