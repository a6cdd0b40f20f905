//! Actions bound to physical inputs.
//!
//! Key types:
//! - [`Action`] - What a button edge or a dial detent triggers
//! - [`KeyCombo`] - Up to [`MAX_COMBO_KEYS`] keys pressed and released together
//!
//! Actions are built once from static configuration and only read afterwards,
//! so every variant is `Copy`.
use core::fmt;

use crate::keycode::{ConsumerKey, HidKeyCode};

/// Maximum number of keys in one combo, bounded by the 6 slots of the boot keyboard report.
pub const MAX_COMBO_KEYS: usize = 6;

/// An ordered set of keys which are pressed together and released together.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyCombo {
    keys: [HidKeyCode; MAX_COMBO_KEYS],
    len: u8,
}

impl KeyCombo {
    /// Create a combo from at most [`MAX_COMBO_KEYS`] keys, checked at compile time.
    pub const fn new<const N: usize>(keys: [HidKeyCode; N]) -> Self {
        const { assert!(N <= MAX_COMBO_KEYS, "a key combo holds at most 6 keys") };
        let mut buf = [HidKeyCode::No; MAX_COMBO_KEYS];
        let mut i = 0;
        while i < N {
            buf[i] = keys[i];
            i += 1;
        }
        Self { keys: buf, len: N as u8 }
    }

    /// Create a combo from a runtime slice, `None` if it is too long.
    pub fn from_slice(keys: &[HidKeyCode]) -> Option<Self> {
        if keys.len() > MAX_COMBO_KEYS {
            return None;
        }
        let mut buf = [HidKeyCode::No; MAX_COMBO_KEYS];
        for (slot, key) in buf.iter_mut().zip(keys) {
            *slot = *key;
        }
        Some(Self {
            keys: buf,
            len: keys.len() as u8,
        })
    }

    pub fn keys(&self) -> &[HidKeyCode] {
        &self.keys[..self.len as usize]
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// A single operation executed by the dispatcher on a press or release edge.
#[derive(Clone, Copy, Default)]
pub enum Action<'a> {
    /// No action, both edges are ignored.
    #[default]
    No,
    /// Hold the keys while the input is pressed, release them on release.
    KeyCombo(KeyCombo),
    /// Momentary consumer control command, sent once on press.
    Media(ConsumerKey),
    /// Type an ASCII string on press, optionally followed by Enter.
    Text { text: &'a str, newline: bool },
    /// Scroll the mouse wheel by the given amount on press.
    Wheel(i8),
    /// Invoke a callback on press.
    Custom(&'a dyn Fn()),
}

impl Action<'_> {
    pub fn is_no(&self) -> bool {
        matches!(self, Action::No)
    }
}

impl fmt::Debug for Action<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::No => write!(f, "No"),
            Action::KeyCombo(combo) => f.debug_tuple("KeyCombo").field(&combo.keys()).finish(),
            Action::Media(key) => f.debug_tuple("Media").field(key).finish(),
            Action::Text { text, newline } => f
                .debug_struct("Text")
                .field("text", text)
                .field("newline", newline)
                .finish(),
            Action::Wheel(amount) => f.debug_tuple("Wheel").field(amount).finish(),
            Action::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Action<'_> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Action::No => defmt::write!(f, "No"),
            Action::KeyCombo(combo) => defmt::write!(f, "KeyCombo({})", combo.keys()),
            Action::Media(key) => defmt::write!(f, "Media({})", key),
            Action::Text { text, newline } => defmt::write!(f, "Text({=str}, {})", text, newline),
            Action::Wheel(amount) => defmt::write!(f, "Wheel({})", amount),
            Action::Custom(_) => defmt::write!(f, "Custom(..)"),
        }
    }
}

/// Create a [`Action::KeyCombo`] from keycode names.
///
/// ```ignore
/// let undo = combo!(LCtrl, Z);
/// ```
#[macro_export]
macro_rules! combo {
    ($($k:ident),+ $(,)?) => {
        $crate::action::Action::KeyCombo($crate::action::KeyCombo::new([
            $($crate::keycode::HidKeyCode::$k),+
        ]))
    };
}

/// Create a [`Action::Media`] from a consumer key name.
#[macro_export]
macro_rules! media {
    ($k:ident) => {
        $crate::action::Action::Media($crate::keycode::ConsumerKey::$k)
    };
}

/// Create a [`Action::Text`], append `, newline` to press Enter after the text.
#[macro_export]
macro_rules! text {
    ($s:expr) => {
        $crate::action::Action::Text { text: $s, newline: false }
    };
    ($s:expr, newline) => {
        $crate::action::Action::Text { text: $s, newline: true }
    };
}
