//! Per-program volume mixer in the style of deej.
//!
//! The mixer keeps a volume for each configured program and a cursor on the
//! current one. Dials and buttons drive it through `Custom` actions, so it is
//! usually kept in a `RefCell` shared by the callbacks. After each change the
//! host-side mixer is updated with [`Mixer::write_serial_frame`].
use core::fmt::{self, Write};

use heapless::String;

use crate::config::ConfigError;

pub const DEFAULT_VOLUME: u8 = 50;
pub const MAX_VOLUME: u8 = 100;
/// Full scale of a slider value on the serial link.
pub const MAX_ANALOG_VOLUME: u16 = 1023;

/// Convert a volume in `0..=100` to the `0..=1023` scale, rounded to nearest.
pub fn analog_value(volume: u8) -> u16 {
    ((volume as u32 * MAX_ANALOG_VOLUME as u32 + MAX_VOLUME as u32 / 2) / MAX_VOLUME as u32) as u16
}

pub struct Mixer<'a, const N: usize> {
    programs: [&'a str; N],
    volumes: [u8; N],
    current: usize,
}

impl<'a, const N: usize> Mixer<'a, N> {
    pub fn new(programs: [&'a str; N]) -> Result<Self, ConfigError> {
        if N == 0 {
            error!("Mixer needs at least one program");
            return Err(ConfigError::EmptyMixer);
        }
        Ok(Self {
            programs,
            volumes: [DEFAULT_VOLUME; N],
            current: 0,
        })
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn current_program(&self) -> &'a str {
        self.programs[self.current]
    }

    pub fn current_volume(&self) -> u8 {
        self.volumes[self.current]
    }

    pub fn volumes(&self) -> &[u8; N] {
        &self.volumes
    }

    /// Move the cursor by `step` programs, wrapping around both ends.
    pub fn cycle_programs(&mut self, step: i8) {
        self.current = (self.current as i64 + step as i64).rem_euclid(N as i64) as usize;
        debug!("Mixer program: {}", self.current);
    }

    /// Change the current program's volume by `step`, clamped to `0..=100`.
    /// Returns the new volume.
    pub fn change_volume(&mut self, step: i8) -> u8 {
        let volume = (self.volumes[self.current] as i16 + step as i16).clamp(0, MAX_VOLUME as i16) as u8;
        self.volumes[self.current] = volume;
        debug!("Mixer volume of {}: {}", self.current, volume);
        volume
    }

    /// Status line of the current program, `"<volume> - <program>"`.
    pub fn write_display<W: Write>(&self, out: &mut W) -> fmt::Result {
        write!(out, "{} - {}", self.current_volume(), self.current_program())
    }

    /// [`Mixer::write_display`] into a fixed-capacity string.
    pub fn display<const L: usize>(&self) -> Result<String<L>, fmt::Error> {
        let mut line = String::new();
        self.write_display(&mut line)?;
        Ok(line)
    }

    /// [`Mixer::write_serial_frame`] into a fixed-capacity string.
    pub fn serial_frame<const L: usize>(&self) -> Result<String<L>, fmt::Error> {
        let mut frame = String::new();
        self.write_serial_frame(&mut frame)?;
        Ok(frame)
    }

    /// All volumes on the `0..=1023` scale, separated by `|`.
    pub fn write_serial_frame<W: Write>(&self, out: &mut W) -> fmt::Result {
        for (i, volume) in self.volumes.iter().enumerate() {
            if i > 0 {
                out.write_char('|')?;
            }
            write!(out, "{}", analog_value(*volume))?;
        }
        Ok(())
    }
}
