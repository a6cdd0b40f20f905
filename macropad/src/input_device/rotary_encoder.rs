//! Polled quadrature decoder
//!
//! The phase tables are adapted from: <https://github.com/leshow/rotary-encoder-hal/blob/master/src/lib.rs>
use embedded_hal::digital::{Error, InputPin};

use super::{ChannelError, RotaryChannel};
use crate::event::Direction;

/// Allows customizing which Quadrature Phases should be considered movements
/// and in which direction or ignored.
pub trait Phase {
    /// Given the current state `s`, return the direction.
    fn direction(&mut self, s: u8) -> Option<Direction>;
}

/// Default implementation of `Phase`.
pub struct DefaultPhase;

/// The useful values of `s` are:
/// - 0b0001 | 0b0111 | 0b1000 | 0b1110
/// - 0b0010 | 0b0100 | 0b1011 | 0b1101
impl Phase for DefaultPhase {
    fn direction(&mut self, s: u8) -> Option<Direction> {
        match s {
            0b0001 | 0b0111 | 0b1000 | 0b1110 => Some(Direction::Clockwise),
            0b0010 | 0b0100 | 0b1011 | 0b1101 => Some(Direction::CounterClockwise),
            _ => None,
        }
    }
}

/// Phase implementation for E8H7 encoder
pub struct E8H7Phase;
impl Phase for E8H7Phase {
    fn direction(&mut self, s: u8) -> Option<Direction> {
        match s {
            0b0010 | 0b1101 => Some(Direction::Clockwise),
            0b0001 | 0b1110 => Some(Direction::CounterClockwise),
            _ => None,
        }
    }
}

/// Phase implementation which reports one detent every `resolution` pulses
pub struct ResolutionPhase {
    resolution: u8,
    lut: [i8; 16],
    pulses: i8,
}

impl ResolutionPhase {
    pub fn new(resolution: u8, reverse: bool) -> Self {
        // Each entry corresponds to a state transition and provides +1, -1, or 0 pulse
        let mut lut = [0, -1, 1, 0, 1, 0, 0, -1, -1, 0, 0, 1, 0, 1, -1, 0];
        if reverse {
            lut = lut.map(|x| -x);
        }
        Self {
            resolution: resolution.clamp(1, i8::MAX as u8),
            lut,
            pulses: 0,
        }
    }
}

impl Phase for ResolutionPhase {
    fn direction(&mut self, s: u8) -> Option<Direction> {
        // Only proceed if there was a state change
        if (s & 0xC) != (s & 0x3) {
            self.pulses = self.pulses.saturating_add(self.lut[s as usize & 0xF]);
            let resolution = self.resolution as i8;
            if self.pulses >= resolution {
                self.pulses %= resolution;
                return Some(Direction::CounterClockwise);
            } else if self.pulses <= -resolution {
                self.pulses %= resolution;
                return Some(Direction::Clockwise);
            }
        }
        None
    }
}

/// Quadrature transitions per detent of a common mechanical encoder.
pub const DEFAULT_DIVISOR: u8 = 4;

/// Two pins decoded into an absolute detent counter.
///
/// The phase reports single quadrature transitions, the counter moves by one
/// every `divisor` transitions in the same direction. A half-turned detent
/// which springs back leaves the position unchanged.
///
/// The pins are sampled every time the position is read, so the poll rate
/// must be faster than the encoder's edge rate. Boards with a hardware or PIO
/// counter should implement [`RotaryChannel`] on top of it instead.
pub struct QuadratureCounter<A, B, P> {
    pin_a: A,
    pin_b: B,
    state: u8,
    phase: P,
    divisor: i8,
    pulses: i8,
    position: i32,
}

impl<A: InputPin, B: InputPin> QuadratureCounter<A, B, DefaultPhase> {
    /// Counter for an encoder with [`DEFAULT_DIVISOR`] transitions per detent.
    pub fn new(pin_a: A, pin_b: B) -> Self {
        Self::with_phase(pin_a, pin_b, DefaultPhase).with_divisor(DEFAULT_DIVISOR)
    }
}

impl<A: InputPin, B: InputPin> QuadratureCounter<A, B, ResolutionPhase> {
    /// Creates a new counter with the specified resolution
    pub fn with_resolution(pin_a: A, pin_b: B, resolution: u8, reverse: bool) -> Self {
        Self::with_phase(pin_a, pin_b, ResolutionPhase::new(resolution, reverse))
    }
}

impl<A: InputPin, B: InputPin, P: Phase> QuadratureCounter<A, B, P> {
    /// Counter which moves on every direction reported by `phase`.
    pub fn with_phase(pin_a: A, pin_b: B, phase: P) -> Self {
        Self {
            pin_a,
            pin_b,
            state: 0u8,
            phase,
            divisor: 1,
            pulses: 0,
            position: 0,
        }
    }

    /// Move the position once every `divisor` reported directions.
    pub fn with_divisor(mut self, divisor: u8) -> Self {
        self.divisor = divisor.clamp(1, i8::MAX as u8) as i8;
        self.pulses = 0;
        self
    }

    /// Sample both pins once and advance the counter.
    ///
    /// Returns the direction when the position changed.
    pub fn update(&mut self) -> Result<Option<Direction>, ChannelError> {
        // use mask to get previous state value
        let mut s = self.state & 0b11;

        if self.pin_a.is_low().map_err(|e| ChannelError::Bus(e.kind()))? {
            s |= 0b0100;
        }
        if self.pin_b.is_low().map_err(|e| ChannelError::Bus(e.kind()))? {
            s |= 0b1000;
        }

        // move new state in
        self.state = s >> 2;

        match self.phase.direction(s) {
            Some(Direction::Clockwise) => self.pulses += 1,
            Some(Direction::CounterClockwise) => self.pulses -= 1,
            None => return Ok(None),
        }
        if self.pulses >= self.divisor {
            self.pulses = 0;
            self.position = self.position.wrapping_add(1);
            Ok(Some(Direction::Clockwise))
        } else if self.pulses <= -self.divisor {
            self.pulses = 0;
            self.position = self.position.wrapping_sub(1);
            Ok(Some(Direction::CounterClockwise))
        } else {
            Ok(None)
        }
    }

    /// Consumes the counter, returning the underlying pins `A` and `B`.
    pub fn into_inner(self) -> (A, B) {
        (self.pin_a, self.pin_b)
    }
}

impl<A: InputPin, B: InputPin, P: Phase> RotaryChannel for QuadratureCounter<A, B, P> {
    fn position(&mut self) -> Result<i32, ChannelError> {
        self.update()?;
        Ok(self.position)
    }
}
