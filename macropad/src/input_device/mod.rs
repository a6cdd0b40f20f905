//! Rotary position sources.
//!
//! A [`RotaryChannel`] reports an absolute detent counter. It is either a
//! polled quadrature decoder ([`rotary_encoder::QuadratureCounter`]) or one
//! half of a device which counts two encoders at once ([`SplitChannel`]).
use core::cell::RefCell;

use embedded_hal::digital::ErrorKind;

pub mod rotary_encoder;

/// Error of a rotary channel read.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelError {
    /// A pin or bus read failed.
    Bus(ErrorKind),
    /// The shared device is already borrowed by another half.
    Busy,
}

/// A monotonic detent counter of one encoder.
pub trait RotaryChannel {
    /// Current absolute position.
    fn position(&mut self) -> Result<i32, ChannelError>;
}

/// A device counting two encoders, e.g. a dual incremental encoder state machine.
pub trait DualChannel {
    fn positions(&mut self) -> Result<(i32, i32), ChannelError>;
}

/// Which position of a [`DualChannel`] a [`SplitChannel`] reads.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Half {
    First,
    Second,
}

impl Half {
    /// Half serving the `i`-th encoder of a list wired two per device.
    pub fn for_index(i: usize) -> Self {
        if i % 2 == 0 { Half::First } else { Half::Second }
    }
}

/// One half of a shared [`DualChannel`], usable as a standalone [`RotaryChannel`].
pub struct SplitChannel<'a, D: DualChannel> {
    device: &'a RefCell<D>,
    half: Half,
}

impl<'a, D: DualChannel> SplitChannel<'a, D> {
    pub fn new(device: &'a RefCell<D>, half: Half) -> Self {
        Self { device, half }
    }

    /// Both halves of one device.
    pub fn pair(device: &'a RefCell<D>) -> (Self, Self) {
        (Self::new(device, Half::First), Self::new(device, Half::Second))
    }
}

impl<D: DualChannel> RotaryChannel for SplitChannel<'_, D> {
    fn position(&mut self) -> Result<i32, ChannelError> {
        let mut device = self.device.try_borrow_mut().map_err(|_| ChannelError::Busy)?;
        let (first, second) = device.positions()?;
        Ok(match self.half {
            Half::First => first,
            Half::Second => second,
        })
    }
}
