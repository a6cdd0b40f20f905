//! PCF8574 8-bit I/O expander.
//!
//! The PCF8574 has quasi-bidirectional ports: a pin latched high is a weak
//! pull-up which can be read as an input, a pin latched low sinks current.
//! The driver keeps the output latch and every write sends the whole byte, so
//! writing one pin never disturbs the others.
//!
//! Each [`ExpanderPin`] is an ordinary [`InputPin`]/[`OutputPin`], which lets
//! expander lines be used as direct buttons or as matrix rows and columns.
use core::cell::RefCell;

use embedded_hal::digital::{self, ErrorKind, ErrorType, InputPin, OutputPin};
use embedded_hal::i2c::I2c;

/// Address of a PCF8574 with A0..A2 tied low.
pub const DEFAULT_ADDRESS: u8 = 0x20;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ExpanderError<E> {
    /// The I2C transfer failed.
    Bus(E),
    /// Another pin handle is using the expander.
    Busy,
}

impl<E: core::fmt::Debug> digital::Error for ExpanderError<E> {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

pub struct Pcf8574<I2C> {
    i2c: I2C,
    address: u8,
    latch: u8,
}

impl<I2C: I2c> Pcf8574<I2C> {
    /// Create the driver. All pins start latched high, so they can be read.
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            latch: 0xFF,
        }
    }

    /// Write the latch to the port.
    pub fn init(&mut self) -> Result<(), I2C::Error> {
        self.i2c.write(self.address, &[self.latch])
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn latch(&self) -> u8 {
        self.latch
    }

    /// Drive all eight pins at once.
    pub fn write_port(&mut self, value: u8) -> Result<(), I2C::Error> {
        self.i2c.write(self.address, &[value])?;
        self.latch = value;
        Ok(())
    }

    /// Read the level of all eight pins.
    pub fn read_port(&mut self) -> Result<u8, I2C::Error> {
        let mut buf = [0u8; 1];
        self.i2c.read(self.address, &mut buf)?;
        Ok(buf[0])
    }

    pub fn set_pin(&mut self, bit: u8, high: bool) -> Result<(), I2C::Error> {
        let mask = 1u8 << (bit & 0x07);
        let value = if high { self.latch | mask } else { self.latch & !mask };
        self.write_port(value)
    }

    pub fn read_pin(&mut self, bit: u8) -> Result<bool, I2C::Error> {
        Ok(self.read_port()? & (1 << (bit & 0x07)) != 0)
    }

    pub fn release(self) -> I2C {
        self.i2c
    }
}

/// Handle on one pin of a shared [`Pcf8574`].
pub struct ExpanderPin<'a, I2C> {
    expander: &'a RefCell<Pcf8574<I2C>>,
    bit: u8,
}

impl<'a, I2C: I2c> ExpanderPin<'a, I2C> {
    pub fn new(expander: &'a RefCell<Pcf8574<I2C>>, bit: u8) -> Self {
        Self { expander, bit: bit & 0x07 }
    }

    /// Handles for all eight pins, `P0` first.
    pub fn split(expander: &'a RefCell<Pcf8574<I2C>>) -> [Self; 8] {
        core::array::from_fn(|bit| Self::new(expander, bit as u8))
    }

    pub fn bit(&self) -> u8 {
        self.bit
    }

    fn with_expander<T>(
        &mut self,
        f: impl FnOnce(&mut Pcf8574<I2C>, u8) -> Result<T, I2C::Error>,
    ) -> Result<T, ExpanderError<I2C::Error>> {
        let mut expander = self.expander.try_borrow_mut().map_err(|_| ExpanderError::Busy)?;
        f(&mut *expander, self.bit).map_err(ExpanderError::Bus)
    }
}

impl<I2C: I2c> ErrorType for ExpanderPin<'_, I2C> {
    type Error = ExpanderError<I2C::Error>;
}

impl<I2C: I2c> InputPin for ExpanderPin<'_, I2C> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.with_expander(|e, bit| e.read_pin(bit))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

impl<I2C: I2c> OutputPin for ExpanderPin<'_, I2C> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.with_expander(|e, bit| e.set_pin(bit, false))
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.with_expander(|e, bit| e.set_pin(bit, true))
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use std::vec;

    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    use super::*;
    use crate::button::DigitalSource;

    #[test]
    fn test_output_pins_keep_other_bits() {
        let expectations = [
            I2cTransaction::write(0x20, vec![0b1111_1110]),
            I2cTransaction::write(0x20, vec![0b1111_0110]),
            I2cTransaction::write(0x20, vec![0b1111_0111]),
        ];
        let mut i2c = I2cMock::new(&expectations);
        let expander = RefCell::new(Pcf8574::new(i2c.clone(), DEFAULT_ADDRESS));
        let [mut p0, _, _, mut p3, ..] = ExpanderPin::split(&expander);
        p0.set_low().unwrap();
        p3.set_low().unwrap();
        p0.set_high().unwrap();
        assert_eq!(expander.borrow().latch(), 0b1111_0111);
        i2c.done();
    }

    #[test]
    fn test_input_pin_reads_its_bit() {
        let expectations = [
            I2cTransaction::read(0x21, vec![0b0000_0100]),
            I2cTransaction::read(0x21, vec![0b1111_1011]),
        ];
        let mut i2c = I2cMock::new(&expectations);
        let expander = RefCell::new(Pcf8574::new(i2c.clone(), 0x21));
        let mut pin = ExpanderPin::new(&expander, 2);
        assert!(pin.is_high().unwrap());
        assert_eq!(pin.read(), Ok(false));
        i2c.done();
    }

    #[test]
    fn test_two_expanders_share_one_bus() {
        let expectations = [
            I2cTransaction::write(0x20, vec![0xFF]),
            I2cTransaction::write(0x21, vec![0xFF]),
            I2cTransaction::read(0x21, vec![0x01]),
        ];
        let mut i2c = I2cMock::new(&expectations);
        let bus = RefCell::new(i2c.clone());
        let first = RefCell::new(Pcf8574::new(embedded_hal_bus::i2c::RefCellDevice::new(&bus), 0x20));
        let second = RefCell::new(Pcf8574::new(embedded_hal_bus::i2c::RefCellDevice::new(&bus), 0x21));
        first.borrow_mut().init().unwrap();
        second.borrow_mut().init().unwrap();
        assert_eq!(ExpanderPin::new(&second, 0).read(), Ok(true));
        i2c.done();
    }

    #[test]
    fn test_busy_expander() {
        let expectations: [I2cTransaction; 0] = [];
        let mut i2c = I2cMock::new(&expectations);
        let expander = RefCell::new(Pcf8574::new(i2c.clone(), DEFAULT_ADDRESS));
        let mut pin = ExpanderPin::new(&expander, 0);
        {
            let _guard = expander.borrow_mut();
            assert_eq!(pin.is_high(), Err(ExpanderError::Busy));
        }
        i2c.done();
    }
}
