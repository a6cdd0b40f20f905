//! Edge detection for buttons.
//!
//! A physical line is read through a [`DigitalSource`], and an [`EdgeButton`]
//! turns the sampled level into press and release edges.
//!
//! There is no time-based debounce here: contact bounce is absorbed by the
//! coarse poll period of the control loop. A contact that bounces across two
//! poll ticks produces an extra press/release pair.
use embedded_hal::digital::{Error, ErrorKind, InputPin};
use macropad_types::action::Action;

use crate::event::{ButtonEvent, LogicalSource};

/// A single digital line, either a GPIO pin or a pin behind an I/O expander.
///
/// Every [`InputPin`] is a `DigitalSource`. The error is reduced to its
/// [`ErrorKind`] so that differently wired lines can be kept side by side as
/// `dyn DigitalSource`.
pub trait DigitalSource {
    /// Read the physical level of the line, `true` means high.
    fn read(&mut self) -> Result<bool, ErrorKind>;
}

impl<P: InputPin> DigitalSource for P {
    fn read(&mut self) -> Result<bool, ErrorKind> {
        self.is_high().map_err(|e| e.kind())
    }
}

/// Logical state of a button.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonState {
    #[default]
    Released,
    Pressed,
}

/// Two-state machine which reports at most one press and one release per actuation.
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EdgeButton {
    state: ButtonState,
}

impl EdgeButton {
    pub const fn new() -> Self {
        Self {
            state: ButtonState::Released,
        }
    }

    pub fn state(&self) -> ButtonState {
        self.state
    }

    pub fn is_pressed(&self) -> bool {
        self.state == ButtonState::Pressed
    }

    /// Feed one sample, `is_asserted` is the logical level after active-low inversion.
    pub fn sample(&mut self, is_asserted: bool) -> Option<ButtonEvent> {
        match (self.state, is_asserted) {
            (ButtonState::Released, true) => {
                self.state = ButtonState::Pressed;
                Some(ButtonEvent::Press)
            }
            (ButtonState::Pressed, false) => {
                self.state = ButtonState::Released;
                Some(ButtonEvent::Release)
            }
            _ => None,
        }
    }
}

/// A button wired to its own line, with the action it triggers.
pub struct DirectButton<'a> {
    source: &'a mut dyn DigitalSource,
    edge: EdgeButton,
    action: Action<'a>,
    /// Pin active level
    low_active: bool,
    id: u8,
}

impl<'a> DirectButton<'a> {
    /// Create a button on `source`. Buttons pulled up and shorted to ground
    /// when pressed are `low_active`.
    pub fn new(source: &'a mut dyn DigitalSource, action: Action<'a>, low_active: bool, id: u8) -> Self {
        Self {
            source,
            edge: EdgeButton::new(),
            action,
            low_active,
            id,
        }
    }

    /// Sample the line once. A failed read counts as "no change" for this cycle.
    pub fn poll(&mut self) -> Option<ButtonEvent> {
        let level = match self.source.read() {
            Ok(level) => level,
            Err(e) => {
                warn!("Reading button {} failed: {:?}", self.id, e);
                return None;
            }
        };
        let event = self.edge.sample(level != self.low_active);
        if let Some(event) = event {
            debug!("Button {}: {:?}", self.id, event);
        }
        event
    }

    pub fn action(&self) -> Action<'a> {
        self.action
    }

    pub fn source(&self) -> LogicalSource {
        LogicalSource::Line(self.id)
    }

    pub fn state(&self) -> ButtonState {
        self.edge.state()
    }
}
