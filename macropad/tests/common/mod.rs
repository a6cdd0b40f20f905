#![allow(dead_code)]

use core::cell::{Cell, RefCell};

use embedded_hal::digital::{ErrorKind, ErrorType, InputPin, OutputPin};
use embedded_hal_async::delay::DelayNs;
use macropad::button::DigitalSource;
use macropad::hid::{HidError, HidSink, Report, ReportWriter};
use macropad::input_device::{ChannelError, RotaryChannel};
use macropad::types::keycode::{ConsumerKey, HidKeyCode};

// Init logger for tests
#[ctor::ctor]
pub fn init_log() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkCall {
    Press(Vec<HidKeyCode>),
    Release(Vec<HidKeyCode>),
    Media(ConsumerKey),
    Scroll(i8),
}

/// Records every sink call, optionally refusing presses like a full report would.
#[derive(Default)]
pub struct FakeSink {
    pub calls: Vec<SinkCall>,
    pub fail_press: bool,
}

impl HidSink for FakeSink {
    fn press(&mut self, keys: &[HidKeyCode]) -> Result<(), HidError> {
        self.calls.push(SinkCall::Press(keys.to_vec()));
        if self.fail_press {
            return Err(HidError::TooManyKeys);
        }
        Ok(())
    }

    fn release(&mut self, keys: &[HidKeyCode]) -> Result<(), HidError> {
        self.calls.push(SinkCall::Release(keys.to_vec()));
        Ok(())
    }

    fn send_media(&mut self, key: ConsumerKey) -> Result<(), HidError> {
        self.calls.push(SinkCall::Media(key));
        Ok(())
    }

    fn scroll(&mut self, amount: i8) -> Result<(), HidError> {
        self.calls.push(SinkCall::Scroll(amount));
        Ok(())
    }
}

#[derive(Default)]
pub struct ReportLog {
    pub reports: Vec<Report>,
}

impl ReportWriter for ReportLog {
    fn write_report(&mut self, report: Report) -> Result<(), HidError> {
        self.reports.push(report);
        Ok(())
    }
}

/// A line whose level is set by the test.
pub struct TestLine<'c> {
    pub level: &'c Cell<bool>,
}

impl DigitalSource for TestLine<'_> {
    fn read(&mut self) -> Result<bool, ErrorKind> {
        Ok(self.level.get())
    }
}

/// A rotary channel whose position is set by the test.
pub struct TestChannel<'c> {
    pub position: &'c Cell<i32>,
}

impl RotaryChannel for TestChannel<'_> {
    fn position(&mut self) -> Result<i32, ChannelError> {
        Ok(self.position.get())
    }
}

/// Electrical operation seen by a simulated matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinOp {
    RowHigh(usize),
    RowLow(usize),
    ColRead(usize),
    Settle(u32),
}

pub struct BoardState<const ROW: usize, const COL: usize> {
    pub row_high: [bool; ROW],
    pub pressed: [[bool; COL]; ROW],
    pub ops: Vec<PinOp>,
    /// Highest number of rows pulled low at the same time
    pub max_rows_low: usize,
    pub failing_row: Option<usize>,
    pub failing_col: Option<usize>,
}

/// A simulated diode matrix with pull-ups on the columns.
pub struct Board<const ROW: usize, const COL: usize> {
    pub state: RefCell<BoardState<ROW, COL>>,
}

impl<const ROW: usize, const COL: usize> Board<ROW, COL> {
    pub fn new() -> Self {
        Self {
            state: RefCell::new(BoardState {
                row_high: [true; ROW],
                pressed: [[false; COL]; ROW],
                ops: Vec::new(),
                max_rows_low: 0,
                failing_row: None,
                failing_col: None,
            }),
        }
    }

    pub fn set_pressed(&self, row: usize, col: usize, pressed: bool) {
        self.state.borrow_mut().pressed[row][col] = pressed;
    }

    pub fn take_ops(&self) -> Vec<PinOp> {
        core::mem::take(&mut self.state.borrow_mut().ops)
    }

    pub fn rows(&self) -> [RowPin<'_, ROW, COL>; ROW] {
        core::array::from_fn(|index| RowPin { board: self, index })
    }

    pub fn cols(&self) -> [ColPin<'_, ROW, COL>; COL] {
        core::array::from_fn(|index| ColPin { board: self, index })
    }

    pub fn delay(&self) -> SettleDelay<'_, ROW, COL> {
        SettleDelay { board: self }
    }
}

pub struct RowPin<'b, const ROW: usize, const COL: usize> {
    board: &'b Board<ROW, COL>,
    index: usize,
}

impl<const ROW: usize, const COL: usize> ErrorType for RowPin<'_, ROW, COL> {
    type Error = ErrorKind;
}

impl<const ROW: usize, const COL: usize> OutputPin for RowPin<'_, ROW, COL> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        let mut state = self.board.state.borrow_mut();
        if state.failing_row == Some(self.index) {
            return Err(ErrorKind::Other);
        }
        state.row_high[self.index] = false;
        state.ops.push(PinOp::RowLow(self.index));
        let low = state.row_high.iter().filter(|high| !**high).count();
        state.max_rows_low = state.max_rows_low.max(low);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        let mut state = self.board.state.borrow_mut();
        state.row_high[self.index] = true;
        state.ops.push(PinOp::RowHigh(self.index));
        Ok(())
    }
}

pub struct ColPin<'b, const ROW: usize, const COL: usize> {
    board: &'b Board<ROW, COL>,
    index: usize,
}

impl<const ROW: usize, const COL: usize> ErrorType for ColPin<'_, ROW, COL> {
    type Error = ErrorKind;
}

impl<const ROW: usize, const COL: usize> InputPin for ColPin<'_, ROW, COL> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        let mut state = self.board.state.borrow_mut();
        state.ops.push(PinOp::ColRead(self.index));
        if state.failing_col == Some(self.index) {
            return Err(ErrorKind::Other);
        }
        let pulled_low = (0..ROW).any(|r| !state.row_high[r] && state.pressed[r][self.index]);
        Ok(!pulled_low)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

pub struct SettleDelay<'b, const ROW: usize, const COL: usize> {
    board: &'b Board<ROW, COL>,
}

impl<const ROW: usize, const COL: usize> DelayNs for SettleDelay<'_, ROW, COL> {
    async fn delay_ns(&mut self, ns: u32) {
        self.board.state.borrow_mut().ops.push(PinOp::Settle(ns));
    }

    async fn delay_us(&mut self, us: u32) {
        self.board.state.borrow_mut().ops.push(PinOp::Settle(us * 1000));
    }
}
