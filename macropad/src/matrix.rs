//! Row-strobed key matrix.
//!
//! Rows are driven active-low: an idle row is held high, the scanned row is
//! pulled low and a closed switch pulls its column low through the diode.
//! Column inputs need pull-ups. Only one row is ever low at a time.
use core::future::Future;

use embedded_hal::digital::{Error, InputPin, OutputPin};
use embedded_hal_async::delay::DelayNs;
use macropad_types::action::Action;

use crate::button::{ButtonState, EdgeButton};
use crate::event::{ButtonEvent, LogicalSource};

/// An edge of a matrix key with the action bound to it.
#[derive(Clone, Copy, Debug)]
pub struct MatrixEvent<'a> {
    pub row: u8,
    pub col: u8,
    pub event: ButtonEvent,
    pub action: Action<'a>,
}

impl MatrixEvent<'_> {
    pub fn source(&self) -> LogicalSource {
        LogicalSource::Matrix {
            row: self.row,
            col: self.col,
        }
    }
}

/// Something the control loop can scan once per iteration.
pub trait MatrixScan<'a> {
    /// Scan every key once, `on_event` is called as soon as an edge is detected.
    fn scan<F: FnMut(MatrixEvent<'a>)>(&mut self, on_event: F) -> impl Future<Output = ()>;
}

/// A board without matrix.
impl<'a> MatrixScan<'a> for () {
    async fn scan<F: FnMut(MatrixEvent<'a>)>(&mut self, _on_event: F) {}
}

/// Matrix is the physical pcb layout of the key matrix.
pub struct MatrixScanner<'a, In: InputPin, Out: OutputPin, D: DelayNs, const ROW: usize, const COL: usize> {
    /// Column sense lines
    input_pins: [In; COL],
    /// Row drive lines
    output_pins: [Out; ROW],
    delay: D,
    /// Wait between pulling a row low and reading the columns
    settle_delay_us: u32,
    /// Key state matrix
    key_states: [[EdgeButton; COL]; ROW],
    actions: &'a [[Action<'a>; COL]; ROW],
}

impl<'a, In: InputPin, Out: OutputPin, D: DelayNs, const ROW: usize, const COL: usize>
    MatrixScanner<'a, In, Out, D, ROW, COL>
{
    /// Create a matrix from column inputs, row outputs and the action of every key.
    pub fn new(
        input_pins: [In; COL],
        output_pins: [Out; ROW],
        delay: D,
        settle_delay_us: u32,
        actions: &'a [[Action<'a>; COL]; ROW],
    ) -> Self {
        Self {
            input_pins,
            output_pins,
            delay,
            settle_delay_us,
            key_states: [[EdgeButton::new(); COL]; ROW],
            actions,
        }
    }

    pub fn key_state(&self, row: usize, col: usize) -> Option<ButtonState> {
        self.key_states.get(row)?.get(col).map(|k| k.state())
    }

    /// Drive every row to its idle level.
    fn deassert_all(&mut self) {
        for (row, pin) in self.output_pins.iter_mut().enumerate() {
            if let Err(e) = pin.set_high() {
                warn!("Releasing matrix row {} failed: {:?}", row, e.kind());
            }
        }
    }

    async fn scan_matrix<F: FnMut(MatrixEvent<'a>)>(&mut self, mut on_event: F) {
        for row in 0..ROW {
            self.deassert_all();
            if let Err(e) = self.output_pins[row].set_low() {
                // The row stays unscanned this round, its keys keep their state
                warn!("Driving matrix row {} failed: {:?}", row, e.kind());
                continue;
            }
            self.delay.delay_us(self.settle_delay_us).await;

            for col in 0..COL {
                let raw = match self.input_pins[col].is_high() {
                    Ok(raw) => raw,
                    Err(e) => {
                        warn!("Reading matrix ({}, {}) failed: {:?}", row, col, e.kind());
                        continue;
                    }
                };
                if let Some(event) = self.key_states[row][col].sample(!raw) {
                    debug!("Matrix ({}, {}): {:?}", row, col, event);
                    on_event(MatrixEvent {
                        row: row as u8,
                        col: col as u8,
                        event,
                        action: self.actions[row][col],
                    });
                }
            }
        }
        self.deassert_all();
    }
}

impl<'a, In: InputPin, Out: OutputPin, D: DelayNs, const ROW: usize, const COL: usize> MatrixScan<'a>
    for MatrixScanner<'a, In, Out, D, ROW, COL>
{
    async fn scan<F: FnMut(MatrixEvent<'a>)>(&mut self, on_event: F) {
        self.scan_matrix(on_event).await
    }
}
