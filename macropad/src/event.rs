//! Events produced by the input state machines.

/// Edge reported by an [`EdgeButton`](crate::button::EdgeButton).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    Press,
    Release,
}

/// Rotation direction of a dial, derived from the sign of the position delta.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Position increased
    Clockwise,
    /// Position decreased
    CounterClockwise,
}

impl Direction {
    /// Direction of the move from `last` to `current`, `None` when the position is unchanged.
    pub fn between(last: i32, current: i32) -> Option<Self> {
        match current.cmp(&last) {
            core::cmp::Ordering::Greater => Some(Direction::Clockwise),
            core::cmp::Ordering::Less => Some(Direction::CounterClockwise),
            core::cmp::Ordering::Equal => None,
        }
    }
}

/// A detected dial movement and the index of the action it selected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DialTurn {
    pub direction: Direction,
    pub position: i32,
    pub index: usize,
}

/// Origin of an input, used for logging and diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LogicalSource {
    /// A line read directly from a GPIO or an expander pin, by configuration index.
    Line(u8),
    /// A rotary dial, by configuration index.
    Dial(u8),
    /// A cell of the scanned matrix.
    Matrix { row: u8, col: u8 },
}
