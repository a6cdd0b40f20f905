//! Rotary dial: position changes resolved into actions.
use macropad_types::action::Action;

use crate::config::ConfigError;
use crate::event::{DialTurn, Direction, LogicalSource};
use crate::input_device::RotaryChannel;

/// Pick the action index for a move to `position` in `direction`.
///
/// - more than 2 actions: the absolute position modulo the table length, whatever the direction
/// - 2 actions: index 0 clockwise, index 1 counter-clockwise
/// - 1 action: always index 0
pub fn select_action_index(len: usize, direction: Direction, position: i32) -> usize {
    match len {
        0 | 1 => 0,
        2 => match direction {
            Direction::Clockwise => 0,
            Direction::CounterClockwise => 1,
        },
        _ => i64::from(position).rem_euclid(len as i64) as usize,
    }
}

/// A rotary encoder with an action table.
pub struct RotaryDial<'a> {
    channel: &'a mut dyn RotaryChannel,
    actions: &'a [Action<'a>],
    last_position: i32,
    id: u8,
}

impl<'a> RotaryDial<'a> {
    /// Create a dial. The channel is read once to seed the last position, so
    /// the first poll only reports movement made after construction.
    pub fn new(channel: &'a mut dyn RotaryChannel, actions: &'a [Action<'a>], id: u8) -> Result<Self, ConfigError> {
        if actions.is_empty() {
            error!("Dial {} has an empty action table", id);
            return Err(ConfigError::EmptyActionTable);
        }
        let last_position = channel.position().map_err(|e| {
            error!("Dial {} cannot be read at startup: {:?}", id, e);
            ConfigError::UnreadableDial(id)
        })?;
        Ok(Self {
            channel,
            actions,
            last_position,
            id,
        })
    }

    /// Read the channel once. Returns the movement and the selected action index
    /// when the position changed since the last poll.
    pub fn poll(&mut self) -> Option<DialTurn> {
        let position = match self.channel.position() {
            Ok(position) => position,
            Err(e) => {
                warn!("Reading dial {} failed: {:?}", self.id, e);
                return None;
            }
        };
        let direction = Direction::between(self.last_position, position)?;
        let index = select_action_index(self.actions.len(), direction, position);
        self.last_position = position;
        debug!("Dial {}: {:?} to {}, action {}", self.id, direction, position, index);
        Some(DialTurn {
            direction,
            position,
            index,
        })
    }

    /// Action selected by `turn`.
    pub fn action(&self, turn: &DialTurn) -> Action<'a> {
        self.actions.get(turn.index).copied().unwrap_or_default()
    }

    pub fn last_position(&self) -> i32 {
        self.last_position
    }

    pub fn source(&self) -> LogicalSource {
        LogicalSource::Dial(self.id)
    }
}
