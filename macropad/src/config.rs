use embassy_time::Duration;

/// Startup-time configuration faults.
///
/// These are reported before the control loop starts; nothing in the loop
/// itself can produce them.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A dial was configured without any action.
    EmptyActionTable,
    /// A dial's channel could not be read to seed its position.
    UnreadableDial(u8),
    /// The physical order of encoders is not a permutation of `1..=N`.
    InvalidEncoderOrder,
    /// Two inputs were configured with the same logical source.
    DuplicateSource,
    /// The poll period must be longer than zero.
    ZeroPollPeriod,
    /// The volume mixer needs at least one program.
    EmptyMixer,
}

/// Tunable timings of the control loop.
#[derive(Clone, Copy, Debug)]
pub struct EngineConfig {
    /// Sleep between two iterations of the control loop.
    ///
    /// This is the only debounce there is: every source is sampled at most
    /// once per period, so it should be longer than the contacts' bounce time.
    pub poll_period: Duration,
    /// Time in us between asserting a matrix row and reading its columns.
    /// Rows behind an I/O expander need more than rows wired to GPIOs.
    pub settle_delay_us: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_period: Duration::from_millis(10),
            settle_delay_us: 1,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_period.as_ticks() == 0 {
            error!("Poll period must not be zero");
            return Err(ConfigError::ZeroPollPeriod);
        }
        Ok(())
    }
}

/// Physical position of each wired encoder.
///
/// Entry `i` is the 1-based index, in wiring order, of the settings used by
/// the `i`-th knob. This lets a board keep its wiring while putting each
/// action table on the knob where it physically sits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncoderOrder<const N: usize> {
    order: [u8; N],
}

impl<const N: usize> EncoderOrder<N> {
    /// Validate that `order` is a permutation of `1..=N`.
    pub fn new(order: [u8; N]) -> Result<Self, ConfigError> {
        let mut seen = [false; N];
        for &slot in order.iter() {
            let index = (slot as usize).wrapping_sub(1);
            match seen.get_mut(index) {
                Some(s) if !*s => *s = true,
                _ => {
                    error!("Invalid physical encoder order entry {}", slot);
                    return Err(ConfigError::InvalidEncoderOrder);
                }
            }
        }
        Ok(Self { order })
    }

    /// The identity order, wiring order equals physical order.
    pub fn identity() -> Self {
        Self {
            order: core::array::from_fn(|i| i as u8 + 1),
        }
    }

    /// Rearrange per-encoder `items` from wiring order to physical order.
    pub fn apply<T: Copy>(&self, items: [T; N]) -> [T; N] {
        core::array::from_fn(|i| items[self.order[i] as usize - 1])
    }
}
