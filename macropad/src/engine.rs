//! The control loop.
use embassy_time::Timer;

use crate::button::DirectButton;
use crate::config::{ConfigError, EngineConfig};
use crate::dial::RotaryDial;
use crate::dispatcher::ActionDispatcher;
use crate::event::LogicalSource;
use crate::hid::HidSink;
use crate::matrix::MatrixScan;

/// All inputs of a macropad and the dispatcher they feed.
///
/// Each iteration polls the direct buttons, then the dials, then scans the
/// matrix once. Every input is sampled exactly once per iteration.
pub struct Macropad<'b, 'a, S: HidSink, M: MatrixScan<'a>> {
    buttons: &'b mut [DirectButton<'a>],
    dials: &'b mut [RotaryDial<'a>],
    matrix: M,
    dispatcher: ActionDispatcher<S>,
    config: EngineConfig,
}

impl<'b, 'a, S: HidSink, M: MatrixScan<'a>> Macropad<'b, 'a, S, M> {
    /// Assemble the engine. Fails if the config is invalid or two inputs share a source.
    pub fn new(
        buttons: &'b mut [DirectButton<'a>],
        dials: &'b mut [RotaryDial<'a>],
        matrix: M,
        sink: S,
        config: EngineConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        check_unique_sources(buttons, dials)?;
        Ok(Self {
            buttons,
            dials,
            matrix,
            dispatcher: ActionDispatcher::new(sink),
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> &ActionDispatcher<S> {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut ActionDispatcher<S> {
        &mut self.dispatcher
    }

    pub fn buttons(&self) -> &[DirectButton<'a>] {
        self.buttons
    }

    pub fn dials(&self) -> &[RotaryDial<'a>] {
        self.dials
    }

    pub fn matrix(&self) -> &M {
        &self.matrix
    }

    /// Run one iteration of the loop.
    pub async fn poll_once(&mut self) {
        for button in self.buttons.iter_mut() {
            if let Some(event) = button.poll() {
                self.dispatcher.dispatch(&button.action(), event);
            }
        }

        // A detent has no held state, its action is pressed and released at once
        for dial in self.dials.iter_mut() {
            if let Some(turn) = dial.poll() {
                self.dispatcher.tap(&dial.action(&turn));
            }
        }

        let dispatcher = &mut self.dispatcher;
        self.matrix
            .scan(|e| {
                trace!("Dispatching {:?}", e.source());
                dispatcher.dispatch(&e.action, e.event)
            })
            .await;
    }

    /// Poll forever, sleeping the poll period between iterations.
    pub async fn run(&mut self) -> ! {
        info!(
            "Macropad started: {} buttons, {} dials, polling every {}ms",
            self.buttons.len(),
            self.dials.len(),
            self.config.poll_period.as_millis()
        );
        loop {
            self.poll_once().await;
            Timer::after(self.config.poll_period).await;
        }
    }
}

/// Each configured input must have its own [`LogicalSource`].
fn check_unique_sources(buttons: &[DirectButton<'_>], dials: &[RotaryDial<'_>]) -> Result<(), ConfigError> {
    let sources = || {
        buttons
            .iter()
            .map(|b| b.source())
            .chain(dials.iter().map(|d| d.source()))
    };
    for (i, source) in sources().enumerate() {
        if sources().skip(i + 1).any(|other| other == source) {
            error!("Source {:?} is configured twice", source);
            return Err(ConfigError::DuplicateSource);
        }
    }
    Ok(())
}
