//! Executes actions against the HID sink.
use macropad_types::action::Action;
use macropad_types::keycode::HidKeyCode;
use macropad_types::layout::keystroke_for;

use crate::event::ButtonEvent;
use crate::hid::{HidError, HidSink};

/// Runs the action bound to an input when the input reports an edge.
///
/// The dispatcher keeps no state besides the sink: holding a key combo is
/// tracked by the sink, and whether an input is pressed by its state machine.
/// Sink errors are logged and dropped, they never reach the state machines.
pub struct ActionDispatcher<S: HidSink> {
    sink: S,
}

impl<S: HidSink> ActionDispatcher<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_inner(self) -> S {
        self.sink
    }

    /// Execute `action` for `event`.
    pub fn dispatch(&mut self, action: &Action<'_>, event: ButtonEvent) {
        match (action, event) {
            (Action::No, _) => {}
            (Action::KeyCombo(combo), ButtonEvent::Press) => {
                let result = self.sink.press(combo.keys());
                report("press", result);
            }
            (Action::KeyCombo(combo), ButtonEvent::Release) => {
                let result = self.sink.release(combo.keys());
                report("release", result);
            }
            (Action::Media(key), ButtonEvent::Press) => {
                let result = self.sink.send_media(*key);
                report("media", result);
            }
            (Action::Text { text, newline }, ButtonEvent::Press) => {
                self.type_text(text);
                if *newline {
                    self.tap_keys(&[HidKeyCode::Enter]);
                }
            }
            (Action::Wheel(amount), ButtonEvent::Press) => {
                let result = self.sink.scroll(*amount);
                report("scroll", result);
            }
            (Action::Custom(callback), ButtonEvent::Press) => callback(),
            // Momentary actions do nothing on release
            (_, ButtonEvent::Release) => {}
        }
    }

    /// Press then release `action`, used for inputs without a held state like dial detents.
    pub fn tap(&mut self, action: &Action<'_>) {
        self.dispatch(action, ButtonEvent::Press);
        self.dispatch(action, ButtonEvent::Release);
    }

    fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            match keystroke_for(c) {
                Some(stroke) if stroke.shift => self.tap_keys(&[HidKeyCode::LShift, stroke.key]),
                Some(stroke) => self.tap_keys(&[stroke.key]),
                None => warn!("Cannot type {:?}, skipped", c),
            }
        }
    }

    fn tap_keys(&mut self, keys: &[HidKeyCode]) {
        let result = self.sink.press(keys);
        report("press", result);
        let result = self.sink.release(keys);
        report("release", result);
    }
}

fn report(operation: &str, result: Result<(), HidError>) {
    if let Err(e) = result {
        warn!("HID {} dropped: {:?}", operation, e);
    }
}
