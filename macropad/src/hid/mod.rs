//! HID output of the engine.
//!
//! The dispatcher talks to a [`HidSink`]. [`HidReportSink`] is the sink used
//! on hardware: it keeps the held keys of a boot keyboard report and turns
//! every change into a [`Report`] handed to a [`ReportWriter`], usually the
//! sending side of the channel drained by the USB task.
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Sender;
use macropad_types::keycode::{ConsumerKey, HidKeyCode};
use macropad_types::modifier::HidModifiers;
use usbd_hid::descriptor::{AsInputReport, BufferOverflow, MediaKeyboardReport, MouseReport};

pub mod descriptor;

pub use descriptor::KeyboardReport;

/// Number of non-modifier key slots in the boot keyboard report.
pub const KEY_SLOTS: usize = 6;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HidError {
    /// Not enough free key slots for all keys of the press, nothing was pressed.
    TooManyKeys,
    /// The report could not be queued for the host.
    ReportChannelFull,
}

/// Destination of key, media and wheel output.
pub trait HidSink {
    /// Hold `keys` until they are released.
    ///
    /// Either every key is registered or, on error, none is.
    fn press(&mut self, keys: &[HidKeyCode]) -> Result<(), HidError>;

    /// Release `keys`. Keys which are not held are ignored.
    fn release(&mut self, keys: &[HidKeyCode]) -> Result<(), HidError>;

    /// Send a momentary consumer control command.
    fn send_media(&mut self, key: ConsumerKey) -> Result<(), HidError>;

    /// Scroll the mouse wheel, positive is up.
    fn scroll(&mut self, amount: i8) -> Result<(), HidError>;
}

impl<S: HidSink + ?Sized> HidSink for &mut S {
    fn press(&mut self, keys: &[HidKeyCode]) -> Result<(), HidError> {
        (**self).press(keys)
    }

    fn release(&mut self, keys: &[HidKeyCode]) -> Result<(), HidError> {
        (**self).release(keys)
    }

    fn send_media(&mut self, key: ConsumerKey) -> Result<(), HidError> {
        (**self).send_media(key)
    }

    fn scroll(&mut self, amount: i8) -> Result<(), HidError> {
        (**self).scroll(amount)
    }
}

pub enum Report {
    /// Normal keyboard hid report
    KeyboardReport(KeyboardReport),
    /// Mouse hid report
    MouseReport(MouseReport),
    /// Media keyboard report
    MediaKeyboardReport(MediaKeyboardReport),
}

impl AsInputReport for Report {
    fn serialize(&self, buffer: &mut [u8]) -> Result<usize, BufferOverflow> {
        match self {
            Report::KeyboardReport(r) => r.serialize(buffer),
            Report::MouseReport(r) => r.serialize(buffer),
            Report::MediaKeyboardReport(r) => r.serialize(buffer),
        }
    }
}

/// Queue of reports towards the host.
pub trait ReportWriter {
    fn write_report(&mut self, report: Report) -> Result<(), HidError>;
}

impl<M: RawMutex, const N: usize> ReportWriter for Sender<'_, M, Report, N> {
    fn write_report(&mut self, report: Report) -> Result<(), HidError> {
        self.try_send(report).map_err(|_| HidError::ReportChannelFull)
    }
}

/// [`HidSink`] which maintains a boot keyboard report.
pub struct HidReportSink<W: ReportWriter> {
    writer: W,
    held_modifiers: HidModifiers,
    held_keycodes: [HidKeyCode; KEY_SLOTS],
}

impl<W: ReportWriter> HidReportSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            held_modifiers: HidModifiers::new(),
            held_keycodes: [HidKeyCode::No; KEY_SLOTS],
        }
    }

    pub fn held_modifiers(&self) -> HidModifiers {
        self.held_modifiers
    }

    pub fn held_keycodes(&self) -> &[HidKeyCode; KEY_SLOTS] {
        &self.held_keycodes
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    fn free_slots(&self) -> usize {
        self.held_keycodes.iter().filter(|k| **k == HidKeyCode::No).count()
    }

    fn send_keyboard_report(&mut self) -> Result<(), HidError> {
        self.writer.write_report(Report::KeyboardReport(KeyboardReport {
            modifier: self.held_modifiers.into_bits(),
            reserved: 0,
            leds: 0,
            keycodes: self.held_keycodes.map(|k| k as u8),
        }))
    }
}

impl<W: ReportWriter> HidSink for HidReportSink<W> {
    fn press(&mut self, keys: &[HidKeyCode]) -> Result<(), HidError> {
        let needed = keys
            .iter()
            .enumerate()
            .filter(|&(i, key)| {
                // Held keys and repeated keys within the combo take no extra slot
                !key.is_modifier()
                    && *key != HidKeyCode::No
                    && !self.held_keycodes.contains(key)
                    && !keys[..i].contains(key)
            })
            .count();
        if needed > self.free_slots() {
            return Err(HidError::TooManyKeys);
        }

        for &key in keys {
            if key.is_modifier() {
                self.held_modifiers = self.held_modifiers | key.to_hid_modifiers();
            } else if key != HidKeyCode::No && !self.held_keycodes.contains(&key) {
                if let Some(slot) = self.held_keycodes.iter_mut().find(|k| **k == HidKeyCode::No) {
                    *slot = key;
                }
            }
        }
        self.send_keyboard_report()
    }

    fn release(&mut self, keys: &[HidKeyCode]) -> Result<(), HidError> {
        for &key in keys {
            if key.is_modifier() {
                self.held_modifiers = self.held_modifiers.without(key.to_hid_modifiers());
            } else if let Some(slot) = self.held_keycodes.iter_mut().find(|k| **k == key) {
                *slot = HidKeyCode::No;
            }
        }
        self.send_keyboard_report()
    }

    fn send_media(&mut self, key: ConsumerKey) -> Result<(), HidError> {
        self.writer.write_report(Report::MediaKeyboardReport(MediaKeyboardReport {
            usage_id: key.usage_id(),
        }))?;
        self.writer
            .write_report(Report::MediaKeyboardReport(MediaKeyboardReport { usage_id: 0 }))
    }

    fn scroll(&mut self, amount: i8) -> Result<(), HidError> {
        self.writer.write_report(Report::MouseReport(MouseReport {
            buttons: 0,
            x: 0,
            y: 0,
            wheel: amount,
            pan: 0,
        }))
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use std::vec::Vec;

    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use embassy_sync::channel::Channel;

    use super::*;

    #[derive(Default)]
    struct ReportLog {
        reports: Vec<Report>,
    }

    impl ReportWriter for ReportLog {
        fn write_report(&mut self, report: Report) -> Result<(), HidError> {
            self.reports.push(report);
            Ok(())
        }
    }

    fn last_keyboard_report(sink: &HidReportSink<ReportLog>) -> KeyboardReport {
        match sink.writer().reports.last() {
            Some(Report::KeyboardReport(r)) => *r,
            _ => panic!("last report is not a keyboard report"),
        }
    }

    #[test]
    fn test_combo_press_and_release() {
        let mut sink = HidReportSink::new(ReportLog::default());
        sink.press(&[HidKeyCode::LCtrl, HidKeyCode::LShift, HidKeyCode::Z]).unwrap();
        let report = last_keyboard_report(&sink);
        assert_eq!(report.modifier, 0b11);
        assert_eq!(report.keycodes, [HidKeyCode::Z as u8, 0, 0, 0, 0, 0]);

        sink.release(&[HidKeyCode::LCtrl, HidKeyCode::LShift, HidKeyCode::Z]).unwrap();
        let report = last_keyboard_report(&sink);
        assert_eq!(report.modifier, 0);
        assert_eq!(report.keycodes, [0; 6]);
        assert_eq!(sink.writer().reports.len(), 2);
    }

    #[test]
    fn test_press_beyond_capacity_changes_nothing() {
        let mut sink = HidReportSink::new(ReportLog::default());
        sink.press(&[HidKeyCode::A, HidKeyCode::B, HidKeyCode::C, HidKeyCode::D])
            .unwrap();
        let before = *sink.held_keycodes();
        assert_eq!(
            sink.press(&[HidKeyCode::LAlt, HidKeyCode::E, HidKeyCode::F, HidKeyCode::G]),
            Err(HidError::TooManyKeys)
        );
        assert_eq!(*sink.held_keycodes(), before);
        assert!(sink.held_modifiers().is_empty());
        assert_eq!(sink.writer().reports.len(), 1);

        // Modifiers and keys already held need no slot
        sink.press(&[HidKeyCode::LAlt, HidKeyCode::A, HidKeyCode::E, HidKeyCode::F])
            .unwrap();
        assert_eq!(sink.held_keycodes().iter().filter(|k| **k != HidKeyCode::No).count(), 6);
    }

    #[test]
    fn test_release_frees_slot_for_reuse() {
        let mut sink = HidReportSink::new(ReportLog::default());
        sink.press(&[HidKeyCode::A, HidKeyCode::B]).unwrap();
        sink.release(&[HidKeyCode::A]).unwrap();
        sink.press(&[HidKeyCode::C]).unwrap();
        assert_eq!(
            last_keyboard_report(&sink).keycodes,
            [HidKeyCode::C as u8, HidKeyCode::B as u8, 0, 0, 0, 0]
        );
    }

    #[test]
    fn test_media_is_followed_by_release_report() {
        let mut sink = HidReportSink::new(ReportLog::default());
        sink.send_media(ConsumerKey::Mute).unwrap();
        let usages: Vec<u16> = sink
            .writer()
            .reports
            .iter()
            .map(|r| match r {
                Report::MediaKeyboardReport(m) => m.usage_id,
                _ => panic!("unexpected report"),
            })
            .collect();
        assert_eq!(usages, [0xE2, 0]);
    }

    #[test]
    fn test_scroll_sends_wheel() {
        let mut sink = HidReportSink::new(ReportLog::default());
        sink.scroll(-3).unwrap();
        assert!(matches!(sink.writer().reports[..], [Report::MouseReport(MouseReport { wheel: -3, .. })]));
    }

    #[test]
    fn test_channel_writer_reports_full() {
        let channel: Channel<NoopRawMutex, Report, 1> = Channel::new();
        let mut sink = HidReportSink::new(channel.sender());
        sink.press(&[HidKeyCode::A]).unwrap();
        assert_eq!(sink.release(&[HidKeyCode::A]), Err(HidError::ReportChannelFull));
        assert!(matches!(channel.try_receive(), Ok(Report::KeyboardReport(_))));
    }

    #[test]
    fn test_report_serializes_input_fields() {
        let mut buffer = [0xFFu8; 16];
        let mut keycodes = [0; 6];
        keycodes[0] = HidKeyCode::A as u8;
        let report = Report::KeyboardReport(KeyboardReport {
            modifier: 0x02,
            reserved: 0,
            leds: 0x1F,
            keycodes,
        });
        // The LED output byte is not part of the input report
        assert!(matches!(report.serialize(&mut buffer), Ok(8)));
        assert_eq!(buffer[..8], [0x02, 0, 0x04, 0, 0, 0, 0, 0]);

        let media = Report::MediaKeyboardReport(MediaKeyboardReport {
            usage_id: ConsumerKey::Mute.usage_id(),
        });
        assert!(matches!(media.serialize(&mut buffer), Ok(2)));
        assert_eq!(buffer[..2], [0xE2, 0x00]);
    }
}
