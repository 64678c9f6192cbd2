//! Serial-bus servo gripper driver.
//!
//! The gripper is a bus servo speaking an ASCII frame protocol:
//! `#000P<pulse>T<time>!` where `<pulse>` is the target pulse width in
//! µs (500–2500, zero-padded to four digits) and `<time>` the travel
//! time in ms.  Servo ID 000 is fixed; only one servo sits on the bus.
//!
//! Frame formatting is pure and tested on the host; transmission goes
//! through the gripper UART helper.

use core::fmt::Write as _;

use heapless::String;
use log::warn;

use crate::config::SystemConfig;
use crate::drivers::hw_init;

/// Servo pulse width limits (µs).
pub const PULSE_MIN: u16 = 500;
pub const PULSE_MAX: u16 = 2500;

/// Longest frame: `#000P2500T9999!` is 15 bytes.
const FRAME_CAP: usize = 16;

pub struct ServoGripper {
    open_pulse: u16,
    close_pulse: u16,
    move_time_ms: u16,
}

impl ServoGripper {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            open_pulse: config.gripper_open_pulse,
            close_pulse: config.gripper_close_pulse,
            move_time_ms: config.gripper_move_time_ms,
        }
    }

    /// Drive the gripper fully open.
    pub fn open(&mut self) {
        self.send_pulse(self.open_pulse);
    }

    /// Drive the gripper fully closed.
    pub fn close(&mut self) {
        self.send_pulse(self.close_pulse);
    }

    /// Drive the gripper to a raw pulse width (clamped to servo limits).
    pub fn set_position(&mut self, pulse: u16) {
        self.send_pulse(pulse.clamp(PULSE_MIN, PULSE_MAX));
    }

    fn send_pulse(&self, pulse: u16) {
        let frame = servo_frame(pulse, self.move_time_ms);
        if hw_init::gripper_uart_write(frame.as_bytes()).is_err() {
            warn!("gripper: frame tx failed");
        }
    }
}

/// Format one servo motion frame.
fn servo_frame(pulse: u16, time_ms: u16) -> String<FRAME_CAP> {
    let mut frame = String::new();
    // Write into a fixed 16-byte buffer cannot fail for 4-digit fields.
    let _ = write!(frame, "#000P{pulse:04}T{time_ms:04}!");
    frame
}
