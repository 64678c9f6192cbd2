//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the encoder, relay, and gripper drivers, exposing them through
//! [`PositionSensor`], [`LiftDrive`], and [`GripperPort`].  This is the
//! only module in the system that touches actuator hardware.  On
//! non-espidf targets the underlying drivers use cfg-gated simulation
//! stubs.

use embedded_hal::digital::OutputPin;
use log::warn;

use crate::app::ports::{GripperPort, LiftDrive, PositionSensor};
use crate::control::lift::LiftDirection;
use crate::drivers::encoder::EncoderDriver;
use crate::drivers::gripper::ServoGripper;
use crate::drivers::relay::RelayDriver;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<A: OutputPin, B: OutputPin> {
    encoder: EncoderDriver,
    relay: RelayDriver<A, B>,
    gripper: ServoGripper,
}

impl<A: OutputPin, B: OutputPin> HardwareAdapter<A, B> {
    pub fn new(encoder: EncoderDriver, relay: RelayDriver<A, B>, gripper: ServoGripper) -> Self {
        Self {
            encoder,
            relay,
            gripper,
        }
    }
}

// ── PositionSensor implementation ─────────────────────────────

impl<A: OutputPin, B: OutputPin> PositionSensor for HardwareAdapter<A, B> {
    fn update(&mut self) {
        self.encoder.update();
    }

    fn position_mm(&self) -> f32 {
        self.encoder.position_mm()
    }

    fn speed_mm_s(&self) -> f32 {
        self.encoder.speed_mm_s()
    }
}

// ── LiftDrive implementation ──────────────────────────────────

impl<A: OutputPin, B: OutputPin> LiftDrive for HardwareAdapter<A, B> {
    fn set_direction(&mut self, direction: LiftDirection) {
        // A failed GPIO write keeps the previous relay state; the next
        // tick issues the direction again.
        if self.relay.set_direction(direction).is_err() {
            warn!("relay: set_direction({direction:?}) failed");
        }
    }
}

// ── GripperPort implementation ────────────────────────────────

impl<A: OutputPin, B: OutputPin> GripperPort for HardwareAdapter<A, B> {
    fn open(&mut self) {
        self.gripper.open();
    }

    fn close(&mut self) {
        self.gripper.close();
    }

    fn set_position(&mut self, pulse: u16) {
        self.gripper.set_position(pulse);
    }
}
