//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ LiftService (domain)
//! ```
//!
//! Driven adapters (encoder, relay, gripper servo, host UART, event
//! sinks) implement these traits.  The
//! [`LiftService`](super::service::LiftService) consumes them via
//! generics, so the domain core never touches hardware directly.

use super::events::AppEvent;
use crate::control::lift::LiftDirection;

// ───────────────────────────────────────────────────────────────
// Position feedback port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: quadrature-encoder position feedback for the lift.
pub trait PositionSensor {
    /// Sample the encoder and fold the new pulse delta into the
    /// position/speed estimate.  Called exactly once per tick, before
    /// the readings below are consumed.
    fn update(&mut self);

    /// Latest lift position in mm.
    fn position_mm(&self) -> f32;

    /// Latest lift speed in mm/s.
    fn speed_mm_s(&self) -> f32;
}

// ───────────────────────────────────────────────────────────────
// Actuator ports (driven adapters: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the two-relay lift drive.
pub trait LiftDrive {
    /// Command the lift direction.  Implementations must be safe to
    /// call with the same direction every tick.
    fn set_direction(&mut self, direction: LiftDirection);
}

/// Write-side port: the gripper end-effector.
pub trait GripperPort {
    /// Drive the gripper fully open.
    fn open(&mut self);

    /// Drive the gripper fully closed.
    fn close(&mut self);

    /// Drive the gripper to a raw servo pulse value.
    fn set_position(&mut self, pulse: u16);
}

// ───────────────────────────────────────────────────────────────
// Host link port (driven adapter: domain ↔ host serial channel)
// ───────────────────────────────────────────────────────────────

/// Byte-stream channel to the host controller.
///
/// The receive side drains an interrupt-fed queue; the transmit side
/// carries notification frames back.
pub trait HostLink {
    /// Pop the next queued byte from the host, if any.
    fn next_byte(&mut self) -> Option<u8>;

    /// Send a complete frame to the host.  Implementations append the
    /// line terminator.
    fn send_frame(&mut self, frame: &str);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`]s through this port.
/// Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &AppEvent);
}
