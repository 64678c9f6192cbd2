//! Inbound commands to the application service.
//!
//! These are the discrete values the frame parser produces from the host
//! byte stream.  The [`LiftService`](super::service::LiftService)
//! consumes each one exactly once: lift commands mutate the controller,
//! gripper commands are forwarded straight to the gripper boundary.

use crate::control::lift::LiftDirection;

/// Commands decoded from the host link.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostCommand {
    /// Manual jog in the given direction (legacy opcodes `0x01`/`0x02`).
    LiftManual(LiftDirection),

    /// Relative move request in mm (`$LIFTER:<float>#`).
    LiftSetDelta(f32),

    /// Stop the lift / release manual jog (legacy opcode `0x00`).
    LiftStop,

    /// Drive the gripper fully open (`$GRIPPER:OPEN#`).
    GripperOpen,

    /// Drive the gripper fully closed (`$GRIPPER:CLOSE#`).
    GripperClose,

    /// Drive the gripper to a raw servo pulse value (`$GRIPPER:POS:<int>#`).
    GripperSetPosition(u16),
}
