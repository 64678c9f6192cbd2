//! GPIO / peripheral pin assignments for the lift controller board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Lift motor relay (two-channel, H-bridge style)
// ---------------------------------------------------------------------------

/// Relay channel A — energised alone drives the lift upward.
pub const RELAY_A_GPIO: i32 = 1;
/// Relay channel B — energised alone drives the lift downward.
pub const RELAY_B_GPIO: i32 = 2;

// ---------------------------------------------------------------------------
// Quadrature encoder (PCNT unit 0)
// ---------------------------------------------------------------------------

/// Encoder channel A (pulse input).
pub const ENCODER_A_GPIO: i32 = 5;
/// Encoder channel B (direction discriminator).
pub const ENCODER_B_GPIO: i32 = 6;

// ---------------------------------------------------------------------------
// Host link UART (industrial PC / wireless bridge)
// ---------------------------------------------------------------------------

pub const HOST_UART_TX_GPIO: i32 = 17;
pub const HOST_UART_RX_GPIO: i32 = 18;
pub const HOST_UART_BAUD: u32 = 115_200;

// ---------------------------------------------------------------------------
// Gripper servo bus UART
// ---------------------------------------------------------------------------

pub const GRIPPER_UART_TX_GPIO: i32 = 9;
pub const GRIPPER_UART_RX_GPIO: i32 = 10;
pub const GRIPPER_UART_BAUD: u32 = 115_200;
