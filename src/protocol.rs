//! Host link wire protocol and the command frame parser.
//!
//! Two formats coexist on the same byte stream:
//!
//! - **Legacy opcodes** — single raw bytes with fixed meaning, valid only
//!   outside frame capture: `0x00` stop, `0x01` up, `0x02` down.
//! - **ASCII frames** — `$<BODY>#`, where `BODY` is one of
//!   `LIFTER:<signed decimal>`, `GRIPPER:OPEN`, `GRIPPER:CLOSE`,
//!   `GRIPPER:POS:<integer>`.
//!
//! The parser is fed one byte at a time from the ISR ring buffer and never
//! allocates: the frame body accumulates into a fixed 64-byte buffer.  Any
//! malformed input — overflow, unknown body, bad number — is dropped
//! silently and the parser returns to idle; the host resends if it cares.

use crate::app::commands::HostCommand;
use crate::control::lift::LiftDirection;

/// Frame delimiters.
pub const FRAME_START: u8 = b'$';
pub const FRAME_END: u8 = b'#';

/// Legacy single-byte opcodes.
pub const OP_LIFT_STOP: u8 = 0x00;
pub const OP_LIFT_UP: u8 = 0x01;
pub const OP_LIFT_DOWN: u8 = 0x02;

/// Frame accumulation capacity. One slot is reserved so the longest
/// accepted body is `FRAME_BUF_CAP - 1` bytes, matching the host contract.
pub const FRAME_BUF_CAP: usize = 64;

/// Notification sent to the host when an automatic target is reached.
pub const LIFTER_OK_FRAME: &str = "$LIFTER:OK#";

/// Byte-at-a-time command frame parser.
///
/// `feed` is non-blocking and emits at most one [`HostCommand`] per
/// completed frame, regardless of how the byte stream is chunked.
pub struct FrameParser {
    buf: heapless::Vec<u8, FRAME_BUF_CAP>,
    capturing: bool,
}

impl FrameParser {
    pub fn new() -> Self {
        Self {
            buf: heapless::Vec::new(),
            capturing: false,
        }
    }

    /// Consume one byte from the host stream.
    pub fn feed(&mut self, byte: u8) -> Option<HostCommand> {
        // Legacy opcodes are only live outside frame capture; inside a
        // frame the same byte values are ordinary body content.
        if !self.capturing {
            match byte {
                OP_LIFT_STOP => return Some(HostCommand::LiftStop),
                OP_LIFT_UP => return Some(HostCommand::LiftManual(LiftDirection::Up)),
                OP_LIFT_DOWN => return Some(HostCommand::LiftManual(LiftDirection::Down)),
                _ => {}
            }
        }

        // Start delimiter (re)arms capture; a partial frame in progress
        // is abandoned.
        if byte == FRAME_START {
            self.capturing = true;
            self.buf.clear();
            return None;
        }

        if self.capturing {
            if byte == FRAME_END {
                self.capturing = false;
                let cmd = parse_body(&self.buf);
                self.buf.clear();
                return cmd;
            }
            if self.buf.len() < FRAME_BUF_CAP - 1 {
                // Cannot fail: length was just checked against capacity.
                let _ = self.buf.push(byte);
            } else {
                // Overflow — abandon the capture, discard partial data.
                self.capturing = false;
                self.buf.clear();
            }
        }

        None
    }

    /// True while a `$`-opened frame is still accumulating.
    pub fn is_capturing(&self) -> bool {
        self.capturing
    }
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Match a completed frame body against the recognized command set.
/// Unknown prefixes and unparsable numbers yield `None` — no error is
/// signaled upward.
fn parse_body(body: &[u8]) -> Option<HostCommand> {
    let body = core::str::from_utf8(body).ok()?;

    if let Some(value) = body.strip_prefix("LIFTER:") {
        let delta: f32 = value.trim().parse().ok()?;
        return Some(HostCommand::LiftSetDelta(delta));
    }

    if let Some(rest) = body.strip_prefix("GRIPPER:") {
        return match rest {
            "OPEN" => Some(HostCommand::GripperOpen),
            "CLOSE" => Some(HostCommand::GripperClose),
            _ => rest
                .strip_prefix("POS:")
                .and_then(|p| p.trim().parse::<u16>().ok())
                .map(HostCommand::GripperSetPosition),
        };
    }

    None
}
