//! Lift position controller.
//!
//! Owns the motion request state (manual direction, pending delta,
//! absolute target) and the supervisory FSM, and turns one feedback
//! sample per tick into exactly one actuator direction decision.
//!
//! The controller is deliberately hardware-free: it takes plain numbers
//! in and hands a [`LiftTick`] out.  The service layer owns the actuator
//! and notification side effects, which keeps every motion rule testable
//! on the host.

use crate::config::SystemConfig;
use crate::fsm::context::LiftContext;
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};
use log::{debug, info};

/// Direction command for the two-relay lift actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LiftDirection {
    #[default]
    Stop,
    Up,
    Down,
}

/// Externally observable motion mode of the lift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionMode {
    Idle,
    ManualUp,
    ManualDown,
    Automatic,
}

/// Result of one control tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiftTick {
    /// Direction to issue to the actuator this tick.
    pub direction: LiftDirection,
    /// True on exactly the tick where an automatic target is first
    /// satisfied.  The caller owes the host one arrival notification.
    pub arrived: bool,
}

/// Closed-loop lift controller: manual override plus automatic
/// target-seeking through the Idle/Moving state table.
pub struct LiftController {
    fsm: Fsm,
    ctx: LiftContext,
    /// Active manual direction.  Anything but `Stop` pre-empts the
    /// automatic branch entirely.
    manual_dir: LiftDirection,
    /// Delta captured by `set_target_delta`, converted to an absolute
    /// target on the next `update()` so it binds to the freshest
    /// position sample.
    pending_delta: Option<f32>,
}

impl LiftController {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            fsm: Fsm::new(build_state_table(), StateId::Idle),
            ctx: LiftContext::new(config),
            manual_dir: LiftDirection::Stop,
            pending_delta: None,
        }
    }

    /// Run the initial state entry.  Call once before the first tick.
    pub fn start(&mut self) {
        self.fsm.start(&mut self.ctx);
    }

    /// Capture a relative motion request (mm).
    ///
    /// The absolute target is computed on the next `update()`, not here.
    /// A new delta always supersedes any in-flight target; a delta of
    /// exactly `0.0` cancels the outstanding target without signaling
    /// arrival.
    pub fn set_target_delta(&mut self, delta_mm: f32) {
        debug!("lift: target delta {delta_mm:+.1} mm captured");
        self.pending_delta = Some(delta_mm);
    }

    /// Set the manual direction.  `Stop` releases the override and lets
    /// any outstanding automatic target resume; it never clears the
    /// target itself.
    pub fn manual(&mut self, direction: LiftDirection) {
        if direction != self.manual_dir {
            info!("lift: manual direction {direction:?}");
        }
        self.manual_dir = direction;
    }

    /// Currently observable motion mode.
    pub fn mode(&self) -> MotionMode {
        match self.manual_dir {
            LiftDirection::Up => MotionMode::ManualUp,
            LiftDirection::Down => MotionMode::ManualDown,
            LiftDirection::Stop => {
                if self.ctx.target_mm.is_some() || self.pending_delta.is_some() {
                    MotionMode::Automatic
                } else {
                    MotionMode::Idle
                }
            }
        }
    }

    /// Outstanding absolute target, if any.
    pub fn target_mm(&self) -> Option<f32> {
        self.ctx.target_mm
    }

    /// Run one control tick against the latest feedback sample.
    ///
    /// Sequence: bind any pending delta to this position sample, then
    /// either honor the manual override or tick the state machine.
    /// Returns exactly one direction decision.
    pub fn update(&mut self, position_mm: f32, speed_mm_s: f32) -> LiftTick {
        self.ctx.position_mm = position_mm;
        self.ctx.speed_mm_s = speed_mm_s;

        if let Some(delta) = self.pending_delta.take() {
            if delta == 0.0 {
                self.ctx.target_mm = None;
            } else {
                self.ctx.target_mm = Some(position_mm + delta);
                if let Some(pid) = self.ctx.pid.as_mut() {
                    pid.reset();
                }
            }
        }

        // Manual strictly pre-empts automatic, every tick.
        if self.manual_dir != LiftDirection::Stop {
            return LiftTick {
                direction: self.manual_dir,
                arrived: false,
            };
        }

        self.ctx.arrived = false;
        self.fsm.tick(&mut self.ctx);

        LiftTick {
            direction: self.ctx.command,
            arrived: core::mem::take(&mut self.ctx.arrived),
        }
    }
}
