//! Shared mutable context threaded through every FSM handler.
//!
//! `LiftContext` is the single struct the state handlers read from and
//! write to: the freshest position/speed sample, the outstanding absolute
//! target, the tolerance band, and the actuator command decided this tick.
//! Think of it as the "blackboard" in a blackboard architecture.

use crate::config::SystemConfig;
use crate::control::lift::LiftDirection;
use crate::control::pid::CascadePid;

/// The shared context passed to every state handler function.
pub struct LiftContext {
    // -- Timing --
    /// Monotonic total tick count.
    pub total_ticks: u64,
    /// Duration of one tick in seconds (PID `dt`).
    pub tick_secs: f32,

    // -- Feedback sample (written by the lift controller before each tick) --
    /// Latest lift position (mm).
    pub position_mm: f32,
    /// Latest lift speed (mm/s).
    pub speed_mm_s: f32,

    // -- Motion request --
    /// Absolute target position (mm). `Some` iff an automatic motion
    /// request is outstanding.
    pub target_mm: Option<f32>,
    /// ± position-error band within which the lift counts as arrived.
    pub tolerance_mm: f32,

    // -- Outputs (consumed by the lift controller after each tick) --
    /// Actuator direction decided this tick.
    pub command: LiftDirection,
    /// Set on the tick where the tolerance band is first satisfied.
    pub arrived: bool,

    // -- Optional cascaded PID layer --
    /// `Some` when the automatic branch routes through the position→speed
    /// cascade instead of plain bang-bang on the error sign.
    pub pid: Option<CascadePid>,
}

impl LiftContext {
    /// Create a new context from the system configuration.
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            total_ticks: 0,
            tick_secs: config.tick_secs(),
            position_mm: 0.0,
            speed_mm_s: 0.0,
            target_mm: None,
            tolerance_mm: config.position_tolerance_mm,
            command: LiftDirection::Stop,
            arrived: false,
            pid: config
                .pid_enabled
                .then(|| CascadePid::new(&config.position_pid, &config.speed_pid)),
        }
    }

    /// Signed position error toward the outstanding target, if any.
    pub fn position_error(&self) -> Option<f32> {
        self.target_mm.map(|t| t - self.position_mm)
    }
}
