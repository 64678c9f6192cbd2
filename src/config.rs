//! System configuration parameters
//!
//! All tunable parameters for the lift controller. Calibration differs per
//! mechanical build (gearbox ratio, lead screw pitch, gripper linkage), so
//! nothing here is hard-coded elsewhere — the variant values observed across
//! builds are set at composition time in `main()`.

use serde::{Deserialize, Serialize};

/// Gains and shaping parameters for one PID loop.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PidGains {
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
    /// Integral accumulator clamp (± limit).
    pub int_limit: f32,
    /// Output clamp (± limit).
    pub out_limit: f32,
    /// Derivative low-pass coefficient, 0–1. `1.0` disables filtering.
    pub alpha: f32,
    /// Integral-separation threshold. `0.0` disables separation.
    pub int_threshold: f32,
    /// Error dead-zone below which the loop outputs zero.
    pub dead_zone: f32,
}

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Encoder calibration ---
    /// Encoder pulses per millimetre of lift travel.
    /// Observed build variants: 15.518 (primary) and 37.48 (alt gearbox).
    pub pulses_per_mm: f32,

    // --- Lift motion ---
    /// Position error band (mm) within which the lift counts as arrived.
    pub position_tolerance_mm: f32,
    /// Whether the automatic branch routes through the cascaded PID.
    /// `false` = plain bang-bang on the sign of the position error.
    pub pid_enabled: bool,
    /// Position loop gains (output = speed setpoint, mm/s).
    pub position_pid: PidGains,
    /// Speed loop gains (output = signed drive effort).
    pub speed_pid: PidGains,

    // --- Gripper servo ---
    /// Servo pulse width for the fully open jaw.
    pub gripper_open_pulse: u16,
    /// Servo pulse width for the fully closed jaw.
    pub gripper_close_pulse: u16,
    /// Commanded servo travel time (ms).
    pub gripper_move_time_ms: u16,

    // --- Timing ---
    /// Control loop tick period (milliseconds).
    pub control_loop_interval_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Encoder — primary build gearing
            pulses_per_mm: 15.518,

            // Lift motion
            position_tolerance_mm: 5.0,
            pid_enabled: false,
            position_pid: PidGains {
                kp: 0.8,
                ki: 0.01,
                kd: 0.5,
                int_limit: 400.0,
                out_limit: 1000.0,
                alpha: 1.0,
                int_threshold: 0.0,
                dead_zone: 0.0,
            },
            speed_pid: PidGains {
                kp: 3.0,
                ki: 10.0,
                kd: 0.0,
                int_limit: 2000.0,
                out_limit: 1000.0,
                alpha: 0.7,
                int_threshold: 0.0,
                dead_zone: 0.0,
            },

            // Gripper servo
            gripper_open_pulse: 500,
            gripper_close_pulse: 2500,
            gripper_move_time_ms: 1000,

            // Timing — 100 Hz control loop
            control_loop_interval_ms: 10,
        }
    }
}

impl SystemConfig {
    /// Tick period in seconds (PID `dt`).
    pub fn tick_secs(&self) -> f32 {
        self.control_loop_interval_ms as f32 / 1000.0
    }
}
