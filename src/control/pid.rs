//! Filtered PID controller.
//!
//! One instance per loop (position loop, speed loop — never shared).
//! Beyond the textbook terms it carries the shaping needed on a noisy
//! relay-driven axis:
//!
//! - derivative on **measurement**, low-pass filtered, so target steps
//!   don't spike the D term and encoder noise doesn't get amplified;
//! - integral clamping plus integral separation (the accumulator is
//!   zeroed while the error is outside `int_threshold`) against windup
//!   during large transients;
//! - an error dead-zone that short-circuits the whole computation.
//!
//! There are no error paths: pathological `dt` and gains are clamped,
//! never rejected.

use crate::config::PidGains;

pub struct Pid {
    kp: f32,
    ki: f32,
    kd: f32,
    integral: f32,
    last_measured: f32,
    last_filtered: f32,
    alpha: f32,
    int_limit: f32,
    out_limit: f32,
    int_threshold: f32,
    dead_zone: f32,
}

impl Pid {
    pub fn new(gains: &PidGains) -> Self {
        Self {
            kp: gains.kp,
            ki: gains.ki,
            kd: gains.kd,
            integral: 0.0,
            last_measured: 0.0,
            last_filtered: 0.0,
            alpha: gains.alpha,
            int_limit: gains.int_limit,
            out_limit: gains.out_limit,
            int_threshold: gains.int_threshold,
            dead_zone: gains.dead_zone,
        }
    }

    /// Run one control step.
    ///
    /// `dt_s` is clamped to `[1e-6, 0.1]` s: no division by zero, and a
    /// stalled tick cannot blow up the integral.
    pub fn calculate(&mut self, target: f32, measured: f32, dt_s: f32) -> f32 {
        let dt = dt_s.clamp(1e-6, 0.1);

        let err = target - measured;
        if err.abs() < self.dead_zone {
            // Inside the dead-zone nothing is updated — repeated calls
            // leave the integral and derivative memories untouched.
            return 0.0;
        }

        // Derivative on measurement, then first-order low-pass.
        let raw_diff = -(measured - self.last_measured) / dt;
        self.last_measured = measured;
        let filtered = self.alpha * raw_diff + (1.0 - self.alpha) * self.last_filtered;
        self.last_filtered = filtered;

        // Integral with clamp and separation.
        self.integral = (self.integral + err * dt).clamp(-self.int_limit, self.int_limit);
        if self.int_threshold > 0.0 && err.abs() > self.int_threshold {
            self.integral = 0.0;
        }

        (self.kp * err + self.ki * self.integral + self.kd * filtered)
            .clamp(-self.out_limit, self.out_limit)
    }

    /// Clear accumulated state (integral and derivative memories).
    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.last_measured = 0.0;
        self.last_filtered = 0.0;
    }

    #[cfg(test)]
    pub(crate) fn integral(&self) -> f32 {
        self.integral
    }
}

/// Cascaded position → speed control.
///
/// The position loop's output is the speed setpoint; the speed loop's
/// output is the signed drive effort handed to the actuator decision.
pub struct CascadePid {
    position: Pid,
    speed: Pid,
}

impl CascadePid {
    pub fn new(position: &PidGains, speed: &PidGains) -> Self {
        Self {
            position: Pid::new(position),
            speed: Pid::new(speed),
        }
    }

    /// One cascade step: position error → speed setpoint → drive effort.
    pub fn calculate(
        &mut self,
        target_mm: f32,
        position_mm: f32,
        speed_mm_s: f32,
        dt_s: f32,
    ) -> f32 {
        let speed_setpoint = self.position.calculate(target_mm, position_mm, dt_s);
        self.speed.calculate(speed_setpoint, speed_mm_s, dt_s)
    }

    pub fn reset(&mut self) {
        self.position.reset();
        self.speed.reset();
    }
}
