//! Quadrature encoder position/speed estimation.
//!
//! The PCNT unit counts signed pulses in hardware; each tick the driver
//! reads-and-clears the 16-bit counter and folds the delta into a wide
//! accumulator.  Read-and-clear per tick keeps the hardware counter far
//! from its ±32k limits, so lift travel is bounded only by the `i64`
//! total.
//!
//! Calibration (`pulses_per_mm`) differs between lift gearbox variants,
//! so it comes from [`SystemConfig`] rather than a constant.

use crate::config::SystemConfig;
use crate::drivers::hw_init;

pub struct EncoderDriver {
    /// Signed pulse total since boot.
    total_pulses: i64,
    position_mm: f32,
    speed_mm_s: f32,
    pulses_per_mm: f32,
    tick_secs: f32,
}

impl EncoderDriver {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            total_pulses: 0,
            position_mm: 0.0,
            speed_mm_s: 0.0,
            pulses_per_mm: config.pulses_per_mm,
            tick_secs: config.tick_secs(),
        }
    }

    /// Sample the hardware counter once and update the estimates.
    pub fn update(&mut self) {
        let delta = hw_init::pcnt_read_and_clear();
        self.accumulate(delta);
    }

    /// Fold a signed pulse delta into the position/speed estimate.
    /// Split out from [`update`](Self::update) so host tests can feed
    /// synthetic deltas without hardware.
    pub fn accumulate(&mut self, delta: i16) {
        self.total_pulses += i64::from(delta);
        self.position_mm = self.total_pulses as f32 / self.pulses_per_mm;
        self.speed_mm_s = f32::from(delta) / self.pulses_per_mm / self.tick_secs;
    }

    pub fn position_mm(&self) -> f32 {
        self.position_mm
    }

    pub fn speed_mm_s(&self) -> f32 {
        self.speed_mm_s
    }

    pub fn total_pulses(&self) -> i64 {
        self.total_pulses
    }
}
