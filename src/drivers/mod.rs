//! Hardware drivers (dual-target: ESP-IDF hardware or host simulation).

pub mod encoder;
pub mod gripper;
pub mod hw_init;
pub mod hw_timer;
pub mod relay;
