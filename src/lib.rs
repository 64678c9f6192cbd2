//! Lift controller firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection.  All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod control;
pub mod events;
pub mod fsm;
pub mod protocol;

pub mod error;
pub mod pins;

// Hardware-facing modules; the actual peripheral code inside is guarded
// by cfg attributes, host builds get simulation stubs.
pub mod adapters;
pub mod drivers;
