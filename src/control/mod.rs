//! Closed-loop motion control: the filtered PID unit and the lift
//! position controller built on top of it.

pub mod lift;
pub mod pid;
