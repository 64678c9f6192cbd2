//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements                | Connects to             |
//! |-------------|---------------------------|-------------------------|
//! | `hardware`  | PositionSensor, LiftDrive | PCNT encoder, relay GPIO|
//! |             | GripperPort               | servo bus UART          |
//! | `host_link` | HostLink                  | host UART + RX queue    |
//! | `log_sink`  | EventSink                 | serial log output       |

pub mod hardware;
pub mod host_link;
pub mod log_sink;
