//! Application service — the hexagonal core.
//!
//! [`LiftService`] owns the frame parser and the lift controller and
//! exposes a clean, hardware-agnostic API.  All I/O flows through port
//! traits injected at call sites, making the entire service testable
//! with mock adapters.
//!
//! ```text
//!  HostLink ──▶ ┌──────────────────────────┐ ──▶ LiftDrive
//!               │       LiftService         │ ──▶ GripperPort
//!  PositionSensor ──▶ │ parser · controller │ ──▶ EventSink
//!               └──────────────────────────┘
//! ```
//!
//! Ordering contract: within one main-loop cycle, [`poll_link`] runs
//! before [`tick`], so a command received during the cycle is visible to
//! the same cycle's control decision.
//!
//! [`poll_link`]: LiftService::poll_link
//! [`tick`]: LiftService::tick

use log::{debug, info};

use crate::config::SystemConfig;
use crate::control::lift::{LiftController, LiftDirection, MotionMode};
use crate::protocol::{FrameParser, LIFTER_OK_FRAME};

use super::commands::HostCommand;
use super::events::AppEvent;
use super::ports::{EventSink, GripperPort, HostLink, LiftDrive, PositionSensor};

/// The application service orchestrates command dispatch and the
/// per-tick motion loop.
pub struct LiftService {
    parser: FrameParser,
    lift: LiftController,
    /// Last mode reported through the event sink.
    last_mode: MotionMode,
}

impl LiftService {
    /// Construct the service from configuration.
    ///
    /// Does **not** start the controller — call [`start`](Self::start) next.
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            parser: FrameParser::new(),
            lift: LiftController::new(config),
            last_mode: MotionMode::Idle,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Start the lift controller in its initial (Idle) state.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        self.lift.start();
        sink.emit(&AppEvent::Started);
        info!("LiftService started");
    }

    // ── Command path ──────────────────────────────────────────

    /// Drain every queued host byte through the parser and dispatch the
    /// commands it yields.  Call once per main-loop cycle, before
    /// [`tick`](Self::tick).
    pub fn poll_link(
        &mut self,
        link: &mut impl HostLink,
        gripper: &mut impl GripperPort,
        sink: &mut impl EventSink,
    ) {
        while let Some(byte) = link.next_byte() {
            if let Some(command) = self.parser.feed(byte) {
                self.dispatch(command, gripper);
            }
        }
        self.note_mode(sink);
    }

    fn dispatch(&mut self, command: HostCommand, gripper: &mut impl GripperPort) {
        debug!("dispatch: {command:?}");
        match command {
            HostCommand::LiftManual(direction) => self.lift.manual(direction),
            HostCommand::LiftStop => self.lift.manual(LiftDirection::Stop),
            HostCommand::LiftSetDelta(delta_mm) => self.lift.set_target_delta(delta_mm),
            HostCommand::GripperOpen => gripper.open(),
            HostCommand::GripperClose => gripper.close(),
            HostCommand::GripperSetPosition(pulse) => gripper.set_position(pulse),
        }
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one control cycle: sample feedback → control decision →
    /// actuator command → arrival notification.
    ///
    /// The `hw` parameter satisfies **both** [`PositionSensor`] and
    /// [`LiftDrive`] — this avoids a double mutable borrow while keeping
    /// the port boundary explicit.
    pub fn tick(
        &mut self,
        hw: &mut (impl PositionSensor + LiftDrive),
        link: &mut impl HostLink,
        sink: &mut impl EventSink,
    ) {
        hw.update();
        let position_mm = hw.position_mm();
        let speed_mm_s = hw.speed_mm_s();

        let out = self.lift.update(position_mm, speed_mm_s);
        hw.set_direction(out.direction);

        if out.arrived {
            info!("lift: arrived at {position_mm:.1} mm");
            link.send_frame(LIFTER_OK_FRAME);
            sink.emit(&AppEvent::TargetReached { position_mm });
        }
        self.note_mode(sink);
    }

    // ── Introspection ─────────────────────────────────────────

    /// Currently observable motion mode.
    pub fn mode(&self) -> MotionMode {
        self.lift.mode()
    }

    /// Outstanding absolute target, if any.
    pub fn target_mm(&self) -> Option<f32> {
        self.lift.target_mm()
    }

    fn note_mode(&mut self, sink: &mut impl EventSink) {
        let mode = self.lift.mode();
        if mode != self.last_mode {
            sink.emit(&AppEvent::ModeChanged {
                from: self.last_mode,
                to: mode,
            });
            self.last_mode = mode;
        }
    }
}
