//! Concrete state handler functions and table builder.
//!
//! Each state is defined by plain `fn` pointers — no closures, no dynamic
//! dispatch, no heap.  This is the classic embedded C FSM pattern expressed
//! in safe Rust.
//!
//! ```text
//!  IDLE ──[|target - position| > tolerance]──▶ MOVING
//!    ▲                                           │
//!    └───[|target - position| <= tolerance]──────┘
//!             (stop actuator, clear target)
//! ```
//!
//! Manual override never reaches these handlers: the lift controller
//! short-circuits before ticking the FSM, so `Moving` only ever describes
//! automatic target-seeking.

use super::context::LiftContext;
use super::{StateDescriptor, StateId};
use crate::control::lift::LiftDirection;
use log::{debug, info};

/// Tick divider for the position trace while seeking.
const TRACE_DIVIDER: u64 = 50;

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0 — Idle
        StateDescriptor {
            id: StateId::Idle,
            name: "Idle",
            handle_event: idle_handle_event,
            on_enter: None,
            on_exit: None,
            action: idle_action,
        },
        // Index 1 — Moving
        StateDescriptor {
            id: StateId::Moving,
            name: "Moving",
            handle_event: moving_handle_event,
            on_enter: Some(moving_enter),
            on_exit: Some(moving_exit),
            action: moving_action,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE state — holding position, watching for an outstanding target
// ═══════════════════════════════════════════════════════════════════════════

fn idle_handle_event(ctx: &mut LiftContext) -> Option<StateId> {
    match ctx.position_error() {
        Some(error) if error.abs() > ctx.tolerance_mm => Some(StateId::Moving),
        Some(_) => {
            // Target already inside the tolerance band: arrived without
            // ever moving.  Report and clear, same as a completed seek.
            ctx.arrived = true;
            ctx.target_mm = None;
            None
        }
        None => None,
    }
}

fn idle_action(ctx: &mut LiftContext) {
    // Idle hold: the relay is commanded off every tick.
    ctx.command = LiftDirection::Stop;
}

// ═══════════════════════════════════════════════════════════════════════════
//  MOVING state — automatic target-seeking
// ═══════════════════════════════════════════════════════════════════════════

fn moving_handle_event(ctx: &mut LiftContext) -> Option<StateId> {
    match ctx.position_error() {
        // Target vanished (superseded with zero delta) — nothing to seek.
        None => Some(StateId::Idle),
        Some(error) if error.abs() <= ctx.tolerance_mm => {
            ctx.arrived = true;
            Some(StateId::Idle)
        }
        Some(_) => None,
    }
}

fn moving_enter(ctx: &mut LiftContext) {
    if let Some(target) = ctx.target_mm {
        info!(
            "MOVING: seeking {:.1} mm from {:.1} mm",
            target, ctx.position_mm
        );
    }
}

fn moving_exit(ctx: &mut LiftContext) {
    // Transition action: stop the actuator, clear the target.
    ctx.command = LiftDirection::Stop;
    ctx.target_mm = None;
}

fn moving_action(ctx: &mut LiftContext) {
    let Some(target) = ctx.target_mm else {
        return;
    };
    let error = target - ctx.position_mm;

    // Drive effort: through the cascaded PID when configured, otherwise
    // bang-bang on the error sign. A zero cascade output falls back to
    // the error sign so the relay never sits idle outside the band.
    let effort = match ctx.pid.as_mut() {
        Some(pid) => {
            let out = pid.calculate(target, ctx.position_mm, ctx.speed_mm_s, ctx.tick_secs);
            if out == 0.0 { error } else { out }
        }
        None => error,
    };
    ctx.command = if effort > 0.0 {
        LiftDirection::Up
    } else {
        LiftDirection::Down
    };

    if ctx.total_ticks % TRACE_DIVIDER == 0 {
        debug!(
            "seek: target {:.1} mm, current {:.1} mm, error {:.1} mm",
            target, ctx.position_mm, error
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SystemConfig;
    use crate::fsm::Fsm;

    fn seeking_fsm(ctx: &mut LiftContext, target: f32) -> Fsm {
        let mut fsm = Fsm::new(build_state_table(), StateId::Idle);
        fsm.start(ctx);
        ctx.target_mm = Some(target);
        fsm.tick(ctx);
        fsm
    }

    #[test]
    fn moving_drives_toward_positive_error() {
        let mut ctx = LiftContext::new(&SystemConfig::default());
        ctx.position_mm = 100.0;
        let fsm = seeking_fsm(&mut ctx, 150.0);
        assert_eq!(fsm.current_state(), StateId::Moving);
        assert_eq!(ctx.command, LiftDirection::Up);
    }

    #[test]
    fn moving_drives_toward_negative_error() {
        let mut ctx = LiftContext::new(&SystemConfig::default());
        ctx.position_mm = 100.0;
        let _fsm = seeking_fsm(&mut ctx, 50.0);
        assert_eq!(ctx.command, LiftDirection::Down);
    }

    #[test]
    fn error_equal_to_tolerance_counts_as_arrived() {
        let mut ctx = LiftContext::new(&SystemConfig::default());
        ctx.position_mm = 0.0;
        let mut fsm = seeking_fsm(&mut ctx, 50.0);
        ctx.position_mm = 50.0 - ctx.tolerance_mm;
        fsm.tick(&mut ctx);
        assert_eq!(fsm.current_state(), StateId::Idle);
        assert!(ctx.arrived);
        assert_eq!(ctx.command, LiftDirection::Stop);
    }

    #[test]
    fn cleared_target_abandons_seek_without_arrival() {
        let mut ctx = LiftContext::new(&SystemConfig::default());
        ctx.position_mm = 0.0;
        let mut fsm = seeking_fsm(&mut ctx, 50.0);
        ctx.target_mm = None;
        fsm.tick(&mut ctx);
        assert_eq!(fsm.current_state(), StateId::Idle);
        assert!(!ctx.arrived);
        assert_eq!(ctx.command, LiftDirection::Stop);
    }

    #[test]
    fn pid_cascade_still_respects_tolerance_band() {
        let config = SystemConfig {
            pid_enabled: true,
            ..SystemConfig::default()
        };
        let mut ctx = LiftContext::new(&config);
        ctx.position_mm = 0.0;
        let mut fsm = seeking_fsm(&mut ctx, 100.0);
        assert_eq!(ctx.command, LiftDirection::Up);
        ctx.position_mm = 98.0;
        fsm.tick(&mut ctx);
        assert_eq!(fsm.current_state(), StateId::Idle);
        assert!(ctx.arrived);
    }
}
