//! Function-pointer finite state machine engine.
//!
//! Classic embedded FSM pattern expressed in safe Rust:
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │  StateTable                                                    │
//! │  ┌────────┬──────────────┬──────────┬──────────┬────────────┐  │
//! │  │ StateId │ handle_event │ on_enter │ on_exit  │ action     │  │
//! │  ├────────┼──────────────┼──────────┼──────────┼────────────┤  │
//! │  │ Idle    │ fn->Option<> │ fn(ctx)  │ fn(ctx)  │ fn(ctx)    │  │
//! │  │ Moving  │ fn->Option<> │ fn(ctx)  │ fn(ctx)  │ fn(ctx)    │  │
//! │  └────────┴──────────────┴──────────┴──────────┴────────────┘  │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each tick the engine evaluates `handle_event` for the **current** state
//! against the latest context.  If it names a different state, the engine
//! runs the old state's `on_exit`, switches, and runs the new state's
//! `on_enter`.  It then always runs the continuous `action` of the
//! (possibly new) state — so a transition and the first tick of the new
//! behavior land in the same control period.  All functions receive
//! `&mut LiftContext`, which holds the position sample, the outstanding
//! target, and the actuator command output.

pub mod context;
pub mod states;

use context::LiftContext;
use log::info;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Enumeration of the supervisory lift states.
/// Must stay in sync with the state table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StateId {
    Idle = 0,
    Moving = 1,
}

impl StateId {
    /// Total number of states — used to size the table array.
    pub const COUNT: usize = 2;

    /// Convert a `u8` index back to `StateId`.  Panics on out-of-range in
    /// debug builds; returns `Idle` in release (the lift holds still).
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Idle,
            1 => Self::Moving,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Idle
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
/// These run exactly once on each state transition.
pub type StateActionFn = fn(&mut LiftContext);

/// Signature for the transition-decision handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type StateEventFn = fn(&mut LiftContext) -> Option<StateId>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single FSM state.
/// Stored in a fixed-size array — no heap, no `dyn`.
pub struct StateDescriptor {
    pub id: StateId,
    pub name: &'static str,
    /// Transition decision, evaluated first each tick.
    pub handle_event: StateEventFn,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    /// Continuous per-tick action, run after any transition.
    pub action: StateActionFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The finite state machine engine.
///
/// Owns the state table (array of [`StateDescriptor`]) and is driven with a
/// mutable [`LiftContext`] threaded through every handler call.
pub struct Fsm {
    /// Fixed-size table indexed by `StateId as usize`.
    table: [StateDescriptor; StateId::COUNT],
    /// Index of the currently active state.
    current: usize,
    /// Monotonically increasing tick counter.
    tick_count: u64,
    /// Tick at which the current state was entered.
    state_entry_tick: u64,
}

impl Fsm {
    /// Construct a new FSM with the given state table, starting in `initial`.
    pub fn new(table: [StateDescriptor; StateId::COUNT], initial: StateId) -> Self {
        Self {
            table,
            current: initial as usize,
            tick_count: 0,
            state_entry_tick: 0,
        }
    }

    /// Run the initial `on_enter` for the starting state.
    /// Call once after construction, before the first `tick()`.
    pub fn start(&mut self, ctx: &mut LiftContext) {
        info!("FSM starting in state: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Advance the FSM by one tick.
    ///
    /// 1. Evaluate `handle_event` for the current state.
    /// 2. If it names a different state, execute the transition:
    ///    `on_exit(current)` → switch → `on_enter(next)`.
    /// 3. Run the continuous `action` of the (possibly new) state.
    pub fn tick(&mut self, ctx: &mut LiftContext) {
        self.tick_count += 1;
        ctx.total_ticks = self.tick_count;

        if let Some(next_id) = (self.table[self.current].handle_event)(ctx) {
            if next_id as usize != self.current {
                self.transition(next_id, ctx);
            }
        }

        (self.table[self.current].action)(ctx);
    }

    /// The current state's identity.
    pub fn current_state(&self) -> StateId {
        StateId::from_index(self.current)
    }

    /// How many ticks the FSM has been in the current state.
    pub fn ticks_in_current_state(&self) -> u64 {
        self.tick_count - self.state_entry_tick
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next_id: StateId, ctx: &mut LiftContext) {
        let next_idx = next_id as usize;

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        // Exit current state
        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        // Update pointer and timing
        self.current = next_idx;
        self.state_entry_tick = self.tick_count;

        // Enter new state
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::context::LiftContext;
    use super::*;
    use crate::config::SystemConfig;
    use crate::control::lift::LiftDirection;

    fn make_ctx() -> LiftContext {
        LiftContext::new(&SystemConfig::default())
    }

    fn make_fsm() -> Fsm {
        Fsm::new(states::build_state_table(), StateId::Idle)
    }

    #[test]
    fn starts_in_idle() {
        let fsm = make_fsm();
        assert_eq!(fsm.current_state(), StateId::Idle);
    }

    #[test]
    fn tick_increments_counter() {
        let mut fsm = make_fsm();
        let mut ctx = make_ctx();
        fsm.start(&mut ctx);
        fsm.tick(&mut ctx);
        assert_eq!(fsm.ticks_in_current_state(), 1);
        fsm.tick(&mut ctx);
        assert_eq!(fsm.ticks_in_current_state(), 2);
    }

    #[test]
    fn idle_holds_stop_without_target() {
        let mut fsm = make_fsm();
        let mut ctx = make_ctx();
        fsm.start(&mut ctx);
        ctx.position_mm = 42.0;
        fsm.tick(&mut ctx);
        assert_eq!(fsm.current_state(), StateId::Idle);
        assert_eq!(ctx.command, LiftDirection::Stop);
    }

    #[test]
    fn idle_to_moving_drives_on_the_same_tick() {
        let mut fsm = make_fsm();
        let mut ctx = make_ctx();
        fsm.start(&mut ctx);
        ctx.position_mm = 0.0;
        ctx.target_mm = Some(50.0);
        fsm.tick(&mut ctx);
        assert_eq!(fsm.current_state(), StateId::Moving);
        // The new state's continuous action ran this tick.
        assert_eq!(ctx.command, LiftDirection::Up);
    }

    #[test]
    fn target_inside_tolerance_arrives_from_idle() {
        let mut fsm = make_fsm();
        let mut ctx = make_ctx();
        fsm.start(&mut ctx);
        ctx.position_mm = 0.0;
        ctx.target_mm = Some(ctx.tolerance_mm);
        fsm.tick(&mut ctx);
        // Never enters Moving, but the target still completes.
        assert_eq!(fsm.current_state(), StateId::Idle);
        assert!(ctx.arrived);
        assert_eq!(ctx.target_mm, None);
        assert_eq!(ctx.command, LiftDirection::Stop);
    }

    #[test]
    fn moving_to_idle_clears_target_and_stops() {
        let mut fsm = make_fsm();
        let mut ctx = make_ctx();
        fsm.start(&mut ctx);
        ctx.position_mm = 0.0;
        ctx.target_mm = Some(50.0);
        fsm.tick(&mut ctx); // Idle -> Moving, driving
        ctx.position_mm = 48.0;
        fsm.tick(&mut ctx); // within tolerance -> Idle
        assert_eq!(fsm.current_state(), StateId::Idle);
        assert_eq!(ctx.command, LiftDirection::Stop);
        assert_eq!(ctx.target_mm, None);
        assert!(ctx.arrived);
    }

    #[test]
    fn state_id_from_index_roundtrip() {
        for i in 0..StateId::COUNT {
            let id = StateId::from_index(i);
            assert_eq!(id as usize, i);
        }
    }
}
