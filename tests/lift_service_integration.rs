//! Integration tests: host byte stream → LiftService → actuator ports.

use std::collections::VecDeque;

use liftctl::app::events::AppEvent;
use liftctl::app::ports::{EventSink, GripperPort, HostLink, LiftDrive, PositionSensor};
use liftctl::app::service::LiftService;
use liftctl::config::SystemConfig;
use liftctl::control::lift::{LiftDirection, MotionMode};

// ── Mock implementations ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
enum GripCall {
    Open,
    Close,
    SetPosition(u16),
}

/// Combined position feedback + lift drive + gripper mock.
struct MockHw {
    position_mm: f32,
    speed_mm_s: f32,
    directions: Vec<LiftDirection>,
    grip_calls: Vec<GripCall>,
}

impl MockHw {
    fn new(position_mm: f32) -> Self {
        Self {
            position_mm,
            speed_mm_s: 0.0,
            directions: Vec::new(),
            grip_calls: Vec::new(),
        }
    }

    fn last_direction(&self) -> LiftDirection {
        *self.directions.last().expect("no direction issued")
    }
}

impl PositionSensor for MockHw {
    fn update(&mut self) {}

    fn position_mm(&self) -> f32 {
        self.position_mm
    }

    fn speed_mm_s(&self) -> f32 {
        self.speed_mm_s
    }
}

impl LiftDrive for MockHw {
    fn set_direction(&mut self, direction: LiftDirection) {
        self.directions.push(direction);
    }
}

impl GripperPort for MockHw {
    fn open(&mut self) {
        self.grip_calls.push(GripCall::Open);
    }

    fn close(&mut self) {
        self.grip_calls.push(GripCall::Close);
    }

    fn set_position(&mut self, pulse: u16) {
        self.grip_calls.push(GripCall::SetPosition(pulse));
    }
}

/// Scripted host link: queued RX bytes in, captured TX frames out.
struct MockLink {
    rx: VecDeque<u8>,
    tx: Vec<String>,
}

impl MockLink {
    fn new() -> Self {
        Self {
            rx: VecDeque::new(),
            tx: Vec::new(),
        }
    }

    fn queue(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes);
    }
}

impl HostLink for MockLink {
    fn next_byte(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }

    fn send_frame(&mut self, frame: &str) {
        self.tx.push(frame.to_string());
    }
}

#[derive(Default)]
struct RecordingSink {
    events: Vec<AppEvent>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(*event);
    }
}

// ── Harness ───────────────────────────────────────────────────

struct Harness {
    service: LiftService,
    hw: MockHw,
    link: MockLink,
    sink: RecordingSink,
}

impl Harness {
    fn new(position_mm: f32) -> Self {
        let mut service = LiftService::new(&SystemConfig::default());
        let mut sink = RecordingSink::default();
        service.start(&mut sink);
        Self {
            service,
            hw: MockHw::new(position_mm),
            link: MockLink::new(),
            sink,
        }
    }

    /// One main-loop cycle: drain the link, then run one control tick.
    fn cycle(&mut self) {
        self.service
            .poll_link(&mut self.link, &mut self.hw, &mut self.sink);
        self.service
            .tick(&mut self.hw, &mut self.link, &mut self.sink);
    }

    fn arrivals(&self) -> usize {
        self.link.tx.iter().filter(|f| *f == "$LIFTER:OK#").count()
    }
}

// ── Command → arrival flow ────────────────────────────────────

#[test]
fn delta_command_seeks_and_notifies_exactly_once() {
    let mut h = Harness::new(100.0);
    h.link.queue(b"$LIFTER:50.0#");

    // Position feedback advances 10 mm per tick while driven.
    for _ in 0..12 {
        h.cycle();
        if h.hw.last_direction() == LiftDirection::Up {
            h.hw.position_mm += 10.0;
        }
    }

    assert_eq!(h.arrivals(), 1);
    assert_eq!(h.hw.last_direction(), LiftDirection::Stop);
    assert_eq!(h.service.target_mm(), None);
    assert!(
        h.sink
            .events
            .iter()
            .any(|e| matches!(e, AppEvent::TargetReached { .. }))
    );

    // No further notifications or motion after arrival.
    for _ in 0..5 {
        h.cycle();
        assert_eq!(h.hw.last_direction(), LiftDirection::Stop);
    }
    assert_eq!(h.arrivals(), 1);
}

#[test]
fn command_is_visible_to_same_cycle_decision() {
    let mut h = Harness::new(100.0);
    h.link.queue(b"$LIFTER:50#");
    // The very first tick after the bytes arrive already drives.
    h.cycle();
    assert_eq!(h.hw.last_direction(), LiftDirection::Up);
    assert_eq!(h.service.target_mm(), Some(150.0));
}

#[test]
fn exactly_one_direction_call_per_tick() {
    let mut h = Harness::new(0.0);
    h.link.queue(b"$LIFTER:100#");
    for _ in 0..7 {
        h.cycle();
    }
    assert_eq!(h.hw.directions.len(), 7);
}

#[test]
fn negative_delta_drives_down_to_arrival() {
    let mut h = Harness::new(200.0);
    h.link.queue(b"$LIFTER:-60.5#");

    for _ in 0..12 {
        h.cycle();
        if h.hw.last_direction() == LiftDirection::Down {
            h.hw.position_mm -= 10.0;
        }
    }

    assert_eq!(h.arrivals(), 1);
    assert!((h.hw.position_mm - 139.5).abs() <= 5.0 + 1e-3);
}

#[test]
fn new_delta_supersedes_without_cancellation_signal() {
    let mut h = Harness::new(100.0);
    h.link.queue(b"$LIFTER:50#");
    h.cycle();
    assert_eq!(h.service.target_mm(), Some(150.0));

    h.link.queue(b"$LIFTER:-20#");
    h.cycle();
    assert_eq!(h.service.target_mm(), Some(80.0));
    assert_eq!(h.hw.last_direction(), LiftDirection::Down);
    assert_eq!(h.arrivals(), 0);
}

#[test]
fn delta_inside_tolerance_notifies_and_clears() {
    let mut h = Harness::new(100.0);
    h.link.queue(b"$LIFTER:3#");

    for _ in 0..10 {
        h.cycle();
        // Never moves: the target is already inside the band.
        assert_eq!(h.hw.last_direction(), LiftDirection::Stop);
    }

    assert_eq!(h.arrivals(), 1);
    assert_eq!(h.service.target_mm(), None);
    assert_eq!(h.service.mode(), MotionMode::Idle);
}

#[test]
fn zero_delta_clears_target_silently() {
    let mut h = Harness::new(100.0);
    h.link.queue(b"$LIFTER:50#");
    h.cycle();

    h.link.queue(b"$LIFTER:0#");
    h.cycle();
    assert_eq!(h.service.target_mm(), None);
    assert_eq!(h.hw.last_direction(), LiftDirection::Stop);
    assert_eq!(h.arrivals(), 0);
}

// ── Legacy opcodes and manual override ────────────────────────

#[test]
fn legacy_opcodes_jog_and_stop() {
    let mut h = Harness::new(0.0);

    h.link.queue(&[0x01]);
    h.cycle();
    assert_eq!(h.hw.last_direction(), LiftDirection::Up);
    assert_eq!(h.service.mode(), MotionMode::ManualUp);

    h.link.queue(&[0x02]);
    h.cycle();
    assert_eq!(h.hw.last_direction(), LiftDirection::Down);

    h.link.queue(&[0x00]);
    h.cycle();
    assert_eq!(h.hw.last_direction(), LiftDirection::Stop);
    assert_eq!(h.service.mode(), MotionMode::Idle);
}

#[test]
fn manual_overrides_pending_target_until_released() {
    let mut h = Harness::new(100.0);
    h.link.queue(b"$LIFTER:50#");
    h.link.queue(&[0x02]);
    h.cycle();
    // Manual wins even though an automatic target was set in the same
    // cycle.
    assert_eq!(h.hw.last_direction(), LiftDirection::Down);
    assert_eq!(h.service.mode(), MotionMode::ManualDown);

    h.link.queue(&[0x00]);
    h.cycle();
    assert_eq!(h.hw.last_direction(), LiftDirection::Up);
    assert_eq!(h.service.mode(), MotionMode::Automatic);
}

#[test]
fn stop_while_stopped_still_issues_stop() {
    let mut h = Harness::new(0.0);
    h.link.queue(&[0x00]);
    h.cycle();
    h.link.queue(&[0x00]);
    h.cycle();
    assert_eq!(h.hw.directions, vec![LiftDirection::Stop; 2]);
    assert_eq!(h.service.mode(), MotionMode::Idle);
}

// ── Gripper forwarding ────────────────────────────────────────

#[test]
fn gripper_frames_forward_to_port() {
    let mut h = Harness::new(0.0);
    h.link.queue(b"$GRIPPER:OPEN#$GRIPPER:CLOSE#$GRIPPER:POS:1500#");
    h.cycle();
    assert_eq!(
        h.hw.grip_calls,
        vec![
            GripCall::Open,
            GripCall::Close,
            GripCall::SetPosition(1500)
        ]
    );
    // Gripper traffic never disturbs the lift.
    assert_eq!(h.hw.last_direction(), LiftDirection::Stop);
}

// ── Malformed input ───────────────────────────────────────────

#[test]
fn malformed_frames_are_silently_dropped() {
    let mut h = Harness::new(100.0);
    h.link.queue(b"$BOGUS#$LIFTER:abc#$GRIPPER:POS:12x#noise");
    h.cycle();
    assert_eq!(h.hw.grip_calls, vec![]);
    assert_eq!(h.service.target_mm(), None);
    assert_eq!(h.hw.last_direction(), LiftDirection::Stop);
    assert_eq!(h.link.tx.len(), 0);
}

#[test]
fn frame_split_across_cycles_still_parses() {
    let mut h = Harness::new(100.0);
    h.link.queue(b"$LIF");
    h.cycle();
    assert_eq!(h.service.target_mm(), None);

    h.link.queue(b"TER:25#");
    h.cycle();
    assert_eq!(h.service.target_mm(), Some(125.0));
    assert_eq!(h.hw.last_direction(), LiftDirection::Up);
}

// ── Events ────────────────────────────────────────────────────

#[test]
fn mode_changes_are_reported() {
    let mut h = Harness::new(100.0);
    h.link.queue(b"$LIFTER:50#");
    h.cycle();
    h.hw.position_mm = 150.0;
    h.cycle();

    let changes: Vec<_> = h
        .sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::ModeChanged { from, to } => Some((*from, *to)),
            _ => None,
        })
        .collect();
    assert_eq!(
        changes,
        vec![
            (MotionMode::Idle, MotionMode::Automatic),
            (MotionMode::Automatic, MotionMode::Idle),
        ]
    );
}
