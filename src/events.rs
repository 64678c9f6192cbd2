//! Interrupt-to-main-loop plumbing.
//!
//! Two pieces of state cross the ISR boundary:
//!
//! - the host-link **byte ring buffer** (UART RX ISR produces, the frame
//!   parser in the main loop consumes), and
//! - the **periodic tick counter** (10 ms timer callback increments, the
//!   main loop consumes one tick per control cycle).
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ UART RX ISR │────▶│  ByteQueue   │────▶│  Main Loop   │
//! │ (producer)  │     │  (lock-free) │     │  (consumer)  │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```
//!
//! Discipline is strict SPSC: the producer only ever advances `head`, the
//! consumer only ever advances `tail`.  A full buffer drops the incoming
//! byte — no blocking, no growth, no backpressure to the sender (a garbled
//! command is the host's problem to resend).
//!
//! Both statics are initialised before interrupts are enabled and never
//! reinitialised; the ISR borrows exactly this one queue instance.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

/// Ring capacity. Power of 2 for cheap modulo; comfortably above the
/// longest burst a host sends between two main-loop iterations.
const BYTE_QUEUE_CAP: usize = 256;

// ── Lock-free SPSC byte ring buffer ───────────────────────────

/// Single-producer/single-consumer byte ring.
///
/// Instantiable so tests can own private queues; production code uses the
/// one [`static@HOST_RX`] instance shared between the RX ISR and the main loop.
pub struct ByteQueue {
    buf: UnsafeCell<[u8; BYTE_QUEUE_CAP]>,
    head: AtomicUsize,
    tail: AtomicUsize,
}

// SAFETY: access is SPSC by contract — one producer context writes buf
// slots it owns (between tail and head) before releasing them via the
// head store; one consumer context reads slots only after the acquire
// load of head has published them.
unsafe impl Sync for ByteQueue {}

impl ByteQueue {
    pub const fn new() -> Self {
        Self {
            buf: UnsafeCell::new([0; BYTE_QUEUE_CAP]),
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
        }
    }

    /// Append one byte. Safe to call from ISR context (lock-free).
    /// Returns `false` if the queue is full (byte dropped).
    pub fn push(&self, byte: u8) -> bool {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);
        let next_head = (head + 1) % BYTE_QUEUE_CAP;

        if next_head == tail {
            return false; // Queue full — drop byte.
        }

        // SAFETY: slot `head` is outside the readable region until the
        // Release store below publishes it; only the single producer
        // writes here.
        unsafe {
            (*self.buf.get())[head] = byte;
        }

        self.head.store(next_head, Ordering::Release);
        true
    }

    /// Pop the next byte. Called from the main loop (single consumer).
    /// Returns `None` if the queue is empty.
    pub fn pop(&self) -> Option<u8> {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);

        if tail == head {
            return None; // Empty.
        }

        // SAFETY: slot `tail` was published by the producer's Release
        // store; only the single consumer reads here.
        let byte = unsafe { (*self.buf.get())[tail] };
        self.tail.store((tail + 1) % BYTE_QUEUE_CAP, Ordering::Release);
        Some(byte)
    }

    /// Number of queued bytes.
    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Relaxed);
        (head + BYTE_QUEUE_CAP - tail) % BYTE_QUEUE_CAP
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The host-link receive queue. Fed by the UART RX ISR, drained by the
/// frame parser every main-loop iteration before the control tick.
pub static HOST_RX: ByteQueue = ByteQueue::new();

// ── Periodic tick ─────────────────────────────────────────────

static TICK_PENDING: AtomicU32 = AtomicU32::new(0);

/// Record one elapsed control period. Called from the 10 ms timer
/// callback; does nothing but bump a counter, so ISR latency stays bounded.
pub fn tick_isr() {
    TICK_PENDING.fetch_add(1, Ordering::Release);
}

/// Consume one pending tick, if any. Called from the main loop.
///
/// A counter rather than a flag: if the loop ever stalls past one period,
/// the backlog is worked off one control cycle at a time instead of being
/// silently collapsed.
pub fn take_tick() -> bool {
    TICK_PENDING
        .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
        .is_ok()
}

#[cfg(test)]
pub(crate) fn drain_ticks() {
    TICK_PENDING.store(0, Ordering::Release);
}
