//! Serialized dispatch queue.
//!
//! Every external stimulus enters the system through this queue:
//!
//! ```text
//! ┌──────────────────┐     ┌──────────────┐     ┌───────────────┐
//! │ Stack callbacks  │────▶│              │     │               │
//! │ Button ISR       │────▶│  Event Queue │────▶│ Dispatch Loop │
//! │ Alarm scheduler  │────▶│  (lock-free) │     │  (consumer)   │
//! └──────────────────┘     └──────────────┘     └───────────────┘
//! ```
//!
//! Events are consumed strictly in arrival order by a single consumer;
//! no priority and no reordering between the three sources. Because each
//! handler runs to completion before the next event is popped, the queue
//! is the serialization point that keeps actuator commands exclusive.

use core::sync::atomic::{AtomicU8, Ordering};

use crate::scheduler::AlarmId;

/// Maximum number of pending events.
/// Power of 2 for efficient ring buffer modulo.
const EVENT_QUEUE_CAP: usize = 32;

// ---------------------------------------------------------------------------
// Event payloads
// ---------------------------------------------------------------------------

/// Lifecycle signals delivered by the mesh stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkSignal {
    /// The stack restarted and restored (or failed to restore) network state.
    DeviceReboot { joined: bool },
    /// Network steering completed.
    SteeringDone { joined: bool },
    /// The device left the network (e.g. after a factory reset).
    Left,
}

impl NetworkSignal {
    /// Joined-state implied by this signal, if it carries one.
    pub fn joined(self) -> Option<bool> {
        match self {
            Self::DeviceReboot { joined } | Self::SteeringDone { joined } => Some(joined),
            Self::Left => Some(false),
        }
    }
}

/// One queued stimulus. `Copy` so the ring buffer stays allocation-free.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Stack lifecycle signal. The transient signal buffer the stack hands
    /// over is owned by the event and released when the event is dropped.
    NetworkSignal(NetworkSignal),
    /// Raw button state change: bitmask of current state, bitmask of
    /// buttons that changed.
    ButtonChanged { state: u32, changed: u32 },
    /// Remote attribute write delivered by the stack.
    AttributeWrite { cluster: u16, attr: u16, value: u8 },
    /// Identify notification from the stack: enter or leave identify mode.
    IdentifyTrigger { active: bool },
    /// A scheduled alarm fired.
    Alarm(AlarmId),
}

// ---------------------------------------------------------------------------
// Lock-free SPSC ring buffer
// ---------------------------------------------------------------------------
//
// Stack callbacks / ISRs write (produce), the dispatch loop reads
// (consume). Atomic head/tail indices enforce the SPSC discipline; the
// buffer lives in a static so interrupt-context producers can reach it.

static EVENT_HEAD: AtomicU8 = AtomicU8::new(0);
static EVENT_TAIL: AtomicU8 = AtomicU8::new(0);
// SAFETY: each slot is written only by the single producer before the
// head is published, and read only by the single consumer before the
// tail is advanced. The Acquire/Release pairs on head/tail order the
// slot accesses.
static mut EVENT_BUFFER: [Option<Event>; EVENT_QUEUE_CAP] = [None; EVENT_QUEUE_CAP];

/// Push an event into the queue.
/// Safe to call from ISR context (lock-free).
/// Returns `false` if the queue is full (event dropped).
pub fn push_event(event: Event) -> bool {
    let head = EVENT_HEAD.load(Ordering::Relaxed);
    let tail = EVENT_TAIL.load(Ordering::Acquire);
    let next_head = (head + 1) % EVENT_QUEUE_CAP as u8;

    if next_head == tail {
        return false; // Queue full — drop event.
    }

    // SAFETY: single producer; the slot at `head` is not visible to the
    // consumer until the store below publishes it.
    unsafe {
        EVENT_BUFFER[head as usize] = Some(event);
    }

    EVENT_HEAD.store(next_head, Ordering::Release);
    true
}

/// Pop the next event from the queue.
/// Called from the dispatch loop (single consumer).
/// Returns `None` if the queue is empty.
pub fn pop_event() -> Option<Event> {
    let tail = EVENT_TAIL.load(Ordering::Relaxed);
    let head = EVENT_HEAD.load(Ordering::Acquire);

    if tail == head {
        return None; // Empty.
    }

    // SAFETY: single consumer; the producer published this slot before
    // advancing the head we just observed. `Event` is `Copy`, so this is
    // a plain place read — no reference into the static is formed.
    let event = unsafe { EVENT_BUFFER[tail as usize] };
    EVENT_TAIL.store((tail + 1) % EVENT_QUEUE_CAP as u8, Ordering::Release);

    event
}

/// Drain all pending events into a callback, in FIFO order.
pub fn drain_events(mut handler: impl FnMut(Event)) {
    while let Some(event) = pop_event() {
        handler(event);
    }
}

/// Check if the event queue is empty.
pub fn queue_is_empty() -> bool {
    let tail = EVENT_TAIL.load(Ordering::Relaxed);
    let head = EVENT_HEAD.load(Ordering::Acquire);
    tail == head
}

/// Number of pending events.
pub fn queue_len() -> usize {
    let head = EVENT_HEAD.load(Ordering::Relaxed) as usize;
    let tail = EVENT_TAIL.load(Ordering::Relaxed) as usize;
    (head + EVENT_QUEUE_CAP - tail) % EVENT_QUEUE_CAP
}
