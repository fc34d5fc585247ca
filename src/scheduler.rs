//! Cancelable alarm scheduler.
//!
//! Replaces self-rescheduling callback alarms with a fixed-slot table of
//! repeating and one-shot alarms, each addressed by a stable handle. The
//! scheduler is intentionally decoupled from the event system: when an
//! alarm fires it invokes the [`AlarmDelegate`] callback, and the main
//! loop implements the delegate by pushing an event into the dispatch
//! queue. This makes the scheduler independently testable.
//!
//! ```text
//! ┌───────────────┐   tick(now)   ┌──────────────────────┐
//! │ Dispatch loop │──────────────▶│    AlarmScheduler     │
//! └───────────────┘               │ [slot0][slot1][slot2] │
//!        ▲                        └──────────┬───────────┘
//!        │      on_alarm_fired(id)           │
//!        └───────────────────────────────────┘
//! ```

use log::{info, warn};

use crate::app::ports::AlarmDelegate;

/// Maximum number of concurrent alarms (stack-allocated).
const MAX_ALARMS: usize = 4;

// ---------------------------------------------------------------------------
// Alarm identity and handles
// ---------------------------------------------------------------------------

/// What an alarm is for. Carried through the delegate so the dispatch
/// loop can route the fire without knowing about slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmId {
    /// Identify-mode LED toggle.
    IdentifyBlink,
    /// Run-status heartbeat toggle.
    Heartbeat,
}

/// Opaque handle to a scheduled alarm.
///
/// Carries a generation token: a handle kept across a cancel/reschedule
/// can never cancel the newer alarm occupying the same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlarmHandle {
    slot: u8,
    token: u16,
}

/// How an alarm fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmKind {
    /// Fire every `interval_ms`, until canceled.
    Repeating { interval_ms: u32 },
    /// Fire once after `delay_ms`, then free the slot.
    OneShot { delay_ms: u32 },
}

/// Internal bookkeeping for a live alarm.
#[derive(Debug, Clone, Copy)]
struct AlarmEntry {
    id: AlarmId,
    kind: AlarmKind,
    next_fire_ms: u64,
    token: u16,
}

// ---------------------------------------------------------------------------
// Scheduler engine
// ---------------------------------------------------------------------------

/// The alarm scheduler engine.
pub struct AlarmScheduler {
    slots: [Option<AlarmEntry>; MAX_ALARMS],
    /// Monotonically increasing token generator for handle validity.
    next_token: u16,
}

impl Default for AlarmScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl AlarmScheduler {
    pub fn new() -> Self {
        Self {
            slots: [None; MAX_ALARMS],
            next_token: 1,
        }
    }

    /// Schedule a repeating alarm. First fire is `interval_ms` from `now_ms`.
    /// Returns `None` if all slots are occupied.
    pub fn schedule_repeating(
        &mut self,
        id: AlarmId,
        interval_ms: u32,
        now_ms: u64,
    ) -> Option<AlarmHandle> {
        self.insert(id, AlarmKind::Repeating { interval_ms }, now_ms)
    }

    /// Schedule a one-shot alarm firing `delay_ms` from `now_ms`.
    pub fn schedule_once(&mut self, id: AlarmId, delay_ms: u32, now_ms: u64) -> Option<AlarmHandle> {
        self.insert(id, AlarmKind::OneShot { delay_ms }, now_ms)
    }

    /// Cancel an alarm by handle. Idempotent: canceling a handle whose
    /// alarm already fired (one-shot), was canceled, or was superseded is
    /// a no-op returning `false`.
    pub fn cancel(&mut self, handle: AlarmHandle) -> bool {
        let slot = handle.slot as usize;
        if slot >= MAX_ALARMS {
            return false;
        }
        match self.slots[slot] {
            Some(entry) if entry.token == handle.token => {
                info!("scheduler: canceled {:?} (slot {slot})", entry.id);
                self.slots[slot] = None;
                true
            }
            _ => false,
        }
    }

    /// Whether the handle still addresses a live alarm.
    pub fn is_live(&self, handle: AlarmHandle) -> bool {
        matches!(
            self.slots.get(handle.slot as usize),
            Some(Some(entry)) if entry.token == handle.token
        )
    }

    /// Number of live alarms.
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Advance the scheduler to `now_ms`, invoking the delegate once per
    /// due alarm. Repeating alarms are rearmed relative to `now_ms`, so a
    /// tick delayed by a long-running actuator call fires once and then
    /// resumes its cadence (best-effort, never bursts to catch up).
    pub fn tick(&mut self, now_ms: u64, delegate: &mut dyn AlarmDelegate) {
        for slot in &mut self.slots {
            let Some(entry) = slot else { continue };
            if now_ms < entry.next_fire_ms {
                continue;
            }

            delegate.on_alarm_fired(entry.id);

            match entry.kind {
                AlarmKind::Repeating { interval_ms } => {
                    entry.next_fire_ms = now_ms + u64::from(interval_ms);
                }
                AlarmKind::OneShot { .. } => {
                    *slot = None;
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn insert(&mut self, id: AlarmId, kind: AlarmKind, now_ms: u64) -> Option<AlarmHandle> {
        let delay = match kind {
            AlarmKind::Repeating { interval_ms } => interval_ms,
            AlarmKind::OneShot { delay_ms } => delay_ms,
        };

        for (i, slot) in self.slots.iter_mut().enumerate() {
            if slot.is_none() {
                let token = self.next_token;
                self.next_token = self.next_token.wrapping_add(1).max(1);
                *slot = Some(AlarmEntry {
                    id,
                    kind,
                    next_fire_ms: now_ms + u64::from(delay),
                    token,
                });
                info!("scheduler: armed {id:?} at slot {i} ({kind:?})");
                return Some(AlarmHandle {
                    slot: i as u8,
                    token,
                });
            }
        }

        warn!("scheduler: all {MAX_ALARMS} slots busy, {id:?} not scheduled");
        None
    }
}
