//! Button press classifier.
//!
//! Converts raw button-state-changed events into exactly one of two
//! disjoint intents per press/release episode:
//!
//! | Intent                  | Condition                                    |
//! |-------------------------|----------------------------------------------|
//! | `ShortPress`            | released before the factory-reset hold       |
//! | `FactoryResetCompleted` | released after a qualifying long hold        |
//!
//! The hold-duration threshold is owned by the factory-reset
//! collaborator, not by this driver: every raw event is forwarded to
//! [`FactoryResetPort::check`] so long-hold detection runs independently
//! of the classification here. On release, `was_reset_done()` decides
//! which intent fires — never both, never neither.

use log::debug;

use crate::app::ports::FactoryResetPort;

/// Classified outcome of one press/release episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    /// Released before the long-hold threshold: toggle identify mode.
    ShortPress,
    /// A factory reset completed during this hold: the identify toggle
    /// is suppressed.
    FactoryResetCompleted,
}

pub struct ButtonClassifier {
    /// Bitmask of the single monitored button.
    mask: u32,
}

impl ButtonClassifier {
    pub fn new(mask: u32) -> Self {
        Self { mask }
    }

    /// Bitmask this classifier watches.
    pub fn mask(&self) -> u32 {
        self.mask
    }

    /// Feed one raw button event.
    ///
    /// * `state` — bitmask of buttons currently pressed.
    /// * `changed` — bitmask of buttons that changed state.
    ///
    /// Returns the classified intent on a release of the monitored
    /// button; `None` for presses and for other buttons.
    pub fn on_changed(
        &mut self,
        state: u32,
        changed: u32,
        reset: &mut impl FactoryResetPort,
    ) -> Option<ButtonEvent> {
        let classified = if self.mask & changed != 0 {
            if self.mask & state != 0 {
                // Transition to pressed — the episode begins, nothing fires.
                None
            } else if reset.was_reset_done() {
                debug!("button: release after factory reset, identify toggle suppressed");
                Some(ButtonEvent::FactoryResetCompleted)
            } else {
                Some(ButtonEvent::ShortPress)
            }
        } else {
            None
        };

        // Long-hold detection observes every event, whatever we classified.
        reset.check(state, changed);

        classified
    }
}
