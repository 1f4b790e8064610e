//! Warning blink state machine
//!
//! While a warning is active the LED row alternates between the normal view
//! and a blank strip. Toggles are driven by absolute elapsed time since the
//! last toggle, so loop jitter does not change the cadence.

use embassy_time::{Duration, Instant};

pub const DEFAULT_BLINK_PERIOD: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlinkPhase {
    Idle,
    /// Row contents visible.
    On,
    /// Row blanked, status pixel kept.
    Off,
}

impl BlinkPhase {
    /// Whether the row contents should be drawn in this phase.
    pub fn shows_row(self) -> bool {
        !matches!(self, BlinkPhase::Off)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct WarningBlink {
    phase: BlinkPhase,
    last_toggle: Instant,
    period: Duration,
}

impl WarningBlink {
    pub fn new(period: Duration) -> Self {
        Self {
            phase: BlinkPhase::Idle,
            last_toggle: Instant::from_ticks(0),
            period,
        }
    }

    pub fn phase(&self) -> BlinkPhase {
        self.phase
    }

    /// Advance the machine.
    ///
    /// Returns the new phase when the LED output has to change.
    pub fn tick(&mut self, now: Instant, active: bool) -> Option<BlinkPhase> {
        let next = match (self.phase, active) {
            (BlinkPhase::Idle, false) => return None,
            (_, false) => BlinkPhase::Idle,
            (BlinkPhase::Idle, true) => BlinkPhase::On,
            (phase, true) => {
                if now.saturating_duration_since(self.last_toggle) < self.period {
                    return None;
                }
                if phase == BlinkPhase::On {
                    BlinkPhase::Off
                } else {
                    BlinkPhase::On
                }
            }
        };
        self.phase = next;
        self.last_toggle = now;
        Some(next)
    }
}

impl Default for WarningBlink {
    fn default() -> Self {
        Self::new(DEFAULT_BLINK_PERIOD)
    }
}
