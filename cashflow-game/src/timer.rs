//! One-second session countdown.

/// Countdown clock for a run. The host drives it by calling the session's
/// one-second tick; the timer itself never spawns anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTimer {
    pub remaining: u32,
    pub running: bool,
}

impl SessionTimer {
    #[must_use]
    pub const fn new(seconds: u32) -> Self {
        Self {
            remaining: seconds,
            running: false,
        }
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Count down one second and return the remaining time.
    pub fn tick(&mut self) -> u32 {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining
    }

    #[must_use]
    pub const fn is_expired(self) -> bool {
        self.remaining == 0
    }
}

/// Render seconds as `MM:SS` for the clock readout.
#[must_use]
pub fn format_mmss(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
