//! Blink hysteresis state machine.
//!
//! EAR is a noisy function of landmark jitter. Two thresholds with a dead
//! zone between them (close below 0.25, reopen above 0.35) plus a minimum
//! inter-blink interval keep detector noise from producing spurious
//! multi-counts: a crossing is counted once, and the eye must climb back
//! through the dead zone before another crossing can count.

use std::time::{Duration, Instant};

/// Tuning for the blink state machine.
#[derive(Debug, Clone)]
pub struct BlinkConfig {
    /// EAR below this while open counts as a closure.
    pub close_threshold: f32,
    /// EAR above this reopens the eye, from any state.
    pub open_threshold: f32,
    /// Minimum interval between counted blinks.
    pub cooldown: Duration,
    /// Counted blinks needed to emit a qualifying event.
    pub required_blinks: u32,
}

impl Default for BlinkConfig {
    fn default() -> Self {
        Self {
            close_threshold: 0.25,
            open_threshold: 0.35,
            cooldown: Duration::from_millis(200),
            required_blinks: 1,
        }
    }
}

/// Outcome of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlinkTick {
    /// No transition; state held.
    Held,
    /// Eyes reopened past the open threshold.
    Reopened,
    /// A closure was counted, but the required total is not reached yet.
    Counted(u32),
    /// The required blink total was just reached.
    Qualifying,
}

/// Owned blink state, advanced once per detection tick.
///
/// The capture controller owns one of these per session and calls
/// [`reset`](Self::reset) when a capture cycle completes.
#[derive(Debug, Clone)]
pub struct BlinkDetector {
    config: BlinkConfig,
    eye_open: bool,
    blink_count: u32,
    last_blink: Option<Instant>,
}

impl BlinkDetector {
    pub fn new(config: BlinkConfig) -> Self {
        Self {
            config,
            eye_open: true,
            blink_count: 0,
            last_blink: None,
        }
    }

    pub fn blink_count(&self) -> u32 {
        self.blink_count
    }

    pub fn eye_open(&self) -> bool {
        self.eye_open
    }

    /// Advance the machine with one combined EAR sample.
    pub fn tick(&mut self, combined_ear: f32, now: Instant) -> BlinkTick {
        if self.eye_open
            && combined_ear < self.config.close_threshold
            && self.cooldown_elapsed(now)
        {
            self.eye_open = false;
            self.blink_count += 1;
            self.last_blink = Some(now);
            tracing::debug!(count = self.blink_count, ear = combined_ear, "blink counted");

            if self.blink_count == self.config.required_blinks {
                return BlinkTick::Qualifying;
            }
            return BlinkTick::Counted(self.blink_count);
        }

        if combined_ear > self.config.open_threshold {
            let was_closed = !self.eye_open;
            self.eye_open = true;
            return if was_closed {
                BlinkTick::Reopened
            } else {
                BlinkTick::Held
            };
        }

        BlinkTick::Held
    }

    /// Restore `{eye_open: true, blink_count: 0}` after a capture cycle.
    ///
    /// `last_blink` survives the reset so the cooldown window spans
    /// capture-cycle boundaries.
    pub fn reset(&mut self) {
        self.eye_open = true;
        self.blink_count = 0;
    }

    fn cooldown_elapsed(&self, now: Instant) -> bool {
        match self.last_blink {
            Some(t) => now.duration_since(t) > self.config.cooldown,
            None => true,
        }
    }
}
