//! Intro message timing
//!
//! Purely cosmetic. The intro lines alternate on a wall-clock interval until
//! the ball starts moving, then fade out over a fixed wall-clock window. All
//! times are milliseconds from the host clock, not simulation ticks.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

pub const INTRO_LINES: [&str; 2] = ["Connect the Stars", "Tap and start seeking..."];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntroMessage {
    active: bool,
    line: usize,
    opacity: f32,
    /// When the current line was shown
    shown_at_ms: Option<f64>,
    /// When the ball first moved this round
    moving_since_ms: Option<f64>,
}

impl Default for IntroMessage {
    fn default() -> Self {
        Self {
            active: true,
            line: 0,
            opacity: 1.0,
            shown_at_ms: None,
            moving_since_ms: None,
        }
    }
}

impl IntroMessage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Text to show, if the message is still up
    pub fn text(&self) -> Option<&'static str> {
        self.active.then_some(INTRO_LINES[self.line])
    }

    pub fn opacity(&self) -> f32 {
        if self.active { self.opacity } else { 0.0 }
    }

    pub fn started_moving(&self) -> bool {
        self.moving_since_ms.is_some()
    }

    /// Advance with the host clock. Returns true on the call that finishes the
    /// fade and dismisses the message.
    pub fn update(&mut self, now_ms: f64, ball_moving: bool, tuning: &Tuning) -> bool {
        if !now_ms.is_finite() {
            log::debug!("Ignoring non-finite clock sample");
            return false;
        }

        if ball_moving && self.moving_since_ms.is_none() {
            self.moving_since_ms = Some(now_ms);
        }

        if !self.active {
            return false;
        }

        match self.shown_at_ms {
            None => self.shown_at_ms = Some(now_ms),
            Some(shown) if now_ms - shown >= tuning.intro_cycle_ms => {
                self.line = (self.line + 1) % INTRO_LINES.len();
                self.shown_at_ms = Some(now_ms);
            }
            Some(_) => {}
        }

        let Some(since) = self.moving_since_ms else {
            return false;
        };
        let elapsed = now_ms - since;
        if elapsed > tuning.intro_fade_delay_ms {
            let progress = (elapsed - tuning.intro_fade_delay_ms) / tuning.intro_fade_duration_ms.max(1.0);
            self.opacity = (1.0 - progress).max(0.0) as f32;
            if self.opacity <= 0.0 {
                self.active = false;
                log::info!("Intro text dismissed");
                return true;
            }
        }
        false
    }

    /// Bring the message back for a new round, on the next line
    pub fn reactivate(&mut self) {
        self.active = true;
        self.opacity = 1.0;
        self.line = (self.line + 1) % INTRO_LINES.len();
        self.shown_at_ms = None;
        self.moving_since_ms = None;
    }
}
