//! Small timing helpers shared by the zone tracker and round lifecycle

use serde::{Deserialize, Serialize};

use crate::consts::TIMER_EPSILON;

/// Transition of a boolean between two evaluations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Rising,
    Falling,
}

/// Reports only changes of a level signal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeDetector {
    level: bool,
}

impl EdgeDetector {
    /// Feed the latest level; returns the edge if it changed
    pub fn update(&mut self, level: bool) -> Option<Edge> {
        let edge = match (self.level, level) {
            (false, true) => Some(Edge::Rising),
            (true, false) => Some(Edge::Falling),
            _ => None,
        };
        self.level = level;
        edge
    }
}

/// Counts up to a threshold and clamps there
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoldTimer {
    elapsed: f32,
    threshold: f32,
}

impl HoldTimer {
    pub fn new(threshold: f32) -> Self {
        Self {
            elapsed: 0.0,
            threshold: threshold.max(0.0),
        }
    }

    /// Advance by `dt`; returns true once the threshold is reached
    pub fn advance(&mut self, dt: f32) -> bool {
        self.elapsed = (self.elapsed + dt).min(self.threshold);
        if self.threshold - self.elapsed <= TIMER_EPSILON {
            self.elapsed = self.threshold;
        }
        self.is_complete()
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.threshold
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

/// Counts down from a duration to zero
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    remaining: f32,
}

impl Countdown {
    pub fn new(duration: f32) -> Self {
        Self {
            remaining: duration.max(0.0),
        }
    }

    /// Tick down by `dt`; returns true when expired
    pub fn tick(&mut self, dt: f32) -> bool {
        self.remaining -= dt;
        if self.remaining <= TIMER_EPSILON {
            self.remaining = 0.0;
        }
        self.is_expired()
    }

    pub fn is_expired(&self) -> bool {
        self.remaining <= 0.0
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Whole seconds left, floored for display
    pub fn whole_seconds(&self) -> u32 {
        self.remaining.max(0.0).floor() as u32
    }
}
