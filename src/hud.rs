//! Round readout for presentation layers
//!
//! A plain snapshot of everything a HUD polls each frame. Taking one has no
//! side effects on the round.

use serde::Serialize;

use crate::sim::{PickupZoneTracker, RoundLifecycle, RoundState};

/// Colour tier for the round clock and pickup counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReadoutTone {
    Normal,
    Warning,
    Success,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundReadout {
    pub state: RoundState,
    pub pre_round_seconds: u32,
    pub round_minutes: u32,
    pub round_seconds: u32,
    pub present_pickups: usize,
    pub total_pickups: usize,
    pub completion_timer_running: bool,
    pub completion_timer_elapsed: f32,
}

impl RoundReadout {
    pub fn capture(tracker: &PickupZoneTracker, round: &RoundLifecycle) -> Self {
        Self {
            state: round.state(),
            pre_round_seconds: round.pre_round_seconds(),
            round_minutes: round.round_minutes(),
            round_seconds: round.round_seconds(),
            present_pickups: tracker.current_pickup_count(),
            total_pickups: tracker.total_pickup_count(),
            completion_timer_running: tracker.is_completion_timer_running(),
            completion_timer_elapsed: tracker.completion_timer_elapsed(),
        }
    }

    /// Big countdown digits are only shown before the round
    pub fn shows_pre_round(&self) -> bool {
        self.state == RoundState::PreRound
    }

    /// Clock and counter are hidden during the pre-round
    pub fn shows_round_clock(&self) -> bool {
        self.state != RoundState::PreRound
    }

    pub fn shows_win_banner(&self) -> bool {
        self.state == RoundState::Won
    }

    /// None while the clock is hidden
    pub fn tone(&self) -> Option<ReadoutTone> {
        match self.state {
            RoundState::PreRound => None,
            RoundState::InProgress => Some(ReadoutTone::Normal),
            RoundState::WaitingForComplete => Some(ReadoutTone::Warning),
            RoundState::Won => Some(ReadoutTone::Success),
        }
    }

    pub fn pre_round_text(&self) -> String {
        format!("{:02}", self.pre_round_seconds)
    }

    /// "MM:SS"
    pub fn clock_text(&self) -> String {
        format!("{:02}:{:02}", self.round_minutes, self.round_seconds)
    }

    pub fn pickups_text(&self) -> String {
        format!("{} / {}", self.present_pickups, self.total_pickups)
    }
}
