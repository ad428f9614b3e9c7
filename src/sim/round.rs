//! Round lifecycle
//!
//! PreRound (countdown, player input off) → InProgress (input on, clock
//! running) ⇄ WaitingForComplete (zone hold timer running) → Won.
//!
//! State changes are computed by the pure [`transition`] function; the
//! lifecycle applies entry actions and keeps the clocks.

use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::events::{GameSignal, ZoneSignal};
use super::timer::Countdown;
use crate::settings::RoundSettings;

/// Current phase of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundState {
    /// Countdown before the player may drive
    PreRound,
    /// Player is collecting pickups
    InProgress,
    /// Every pickup is in and at rest; zone hold timer running
    WaitingForComplete,
    /// Round finished (terminal)
    Won,
}

/// What can move the round forward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundTrigger {
    CountdownExpired,
    Zone(ZoneSignal),
}

/// Result of a state change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: RoundState,
    pub signals: Vec<GameSignal>,
}

/// Next state for a trigger, or `None` if the trigger does not apply
pub fn transition(state: RoundState, trigger: RoundTrigger) -> Option<Transition> {
    use RoundState::*;
    use RoundTrigger::*;

    let (next, signals) = match (state, trigger) {
        (PreRound, CountdownExpired) => (InProgress, vec![GameSignal::RoundStarted]),
        (InProgress, Zone(ZoneSignal::BeginCompletionTimer)) => (WaitingForComplete, vec![]),
        (WaitingForComplete, Zone(ZoneSignal::CancelCompletionTimer)) => (InProgress, vec![]),
        (InProgress | WaitingForComplete, Zone(ZoneSignal::ZoneObjectiveWon)) => {
            (Won, vec![GameSignal::RoundWon])
        }
        _ => return None,
    };
    Some(Transition { next, signals })
}

/// A player-input component the round switches on and off
pub trait InputSwitch {
    fn set_enabled(&mut self, enabled: bool);
}

/// Shared on/off flag for controls owned elsewhere
#[derive(Debug, Clone, Default)]
pub struct InputFlag(Rc<Cell<bool>>);

impl InputFlag {
    pub fn new(enabled: bool) -> Self {
        Self(Rc::new(Cell::new(enabled)))
    }

    pub fn is_enabled(&self) -> bool {
        self.0.get()
    }
}

impl InputSwitch for InputFlag {
    fn set_enabled(&mut self, enabled: bool) {
        self.0.set(enabled);
    }
}

/// Per-frame player commands
#[derive(Debug, Clone, Default)]
pub struct RoundInput {
    /// Cancel key held: ask the game flow to return to the menu
    pub quit_to_menu: bool,
}

/// Drives the round state machine and clocks
pub struct RoundLifecycle {
    state: RoundState,
    started: bool,
    pre_round_seconds: f32,
    pre_round: Countdown,
    round_time: f32,
    round_minutes: u32,
    round_seconds: u32,
    inputs: Vec<Box<dyn InputSwitch>>,
    /// Zone signals seen during PreRound, applied once the round starts
    completion_pending: bool,
    won_pending: bool,
}

impl RoundLifecycle {
    pub fn new(settings: &RoundSettings, inputs: Vec<Box<dyn InputSwitch>>) -> Self {
        Self {
            state: RoundState::PreRound,
            started: false,
            pre_round_seconds: settings.pre_round_seconds,
            pre_round: Countdown::new(settings.pre_round_seconds),
            round_time: 0.0,
            round_minutes: 0,
            round_seconds: 0,
            inputs,
            completion_pending: false,
            won_pending: false,
        }
    }

    /// Enter PreRound: disable inputs and reset the countdown
    pub fn start(&mut self) -> Vec<GameSignal> {
        self.started = true;
        self.state = RoundState::PreRound;
        self.pre_round = Countdown::new(self.pre_round_seconds);
        self.round_time = 0.0;
        self.round_minutes = 0;
        self.round_seconds = 0;
        self.completion_pending = false;
        self.won_pending = false;
        self.set_inputs_enabled(false);
        log::info!("Pre-round started ({:.1}s)", self.pre_round_seconds);
        vec![GameSignal::PreRoundStarted]
    }

    /// Advance one frame. Zone signals are applied in order before clocks.
    pub fn tick(&mut self, dt: f32, zone: &[ZoneSignal], input: &RoundInput) -> Vec<GameSignal> {
        let mut out = Vec::new();

        if input.quit_to_menu {
            log::info!("Quit to menu requested");
            out.push(GameSignal::QuitToMenu);
        }

        if !self.started || self.state == RoundState::Won {
            return out;
        }

        for &signal in zone {
            if self.state == RoundState::PreRound {
                self.latch(signal);
            } else {
                self.apply(RoundTrigger::Zone(signal), &mut out);
            }
        }

        match self.state {
            RoundState::PreRound => {
                if self.pre_round.tick(dt) {
                    self.apply(RoundTrigger::CountdownExpired, &mut out);
                    self.flush_pending(&mut out);
                }
            }
            RoundState::InProgress | RoundState::WaitingForComplete => {
                self.round_time += dt;
                self.round_minutes = (self.round_time / 60.0).floor() as u32;
                self.round_seconds = (self.round_time % 60.0).floor() as u32;
            }
            RoundState::Won => {}
        }

        out
    }

    fn latch(&mut self, signal: ZoneSignal) {
        match signal {
            ZoneSignal::BeginCompletionTimer => self.completion_pending = true,
            ZoneSignal::CancelCompletionTimer => self.completion_pending = false,
            ZoneSignal::ZoneObjectiveWon => self.won_pending = true,
        }
    }

    fn flush_pending(&mut self, out: &mut Vec<GameSignal>) {
        if self.completion_pending {
            self.apply(RoundTrigger::Zone(ZoneSignal::BeginCompletionTimer), out);
        }
        if self.won_pending {
            self.apply(RoundTrigger::Zone(ZoneSignal::ZoneObjectiveWon), out);
        }
        self.completion_pending = false;
        self.won_pending = false;
    }

    fn apply(&mut self, trigger: RoundTrigger, out: &mut Vec<GameSignal>) {
        let Some(t) = transition(self.state, trigger) else {
            return;
        };
        let from = self.state;
        self.state = t.next;

        match (from, t.next) {
            (RoundState::PreRound, RoundState::InProgress) => {
                self.round_time = 0.0;
                self.round_minutes = 0;
                self.round_seconds = 0;
                self.set_inputs_enabled(true);
                log::info!("Round started");
            }
            (_, RoundState::WaitingForComplete) => log::debug!("Waiting for completion hold"),
            (RoundState::WaitingForComplete, RoundState::InProgress) => {
                log::debug!("Completion hold cancelled, round continues")
            }
            (_, RoundState::Won) => log::info!(
                "Round won in {:02}:{:02}",
                self.round_minutes,
                self.round_seconds
            ),
            _ => {}
        }

        out.extend(t.signals);
    }

    fn set_inputs_enabled(&mut self, enabled: bool) {
        for input in &mut self.inputs {
            input.set_enabled(enabled);
        }
    }

    // === Queries ===

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_won(&self) -> bool {
        self.state == RoundState::Won
    }

    /// Whole seconds left in the pre-round countdown
    pub fn pre_round_seconds(&self) -> u32 {
        self.pre_round.whole_seconds()
    }

    pub fn round_time(&self) -> f32 {
        self.round_time
    }

    pub fn round_minutes(&self) -> u32 {
        self.round_minutes
    }

    pub fn round_seconds(&self) -> u32 {
        self.round_seconds
    }
}
