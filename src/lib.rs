//! Forklift Round - pickup collection objective and round flow
//!
//! Core modules:
//! - `sim`: Deterministic round simulation (zone tracking, round lifecycle, events)
//! - `settings`: Round tunables loaded from JSON
//! - `hud`: Read-only round readout for presentation layers
//! - `sandbox`: Headless warehouse world for demos and tests

pub mod error;
pub mod hud;
pub mod sandbox;
pub mod settings;
pub mod sim;

pub use error::{SettingsError, SetupError};
pub use hud::{ReadoutTone, RoundReadout};
pub use sandbox::Sandbox;
pub use settings::RoundSettings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Pre-round countdown before the player may drive
    pub const PRE_ROUND_SECONDS: f32 = 5.0;
    /// Pickups must stay in and at rest this long to win
    pub const COMPLETION_HOLD_SECONDS: f32 = 3.0;

    /// Timers treat anything closer than this to their target as reached
    /// (absorbs f32 accumulation drift over long runs of small steps)
    pub const TIMER_EPSILON: f32 = 1e-3;
}
