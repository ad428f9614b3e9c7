//! Error types
//!
//! Construction failures are errors; physics-layer noise (exits for pickups
//! that were never tracked) is logged and absorbed by the tracker instead.

use thiserror::Error;

/// Why a round could not be assembled
#[derive(Debug, Error)]
pub enum SetupError {
    /// The world exposes no collection zone volume
    #[error("no pickup collection zone found in world")]
    MissingZone,

    /// Zone extents are zero, negative or not finite
    #[error("collection zone has degenerate extents {half_extents:?}")]
    DegenerateZone { half_extents: [f32; 3] },

    #[error("invalid round settings: {0}")]
    InvalidSettings(#[from] SettingsError),
}

/// Settings file / JSON problems
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("setting `{field}` out of range: {value}")]
    OutOfRange { field: &'static str, value: f32 },
}
