//! Deterministic round simulation
//!
//! Objective tracking and round flow live here. This module must stay pure:
//! - Fixed timestep only
//! - No rendering, audio or platform dependencies
//! - Stable iteration order (records keyed by pickup ID)
//! - Physics is an external collaborator seen only through `PickupWorld`

pub mod events;
pub mod round;
pub mod session;
pub mod timer;
pub mod world;
pub mod zone;

pub use events::{EventBus, GameSignal, SubscriptionId, ZoneSignal};
pub use round::{
    InputFlag, InputSwitch, RoundInput, RoundLifecycle, RoundState, RoundTrigger, Transition,
    transition,
};
pub use session::RoundSession;
pub use timer::{Countdown, Edge, EdgeDetector, HoldTimer};
pub use world::{BodyMotion, ContactEvent, PickupId, PickupWorld, SurfaceId, ZoneVolume};
pub use zone::{PickupRecord, PickupZoneTracker, ZoneStatus};
