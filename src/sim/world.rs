//! World-facing types
//!
//! Identities, the collection zone volume, body motion, and the contract the
//! physics layer must satisfy. Containment testing itself happens on the
//! physics side; the core only sees its enter/exit results.

use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::SetupError;

/// Stable handle to one pickup object
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PickupId(pub u32);

/// Handle to one collision surface belonging to a pickup
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SurfaceId(pub u32);

impl fmt::Display for PickupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pickup#{}", self.0)
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface#{}", self.0)
    }
}

/// Axis-aligned trigger volume pickups must be delivered into
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneVolume {
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl ZoneVolume {
    /// Build a zone, rejecting empty or non-finite extents
    pub fn new(center: Vec3, half_extents: Vec3) -> Result<Self, SetupError> {
        let zone = Self {
            center,
            half_extents,
        };
        zone.validate()?;
        Ok(zone)
    }

    pub fn validate(&self) -> Result<(), SetupError> {
        let e = self.half_extents;
        if !e.is_finite() || !self.center.is_finite() || e.min_element() <= 0.0 {
            return Err(SetupError::DegenerateZone {
                half_extents: e.to_array(),
            });
        }
        Ok(())
    }

    /// Point containment (boundary counts as inside)
    pub fn contains(&self, point: Vec3) -> bool {
        let d = (point - self.center).abs();
        d.cmple(self.half_extents).all()
    }
}

/// Motion snapshot of a pickup's rigid body
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BodyMotion {
    pub linear: Vec3,
    pub angular: Vec3,
}

impl BodyMotion {
    pub const REST: Self = Self {
        linear: Vec3::ZERO,
        angular: Vec3::ZERO,
    };

    pub fn new(linear: Vec3, angular: Vec3) -> Self {
        Self { linear, angular }
    }

    /// True if both speeds are within `epsilon`
    pub fn is_at_rest(&self, epsilon: f32) -> bool {
        self.linear.length() <= epsilon && self.angular.length() <= epsilon
    }
}

/// Overlap transition reported by the physics layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactEvent {
    Entered { pickup: PickupId, surface: SurfaceId },
    Exited { pickup: PickupId, surface: SurfaceId },
}

/// What the core needs from the physics/world collaborator
pub trait PickupWorld {
    /// The collection zone, if the world has one
    fn collection_zone(&self) -> Option<ZoneVolume>;

    /// Every pickup currently in the world (read once at round start)
    fn pickups(&self) -> Vec<PickupId>;

    /// Body motion for a pickup, or `None` if it has no rigid body
    fn body_motion(&self, pickup: PickupId) -> Option<BodyMotion>;
}
