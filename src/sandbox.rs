//! Headless warehouse
//!
//! A tiny stand-in for the physics engine: crates with two contact surfaces
//! each are scattered around the collection zone, a scripted carrier drives
//! them in one at a time, and released crates skid and spin until they come
//! to rest. Every step diffs surface containment against the zone and reports
//! enter/exit events, the way a trigger volume would.

use std::collections::BTreeSet;

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::sim::{BodyMotion, ContactEvent, InputFlag, PickupId, PickupWorld, SurfaceId, ZoneVolume};

/// Zone half extents (metres)
pub const ZONE_HALF_EXTENTS: Vec3 = Vec3::new(3.0, 1.0, 3.0);
/// Scatter ring around the zone
const SCATTER_MIN_RADIUS: f32 = 8.0;
const SCATTER_MAX_RADIUS: f32 = 14.0;
/// Carrier travel speed (m/s)
const CARRY_SPEED: f32 = 4.0;
/// Skid speed given to a crate when it is dropped
const DROP_SKID: f32 = 1.0;
/// Max spin given to a crate when it is dropped (rad/s)
const DROP_SPIN: f32 = 2.0;
/// Exponential damping rate (1/s)
const DAMPING: f32 = 6.0;
/// Below this speed a body goes to sleep
const SLEEP_SPEED: f32 = 0.05;
/// Surfaces sit this far either side of the crate centre along X
const SURFACE_OFFSET: f32 = 0.4;
/// Drop spots stay this far inside the zone edge
const DROP_SPREAD: f32 = 1.5;

#[derive(Debug, Clone)]
struct Crate {
    id: PickupId,
    position: Vec3,
    motion: BodyMotion,
    surfaces: [(SurfaceId, Vec3); 2],
}

impl Crate {
    fn surface_points(&self) -> impl Iterator<Item = (SurfaceId, Vec3)> + '_ {
        self.surfaces
            .iter()
            .map(move |&(surface, offset)| (surface, self.position + offset))
    }
}

#[derive(Debug, Clone, Copy)]
struct Carry {
    pickup: PickupId,
    target: Vec3,
}

/// Deterministic world for demos and tests
#[derive(Debug)]
pub struct Sandbox {
    zone: ZoneVolume,
    crates: Vec<Crate>,
    overlapping: BTreeSet<(PickupId, SurfaceId)>,
    carrier: InputFlag,
    carry: Option<Carry>,
    rng: Pcg32,
}

impl Sandbox {
    /// Scatter `count` crates outside a zone at the origin
    pub fn scatter(seed: u64, count: u32) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let crates = (0..count)
            .map(|i| {
                let angle = rng.random_range(0.0..std::f32::consts::TAU);
                let radius = rng.random_range(SCATTER_MIN_RADIUS..SCATTER_MAX_RADIUS);
                Crate {
                    id: PickupId(i + 1),
                    position: Vec3::new(radius * angle.cos(), 0.0, radius * angle.sin()),
                    motion: BodyMotion::REST,
                    surfaces: [
                        (SurfaceId(i * 2 + 1), Vec3::new(-SURFACE_OFFSET, 0.0, 0.0)),
                        (SurfaceId(i * 2 + 2), Vec3::new(SURFACE_OFFSET, 0.0, 0.0)),
                    ],
                }
            })
            .collect();

        Self {
            zone: ZoneVolume {
                center: Vec3::ZERO,
                half_extents: ZONE_HALF_EXTENTS,
            },
            crates,
            overlapping: BTreeSet::new(),
            carrier: InputFlag::new(false),
            carry: None,
            rng,
        }
    }

    /// The carrier's drive control; it only moves while enabled
    pub fn carrier(&self) -> InputFlag {
        self.carrier.clone()
    }

    /// Crates whose every surface is inside the zone
    pub fn delivered_count(&self) -> usize {
        self.crates
            .iter()
            .filter(|c| c.surface_points().all(|(_, p)| self.zone.contains(p)))
            .count()
    }

    /// Move everything by `dt` and report surface overlap changes
    pub fn step(&mut self, dt: f32) -> Vec<ContactEvent> {
        if self.carrier.is_enabled() {
            self.drive_carrier(dt);
        }

        let carried = self.carry.map(|c| c.pickup);
        let keep = (1.0 - DAMPING * dt).max(0.0);
        for c in self.crates.iter_mut().filter(|c| Some(c.id) != carried) {
            c.position += c.motion.linear * dt;
            c.motion.linear *= keep;
            c.motion.angular *= keep;
            if c.motion.linear.length() < SLEEP_SPEED && c.motion.angular.length() < SLEEP_SPEED {
                c.motion = BodyMotion::REST;
            }
        }

        self.diff_contacts()
    }

    fn drive_carrier(&mut self, dt: f32) {
        if self.carry.is_none() {
            self.carry = self.next_carry();
        }
        let Some(carry) = self.carry else {
            return;
        };
        let Some(index) = self.crates.iter().position(|c| c.id == carry.pickup) else {
            self.carry = None;
            return;
        };

        let to_target = carry.target - self.crates[index].position;
        let step = CARRY_SPEED * dt;
        let heading = to_target.normalize_or_zero();

        if to_target.length() <= step {
            let spin = self.rng.random_range(-DROP_SPIN..DROP_SPIN);
            let c = &mut self.crates[index];
            c.position = carry.target;
            c.motion = BodyMotion::new(heading * DROP_SKID, Vec3::new(0.0, spin, 0.0));
            self.carry = None;
            log::debug!("Carrier dropped {}", c.id);
        } else {
            let c = &mut self.crates[index];
            c.motion = BodyMotion::new(heading * CARRY_SPEED, Vec3::ZERO);
            c.position += heading * step;
        }
    }

    fn next_carry(&mut self) -> Option<Carry> {
        let zone = self.zone;
        let pickup = self
            .crates
            .iter()
            .find(|c| !c.surface_points().all(|(_, p)| zone.contains(p)))?
            .id;
        let target = zone.center
            + Vec3::new(
                self.rng.random_range(-DROP_SPREAD..DROP_SPREAD),
                0.0,
                self.rng.random_range(-DROP_SPREAD..DROP_SPREAD),
            );
        log::debug!("Carrier picked up {}", pickup);
        Some(Carry { pickup, target })
    }

    fn diff_contacts(&mut self) -> Vec<ContactEvent> {
        let zone = self.zone;
        let inside: BTreeSet<(PickupId, SurfaceId)> = self
            .crates
            .iter()
            .flat_map(|c| {
                c.surface_points()
                    .filter(move |&(_, p)| zone.contains(p))
                    .map(move |(surface, _)| (c.id, surface))
            })
            .collect();

        let mut events: Vec<ContactEvent> = self
            .overlapping
            .difference(&inside)
            .map(|&(pickup, surface)| ContactEvent::Exited { pickup, surface })
            .collect();
        events.extend(
            inside
                .difference(&self.overlapping)
                .map(|&(pickup, surface)| ContactEvent::Entered { pickup, surface }),
        );

        self.overlapping = inside;
        events
    }
}

impl PickupWorld for Sandbox {
    fn collection_zone(&self) -> Option<ZoneVolume> {
        Some(self.zone)
    }

    fn pickups(&self) -> Vec<PickupId> {
        self.crates.iter().map(|c| c.id).collect()
    }

    fn body_motion(&self, pickup: PickupId) -> Option<BodyMotion> {
        self.crates
            .iter()
            .find(|c| c.id == pickup)
            .map(|c| c.motion)
    }
}
