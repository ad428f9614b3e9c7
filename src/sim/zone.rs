//! Pickup collection zone tracking
//!
//! Keeps one record per pickup touching the zone, keyed by pickup and holding
//! the set of that pickup's surfaces currently overlapping. A pickup counts as
//! present while at least one of its surfaces is inside.
//!
//! Each tick `evaluate` derives completion readiness (all pickups present and
//! all at rest) and turns its changes into edge signals. The hold timer fires
//! `ZoneObjectiveWon` once; after that the tracker stops signaling.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Serialize;

use super::events::ZoneSignal;
use super::timer::{Edge, EdgeDetector, HoldTimer};
use super::world::{PickupId, PickupWorld, SurfaceId};
use crate::error::SetupError;
use crate::settings::RoundSettings;

/// One pickup currently touching the zone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickupRecord {
    contacts: BTreeSet<SurfaceId>,
}

impl PickupRecord {
    fn new(surface: SurfaceId) -> Self {
        Self {
            contacts: BTreeSet::from([surface]),
        }
    }

    pub fn contacts(&self) -> impl Iterator<Item = SurfaceId> + '_ {
        self.contacts.iter().copied()
    }

    pub fn contact_count(&self) -> usize {
        self.contacts.len()
    }
}

/// Aggregate zone state from the last evaluation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ZoneStatus {
    pub total: usize,
    pub present: usize,
    pub all_present: bool,
    /// Only evaluated when `all_present`; false otherwise
    pub all_settled: bool,
    pub completion_ready: bool,
}

/// Tracks pickups inside the collection zone and the completion hold timer
#[derive(Debug)]
pub struct PickupZoneTracker {
    total_pickups: usize,
    records: BTreeMap<PickupId, PickupRecord>,
    ignored: HashSet<SurfaceId>,
    rest_epsilon: f32,
    ready: EdgeDetector,
    timer: HoldTimer,
    timer_running: bool,
    fired: bool,
    status: ZoneStatus,
}

impl PickupZoneTracker {
    /// Attach to the world's collection zone and count its pickups
    pub fn new(world: &impl PickupWorld, settings: &RoundSettings) -> Result<Self, SetupError> {
        let zone = world.collection_zone().ok_or(SetupError::MissingZone)?;
        zone.validate()?;
        settings.validate()?;

        let total_pickups = world.pickups().len();
        log::info!("Collection zone tracking {} pickups", total_pickups);

        Ok(Self {
            total_pickups,
            records: BTreeMap::new(),
            ignored: HashSet::new(),
            rest_epsilon: settings.rest_speed_epsilon,
            ready: EdgeDetector::default(),
            timer: HoldTimer::new(settings.completion_hold_seconds),
            timer_running: false,
            fired: false,
            status: ZoneStatus {
                total: total_pickups,
                ..Default::default()
            },
        })
    }

    /// Never attribute these surfaces to a pickup (e.g. the vehicle's own
    /// colliders passing through the zone)
    pub fn ignore_surfaces(&mut self, surfaces: impl IntoIterator<Item = SurfaceId>) {
        self.ignored.extend(surfaces);
    }

    // === Contact tracking ===

    pub fn on_surface_entered_zone(&mut self, pickup: PickupId, surface: SurfaceId) {
        if self.ignored.contains(&surface) {
            return;
        }
        match self.records.get_mut(&pickup) {
            Some(record) => {
                record.contacts.insert(surface);
            }
            None => {
                self.records.insert(pickup, PickupRecord::new(surface));
                log::info!("{} entered zone", pickup);
            }
        }
    }

    pub fn on_surface_exited_zone(&mut self, pickup: PickupId, surface: SurfaceId) {
        if self.ignored.contains(&surface) {
            return;
        }
        let Some(record) = self.records.get_mut(&pickup) else {
            log::warn!("Untracked {} ({}) exited zone", pickup, surface);
            return;
        };
        record.contacts.remove(&surface);
        if record.contacts.is_empty() {
            self.records.remove(&pickup);
            log::info!("{} exited zone", pickup);
        }
    }

    // === Per-tick evaluation ===

    /// Recompute readiness and advance the hold timer.
    ///
    /// All contact events for the frame must be applied before this call.
    pub fn evaluate(&mut self, dt: f32, world: &impl PickupWorld) -> Vec<ZoneSignal> {
        let mut signals = Vec::new();

        let present = self.records.len();
        let all_present = present >= self.total_pickups;
        let all_settled = all_present && self.all_settled(world);
        let completion_ready = all_present && all_settled;

        self.status = ZoneStatus {
            total: self.total_pickups,
            present,
            all_present,
            all_settled,
            completion_ready,
        };

        if self.fired {
            return signals;
        }

        match self.ready.update(completion_ready) {
            Some(Edge::Rising) if !self.timer_running => {
                log::info!("Completion timer started");
                self.timer_running = true;
                self.timer.reset();
                signals.push(ZoneSignal::BeginCompletionTimer);
            }
            Some(Edge::Falling) if self.timer_running => {
                log::info!("Completion timer stopped at {:.2}s", self.timer.elapsed());
                self.timer_running = false;
                self.timer.reset();
                signals.push(ZoneSignal::CancelCompletionTimer);
            }
            _ => {}
        }

        if self.timer_running && self.timer.advance(dt) {
            self.fired = true;
            self.timer_running = false;
            log::info!("Zone objective won");
            signals.push(ZoneSignal::ZoneObjectiveWon);
        }

        signals
    }

    /// Pickups without a rigid body are treated as settled
    fn all_settled(&self, world: &impl PickupWorld) -> bool {
        self.records.keys().all(|&pickup| {
            world
                .body_motion(pickup)
                .is_none_or(|motion| motion.is_at_rest(self.rest_epsilon))
        })
    }

    // === Queries ===

    pub fn total_pickup_count(&self) -> usize {
        self.total_pickups
    }

    pub fn current_pickup_count(&self) -> usize {
        self.records.len()
    }

    pub fn is_completion_timer_running(&self) -> bool {
        self.timer_running
    }

    pub fn completion_timer_elapsed(&self) -> f32 {
        self.timer.elapsed()
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    /// Status computed by the last `evaluate`
    pub fn status(&self) -> ZoneStatus {
        self.status
    }

    pub fn record(&self, pickup: PickupId) -> Option<&PickupRecord> {
        self.records.get(&pickup)
    }
}
