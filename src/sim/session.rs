//! Round composition root
//!
//! Owns the zone tracker, the round lifecycle and the event bus, and runs
//! them in a fixed order each frame:
//!
//! 1. apply the frame's contact events to the tracker
//! 2. evaluate the tracker
//! 3. feed its signals to the lifecycle (same frame)
//! 4. publish the lifecycle's game signals on the bus
//!
//! Readouts taken after `step` therefore never lag the zone by a frame.

use super::events::{EventBus, GameSignal, SubscriptionId};
use super::round::{InputSwitch, RoundInput, RoundLifecycle};
use super::world::{ContactEvent, PickupWorld};
use super::zone::PickupZoneTracker;
use crate::error::SetupError;
use crate::hud::RoundReadout;
use crate::settings::RoundSettings;

pub struct RoundSession {
    tracker: PickupZoneTracker,
    lifecycle: RoundLifecycle,
    bus: EventBus<GameSignal>,
}

impl RoundSession {
    /// Wire the tracker and lifecycle against `world`. Call `start` after
    /// subscribing listeners.
    pub fn new(
        world: &impl PickupWorld,
        settings: &RoundSettings,
        inputs: Vec<Box<dyn InputSwitch>>,
    ) -> Result<Self, SetupError> {
        let tracker = PickupZoneTracker::new(world, settings)?;
        let lifecycle = RoundLifecycle::new(settings, inputs);
        Ok(Self {
            tracker,
            lifecycle,
            bus: EventBus::new(),
        })
    }

    /// Begin the pre-round countdown
    pub fn start(&mut self) {
        for signal in self.lifecycle.start() {
            self.bus.publish(signal);
        }
    }

    /// Advance one frame
    pub fn step(
        &mut self,
        world: &impl PickupWorld,
        contacts: &[ContactEvent],
        input: &RoundInput,
        dt: f32,
    ) {
        for contact in contacts {
            match *contact {
                ContactEvent::Entered { pickup, surface } => {
                    self.tracker.on_surface_entered_zone(pickup, surface)
                }
                ContactEvent::Exited { pickup, surface } => {
                    self.tracker.on_surface_exited_zone(pickup, surface)
                }
            }
        }

        // The hold timer is one-shot; it must not run before the round exists
        let zone_signals = if self.lifecycle.is_started() {
            self.tracker.evaluate(dt, world)
        } else {
            Vec::new()
        };
        for signal in self.lifecycle.tick(dt, &zone_signals, input) {
            self.bus.publish(signal);
        }
    }

    // === Event bus ===

    pub fn subscribe(&mut self) -> SubscriptionId {
        self.bus.subscribe()
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    pub fn drain(&mut self, id: SubscriptionId) -> Vec<GameSignal> {
        self.bus.drain(id)
    }

    // === Queries ===

    pub fn tracker(&self) -> &PickupZoneTracker {
        &self.tracker
    }

    /// Mutable tracker access for setup such as ignore lists
    pub fn tracker_mut(&mut self) -> &mut PickupZoneTracker {
        &mut self.tracker
    }

    pub fn lifecycle(&self) -> &RoundLifecycle {
        &self.lifecycle
    }

    pub fn readout(&self) -> RoundReadout {
        RoundReadout::capture(&self.tracker, &self.lifecycle)
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::sim::round::{InputFlag, RoundState};
    use crate::sim::world::{BodyMotion, PickupId, SurfaceId, ZoneVolume};

    const DT: f32 = 1.0 / 60.0;

    /// One pickup whose body motion the test controls
    struct OnePickup {
        zone: Option<ZoneVolume>,
        moving: bool,
    }

    impl PickupWorld for OnePickup {
        fn collection_zone(&self) -> Option<ZoneVolume> {
            self.zone
        }

        fn pickups(&self) -> Vec<PickupId> {
            vec![PickupId(1)]
        }

        fn body_motion(&self, _: PickupId) -> Option<BodyMotion> {
            Some(if self.moving {
                BodyMotion::new(Vec3::new(0.5, 0.0, 0.0), Vec3::ZERO)
            } else {
                BodyMotion::REST
            })
        }
    }

    fn world() -> OnePickup {
        OnePickup {
            zone: Some(ZoneVolume {
                center: Vec3::ZERO,
                half_extents: Vec3::ONE,
            }),
            moving: false,
        }
    }

    fn enter(surface: u32) -> ContactEvent {
        ContactEvent::Entered {
            pickup: PickupId(1),
            surface: SurfaceId(surface),
        }
    }

    fn exit(surface: u32) -> ContactEvent {
        ContactEvent::Exited {
            pickup: PickupId(1),
            surface: SurfaceId(surface),
        }
    }

    fn idle(session: &mut RoundSession, world: &OnePickup, seconds: f32) {
        let ticks = (seconds / DT).round() as usize;
        for _ in 0..ticks {
            session.step(world, &[], &RoundInput::default(), DT);
        }
    }

    #[test]
    fn test_missing_zone_is_setup_error() {
        let world = OnePickup {
            zone: None,
            moving: false,
        };
        let result = RoundSession::new(&world, &RoundSettings::default(), Vec::new());
        assert!(matches!(result, Err(SetupError::MissingZone)));
    }

    #[test]
    fn test_invalid_settings_is_setup_error() {
        let settings = RoundSettings {
            completion_hold_seconds: f32::NAN,
            ..Default::default()
        };
        let result = RoundSession::new(&world(), &settings, Vec::new());
        assert!(matches!(result, Err(SetupError::InvalidSettings(_))));
    }

    #[test]
    fn test_full_round_single_pickup() {
        let world = world();
        let flag = InputFlag::new(false);
        let mut session =
            RoundSession::new(&world, &RoundSettings::default(), vec![Box::new(flag.clone())])
                .unwrap();
        let listener = session.subscribe();
        session.start();
        assert_eq!(session.drain(listener), vec![GameSignal::PreRoundStarted]);

        idle(&mut session, &world, 5.0);
        assert_eq!(session.lifecycle().state(), RoundState::InProgress);
        assert!(flag.is_enabled());
        assert_eq!(session.drain(listener), vec![GameSignal::RoundStarted]);

        session.step(&world, &[enter(1)], &RoundInput::default(), DT);
        assert_eq!(session.lifecycle().state(), RoundState::WaitingForComplete);
        assert!(session.tracker().is_completion_timer_running());

        idle(&mut session, &world, 2.9);
        assert_eq!(session.lifecycle().state(), RoundState::WaitingForComplete);

        idle(&mut session, &world, 10.0);
        assert_eq!(session.lifecycle().state(), RoundState::Won);
        assert_eq!(session.drain(listener), vec![GameSignal::RoundWon]);
    }

    #[test]
    fn test_motion_mid_hold_requires_full_hold_again() {
        let mut world = world();
        let mut session = RoundSession::new(&world, &RoundSettings::default(), Vec::new()).unwrap();
        session.start();
        idle(&mut session, &world, 5.0);

        session.step(&world, &[enter(1)], &RoundInput::default(), DT);
        idle(&mut session, &world, 2.0);

        world.moving = true;
        idle(&mut session, &world, 1.0);
        assert_eq!(session.lifecycle().state(), RoundState::InProgress);
        assert_eq!(session.tracker().completion_timer_elapsed(), 0.0);

        world.moving = false;
        idle(&mut session, &world, 2.5);
        assert_eq!(session.lifecycle().state(), RoundState::WaitingForComplete);

        idle(&mut session, &world, 0.6);
        assert_eq!(session.lifecycle().state(), RoundState::Won);
    }

    #[test]
    fn test_two_surfaces_straddling_zone() {
        let world = world();
        let mut session = RoundSession::new(&world, &RoundSettings::default(), Vec::new()).unwrap();
        session.start();
        idle(&mut session, &world, 5.0);

        let input = RoundInput::default();
        session.step(&world, &[enter(1), enter(2)], &input, DT);
        session.step(&world, &[exit(1)], &input, DT);
        assert_eq!(session.tracker().current_pickup_count(), 1);
        assert_eq!(session.lifecycle().state(), RoundState::WaitingForComplete);

        session.step(&world, &[exit(2)], &input, DT);
        assert_eq!(session.tracker().current_pickup_count(), 0);
        assert_eq!(session.lifecycle().state(), RoundState::InProgress);
    }

    #[test]
    fn test_readout_matches_same_frame() {
        let world = world();
        let mut session = RoundSession::new(&world, &RoundSettings::default(), Vec::new()).unwrap();
        session.start();
        idle(&mut session, &world, 5.0);

        session.step(&world, &[enter(1)], &RoundInput::default(), DT);
        let readout = session.readout();
        assert_eq!(readout.state, RoundState::WaitingForComplete);
        assert_eq!(readout.present_pickups, 1);
        assert!(readout.completion_timer_running);
    }

    #[test]
    fn test_steps_before_start_do_not_consume_win() {
        let world = world();
        let mut session = RoundSession::new(&world, &RoundSettings::default(), Vec::new()).unwrap();

        session.step(&world, &[enter(1)], &RoundInput::default(), DT);
        idle(&mut session, &world, 4.0);
        assert!(!session.tracker().has_fired());
        assert!(!session.tracker().is_completion_timer_running());
        assert_eq!(session.tracker().current_pickup_count(), 1);

        // The hold completes during the pre-round and lands when it ends
        let listener = session.subscribe();
        session.start();
        idle(&mut session, &world, 4.9);
        assert_eq!(session.lifecycle().state(), RoundState::PreRound);
        assert!(session.tracker().has_fired());

        idle(&mut session, &world, 0.2);
        assert_eq!(session.lifecycle().state(), RoundState::Won);
        assert_eq!(
            session.drain(listener),
            vec![
                GameSignal::PreRoundStarted,
                GameSignal::RoundStarted,
                GameSignal::RoundWon
            ]
        );
    }

    #[test]
    fn test_unsubscribed_listener_gets_nothing() {
        let world = world();
        let mut session = RoundSession::new(&world, &RoundSettings::default(), Vec::new()).unwrap();
        let listener = session.subscribe();
        assert!(session.unsubscribe(listener));
        session.start();
        assert!(session.drain(listener).is_empty());
    }
}
