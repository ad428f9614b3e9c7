//! Round signals and the event bus that carries them
//!
//! The bus is owned by whoever composes the round (see `session`). Listeners
//! register explicitly, get their own mailbox, and deregister when done:
//!
//!   publish(e) → copy into every live mailbox → drain(id) per listener

use serde::{Deserialize, Serialize};

/// Edge signals raised by the pickup zone tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoneSignal {
    /// Completion became ready; hold timer started from zero
    BeginCompletionTimer,
    /// Completion stopped being ready before the hold finished
    CancelCompletionTimer,
    /// Hold finished; raised once per round
    ZoneObjectiveWon,
}

/// Round-level notifications for the game-flow layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameSignal {
    PreRoundStarted,
    RoundStarted,
    RoundWon,
    QuitToMenu,
}

/// Handle returned by [`EventBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u32);

/// Fan-out queue with per-subscriber mailboxes
#[derive(Debug)]
pub struct EventBus<E> {
    next_id: u32,
    mailboxes: Vec<(SubscriptionId, Vec<E>)>,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self {
            next_id: 0,
            mailboxes: Vec::new(),
        }
    }
}

impl<E: Clone> EventBus<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. Only events published afterwards are delivered.
    pub fn subscribe(&mut self) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.mailboxes.push((id, Vec::new()));
        id
    }

    /// Drop a listener and anything still queued for it.
    /// Returns false if the id was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.mailboxes.len();
        self.mailboxes.retain(|(sub, _)| *sub != id);
        self.mailboxes.len() != before
    }

    /// Deliver an event to every registered listener
    pub fn publish(&mut self, event: E) {
        for (_, mailbox) in &mut self.mailboxes {
            mailbox.push(event.clone());
        }
    }

    /// Take all events queued for a listener (oldest first)
    pub fn drain(&mut self, id: SubscriptionId) -> Vec<E> {
        self.mailbox_mut(id).map(std::mem::take).unwrap_or_default()
    }

    /// Number of events waiting for a listener
    pub fn pending(&self, id: SubscriptionId) -> usize {
        self.mailboxes
            .iter()
            .find(|(sub, _)| *sub == id)
            .map(|(_, mailbox)| mailbox.len())
            .unwrap_or(0)
    }

    pub fn subscriber_count(&self) -> usize {
        self.mailboxes.len()
    }

    fn mailbox_mut(&mut self, id: SubscriptionId) -> Option<&mut Vec<E>> {
        self.mailboxes
            .iter_mut()
            .find(|(sub, _)| *sub == id)
            .map(|(_, mailbox)| mailbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_without_listeners_is_dropped() {
        let mut bus = EventBus::new();
        bus.publish(GameSignal::RoundWon);
        let id = bus.subscribe();
        assert_eq!(bus.pending(id), 0);
    }

    #[test]
    fn test_every_listener_sees_every_event() {
        let mut bus = EventBus::new();
        let hud = bus.subscribe();
        let flow = bus.subscribe();

        bus.publish(GameSignal::RoundStarted);
        bus.publish(GameSignal::RoundWon);

        assert_eq!(
            bus.drain(hud),
            vec![GameSignal::RoundStarted, GameSignal::RoundWon]
        );
        assert_eq!(bus.pending(flow), 2);
        assert!(bus.drain(hud).is_empty());
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let mut bus = EventBus::new();
        let id = bus.subscribe();
        bus.publish(GameSignal::QuitToMenu);

        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        assert_eq!(bus.subscriber_count(), 0);

        bus.publish(GameSignal::RoundWon);
        assert!(bus.drain(id).is_empty());
    }

    #[test]
    fn test_ids_not_reused() {
        let mut bus: EventBus<GameSignal> = EventBus::new();
        let first = bus.subscribe();
        bus.unsubscribe(first);
        let second = bus.subscribe();
        assert_ne!(first, second);
    }
}
