//! Event bus between the simulation and whatever presents it.
//!
//! The simulation queues events while it works and delivers them to every
//! subscriber, in emission order, when an operation completes.

use std::cell::RefCell;
use std::rc::Rc;

use log::warn;
use rpg_shared::GameEvent;
use tokio::sync::mpsc::UnboundedSender;

/// Receives simulation events
pub trait EventSubscriber {
    fn on_event(&mut self, event: &GameEvent);
}

impl<F: FnMut(&GameEvent)> EventSubscriber for F {
    fn on_event(&mut self, event: &GameEvent) {
        self(event)
    }
}

pub type SubscriptionId = usize;

/// Queue of pending events plus the registered subscribers
#[derive(Default)]
pub struct EventBus {
    pending: Vec<GameEvent>,
    subscribers: Vec<(SubscriptionId, Box<dyn EventSubscriber>)>,
    next_id: SubscriptionId,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.pending.push(event);
    }

    pub fn subscribe(&mut self, subscriber: impl EventSubscriber + 'static) -> SubscriptionId {
        let id = self.next_id;
        self.next_id += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() != before
    }

    /// Events queued since the last flush.
    pub fn pending(&self) -> &[GameEvent] {
        &self.pending
    }

    /// Deliver queued events to every subscriber. Returns how many were delivered.
    pub fn flush(&mut self) -> usize {
        let events = std::mem::take(&mut self.pending);
        for event in &events {
            for (_, subscriber) in self.subscribers.iter_mut() {
                subscriber.on_event(event);
            }
        }
        events.len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("pending", &self.pending.len())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

/// Forwards events into a tokio channel, for consumers on another task
pub struct ChannelSubscriber {
    tx: UnboundedSender<GameEvent>,
    closed: bool,
}

impl ChannelSubscriber {
    pub fn new(tx: UnboundedSender<GameEvent>) -> Self {
        Self { tx, closed: false }
    }
}

impl EventSubscriber for ChannelSubscriber {
    fn on_event(&mut self, event: &GameEvent) {
        if self.closed {
            return;
        }
        if self.tx.send(event.clone()).is_err() {
            warn!("Event receiver dropped, discarding further events");
            self.closed = true;
        }
    }
}

/// Shared in-memory record of every delivered event
#[derive(Debug, Clone, Default)]
pub struct EventLog(Rc<RefCell<Vec<GameEvent>>>);

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<GameEvent> {
        self.0.borrow().clone()
    }

    pub fn count(&self, predicate: impl Fn(&GameEvent) -> bool) -> usize {
        self.0.borrow().iter().filter(|event| predicate(event)).count()
    }
}

impl EventSubscriber for EventLog {
    fn on_event(&mut self, event: &GameEvent) {
        self.0.borrow_mut().push(event.clone());
    }
}
