//! Change bus: topic-based publish/subscribe for the presentation layer.
//!
//! RULES:
//!   - Handlers run synchronously, in subscription order.
//!   - Handlers see `&GameEvent` only. They cannot reach the state, so a
//!     subscriber that wants to react with a change must queue a
//!     `PlayerCommand` for the next engine call instead of re-entering.
//!   - An unsubscribed handler is dropped and never called again.

use crate::event::{GameEvent, Topic};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Box<dyn FnMut(&GameEvent) + Send>;

#[derive(Default)]
pub struct ChangeBus {
    next_id:     u64,
    subscribers: Vec<(SubscriptionId, Topic, Handler)>,
}

impl ChangeBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(
        &mut self,
        topic: Topic,
        handler: impl FnMut(&GameEvent) + Send + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, topic, Box::new(handler)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _, _)| *sub != id);
        self.subscribers.len() != before
    }

    pub fn publish(&mut self, event: &GameEvent) {
        let topic = event.topic();
        for (_, _, handler) in self.subscribers.iter_mut().filter(|(_, t, _)| *t == topic) {
            handler(event);
        }
    }
}
