//! Window wide keyboard shortcuts.
//!
//! The window publishes every key press on a `ShortcutBus`. Components subscribe to the bus
//! and poll the shortcuts they were sent. Dropping a `ShortcutSubscription` removes it from
//! the bus, so nothing is ever delivered to a component that is gone.

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::{Rc, Weak};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Key {
    K,
    Escape,
    Enter,
    Other,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub control: bool,
}

impl KeyPress {
    pub fn new(key: Key, control: bool) -> Self {
        Self { key, control }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Shortcut {
    OpenSearch,
    CloseSearch,
}

impl Shortcut {
    pub fn for_key(press: KeyPress) -> Option<Self> {
        match press {
            KeyPress {
                key: Key::K,
                control: true,
            } => Some(Shortcut::OpenSearch),
            KeyPress {
                key: Key::Escape, ..
            } => Some(Shortcut::CloseSearch),
            _ => None,
        }
    }
}

#[derive(Default)]
struct Subscribers {
    next_id: u64,
    queues: BTreeMap<u64, VecDeque<Shortcut>>,
}

#[derive(Default)]
pub struct ShortcutBus {
    subscribers: Rc<RefCell<Subscribers>>,
}

impl ShortcutBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> ShortcutSubscription {
        let mut subscribers = self.subscribers.borrow_mut();
        let id = subscribers.next_id;
        subscribers.next_id += 1;
        subscribers.queues.insert(id, VecDeque::new());

        ShortcutSubscription {
            id,
            subscribers: Rc::downgrade(&self.subscribers),
        }
    }

    /// Delivers the shortcut bound to `press` to every subscriber.
    ///
    /// Returns `true` if the press was consumed, in which case the window must not handle it
    /// any further.
    pub fn publish(&self, press: KeyPress) -> bool {
        let shortcut = match Shortcut::for_key(press) {
            Some(shortcut) => shortcut,
            None => return false,
        };

        let mut subscribers = self.subscribers.borrow_mut();
        for queue in subscribers.queues.values_mut() {
            queue.push_back(shortcut);
        }
        !subscribers.queues.is_empty()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().queues.len()
    }
}

pub struct ShortcutSubscription {
    id: u64,
    subscribers: Weak<RefCell<Subscribers>>,
}

impl ShortcutSubscription {
    pub fn poll(&self) -> Option<Shortcut> {
        let subscribers = self.subscribers.upgrade()?;
        let mut queues = subscribers.borrow_mut();
        let shortcut = queues.queues.get_mut(&self.id)?.pop_front();
        shortcut
    }
}

impl Drop for ShortcutSubscription {
    fn drop(&mut self) {
        if let Some(subscribers) = self.subscribers.upgrade() {
            subscribers.borrow_mut().queues.remove(&self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binds_control_k_and_escape() {
        assert_eq!(
            Shortcut::for_key(KeyPress::new(Key::K, true)),
            Some(Shortcut::OpenSearch)
        );
        assert_eq!(Shortcut::for_key(KeyPress::new(Key::K, false)), None);
        assert_eq!(
            Shortcut::for_key(KeyPress::new(Key::Escape, false)),
            Some(Shortcut::CloseSearch)
        );
        assert_eq!(
            Shortcut::for_key(KeyPress::new(Key::Escape, true)),
            Some(Shortcut::CloseSearch)
        );
        assert_eq!(Shortcut::for_key(KeyPress::new(Key::Enter, false)), None);
    }

    #[test]
    fn delivers_to_every_subscriber_in_order() {
        let bus = ShortcutBus::new();
        let first = bus.subscribe();
        let second = bus.subscribe();

        assert!(bus.publish(KeyPress::new(Key::K, true)));
        assert!(bus.publish(KeyPress::new(Key::Escape, false)));
        assert!(!bus.publish(KeyPress::new(Key::Other, true)));

        assert_eq!(first.poll(), Some(Shortcut::OpenSearch));
        assert_eq!(first.poll(), Some(Shortcut::CloseSearch));
        assert_eq!(first.poll(), None);
        assert_eq!(second.poll(), Some(Shortcut::OpenSearch));
    }

    #[test]
    fn dropping_a_subscription_unsubscribes() {
        let bus = ShortcutBus::new();
        let subscription = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);

        drop(subscription);
        assert_eq!(bus.subscriber_count(), 0);
        assert!(!bus.publish(KeyPress::new(Key::K, true)));
    }

    #[test]
    fn subscriptions_outliving_the_bus_stay_silent() {
        let bus = ShortcutBus::new();
        let subscription = bus.subscribe();
        bus.publish(KeyPress::new(Key::K, true));
        drop(bus);

        assert_eq!(subscription.poll(), None);
    }
}
