use std::collections::HashMap;

use tracing::debug;

use super::services::{AudioSink, ItemWorld};
use super::store::SaveStore;
use super::uid::Uid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(pub u64);

/// Services handed to activation listeners while the event is delivered.
pub struct ActivationContext<'a> {
    pub target: Uid,
    pub audio: &'a mut dyn AudioSink,
    pub items: &'a mut dyn ItemWorld,
}

pub type ActivationListener = Box<dyn FnMut(&mut ActivationContext<'_>)>;
pub type SaveListener = Box<dyn FnMut(&mut SaveStore)>;
pub type LoadListener = Box<dyn FnMut(&SaveStore)>;

/// Registration side of the engine's event delivery. Listeners stay
/// registered until the owning level is torn down.
pub trait EventSource {
    fn on_activate(&mut self, target: Uid, listener: ActivationListener) -> ListenerId;
    fn on_save(&mut self, listener: SaveListener) -> ListenerId;
    fn on_load(&mut self, listener: LoadListener) -> ListenerId;
}

/// Listener registry for one level. Every event is delivered in
/// registration order.
#[derive(Default)]
pub struct EventBus {
    next_listener_id: u64,
    activation: HashMap<Uid, Vec<(ListenerId, ActivationListener)>>,
    save: Vec<(ListenerId, SaveListener)>,
    load: Vec<(ListenerId, LoadListener)>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc_listener_id(&mut self) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id = self.next_listener_id.saturating_add(1);
        id
    }

    pub fn activation_listener_count(&self, target: Uid) -> usize {
        self.activation.get(&target).map_or(0, Vec::len)
    }

    pub fn save_listener_count(&self) -> usize {
        self.save.len()
    }

    pub fn load_listener_count(&self) -> usize {
        self.load.len()
    }

    /// Delivers the activation event of `target`. Returns the number of
    /// listeners invoked.
    pub fn publish_activate<'a>(
        &mut self,
        target: Uid,
        audio: &'a mut dyn AudioSink,
        items: &'a mut dyn ItemWorld,
    ) -> usize {
        let Some(listeners) = self.activation.get_mut(&target) else {
            debug!(uid = %target, "activate_without_listeners");
            return 0;
        };
        let mut context = ActivationContext {
            target,
            audio,
            items,
        };
        for (_, listener) in listeners.iter_mut() {
            listener(&mut context);
        }
        listeners.len()
    }

    pub fn publish_save(&mut self, store: &mut SaveStore) -> usize {
        for (_, listener) in self.save.iter_mut() {
            listener(store);
        }
        self.save.len()
    }

    pub fn publish_load(&mut self, store: &SaveStore) -> usize {
        for (_, listener) in self.load.iter_mut() {
            listener(store);
        }
        self.load.len()
    }

    /// Drops every listener, as happens when the level is torn down.
    pub fn clear(&mut self) {
        self.activation.clear();
        self.save.clear();
        self.load.clear();
    }
}

impl EventSource for EventBus {
    fn on_activate(&mut self, target: Uid, listener: ActivationListener) -> ListenerId {
        let id = self.alloc_listener_id();
        self.activation
            .entry(target)
            .or_default()
            .push((id, listener));
        debug!(uid = %target, listener = id.0, "activation_listener_registered");
        id
    }

    fn on_save(&mut self, listener: SaveListener) -> ListenerId {
        let id = self.alloc_listener_id();
        self.save.push((id, listener));
        debug!(listener = id.0, "save_listener_registered");
        id
    }

    fn on_load(&mut self, listener: LoadListener) -> ListenerId {
        let id = self.alloc_listener_id();
        self.load.push((id, listener));
        debug!(listener = id.0, "load_listener_registered");
        id
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use serde_json::json;

    use super::*;
    use crate::script::SpawnDescriptor;

    #[test]
    fn activation_reaches_only_listeners_of_that_target() {
        let mut bus = EventBus::new();
        let fired = Rc::new(RefCell::new(Vec::new()));
        for uid in [1_u64, 2] {
            let fired = Rc::clone(&fired);
            bus.on_activate(
                Uid(uid),
                Box::new(move |context: &mut ActivationContext<'_>| {
                    fired.borrow_mut().push(context.target)
                }),
            );
        }

        let mut audio = Vec::<String>::new();
        let mut items = Vec::<SpawnDescriptor>::new();
        assert_eq!(bus.publish_activate(Uid(2), &mut audio, &mut items), 1);
        assert_eq!(bus.publish_activate(Uid(5), &mut audio, &mut items), 0);
        assert_eq!(*fired.borrow(), vec![Uid(2)]);
    }

    #[test]
    fn listeners_run_in_registration_order() {
        let mut bus = EventBus::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        for label in ["first", "second", "third"] {
            let order = Rc::clone(&order);
            bus.on_save(Box::new(move |_store| order.borrow_mut().push(label)));
        }
        for label in ["a", "b"] {
            let order = Rc::clone(&order);
            bus.on_activate(
                Uid(4),
                Box::new(move |_context| order.borrow_mut().push(label)),
            );
        }

        let mut store = SaveStore::new();
        assert_eq!(bus.publish_save(&mut store), 3);
        bus.publish_activate(
            Uid(4),
            &mut Vec::<String>::new(),
            &mut Vec::<SpawnDescriptor>::new(),
        );
        assert_eq!(*order.borrow(), vec!["first", "second", "third", "a", "b"]);
    }

    #[test]
    fn load_listeners_see_store_contents() {
        let mut bus = EventBus::new();
        let seen = Rc::new(RefCell::new(None));
        {
            let seen = Rc::clone(&seen);
            bus.on_load(Box::new(move |store: &SaveStore| {
                *seen.borrow_mut() = store.get_bool(&["flags", "door"]);
            }));
        }

        let store = SaveStore::from_value(json!({"flags": {"door": true}})).expect("store");
        assert_eq!(bus.publish_load(&store), 1);
        assert_eq!(*seen.borrow(), Some(true));
    }

    #[test]
    fn listener_ids_are_unique_and_clear_drops_everything() {
        let mut bus = EventBus::new();
        let a = bus.on_save(Box::new(|_| {}));
        let b = bus.on_load(Box::new(|_| {}));
        let c = bus.on_activate(Uid(1), Box::new(|_| {}));
        assert!(a != b && b != c && a != c);

        bus.clear();
        assert_eq!(bus.save_listener_count(), 0);
        assert_eq!(bus.load_listener_count(), 0);
        assert_eq!(bus.activation_listener_count(Uid(1)), 0);
    }
}
