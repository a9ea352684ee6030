//! Session message bus.
//!
//! Publishers push [`EditorEvent`]s into a channel without touching any
//! listener. The host drains the queue on the UI thread with
//! [`EventBus::dispatch_pending`], so listeners always run after the
//! publishing mutation has finished and may freely read the workspace.

use crate::workspace::BufferId;
use crossbeam_channel::{Receiver, Sender};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// Events published by the workspace and its documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorEvent {
    /// The active file changed.
    SelectionChanged {
        old: Option<BufferId>,
        new: Option<BufferId>,
    },
    /// A document's text was edited.
    DocumentChanged { buffer: BufferId },
}

impl EditorEvent {
    /// Returns the topic this event is delivered on.
    pub fn topic(&self) -> Topic {
        match self {
            EditorEvent::SelectionChanged { .. } => Topic::FileEditorSelection,
            EditorEvent::DocumentChanged { .. } => Topic::DocumentEdits,
        }
    }
}

/// Subscription topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Active file selection changes.
    FileEditorSelection,
    /// Edits to any document in the session.
    DocumentEdits,
}

/// Errors reported by subscription handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusError {
    /// The listener was already removed, or the bus is gone.
    AlreadyDetached,
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusError::AlreadyDetached => write!(f, "listener already detached"),
        }
    }
}

impl std::error::Error for BusError {}

type Listener = Rc<RefCell<dyn FnMut(&EditorEvent)>>;

struct ListenerEntry {
    id: u64,
    topic: Topic,
    live: Rc<Cell<bool>>,
    callback: Listener,
}

#[derive(Default)]
struct Registry {
    entries: Vec<ListenerEntry>,
    next_id: u64,
    closed: bool,
}

impl Registry {
    fn attach(
        registry: &Rc<RefCell<Registry>>,
        topic: Topic,
        callback: Listener,
    ) -> Subscription {
        let live = Rc::new(Cell::new(false));
        let mut inner = registry.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;

        if inner.closed {
            log::debug!("Subscribe to {:?} on a closed bus", topic);
        } else {
            live.set(true);
            inner.entries.push(ListenerEntry {
                id,
                topic,
                live: Rc::clone(&live),
                callback,
            });
        }

        Subscription {
            id,
            topic,
            live,
            registry: Rc::downgrade(registry),
        }
    }

    /// Removes a listener. The entry is returned so that it is dropped
    /// after the registry borrow ends.
    fn detach(&mut self, id: u64) -> Option<ListenerEntry> {
        let pos = self.entries.iter().position(|e| e.id == id)?;
        let entry = self.entries.remove(pos);
        entry.live.set(false);
        Some(entry)
    }

    fn close(&mut self) -> Vec<ListenerEntry> {
        self.closed = true;
        let entries: Vec<ListenerEntry> = self.entries.drain(..).collect();
        for entry in &entries {
            entry.live.set(false);
        }
        entries
    }
}

impl Drop for Registry {
    fn drop(&mut self) {
        for entry in &self.entries {
            entry.live.set(false);
        }
    }
}

/// Sending half of the bus, handed to anything that produces events.
#[derive(Debug, Clone)]
pub struct EventPublisher {
    sender: Sender<EditorEvent>,
}

impl EventPublisher {
    /// Queues an event for the next dispatch.
    pub fn publish(&self, event: EditorEvent) {
        if self.sender.send(event).is_err() {
            log::trace!("Dropping {:?}: bus is gone", event);
        }
    }
}

/// Publish/subscribe bus scoped to one session.
pub struct EventBus {
    sender: Sender<EditorEvent>,
    receiver: Receiver<EditorEvent>,
    registry: Rc<RefCell<Registry>>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    /// Creates an open bus with no listeners.
    pub fn new() -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded();
        Self {
            sender,
            receiver,
            registry: Rc::new(RefCell::new(Registry::default())),
        }
    }

    /// Returns a publisher feeding this bus.
    pub fn publisher(&self) -> EventPublisher {
        EventPublisher {
            sender: self.sender.clone(),
        }
    }

    /// Returns a handle for registering listeners later.
    ///
    /// The handle does not keep the bus alive.
    pub fn subscriber(&self) -> Subscriber {
        Subscriber {
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Registers a listener for one topic.
    ///
    /// Subscribing to a closed bus returns a handle that is already detached.
    pub fn subscribe<F>(&self, topic: Topic, listener: F) -> Subscription
    where
        F: FnMut(&EditorEvent) + 'static,
    {
        Registry::attach(&self.registry, topic, Rc::new(RefCell::new(listener)))
    }

    /// Delivers every queued event to the listeners of its topic.
    ///
    /// Events are delivered in publish order, listeners in registration
    /// order. Returns the number of events drained.
    pub fn dispatch_pending(&self) -> usize {
        let mut drained = 0;
        while let Ok(event) = self.receiver.try_recv() {
            drained += 1;
            if self.is_closed() {
                log::trace!("Dropping {:?}: bus is closed", event);
                continue;
            }
            let topic = event.topic();
            // Snapshot so listeners may subscribe or unsubscribe while running.
            let targets: Vec<(Rc<Cell<bool>>, Listener)> = self
                .registry
                .borrow()
                .entries
                .iter()
                .filter(|e| e.topic == topic)
                .map(|e| (Rc::clone(&e.live), Rc::clone(&e.callback)))
                .collect();

            log::trace!("Dispatching {:?} to {} listener(s)", event, targets.len());
            for (live, callback) in targets {
                if !live.get() {
                    continue;
                }
                match callback.try_borrow_mut() {
                    Ok(mut callback) => (&mut *callback)(&event),
                    Err(_) => log::debug!("Skipping re-entrant listener for {:?}", topic),
                }
            }
        }
        drained
    }

    /// Detaches every listener. Later events are drained without delivery.
    pub fn close(&mut self) {
        if !self.is_closed() {
            let detached = self.registry.borrow_mut().close();
            log::debug!("Event bus closed, {} listener(s) detached", detached.len());
        }
    }

    /// Returns whether the bus was closed.
    pub fn is_closed(&self) -> bool {
        self.registry.borrow().closed
    }

    /// Returns the number of attached listeners.
    pub fn listener_count(&self) -> usize {
        self.registry.borrow().entries.len()
    }
}

/// Registers listeners on a bus it does not own.
#[derive(Debug, Clone)]
pub struct Subscriber {
    registry: Weak<RefCell<Registry>>,
}

impl Subscriber {
    /// Registers a listener for one topic.
    ///
    /// When the bus is closed or gone the returned handle is already detached.
    pub fn subscribe<F>(&self, topic: Topic, listener: F) -> Subscription
    where
        F: FnMut(&EditorEvent) + 'static,
    {
        let callback: Listener = Rc::new(RefCell::new(listener));
        match self.registry.upgrade() {
            Some(registry) => Registry::attach(&registry, topic, callback),
            None => {
                log::debug!("Subscribe to {:?} after the bus was dropped", topic);
                Subscription {
                    id: 0,
                    topic,
                    live: Rc::new(Cell::new(false)),
                    registry: Weak::new(),
                }
            }
        }
    }
}

/// Handle to a registered listener.
///
/// Dropping the handle detaches the listener.
pub struct Subscription {
    id: u64,
    topic: Topic,
    live: Rc<Cell<bool>>,
    registry: Weak<RefCell<Registry>>,
}

impl Subscription {
    /// Returns the subscribed topic.
    pub fn topic(&self) -> Topic {
        self.topic
    }

    /// Returns whether the listener is still attached.
    pub fn is_attached(&self) -> bool {
        self.live.get()
    }

    /// Detaches the listener.
    ///
    /// Fails with [`BusError::AlreadyDetached`] when the listener was
    /// already removed or the bus has been closed or dropped.
    pub fn unsubscribe(&mut self) -> Result<(), BusError> {
        if !self.live.get() {
            return Err(BusError::AlreadyDetached);
        }
        let registry = self.registry.upgrade().ok_or(BusError::AlreadyDetached)?;
        let detached = registry.borrow_mut().detach(self.id);
        detached.map(|_| ()).ok_or(BusError::AlreadyDetached)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let _ = self.unsubscribe();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("topic", &self.topic)
            .field("attached", &self.live.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder(bus: &EventBus, topic: Topic) -> (Subscription, Rc<RefCell<Vec<EditorEvent>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let sub = bus.subscribe(topic, move |event| sink.borrow_mut().push(*event));
        (sub, seen)
    }

    #[test]
    fn test_dispatch_by_topic() {
        let bus = EventBus::new();
        let (_sel, selections) = recorder(&bus, Topic::FileEditorSelection);
        let (_doc, edits) = recorder(&bus, Topic::DocumentEdits);

        let publisher = bus.publisher();
        publisher.publish(EditorEvent::DocumentChanged { buffer: 3 });
        publisher.publish(EditorEvent::SelectionChanged {
            old: None,
            new: Some(3),
        });

        assert!(selections.borrow().is_empty());
        assert_eq!(bus.dispatch_pending(), 2);
        assert_eq!(
            *selections.borrow(),
            vec![EditorEvent::SelectionChanged {
                old: None,
                new: Some(3)
            }]
        );
        assert_eq!(*edits.borrow(), vec![EditorEvent::DocumentChanged { buffer: 3 }]);
    }

    #[test]
    fn test_unsubscribe_twice() {
        let bus = EventBus::new();
        let (mut sub, seen) = recorder(&bus, Topic::DocumentEdits);
        assert_eq!(bus.listener_count(), 1);

        assert_eq!(sub.unsubscribe(), Ok(()));
        assert_eq!(sub.unsubscribe(), Err(BusError::AlreadyDetached));
        assert_eq!(bus.listener_count(), 0);

        bus.publisher().publish(EditorEvent::DocumentChanged { buffer: 0 });
        bus.dispatch_pending();
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_drop_detaches() {
        let bus = EventBus::new();
        let (sub, _seen) = recorder(&bus, Topic::DocumentEdits);
        drop(sub);
        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn test_close_detaches_all() {
        let mut bus = EventBus::new();
        let (mut sub, seen) = recorder(&bus, Topic::DocumentEdits);
        bus.close();

        assert!(!sub.is_attached());
        assert_eq!(sub.unsubscribe(), Err(BusError::AlreadyDetached));

        bus.publisher().publish(EditorEvent::DocumentChanged { buffer: 1 });
        assert_eq!(bus.dispatch_pending(), 1);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_unsubscribe_after_bus_dropped() {
        let bus = EventBus::new();
        let (mut sub, _seen) = recorder(&bus, Topic::FileEditorSelection);
        drop(bus);
        assert_eq!(sub.unsubscribe(), Err(BusError::AlreadyDetached));
    }

    #[test]
    fn test_subscriber_handle() {
        let mut bus = EventBus::new();
        let subscriber = bus.subscriber();
        let (mut sub, seen) = {
            let seen = Rc::new(RefCell::new(Vec::new()));
            let sink = Rc::clone(&seen);
            let sub = subscriber.subscribe(Topic::DocumentEdits, move |e| sink.borrow_mut().push(*e));
            (sub, seen)
        };

        bus.publisher().publish(EditorEvent::DocumentChanged { buffer: 2 });
        bus.dispatch_pending();
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(sub.unsubscribe(), Ok(()));

        bus.close();
        let late = subscriber.subscribe(Topic::DocumentEdits, |_| {});
        assert!(!late.is_attached());

        drop(bus);
        let orphan = subscriber.subscribe(Topic::DocumentEdits, |_| {});
        assert!(!orphan.is_attached());
    }

    #[test]
    fn test_bus_drop_detaches() {
        let bus = EventBus::new();
        let (sub, _seen) = recorder(&bus, Topic::DocumentEdits);
        drop(bus);
        assert!(!sub.is_attached());
    }

    #[test]
    fn test_publish_after_bus_dropped() {
        let bus = EventBus::new();
        let publisher = bus.publisher();
        drop(bus);
        publisher.publish(EditorEvent::DocumentChanged { buffer: 0 });
    }

    #[test]
    fn test_listener_removed_during_dispatch() {
        let bus = EventBus::new();
        let calls = Rc::new(Cell::new(0));

        let second: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let victim = Rc::clone(&second);
        let _first = bus.subscribe(Topic::DocumentEdits, move |_| {
            if let Some(mut sub) = victim.borrow_mut().take() {
                let _ = sub.unsubscribe();
            }
        });
        let counter = Rc::clone(&calls);
        *second.borrow_mut() = Some(bus.subscribe(Topic::DocumentEdits, move |_| {
            counter.set(counter.get() + 1);
        }));

        bus.publisher().publish(EditorEvent::DocumentChanged { buffer: 0 });
        bus.dispatch_pending();
        assert_eq!(calls.get(), 0);
    }
}
