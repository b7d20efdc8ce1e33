use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use log::trace;

use super::EventHandler;

pub type Callback<T> = Rc<dyn Fn(&T)>;
pub type SubscriptionId = u64;

struct Listeners<T> {
    next_id: SubscriptionId,
    callbacks: BTreeMap<SubscriptionId, Callback<T>>,
}

/// Single-threaded broadcast channel. Listeners run in subscription order.
pub struct Channel<T: std::fmt::Debug> {
    listeners: Rc<RefCell<Listeners<T>>>,
}

impl<T: std::fmt::Debug> Clone for Channel<T> {
    fn clone(&self) -> Self {
        Self {
            listeners: Rc::clone(&self.listeners),
        }
    }
}

pub struct EventEmitter<T: std::fmt::Debug> {
    channel: Channel<T>,
}

impl<T: std::fmt::Debug> Clone for EventEmitter<T> {
    fn clone(&self) -> Self {
        Self {
            channel: self.channel.clone(),
        }
    }
}

pub struct EventObserver<T: std::fmt::Debug> {
    channel: Channel<T>,
}

impl<T: std::fmt::Debug> Clone for EventObserver<T> {
    fn clone(&self) -> Self {
        Self {
            channel: self.channel.clone(),
        }
    }
}

/// Handle returned by `subscribe`. Dropping it keeps the subscription alive;
/// call `unsubscribe` to end it.
pub struct Unsubscriber<T> {
    listeners: Weak<RefCell<Listeners<T>>>,
    id: SubscriptionId,
}

impl<T> Unsubscriber<T> {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Returns false when the subscription or the channel is already gone.
    pub fn unsubscribe(self) -> bool {
        match self.listeners.upgrade() {
            Some(listeners) => listeners.borrow_mut().callbacks.remove(&self.id).is_some(),
            None => false,
        }
    }
}

impl<T: std::fmt::Debug + 'static> Channel<T> {
    pub fn new() -> (EventEmitter<T>, EventObserver<T>) {
        let channel = Channel {
            listeners: Rc::new(RefCell::new(Listeners {
                next_id: 0,
                callbacks: BTreeMap::new(),
            })),
        };
        (
            EventEmitter {
                channel: channel.clone(),
            },
            EventObserver { channel },
        )
    }

    fn subscribe<F>(&self, callback: F) -> Unsubscriber<T>
    where
        F: Fn(&T) + 'static,
    {
        let mut listeners = self.listeners.borrow_mut();
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.callbacks.insert(id, Rc::new(callback));
        Unsubscriber {
            listeners: Rc::downgrade(&self.listeners),
            id,
        }
    }

    fn emit(&self, data: &T) {
        // snapshot so a listener may subscribe or unsubscribe while handling
        let callbacks = self
            .listeners
            .borrow()
            .callbacks
            .values()
            .cloned()
            .collect::<Vec<_>>();
        trace!(target: "events", "Emitting event to {} listeners: {:?}", callbacks.len(), data);
        for callback in callbacks {
            callback(data);
        }
    }

    fn listener_count(&self) -> usize {
        self.listeners.borrow().callbacks.len()
    }
}

impl<T: std::fmt::Debug + 'static> EventEmitter<T> {
    pub fn emit(&self, data: T) {
        self.channel.emit(&data);
    }

    pub fn listener_count(&self) -> usize {
        self.channel.listener_count()
    }
}

impl<T: std::fmt::Debug + 'static> EventObserver<T> {
    pub fn subscribe<F>(&self, callback: F) -> Unsubscriber<T>
    where
        F: Fn(&T) + 'static,
    {
        self.channel.subscribe(callback)
    }

    /// Routes every event to `handler`.
    pub fn subscribe_handler<H>(&self, handler: Rc<RefCell<H>>) -> Unsubscriber<T>
    where
        H: EventHandler<T> + 'static,
    {
        self.channel
            .subscribe(move |event| handler.borrow_mut().handle_event(event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Debug)]
    enum Ping {
        Value(u32),
    }

    #[test]
    fn test_listeners_run_in_subscription_order() {
        let (emitter, observer) = Channel::<Ping>::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let seen = seen.clone();
            observer.subscribe(move |Ping::Value(v): &Ping| {
                seen.borrow_mut().push(format!("{}:{}", tag, v))
            });
        }

        emitter.emit(Ping::Value(7));
        assert_eq!(
            *seen.borrow(),
            vec!["first:7", "second:7", "third:7"]
        );
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let (emitter, observer) = Channel::<Ping>::new();
        let count = Rc::new(Cell::new(0));
        let counter = count.clone();
        let subscription = observer.subscribe(move |_| counter.set(counter.get() + 1));

        emitter.emit(Ping::Value(1));
        assert!(subscription.unsubscribe());
        emitter.emit(Ping::Value(2));

        assert_eq!(count.get(), 1);
        assert_eq!(emitter.listener_count(), 0);
    }

    #[test]
    fn test_unsubscribe_after_channel_dropped() {
        let (emitter, observer) = Channel::<Ping>::new();
        let subscription = observer.subscribe(|_| ());
        drop(emitter);
        drop(observer);
        assert!(!subscription.unsubscribe());
    }

    #[test]
    fn test_listener_may_subscribe_while_handling() {
        let (emitter, observer) = Channel::<Ping>::new();
        let inner_observer = observer.clone();
        let hits = Rc::new(Cell::new(0));
        let hits_outer = hits.clone();

        observer.subscribe(move |_| {
            let hits = hits_outer.clone();
            inner_observer.subscribe(move |_| hits.set(hits.get() + 1));
        });

        emitter.emit(Ping::Value(1));
        assert_eq!(hits.get(), 0);
        emitter.emit(Ping::Value(2));
        assert_eq!(hits.get(), 1);
    }

    struct Recorder {
        total: u32,
    }

    impl EventHandler<Ping> for Recorder {
        fn handle_event(&mut self, event: &Ping) {
            let Ping::Value(v) = event;
            self.total += v;
        }
    }

    #[test]
    fn test_subscribe_handler() {
        let (emitter, observer) = Channel::<Ping>::new();
        let recorder = Rc::new(RefCell::new(Recorder { total: 0 }));
        observer.subscribe_handler(recorder.clone());

        emitter.emit(Ping::Value(3));
        emitter.emit(Ping::Value(4));
        assert_eq!(recorder.borrow().total, 7);
    }
}
