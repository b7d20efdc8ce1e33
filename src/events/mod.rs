//! Single-threaded publish/subscribe used to report session progress to a host.
mod channel;
mod event_handler;

pub use channel::{Callback, Channel, EventEmitter, EventObserver, SubscriptionId, Unsubscriber};
pub use event_handler::EventHandler;
