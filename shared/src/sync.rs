//! Fan-out of sync messages between drawing contexts.
//!
//! Delivery is best-effort: no acknowledgement, no retry. A context that is
//! not subscribed when a message goes out never sees it.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use thiserror::Error;
use tracing::debug;

use crate::SyncMessage;

pub type MessageHandler = Box<dyn FnMut(SyncMessage)>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Subscription(u64);

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport is closed")]
    Closed,
    #[error("failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("transport unavailable: {0}")]
    Unavailable(String),
}

/// A publish/subscribe primitive connecting contexts.
///
/// Implementations must not hand a message back to the context that
/// published it, and must deliver one sender's messages in send order.
pub trait Transport {
    fn publish(&self, message: &SyncMessage) -> Result<(), TransportError>;
    fn subscribe(&self, handler: MessageHandler) -> Subscription;
    fn unsubscribe(&self, subscription: Subscription);
    fn close(&self);
}

/// Subscribed handlers of one context, shared by the transports.
#[derive(Default)]
pub struct HandlerSet {
    next_id: Cell<u64>,
    handlers: RefCell<Vec<(Subscription, Rc<RefCell<MessageHandler>>)>>,
}

impl HandlerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, handler: MessageHandler) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let subscription = Subscription(id);
        self.handlers
            .borrow_mut()
            .push((subscription, Rc::new(RefCell::new(handler))));
        subscription
    }

    pub fn remove(&self, subscription: Subscription) {
        self.handlers
            .borrow_mut()
            .retain(|(id, _)| *id != subscription);
    }

    pub fn clear(&self) {
        self.handlers.borrow_mut().clear();
    }

    pub fn len(&self) -> usize {
        self.handlers.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Calls every handler with its own copy of `message`.
    ///
    /// The list is snapshotted first so a handler may subscribe or
    /// unsubscribe while it runs.
    pub fn dispatch(&self, message: &SyncMessage) {
        let handlers: Vec<_> = self
            .handlers
            .borrow()
            .iter()
            .map(|(_, handler)| handler.clone())
            .collect();
        for handler in handlers {
            match handler.try_borrow_mut() {
                Ok(mut handler) => handler(message.clone()),
                Err(_) => debug!(kind = message.kind(), "handler busy, message skipped"),
            }
        }
    }
}

/// The process-wide channel endpoint. Errors never escape: once the
/// transport fails or is closed, synchronization silently stops.
pub struct Synchronizer<T: Transport> {
    transport: T,
    closed: Cell<bool>,
}

impl<T: Transport> Synchronizer<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            closed: Cell::new(false),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn is_closed(&self) -> bool {
        self.closed.get()
    }

    pub fn publish(&self, message: &SyncMessage) {
        if self.closed.get() {
            return;
        }
        if let Err(error) = self.transport.publish(message) {
            debug!(kind = message.kind(), %error, "sync publish dropped");
        }
    }

    pub fn subscribe(&self, handler: MessageHandler) -> Subscription {
        self.transport.subscribe(handler)
    }

    pub fn unsubscribe(&self, subscription: Subscription) {
        self.transport.unsubscribe(subscription);
    }

    pub fn close(&self) {
        if !self.closed.replace(true) {
            self.transport.close();
        }
    }
}

impl<T: Transport> Drop for Synchronizer<T> {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FailingTransport {
        attempts: Cell<usize>,
        closes: Cell<usize>,
    }

    impl Transport for FailingTransport {
        fn publish(&self, _message: &SyncMessage) -> Result<(), TransportError> {
            self.attempts.set(self.attempts.get() + 1);
            Err(TransportError::Unavailable("gone".into()))
        }

        fn subscribe(&self, _handler: MessageHandler) -> Subscription {
            Subscription(0)
        }

        fn unsubscribe(&self, _subscription: Subscription) {}

        fn close(&self) {
            self.closes.set(self.closes.get() + 1);
        }
    }

    #[test]
    fn test_publish_swallows_transport_errors() {
        let sync = Synchronizer::new(FailingTransport::default());
        sync.publish(&SyncMessage::ClearCanvas);
        sync.publish(&SyncMessage::ClearCanvas);
        assert_eq!(sync.transport().attempts.get(), 2);
    }

    #[test]
    fn test_closed_synchronizer_is_a_no_op() {
        let sync = Synchronizer::new(FailingTransport::default());
        sync.close();
        sync.close();
        sync.publish(&SyncMessage::ClearCanvas);
        assert!(sync.is_closed());
        assert_eq!(sync.transport().attempts.get(), 0);
        assert_eq!(sync.transport().closes.get(), 1);
    }

    #[test]
    fn test_handler_set_dispatch_and_remove() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let set = HandlerSet::new();
        let first = {
            let seen = seen.clone();
            set.insert(Box::new(move |message| seen.borrow_mut().push(("a", message))))
        };
        {
            let seen = seen.clone();
            set.insert(Box::new(move |message| seen.borrow_mut().push(("b", message))));
        }
        set.dispatch(&SyncMessage::ClearCanvas);
        set.remove(first);
        set.dispatch(&SyncMessage::ClearCanvas);
        let seen = seen.borrow();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0].0, "a");
        assert_eq!(seen[1].0, "b");
        assert_eq!(seen[2].0, "b");
        assert_eq!(set.len(), 1);
    }
}
