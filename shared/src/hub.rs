//! In-process broadcast hub.
//!
//! Every [`LocalPort`] is one context. Messages are queued and delivered in
//! FIFO order to all other open ports, never back to the publisher.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use crate::sync::{HandlerSet, MessageHandler, Subscription, Transport, TransportError};
use crate::SyncMessage;

#[derive(Default)]
struct HubInner {
    next_port: Cell<u64>,
    ports: RefCell<Vec<(u64, Rc<HandlerSet>)>>,
    queue: RefCell<VecDeque<(u64, SyncMessage)>>,
    dispatching: Cell<bool>,
}

impl HubInner {
    fn enqueue(&self, sender: u64, message: SyncMessage) {
        self.queue.borrow_mut().push_back((sender, message));
        // A handler publishing from inside a delivery only queues; the outer
        // loop picks it up.
        if self.dispatching.replace(true) {
            return;
        }
        loop {
            let next = self.queue.borrow_mut().pop_front();
            let Some((sender, message)) = next else {
                break;
            };
            let targets: Vec<Rc<HandlerSet>> = self
                .ports
                .borrow()
                .iter()
                .filter(|(id, _)| *id != sender)
                .map(|(_, handlers)| handlers.clone())
                .collect();
            for handlers in targets {
                handlers.dispatch(&message);
            }
        }
        self.dispatching.set(false);
    }
}

#[derive(Clone, Default)]
pub struct LocalHub {
    inner: Rc<HubInner>,
}

impl LocalHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect(&self) -> LocalPort {
        let id = self.inner.next_port.get();
        self.inner.next_port.set(id + 1);
        let handlers = Rc::new(HandlerSet::new());
        self.inner.ports.borrow_mut().push((id, handlers.clone()));
        LocalPort {
            id,
            handlers,
            hub: Rc::downgrade(&self.inner),
            closed: Cell::new(false),
        }
    }

    pub fn port_count(&self) -> usize {
        self.inner.ports.borrow().len()
    }
}

pub struct LocalPort {
    id: u64,
    handlers: Rc<HandlerSet>,
    hub: Weak<HubInner>,
    closed: Cell<bool>,
}

impl Transport for LocalPort {
    fn publish(&self, message: &SyncMessage) -> Result<(), TransportError> {
        if self.closed.get() {
            return Err(TransportError::Closed);
        }
        let hub = self
            .hub
            .upgrade()
            .ok_or_else(|| TransportError::Unavailable("hub dropped".into()))?;
        hub.enqueue(self.id, message.clone());
        Ok(())
    }

    fn subscribe(&self, handler: MessageHandler) -> Subscription {
        self.handlers.insert(handler)
    }

    fn unsubscribe(&self, subscription: Subscription) {
        self.handlers.remove(subscription);
    }

    fn close(&self) {
        if self.closed.replace(true) {
            return;
        }
        if let Some(hub) = self.hub.upgrade() {
            hub.ports.borrow_mut().retain(|(id, _)| *id != self.id);
        }
        self.handlers.clear();
    }
}

impl Drop for LocalPort {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(port: &LocalPort) -> Rc<RefCell<Vec<SyncMessage>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        port.subscribe(Box::new(move |message| sink.borrow_mut().push(message)));
        seen
    }

    #[test]
    fn test_publisher_does_not_hear_itself() {
        let hub = LocalHub::new();
        let a = hub.connect();
        let b = hub.connect();
        let seen_a = collect(&a);
        let seen_b = collect(&b);
        a.publish(&SyncMessage::ClearCanvas).unwrap();
        assert!(seen_a.borrow().is_empty());
        assert_eq!(seen_b.borrow().as_slice(), &[SyncMessage::ClearCanvas]);
    }

    #[test]
    fn test_fan_out_to_every_other_port() {
        let hub = LocalHub::new();
        let a = hub.connect();
        let b = hub.connect();
        let c = hub.connect();
        let seen_b = collect(&b);
        let seen_c = collect(&c);
        a.publish(&SyncMessage::ClearCanvas).unwrap();
        assert_eq!(seen_b.borrow().len(), 1);
        assert_eq!(seen_c.borrow().len(), 1);
    }

    #[test]
    fn test_closed_port_neither_sends_nor_receives() {
        let hub = LocalHub::new();
        let a = hub.connect();
        let b = hub.connect();
        let seen_b = collect(&b);
        b.close();
        assert_eq!(hub.port_count(), 1);
        a.publish(&SyncMessage::ClearCanvas).unwrap();
        assert!(seen_b.borrow().is_empty());
        assert!(matches!(
            b.publish(&SyncMessage::ClearCanvas),
            Err(TransportError::Closed)
        ));
    }

    #[test]
    fn test_late_subscriber_misses_earlier_messages() {
        let hub = LocalHub::new();
        let a = hub.connect();
        a.publish(&SyncMessage::ClearCanvas).unwrap();
        let b = hub.connect();
        let seen_b = collect(&b);
        assert!(seen_b.borrow().is_empty());
    }

    #[test]
    fn test_reentrant_publish_is_queued_in_order() {
        let hub = LocalHub::new();
        let a = hub.connect();
        let b = Rc::new(hub.connect());
        let c = hub.connect();
        let seen_c = collect(&c);
        {
            let echo = Rc::downgrade(&b);
            b.subscribe(Box::new(move |message| {
                if let (SyncMessage::ClearCanvas, Some(port)) = (&message, echo.upgrade()) {
                    let _ = port.publish(&SyncMessage::UpdateSession(Default::default()));
                }
            }));
        }
        a.publish(&SyncMessage::ClearCanvas).unwrap();
        let seen = seen_c.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], SyncMessage::ClearCanvas);
        assert!(matches!(seen[1], SyncMessage::UpdateSession(_)));
    }

    #[test]
    fn test_dropped_hub_makes_publish_fail() {
        let hub = LocalHub::new();
        let a = hub.connect();
        drop(hub);
        assert!(matches!(
            a.publish(&SyncMessage::ClearCanvas),
            Err(TransportError::Unavailable(_))
        ));
    }
}
