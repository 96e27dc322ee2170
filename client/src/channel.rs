use std::cell::{Cell, RefCell};
use std::rc::Rc;

use pixel_debate_shared::sync::HandlerSet;
use pixel_debate_shared::{MessageHandler, Subscription, SyncMessage, Transport, TransportError};
use thiserror::Error;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{BroadcastChannel, MessageEvent};

use crate::net::describe_js_error;

#[derive(Debug, Error)]
enum DecodeError {
    #[error("payload is not JSON-serializable: {0}")]
    Stringify(String),
    #[error("unexpected message shape: {0}")]
    Json(#[from] serde_json::Error),
}

/// A [`Transport`] over the browser's `BroadcastChannel`.
///
/// Messages travel as plain objects of the protocol shape. The channel never
/// hands a message back to the object that posted it.
pub struct BroadcastTransport {
    channel: BroadcastChannel,
    handlers: Rc<HandlerSet>,
    onmessage: RefCell<Option<Closure<dyn FnMut(MessageEvent)>>>,
    closed: Cell<bool>,
}

impl BroadcastTransport {
    pub fn open(name: &str) -> Result<Self, JsValue> {
        let channel = BroadcastChannel::new(name)?;
        let handlers = Rc::new(HandlerSet::new());
        let dispatch_to = handlers.clone();
        let onmessage = Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
            match decode_message(&event.data()) {
                Ok(message) => dispatch_to.dispatch(&message),
                Err(error) => log::debug!("ignoring channel message: {error}"),
            }
        });
        channel.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));
        log::info!("joined broadcast channel {name}");
        Ok(Self {
            channel,
            handlers,
            onmessage: RefCell::new(Some(onmessage)),
            closed: Cell::new(false),
        })
    }
}

fn encode_message(message: &SyncMessage) -> Result<JsValue, TransportError> {
    let payload = serde_json::to_string(message)?;
    js_sys::JSON::parse(&payload).map_err(|error| TransportError::Unavailable(describe_js_error(&error)))
}

fn decode_message(value: &JsValue) -> Result<SyncMessage, DecodeError> {
    let payload: String = js_sys::JSON::stringify(value)
        .map_err(|error| DecodeError::Stringify(describe_js_error(&error)))?
        .into();
    Ok(serde_json::from_str(&payload)?)
}

impl Transport for BroadcastTransport {
    fn publish(&self, message: &SyncMessage) -> Result<(), TransportError> {
        if self.closed.get() {
            return Err(TransportError::Closed);
        }
        let value = encode_message(message)?;
        self.channel
            .post_message(&value)
            .map_err(|error| TransportError::Unavailable(describe_js_error(&error)))
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
        self.channel.set_onmessage(None);
        self.channel.close();
        self.onmessage.borrow_mut().take();
        self.handlers.clear();
    }
}

impl Drop for BroadcastTransport {
    fn drop(&mut self) {
        self.close();
    }
}
