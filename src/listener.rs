use log::debug;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventTarget};

use crate::error::BehaviorError;

/// A registered DOM event listener. Dropping it removes the listener.
pub struct Listener {
    target: EventTarget,
    event: &'static str,
    capture: bool,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub fn new<F>(target: &EventTarget, event: &'static str, callback: F) -> Result<Self, BehaviorError>
    where
        F: FnMut(Event) + 'static,
    {
        Self::register(target, event, false, callback)
    }

    /// Like [`Listener::new`] but runs in the capture phase, before handlers
    /// on the event's target.
    pub fn capture<F>(target: &EventTarget, event: &'static str, callback: F) -> Result<Self, BehaviorError>
    where
        F: FnMut(Event) + 'static,
    {
        Self::register(target, event, true, callback)
    }

    fn register<F>(target: &EventTarget, event: &'static str, capture: bool, callback: F) -> Result<Self, BehaviorError>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::wrap(Box::new(callback) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback_and_bool(event, callback.as_ref().unchecked_ref(), capture)?;
        Ok(Self {
            target: target.clone(),
            event,
            capture,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Err(e) = self.target.remove_event_listener_with_callback_and_bool(
            self.event,
            self.callback.as_ref().unchecked_ref(),
            self.capture,
        ) {
            debug!("Failed to remove {} listener: {:?}", self.event, e);
        }
    }
}
