//! Browser implementation of [`Host`].
//!
//! Timers use `window.setTimeout` with one cached callback, and the resize
//! subscription is a single `resize` listener on the window. Both callbacks
//! are supplied by the owner, which routes them back into its engine.

use std::collections::HashSet;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::Window;

use crate::error::{BitviewError, Result};

use super::host::{Host, Subscription, TimerHandle};

pub struct BrowserHost {
    window: Window,
    timer_closure: Closure<dyn FnMut()>,
    resize_closure: Closure<dyn FnMut(web_sys::Event)>,
    subscriptions: HashSet<u32>,
    next_subscription: u32,
}

impl BrowserHost {
    pub fn new(
        window: Window,
        on_timer: impl FnMut() + 'static,
        mut on_resize: impl FnMut() + 'static,
    ) -> Self {
        let timer_closure = Closure::wrap(Box::new(on_timer) as Box<dyn FnMut()>);
        let resize_closure = Closure::wrap(Box::new(move |_event: web_sys::Event| {
            on_resize();
        }) as Box<dyn FnMut(web_sys::Event)>);
        Self {
            window,
            timer_closure,
            resize_closure,
            subscriptions: HashSet::new(),
            next_subscription: 0,
        }
    }
}

impl Host for BrowserHost {
    fn set_timeout(&mut self, delay_ms: u32) -> Result<TimerHandle> {
        self.window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                self.timer_closure.as_ref().unchecked_ref(),
                i32::try_from(delay_ms).unwrap_or(i32::MAX),
            )
            .map(TimerHandle)
            .map_err(|e| BitviewError::Host(format!("setTimeout failed: {:?}", e)))
    }

    fn clear_timeout(&mut self, handle: TimerHandle) {
        self.window.clear_timeout_with_handle(handle.0);
    }

    fn subscribe_resize(&mut self) -> Result<Subscription> {
        if self.subscriptions.is_empty() {
            self.window
                .add_event_listener_with_callback(
                    "resize",
                    self.resize_closure.as_ref().unchecked_ref(),
                )
                .map_err(|e| BitviewError::Host(format!("resize listener failed: {:?}", e)))?;
        }
        self.next_subscription = self.next_subscription.wrapping_add(1);
        self.subscriptions.insert(self.next_subscription);
        Ok(Subscription(self.next_subscription))
    }

    fn unsubscribe(&mut self, subscription: Subscription) {
        if self.subscriptions.remove(&subscription.0) && self.subscriptions.is_empty() {
            let _ = self.window.remove_event_listener_with_callback(
                "resize",
                self.resize_closure.as_ref().unchecked_ref(),
            );
        }
    }
}
