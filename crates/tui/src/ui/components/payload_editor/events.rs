//! Listener registry for [`PayloadEvent`]s.
//!
//! Listeners attach either to the editor itself ([`ListenerScope::Target`])
//! or to the surrounding request form ([`ListenerScope::Host`]). Host
//! listeners only see events that bubble.

use std::fmt;

use filebody_types::PayloadEvent;
use tracing::info;

/// What a listener wants done after it saw an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListenerResponse {
    #[default]
    Continue,
    /// Ask the host to skip its default handling. Ignored for events that are not cancelable.
    PreventDefault,
}

/// Where a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerScope {
    Target,
    Host,
}

/// Receives editor notifications.
pub trait PayloadListener: Send {
    fn on_event(&mut self, event: &PayloadEvent) -> ListenerResponse;
}

impl<F> PayloadListener for F
where
    F: FnMut(&PayloadEvent) -> ListenerResponse + Send,
{
    fn on_event(&mut self, event: &PayloadEvent) -> ListenerResponse {
        self(event)
    }
}

/// Outcome of a single dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchResult {
    /// Number of listeners that received the event.
    pub delivered: usize,
    pub default_prevented: bool,
}

#[derive(Default)]
pub struct PayloadListeners {
    listeners: Vec<(ListenerScope, Box<dyn PayloadListener>)>,
}

impl fmt::Debug for PayloadListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PayloadListeners").field("len", &self.listeners.len()).finish()
    }
}

impl PayloadListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, scope: ListenerScope, listener: impl PayloadListener + 'static) {
        self.listeners.push((scope, Box::new(listener)));
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Delivers `event` to target listeners, then to host listeners when the event bubbles.
    pub fn dispatch(&mut self, event: &PayloadEvent) -> DispatchResult {
        let options = event.dispatch_options();
        let mut result = DispatchResult::default();
        for scope in [ListenerScope::Target, ListenerScope::Host] {
            if scope == ListenerScope::Host && !options.bubbles {
                break;
            }
            for (_, listener) in self.listeners.iter_mut().filter(|(listener_scope, _)| *listener_scope == scope) {
                result.delivered += 1;
                if listener.on_event(event) == ListenerResponse::PreventDefault && options.cancelable {
                    result.default_prevented = true;
                }
            }
        }
        result
    }
}

/// Host listener that records every event it sees in the tracing log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingListener;

impl PayloadListener for TracingListener {
    fn on_event(&mut self, event: &PayloadEvent) -> ListenerResponse {
        info!(event = event.name(), detail = %event, "payload event");
        ListenerResponse::Continue
    }
}
