//! Log events and the bus that delivers them to listeners
//!
//! The bus is an ordinary value owned by the caller rather than a process-wide
//! emitter. Whoever owns the bus decides when a listener is attached or
//! detached; listeners never reach into global state themselves.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::trace;

/// One call to the logger: a level, an optional title and the message arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEvent {
    pub level: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub args: Vec<Value>,
}

impl LogEvent {
    pub fn new(level: impl Into<String>, title: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            level: level.into(),
            title: title.into(),
            args,
        }
    }

    /// Whether this event is a flow-control marker rather than content
    pub fn is_flow_control(&self) -> bool {
        crate::constants::is_flow_control_level(&self.level)
    }
}

/// Something that consumes log events
pub trait LogListener: Send {
    fn handle_event(&mut self, event: &LogEvent);
}

/// Handle returned by [`LogBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type SharedListener = Arc<Mutex<dyn LogListener>>;

/// Fan-out of log events to subscribed listeners
#[derive(Default)]
pub struct LogBus {
    next_id: AtomicU64,
    listeners: Mutex<Vec<(ListenerId, SharedListener)>>,
}

impl LogBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a listener; events are delivered in subscription order
    pub fn subscribe<L: LogListener + 'static>(&self, listener: Arc<Mutex<L>>) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let listener: SharedListener = listener;
        self.listeners.lock().push((id, listener));
        trace!("Listener {:?} subscribed", id);
        id
    }

    /// Detach a listener. Returns false if it was not subscribed.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        listeners.len() != before
    }

    /// Deliver an event to every listener
    pub fn emit_event(&self, event: &LogEvent) {
        // Snapshot so a listener may (un)subscribe without deadlocking the bus
        let listeners: Vec<SharedListener> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();

        for listener in listeners {
            listener.lock().handle_event(event);
        }
    }

    pub fn emit(&self, level: &str, title: &str, args: Vec<Value>) {
        self.emit_event(&LogEvent::new(level, title, args));
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Default)]
    struct Recorder {
        events: Vec<LogEvent>,
    }

    impl LogListener for Recorder {
        fn handle_event(&mut self, event: &LogEvent) {
            self.events.push(event.clone());
        }
    }

    #[test]
    fn test_emit_reaches_subscribers_in_order() {
        let bus = LogBus::new();
        let recorder = Arc::new(Mutex::new(Recorder::default()));
        bus.subscribe(Arc::clone(&recorder));

        bus.emit("info", "one", vec![json!("a")]);
        bus.emit("warn", "two", vec![json!(1), json!({"k": "v"})]);

        let events = &recorder.lock().events;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].title, "one");
        assert_eq!(events[1].level, "warn");
        assert_eq!(events[1].args[1], json!({"k": "v"}));
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let bus = LogBus::new();
        let recorder = Arc::new(Mutex::new(Recorder::default()));
        let id = bus.subscribe(Arc::clone(&recorder));
        assert_eq!(bus.listener_count(), 1);

        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.emit("info", "", vec![]);

        assert_eq!(bus.listener_count(), 0);
        assert!(recorder.lock().events.is_empty());
    }

    #[test]
    fn test_flow_control_levels() {
        assert!(LogEvent::new("pause", "", vec![]).is_flow_control());
        assert!(LogEvent::new("resume", "", vec![]).is_flow_control());
        assert!(!LogEvent::new("silly", "", vec![]).is_flow_control());
    }

    #[test]
    fn test_event_deserializes_with_defaults() {
        let event: LogEvent = serde_json::from_str(r#"{ "level": "http" }"#).unwrap();
        assert_eq!(event.title, "");
        assert!(event.args.is_empty());
    }
}
