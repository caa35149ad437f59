//! Tests for api::events
//! Extracted from events.rs

use std::sync::{Arc, Mutex};

use dispatch_notify::api::*;
use dispatch_notify::network::ConnectionState;

struct CountingHandler {
    count: Arc<Mutex<u32>>,
}

impl EventHandler for CountingHandler {
    fn on_event(&self, _event: NotifyEvent) {
        *self.count.lock().unwrap() += 1;
    }
}

#[test]
fn test_dispatcher_starts_empty() {
    let dispatcher = EventDispatcher::new();
    assert_eq!(dispatcher.handler_count(), 0);

    // Dispatching with no handlers is fine
    dispatcher.dispatch(NotifyEvent::AllNotificationsRead);
}

#[test]
fn test_add_and_clear_handlers() {
    let mut dispatcher = EventDispatcher::new();
    let count = Arc::new(Mutex::new(0));
    dispatcher.add_handler(Arc::new(CountingHandler {
        count: count.clone(),
    }));
    assert_eq!(dispatcher.handler_count(), 1);

    dispatcher.clear_handlers();
    assert_eq!(dispatcher.handler_count(), 0);

    dispatcher.dispatch(NotifyEvent::NotificationsCleared);
    assert_eq!(*count.lock().unwrap(), 0);
}

#[test]
fn test_dispatch_reaches_all_handlers() {
    let mut dispatcher = EventDispatcher::new();
    let first = Arc::new(Mutex::new(0));
    let second = Arc::new(Mutex::new(0));
    dispatcher.add_handler(Arc::new(CountingHandler {
        count: first.clone(),
    }));
    dispatcher.add_handler(Arc::new(CountingHandler {
        count: second.clone(),
    }));

    dispatcher.dispatch(NotifyEvent::UnreadCountChanged { count: 3 });
    dispatcher.dispatch(NotifyEvent::ConnectionStateChanged {
        state: ConnectionState::Connecting,
    });

    assert_eq!(*first.lock().unwrap(), 2);
    assert_eq!(*second.lock().unwrap(), 2);
}

#[test]
fn test_callback_handler() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_in_callback = seen.clone();
    let handler = CallbackHandler::new(move |event| {
        if let NotifyEvent::NotificationRead { id } = event {
            seen_in_callback.lock().unwrap().push(id);
        }
    });

    handler.on_event(NotifyEvent::NotificationRead { id: "n-1".into() });
    handler.on_event(NotifyEvent::AllNotificationsRead);
    handler.on_event(NotifyEvent::NotificationRead { id: "n-2".into() });

    assert_eq!(*seen.lock().unwrap(), vec!["n-1", "n-2"]);
}

#[test]
fn test_events_are_cloneable() {
    let event = NotifyEvent::UnreadCountChanged { count: 7 };
    let copy = event.clone();
    assert!(matches!(copy, NotifyEvent::UnreadCountChanged { count: 7 }));
}
