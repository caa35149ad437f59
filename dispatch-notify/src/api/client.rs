// SPDX-FileCopyrightText: 2026 DispatchTrack Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Notification Client
//!
//! Main orchestrator: owns the connection manager, the notification store,
//! the alert dispatcher, and the event dispatcher, and wires the receive
//! pipeline between them. All mutation flows through `&mut self`; the host
//! drives progress by calling [`NotifyClient::poll`] from its event loop.

use std::sync::Arc;
use std::time::Instant;

use crate::alert::{AlertDispatcher, SystemNotifier};
use crate::api::config::NotifyConfig;
use crate::api::error::{NotifyError, NotifyResult};
use crate::api::events::{CallbackHandler, EventDispatcher, EventHandler, NotifyEvent};
use crate::classify::{classify, parse_payload};
use crate::network::{ConnectionManager, ConnectionState, NetworkError, Transport};
use crate::store::{Notification, NotificationStore};

#[cfg(any(feature = "network-native-tls", feature = "network-rustls"))]
use crate::network::WebSocketTransport;

/// High-level notification client.
///
/// # Example
///
/// ```ignore
/// use dispatch_notify::api::{NotifyClient, NotifyConfig, NotifyEvent};
/// use dispatch_notify::alert::MockNotifier;
/// use dispatch_notify::network::MockTransport;
///
/// let mut client = NotifyClient::with_transport(
///     NotifyConfig::default(),
///     MockTransport::new(),
///     Box::new(MockNotifier::new(true)),
/// );
/// client.on_event(|event| println!("{:?}", event));
/// client.connect("user-42")?;
/// loop {
///     client.poll();
/// }
/// ```
pub struct NotifyClient<T: Transport> {
    connection: ConnectionManager<T>,
    store: NotificationStore,
    alerts: AlertDispatcher,
    events: EventDispatcher,
    /// Last state published to handlers; events fire on net change only.
    last_state: ConnectionState,
    #[cfg_attr(not(feature = "diagnostics"), allow(dead_code))]
    inject_url: Option<String>,
    #[cfg_attr(not(feature = "diagnostics"), allow(dead_code))]
    inject_token: Option<String>,
}

#[cfg(any(feature = "network-native-tls", feature = "network-rustls"))]
impl NotifyClient<WebSocketTransport> {
    /// Creates a client over a real WebSocket transport.
    pub fn open(config: NotifyConfig, notifier: Box<dyn SystemNotifier>) -> Self {
        Self::with_transport(config, WebSocketTransport::new(), notifier)
    }
}

impl<T: Transport> NotifyClient<T> {
    /// Creates a client over the given transport and notifier backend.
    pub fn with_transport(
        config: NotifyConfig,
        transport: T,
        notifier: Box<dyn SystemNotifier>,
    ) -> Self {
        NotifyClient {
            connection: ConnectionManager::new(transport, config.transport),
            store: NotificationStore::new(config.log_cap),
            alerts: AlertDispatcher::new(notifier),
            events: EventDispatcher::new(),
            last_state: ConnectionState::Disconnected,
            inject_url: config.inject_url,
            inject_token: config.inject_token,
        }
    }

    /// Registers an event handler.
    pub fn add_event_handler(&mut self, handler: Arc<dyn EventHandler>) {
        self.events.add_handler(handler);
    }

    /// Registers a closure as an event handler.
    pub fn on_event<F>(&mut self, callback: F)
    where
        F: Fn(NotifyEvent) + Send + Sync + 'static,
    {
        self.events.add_handler(Arc::new(CallbackHandler::new(callback)));
    }

    /// Starts connecting for the given user.
    ///
    /// No-op when a session is already connecting or connected. Rejects an
    /// empty user id without touching the connection.
    pub fn connect(&mut self, user_id: &str) -> NotifyResult<()> {
        match self.connection.connect(user_id) {
            Ok(()) => {
                self.publish_state();
                Ok(())
            }
            Err(NetworkError::InvalidUserId) => Err(NotifyError::InvalidArgument(
                "user id must not be empty".to_string(),
            )),
            Err(err) => Err(err.into()),
        }
    }

    /// Disconnects and cancels any pending reconnect. Idempotent.
    pub fn disconnect(&mut self) {
        self.connection.disconnect();
        self.publish_state();
    }

    /// Drives the receive pipeline: fires due reconnect timers, drains
    /// inbound frames through classification into the store, raises alerts,
    /// and publishes events. Returns the number of notifications stored.
    pub fn poll(&mut self) -> usize {
        self.poll_at(Instant::now())
    }

    /// Like [`poll`](Self::poll), with an explicit clock reading.
    pub fn poll_at(&mut self, now: Instant) -> usize {
        let frames = self.connection.poll_at(now);
        let stored = frames.len();
        for frame in frames {
            let classified = classify(&parse_payload(&frame.body));
            let notification = self.store.append(classified);
            self.alerts.dispatch(&notification);
            self.events
                .dispatch(NotifyEvent::NotificationReceived { notification });
            self.events.dispatch(NotifyEvent::UnreadCountChanged {
                count: self.store.unread_count(),
            });
        }
        self.publish_state();
        stored
    }

    /// Marks a notification as read.
    ///
    /// Events fire only when an unread entry was actually marked; an absent
    /// id or an already-read entry is a silent no-op.
    pub fn mark_as_read(&mut self, id: &str) -> bool {
        if self.store.mark_as_read(id) {
            self.events.dispatch(NotifyEvent::NotificationRead {
                id: id.to_string(),
            });
            self.events.dispatch(NotifyEvent::UnreadCountChanged {
                count: self.store.unread_count(),
            });
            true
        } else {
            false
        }
    }

    /// Marks every notification as read. Returns the number newly marked.
    pub fn mark_all_as_read(&mut self) -> usize {
        let marked = self.store.mark_all_as_read();
        if marked > 0 {
            self.events.dispatch(NotifyEvent::AllNotificationsRead);
            self.events
                .dispatch(NotifyEvent::UnreadCountChanged { count: 0 });
        }
        marked
    }

    /// Empties the notification log. Returns the number of entries removed.
    pub fn clear_all(&mut self) -> usize {
        let had_unread = self.store.unread_count() > 0;
        let removed = self.store.clear_all();
        if removed > 0 {
            self.events.dispatch(NotifyEvent::NotificationsCleared);
            if had_unread {
                self.events
                    .dispatch(NotifyEvent::UnreadCountChanged { count: 0 });
            }
        }
        removed
    }

    /// Requests OS notification permission once; the answer is cached.
    pub fn request_permission(&mut self) -> bool {
        self.alerts.request_permission()
    }

    /// Current connection state.
    pub fn connection_state(&self) -> ConnectionState {
        self.connection.state()
    }

    /// Returns true if the session is connected and subscribed.
    pub fn is_connected(&self) -> bool {
        self.connection.is_connected()
    }

    /// Snapshot of the notification log, newest first.
    pub fn notifications(&self) -> Vec<Notification> {
        self.store.snapshot()
    }

    /// Looks up a stored notification by id.
    pub fn notification(&self, id: &str) -> Option<Notification> {
        self.store.get(id).cloned()
    }

    /// Count of unread notifications.
    pub fn unread_count(&self) -> usize {
        self.store.unread_count()
    }

    /// Returns a reference to the connection manager.
    pub fn connection(&self) -> &ConnectionManager<T> {
        &self.connection
    }

    /// Returns a mutable reference to the connection manager.
    pub fn connection_mut(&mut self) -> &mut ConnectionManager<T> {
        &mut self.connection
    }

    /// Posts a diagnostic test notification to the configured backend.
    ///
    /// The backend relays it back through the broker; the notification then
    /// arrives via `poll` like any other.
    #[cfg(feature = "diagnostics")]
    pub fn inject_test_notification(
        &self,
        request: &crate::api::diagnostics::InjectRequest,
    ) -> NotifyResult<()> {
        let base_url = self.inject_url.as_deref().ok_or_else(|| {
            NotifyError::Configuration("no diagnostics injection endpoint configured".to_string())
        })?;
        crate::api::diagnostics::inject_notification(base_url, self.inject_token.as_deref(), request)
    }

    /// Publishes a state change event if the state differs from the last
    /// published one. Intermediate flaps inside a single call collapse.
    fn publish_state(&mut self) {
        let state = self.connection.state();
        if state != self.last_state {
            self.last_state = state;
            self.events
                .dispatch(NotifyEvent::ConnectionStateChanged { state });
        }
    }
}
