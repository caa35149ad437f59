// SPDX-FileCopyrightText: 2026 DispatchTrack Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Event System
//!
//! Callbacks for notification client events.

use std::sync::Arc;

use crate::network::ConnectionState;
use crate::store::Notification;

/// Events emitted by the notification client.
#[derive(Debug, Clone)]
pub enum NotifyEvent {
    /// Network connection state changed.
    ConnectionStateChanged {
        /// The new connection state.
        state: ConnectionState,
    },

    /// A notification was received and stored.
    NotificationReceived {
        /// The stored notification.
        notification: Notification,
    },

    /// A single notification was marked as read.
    NotificationRead {
        /// The notification ID.
        id: String,
    },

    /// All notifications were marked as read.
    AllNotificationsRead,

    /// The notification log was cleared.
    NotificationsCleared,

    /// The unread count changed.
    UnreadCountChanged {
        /// The new unread count.
        count: usize,
    },
}

/// Event handler trait.
///
/// Implement this trait to receive client events.
pub trait EventHandler: Send + Sync {
    /// Called when an event occurs.
    fn on_event(&self, event: NotifyEvent);
}

/// Simple callback-based event handler.
///
/// Wraps a closure for easy event handling.
pub struct CallbackHandler<F>
where
    F: Fn(NotifyEvent) + Send + Sync,
{
    callback: F,
}

impl<F> CallbackHandler<F>
where
    F: Fn(NotifyEvent) + Send + Sync,
{
    /// Creates a new callback handler.
    pub fn new(callback: F) -> Self {
        CallbackHandler { callback }
    }
}

impl<F> EventHandler for CallbackHandler<F>
where
    F: Fn(NotifyEvent) + Send + Sync,
{
    fn on_event(&self, event: NotifyEvent) {
        (self.callback)(event);
    }
}

/// Event dispatcher for managing multiple handlers.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn EventHandler>>,
}

impl EventDispatcher {
    /// Creates a new event dispatcher.
    pub fn new() -> Self {
        EventDispatcher {
            handlers: Vec::new(),
        }
    }

    /// Adds an event handler.
    pub fn add_handler(&mut self, handler: Arc<dyn EventHandler>) {
        self.handlers.push(handler);
    }

    /// Removes all handlers.
    pub fn clear_handlers(&mut self) {
        self.handlers.clear();
    }

    /// Returns the number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Dispatches an event to all handlers.
    pub fn dispatch(&self, event: NotifyEvent) {
        for handler in &self.handlers {
            handler.on_event(event.clone());
        }
    }
}
