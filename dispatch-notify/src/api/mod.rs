// SPDX-FileCopyrightText: 2026 DispatchTrack Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Notification API Layer
//!
//! High-level API for the real-time notification client.
//!
//! # Overview
//!
//! The API layer provides a clean, easy-to-use interface that coordinates:
//! - Broker connection lifecycle and reconnection
//! - Message classification
//! - The notification log with read/unread bookkeeping
//! - OS notification side effects
//! - Event handling
//!
//! # Example
//!
//! ```ignore
//! use dispatch_notify::api::{NotifyClient, NotifyConfig, NotifyEvent};
//! use dispatch_notify::alert::MockNotifier;
//! use dispatch_notify::network::MockTransport;
//!
//! let mut client = NotifyClient::with_transport(
//!     NotifyConfig::for_broker("ws://localhost:8087/ws"),
//!     MockTransport::new(),
//!     Box::new(MockNotifier::new(true)),
//! );
//!
//! client.on_event(|event| {
//!     if let NotifyEvent::NotificationReceived { notification } = event {
//!         println!("[{}] {}", notification.kind, notification.message);
//!     }
//! });
//!
//! client.connect("user-42")?;
//! loop {
//!     client.poll();
//! }
//! ```
//!
//! # Module Structure
//!
//! - [`error`] - Error types for the API layer
//! - [`config`] - Configuration types
//! - [`events`] - Event system for callbacks
//! - [`client`] - Main client orchestrator
//! - [`diagnostics`] - Backend test injection (feature-gated)

#[cfg(feature = "testing")]
pub mod client;
#[cfg(not(feature = "testing"))]
mod client;

#[cfg(feature = "testing")]
pub mod config;
#[cfg(not(feature = "testing"))]
mod config;

#[cfg(all(feature = "testing", feature = "diagnostics"))]
pub mod diagnostics;
#[cfg(all(not(feature = "testing"), feature = "diagnostics"))]
mod diagnostics;

#[cfg(feature = "testing")]
pub mod error;
#[cfg(not(feature = "testing"))]
mod error;

#[cfg(feature = "testing")]
pub mod events;
#[cfg(not(feature = "testing"))]
mod events;

// Error types
pub use error::{NotifyError, NotifyResult};

// Configuration
pub use config::{NotifyConfig, DEFAULT_BROKER_URL};

// Events
pub use events::{CallbackHandler, EventDispatcher, EventHandler, NotifyEvent};

// Client
pub use client::NotifyClient;

// Diagnostics
#[cfg(feature = "diagnostics")]
pub use diagnostics::{inject_notification, InjectRequest};
