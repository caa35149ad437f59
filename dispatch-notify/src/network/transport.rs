// SPDX-FileCopyrightText: 2026 DispatchTrack Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Transport Trait
//!
//! Platform-agnostic abstraction for the broker connection.

use super::error::NetworkError;
use super::frame::Frame;

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, NetworkError>;

/// Connection state, externally observable.
///
/// Exactly one value is active at any time; the connection manager is the
/// only component that transitions it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// Not connected to the broker.
    #[default]
    Disconnected,
    /// Connection or handshake in progress.
    Connecting,
    /// Handshake complete, subscriptions active.
    Connected,
}

/// Configuration for broker connections.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Broker URL (`ws://` or `wss://`).
    pub broker_url: String,
    /// Connection timeout in milliseconds.
    pub connect_timeout_ms: u64,
    /// Read/write timeout in milliseconds. Bounds the latency of a single
    /// poll cycle, so keep it short for interactive hosts.
    pub io_timeout_ms: u64,
    /// Maximum automatic reconnect attempts before giving up.
    pub max_reconnect_attempts: u32,
    /// Fixed delay between reconnect attempts (milliseconds).
    pub reconnect_delay_ms: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        TransportConfig {
            broker_url: String::new(),
            connect_timeout_ms: 10_000,
            io_timeout_ms: 1_000,
            max_reconnect_attempts: 5,
            reconnect_delay_ms: 3_000,
        }
    }
}

impl TransportConfig {
    /// Creates a config for the given broker URL with default tuning.
    pub fn for_broker(broker_url: &str) -> Self {
        TransportConfig {
            broker_url: broker_url.to_string(),
            ..Default::default()
        }
    }
}

/// Transport trait for broker communication.
///
/// Abstracts the underlying mechanism (WebSocket in production, a scripted
/// mock in tests). The transport moves frames; it holds no notification
/// semantics and no retry policy - failures are returned as values for the
/// connection manager to act on.
///
/// # Synchronous Interface
///
/// Methods block for at most the configured I/O timeout. `receive` returns
/// `Ok(None)` when no frame is available within the timeout.
pub trait Transport: Send {
    /// Opens the connection to the broker.
    fn connect(&mut self, config: &TransportConfig) -> TransportResult<()>;

    /// Closes the connection.
    ///
    /// Safe to call even if not connected.
    fn disconnect(&mut self) -> TransportResult<()>;

    /// Returns the current transport-level connection state.
    fn state(&self) -> ConnectionState;

    /// Sends a frame to the broker.
    fn send(&mut self, frame: &Frame) -> TransportResult<()>;

    /// Receives the next frame from the broker.
    ///
    /// Returns `Ok(None)` if no frame is available (timeout without error).
    fn receive(&mut self) -> TransportResult<Option<Frame>>;

    /// Checks if there are pending frames to receive (non-blocking).
    fn has_pending(&self) -> bool;
}
