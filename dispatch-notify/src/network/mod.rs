// SPDX-FileCopyrightText: 2026 DispatchTrack Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Network + Transport Layer
//!
//! Provides the broker transport abstraction, the frame codec, and the
//! connection manager that keeps a user session alive across network flaps
//! and broker restarts.
//!
//! # Architecture
//!
//! - **Transport trait**: platform-agnostic interface for broker I/O
//! - **Frame codec**: STOMP-style frame encoding and parsing
//! - **Connection manager**: handshake, declarative re-subscription, and
//!   bounded fixed-interval reconnect
//!
//! # Example
//!
//! ```ignore
//! use dispatch_notify::network::{ConnectionManager, MockTransport, TransportConfig};
//!
//! let config = TransportConfig::for_broker("ws://localhost:8087/ws");
//! let mut conn = ConnectionManager::new(MockTransport::new(), config);
//! conn.connect("user-42")?;
//! for frame in conn.poll() {
//!     println!("{}: {}", frame.destination, frame.body);
//! }
//! ```

#[cfg(feature = "testing")]
pub mod connection;
#[cfg(not(feature = "testing"))]
mod connection;

#[cfg(feature = "testing")]
pub mod error;
#[cfg(not(feature = "testing"))]
mod error;

#[cfg(feature = "testing")]
pub mod frame;
#[cfg(not(feature = "testing"))]
mod frame;

#[cfg(feature = "testing")]
pub mod mock;
#[cfg(not(feature = "testing"))]
mod mock;

#[cfg(feature = "testing")]
pub mod transport;
#[cfg(not(feature = "testing"))]
mod transport;

#[cfg(all(
    feature = "testing",
    any(feature = "network-native-tls", feature = "network-rustls")
))]
pub mod websocket;
#[cfg(all(
    not(feature = "testing"),
    any(feature = "network-native-tls", feature = "network-rustls")
))]
mod websocket;

// Error types
pub use error::NetworkError;

// Frame codec
pub use frame::{Frame, FrameCommand};

// Transport abstraction
pub use transport::{ConnectionState, Transport, TransportConfig, TransportResult};

// Mock transport for testing
pub use mock::MockTransport;

// WebSocket transport for production
#[cfg(any(feature = "network-native-tls", feature = "network-rustls"))]
pub use websocket::WebSocketTransport;

// Connection management
pub use connection::{canonical_destinations, ConnectionManager, InboundFrame, BROADCAST_TOPIC};
