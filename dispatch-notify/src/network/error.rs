// SPDX-FileCopyrightText: 2026 DispatchTrack Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Network Error Types

use thiserror::Error;

/// Errors from the transport layer and the broker protocol.
#[derive(Error, Debug)]
pub enum NetworkError {
    /// Failed to establish a connection.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The connection was closed by the peer.
    #[error("connection closed")]
    ConnectionClosed,

    /// Operation requires an open connection.
    #[error("not connected")]
    NotConnected,

    /// Sending a frame failed.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// Receiving a frame failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(String),

    /// An inbound frame could not be parsed.
    #[error("invalid frame: {0}")]
    InvalidFrame(String),

    /// A connect was requested with an empty user identifier.
    #[error("user id must not be empty")]
    InvalidUserId,
}
