// SPDX-FileCopyrightText: 2026 DispatchTrack Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Mock Transport
//!
//! Scripted in-memory transport for tests: queue inbound frames, record
//! outbound frames, and inject connect/receive failures.

use std::collections::VecDeque;

use super::error::NetworkError;
use super::frame::Frame;
use super::transport::{ConnectionState, Transport, TransportConfig, TransportResult};

/// In-memory transport for testing.
#[derive(Default)]
pub struct MockTransport {
    state: ConnectionState,
    sent: Vec<Frame>,
    incoming: VecDeque<Frame>,
    /// Number of upcoming `connect` calls that fail.
    fail_connects: u32,
    /// When set, the next `receive` call fails with `ConnectionClosed`.
    fail_next_receive: bool,
    /// Total successful `connect` calls, for attempt counting in tests.
    connect_count: u32,
}

impl MockTransport {
    /// Creates a disconnected mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a frame to be returned by a future `receive` call.
    pub fn queue_receive(&mut self, frame: Frame) {
        self.incoming.push_back(frame);
    }

    /// Makes the next `count` connect attempts fail.
    pub fn fail_connects(&mut self, count: u32) {
        self.fail_connects = count;
    }

    /// Makes the next receive call fail with `ConnectionClosed`.
    pub fn fail_next_receive(&mut self) {
        self.fail_next_receive = true;
    }

    /// Frames sent through this transport, in order.
    pub fn sent_frames(&self) -> &[Frame] {
        &self.sent
    }

    /// Clears the sent-frame record.
    pub fn clear_sent(&mut self) {
        self.sent.clear();
    }

    /// Number of successful connect calls so far.
    pub fn connect_count(&self) -> u32 {
        self.connect_count
    }

    /// Forces the transport-level state (to simulate a dropped socket).
    pub fn set_state(&mut self, state: ConnectionState) {
        self.state = state;
    }
}

impl Transport for MockTransport {
    fn connect(&mut self, _config: &TransportConfig) -> TransportResult<()> {
        if self.fail_connects > 0 {
            self.fail_connects -= 1;
            self.state = ConnectionState::Disconnected;
            return Err(NetworkError::ConnectionFailed("scripted failure".into()));
        }
        self.state = ConnectionState::Connected;
        self.connect_count += 1;
        Ok(())
    }

    fn disconnect(&mut self) -> TransportResult<()> {
        self.state = ConnectionState::Disconnected;
        Ok(())
    }

    fn state(&self) -> ConnectionState {
        self.state
    }

    fn send(&mut self, frame: &Frame) -> TransportResult<()> {
        if self.state != ConnectionState::Connected {
            return Err(NetworkError::NotConnected);
        }
        self.sent.push(frame.clone());
        Ok(())
    }

    fn receive(&mut self) -> TransportResult<Option<Frame>> {
        if self.state != ConnectionState::Connected {
            return Err(NetworkError::NotConnected);
        }
        if self.fail_next_receive {
            self.fail_next_receive = false;
            self.state = ConnectionState::Disconnected;
            return Err(NetworkError::ConnectionClosed);
        }
        Ok(self.incoming.pop_front())
    }

    fn has_pending(&self) -> bool {
        !self.incoming.is_empty()
    }
}
