// SPDX-FileCopyrightText: 2026 DispatchTrack Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Connection Manager
//!
//! Drives the connection state machine: handshake, declarative
//! re-subscription after every successful connect, and fixed-interval
//! reconnect with a bounded attempt counter.
//!
//! The manager is host-driven: call [`ConnectionManager::poll`] from the
//! application's event loop to fire due reconnect timers and drain inbound
//! frames. Transport failures never escape to the caller; they feed the
//! retry policy and end in a well-defined `Disconnected` state.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::error::NetworkError;
use super::frame::{Frame, FrameCommand};
use super::transport::{ConnectionState, Transport, TransportConfig, TransportResult};

/// Per-user queue suffixes, subscribed for every session.
const USER_QUEUES: [&str; 5] = ["notifications", "driver", "updates", "tracking", "payments"];

/// Shared broadcast destination, subscribed alongside the user queues.
pub const BROADCAST_TOPIC: &str = "/topic/driver-notifications";

/// Returns the full canonical subscription set for a user.
///
/// The set is re-derived on every successful connect; the manager never
/// assumes prior subscription state survived a reconnect.
pub fn canonical_destinations(user_id: &str) -> Vec<String> {
    let mut destinations: Vec<String> = USER_QUEUES
        .iter()
        .map(|queue| format!("/user/{}/queue/{}", user_id, queue))
        .collect();
    destinations.push(BROADCAST_TOPIC.to_string());
    destinations
}

/// A payload frame routed off an active subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundFrame {
    /// The destination the frame was delivered on.
    pub destination: String,
    /// Raw UTF-8 frame body.
    pub body: String,
}

/// Connection manager with handshake and bounded fixed-interval reconnect.
///
/// # Example
///
/// ```ignore
/// use dispatch_notify::network::{ConnectionManager, MockTransport, TransportConfig};
///
/// let config = TransportConfig::for_broker("ws://localhost:8087/ws");
/// let mut conn = ConnectionManager::new(MockTransport::new(), config);
/// conn.connect("user-42")?;
/// loop {
///     for frame in conn.poll() {
///         println!("{}: {}", frame.destination, frame.body);
///     }
/// }
/// ```
pub struct ConnectionManager<T: Transport> {
    transport: T,
    config: TransportConfig,
    state: ConnectionState,
    user_id: Option<String>,
    reconnect_attempts: u32,
    /// Deadline of the single scheduled reconnect, if any. Clearing it is
    /// cancellation: a cleared timer can never fire.
    reconnect_due: Option<Instant>,
    /// Active subscription tokens mapped to their destinations. Cleared
    /// before every re-subscription, so frames for tokens issued by an
    /// earlier session are dropped instead of delivered twice.
    subscriptions: HashMap<String, String>,
    next_token: u64,
}

impl<T: Transport> ConnectionManager<T> {
    /// Creates a new connection manager in the `Disconnected` state.
    pub fn new(transport: T, config: TransportConfig) -> Self {
        ConnectionManager {
            transport,
            config,
            state: ConnectionState::Disconnected,
            user_id: None,
            reconnect_attempts: 0,
            reconnect_due: None,
            subscriptions: HashMap::new(),
            next_token: 0,
        }
    }

    /// Starts a connection attempt for the given user.
    ///
    /// No-op when already `Connecting` or `Connected` (only one attempt is
    /// ever in flight). A transport failure here is not an error for the
    /// caller - the retry policy takes over. The only rejection is an
    /// empty user id, which leaves the state machine untouched.
    pub fn connect(&mut self, user_id: &str) -> TransportResult<()> {
        if user_id.trim().is_empty() {
            return Err(NetworkError::InvalidUserId);
        }
        match self.state {
            ConnectionState::Connecting | ConnectionState::Connected => Ok(()),
            ConnectionState::Disconnected => {
                self.user_id = Some(user_id.to_string());
                self.reconnect_due = None;
                self.begin_attempt(Instant::now());
                Ok(())
            }
        }
    }

    /// Tears down the connection and forces `Disconnected`.
    ///
    /// Cancels any pending reconnect timer, discards the subscription set,
    /// and never schedules a retry. Idempotent.
    pub fn disconnect(&mut self) {
        self.reconnect_due = None;
        self.subscriptions.clear();
        if self.state == ConnectionState::Connected {
            let _ = self.transport.send(&Frame::disconnect());
        }
        let _ = self.transport.disconnect();
        self.state = ConnectionState::Disconnected;
    }

    /// Fires due timers and drains inbound frames.
    pub fn poll(&mut self) -> Vec<InboundFrame> {
        self.poll_at(Instant::now())
    }

    /// Like [`poll`](Self::poll), with an explicit clock reading.
    pub fn poll_at(&mut self, now: Instant) -> Vec<InboundFrame> {
        if self.state == ConnectionState::Disconnected {
            if let Some(due) = self.reconnect_due {
                if now >= due {
                    self.reconnect_due = None;
                    self.begin_attempt(now);
                }
            }
        }

        let mut inbound = Vec::new();
        while self.state != ConnectionState::Disconnected {
            match self.transport.receive() {
                Ok(Some(frame)) => {
                    if let Some(routed) = self.route_frame(frame, now) {
                        inbound.push(routed);
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    log::warn!("transport error: {}", err);
                    self.handle_failure(now);
                    break;
                }
            }
        }
        inbound
    }

    /// Returns the current connection state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Returns true if the handshake completed and subscriptions are active.
    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    /// The user this manager is (re)connecting for, if any.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Consecutive failed attempts since the last successful connect.
    pub fn reconnect_attempts(&self) -> u32 {
        self.reconnect_attempts
    }

    /// Returns true if a reconnect is scheduled.
    pub fn reconnect_pending(&self) -> bool {
        self.reconnect_due.is_some()
    }

    /// Destinations with an active subscription, sorted.
    pub fn active_subscriptions(&self) -> Vec<String> {
        let mut destinations: Vec<String> = self.subscriptions.values().cloned().collect();
        destinations.sort();
        destinations
    }

    /// Returns a reference to the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns a mutable reference to the underlying transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Opens the transport and sends the handshake frame.
    ///
    /// Leaves the state machine `Connecting`; the transition to `Connected`
    /// happens when the broker's CONNECTED frame arrives via `poll`.
    fn begin_attempt(&mut self, now: Instant) {
        let Some(user_id) = self.user_id.clone() else {
            return;
        };
        self.state = ConnectionState::Connecting;

        let opened = self
            .transport
            .connect(&self.config)
            .and_then(|()| {
                self.transport
                    .send(&Frame::connect(&self.config.broker_url, &user_id))
            });
        if let Err(err) = opened {
            log::warn!("broker connect failed: {}", err);
            self.handle_failure(now);
        }
    }

    /// Routes one inbound frame; returns a payload frame for the caller.
    fn route_frame(&mut self, frame: Frame, now: Instant) -> Option<InboundFrame> {
        match frame.command {
            FrameCommand::Connected => {
                if self.state == ConnectionState::Connecting {
                    self.state = ConnectionState::Connected;
                    self.reconnect_attempts = 0;
                    self.reconnect_due = None;
                    self.resubscribe(now);
                }
                None
            }
            FrameCommand::Message => {
                let token = frame.header("subscription")?;
                let destination = self.subscriptions.get(token).cloned();
                if destination.is_none() {
                    // Token from a previous session; registration was
                    // discarded on reconnect.
                    log::debug!("dropping frame for stale subscription {}", token);
                }
                destination.map(|destination| InboundFrame {
                    destination,
                    body: frame.body,
                })
            }
            FrameCommand::Error => {
                log::warn!(
                    "broker error: {}",
                    frame.header("message").unwrap_or("unspecified")
                );
                self.handle_failure(now);
                None
            }
            _ => None,
        }
    }

    /// Discards prior registrations and issues the full canonical set.
    fn resubscribe(&mut self, now: Instant) {
        self.subscriptions.clear();
        let Some(user_id) = self.user_id.clone() else {
            return;
        };
        for destination in canonical_destinations(&user_id) {
            let token = format!("sub-{}", self.next_token);
            self.next_token += 1;
            if let Err(err) = self.transport.send(&Frame::subscribe(&token, &destination)) {
                log::warn!("subscribe to {} failed: {}", destination, err);
                self.handle_failure(now);
                return;
            }
            self.subscriptions.insert(token, destination);
        }
    }

    /// Transitions to `Disconnected` and schedules one retry if the attempt
    /// counter has not reached its bound.
    fn handle_failure(&mut self, now: Instant) {
        let _ = self.transport.disconnect();
        self.subscriptions.clear();
        self.state = ConnectionState::Disconnected;

        if self.reconnect_attempts < self.config.max_reconnect_attempts {
            self.reconnect_attempts += 1;
            self.reconnect_due = Some(now + Duration::from_millis(self.config.reconnect_delay_ms));
            log::info!(
                "reconnect attempt {}/{} scheduled in {} ms",
                self.reconnect_attempts,
                self.config.max_reconnect_attempts,
                self.config.reconnect_delay_ms
            );
        } else {
            self.reconnect_due = None;
            log::warn!(
                "giving up after {} reconnect attempts; explicit connect required",
                self.reconnect_attempts
            );
        }
    }
}

// INLINE_TEST_REQUIRED: Tests private reconnect_due/reconnect_attempts fields
// and internal state transitions
#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::mock::MockTransport;

    fn test_config() -> TransportConfig {
        TransportConfig {
            broker_url: "ws://localhost:8087/ws".into(),
            max_reconnect_attempts: 5,
            reconnect_delay_ms: 3_000,
            ..Default::default()
        }
    }

    fn connected_manager(user_id: &str) -> ConnectionManager<MockTransport> {
        let mut transport = MockTransport::new();
        transport.queue_receive(Frame::connected());
        let mut conn = ConnectionManager::new(transport, test_config());
        conn.connect(user_id).unwrap();
        conn.poll_at(Instant::now());
        assert!(conn.is_connected());
        conn
    }

    #[test]
    fn test_connect_sends_handshake() {
        let mut conn = ConnectionManager::new(MockTransport::new(), test_config());
        conn.connect("user-1").unwrap();

        assert_eq!(conn.state(), ConnectionState::Connecting);
        let sent = conn.transport().sent_frames();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].command, FrameCommand::Connect);
        assert_eq!(sent[0].header("login"), Some("user-1"));
    }

    #[test]
    fn test_connected_frame_completes_handshake_and_subscribes() {
        let conn = connected_manager("user-1");

        // CONNECT + 6 SUBSCRIBE frames
        let sent = conn.transport().sent_frames();
        assert_eq!(sent.len(), 7);
        let destinations = conn.active_subscriptions();
        assert_eq!(destinations, {
            let mut expected = canonical_destinations("user-1");
            expected.sort();
            expected
        });
    }

    #[test]
    fn test_connect_empty_user_id_rejected() {
        let mut conn = ConnectionManager::new(MockTransport::new(), test_config());
        assert!(matches!(conn.connect(""), Err(NetworkError::InvalidUserId)));
        assert!(matches!(
            conn.connect("   "),
            Err(NetworkError::InvalidUserId)
        ));
        assert_eq!(conn.state(), ConnectionState::Disconnected);
    }

    #[test]
    fn test_connect_is_noop_while_connecting() {
        let mut conn = ConnectionManager::new(MockTransport::new(), test_config());
        conn.connect("user-1").unwrap();
        conn.connect("user-1").unwrap();

        // Still exactly one handshake frame, one transport connect
        assert_eq!(conn.transport().sent_frames().len(), 1);
        assert_eq!(conn.transport().connect_count(), 1);
    }

    #[test]
    fn test_failed_connect_schedules_retry() {
        let mut transport = MockTransport::new();
        transport.fail_connects(1);
        let mut conn = ConnectionManager::new(transport, test_config());

        conn.connect("user-1").unwrap();
        assert_eq!(conn.state(), ConnectionState::Disconnected);
        assert_eq!(conn.reconnect_attempts(), 1);
        assert!(conn.reconnect_pending());
    }

    #[test]
    fn test_retry_fires_when_due() {
        let mut transport = MockTransport::new();
        transport.fail_connects(1);
        transport.queue_receive(Frame::connected());
        let mut conn = ConnectionManager::new(transport, test_config());
        let start = Instant::now();

        conn.connect("user-1").unwrap();
        assert!(conn.reconnect_pending());

        // Before the deadline nothing happens
        conn.poll_at(start);
        assert_eq!(conn.state(), ConnectionState::Disconnected);

        // After the deadline the retry runs and completes the handshake
        conn.poll_at(start + Duration::from_secs(4));
        assert!(conn.is_connected());
        assert_eq!(conn.reconnect_attempts(), 0);
    }

    #[test]
    fn test_reconnect_bound_reached() {
        let mut transport = MockTransport::new();
        transport.fail_connects(10);
        let mut conn = ConnectionManager::new(transport, test_config());
        let start = Instant::now();

        conn.connect("user-1").unwrap();
        for i in 1..=5 {
            assert_eq!(conn.reconnect_attempts(), i);
            conn.poll_at(start + Duration::from_secs(4 * u64::from(i)));
        }

        // Counter at the bound, no further timer
        assert_eq!(conn.reconnect_attempts(), 5);
        assert!(!conn.reconnect_pending());
        assert_eq!(conn.state(), ConnectionState::Disconnected);

        // Stays put no matter how often we poll
        conn.poll_at(start + Duration::from_secs(3600));
        assert_eq!(conn.state(), ConnectionState::Disconnected);
    }

    #[test]
    fn test_explicit_connect_after_exhaustion() {
        let mut transport = MockTransport::new();
        transport.fail_connects(10);
        let mut conn = ConnectionManager::new(transport, test_config());
        let start = Instant::now();

        conn.connect("user-1").unwrap();
        for i in 1..=5u64 {
            conn.poll_at(start + Duration::from_secs(4 * i));
        }
        assert!(!conn.reconnect_pending());

        conn.transport_mut().queue_receive(Frame::connected());
        conn.connect("user-1").unwrap();
        conn.poll_at(Instant::now());
        assert!(conn.is_connected());
    }

    #[test]
    fn test_disconnect_cancels_pending_retry() {
        let mut transport = MockTransport::new();
        transport.fail_connects(1);
        let mut conn = ConnectionManager::new(transport, test_config());
        let start = Instant::now();

        conn.connect("user-1").unwrap();
        assert!(conn.reconnect_pending());

        conn.disconnect();
        assert!(!conn.reconnect_pending());

        // A long-past deadline must not fire after an explicit disconnect
        conn.poll_at(start + Duration::from_secs(3600));
        assert_eq!(conn.state(), ConnectionState::Disconnected);
        assert_eq!(conn.transport().connect_count(), 0);
    }

    #[test]
    fn test_disconnect_idempotent() {
        let mut conn = connected_manager("user-1");
        conn.disconnect();
        conn.disconnect();
        assert_eq!(conn.state(), ConnectionState::Disconnected);
        assert!(conn.active_subscriptions().is_empty());
    }

    #[test]
    fn test_message_routed_by_token() {
        let mut conn = connected_manager("user-1");

        let token = conn
            .subscriptions
            .iter()
            .find(|(_, d)| d.as_str() == "/user/user-1/queue/notifications")
            .map(|(t, _)| t.clone())
            .unwrap();
        conn.transport_mut().queue_receive(Frame::message(
            &token,
            "/user/user-1/queue/notifications",
            "ride accepted",
        ));

        let inbound = conn.poll_at(Instant::now());
        assert_eq!(inbound.len(), 1);
        assert_eq!(inbound[0].destination, "/user/user-1/queue/notifications");
        assert_eq!(inbound[0].body, "ride accepted");
    }

    #[test]
    fn test_stale_token_dropped_after_reconnect() {
        let mut conn = connected_manager("user-1");
        let stale_token = conn.subscriptions.keys().next().unwrap().clone();

        // Drop the connection, then reconnect with a fresh handshake
        conn.transport_mut().fail_next_receive();
        conn.poll_at(Instant::now());
        assert_eq!(conn.state(), ConnectionState::Disconnected);

        conn.transport_mut().queue_receive(Frame::connected());
        conn.poll_at(Instant::now() + Duration::from_secs(4));
        assert!(conn.is_connected());

        // The old token is gone; a frame for it is dropped, not delivered
        assert!(!conn.subscriptions.contains_key(&stale_token));
        conn.transport_mut().queue_receive(Frame::message(
            &stale_token,
            "/user/user-1/queue/notifications",
            "duplicate delivery",
        ));
        let inbound = conn.poll_at(Instant::now());
        assert!(inbound.is_empty());
    }

    #[test]
    fn test_resubscription_set_is_exact_after_cycles() {
        let mut conn = connected_manager("user-1");

        for _ in 0..3 {
            conn.disconnect();
            conn.transport_mut().queue_receive(Frame::connected());
            conn.connect("user-1").unwrap();
            conn.poll_at(Instant::now());
            assert!(conn.is_connected());

            let mut expected = canonical_destinations("user-1");
            expected.sort();
            assert_eq!(conn.active_subscriptions(), expected);
            assert_eq!(conn.subscriptions.len(), 6);
        }
    }

    #[test]
    fn test_broker_error_frame_triggers_retry() {
        let mut conn = connected_manager("user-1");
        conn.transport_mut()
            .queue_receive(Frame::error("broker going down"));

        conn.poll_at(Instant::now());
        assert_eq!(conn.state(), ConnectionState::Disconnected);
        assert_eq!(conn.reconnect_attempts(), 1);
        assert!(conn.reconnect_pending());
    }

    #[test]
    fn test_counter_resets_on_success() {
        let mut transport = MockTransport::new();
        transport.fail_connects(3);
        transport.queue_receive(Frame::connected());
        let mut conn = ConnectionManager::new(transport, test_config());
        let start = Instant::now();

        conn.connect("user-1").unwrap();
        conn.poll_at(start + Duration::from_secs(4));
        conn.poll_at(start + Duration::from_secs(8));
        assert_eq!(conn.reconnect_attempts(), 3);

        conn.poll_at(start + Duration::from_secs(12));
        assert!(conn.is_connected());
        assert_eq!(conn.reconnect_attempts(), 0);
    }

    #[test]
    fn test_canonical_destinations() {
        let destinations = canonical_destinations("abc");
        assert_eq!(destinations.len(), 6);
        assert!(destinations.contains(&"/user/abc/queue/notifications".to_string()));
        assert!(destinations.contains(&"/user/abc/queue/payments".to_string()));
        assert_eq!(destinations.last().map(String::as_str), Some(BROADCAST_TOPIC));
    }
}
