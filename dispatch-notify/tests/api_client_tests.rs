//! Tests for api::client
//! End-to-end pipeline scenarios over the mock transport.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use dispatch_notify::alert::MockNotifier;
use dispatch_notify::api::*;
use dispatch_notify::network::{ConnectionState, Frame, MockTransport};

fn new_client(config: NotifyConfig) -> NotifyClient<MockTransport> {
    NotifyClient::with_transport(config, MockTransport::new(), Box::new(MockNotifier::new(true)))
}

fn complete_handshake(client: &mut NotifyClient<MockTransport>, user_id: &str) {
    client
        .connection_mut()
        .transport_mut()
        .queue_receive(Frame::connected());
    client.connect(user_id).unwrap();
    client.poll();
    assert!(client.is_connected());
}

fn deliver(client: &mut NotifyClient<MockTransport>, destination: &str, body: &str) {
    let token = client
        .connection()
        .transport()
        .sent_frames()
        .iter()
        .find(|f| f.header("destination") == Some(destination))
        .and_then(|f| f.header("id").map(String::from))
        .unwrap();
    client
        .connection_mut()
        .transport_mut()
        .queue_receive(Frame::message(&token, destination, body));
}

#[test]
fn test_notification_flow_end_to_end() {
    let mut client = new_client(NotifyConfig::default());
    complete_handshake(&mut client, "driver-7");

    deliver(
        &mut client,
        "/user/driver-7/queue/notifications",
        r#"{"type":"success","title":"Ride","message":"Ride accepted"}"#,
    );
    deliver(&mut client, "/topic/driver-notifications", "Fleet update");
    assert_eq!(client.poll(), 2);

    let notifications = client.notifications();
    assert_eq!(notifications.len(), 2);
    // Newest first
    assert_eq!(notifications[0].message, "Fleet update");
    assert_eq!(notifications[1].title, "Ride");
    assert_eq!(client.unread_count(), 2);

    let id = notifications[1].id.clone();
    assert!(client.mark_as_read(&id));
    assert_eq!(client.unread_count(), 1);

    client.mark_all_as_read();
    assert_eq!(client.unread_count(), 0);

    assert_eq!(client.clear_all(), 2);
    assert!(client.notifications().is_empty());
}

#[test]
fn test_log_cap_applies_through_client() {
    let mut client = new_client(NotifyConfig::default().with_log_cap(3));
    complete_handshake(&mut client, "driver-7");

    for i in 0..5 {
        deliver(
            &mut client,
            "/user/driver-7/queue/updates",
            &format!("update {}", i),
        );
    }
    client.poll();

    let notifications = client.notifications();
    assert_eq!(notifications.len(), 3);
    assert_eq!(notifications[0].message, "update 4");
    assert_eq!(notifications[2].message, "update 2");
}

#[test]
fn test_session_recovers_after_socket_drop() {
    let mut client = new_client(NotifyConfig::default());
    complete_handshake(&mut client, "driver-7");
    let start = Instant::now();

    let states = Arc::new(Mutex::new(Vec::new()));
    let states_in_handler = states.clone();
    client.on_event(move |event| {
        if let NotifyEvent::ConnectionStateChanged { state } = event {
            states_in_handler.lock().unwrap().push(state);
        }
    });

    client.connection_mut().transport_mut().fail_next_receive();
    client.poll_at(start);
    assert_eq!(client.connection_state(), ConnectionState::Disconnected);

    client
        .connection_mut()
        .transport_mut()
        .queue_receive(Frame::connected());
    client.poll_at(start + Duration::from_millis(3_000));
    assert!(client.is_connected());

    assert_eq!(
        *states.lock().unwrap(),
        vec![ConnectionState::Disconnected, ConnectionState::Connected]
    );
}

#[test]
fn test_notifications_survive_reconnect() {
    let mut client = new_client(NotifyConfig::default());
    complete_handshake(&mut client, "driver-7");
    let start = Instant::now();

    deliver(&mut client, "/user/driver-7/queue/notifications", "kept");
    client.poll_at(start);
    assert_eq!(client.notifications().len(), 1);

    client.connection_mut().transport_mut().fail_next_receive();
    client.poll_at(start);
    client
        .connection_mut()
        .transport_mut()
        .queue_receive(Frame::connected());
    client.poll_at(start + Duration::from_millis(3_000));
    assert!(client.is_connected());

    // The log is independent of connection churn
    assert_eq!(client.notifications().len(), 1);
    assert_eq!(client.notifications()[0].message, "kept");
}

#[test]
fn test_disconnect_is_idempotent_and_final() {
    let mut client = new_client(NotifyConfig::default());
    complete_handshake(&mut client, "driver-7");

    client.disconnect();
    client.disconnect();
    assert_eq!(client.connection_state(), ConnectionState::Disconnected);

    // No reconnect happens on its own after an explicit disconnect
    client.poll_at(Instant::now() + Duration::from_secs(3600));
    assert_eq!(client.connection_state(), ConnectionState::Disconnected);
}

#[test]
fn test_broadcast_and_user_queue_share_pipeline() {
    let mut client = new_client(NotifyConfig::default());
    complete_handshake(&mut client, "driver-7");

    deliver(
        &mut client,
        "/topic/driver-notifications",
        r#"{"type":"warning","message":"Surge pricing active"}"#,
    );
    client.poll();

    let notifications = client.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].message, "Surge pricing active");
}

#[test]
fn test_desktop_alert_side_effect() {
    let notifier = MockNotifier::new(true);
    let mut client = NotifyClient::with_transport(
        NotifyConfig::default(),
        MockTransport::new(),
        Box::new(notifier.clone()),
    );
    complete_handshake(&mut client, "driver-7");
    assert!(client.request_permission());

    deliver(
        &mut client,
        "/user/driver-7/queue/payments",
        r#"{"title":"Payment","message":"Payout sent"}"#,
    );
    client.poll();

    let shown = notifier.shown();
    assert_eq!(shown, vec![("Payment".to_string(), "Payout sent".to_string())]);
}
