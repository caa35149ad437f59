//! Dispatch Notify Core Library
//!
//! Real-time notification client for the DispatchTrack ride-hailing backend.
//! Maintains a broker session over WebSocket, classifies inbound payloads,
//! keeps a capped notification log, and raises OS notifications.

pub mod alert;
pub mod api;
pub mod classify;
pub mod network;
pub mod store;

pub use alert::{AlertDispatcher, AlertError, MockNotifier, SystemNotifier};
pub use api::{
    CallbackHandler, EventDispatcher, EventHandler, NotifyClient, NotifyConfig, NotifyError,
    NotifyEvent, NotifyResult,
};
pub use classify::{
    classify, parse_payload, ClassifiedMessage, InboundPayload, NotificationKind, StructuredPayload,
};
pub use network::{
    canonical_destinations, ConnectionManager, ConnectionState, Frame, FrameCommand, InboundFrame,
    MockTransport, NetworkError, Transport, TransportConfig, TransportResult, BROADCAST_TOPIC,
};
pub use store::{Notification, NotificationStore, DEFAULT_LOG_CAP};

#[cfg(feature = "desktop-alerts")]
pub use alert::DesktopNotifier;

#[cfg(any(feature = "network-native-tls", feature = "network-rustls"))]
pub use network::WebSocketTransport;

#[cfg(feature = "diagnostics")]
pub use api::{inject_notification, InjectRequest};
