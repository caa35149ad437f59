// SPDX-FileCopyrightText: 2026 DispatchTrack Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! WebSocket Transport
//!
//! Real transport implementation using tungstenite. Broker frames are carried
//! as WebSocket text messages. Supports both native-tls and rustls backends.

use std::net::TcpStream;
use std::time::Duration;

#[cfg(all(feature = "network-native-tls", not(feature = "network-rustls")))]
use native_tls::TlsConnector;

#[cfg(feature = "network-rustls")]
use rustls::pki_types::ServerName;
#[cfg(feature = "network-rustls")]
use std::sync::Arc;

use tungstenite::client::IntoClientRequest;
use tungstenite::stream::MaybeTlsStream;
use tungstenite::{Message, WebSocket};

use super::error::NetworkError;
use super::frame::Frame;
use super::transport::{ConnectionState, Transport, TransportConfig, TransportResult};

/// WebSocket transport for broker communication.
///
/// Supports both ws:// (plaintext) and wss:// (TLS) connections.
///
/// # Example
///
/// ```ignore
/// use dispatch_notify::network::{Transport, TransportConfig, WebSocketTransport};
///
/// let mut transport = WebSocketTransport::new();
/// let config = TransportConfig::for_broker("ws://localhost:8087/ws");
/// transport.connect(&config)?;
/// ```
pub struct WebSocketTransport {
    socket: Option<WebSocket<MaybeTlsStream<TcpStream>>>,
    state: ConnectionState,
}

impl WebSocketTransport {
    /// Creates a new WebSocket transport.
    pub fn new() -> Self {
        WebSocketTransport {
            socket: None,
            state: ConnectionState::Disconnected,
        }
    }

    /// Parses a WebSocket URL into host, port, and TLS flag.
    fn parse_url(url: &str) -> Result<(String, u16, bool), NetworkError> {
        let is_tls = url.starts_with("wss://");
        let url_without_scheme = url
            .strip_prefix("wss://")
            .or_else(|| url.strip_prefix("ws://"))
            .ok_or_else(|| {
                NetworkError::ConnectionFailed(
                    "Invalid URL scheme (expected ws:// or wss://)".into(),
                )
            })?;

        // Split host:port/path
        let host_port = url_without_scheme
            .split('/')
            .next()
            .unwrap_or(url_without_scheme);

        let (host, port) = if let Some(colon_pos) = host_port.rfind(':') {
            let host = &host_port[..colon_pos];
            let port_str = &host_port[colon_pos + 1..];
            let port: u16 = port_str.parse().map_err(|_| {
                NetworkError::ConnectionFailed(format!("Invalid port: {}", port_str))
            })?;
            (host.to_string(), port)
        } else {
            let default_port = if is_tls { 443 } else { 80 };
            (host_port.to_string(), default_port)
        };

        Ok((host, port, is_tls))
    }

    /// Create a TLS stream using native-tls
    #[cfg(all(feature = "network-native-tls", not(feature = "network-rustls")))]
    fn create_tls_stream(
        host: &str,
        tcp_stream: TcpStream,
    ) -> Result<MaybeTlsStream<TcpStream>, NetworkError> {
        let connector = TlsConnector::new()
            .map_err(|e| NetworkError::ConnectionFailed(format!("TLS error: {}", e)))?;
        let tls_stream = connector
            .connect(host, tcp_stream)
            .map_err(|e| NetworkError::ConnectionFailed(format!("TLS handshake failed: {}", e)))?;
        Ok(MaybeTlsStream::NativeTls(tls_stream))
    }

    /// Create a TLS stream using rustls
    #[cfg(feature = "network-rustls")]
    fn create_tls_stream(
        host: &str,
        tcp_stream: TcpStream,
    ) -> Result<MaybeTlsStream<TcpStream>, NetworkError> {
        let mut root_store = rustls::RootCertStore::empty();
        root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

        let config = rustls::ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();

        let server_name: ServerName<'_> = host.try_into().map_err(|_| {
            NetworkError::ConnectionFailed(format!("Invalid server name: {}", host))
        })?;

        let tls_conn = rustls::ClientConnection::new(Arc::new(config), server_name.to_owned())
            .map_err(|e| NetworkError::ConnectionFailed(format!("TLS setup failed: {}", e)))?;

        let tls_stream = rustls::StreamOwned::new(tls_conn, tcp_stream);
        Ok(MaybeTlsStream::Rustls(tls_stream))
    }
}

impl Default for WebSocketTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for WebSocketTransport {
    fn connect(&mut self, config: &TransportConfig) -> TransportResult<()> {
        if matches!(self.state, ConnectionState::Connected) {
            return Ok(());
        }

        self.state = ConnectionState::Connecting;

        let (host, port, is_tls) = Self::parse_url(&config.broker_url).inspect_err(|_| {
            self.state = ConnectionState::Disconnected;
        })?;
        let addr = format!("{}:{}", host, port);

        let tcp_stream = TcpStream::connect(&addr).map_err(|e| {
            self.state = ConnectionState::Disconnected;
            NetworkError::ConnectionFailed(e.to_string())
        })?;

        tcp_stream
            .set_read_timeout(Some(Duration::from_millis(config.io_timeout_ms)))
            .map_err(|e| NetworkError::ConnectionFailed(e.to_string()))?;
        tcp_stream
            .set_write_timeout(Some(Duration::from_millis(config.io_timeout_ms)))
            .map_err(|e| NetworkError::ConnectionFailed(e.to_string()))?;

        let stream: MaybeTlsStream<TcpStream> = if is_tls {
            Self::create_tls_stream(&host, tcp_stream).inspect_err(|_| {
                self.state = ConnectionState::Disconnected;
            })?
        } else {
            MaybeTlsStream::Plain(tcp_stream)
        };

        // WebSocket handshake - use IntoClientRequest for proper HTTP/1.1 request
        let request = config
            .broker_url
            .as_str()
            .into_client_request()
            .map_err(|e| {
                self.state = ConnectionState::Disconnected;
                NetworkError::ConnectionFailed(format!("Invalid WebSocket request: {}", e))
            })?;

        let (socket, _response) = tungstenite::client(request, stream).map_err(|e| {
            self.state = ConnectionState::Disconnected;
            NetworkError::ConnectionFailed(format!("WebSocket handshake failed: {}", e))
        })?;

        self.socket = Some(socket);
        self.state = ConnectionState::Connected;

        Ok(())
    }

    fn disconnect(&mut self) -> TransportResult<()> {
        if let Some(mut socket) = self.socket.take() {
            let _ = socket.close(None); // Ignore errors on close
        }
        self.state = ConnectionState::Disconnected;
        Ok(())
    }

    fn state(&self) -> ConnectionState {
        self.state
    }

    fn send(&mut self, frame: &Frame) -> TransportResult<()> {
        let socket = self.socket.as_mut().ok_or(NetworkError::NotConnected)?;

        let ws_message = Message::Text(frame.encode());

        socket.send(ws_message).map_err(|e| {
            // Connection may be broken
            if matches!(
                e,
                tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed
            ) {
                self.state = ConnectionState::Disconnected;
                NetworkError::ConnectionClosed
            } else {
                NetworkError::SendFailed(e.to_string())
            }
        })?;

        socket
            .flush()
            .map_err(|e| NetworkError::SendFailed(format!("Flush failed: {}", e)))?;

        Ok(())
    }

    fn receive(&mut self) -> TransportResult<Option<Frame>> {
        let socket = self.socket.as_mut().ok_or(NetworkError::NotConnected)?;

        match socket.read() {
            Ok(Message::Text(text)) => {
                // SockJS-style heartbeats come through as bare newlines
                if text.trim_matches(|c| c == '\n' || c == '\0').is_empty() {
                    return Ok(None);
                }
                Frame::parse(&text).map(Some)
            }
            Ok(Message::Binary(_)) => Err(NetworkError::InvalidFrame(
                "Unexpected binary message".into(),
            )),
            Ok(Message::Ping(data)) => {
                // Respond to ping with pong
                let _ = socket.send(Message::Pong(data));
                Ok(None)
            }
            Ok(Message::Pong(_)) => Ok(None),
            Ok(Message::Close(_)) => {
                self.state = ConnectionState::Disconnected;
                Err(NetworkError::ConnectionClosed)
            }
            Ok(Message::Frame(_)) => {
                // Raw frames shouldn't reach here
                Ok(None)
            }
            Err(tungstenite::Error::Io(ref e))
                if e.kind() == std::io::ErrorKind::WouldBlock
                    || e.kind() == std::io::ErrorKind::TimedOut =>
            {
                // No message available (timeout)
                Ok(None)
            }
            Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {
                self.state = ConnectionState::Disconnected;
                Err(NetworkError::ConnectionClosed)
            }
            Err(e) => Err(NetworkError::ReceiveFailed(e.to_string())),
        }
    }

    fn has_pending(&self) -> bool {
        // WebSocket doesn't provide a non-blocking check easily.
        // Return false; caller should use receive() with timeout.
        false
    }
}
