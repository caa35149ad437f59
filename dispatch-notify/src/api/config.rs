// SPDX-FileCopyrightText: 2026 DispatchTrack Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration Types
//!
//! Configuration for the notification client.

use crate::network::TransportConfig;
use crate::store::DEFAULT_LOG_CAP;

/// Default broker endpoint for local development.
pub const DEFAULT_BROKER_URL: &str = "ws://localhost:8087/ws";

/// Configuration for [`NotifyClient`](crate::api::NotifyClient).
#[derive(Debug, Clone)]
pub struct NotifyConfig {
    /// Broker transport settings.
    pub transport: TransportConfig,
    /// Cap on the in-memory notification log.
    pub log_cap: usize,
    /// HTTP base URL for diagnostic test injection, if enabled.
    pub inject_url: Option<String>,
    /// Bearer token for the injection endpoint, if it requires one.
    pub inject_token: Option<String>,
}

impl NotifyConfig {
    /// Configuration pointed at a specific broker URL.
    pub fn for_broker(url: &str) -> Self {
        NotifyConfig {
            transport: TransportConfig::for_broker(url),
            ..Default::default()
        }
    }

    /// Sets the notification log cap.
    pub fn with_log_cap(mut self, cap: usize) -> Self {
        self.log_cap = cap;
        self
    }

    /// Sets the diagnostics injection endpoint.
    pub fn with_inject_url(mut self, url: &str) -> Self {
        self.inject_url = Some(url.to_string());
        self
    }

    /// Sets the bearer token for the injection endpoint.
    pub fn with_inject_token(mut self, token: &str) -> Self {
        self.inject_token = Some(token.to_string());
        self
    }
}

impl Default for NotifyConfig {
    fn default() -> Self {
        NotifyConfig {
            transport: TransportConfig::for_broker(DEFAULT_BROKER_URL),
            log_cap: DEFAULT_LOG_CAP,
            inject_url: None,
            inject_token: None,
        }
    }
}
