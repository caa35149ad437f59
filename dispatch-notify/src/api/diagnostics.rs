// SPDX-FileCopyrightText: 2026 DispatchTrack Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Diagnostics
//!
//! Test injection against the backend's diagnostic HTTP endpoint. The
//! backend relays an injected payload back through the broker, so the full
//! receive pipeline can be exercised end to end against a live deployment.

use std::time::Duration;

use serde::Serialize;

use crate::api::error::{NotifyError, NotifyResult};

/// Path of the backend's custom-notification endpoint.
const INJECT_PATH: &str = "/api/notifications/user/custom";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Payload for a diagnostic test notification.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InjectRequest {
    /// Target user.
    pub user_id: String,
    /// Notification body text.
    pub message: String,
    /// Notification title.
    pub title: String,
    /// Deep-link path attached to the notification.
    pub path: String,
}

/// Posts a test notification to the backend for relay through the broker.
///
/// `token` is sent as a bearer credential when the backend requires one.
pub fn inject_notification(
    base_url: &str,
    token: Option<&str>,
    request: &InjectRequest,
) -> NotifyResult<()> {
    let url = format!("{}{}", base_url.trim_end_matches('/'), INJECT_PATH);

    let client = reqwest::blocking::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| NotifyError::Diagnostics(e.to_string()))?;

    let mut builder = client.post(&url).json(request);
    if let Some(token) = token {
        builder = builder.bearer_auth(token);
    }
    let response = builder
        .send()
        .map_err(|e| NotifyError::Diagnostics(e.to_string()))?;

    if response.status().is_success() {
        Ok(())
    } else {
        Err(NotifyError::Diagnostics(format!(
            "backend returned {}",
            response.status()
        )))
    }
}
