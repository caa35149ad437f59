// SPDX-FileCopyrightText: 2026 DispatchTrack Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Message Classifier
//!
//! Turns an opaque inbound frame body into the title, message, and kind of a
//! notification. Classification is total: every input, including malformed
//! JSON and the empty string, produces a usable result. The store assigns the
//! id and read flag.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Generic title used when the payload carries neither a title nor a type.
const FALLBACK_TITLE: &str = "New Notification";

/// Generic body used when no message text can be resolved.
const FALLBACK_MESSAGE: &str = "You have a new notification";

/// Notification severity/category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// A positive outcome (ride accepted, payment completed).
    Success,
    /// A failure the user should know about.
    Error,
    /// A non-critical issue or pending state.
    Warning,
    /// Neutral information.
    Info,
}

impl NotificationKind {
    /// The lowercase wire/display spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
            NotificationKind::Warning => "warning",
            NotificationKind::Info => "info",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recognized fields of a structured payload.
///
/// Empty strings are normalized to `None` at the parse boundary, matching
/// how the broker-side producers treat blank fields as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredPayload {
    /// Explicit notification type, verbatim (may be any casing).
    pub kind: Option<String>,
    /// Explicit title.
    pub title: Option<String>,
    /// Explicit message text.
    pub message: Option<String>,
    /// Alternate message text field used by some producers.
    pub content: Option<String>,
}

/// An inbound frame body, resolved exactly once at the transport boundary.
///
/// Downstream code never re-inspects raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundPayload {
    /// Parsed JSON object (or a JSON value with no usable fields).
    Structured(StructuredPayload),
    /// Plain text, including anything that failed to parse as JSON.
    PlainText(String),
}

/// Classifier output: a notification minus id/read, which the store assigns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedMessage {
    /// Resolved title, never empty.
    pub title: String,
    /// Resolved message text, never empty.
    pub message: String,
    /// Explicit or inferred kind.
    pub kind: NotificationKind,
}

/// Resolves a raw frame body into a tagged payload.
///
/// Malformed input is never dropped; it degrades to `PlainText`.
pub fn parse_payload(body: &str) -> InboundPayload {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => {
            let field = |name: &str| {
                map.get(name)
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
            };
            InboundPayload::Structured(StructuredPayload {
                kind: field("type"),
                title: field("title"),
                message: field("message"),
                content: field("content"),
            })
        }
        // A JSON string literal is treated as its inner text
        Ok(Value::String(text)) => InboundPayload::PlainText(text),
        // Other JSON values carry no usable fields
        Ok(_) => InboundPayload::Structured(StructuredPayload::default()),
        Err(err) => {
            log::debug!("payload is not JSON, treating as plain text: {}", err);
            InboundPayload::PlainText(body.to_string())
        }
    }
}

/// Classifies a resolved payload. Total over all inputs.
pub fn classify(payload: &InboundPayload) -> ClassifiedMessage {
    let title = resolve_title(payload);
    let message = resolve_message(payload);
    let kind = resolve_kind(payload, &message);
    ClassifiedMessage {
        title,
        message,
        kind,
    }
}

fn resolve_title(payload: &InboundPayload) -> String {
    if let InboundPayload::Structured(fields) = payload {
        if let Some(title) = &fields.title {
            return title.clone();
        }
        // The explicit type doubles as a title when none is given
        if let Some(kind) = &fields.kind {
            return kind.clone();
        }
    }
    FALLBACK_TITLE.to_string()
}

fn resolve_message(payload: &InboundPayload) -> String {
    match payload {
        InboundPayload::Structured(fields) => fields
            .message
            .clone()
            .or_else(|| fields.content.clone())
            .unwrap_or_else(|| FALLBACK_MESSAGE.to_string()),
        InboundPayload::PlainText(text) => {
            if text.is_empty() {
                FALLBACK_MESSAGE.to_string()
            } else {
                text.clone()
            }
        }
    }
}

fn resolve_kind(payload: &InboundPayload, message: &str) -> NotificationKind {
    if let InboundPayload::Structured(fields) = payload {
        if let Some(kind) = &fields.kind {
            return match kind.to_lowercase().as_str() {
                "success" => NotificationKind::Success,
                "error" => NotificationKind::Error,
                "warning" => NotificationKind::Warning,
                _ => NotificationKind::Info,
            };
        }
    }

    // No explicit type: infer from the resolved message, first match wins
    let message = message.to_lowercase();
    if message.contains("accepted") || message.contains("success") {
        NotificationKind::Success
    } else if message.contains("error") || message.contains("failed") {
        NotificationKind::Error
    } else if message.contains("warning") || message.contains("pending") {
        NotificationKind::Warning
    } else {
        NotificationKind::Info
    }
}
