// SPDX-FileCopyrightText: 2026 DispatchTrack Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Side-Effect Dispatcher
//!
//! Raises OS-level notifications for newly appended entries. Purely
//! observational: dispatch is fire-and-forget and a failure here never
//! reaches the store or the caller. Permission is asked once per process
//! via an explicit request and the answer is cached.

use std::sync::{Arc, Mutex};

use thiserror::Error;

use crate::store::Notification;

/// Errors from the system notification backend.
#[derive(Error, Debug)]
pub enum AlertError {
    /// No notification mechanism is available on this platform.
    #[error("no system notifier available")]
    Unavailable,

    /// The notification helper ran but failed.
    #[error("notifier command failed: {0}")]
    CommandFailed(String),
}

/// Capability interface for raising OS notifications.
pub trait SystemNotifier: Send {
    /// Asks the platform for permission to show notifications.
    ///
    /// Called at most once per process by [`AlertDispatcher`].
    fn request_permission(&mut self) -> bool;

    /// Shows a system notification with the given title and body.
    fn show(&self, title: &str, body: &str) -> Result<(), AlertError>;
}

/// Dispatches OS notifications for new entries, gated on cached permission.
pub struct AlertDispatcher {
    notifier: Box<dyn SystemNotifier>,
    /// Cached permission answer; `None` until explicitly requested.
    permission: Option<bool>,
}

impl AlertDispatcher {
    /// Creates a dispatcher over the given backend. Permission starts
    /// unrequested, so nothing is shown until `request_permission`.
    pub fn new(notifier: Box<dyn SystemNotifier>) -> Self {
        AlertDispatcher {
            notifier,
            permission: None,
        }
    }

    /// Requests permission once and caches the answer for the process
    /// lifetime. Subsequent calls return the cached value without retrying.
    pub fn request_permission(&mut self) -> bool {
        match self.permission {
            Some(granted) => granted,
            None => {
                let granted = self.notifier.request_permission();
                self.permission = Some(granted);
                granted
            }
        }
    }

    /// The cached permission answer, if requested.
    pub fn permission(&self) -> Option<bool> {
        self.permission
    }

    /// Raises an OS notification for the entry if permission was granted.
    ///
    /// Fire-and-forget: failures are logged and swallowed.
    pub fn dispatch(&self, notification: &Notification) {
        if self.permission != Some(true) {
            return;
        }
        if let Err(err) = self
            .notifier
            .show(&notification.title, &notification.message)
        {
            log::warn!("system notification failed: {}", err);
        }
    }
}

/// Desktop notification backend using platform helpers.
///
/// Linux uses `notify-send`, macOS uses `osascript`. Permission means the
/// helper binary is present on PATH.
#[cfg(feature = "desktop-alerts")]
pub struct DesktopNotifier;

#[cfg(feature = "desktop-alerts")]
impl DesktopNotifier {
    /// Creates the desktop backend.
    pub fn new() -> Self {
        DesktopNotifier
    }

    #[cfg(target_os = "linux")]
    fn helper() -> &'static str {
        "notify-send"
    }

    #[cfg(target_os = "macos")]
    fn helper() -> &'static str {
        "osascript"
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    fn helper() -> &'static str {
        ""
    }
}

#[cfg(feature = "desktop-alerts")]
impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "desktop-alerts")]
impl SystemNotifier for DesktopNotifier {
    fn request_permission(&mut self) -> bool {
        let helper = Self::helper();
        !helper.is_empty() && which::which(helper).is_ok()
    }

    fn show(&self, title: &str, body: &str) -> Result<(), AlertError> {
        use std::process::Command;

        #[cfg(target_os = "linux")]
        let mut command = {
            let mut c = Command::new("notify-send");
            c.arg(title).arg(body);
            c
        };

        #[cfg(target_os = "macos")]
        let mut command = {
            let script = format!(
                "display notification \"{}\" with title \"{}\"",
                body.replace('\\', "\\\\").replace('"', "\\\""),
                title.replace('\\', "\\\\").replace('"', "\\\"")
            );
            let mut c = Command::new("osascript");
            c.arg("-e").arg(script);
            c
        };

        #[cfg(not(any(target_os = "linux", target_os = "macos")))]
        return Err(AlertError::Unavailable);

        #[cfg(any(target_os = "linux", target_os = "macos"))]
        {
            let status = command
                .status()
                .map_err(|e| AlertError::CommandFailed(e.to_string()))?;
            if status.success() {
                Ok(())
            } else {
                Err(AlertError::CommandFailed(format!(
                    "exit status {}",
                    status
                )))
            }
        }
    }
}

/// Scripted notifier for tests: records shown notifications and can be
/// made to deny permission or fail on show.
#[derive(Clone)]
pub struct MockNotifier {
    granted: bool,
    fail_show: bool,
    shown: Arc<Mutex<Vec<(String, String)>>>,
    permission_requests: Arc<Mutex<u32>>,
}

impl MockNotifier {
    /// Creates a mock that answers permission requests with `granted`.
    pub fn new(granted: bool) -> Self {
        MockNotifier {
            granted,
            fail_show: false,
            shown: Arc::new(Mutex::new(Vec::new())),
            permission_requests: Arc::new(Mutex::new(0)),
        }
    }

    /// Makes every `show` call fail.
    pub fn fail_show(mut self) -> Self {
        self.fail_show = true;
        self
    }

    /// Notifications shown so far, as (title, body) pairs.
    pub fn shown(&self) -> Vec<(String, String)> {
        self.shown.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Number of permission requests that reached the backend.
    pub fn permission_requests(&self) -> u32 {
        self.permission_requests.lock().map(|c| *c).unwrap_or(0)
    }
}

impl SystemNotifier for MockNotifier {
    fn request_permission(&mut self) -> bool {
        if let Ok(mut count) = self.permission_requests.lock() {
            *count += 1;
        }
        self.granted
    }

    fn show(&self, title: &str, body: &str) -> Result<(), AlertError> {
        if self.fail_show {
            return Err(AlertError::CommandFailed("scripted failure".into()));
        }
        if let Ok(mut shown) = self.shown.lock() {
            shown.push((title.to_string(), body.to_string()));
        }
        Ok(())
    }
}
