// SPDX-FileCopyrightText: 2026 DispatchTrack Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Notification Store
//!
//! The ordered, capped log of notifications with read/unread bookkeeping.
//! Single source of truth for the UI: entries are owned here and handed out
//! only as clones. Newest entries come first; the cap evicts oldest first.

use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::classify::{ClassifiedMessage, NotificationKind};

/// Default cap on the notification log.
pub const DEFAULT_LOG_CAP: usize = 200;

/// Length of the random id suffix.
const ID_SUFFIX_LEN: usize = 9;

/// A single notification entry.
///
/// The id is generated locally at append time (millisecond timestamp plus a
/// random suffix); the broker assigns no identifier, so duplicate payloads
/// are distinct entries distinguished only by arrival.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Opaque unique id, locally generated.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Display message.
    pub message: String,
    /// Severity/category.
    pub kind: NotificationKind,
    /// Creation time, milliseconds since the Unix epoch.
    pub created_at_ms: u64,
    /// Read flag; flips false to true exactly once.
    pub read: bool,
}

/// Ordered, deduplicated notification log.
pub struct NotificationStore {
    /// Entries, newest first.
    entries: VecDeque<Notification>,
    cap: usize,
}

impl NotificationStore {
    /// Creates an empty store with the given cap (clamped to at least 1).
    pub fn new(cap: usize) -> Self {
        NotificationStore {
            entries: VecDeque::new(),
            cap: cap.max(1),
        }
    }

    /// Creates an empty store with the default cap.
    pub fn with_default_cap() -> Self {
        Self::new(DEFAULT_LOG_CAP)
    }

    /// Appends a classified message as a new unread entry.
    ///
    /// Prepends to the log; when the cap is exceeded the oldest entries are
    /// evicted. Returns a clone of the stored entry.
    pub fn append(&mut self, message: ClassifiedMessage) -> Notification {
        let notification = Notification {
            id: generate_id(),
            title: message.title,
            message: message.message,
            kind: message.kind,
            created_at_ms: now_ms(),
            read: false,
        };
        self.entries.push_front(notification.clone());
        while self.entries.len() > self.cap {
            self.entries.pop_back();
        }
        notification
    }

    /// Marks the entry with the given id as read.
    ///
    /// Returns true if an unread entry was marked; no-op (false) when the id
    /// is absent or the entry was already read.
    pub fn mark_as_read(&mut self, id: &str) -> bool {
        match self.entries.iter_mut().find(|n| n.id == id) {
            Some(entry) if !entry.read => {
                entry.read = true;
                true
            }
            _ => false,
        }
    }

    /// Marks every entry as read. Returns the number newly marked.
    pub fn mark_all_as_read(&mut self) -> usize {
        let mut marked = 0;
        for entry in self.entries.iter_mut() {
            if !entry.read {
                entry.read = true;
                marked += 1;
            }
        }
        marked
    }

    /// Empties the log. Returns the number of entries removed.
    pub fn clear_all(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        removed
    }

    /// Count of unread entries. Always derived, never cached.
    pub fn unread_count(&self) -> usize {
        self.entries.iter().filter(|n| !n.read).count()
    }

    /// Number of entries in the log.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the log is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The configured cap.
    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Looks up an entry by id.
    pub fn get(&self, id: &str) -> Option<&Notification> {
        self.entries.iter().find(|n| n.id == id)
    }

    /// Immutable snapshot of the log, newest first.
    pub fn snapshot(&self) -> Vec<Notification> {
        self.entries.iter().cloned().collect()
    }
}

impl Default for NotificationStore {
    fn default() -> Self {
        Self::with_default_cap()
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Millisecond timestamp plus a random alphanumeric suffix.
///
/// Uniqueness is a local guarantee only; see the module docs.
fn generate_id() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ID_SUFFIX_LEN)
        .map(char::from)
        .collect();
    format!("{}-{}", now_ms(), suffix)
}
