// SPDX-FileCopyrightText: 2026 DispatchTrack Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! API Error Types
//!
//! Unified error type for the notification API layer.

use thiserror::Error;

use crate::network::NetworkError;

/// Unified error type for notification client operations.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// A caller-supplied argument was rejected.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Network operation failed.
    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A diagnostics request to the backend failed.
    #[error("diagnostics error: {0}")]
    Diagnostics(String),
}

/// Result type for notification client operations.
pub type NotifyResult<T> = Result<T, NotifyError>;
