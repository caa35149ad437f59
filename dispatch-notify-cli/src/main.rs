// SPDX-FileCopyrightText: 2026 DispatchTrack Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Dispatch Notify CLI
//!
//! Watches a user's notification queues from the terminal and can inject
//! test notifications through the backend's diagnostics endpoint.

use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use dispatch_notify::alert::DesktopNotifier;
use dispatch_notify::api::{
    inject_notification, InjectRequest, NotifyClient, NotifyConfig, NotifyEvent,
};

/// Pause between poll cycles in the watch loop.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Parser)]
#[command(name = "dispatch-notify")]
#[command(version, about = "Real-time notification watcher for DispatchTrack")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Broker WebSocket URL
    #[arg(
        long,
        global = true,
        env = "DISPATCH_BROKER_URL",
        default_value = "ws://localhost:8087/ws"
    )]
    broker: String,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect and print notifications as they arrive
    Watch {
        /// User to subscribe for
        user_id: String,

        /// Cap on the in-memory notification log
        #[arg(long, default_value_t = 200)]
        cap: usize,

        /// Raise desktop notifications as well
        #[arg(long)]
        desktop_alerts: bool,
    },

    /// Inject a test notification via the backend
    Inject {
        /// Target user
        user_id: String,

        /// Notification body text
        message: String,

        /// Notification title
        #[arg(long, default_value = "Test Notification")]
        title: String,

        /// Deep-link path attached to the notification
        #[arg(long, default_value = "/notifications")]
        path: String,

        /// Backend HTTP base URL
        #[arg(long, env = "DISPATCH_API_URL", default_value = "http://localhost:8087")]
        endpoint: String,

        /// Bearer token for the backend, if required
        #[arg(long, env = "DISPATCH_API_TOKEN")]
        token: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    simple_logger::SimpleLogger::new()
        .with_level(level)
        .init()
        .context("failed to initialize logger")?;

    match cli.command {
        Commands::Watch {
            user_id,
            cap,
            desktop_alerts,
        } => watch(&cli.broker, &user_id, cap, desktop_alerts),
        Commands::Inject {
            user_id,
            message,
            title,
            path,
            endpoint,
            token,
        } => inject(&endpoint, token.as_deref(), &user_id, &message, &title, &path),
    }
}

fn watch(broker: &str, user_id: &str, cap: usize, desktop_alerts: bool) -> Result<()> {
    let config = NotifyConfig::for_broker(broker).with_log_cap(cap);
    let mut client = NotifyClient::open(config, Box::new(DesktopNotifier::new()));

    client.on_event(|event| match event {
        NotifyEvent::ConnectionStateChanged { state } => {
            log::info!("connection: {:?}", state);
        }
        NotifyEvent::NotificationReceived { notification } => {
            println!(
                "[{}] {}: {}",
                notification.kind, notification.title, notification.message
            );
        }
        NotifyEvent::UnreadCountChanged { count } => {
            log::debug!("unread: {}", count);
        }
        _ => {}
    });

    if desktop_alerts && !client.request_permission() {
        log::warn!("desktop notifications unavailable; printing only");
    }

    client.connect(user_id)?;
    log::info!("watching notifications for {} on {}", user_id, broker);

    loop {
        client.poll();
        thread::sleep(POLL_INTERVAL);
    }
}

fn inject(
    endpoint: &str,
    token: Option<&str>,
    user_id: &str,
    message: &str,
    title: &str,
    path: &str,
) -> Result<()> {
    let request = InjectRequest {
        user_id: user_id.to_string(),
        message: message.to_string(),
        title: title.to_string(),
        path: path.to_string(),
    };
    inject_notification(endpoint, token, &request)
        .with_context(|| format!("injection via {} failed", endpoint))?;
    println!("test notification sent to {}", user_id);
    Ok(())
}
