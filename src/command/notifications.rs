// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;
use tabled::{settings::Style, Table, Tabled};
use tokio::time::Instant;

use crate::{app::App, error::Result, notify::Notification};

#[derive(Tabled)]
struct Row {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Message")]
    message: String,
    #[tabled(rename = "Age")]
    age: String,
}

impl Row {
    fn new(notification: Notification, now: Instant) -> Self {
        Self {
            id: notification.id,
            kind: notification.kind.to_string(),
            message: notification.message,
            age: format!(
                "{}s",
                now.saturating_duration_since(notification.created_at)
                    .as_secs()
            ),
        }
    }
}

/// List current notifications.
#[derive(Debug, Parser)]
pub(crate) struct List;

#[async_trait]
impl super::Command for List {
    async fn execute(self, app: &mut App) -> Result<()> {
        let now = Instant::now();
        let rows: Vec<_> = app
            .notifications()
            .active()
            .await
            .into_iter()
            .map(|n| Row::new(n, now))
            .collect();

        if rows.is_empty() {
            println!("No notifications.");
        } else {
            println!("{}", Table::new(rows).with(Style::rounded()));
        }
        Ok(())
    }
}

/// Remove a notification.
#[derive(Debug, Parser)]
pub(crate) struct Dismiss {
    /// The notification's ID as shown by `notifications`.
    id: u64,
}

#[async_trait]
impl super::Command for Dismiss {
    async fn execute(self, app: &mut App) -> Result<()> {
        if !app.notifications().dismiss(self.id).await {
            println!("No notification with ID {}.", self.id);
        }
        Ok(())
    }
}
