// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{collections::BTreeMap, fmt, sync::Arc, time::Duration};

use log::debug;
use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{self, Instant},
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Kind {
    Success,
    Error,
    Info,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Notification {
    pub(crate) id: u64,
    pub(crate) message: String,
    pub(crate) kind: Kind,
    pub(crate) created_at: Instant,
}

struct Entry {
    notification: Notification,
    expires_at: Option<Instant>,
    reaper: Option<JoinHandle<()>>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |deadline| now < deadline)
    }
}

#[derive(Default)]
struct State {
    next_id: u64,
    entries: BTreeMap<u64, Entry>,
}

/// Transient messages for the user. Ids increase with every push, so ordering
/// by id is insertion order.
#[derive(Clone)]
pub(crate) struct Queue {
    state: Arc<Mutex<State>>,
    default_duration: Duration,
}

impl Queue {
    pub(crate) fn new(default_duration: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
            default_duration,
        }
    }

    /// Adds a notification that removes itself after `duration`. A zero
    /// duration keeps it until it is dismissed.
    pub(crate) async fn push<S: Into<String>>(
        &self,
        message: S,
        kind: Kind,
        duration: Duration,
    ) -> u64 {
        let mut state = self.state.lock().await;
        state.next_id += 1;
        let id = state.next_id;
        let now = Instant::now();

        let (expires_at, reaper) = if duration.is_zero() {
            (None, None)
        } else {
            let queue = self.clone();
            let reaper = tokio::spawn(async move {
                time::sleep(duration).await;
                let _ = queue.state.lock().await.entries.remove(&id);
                debug!("Notification {} expired", id);
            });
            (Some(now + duration), Some(reaper))
        };

        let _ = state.entries.insert(
            id,
            Entry {
                notification: Notification {
                    id,
                    message: message.into(),
                    kind,
                    created_at: now,
                },
                expires_at,
                reaper,
            },
        );
        id
    }

    pub(crate) async fn success<S: Into<String>>(&self, message: S) -> u64 {
        self.push(message, Kind::Success, self.default_duration).await
    }

    pub(crate) async fn error<S: Into<String>>(&self, message: S) -> u64 {
        self.push(message, Kind::Error, self.default_duration).await
    }

    pub(crate) async fn info<S: Into<String>>(&self, message: S) -> u64 {
        self.push(message, Kind::Info, self.default_duration).await
    }

    /// Removes a notification now. Returns whether it was still present.
    pub(crate) async fn dismiss(&self, id: u64) -> bool {
        let removed = self.state.lock().await.entries.remove(&id);
        match removed {
            Some(entry) => {
                if let Some(reaper) = entry.reaper {
                    reaper.abort();
                }
                true
            }
            None => false,
        }
    }

    /// Live notifications, oldest first.
    pub(crate) async fn active(&self) -> Vec<Notification> {
        let now = Instant::now();
        self.state
            .lock()
            .await
            .entries
            .values()
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.notification.clone())
            .collect()
    }
}
