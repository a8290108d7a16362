// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{collections::BTreeMap, fmt, sync::Arc};

use log::{debug, info, warn};

use crate::{client::Portal, error::Result, storage::Storage};

/// The enrollment number that identifies an account to the backend.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct UserId(String);

impl UserId {
    pub(crate) fn new<S: Into<String>>(value: S) -> Self {
        Self(value.into())
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Session {
    identity: UserId,
    attributes: BTreeMap<String, String>,
}

impl Session {
    pub(crate) fn new(identity: UserId, attributes: BTreeMap<String, String>) -> Self {
        Self {
            identity,
            attributes,
        }
    }

    pub(crate) const fn identity(&self) -> &UserId {
        &self.identity
    }

    pub(crate) const fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    pub(crate) fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// The name to greet the user with, falling back to the enrollment number.
    pub(crate) fn display_name(&self) -> &str {
        self.attribute("name").unwrap_or_else(|| self.identity.as_str())
    }
}

/// The single writer of the current session. Everything else reads through a
/// [`Reader`].
pub(crate) struct Store {
    storage: Arc<dyn Storage<Session>>,
}

impl Store {
    pub(crate) fn new<S: Storage<Session> + 'static>(storage: S) -> Self {
        Self {
            storage: Arc::new(storage),
        }
    }

    /// Recovers a session the backend already knows about. Any failure leaves
    /// the client signed out.
    pub(crate) async fn initialize<P: Portal + ?Sized>(&self, portal: &P) -> Result<()> {
        match portal.whoami().await {
            Ok(Some(session)) => {
                info!("Resuming session for {}", session.identity());
                self.set(&session).await
            }
            Ok(None) => {
                debug!("No existing session reported by the backend");
                self.clear().await
            }
            Err(e) => {
                warn!("Could not check for an existing session: {}", e);
                self.clear().await
            }
        }
    }

    pub(crate) async fn set(&self, session: &Session) -> Result<()> {
        self.storage.update(session).await
    }

    pub(crate) async fn clear(&self) -> Result<()> {
        self.storage.clear().await
    }

    pub(crate) async fn get(&self) -> Result<Option<Session>> {
        self.storage.get().await
    }

    pub(crate) fn reader(&self) -> Reader {
        Reader {
            storage: Arc::clone(&self.storage),
        }
    }
}

#[derive(Clone)]
pub(crate) struct Reader {
    storage: Arc<dyn Storage<Session>>,
}

impl Reader {
    pub(crate) async fn get(&self) -> Result<Option<Session>> {
        self.storage.get().await
    }
}
