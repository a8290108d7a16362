// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use url::Url;

use crate::error::{self, Result};

pub(crate) const DEFAULT_NOTIFICATION_DURATION: Duration = Duration::from_millis(3000);
pub(crate) const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub(crate) const DEFAULT_DELETION_REASON: &str = "Requested by account holder from settings";
pub(crate) const DEFAULT_MIN_PASSWORD_LENGTH: usize = 6;

/// Settings for a single run of the client, checked once when they are built
/// and read-only afterwards.
#[derive(Clone, Debug)]
pub(crate) struct Config {
    base_url: Url,
    notification_duration: Duration,
    request_timeout: Duration,
    deletion_reason: String,
    min_password_length: usize,
}

impl Config {
    pub(crate) const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// How long a notification stays visible. Zero keeps notifications until
    /// they are dismissed.
    pub(crate) const fn notification_duration(&self) -> Duration {
        self.notification_duration
    }

    pub(crate) const fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub(crate) fn deletion_reason(&self) -> &str {
        &self.deletion_reason
    }

    pub(crate) const fn min_password_length(&self) -> usize {
        self.min_password_length
    }
}

pub(crate) struct ConfigBuilder {
    base_url: Url,
    notification_duration: Duration,
    request_timeout: Duration,
    deletion_reason: String,
    min_password_length: usize,
}

impl ConfigBuilder {
    pub(crate) fn new(base_url: Url) -> Self {
        Self {
            base_url,
            notification_duration: DEFAULT_NOTIFICATION_DURATION,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            deletion_reason: DEFAULT_DELETION_REASON.to_owned(),
            min_password_length: DEFAULT_MIN_PASSWORD_LENGTH,
        }
    }

    pub(crate) const fn with_notification_duration(mut self, duration: Duration) -> Self {
        self.notification_duration = duration;
        self
    }

    pub(crate) const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub(crate) fn with_deletion_reason(mut self, reason: &str) -> Self {
        self.deletion_reason = reason.to_owned();
        self
    }

    pub(crate) const fn with_min_password_length(mut self, length: usize) -> Self {
        self.min_password_length = length;
        self
    }

    pub(crate) fn into_config(self) -> Result<Config> {
        match self.base_url.scheme() {
            "http" | "https" => {}
            other => return Err(error::Config::UnsupportedScheme(other.to_owned()).into()),
        }

        Ok(Config {
            base_url: self.base_url,
            notification_duration: self.notification_duration,
            request_timeout: self.request_timeout,
            deletion_reason: self.deletion_reason,
            min_password_length: self.min_password_length,
        })
    }
}
