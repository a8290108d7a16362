// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{io, result};

use reqwest::StatusCode;
use thiserror::Error;
use tokio_util::codec::LinesCodecError;

pub(crate) type Result<T, E = Error> = result::Result<T, E>;

#[derive(Error, Debug)]
pub(crate) enum Error {
    #[error("IO operation failed: {0}")]
    Io(#[from] io::Error),
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("configuration error: {0}")]
    Config(#[from] Config),
    #[error("API error: {0}")]
    Api(#[from] Api),
    #[error("{0}")]
    Validation(#[from] Validation),
    #[error("password retrieval error: {0}")]
    Password(#[from] Password),
    #[error("internal communication error: {0}")]
    Internal(#[from] Internal),
    #[error("view could not be rendered: {0}")]
    Render(String),
    #[error("operation cancelled")]
    Cancelled,
}

impl Error {
    /// The text to show next to the input that caused this error, if the
    /// backend or a local check produced one.
    pub(crate) fn user_message(&self) -> Option<String> {
        // LINT: Deliberate fall-through that should catch future cases added to
        // the enum.
        #[allow(clippy::wildcard_enum_match_arm)]
        match self {
            Self::Api(Api::Rejected { message }) => Some(message.clone()),
            Self::Validation(v) => Some(v.to_string()),
            _ => None,
        }
    }
}

impl From<pinentry::Error> for Error {
    fn from(value: pinentry::Error) -> Self {
        // LINT: Deliberate fall-through that should catch future cases added to
        // the enum.
        #[allow(
            clippy::wildcard_enum_match_arm,
            clippy::match_wildcard_for_single_variants
        )]
        match value {
            pinentry::Error::Cancelled | pinentry::Error::Timeout => Self::Cancelled,
            pinentry::Error::Io(e) => Self::Io(e),
            _ => Self::Password(Password::Pinentry(value)),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        // LINT: Deliberate fall-through that should catch future cases added to
        // the enum.
        #[allow(clippy::wildcard_enum_match_arm)]
        match value.classify() {
            serde_json::error::Category::Io => Self::Io(value.into()),
            _ => Self::Api(Api::MalformedReply(value.to_string())),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            Self::Api(Api::MalformedReply(value.to_string()))
        } else {
            Self::Http(value)
        }
    }
}

impl From<LinesCodecError> for Error {
    fn from(value: LinesCodecError) -> Self {
        match value {
            LinesCodecError::Io(e) => Self::Io(e),
            LinesCodecError::MaxLineLengthExceeded => Self::Internal(Internal::LineTooLong),
        }
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(value: tokio::task::JoinError) -> Self {
        Self::Io(value.into())
    }
}

#[derive(Error, Debug)]
pub(crate) enum Api {
    #[error("{message}")]
    Rejected { message: String },
    #[error("not signed in")]
    Unauthenticated,
    #[error("server replied with unexpected status {0}")]
    UnexpectedStatus(StatusCode),
    #[error("server reply could not be understood: {0}")]
    MalformedReply(String),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub(crate) enum Validation {
    #[error(r#"type "{0}" exactly to continue"#)]
    PhraseMismatch(String),
    #[error("passwords do not match")]
    PasswordMismatch,
    #[error("password must be at least {0} characters long")]
    PasswordTooShort(usize),
    #[error("password is required")]
    PasswordRequired,
}

#[derive(Error, Debug)]
pub(crate) enum Config {
    #[error("the URL scheme {0} is not supported (expected http or https)")]
    UnsupportedScheme(String),
}

#[derive(Error, Debug)]
pub(crate) enum Password {
    #[error("Pinentry implementation error: {0}")]
    Pinentry(pinentry::Error),
}

#[derive(Error, Debug)]
pub(crate) enum Internal {
    #[error("input line exceeded the maximum length")]
    LineTooLong,
}
