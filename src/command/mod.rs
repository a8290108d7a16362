// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::{Parser, Subcommand};

use crate::{
    app::App,
    error::{self, Result},
};

pub(crate) mod account;
pub(crate) mod delete_account;
pub(crate) mod navigate;
pub(crate) mod notifications;

/// Prints an error next to the input that caused it.
fn inline_error(err: &error::Error) {
    match err.user_message() {
        Some(message) => println!("Error: {message}"),
        None => println!("Error: {err}"),
    }
}

#[async_trait]
pub(crate) trait Command {
    async fn execute(self, app: &mut App) -> Result<()>;
}

#[derive(Debug, Subcommand)]
pub(crate) enum Shell {
    Go(navigate::Go),
    Home(navigate::Home),
    Reload(navigate::Reload),
    Details(navigate::Details),
    Login(account::Login),
    Logout(account::Logout),
    Whoami(account::Whoami),
    ChangePassword(account::ChangePassword),
    DeleteAccount(delete_account::Command),
    Notifications(notifications::List),
    Dismiss(notifications::Dismiss),
    /// Leave the shell.
    Quit,
}

/// One line typed at the shell prompt.
#[derive(Debug, Parser)]
#[command(no_binary_name = true, disable_version_flag = true)]
pub(crate) struct Line {
    #[command(subcommand)]
    pub(crate) command: Shell,
}

impl Line {
    pub(crate) fn parse_line(line: &str) -> Result<Self, clap::Error> {
        Self::try_parse_from(line.split_whitespace())
    }
}

#[async_trait]
impl Command for Shell {
    async fn execute(self, app: &mut App) -> Result<()> {
        match self {
            Self::Go(cmd) => cmd.execute(app).await,
            Self::Home(cmd) => cmd.execute(app).await,
            Self::Reload(cmd) => cmd.execute(app).await,
            Self::Details(cmd) => cmd.execute(app).await,
            Self::Login(cmd) => cmd.execute(app).await,
            Self::Logout(cmd) => cmd.execute(app).await,
            Self::Whoami(cmd) => cmd.execute(app).await,
            Self::ChangePassword(cmd) => cmd.execute(app).await,
            Self::DeleteAccount(cmd) => cmd.execute(app).await,
            Self::Notifications(cmd) => cmd.execute(app).await,
            Self::Dismiss(cmd) => cmd.execute(app).await,
            Self::Quit => Ok(()),
        }
    }
}
