// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;
use log::{info, warn};
use secrecy::ExposeSecret as _;

use crate::{
    app::App,
    error::{self, Result},
    password::RequestBuilder,
    route::View,
};

use super::inline_error;

/// Sign in with an enrollment number.
#[derive(Debug, Parser)]
pub(crate) struct Login {
    /// Your enrollment number.
    enrollment_no: String,
}

#[async_trait]
impl super::Command for Login {
    async fn execute(self, app: &mut App) -> Result<()> {
        if app.session().get().await?.is_some() {
            let _ = app.navigate(View::Login).await?;
            return Ok(());
        }

        let req = RequestBuilder::new("Password")
            .with_description(&format!("Sign in as {}", self.enrollment_no))
            .into_request();
        let Some(password) = app.prompt_password(req).await? else {
            return Ok(());
        };

        match app.portal().login(&self.enrollment_no, &password).await {
            Ok(session) => {
                info!("Signed in as {}", session.identity());
                app.session().set(&session).await?;
                let _ = app
                    .notifications()
                    .success(format!("Welcome, {}", session.display_name()))
                    .await;
                let _ = app.navigate(View::HOME).await?;
            }
            Err(e) => inline_error(&e),
        }
        Ok(())
    }
}

/// Sign out.
#[derive(Debug, Parser)]
pub(crate) struct Logout;

#[async_trait]
impl super::Command for Logout {
    async fn execute(self, app: &mut App) -> Result<()> {
        if let Err(e) = app.portal().logout().await {
            warn!("The backend did not confirm the sign out: {}", e);
        }
        app.session().clear().await?;
        let _ = app.notifications().info("You have been signed out").await;
        let _ = app.navigate(View::Login).await?;
        Ok(())
    }
}

/// Show who is signed in.
#[derive(Debug, Parser)]
pub(crate) struct Whoami;

#[async_trait]
impl super::Command for Whoami {
    async fn execute(self, app: &mut App) -> Result<()> {
        match app.session().get().await? {
            Some(session) => println!("{} ({})", session.display_name(), session.identity()),
            None => println!("Not signed in."),
        }
        Ok(())
    }
}

/// Choose a new password.
#[derive(Debug, Parser)]
pub(crate) struct ChangePassword;

#[async_trait]
impl super::Command for ChangePassword {
    async fn execute(self, app: &mut App) -> Result<()> {
        if app.require_session().await?.is_none() {
            return Ok(());
        }

        let Some(new_password) = app
            .prompt_password(RequestBuilder::new("New password").into_request())
            .await?
        else {
            return Ok(());
        };
        let Some(confirmation) = app
            .prompt_password(RequestBuilder::new("Confirm new password").into_request())
            .await?
        else {
            return Ok(());
        };

        let min = app.config().min_password_length();
        if new_password.expose_secret().chars().count() < min {
            inline_error(&error::Error::from(error::Validation::PasswordTooShort(min)));
            return Ok(());
        }
        if new_password.expose_secret() != confirmation.expose_secret() {
            inline_error(&error::Error::from(error::Validation::PasswordMismatch));
            return Ok(());
        }

        match app.portal().change_password(&new_password).await {
            Ok(session) => {
                app.session().set(&session).await?;
                let _ = app.notifications().success("Password updated").await;
            }
            Err(e) => inline_error(&e),
        }
        Ok(())
    }
}
