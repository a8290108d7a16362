// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;
use log::info;

use crate::{
    app::App,
    deletion::{Outcome, Stage, Workflow},
    error::Result,
    password::RequestBuilder,
    route::View,
};

const WARNING: &str = "\
Requesting account deletion

If the library approves this request, your account, loan history, saved
searches and pending service requests are removed permanently. Books you
still have on loan must be returned first. This cannot be undone.";

const CANCEL: &str = "cancel";

/// Ask the library to delete your account.
#[derive(Debug, Parser)]
pub(crate) struct Command;

fn is_cancel(line: Option<&str>) -> bool {
    line.map_or(true, |l| l.is_empty() || l == CANCEL)
}

/// Walks the user through the workflow. Returns the backend's message once the
/// request has been accepted, or `None` if the user gave up.
async fn drive(app: &mut App, workflow: &mut Workflow) -> Result<Option<String>> {
    loop {
        match workflow.stage() {
            Stage::Warning => {
                println!("{WARNING}\n");
                println!("Type `continue` to go on, or press Enter to cancel.");
                let line = app.read_line().await?;
                if line.as_deref() != Some("continue") {
                    workflow.close();
                    return Ok(None);
                }
                let _ = workflow.acknowledge();
            }
            Stage::TypedConfirmation => {
                println!("To confirm, type: {}", workflow.expected_phrase());
                let line = app.read_line().await?;
                if is_cancel(line.as_deref()) {
                    workflow.close();
                    return Ok(None);
                }
                workflow.set_typed_text(line.unwrap_or_default());
                if let Err(e) = workflow.advance() {
                    println!("Error: {e}");
                }
            }
            Stage::CredentialVerification => {
                let req = RequestBuilder::new("Password")
                    .with_description("Enter your password to send the deletion request.")
                    .with_error(workflow.last_error())
                    .into_request();
                let Some(password) = app.prompt_password(req).await? else {
                    workflow.close();
                    return Ok(None);
                };
                workflow.set_credential(password);

                match workflow
                    .submit(app.portal(), app.config().deletion_reason())
                    .await
                {
                    Some(Outcome::Submitted { message }) => return Ok(Some(message)),
                    Some(Outcome::Discarded) => return Ok(None),
                    Some(Outcome::Failed { .. }) | None => {}
                }
            }
        }
    }
}

#[async_trait]
impl super::Command for Command {
    async fn execute(self, app: &mut App) -> Result<()> {
        let Some(session) = app.require_session().await? else {
            return Ok(());
        };
        if app.navigate(View::Settings).await? != View::Settings {
            return Ok(());
        }

        let mut workflow = Workflow::new(session.identity().clone());
        match drive(app, &mut workflow).await? {
            Some(message) => {
                info!("Account deletion requested for {}", session.identity());
                let _ = app.notifications().success(message).await;
                app.session().clear().await?;
                let _ = app.navigate(View::Login).await?;
            }
            None => println!("Account deletion cancelled."),
        }
        Ok(())
    }
}
