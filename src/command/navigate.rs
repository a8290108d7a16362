// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;

use crate::{app::App, boundary::Recovery, error::Result, route::View};

/// Open a page.
#[derive(Debug, Parser)]
pub(crate) struct Go {
    #[arg(value_enum)]
    pub(crate) view: View,
}

#[async_trait]
impl super::Command for Go {
    async fn execute(self, app: &mut App) -> Result<()> {
        let _ = app.navigate(self.view).await?;
        Ok(())
    }
}

/// Go back to the dashboard, starting over if something went wrong.
#[derive(Debug, Parser)]
pub(crate) struct Home;

#[async_trait]
impl super::Command for Home {
    async fn execute(self, app: &mut App) -> Result<()> {
        let _ = app.recover(Recovery::Home).await?;
        Ok(())
    }
}

/// Start over from the current page.
#[derive(Debug, Parser)]
pub(crate) struct Reload;

#[async_trait]
impl super::Command for Reload {
    async fn execute(self, app: &mut App) -> Result<()> {
        let _ = app.recover(Recovery::Reload).await?;
        Ok(())
    }
}

/// Show what made the last page fail.
#[derive(Debug, Parser)]
pub(crate) struct Details;

#[async_trait]
impl super::Command for Details {
    async fn execute(self, app: &mut App) -> Result<()> {
        match app.boundary().details() {
            Some(details) => println!("{details}"),
            None => println!("Nothing has gone wrong."),
        }
        Ok(())
    }
}
