// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::io::{self, Write as _};

use log::warn;

use crate::{
    app::App,
    command::{Command as _, Line, Shell},
    error::Result,
};

fn print_prompt(app: &App) -> Result<()> {
    print!("{}> ", app.current());
    io::stdout().flush()?;
    Ok(())
}

/// Reads and runs commands until `quit` or the end of input.
pub(crate) async fn run(app: &mut App) -> Result<()> {
    app.start().await?;

    loop {
        app.show_notifications().await;
        print_prompt(app)?;

        let Some(line) = app.read_line().await? else {
            println!();
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match Line::parse_line(&line) {
            Ok(Line {
                command: Shell::Quit,
            }) => break,
            Ok(Line { command }) => command,
            Err(e) => {
                let _ = e.print();
                continue;
            }
        };

        if let Err(e) = command.execute(app).await {
            warn!("Command failed: {}", e);
            let _ = app.notifications().error(e.to_string()).await;
        }
    }

    Ok(())
}
