// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use tabled::{settings::Style, Table, Tabled};

use crate::{
    error::{self, Result},
    route::View,
    session::Session,
};

#[derive(Tabled)]
struct Attribute<'row> {
    #[tabled(rename = "Field")]
    key: &'row str,
    #[tabled(rename = "Value")]
    value: &'row str,
}

fn signed_in(session: Option<&Session>) -> Result<&Session> {
    session.ok_or_else(|| error::Error::Render("this page needs a signed-in user".to_owned()))
}

fn heading(view: View) -> String {
    let title = view.to_string();
    format!("{title}\n{}", "=".repeat(title.chars().count()))
}

/// Renders `view` as text. Authenticated views fail without a session; the
/// route guard is expected to prevent that.
pub(crate) fn render(view: View, session: Option<&Session>) -> Result<String> {
    let body = match view {
        View::Login => "Sign in with `login <enrollment-no>`.".to_owned(),
        View::Register => {
            "New accounts are created by the library desk. Once you have an enrollment number, \
             sign in with `login <enrollment-no>`."
                .to_owned()
        }
        View::Dashboard => {
            let session = signed_in(session)?;
            format!(
                "Welcome back, {}.\n\nPages: catalogue, loans, notifications, profile, settings, services",
                session.display_name()
            )
        }
        View::Catalogue => {
            let _ = signed_in(session)?;
            "Browse and search the library catalogue.".to_owned()
        }
        View::Loans => {
            let _ = signed_in(session)?;
            "Books you currently have on loan and their due dates.".to_owned()
        }
        View::Notifications => {
            let _ = signed_in(session)?;
            "Use `notifications` to list messages and `dismiss <id>` to remove one.".to_owned()
        }
        View::Profile => {
            let session = signed_in(session)?;
            let mut rows = vec![Attribute {
                key: "enrollment_no",
                value: session.identity().as_str(),
            }];
            rows.extend(
                session
                    .attributes()
                    .iter()
                    .map(|(key, value)| Attribute {
                        key: key.as_str(),
                        value: value.as_str(),
                    }),
            );
            Table::new(rows).with(Style::rounded()).to_string()
        }
        View::Settings => {
            let _ = signed_in(session)?;
            [
                "  change-password  choose a new password",
                "  delete-account   ask the library to delete your account",
                "  logout           sign out",
            ]
            .join("\n")
        }
        View::Services => {
            let _ = signed_in(session)?;
            "Inter-library loans, study room bookings and other librarian services.".to_owned()
        }
    };

    Ok(format!("{}\n\n{body}", heading(view)))
}
