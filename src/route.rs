// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use clap::ValueEnum;
use inflector::Inflector as _;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum View {
    Login,
    Register,
    Dashboard,
    Catalogue,
    Loans,
    Notifications,
    Profile,
    Settings,
    Services,
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = self.to_possible_value().ok_or(std::fmt::Error)?;
        write!(f, "{}", value.get_name().to_title_case())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Access {
    /// Only makes sense before signing in.
    GuestOnly,
    AuthenticatedOnly,
}

impl View {
    pub(crate) const HOME: Self = Self::Dashboard;

    pub(crate) const fn access(self) -> Access {
        match self {
            Self::Login | Self::Register => Access::GuestOnly,
            Self::Dashboard
            | Self::Catalogue
            | Self::Loans
            | Self::Notifications
            | Self::Profile
            | Self::Settings
            | Self::Services => Access::AuthenticatedOnly,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Decision {
    Render(View),
    Redirect(View),
}

impl Decision {
    pub(crate) const fn target(self) -> View {
        match self {
            Self::Render(view) | Self::Redirect(view) => view,
        }
    }
}

/// Decides what to show for a navigation. Callers must ask again on every
/// navigation since the session can change at any time.
pub(crate) const fn decide(requested: View, authenticated: bool) -> Decision {
    match (requested.access(), authenticated) {
        (Access::AuthenticatedOnly, false) => Decision::Redirect(View::Login),
        (Access::GuestOnly, true) => Decision::Redirect(View::HOME),
        (Access::AuthenticatedOnly, true) | (Access::GuestOnly, false) => {
            Decision::Render(requested)
        }
    }
}
