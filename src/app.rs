// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use log::info;
use secrecy::SecretString;

use crate::{
    boundary::{Boundary, Recovery},
    client::Portal,
    config::Config,
    error::{Error, Result},
    input::Input,
    notify, password,
    route::{self, Decision, View},
    session::{self, Session},
    view,
};

/// Everything a running shell owns. Commands receive it mutably, one at a
/// time.
pub(crate) struct App {
    config: Config,
    portal: Arc<dyn Portal>,
    session: session::Store,
    reader: session::Reader,
    notifications: notify::Queue,
    boundary: Boundary,
    prompt: Arc<dyn password::Prompt>,
    input: Box<dyn Input>,
    current: View,
}

impl App {
    pub(crate) fn new(
        config: Config,
        portal: Arc<dyn Portal>,
        session: session::Store,
        prompt: Arc<dyn password::Prompt>,
        input: Box<dyn Input>,
    ) -> Self {
        let reader = session.reader();
        let notifications = notify::Queue::new(config.notification_duration());
        Self {
            config,
            portal,
            session,
            reader,
            notifications,
            boundary: Boundary::new(),
            prompt,
            input,
            current: View::Login,
        }
    }

    pub(crate) const fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn portal(&self) -> &dyn Portal {
        self.portal.as_ref()
    }

    pub(crate) const fn session(&self) -> &session::Store {
        &self.session
    }

    pub(crate) const fn notifications(&self) -> &notify::Queue {
        &self.notifications
    }

    pub(crate) const fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    pub(crate) const fn current(&self) -> View {
        self.current
    }

    pub(crate) async fn read_line(&mut self) -> Result<Option<String>> {
        self.input.read_line().await
    }

    /// Asks for a password. `None` means the user cancelled or no prompt was
    /// available.
    pub(crate) async fn prompt_password(
        &mut self,
        req: password::Request,
    ) -> Result<Option<SecretString>> {
        match self.prompt.prompt(req).await {
            Ok(answer) => Ok(answer),
            Err(Error::Cancelled) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Probes the backend for a session and shows the start page.
    pub(crate) async fn start(&mut self) -> Result<()> {
        self.session.initialize(self.portal.as_ref()).await?;
        let _ = self.navigate(View::HOME).await?;
        Ok(())
    }

    /// Shows `requested`, or wherever the route guard sends us instead.
    pub(crate) async fn navigate(&mut self, requested: View) -> Result<View> {
        let session = self.reader.get().await?;
        let decision = route::decide(requested, session.is_some());
        if let Decision::Redirect(target) = decision {
            info!("Redirecting from {} to {}", requested, target);
        }

        let target = decision.target();
        let screen = self
            .boundary
            .contain(|| view::render(target, session.as_ref()));
        println!("{screen}");
        self.current = target;
        Ok(target)
    }

    /// Clears a tripped boundary and starts over as if freshly launched.
    pub(crate) async fn recover(&mut self, recovery: Recovery) -> Result<View> {
        let target = match self.boundary.reset(recovery) {
            Recovery::Reload => self.current,
            Recovery::Home => View::HOME,
        };
        self.session.initialize(self.portal.as_ref()).await?;
        self.navigate(target).await
    }

    /// Returns the current session, or sends the user to the login page.
    pub(crate) async fn require_session(&mut self) -> Result<Option<Session>> {
        match self.reader.get().await? {
            Some(session) => Ok(Some(session)),
            None => {
                let _ = self.navigate(View::Login).await?;
                Ok(None)
            }
        }
    }

    pub(crate) async fn show_notifications(&self) {
        for notification in self.notifications.active().await {
            println!(
                "[{}] {} (#{})",
                notification.kind, notification.message, notification.id
            );
        }
    }
}
