// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{ffi::OsString, path::Path};

use async_trait::async_trait;
use secrecy::SecretString;
use tokio::task;

use crate::{error::Result, metadata};

#[derive(Debug, Default, Clone)]
pub(crate) struct Request {
    label: String,
    description: Option<String>,
    error: Option<String>,
}

impl Request {
    pub(crate) fn label(&self) -> &str {
        &self.label
    }

    pub(crate) fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

pub(crate) struct RequestBuilder {
    label: String,
    description: Option<String>,
    error: Option<String>,
}

impl RequestBuilder {
    pub(crate) fn new(label: &str) -> Self {
        Self {
            label: label.to_owned(),
            description: None,
            error: None,
        }
    }

    pub(crate) fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_owned());
        self
    }

    pub(crate) fn with_error(mut self, error: Option<&str>) -> Self {
        self.error = error.map(str::to_owned);
        self
    }

    pub(crate) fn into_request(self) -> Request {
        Request {
            label: self.label,
            description: self.description,
            error: self.error,
        }
    }
}

/// Asks the user for a password. `Ok(None)` means this prompt is not
/// available and the next one should be tried.
#[async_trait]
pub(crate) trait Prompt: Send + Sync {
    async fn prompt(&self, req: Request) -> Result<Option<SecretString>>;
}

#[async_trait]
impl<T: Prompt + ?Sized> Prompt for Box<T> {
    async fn prompt(&self, req: Request) -> Result<Option<SecretString>> {
        (**self).prompt(req).await
    }
}

#[async_trait]
impl<T: Prompt> Prompt for Vec<T> {
    async fn prompt(&self, req: Request) -> Result<Option<SecretString>> {
        for candidate in self {
            if let r @ (Ok(Some(_)) | Err(_)) = candidate.prompt(req.clone()).await {
                return r;
            }
        }

        Ok(None)
    }
}

pub(crate) struct PinentryPrompt {
    executable: Option<OsString>,
}

impl PinentryPrompt {
    pub(crate) const fn new() -> Self {
        Self { executable: None }
    }

    pub(crate) fn new_with_executable<P: AsRef<Path>>(executable: P) -> Self {
        Self {
            executable: Some(executable.as_ref().as_os_str().into()),
        }
    }
}

#[async_trait]
impl Prompt for PinentryPrompt {
    async fn prompt(&self, req: Request) -> Result<Option<SecretString>> {
        fn interact<'input>(
            mut input: pinentry::PassphraseInput<'input>,
            title: &'input str,
            req: &'input Request,
        ) -> Result<SecretString> {
            _ = input.required("A password is required to continue.");
            _ = input.with_title(title);
            _ = input.with_prompt(&req.label);
            if let Some(description) = req.description.as_ref() {
                _ = input.with_description(description);
            }
            if let Some(e) = req.error.as_ref() {
                _ = input.with_error(e);
            }

            Ok(input.interact()?)
        }

        let title = format!("{} - {}", req.label, *metadata::CLIENT_DISPLAY_NAME);

        let input = self
            .executable
            .as_ref()
            .and_then(pinentry::PassphraseInput::with_binary)
            .or_else(pinentry::PassphraseInput::with_default_binary)
            .map(|input| task::spawn_blocking(move || interact(input, &title, &req)));

        Ok(match input {
            Some(fut) => Some(fut.await??),
            None => None,
        })
    }
}

pub(crate) struct RpasswordPrompt;

#[async_trait]
impl Prompt for RpasswordPrompt {
    async fn prompt(&self, req: Request) -> Result<Option<SecretString>> {
        if let Some(error) = req.error() {
            eprintln!("Error: {error}");
        }
        if let Some(description) = req.description.as_ref() {
            eprintln!("{description}");
        }

        let label = format!("{}: ", req.label());
        Ok(Some(
            task::spawn_blocking(move || rpassword::prompt_password(label).map(SecretString::new))
                .await??,
        ))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::{collections::VecDeque, sync::Mutex};

    use super::*;

    /// Answers prompts from a fixed list and remembers what it was asked.
    #[derive(Default)]
    pub(crate) struct ScriptedPrompt {
        answers: Mutex<VecDeque<Option<String>>>,
        requests: Mutex<Vec<Request>>,
    }

    impl ScriptedPrompt {
        pub(crate) fn new<I: IntoIterator<Item = Option<&'static str>>>(answers: I) -> Self {
            Self {
                answers: Mutex::new(
                    answers
                        .into_iter()
                        .map(|a| a.map(str::to_owned))
                        .collect(),
                ),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn requests(&self) -> Vec<Request> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Prompt for ScriptedPrompt {
        async fn prompt(&self, req: Request) -> Result<Option<SecretString>> {
            self.requests.lock().unwrap().push(req);
            Ok(self
                .answers
                .lock()
                .unwrap()
                .pop_front()
                .flatten()
                .map(SecretString::new))
        }
    }
}
