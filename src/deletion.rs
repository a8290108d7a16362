// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

//! The account deletion request flow.
//!
//! Filing a deletion request takes three steps: acknowledging what will
//! happen, typing a phrase that names the account, and entering the account
//! password again. Only the last step talks to the backend, and the backend
//! only queues the request for an administrator.

use log::{debug, info};
use secrecy::{ExposeSecret as _, SecretString};

use crate::{
    client::Portal,
    error::{self, Result},
    session::UserId,
};

pub(crate) const PHRASE_PREFIX: &str = "delete ";
pub(crate) const FALLBACK_ERROR: &str =
    "Something went wrong while sending your request. Please try again.";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Stage {
    Warning,
    TypedConfirmation,
    CredentialVerification,
}

/// Permission to make exactly one deletion call, handed out by
/// [`Workflow::begin_submission`].
#[derive(Debug)]
pub(crate) struct Submission {
    generation: u64,
    password: SecretString,
}

impl Submission {
    pub(crate) const fn password(&self) -> &SecretString {
        &self.password
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// The backend accepted the request. The workflow is back at its start.
    Submitted { message: String },
    /// The request failed; the message is shown next to the password input.
    Failed { message: String },
    /// The workflow was closed while the call was running.
    Discarded,
}

/// The account deletion dialog.
///
/// [`Workflow::submit`] borrows the workflow for the whole call, so the shell
/// can never close it mid-flight. Callers that run the two halves apart
/// ([`Workflow::begin_submission`], then [`Workflow::finish_submission`]) may
/// close in between; the result is then reported as [`Outcome::Discarded`]
/// and leaves the reset workflow alone.
pub(crate) struct Workflow {
    identity: UserId,
    stage: Stage,
    typed_text: String,
    credential: Option<SecretString>,
    last_error: Option<String>,
    generation: u64,
    pending: Option<u64>,
}

impl Workflow {
    pub(crate) fn new(identity: UserId) -> Self {
        Self {
            identity,
            stage: Stage::Warning,
            typed_text: String::new(),
            credential: None,
            last_error: None,
            generation: 0,
            pending: None,
        }
    }

    pub(crate) const fn stage(&self) -> Stage {
        self.stage
    }

    pub(crate) fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// The text the user has to type, e.g. `delete 210101`.
    pub(crate) fn expected_phrase(&self) -> String {
        format!("{}{}", PHRASE_PREFIX, self.identity)
    }

    /// Whether [`Workflow::advance`] would succeed right now.
    pub(crate) fn can_advance(&self) -> bool {
        self.stage == Stage::TypedConfirmation && self.typed_text == self.expected_phrase()
    }

    pub(crate) fn acknowledge(&mut self) -> bool {
        if self.stage != Stage::Warning {
            return false;
        }
        self.stage = Stage::TypedConfirmation;
        true
    }

    pub(crate) fn set_typed_text<S: Into<String>>(&mut self, text: S) {
        if self.stage == Stage::TypedConfirmation {
            self.typed_text = text.into();
            self.last_error = None;
        }
    }

    /// Moves on to password entry if the typed phrase matches exactly.
    pub(crate) fn advance(&mut self) -> Result<()> {
        if !self.can_advance() {
            let err = error::Validation::PhraseMismatch(self.expected_phrase());
            self.last_error = Some(err.to_string());
            return Err(err.into());
        }
        self.stage = Stage::CredentialVerification;
        self.last_error = None;
        Ok(())
    }

    /// Stores the password to submit. An empty password clears it.
    pub(crate) fn set_credential(&mut self, password: SecretString) {
        if self.stage == Stage::CredentialVerification {
            self.credential = (!password.expose_secret().is_empty()).then_some(password);
        }
    }

    /// Marks a deletion call as in flight. Returns `None`, and nothing may be
    /// sent, unless the workflow is waiting for a password that has been
    /// entered and no other call is outstanding.
    pub(crate) fn begin_submission(&mut self) -> Option<Submission> {
        if self.stage != Stage::CredentialVerification || self.pending.is_some() {
            return None;
        }
        let Some(password) = self.credential.clone() else {
            self.last_error = Some(error::Validation::PasswordRequired.to_string());
            return None;
        };

        self.pending = Some(self.generation);
        self.last_error = None;
        Some(Submission {
            generation: self.generation,
            password,
        })
    }

    /// Applies the result of the call started by `submission`.
    pub(crate) fn finish_submission(
        &mut self,
        submission: Submission,
        result: Result<String>,
    ) -> Outcome {
        if submission.generation != self.generation {
            debug!("Discarding deletion result from a closed workflow");
            return Outcome::Discarded;
        }
        self.pending = None;

        match result {
            Ok(message) => {
                info!("Deletion request for {} accepted", self.identity);
                self.reset();
                Outcome::Submitted { message }
            }
            Err(e) => {
                debug!("Deletion request failed: {}", e);
                let message = e.user_message().unwrap_or_else(|| FALLBACK_ERROR.to_owned());
                self.last_error = Some(message.clone());
                Outcome::Failed { message }
            }
        }
    }

    /// Sends the entered password to the backend. Returns `None` when there
    /// was nothing to send.
    pub(crate) async fn submit<P: Portal + ?Sized>(
        &mut self,
        portal: &P,
        reason: &str,
    ) -> Option<Outcome> {
        let submission = self.begin_submission()?;
        let result = portal.request_deletion(submission.password(), reason).await;
        Some(self.finish_submission(submission, result))
    }

    /// Abandons the flow from whatever step it is in.
    pub(crate) fn close(&mut self) {
        self.generation += 1;
        self.reset();
    }

    fn reset(&mut self) {
        self.stage = Stage::Warning;
        self.typed_text.clear();
        self.credential = None;
        self.last_error = None;
        self.pending = None;
    }
}

// LINT: Part of the workflow's observable state that the shell does not
// display.
#[cfg_attr(not(test), allow(dead_code))]
impl Workflow {
    pub(crate) fn typed_text(&self) -> &str {
        &self.typed_text
    }

    pub(crate) const fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    pub(crate) const fn is_submitting(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use crate::client::testing::{rejected, FakePortal};

    use super::*;

    fn secret(s: &str) -> SecretString {
        SecretString::new(s.to_owned())
    }

    fn at_verification(id: &str) -> Result<Workflow> {
        let mut workflow = Workflow::new(UserId::new(id));
        assert!(workflow.acknowledge());
        workflow.set_typed_text(format!("delete {id}"));
        workflow.advance()?;
        Ok(workflow)
    }

    fn assert_pristine(workflow: &Workflow) {
        assert_eq!(workflow.stage(), Stage::Warning);
        assert_eq!(workflow.typed_text(), "");
        assert!(!workflow.has_credential());
        assert_eq!(workflow.last_error(), None);
        assert!(!workflow.is_submitting());
    }

    #[tokio::test]
    async fn phrase_must_match_exactly() {
        let portal = FakePortal::new();
        let mut workflow = Workflow::new(UserId::new("210101"));
        assert!(workflow.acknowledge());

        for attempt in [
            "",
            "delete",
            "delete ",
            "Delete 210101",
            "DELETE 210101",
            "delete 210101 ",
            " delete 210101",
            "delete  210101",
            "delete 21010",
            "delete 2101011",
            "remove 210101",
        ] {
            workflow.set_typed_text(attempt);
            assert!(!workflow.can_advance());
            assert!(workflow.advance().is_err());
            assert_eq!(workflow.stage(), Stage::TypedConfirmation);
            assert!(workflow.submit(&portal, "reason").await.is_none());
        }
        assert!(workflow.last_error().is_some());
        assert_eq!(portal.deletion_calls(), 0);

        workflow.set_typed_text("delete 210101");
        assert!(workflow.advance().is_ok());
        assert_eq!(workflow.stage(), Stage::CredentialVerification);
        assert_eq!(portal.deletion_calls(), 0);
    }

    #[tokio::test]
    async fn no_call_before_verification() {
        let portal = FakePortal::new();
        let mut workflow = Workflow::new(UserId::new("210101"));

        workflow.set_credential(secret("hunter22"));
        assert!(workflow.submit(&portal, "reason").await.is_none());
        assert!(!workflow.has_credential());
        assert_eq!(portal.deletion_calls(), 0);
    }

    #[test]
    fn only_one_submission_in_flight() -> Result<()> {
        let mut workflow = at_verification("210101")?;
        workflow.set_credential(secret("hunter22"));

        let first = workflow.begin_submission();
        assert!(first.is_some());
        assert!(workflow.is_submitting());
        assert!(workflow.begin_submission().is_none());
        assert!(workflow.begin_submission().is_none());

        let outcome = workflow.finish_submission(
            first.unwrap(),
            Err(rejected("Verification failed")),
        );
        assert!(matches!(outcome, Outcome::Failed { .. }));
        assert!(!workflow.is_submitting());
        assert!(workflow.begin_submission().is_some());
        Ok(())
    }

    #[test]
    fn missing_password_is_reported_inline() -> Result<()> {
        let mut workflow = at_verification("210101")?;
        assert!(workflow.begin_submission().is_none());

        workflow.set_credential(secret(""));
        assert!(!workflow.has_credential());
        assert!(workflow.begin_submission().is_none());
        assert_eq!(workflow.last_error(), Some("password is required"));
        assert!(!workflow.is_submitting());
        Ok(())
    }

    #[test]
    fn close_resets_from_every_stage() -> Result<()> {
        let mut workflow = Workflow::new(UserId::new("210101"));
        workflow.close();
        assert_pristine(&workflow);

        assert!(workflow.acknowledge());
        workflow.set_typed_text("delete 2101");
        let _ = workflow.advance();
        workflow.close();
        assert_pristine(&workflow);

        let mut workflow = at_verification("210101")?;
        workflow.set_credential(secret("hunter22"));
        workflow.close();
        assert_pristine(&workflow);

        let mut workflow = at_verification("210101")?;
        workflow.set_credential(secret("hunter22"));
        let _submission = workflow.begin_submission();
        workflow.close();
        assert_pristine(&workflow);
        Ok(())
    }

    #[test]
    fn late_result_after_close_is_discarded() -> Result<()> {
        let mut workflow = at_verification("210101")?;
        workflow.set_credential(secret("hunter22"));
        let submission = workflow.begin_submission().unwrap();

        workflow.close();
        let outcome = workflow.finish_submission(submission, Err(rejected("Verification failed")));

        assert_eq!(outcome, Outcome::Discarded);
        assert_pristine(&workflow);
        Ok(())
    }

    #[tokio::test]
    async fn transport_failure_uses_fallback_message() -> Result<()> {
        let portal = FakePortal::new();
        let mut workflow = at_verification("210101")?;
        workflow.set_credential(secret("hunter22"));

        let outcome = workflow.submit(&portal, "reason").await;

        assert_eq!(
            outcome,
            Some(Outcome::Failed {
                message: FALLBACK_ERROR.to_owned()
            })
        );
        assert_eq!(workflow.stage(), Stage::CredentialVerification);
        assert_eq!(workflow.last_error(), Some(FALLBACK_ERROR));
        Ok(())
    }

    #[tokio::test]
    async fn wrong_password_then_success() -> Result<()> {
        let portal = FakePortal::new()
            .with_deletion(Err(rejected("Verification failed")))
            .with_deletion(Ok("Request queued".to_owned()));
        let mut workflow = at_verification("210101")?;

        workflow.set_credential(secret("wrongpass"));
        let outcome = workflow.submit(&portal, "reason").await;
        assert_eq!(
            outcome,
            Some(Outcome::Failed {
                message: "Verification failed".to_owned()
            })
        );
        assert_eq!(workflow.stage(), Stage::CredentialVerification);
        assert_eq!(workflow.typed_text(), "delete 210101");
        assert_eq!(workflow.last_error(), Some("Verification failed"));

        workflow.set_credential(secret("hunter22"));
        let outcome = workflow.submit(&portal, "reason").await;
        assert_eq!(
            outcome,
            Some(Outcome::Submitted {
                message: "Request queued".to_owned()
            })
        );
        assert_pristine(&workflow);
        assert_eq!(portal.deletion_calls(), 2);
        Ok(())
    }
}
