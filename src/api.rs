// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use async_trait::async_trait;
use log::debug;
use reqwest::{Method, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{
    error::{self, Result},
    http::Http,
    session::{Session, UserId},
};

pub(crate) const SUCCESS: &str = "success";

/// A backend endpoint. The request body is the serialized value itself.
#[async_trait]
pub(crate) trait Executor: Serialize + Send + Sync + Sized {
    const METHOD: Method;
    const PATH: &'static str;

    type Response: DeserializeOwned + Send;

    async fn execute(self, http: &Http) -> Result<Self::Response> {
        let mut builder = http.request(Self::METHOD, Self::PATH)?;
        if Self::METHOD != Method::GET {
            builder = builder.json(&self);
        }

        let resp = builder.send().await?;
        let status = resp.status();
        let body = resp.bytes().await?;
        debug!("{} {} replied {}", Self::METHOD, Self::PATH, status);

        if status.is_success() {
            Ok(serde_json::from_slice(&body)?)
        } else {
            Err(failure(status, &body))
        }
    }
}

/// The shape shared by every failing reply and by the status-only replies.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct StatusReply {
    #[serde(default)]
    pub(crate) status: Option<String>,
    #[serde(default, alias = "error")]
    pub(crate) message: Option<String>,
}

impl StatusReply {
    pub(crate) fn is_success(&self) -> bool {
        self.status.as_deref() == Some(SUCCESS)
    }

    /// Converts a non-success reply into the error the user should see.
    pub(crate) fn into_rejection(self, fallback: &str) -> error::Error {
        error::Api::Rejected {
            message: self.message.unwrap_or_else(|| fallback.to_owned()),
        }
        .into()
    }
}

fn failure(status: StatusCode, body: &[u8]) -> error::Error {
    match serde_json::from_slice::<StatusReply>(body) {
        Ok(StatusReply {
            message: Some(message),
            ..
        }) => error::Api::Rejected { message }.into(),
        _ if status == StatusCode::UNAUTHORIZED => error::Api::Unauthenticated.into(),
        _ => error::Api::UnexpectedStatus(status).into(),
    }
}

fn scalar(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null | serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
            None
        }
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Bool(_) | serde_json::Value::Number(_) => Some(value.to_string()),
    }
}

/// An account as the backend describes it. Anything besides the enrollment
/// number is kept as a session attribute.
#[derive(Debug, Deserialize)]
pub(crate) struct UserRecord {
    pub(crate) enrollment_no: String,
    #[serde(flatten)]
    pub(crate) rest: BTreeMap<String, serde_json::Value>,
}

impl From<UserRecord> for Session {
    fn from(value: UserRecord) -> Self {
        Self::new(
            UserId::new(value.enrollment_no),
            value
                .rest
                .into_iter()
                .filter_map(|(key, value)| scalar(value).map(|v| (key, v)))
                .collect(),
        )
    }
}

/// Reply to login and password changes.
#[derive(Debug, Deserialize)]
pub(crate) struct AccountReply {
    #[serde(flatten)]
    pub(crate) outcome: StatusReply,
    #[serde(flatten)]
    pub(crate) user: Option<UserRecord>,
}

impl AccountReply {
    pub(crate) fn into_session(self, fallback: &str) -> Result<Session> {
        match self.user {
            Some(mut user) if self.outcome.is_success() => {
                let _ = user.rest.remove("status");
                let _ = user.rest.remove("message");
                Ok(user.into())
            }
            Some(_) | None => Err(self.outcome.into_rejection(fallback)),
        }
    }
}

#[derive(Serialize)]
pub(crate) struct Me;

#[derive(Debug, Deserialize)]
pub(crate) struct MeReply {
    #[serde(default)]
    pub(crate) user: Option<UserRecord>,
}

impl Executor for Me {
    const METHOD: Method = Method::GET;
    const PATH: &'static str = "/api/me";

    type Response = MeReply;
}

#[derive(Serialize)]
pub(crate) struct Login<'req> {
    pub(crate) enrollment_no: &'req str,
    pub(crate) password: &'req str,
}

impl Executor for Login<'_> {
    const METHOD: Method = Method::POST;
    const PATH: &'static str = "/api/login";

    type Response = AccountReply;
}

#[derive(Serialize)]
pub(crate) struct Logout {}

impl Executor for Logout {
    const METHOD: Method = Method::POST;
    const PATH: &'static str = "/api/logout";

    type Response = serde_json::Value;
}

#[derive(Serialize)]
pub(crate) struct ChangePassword<'req> {
    pub(crate) new_password: &'req str,
}

impl Executor for ChangePassword<'_> {
    const METHOD: Method = Method::POST;
    const PATH: &'static str = "/api/change_password";

    type Response = AccountReply;
}

#[derive(Serialize)]
pub(crate) struct RequestDeletion<'req> {
    pub(crate) password: &'req str,
    pub(crate) reason: &'req str,
}

impl Executor for RequestDeletion<'_> {
    const METHOD: Method = Method::POST;
    const PATH: &'static str = "/api/request-deletion";

    type Response = StatusReply;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_record_keeps_scalar_attributes() -> Result<()> {
        let reply: MeReply = serde_json::from_str(
            r#"{"user": {"enrollment_no": "210101", "name": "Asha Rao", "year": 3, "tags": ["x"], "phone": null}}"#,
        )?;
        let session = Session::from(reply.user.unwrap());

        assert_eq!(session.identity().as_str(), "210101");
        assert_eq!(session.attribute("name"), Some("Asha Rao"));
        assert_eq!(session.attribute("year"), Some("3"));
        assert_eq!(session.attribute("tags"), None);
        assert_eq!(session.attribute("phone"), None);
        Ok(())
    }

    #[test]
    fn absent_user_means_no_session() -> Result<()> {
        let reply: MeReply = serde_json::from_str("{}")?;
        assert!(reply.user.is_none());
        Ok(())
    }

    #[test]
    fn account_reply_failure_carries_message() -> Result<()> {
        let reply: AccountReply =
            serde_json::from_str(r#"{"status": "error", "message": "Invalid credentials"}"#)?;
        let err = reply.into_session("Login failed").err();

        assert_eq!(
            err.and_then(|e| e.user_message()).as_deref(),
            Some("Invalid credentials")
        );
        Ok(())
    }

    #[test]
    fn failure_prefers_server_message() {
        let err = failure(StatusCode::FORBIDDEN, br#"{"error": "Duplicate request"}"#);
        assert_eq!(err.user_message().as_deref(), Some("Duplicate request"));

        let err = failure(StatusCode::UNAUTHORIZED, b"<html></html>");
        assert!(matches!(err, error::Error::Api(error::Api::Unauthenticated)));

        let err = failure(StatusCode::BAD_GATEWAY, b"");
        assert!(matches!(
            err,
            error::Error::Api(error::Api::UnexpectedStatus(StatusCode::BAD_GATEWAY))
        ));
    }

    #[test]
    fn unreadable_reply_is_malformed() {
        let err = error::Error::from(serde_json::from_str::<MeReply>("<html>").unwrap_err());
        assert!(matches!(err, error::Error::Api(error::Api::MalformedReply(_))));
    }
}
