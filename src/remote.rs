// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use secrecy::{ExposeSecret as _, SecretString};

use crate::{
    api::{self, Executor as _},
    client,
    error::Result,
    http::Http,
    session::Session,
};

/// The portal reached over HTTP.
pub(crate) struct Portal {
    http: Http,
}

impl Portal {
    pub(crate) const fn new(http: Http) -> Self {
        Self { http }
    }
}

#[async_trait]
impl client::Portal for Portal {
    async fn whoami(&self) -> Result<Option<Session>> {
        Ok(api::Me.execute(&self.http).await?.user.map(Session::from))
    }

    async fn login(&self, enrollment_no: &str, password: &SecretString) -> Result<Session> {
        api::Login {
            enrollment_no,
            password: password.expose_secret(),
        }
        .execute(&self.http)
        .await?
        .into_session("Login failed")
    }

    async fn logout(&self) -> Result<()> {
        let _ = api::Logout {}.execute(&self.http).await?;
        Ok(())
    }

    async fn change_password(&self, new_password: &SecretString) -> Result<Session> {
        api::ChangePassword {
            new_password: new_password.expose_secret(),
        }
        .execute(&self.http)
        .await?
        .into_session("Password could not be changed")
    }

    async fn request_deletion(&self, password: &SecretString, reason: &str) -> Result<String> {
        let reply = api::RequestDeletion {
            password: password.expose_secret(),
            reason,
        }
        .execute(&self.http)
        .await?;

        if reply.is_success() {
            Ok(reply
                .message
                .unwrap_or_else(|| "Deletion request submitted".to_owned()))
        } else {
            Err(reply.into_rejection("Deletion request was not accepted"))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use axum::{
        extract::Json,
        http::{header::SET_COOKIE, HeaderMap, StatusCode as AxumStatus},
        response::IntoResponse,
        routing::{get, post},
        Router,
    };
    use serde_json::{json, Value};

    use crate::{client::Portal as _, error, http::tests::http_for};

    use super::*;

    async fn me() -> impl IntoResponse {
        (
            [(SET_COOKIE, "csrf_token=tok123; Path=/")],
            Json(json!({"user": {"enrollment_no": "210101", "name": "Asha Rao"}})),
        )
    }

    async fn request_deletion(headers: HeaderMap, Json(body): Json<Value>) -> impl IntoResponse {
        if headers.get("X-CSRF-Token").and_then(|v| v.to_str().ok()) != Some("tok123") {
            return (
                AxumStatus::FORBIDDEN,
                Json(json!({"message": "CSRF token missing"})),
            );
        }
        if body["password"] == "hunter22" && body["reason"].is_string() {
            (
                AxumStatus::OK,
                Json(json!({"status": "success", "message": "Request queued for approval"})),
            )
        } else {
            (
                AxumStatus::OK,
                Json(json!({"status": "error", "message": "Verification failed"})),
            )
        }
    }

    async fn login(Json(body): Json<Value>) -> impl IntoResponse {
        if body["password"] == "hunter22" {
            (
                AxumStatus::OK,
                Json(json!({"status": "success", "enrollment_no": body["enrollment_no"], "name": "Asha Rao"})),
            )
        } else {
            (
                AxumStatus::UNAUTHORIZED,
                Json(json!({"message": "Invalid enrollment number or password"})),
            )
        }
    }

    async fn portal_server() -> SocketAddr {
        let app = Router::new()
            .route("/api/me", get(me))
            .route("/api/login", post(login))
            .route("/api/request-deletion", post(request_deletion));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let _handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    fn secret(s: &str) -> SecretString {
        SecretString::new(s.to_owned())
    }

    #[tokio::test]
    async fn whoami_reads_user_record() -> Result<()> {
        let portal = Portal::new(http_for(portal_server().await));

        let session = portal.whoami().await?;
        assert_eq!(
            session.as_ref().map(|s| s.identity().as_str()),
            Some("210101")
        );
        Ok(())
    }

    #[tokio::test]
    async fn login_failure_surfaces_server_message() -> Result<()> {
        let portal = Portal::new(http_for(portal_server().await));

        let ok = portal.login("210101", &secret("hunter22")).await?;
        assert_eq!(ok.display_name(), "Asha Rao");
        assert_eq!(ok.attribute("status"), None);

        let err = portal.login("210101", &secret("nope")).await.err();
        assert_eq!(
            err.and_then(|e| e.user_message()).as_deref(),
            Some("Invalid enrollment number or password")
        );
        Ok(())
    }

    #[tokio::test]
    async fn deletion_request_carries_csrf_token() -> Result<()> {
        let portal = Portal::new(http_for(portal_server().await));
        let _ = portal.whoami().await?;

        let err = portal
            .request_deletion(&secret("wrongpass"), "testing")
            .await
            .err();
        assert!(matches!(
            err,
            Some(error::Error::Api(error::Api::Rejected { ref message })) if message == "Verification failed"
        ));

        let message = portal
            .request_deletion(&secret("hunter22"), "testing")
            .await?;
        assert_eq!(message, "Request queued for approval");
        Ok(())
    }

    #[tokio::test]
    async fn deletion_without_cookie_is_refused_by_server() {
        let portal = Portal::new(http_for(portal_server().await));

        let err = portal.request_deletion(&secret("hunter22"), "testing").await.err();
        assert_eq!(
            err.and_then(|e| e.user_message()).as_deref(),
            Some("CSRF token missing")
        );
    }
}
