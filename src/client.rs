// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use secrecy::SecretString;

use crate::{error::Result, session::Session};

/// Operations the library portal backend offers this client.
#[async_trait]
pub(crate) trait Portal: Send + Sync {
    /// Asks the backend who the current cookie session belongs to.
    async fn whoami(&self) -> Result<Option<Session>>;

    async fn login(&self, enrollment_no: &str, password: &SecretString) -> Result<Session>;

    async fn logout(&self) -> Result<()>;

    async fn change_password(&self, new_password: &SecretString) -> Result<Session>;

    /// Files a request for an administrator to delete the signed-in account.
    /// Returns the backend's confirmation message.
    async fn request_deletion(&self, password: &SecretString, reason: &str) -> Result<String>;
}

#[async_trait]
impl Portal for Box<dyn Portal + '_> {
    async fn whoami(&self) -> Result<Option<Session>> {
        <dyn Portal>::whoami(self.as_ref()).await
    }

    async fn login(&self, enrollment_no: &str, password: &SecretString) -> Result<Session> {
        <dyn Portal>::login(self.as_ref(), enrollment_no, password).await
    }

    async fn logout(&self) -> Result<()> {
        <dyn Portal>::logout(self.as_ref()).await
    }

    async fn change_password(&self, new_password: &SecretString) -> Result<Session> {
        <dyn Portal>::change_password(self.as_ref(), new_password).await
    }

    async fn request_deletion(&self, password: &SecretString, reason: &str) -> Result<String> {
        <dyn Portal>::request_deletion(self.as_ref(), password, reason).await
    }
}
