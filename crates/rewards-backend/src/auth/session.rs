use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{watch, RwLock};

use super::CredentialSource;
use crate::error::{ApiError, Outcome};

/// An authenticated Twitch session handed over by the login flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub user_id: String,
    pub user_login: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Checks if the token has expired
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Utc::now() > at)
    }

    /// Checks if the token exists and is not expired
    pub fn is_valid(&self) -> bool {
        !self.access_token.is_empty() && !self.is_expired()
    }
}

/// In-memory credential source
///
/// The host writes sessions into it; request code reads from it through
/// [`CredentialSource`].
pub struct SessionCredentials {
    client_id: String,
    session: RwLock<Option<Session>>,
    change_tx: watch::Sender<Option<String>>,
}

impl SessionCredentials {
    /// Creates an unauthenticated credential source
    pub fn new(client_id: impl Into<String>) -> Self {
        let (change_tx, _) = watch::channel(None);
        Self {
            client_id: client_id.into(),
            session: RwLock::new(None),
            change_tx,
        }
    }

    /// Installs a session, notifying subscribers if the user changed
    pub async fn set_session(&self, session: Session) {
        let user_id = session.user_id.clone();
        let mut guard = self.session.write().await;
        let changed = guard.as_ref().map(|s| &s.user_id) != Some(&user_id);
        *guard = Some(session);

        // Published under the lock so notifications follow write order
        if changed {
            tracing::info!(user_id = %user_id, "Twitch user changed");
            self.change_tx.send_replace(Some(user_id));
        }
    }

    /// Replaces the access token of the current session after a refresh
    ///
    /// The identity is unchanged, so no notification is sent.
    pub async fn set_access_token(
        &self,
        access_token: String,
        expires_at: Option<DateTime<Utc>>,
    ) -> Outcome<()> {
        let mut guard = self.session.write().await;
        let session = guard.as_mut().ok_or(ApiError::Unauthenticated)?;
        session.access_token = access_token;
        session.expires_at = expires_at;
        Ok(())
    }

    /// Logs out, notifying subscribers if a session existed
    pub async fn clear(&self) {
        let mut guard = self.session.write().await;
        if guard.take().is_some() {
            tracing::info!("Twitch session cleared");
            self.change_tx.send_replace(None);
        }
    }

    /// Returns a copy of the current session
    pub async fn session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }
}

#[async_trait]
impl CredentialSource for SessionCredentials {
    fn client_id(&self) -> &str {
        &self.client_id
    }

    async fn access_token(&self) -> Outcome<String> {
        match self.session.read().await.as_ref() {
            Some(session) if session.is_valid() => Ok(session.access_token.clone()),
            Some(_) => {
                tracing::warn!("Access token expired");
                Err(ApiError::Unauthenticated)
            }
            None => Err(ApiError::Unauthenticated),
        }
    }

    async fn user_id(&self) -> Outcome<String> {
        self.session
            .read()
            .await
            .as_ref()
            .map(|s| s.user_id.clone())
            .ok_or(ApiError::Unauthenticated)
    }

    fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.change_tx.subscribe()
    }
}
