mod session;

pub use session::{Session, SessionCredentials};

use async_trait::async_trait;
use tokio::sync::watch;

use crate::error::Outcome;

/// Twitch application client ID used by Rewards Theater
pub const CLIENT_ID: &str = "2u4jgrdekf0pwdpq7cmqcarifv93z3";

/// OAuth scopes the host's login flow must request
pub const SCOPES: &[&str] = &["channel:read:redemptions", "channel:manage:redemptions"];

/// Supplies the credentials attached to authenticated requests
///
/// The OAuth flow that produces them lives outside this crate. Tokens are read
/// on every request, so a token refreshed mid-session is used by the next call.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// Client ID sent in the `Client-Id` header
    fn client_id(&self) -> &str;

    /// Current bearer token, or `ApiError::Unauthenticated`
    async fn access_token(&self) -> Outcome<String>;

    /// Authenticated user's ID, or `ApiError::Unauthenticated`
    async fn user_id(&self) -> Outcome<String>;

    /// Receiver notified whenever the authenticated identity changes
    ///
    /// The value is the new user ID, `None` after logout.
    fn subscribe(&self) -> watch::Receiver<Option<String>>;
}
