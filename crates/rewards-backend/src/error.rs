//! Error kinds shared by every client operation
//!
//! Async operations never let a failure escape the execution context: each one
//! finishes with an [`Outcome`], which is what notifications and callbacks carry.

/// Result of a client operation, delivered across the async boundary
pub type Outcome<T> = Result<T, ApiError>;

/// Classified failure of a client operation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// No authenticated Twitch session
    #[error("Not logged in to Twitch")]
    Unauthenticated,

    /// The channel-points listing was rejected with 403
    #[error("Channel points are only available to Twitch affiliates and partners")]
    NotAffiliateOrPartner,

    /// The reward was created outside of this application
    #[error("Reward was not created by this application and cannot be managed")]
    NotManageable,

    /// Twitch rejected the request parameters (400 with a structured body)
    #[error("Invalid reward parameters: {body}")]
    InvalidParameters { body: String },

    #[error("Unexpected HTTP status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error(
        "Failed to parse response{}: {message}",
        .reward_id.as_ref().map(|id| format!(" for reward {id}")).unwrap_or_default()
    )]
    Parse {
        reward_id: Option<String>,
        message: String,
    },

    /// Network, TLS or connection-level failure, or a malformed success body
    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Malformed version string: {0:?}")]
    MalformedVersion(String),
}

impl ApiError {
    /// Parse failure that cannot be attributed to a single reward
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            reward_id: None,
            message: message.into(),
        }
    }

    /// Parse failure attributed to the reward with the given id
    pub fn parse_reward(reward_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            reward_id: Some(reward_id.into()),
            message: message.into(),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Transport(format!("{err:#}"))
    }
}
