//! Async client layer for Rewards Theater
//!
//! Talks to the Twitch Helix channel-points API and the GitHub releases API
//! from a shared worker pool, and delivers results to host-owned receivers
//! that may be dropped before the request finishes.

pub mod app;
pub mod auth;
pub mod callback;
pub mod config;
pub mod error;
pub mod github;
pub mod http;
pub mod logging;
pub mod notify;
pub mod runtime;
pub mod services;
pub mod transport;
pub mod twitch;

#[cfg(test)]
mod testutil;

pub use app::App;
pub use callback::{Callback, CallbackReceiver};
pub use error::{ApiError, Outcome};
