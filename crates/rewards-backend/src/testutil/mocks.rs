//! Mock implementations for testing
//!
//! This module re-exports mock implementations from their respective modules
//! for convenient access in tests.

// Re-export HTTP mocks
pub use crate::http::mock::{MockHttpClient, RecordedRequest};

// Re-export notifier mocks
pub use crate::notify::mock::{NotificationType, RecordingNotifier};
