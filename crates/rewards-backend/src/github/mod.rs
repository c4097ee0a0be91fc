//! Release checks against the GitHub releases API

mod client;
mod version;

pub use client::{ReleaseClient, ReleaseInfo, RELEASE_HOST, RELEASE_PATH};
pub use version::{compare_versions, parse_version};
