mod client;
mod types;

pub use client::{RewardsClient, HELIX_HOST};
pub use types::*;
