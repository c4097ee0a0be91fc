//! Fire-and-forget operations
//!
//! Each call submits an independent task to the shared [`Spawner`] and
//! returns immediately. Results arrive later through a [`Notifier`] or a
//! [`Callback`].
//!
//! [`Spawner`]: crate::runtime::Spawner
//! [`Notifier`]: crate::notify::Notifier
//! [`Callback`]: crate::callback::Callback

mod rewards;
mod updates;

pub use rewards::RewardsService;
pub use updates::UpdateService;
