//! Change-feed consumption
//!
//! Each connected client runs one [`FeedConsumer`] over the store's realtime
//! feed. The consumer never applies event payloads directly: it re-fetches
//! the order, guards against stale reads, projects the row into a shared
//! [`BoardView`] and nudges the client over an mpsc channel. A
//! [`PendingOverlay`] lets the acting client render its own optimistic
//! transition until the feed confirms it.

mod consumer;
mod pending;
mod view;

pub use consumer::{FeedConsumer, RoleFilter};
pub use pending::PendingOverlay;
pub use view::BoardView;
