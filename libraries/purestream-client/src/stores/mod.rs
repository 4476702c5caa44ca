//! Cached server state published over `watch` channels
//!
//! Stores never patch their cache optimistically: each mutation issues
//! its request and then reloads the authoritative list from the server.
//! Failures post a notification and are returned to the caller.

mod favorites;
mod playlists;

pub use favorites::FavoritesStore;
pub use playlists::PlaylistStore;

use crate::error::{ClientError, Result};
use purestream_playback::Notifications;

/// Surface a failed request to the user before handing it back
pub(crate) fn report<T>(notifications: &Notifications, result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        tracing::warn!(error = %e, "Request failed");
        notify(notifications, e);
    }
    result
}

fn notify(notifications: &Notifications, error: &ClientError) {
    notifications.report(&error.to_playback_error());
}
