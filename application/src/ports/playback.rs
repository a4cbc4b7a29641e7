//! Playback port
//!
//! The music-playback backend is an external collaborator. The suggestion
//! flow only needs two things from it: the current playback state, to
//! enrich prompts, and a way to play what the model suggested.

use async_trait::async_trait;
use juke_domain::{PlayerContext, Song};
use thiserror::Error;

/// Errors reported by a playback backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("No track found for {0}")]
    NotFound(String),
}

/// Music source driven by the suggestion flow
#[async_trait]
pub trait PlaybackPort: Send + Sync {
    /// Snapshot of what is playing right now.
    async fn current_state(&self) -> PlayerContext;

    /// Search for each song and play them in order.
    async fn search_and_play(&self, songs: &[Song]) -> Result<(), PlaybackError>;
}
