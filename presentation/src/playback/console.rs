//! Playback backend that only tracks state.
//!
//! Stands in for a streaming-service player: each song is "searched" by its
//! query string, the first becomes the current one, and the rest are queued.

use async_trait::async_trait;
use juke_application::ports::playback::{PlaybackError, PlaybackPort};
use juke_domain::{PlayerContext, Song};
use std::sync::Mutex;
use tracing::{debug, info};

#[derive(Default)]
pub struct ConsolePlayback {
    state: Mutex<PlayerContext>,
    queue: Mutex<Vec<Song>>,
    searches: Mutex<Vec<String>>,
}

impl ConsolePlayback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `song` already playing.
    pub fn with_now_playing(song: Song) -> Self {
        Self {
            state: Mutex::new(PlayerContext::playing(song)),
            ..Self::default()
        }
    }

    pub fn set_now_playing(&self, song: Song) {
        if let Ok(mut state) = self.state.lock() {
            *state = PlayerContext::playing(song);
        }
    }

    /// Songs waiting behind the current one.
    pub fn queued(&self) -> Vec<Song> {
        self.queue.lock().map(|q| q.clone()).unwrap_or_default()
    }

    /// Every search query issued so far, oldest first.
    pub fn searches(&self) -> Vec<String> {
        self.searches.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl PlaybackPort for ConsolePlayback {
    async fn current_state(&self) -> PlayerContext {
        self.state
            .lock()
            .map(|state| state.clone())
            .unwrap_or_default()
    }

    async fn search_and_play(&self, songs: &[Song]) -> Result<(), PlaybackError> {
        let Some((first, rest)) = songs.split_first() else {
            return Err(PlaybackError::NotFound("empty song list".to_string()));
        };

        if let Ok(mut searches) = self.searches.lock() {
            for song in songs {
                let query = song.search_query();
                debug!("Searching for \"{}\"", query);
                searches.push(query);
            }
        }

        self.set_now_playing(first.clone());
        if let Ok(mut queue) = self.queue.lock() {
            *queue = rest.to_vec();
        }
        info!("Playing {}, {} more queued", first, rest.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_song_becomes_current() {
        let playback = ConsolePlayback::new();
        assert_eq!(playback.current_state().await, PlayerContext::idle());

        let songs = vec![Song::new("A", "X"), Song::new("B", "Y")];
        playback.search_and_play(&songs).await.unwrap();

        let state = playback.current_state().await;
        assert_eq!(state.current_song, Some(Song::new("A", "X")));
        assert!(state.is_playing);
        assert_eq!(playback.queued(), vec![Song::new("B", "Y")]);
        assert_eq!(playback.searches(), vec!["A X".to_string(), "B Y".to_string()]);
    }

    #[tokio::test]
    async fn test_empty_list_is_rejected() {
        let playback = ConsolePlayback::with_now_playing(Song::new("Heroes", "David Bowie"));
        assert!(playback.search_and_play(&[]).await.is_err());
        assert!(playback.searches().is_empty());
        assert_eq!(
            playback.current_state().await.prompt_context(),
            Some(&Song::new("Heroes", "David Bowie"))
        );
    }
}
