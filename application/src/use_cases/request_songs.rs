//! Request Songs use case.
//!
//! The "juke" action: read what is playing, ask the engine for songs with
//! that context, then hand the suggestions to the playback backend.

use crate::engine::{EngineError, SongEngine};
use crate::ports::playback::PlaybackPort;
use juke_domain::util::truncate_str;
use juke_domain::{DomainError, PlayerContext, Song, SuggestedSong};
use std::sync::Arc;
use tracing::{info, warn};

/// What a single request produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSongsOutput {
    /// Playback state the prompt was built from.
    pub context: PlayerContext,
    /// `None` when the provider failed and the failure was swallowed.
    pub suggestions: Option<Vec<SuggestedSong>>,
    /// Whether the playback backend accepted the songs.
    pub played: bool,
}

pub struct RequestSongsUseCase {
    engine: Arc<SongEngine>,
    playback: Arc<dyn PlaybackPort>,
}

impl RequestSongsUseCase {
    pub fn new(engine: Arc<SongEngine>, playback: Arc<dyn PlaybackPort>) -> Self {
        Self { engine, playback }
    }

    pub fn engine(&self) -> &Arc<SongEngine> {
        &self.engine
    }

    /// Run one request end to end.
    ///
    /// Empty requests are rejected before anything is sent. Only fatal
    /// provider failures are returned as errors.
    pub async fn execute(&self, request: &str) -> Result<RequestSongsOutput, EngineError> {
        let request = request.trim();
        if request.is_empty() {
            return Err(DomainError::EmptyRequest.into());
        }

        let context = self.playback.current_state().await;
        info!("Song request: {}", truncate_str(request, 100));

        let mut delivered = None;
        self.engine
            .prompt_llm(request, context.prompt_context(), |songs| {
                delivered = Some(songs)
            })
            .await?;

        let mut played = false;
        if let Some(songs) = &delivered
            && !songs.is_empty()
        {
            let queue: Vec<Song> = songs.iter().map(SuggestedSong::song).collect();
            match self.playback.search_and_play(&queue).await {
                Ok(()) => played = true,
                Err(e) => warn!("Playback failed: {}", e),
            }
        }

        Ok(RequestSongsOutput {
            context,
            suggestions: delivered,
            played,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::MockBackend;
    use crate::ports::chat_backend::GatewayError;
    use crate::ports::playback::PlaybackError;
    use async_trait::async_trait;
    use juke_domain::ProviderKind;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakePlayback {
        now_playing: Option<Song>,
        played: Mutex<Vec<Song>>,
    }

    #[async_trait]
    impl PlaybackPort for FakePlayback {
        async fn current_state(&self) -> PlayerContext {
            match &self.now_playing {
                Some(song) => PlayerContext::playing(song.clone()),
                None => PlayerContext::idle(),
            }
        }

        async fn search_and_play(&self, songs: &[Song]) -> Result<(), PlaybackError> {
            self.played.lock().unwrap().extend_from_slice(songs);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_suggestions_are_played_with_context() {
        let backend = Arc::new(
            MockBackend::new(ProviderKind::Groq)
                .reply(r#"[{"Title":"Ashes to Ashes","Artist":"David Bowie","Reason":"r"}]"#),
        );
        let engine = Arc::new(SongEngine::new(backend.clone()));
        let playback = Arc::new(FakePlayback {
            now_playing: Some(Song::new("Heroes", "David Bowie")),
            ..Default::default()
        });
        let use_case = RequestSongsUseCase::new(engine, playback.clone());

        let output = use_case.execute("more Bowie").await.unwrap();

        assert!(output.played);
        assert_eq!(output.suggestions.as_ref().map(Vec::len), Some(1));
        assert_eq!(
            playback.played.lock().unwrap().clone(),
            vec![Song::new("Ashes to Ashes", "David Bowie")]
        );
        assert!(backend.calls()[0][1].content.contains("Heroes by David Bowie"));
    }

    #[tokio::test]
    async fn test_empty_request_is_rejected() {
        let backend = Arc::new(MockBackend::new(ProviderKind::Groq));
        let engine = Arc::new(SongEngine::new(backend.clone()));
        let use_case = RequestSongsUseCase::new(engine, Arc::new(FakePlayback::default()));

        let err = use_case.execute("  ").await.unwrap_err();
        assert_eq!(err, EngineError::InvalidRequest(DomainError::EmptyRequest));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_silent_failure_plays_nothing() {
        let backend = Arc::new(
            MockBackend::new(ProviderKind::OpenRouter)
                .fail(GatewayError::ConnectionError("refused".to_string())),
        );
        let engine = Arc::new(SongEngine::new(backend));
        let playback = Arc::new(FakePlayback::default());
        let use_case = RequestSongsUseCase::new(engine, playback.clone());

        let output = use_case.execute("rock").await.unwrap();
        assert_eq!(output.suggestions, None);
        assert!(!output.played);
        assert!(playback.played.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fatal_failure_propagates() {
        let backend = Arc::new(
            MockBackend::new(ProviderKind::Ollama)
                .fail(GatewayError::ConnectionError("refused".to_string())),
        );
        let engine = Arc::new(SongEngine::new(backend));
        let use_case = RequestSongsUseCase::new(engine, Arc::new(FakePlayback::default()));

        let err = use_case.execute("rock").await.unwrap_err();
        assert!(err.is_fatal());
    }
}
