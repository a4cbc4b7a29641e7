//! Background suggestion worker
//!
//! Runs song requests off the caller's task so an interactive front end
//! stays responsive. Jobs are processed one at a time in submission order;
//! results come back on an outcome channel that the owner of UI state
//! drains. The oldest unfinished job can be cancelled; later ones are
//! unaffected.

use super::song_engine::{EngineError, SongEngine};
use juke_domain::{Song, SuggestedSong};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Pending jobs beyond this make `submit` wait.
const QUEUE_CAPACITY: usize = 8;

struct SuggestionJob {
    id: u64,
    request: String,
    current_song: Option<Song>,
    token: CancellationToken,
}

/// Tokens of submitted jobs that have not produced an outcome, oldest first.
type PendingTokens = Arc<Mutex<VecDeque<(u64, CancellationToken)>>>;

fn lock(pending: &PendingTokens) -> MutexGuard<'_, VecDeque<(u64, CancellationToken)>> {
    pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Result of one submitted request.
///
/// A cancelled request fails with [`EngineError::Cancelled`].
#[derive(Debug, Clone, PartialEq)]
pub enum SuggestionOutcome {
    Suggested {
        id: u64,
        request: String,
        songs: Vec<SuggestedSong>,
    },
    Failed {
        id: u64,
        request: String,
        error: EngineError,
    },
}

impl SuggestionOutcome {
    pub fn id(&self) -> u64 {
        match self {
            SuggestionOutcome::Suggested { id, .. } | SuggestionOutcome::Failed { id, .. } => *id,
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, SuggestionOutcome::Failed { error, .. } if error.is_fatal())
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, SuggestionOutcome::Failed { error, .. } if error.is_cancelled())
    }
}

/// Handle to the background task driving a [`SongEngine`].
pub struct SuggestionWorker {
    // Held across the send so queue order matches `pending` order.
    jobs: tokio::sync::Mutex<mpsc::Sender<SuggestionJob>>,
    pending: PendingTokens,
    next_id: AtomicU64,
    task: JoinHandle<()>,
}

impl SuggestionWorker {
    /// Spawn the worker on the current runtime.
    pub fn spawn(engine: Arc<SongEngine>) -> (Self, mpsc::Receiver<SuggestionOutcome>) {
        let (jobs_tx, jobs_rx) = mpsc::channel(QUEUE_CAPACITY);
        let (outcome_tx, outcome_rx) = mpsc::channel(QUEUE_CAPACITY);
        let pending = PendingTokens::default();

        let task = tokio::spawn(run(engine, jobs_rx, outcome_tx, pending.clone()));

        let worker = Self {
            jobs: tokio::sync::Mutex::new(jobs_tx),
            pending,
            next_id: AtomicU64::new(1),
            task,
        };
        (worker, outcome_rx)
    }

    /// Queue a request. Returns the id its outcome will carry.
    ///
    /// The job is cancellable by [`cancel_current`](Self::cancel_current)
    /// as soon as this returns, even before the worker picks it up.
    pub async fn submit(
        &self,
        request: impl Into<String>,
        current_song: Option<Song>,
    ) -> Result<u64, EngineError> {
        let jobs = self.jobs.lock().await;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();
        lock(&self.pending).push_back((id, token.clone()));

        let job = SuggestionJob {
            id,
            request: request.into(),
            current_song,
            token,
        };
        if jobs.send(job).await.is_err() {
            lock(&self.pending).retain(|(pending_id, _)| *pending_id != id);
            return Err(EngineError::WorkerStopped);
        }
        debug!("Queued suggestion request #{}", id);
        Ok(id)
    }

    /// Cancel the request being served, or the next one if the worker has
    /// not picked it up yet. Does nothing when no request is outstanding.
    pub fn cancel_current(&self) {
        if let Some((id, token)) = lock(&self.pending).front() {
            debug!("Cancelling suggestion request #{}", id);
            token.cancel();
        }
    }

    /// Stop accepting jobs and wait for the queue to drain.
    pub async fn shutdown(self) {
        drop(self.jobs);
        let _ = self.task.await;
    }
}

async fn run(
    engine: Arc<SongEngine>,
    mut jobs: mpsc::Receiver<SuggestionJob>,
    outcomes: mpsc::Sender<SuggestionOutcome>,
    pending: PendingTokens,
) {
    while let Some(job) = jobs.recv().await {
        let result = tokio::select! {
            biased;
            _ = job.token.cancelled() => {
                info!("Suggestion request #{} cancelled", job.id);
                Err(EngineError::Cancelled)
            }
            result = engine.suggest(&job.request, job.current_song.as_ref()) => result,
        };
        lock(&pending).retain(|(id, _)| *id != job.id);

        let outcome = match result {
            Ok(songs) => SuggestionOutcome::Suggested {
                id: job.id,
                request: job.request,
                songs,
            },
            Err(error) => SuggestionOutcome::Failed {
                id: job.id,
                request: job.request,
                error,
            },
        };

        if outcomes.send(outcome).await.is_err() {
            debug!("Outcome receiver dropped, stopping suggestion worker");
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::MockBackend;
    use crate::ports::chat_backend::GatewayError;
    use juke_domain::ProviderKind;
    use std::time::Duration;

    #[tokio::test]
    async fn test_outcomes_arrive_in_submission_order() {
        let backend = Arc::new(
            MockBackend::new(ProviderKind::Groq)
                .reply(r#"[{"Title":"A","Artist":"X"}]"#)
                .reply(r#"[{"Title":"B","Artist":"Y"}]"#),
        );
        let engine = Arc::new(SongEngine::new(backend));
        let (worker, mut outcomes) = SuggestionWorker::spawn(engine.clone());

        let first = worker.submit("one", None).await.unwrap();
        let second = worker.submit("two", None).await.unwrap();
        assert!(second > first);

        match outcomes.recv().await.unwrap() {
            SuggestionOutcome::Suggested { id, songs, .. } => {
                assert_eq!(id, first);
                assert_eq!(songs[0].title, "A");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        match outcomes.recv().await.unwrap() {
            SuggestionOutcome::Suggested { id, songs, .. } => {
                assert_eq!(id, second);
                assert_eq!(songs[0].title, "B");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        worker.shutdown().await;
        assert_eq!(engine.conversation_len().await, 5);
    }

    #[tokio::test]
    async fn test_failures_are_reported() {
        let backend = Arc::new(
            MockBackend::new(ProviderKind::Ollama)
                .fail(GatewayError::ConnectionError("refused".to_string())),
        );
        let engine = Arc::new(SongEngine::new(backend));
        let (worker, mut outcomes) = SuggestionWorker::spawn(engine);

        worker.submit("anything", None).await.unwrap();
        let outcome = outcomes.recv().await.unwrap();
        assert!(outcome.is_fatal());
        worker.shutdown().await;
    }

    #[tokio::test]
    async fn test_cancel_current_request() {
        let backend = Arc::new(
            MockBackend::new(ProviderKind::Groq)
                .reply("[]")
                .reply(r#"[{"Title":"Next","Artist":"Z"}]"#)
                .with_delay(Duration::from_millis(200)),
        );
        let engine = Arc::new(SongEngine::new(backend));
        let (worker, mut outcomes) = SuggestionWorker::spawn(engine.clone());

        let slow = worker.submit("slow", None).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        worker.cancel_current();

        let outcome = outcomes.recv().await.unwrap();
        assert_eq!(
            outcome,
            SuggestionOutcome::Failed {
                id: slow,
                request: "slow".to_string(),
                error: EngineError::Cancelled,
            }
        );
        assert!(outcome.is_cancelled());

        // Later requests still run.
        let next = worker.submit("next", None).await.unwrap();
        let outcome = outcomes.recv().await.unwrap();
        assert_eq!(outcome.id(), next);
        assert!(matches!(outcome, SuggestionOutcome::Suggested { .. }));

        worker.shutdown().await;
        // The cancelled request left its user turn behind.
        assert_eq!(engine.conversation_len().await, 4);
    }

    #[tokio::test]
    async fn test_cancel_right_after_submit_is_not_lost() {
        let backend = Arc::new(
            MockBackend::new(ProviderKind::Groq)
                .reply(r#"[{"Title":"A","Artist":"X"}]"#)
                .with_delay(Duration::from_millis(200)),
        );
        let engine = Arc::new(SongEngine::new(backend));
        let (worker, mut outcomes) = SuggestionWorker::spawn(engine);

        // The worker has not started the job yet; cancelling must still hit it.
        let id = worker.submit("quick cancel", None).await.unwrap();
        worker.cancel_current();

        let outcome = outcomes.recv().await.unwrap();
        assert_eq!(outcome.id(), id);
        assert!(outcome.is_cancelled());
        worker.shutdown().await;
    }

    #[tokio::test]
    async fn test_cancel_when_idle_does_not_touch_later_requests() {
        let backend = Arc::new(
            MockBackend::new(ProviderKind::Groq).reply(r#"[{"Title":"A","Artist":"X"}]"#),
        );
        let engine = Arc::new(SongEngine::new(backend));
        let (worker, mut outcomes) = SuggestionWorker::spawn(engine);

        worker.cancel_current();
        let id = worker.submit("after idle cancel", None).await.unwrap();

        let outcome = outcomes.recv().await.unwrap();
        assert_eq!(outcome.id(), id);
        assert!(matches!(outcome, SuggestionOutcome::Suggested { .. }));
        worker.shutdown().await;
    }
}
