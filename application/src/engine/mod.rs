//! Song engine and its background worker

pub mod song_engine;
pub mod worker;

#[cfg(test)]
pub(crate) mod testing;

pub use song_engine::{EngineError, SongEngine};
pub use worker::{SuggestionOutcome, SuggestionWorker};
