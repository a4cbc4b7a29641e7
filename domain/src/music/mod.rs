//! Music domain.
//!
//! - [`song::Song`]: a playable `(title, artist)` pair
//! - [`song::SuggestedSong`]: a model suggestion with an optional reason
//! - [`song::PlayerContext`]: playback snapshot used to enrich prompts

pub mod song;
