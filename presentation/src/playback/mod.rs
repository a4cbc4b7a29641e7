//! Playback stand-ins for the terminal front end

mod console;

pub use console::ConsolePlayback;
