//! History window for bounding what is sent to a provider.
//!
//! The stored [`Conversation`](super::entities::Conversation) grows for the
//! whole session. Providers have finite context, so each request carries a
//! windowed view instead: the system message plus the most recent
//! exchanges. The stored transcript is never trimmed.

use super::entities::{Message, Role};
use serde::{Deserialize, Serialize};

/// Number of past exchanges kept when nothing is configured.
pub const DEFAULT_MAX_EXCHANGES: usize = 20;

/// Sliding window over past user/assistant exchanges.
///
/// `max_exchanges` counts *previous* exchanges; the newest user turn is
/// always included on top of them. `0` disables windowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryWindow {
    max_exchanges: usize,
}

impl HistoryWindow {
    pub fn new(max_exchanges: usize) -> Self {
        Self { max_exchanges }
    }

    /// A window that sends the whole transcript.
    pub fn unbounded() -> Self {
        Self { max_exchanges: 0 }
    }

    pub fn max_exchanges(&self) -> usize {
        self.max_exchanges
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_exchanges == 0
    }

    /// Select the messages to send for the current request.
    ///
    /// `messages[0]` must be the system message. The cut is made at a user
    /// turn so an assistant answer is never sent without its question.
    pub fn apply(&self, messages: &[Message]) -> Vec<Message> {
        if self.is_unbounded() || messages.len() <= 1 {
            return messages.to_vec();
        }

        let keep_user_turns = self.max_exchanges + 1;
        let mut seen = 0;
        let mut start = 1;
        for (idx, message) in messages.iter().enumerate().skip(1).rev() {
            if message.role == Role::User {
                seen += 1;
                start = idx;
                if seen == keep_user_turns {
                    break;
                }
            }
        }

        let mut window = Vec::with_capacity(messages.len() - start + 1);
        window.push(messages[0].clone());
        window.extend_from_slice(&messages[start..]);
        window
    }
}

impl Default for HistoryWindow {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_EXCHANGES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::entities::Conversation;

    fn conversation_with_exchanges(n: usize) -> Conversation {
        let mut conversation = Conversation::new("sys");
        for i in 0..n {
            conversation.push_user(format!("request {i}"));
            conversation.push_assistant(format!("answer {i}"));
        }
        conversation
    }

    #[test]
    fn test_unbounded_sends_everything() {
        let mut conversation = conversation_with_exchanges(30);
        conversation.push_user("now");
        let window = HistoryWindow::unbounded().apply(conversation.snapshot());
        assert_eq!(window.len(), conversation.len());
    }

    #[test]
    fn test_short_history_is_untouched() {
        let mut conversation = conversation_with_exchanges(2);
        conversation.push_user("now");
        let window = HistoryWindow::new(5).apply(conversation.snapshot());
        assert_eq!(window, conversation.snapshot().to_vec());
    }

    #[test]
    fn test_window_keeps_system_and_recent_exchanges() {
        let mut conversation = conversation_with_exchanges(10);
        conversation.push_user("now");

        let window = HistoryWindow::new(2).apply(conversation.snapshot());

        // system + 2 full exchanges + current user turn
        assert_eq!(window.len(), 6);
        assert_eq!(window[0].role, Role::System);
        assert_eq!(window[1].content, "request 8");
        assert_eq!(window[4].content, "answer 9");
        assert_eq!(window[5].content, "now");
    }

    #[test]
    fn test_window_of_one_exchange() {
        let mut conversation = conversation_with_exchanges(3);
        conversation.push_user("now");
        let window = HistoryWindow::new(1).apply(conversation.snapshot());
        assert_eq!(window.len(), 4);
        assert_eq!(window[3].content, "now");
    }

    #[test]
    fn test_window_counts_dangling_user_turns() {
        let mut conversation = Conversation::new("sys");
        conversation.push_user("failed request");
        conversation.push_user("retry");

        let window = HistoryWindow::new(1).apply(conversation.snapshot());
        assert_eq!(window.len(), 3);
        assert_eq!(window[1].content, "failed request");
    }
}
