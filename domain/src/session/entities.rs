//! Session domain entities

use serde::{Deserialize, Serialize};

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Wire name shared by the chat APIs juke talks to.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A message in a conversation (Entity)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Transcript shared with a provider across requests (Entity).
///
/// Element 0 is the system message given at construction. After that the
/// transcript only grows: [`append`](Self::append) is the single mutator and
/// nothing is ever edited or removed. There is no interior locking; the
/// owning engine serialises access.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(system_prompt)],
        }
    }

    /// Append a message to the end of the transcript.
    pub fn append(&mut self, role: Role, content: impl Into<String>) {
        self.messages.push(Message {
            role,
            content: content.into(),
        });
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.append(Role::User, content);
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.append(Role::Assistant, content);
    }

    /// Read-only view of every message, oldest first.
    pub fn snapshot(&self) -> &[Message] {
        &self.messages
    }

    pub fn system_message(&self) -> &Message {
        &self.messages[0]
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Always false: the system message is never removed.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// True when the newest message is a user turn with no answer yet.
    ///
    /// Happens after a failed provider call, where the user turn is kept
    /// and no assistant turn is recorded.
    pub fn has_dangling_user_turn(&self) -> bool {
        matches!(self.last(), Some(m) if m.role == Role::User)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_conversation_has_only_system_message() {
        let conversation = Conversation::new("You are a music expert.");
        assert_eq!(conversation.len(), 1);
        assert_eq!(conversation.system_message().role, Role::System);
        assert_eq!(
            conversation.system_message().content,
            "You are a music expert."
        );
        assert!(!conversation.is_empty());
    }

    #[test]
    fn test_append_keeps_order_and_system_head() {
        let mut conversation = Conversation::new("sys");
        conversation.push_user("first request");
        conversation.push_assistant("[]");
        conversation.push_user("second request");

        let roles: Vec<Role> = conversation.snapshot().iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![Role::System, Role::User, Role::Assistant, Role::User]
        );
        assert_eq!(conversation.system_message().content, "sys");
        assert!(conversation.has_dangling_user_turn());
    }

    #[test]
    fn test_role_wire_names() {
        assert_eq!(Role::System.as_str(), "system");
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), "\"assistant\"");
    }
}
