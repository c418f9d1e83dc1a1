//! Conversation state for a single task execution
//!
//! Owned exclusively by the orchestrator and destroyed when the task
//! returns. Messages are append-only; nothing is reordered or mutated in
//! place.

use ember_provider::Message;

/// Message history plus turn bookkeeping for one task
#[derive(Debug, Clone, Default)]
pub struct ConversationState {
    messages: Vec<Message>,
    turn_index: usize,
    terminal: bool,
}

impl ConversationState {
    /// Create an empty state at turn 1
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            turn_index: 1,
            terminal: false,
        }
    }

    /// Append a system message
    pub fn add_system(&mut self, content: impl Into<String>) {
        self.messages.push(Message::system(content));
    }

    /// Append a user message
    pub fn add_user(&mut self, content: impl Into<String>) {
        self.messages.push(Message::user(content));
    }

    /// Append an assistant message
    pub fn add_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(Message::assistant(content));
    }

    /// All messages, oldest first
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Current turn (1-based)
    pub fn turn_index(&self) -> usize {
        self.turn_index
    }

    /// Advance to the next turn
    pub fn begin_next_turn(&mut self) {
        self.turn_index += 1;
    }

    /// Mark the conversation finished
    pub fn set_terminal(&mut self) {
        self.terminal = true;
    }

    /// Whether the conversation has finished
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_provider::MessageRole;

    #[test]
    fn test_starts_at_turn_one() {
        let state = ConversationState::new();
        assert_eq!(state.turn_index(), 1);
        assert!(!state.is_terminal());
        assert!(state.is_empty());
    }

    #[test]
    fn test_messages_are_append_only_and_ordered() {
        let mut state = ConversationState::new();
        state.add_system("sys");
        state.add_user("task");
        let before = state.len();
        state.add_assistant("reply");

        assert_eq!(state.len(), before + 1);
        let roles: Vec<MessageRole> = state.messages().iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![MessageRole::System, MessageRole::User, MessageRole::Assistant]
        );
    }
}
