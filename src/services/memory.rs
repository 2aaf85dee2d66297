//! Conversational memory: an ordered message log plus keyed context blocks.
//!
//! Context blocks hold the loaded day's data (raw reservation table,
//! formatted free slots) and are rendered as system messages ahead of the
//! history. They are replaced wholesale when a new day is loaded.

use std::collections::BTreeMap;

use crate::services::ai::Message;

#[derive(Debug, Default)]
pub struct ConversationMemory {
    history: Vec<Message>,
    context: BTreeMap<String, String>,
}

impl ConversationMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, role: &str, content: &str) {
        self.history.push(Message::new(role, content));
    }

    pub fn update_context(&mut self, key: &str, content: &str) {
        self.context.insert(key.to_string(), content.to_string());
    }

    pub fn clear_context(&mut self) {
        self.context.clear();
    }

    /// The last `n` user/assistant rounds (up to `2n` messages).
    pub fn recent(&self, n: usize) -> &[Message] {
        let take = n * 2;
        let start = self.history.len().saturating_sub(take);
        &self.history[start..]
    }

    /// Context blocks rendered as `[key]` system messages.
    pub fn context_messages(&self) -> Vec<Message> {
        self.context
            .iter()
            .map(|(key, content)| Message::new("system", &format!("[{key}]\n{content}")))
            .collect()
    }

    /// Context blocks followed by the full history.
    pub fn messages(&self) -> Vec<Message> {
        let mut all = self.context_messages();
        all.extend(self.history.iter().cloned());
        all
    }

    pub fn clear(&mut self) {
        self.history.clear();
        self.context.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_returns_last_rounds() {
        let mut memory = ConversationMemory::new();
        for i in 0..5 {
            memory.append("user", &format!("q{i}"));
            memory.append("assistant", &format!("a{i}"));
        }
        let recent = memory.recent(3);
        assert_eq!(recent.len(), 6);
        assert_eq!(recent[0].content, "q2");
        assert_eq!(recent[5].content, "a4");
    }

    #[test]
    fn test_recent_with_short_history() {
        let mut memory = ConversationMemory::new();
        memory.append("user", "hello");
        assert_eq!(memory.recent(3).len(), 1);
    }

    #[test]
    fn test_context_blocks_precede_history() {
        let mut memory = ConversationMemory::new();
        memory.append("user", "hello");
        memory.update_context("free slots", "- 101: 08:00-08:30");

        let messages = memory.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert!(messages[0].content.starts_with("[free slots]\n"));
        assert_eq!(messages[1].content, "hello");
    }

    #[test]
    fn test_update_context_replaces() {
        let mut memory = ConversationMemory::new();
        memory.update_context("free slots", "old");
        memory.update_context("free slots", "new");
        let messages = memory.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].content.contains("new"));
    }

    #[test]
    fn test_clear_context_keeps_history() {
        let mut memory = ConversationMemory::new();
        memory.append("user", "hello");
        memory.update_context("reservations", "table");
        memory.clear_context();
        assert_eq!(memory.messages().len(), 1);
    }
}
