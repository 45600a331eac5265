use crate::chat::ConversationId;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Field under which the final selection is written
pub const SELECTED_DATE_FIELD: &str = "selected_date";

/// Per-conversation key-value state owned by the hosting bot framework
pub trait StateStore {
    fn get(&self, conversation: &ConversationId, field: &str) -> anyhow::Result<Option<Value>>;

    fn set(&mut self, conversation: &ConversationId, field: &str, value: Value)
        -> anyhow::Result<()>;

    fn remove(&mut self, conversation: &ConversationId, field: &str) -> anyhow::Result<()>;
}

/// An in-process [`StateStore`], suitable for tests and single-process bots
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MemoryStore {
    conversations: HashMap<ConversationId, BTreeMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    /// All fields stored for a conversation
    pub fn fields(&self, conversation: &ConversationId) -> Option<&BTreeMap<String, Value>> {
        self.conversations.get(conversation)
    }
}

impl StateStore for MemoryStore {
    fn get(&self, conversation: &ConversationId, field: &str) -> anyhow::Result<Option<Value>> {
        Ok(self
            .conversations
            .get(conversation)
            .and_then(|fields| fields.get(field))
            .cloned())
    }

    fn set(
        &mut self,
        conversation: &ConversationId,
        field: &str,
        value: Value,
    ) -> anyhow::Result<()> {
        self.conversations
            .entry(conversation.clone())
            .or_default()
            .insert(field.to_owned(), value);
        Ok(())
    }

    fn remove(&mut self, conversation: &ConversationId, field: &str) -> anyhow::Result<()> {
        if let Some(fields) = self.conversations.get_mut(conversation) {
            fields.remove(field);
            if fields.is_empty() {
                self.conversations.remove(conversation);
            }
        }
        Ok(())
    }
}
