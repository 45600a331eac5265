use chat_datepicker::{ChatSurface, ConversationId, Grid, MessageId};

/// A message shown in the terminal "chat"
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Entry {
    pub(crate) conversation: ConversationId,
    pub(crate) id: MessageId,
    pub(crate) text: String,
    pub(crate) grid: Option<Grid>,
}

/// An in-terminal stand-in for a chat platform: every message the bot sends
/// is appended to the transcript and stays editable until deleted
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Transcript {
    entries: Vec<Entry>,
    next_id: i64,
}

impl Transcript {
    pub(crate) fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// The most recent message that still has buttons attached
    pub(crate) fn active(&self) -> Option<&Entry> {
        self.entries.iter().rev().find(|e| e.grid.is_some())
    }

    fn post(&mut self, conversation: &ConversationId, text: &str, grid: Option<&Grid>) -> MessageId {
        self.next_id += 1;
        let id = MessageId(self.next_id);
        self.entries.push(Entry {
            conversation: conversation.clone(),
            id,
            text: text.to_owned(),
            grid: grid.cloned(),
        });
        id
    }

    fn position(&self, conversation: &ConversationId, message: MessageId) -> anyhow::Result<usize> {
        self.entries
            .iter()
            .position(|e| &e.conversation == conversation && e.id == message)
            .ok_or_else(|| anyhow::anyhow!("message {message} not found in conversation {conversation}"))
    }
}

impl ChatSurface for Transcript {
    fn send_grid(
        &mut self,
        conversation: &ConversationId,
        text: &str,
        grid: &Grid,
    ) -> anyhow::Result<MessageId> {
        Ok(self.post(conversation, text, Some(grid)))
    }

    fn edit_grid(
        &mut self,
        conversation: &ConversationId,
        message: MessageId,
        text: Option<&str>,
        grid: &Grid,
    ) -> anyhow::Result<()> {
        let i = self.position(conversation, message)?;
        if let Some(entry) = self.entries.get_mut(i) {
            if let Some(text) = text {
                text.clone_into(&mut entry.text);
            }
            entry.grid = Some(grid.clone());
        }
        Ok(())
    }

    fn delete_message(
        &mut self,
        conversation: &ConversationId,
        message: MessageId,
    ) -> anyhow::Result<()> {
        let i = self.position(conversation, message)?;
        self.entries.remove(i);
        Ok(())
    }

    fn send_text(&mut self, conversation: &ConversationId, text: &str) -> anyhow::Result<MessageId> {
        Ok(self.post(conversation, text, None))
    }
}
