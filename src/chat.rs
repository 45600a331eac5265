use crate::grid::Grid;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one exchange between a single end user and the bot
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct ConversationId(String);

impl ConversationId {
    pub fn new<S: Into<String>>(id: S) -> ConversationId {
        ConversationId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for ConversationId {
    fn from(chat_id: i64) -> ConversationId {
        ConversationId(chat_id.to_string())
    }
}

/// Platform identifier of a sent message
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct MessageId(pub i64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A button press delivered by the chat platform
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct CallbackEvent {
    pub conversation: ConversationId,
    /// The message carrying the pressed button
    pub message: MessageId,
    /// The button's callback data
    pub data: String,
}

/// The message operations a date picker needs from the hosting bot framework
pub trait ChatSurface {
    /// Send a new message with a button grid attached
    fn send_grid(
        &mut self,
        conversation: &ConversationId,
        text: &str,
        grid: &Grid,
    ) -> anyhow::Result<MessageId>;

    /// Replace the buttons of an existing message, and its text if `text` is
    /// `Some`
    fn edit_grid(
        &mut self,
        conversation: &ConversationId,
        message: MessageId,
        text: Option<&str>,
        grid: &Grid,
    ) -> anyhow::Result<()>;

    fn delete_message(
        &mut self,
        conversation: &ConversationId,
        message: MessageId,
    ) -> anyhow::Result<()>;

    /// Send a plain text message
    fn send_text(&mut self, conversation: &ConversationId, text: &str)
        -> anyhow::Result<MessageId>;

    /// Tell the platform a button press was received.  Platforms that show a
    /// spinner until then (e.g., Telegram) need this even for no-op presses.
    fn acknowledge(&mut self, _event: &CallbackEvent) -> anyhow::Result<()> {
        Ok(())
    }
}
