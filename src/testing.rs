use crate::action::Action;
use crate::chat::{CallbackEvent, ChatSurface, ConversationId, MessageId};
use crate::grid::Grid;
use std::collections::BTreeMap;

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum SurfaceCall {
    Send {
        conversation: ConversationId,
        message: MessageId,
    },
    Edit {
        conversation: ConversationId,
        message: MessageId,
        text: Option<String>,
    },
    Delete {
        conversation: ConversationId,
        message: MessageId,
    },
    Text {
        conversation: ConversationId,
        text: String,
    },
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct Message {
    text: String,
    grid: Option<Grid>,
}

/// A [`ChatSurface`] that keeps every message in memory and records each
/// request made of it
#[derive(Clone, Debug, Default)]
pub(crate) struct RecordingSurface {
    pub(crate) calls: Vec<SurfaceCall>,
    pub(crate) acknowledged: usize,
    messages: BTreeMap<MessageId, Message>,
    next_id: i64,
}

impl RecordingSurface {
    pub(crate) fn grid(&self, message: MessageId) -> Option<&Grid> {
        self.messages.get(&message).and_then(|m| m.grid.as_ref())
    }

    pub(crate) fn text(&self, message: MessageId) -> Option<&str> {
        self.messages.get(&message).map(|m| m.text.as_str())
    }

    /// The token of the enabled cell performing `action`
    pub(crate) fn press_action(&self, message: MessageId, action: Action) -> Option<String> {
        self.grid(message)?
            .cells()
            .find(|c| c.action() == action)
            .and_then(|c| c.token())
            .map(ToOwned::to_owned)
    }

    /// The token of the enabled cell labelled `label`
    pub(crate) fn press_label(&self, message: MessageId, label: &str) -> Option<String> {
        self.grid(message)?
            .cells()
            .find(|c| c.label() == label && c.is_enabled())
            .and_then(|c| c.token())
            .map(ToOwned::to_owned)
    }

    fn post(&mut self, text: &str, grid: Option<&Grid>) -> MessageId {
        self.next_id += 1;
        let id = MessageId(self.next_id);
        self.messages.insert(
            id,
            Message {
                text: text.to_owned(),
                grid: grid.cloned(),
            },
        );
        id
    }
}

impl ChatSurface for RecordingSurface {
    fn send_grid(
        &mut self,
        conversation: &ConversationId,
        text: &str,
        grid: &Grid,
    ) -> anyhow::Result<MessageId> {
        let message = self.post(text, Some(grid));
        self.calls.push(SurfaceCall::Send {
            conversation: conversation.clone(),
            message,
        });
        Ok(message)
    }

    fn edit_grid(
        &mut self,
        conversation: &ConversationId,
        message: MessageId,
        text: Option<&str>,
        grid: &Grid,
    ) -> anyhow::Result<()> {
        let m = self.messages.entry(message).or_insert_with(|| Message {
            text: String::new(),
            grid: None,
        });
        if let Some(text) = text {
            text.clone_into(&mut m.text);
        }
        m.grid = Some(grid.clone());
        self.calls.push(SurfaceCall::Edit {
            conversation: conversation.clone(),
            message,
            text: text.map(ToOwned::to_owned),
        });
        Ok(())
    }

    fn delete_message(
        &mut self,
        conversation: &ConversationId,
        message: MessageId,
    ) -> anyhow::Result<()> {
        self.messages.remove(&message);
        self.calls.push(SurfaceCall::Delete {
            conversation: conversation.clone(),
            message,
        });
        Ok(())
    }

    fn send_text(&mut self, conversation: &ConversationId, text: &str) -> anyhow::Result<MessageId> {
        let message = self.post(text, None);
        self.calls.push(SurfaceCall::Text {
            conversation: conversation.clone(),
            text: text.to_owned(),
        });
        Ok(message)
    }

    fn acknowledge(&mut self, _event: &CallbackEvent) -> anyhow::Result<()> {
        self.acknowledged += 1;
        Ok(())
    }
}

pub(crate) fn press<S: Into<String>>(
    conversation: &ConversationId,
    message: MessageId,
    data: S,
) -> CallbackEvent {
    CallbackEvent {
        conversation: conversation.clone(),
        message,
        data: data.into(),
    }
}
