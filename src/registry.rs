use crate::action::ActionCodec;
use crate::chat::{CallbackEvent, ChatSurface, ConversationId, MessageId};
use crate::picker::{DatePicker, Handled, PickerError};
use crate::store::StateStore;
use std::collections::btree_map::{BTreeMap, Entry};
use thiserror::Error;

/// The set of date pickers a bot has installed, keyed by callback-data
/// namespace.  Incoming button presses are routed to the picker whose
/// namespace matches the token.
#[derive(Debug, Default)]
pub struct Registry {
    pickers: BTreeMap<String, DatePicker>,
}

/// Result of [`Registry::dispatch()`]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Dispatch {
    /// No installed picker owns the token; the host should pass the event on
    Unrouted,
    Routed(Handled),
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("a date picker with prefix {0:?} is already registered")]
    DuplicatePrefix(String),
    #[error("no date picker is registered with prefix {0:?}")]
    UnknownPrefix(String),
    #[error(transparent)]
    Picker(#[from] PickerError),
}

impl Registry {
    pub fn new() -> Registry {
        Registry::default()
    }

    /// Install a picker.  Fails if another picker already uses the same
    /// prefix.
    pub fn register(&mut self, picker: DatePicker) -> Result<(), RegistryError> {
        match self.pickers.entry(picker.prefix().to_owned()) {
            Entry::Occupied(e) => Err(RegistryError::DuplicatePrefix(e.key().clone())),
            Entry::Vacant(e) => {
                tracing::debug!(prefix = %e.key(), "Registered date picker");
                e.insert(picker);
                Ok(())
            }
        }
    }

    pub fn get(&self, prefix: &str) -> Option<&DatePicker> {
        self.pickers.get(prefix)
    }

    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.pickers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.pickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pickers.is_empty()
    }

    /// Send the initial grid of the picker registered under `prefix`
    pub fn start(
        &self,
        prefix: &str,
        conversation: &ConversationId,
        surface: &mut dyn ChatSurface,
        store: &mut dyn StateStore,
    ) -> Result<MessageId, RegistryError> {
        let picker = self
            .pickers
            .get(prefix)
            .ok_or_else(|| RegistryError::UnknownPrefix(prefix.to_owned()))?;
        Ok(picker.start(conversation, surface, store)?)
    }

    /// Route a button press to the picker owning its namespace
    pub fn dispatch(
        &mut self,
        event: &CallbackEvent,
        surface: &mut dyn ChatSurface,
        store: &mut dyn StateStore,
    ) -> Result<Dispatch, PickerError> {
        let Some(picker) = ActionCodec::namespace_of(&event.data)
            .and_then(|prefix| self.pickers.get_mut(prefix))
        else {
            tracing::debug!(conversation = %event.conversation, data = %event.data, "No date picker owns callback data");
            return Ok(Dispatch::Unrouted);
        };
        match picker.handle(event, surface, store)? {
            Handled::NotMine => Ok(Dispatch::Unrouted),
            handled => Ok(Dispatch::Routed(handled)),
        }
    }
}
