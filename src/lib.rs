//! Inline and step-by-step date picker keyboards for chat bots.
//!
//! A [`DatePicker`] renders a calendar as a [`Grid`] of buttons and reacts to
//! presses of those buttons, moving between months (inline mode) or from a
//! year list to a month list to a day grid (step mode).  Per-conversation
//! state is kept in a caller-supplied [`StateStore`] and messages are sent
//! through a caller-supplied [`ChatSurface`], so the crate is independent of
//! any particular bot framework.
//!
//! Several pickers can share one bot by giving each its own prefix and
//! installing them in a [`Registry`].
mod action;
mod calendar;
mod chat;
mod config;
mod cursor;
mod grid;
mod picker;
mod registry;
mod store;
#[cfg(test)]
mod testing;
pub use crate::action::{Action, ActionCodec, TokenError, MAX_TOKEN_LEN};
pub use crate::calendar::{Week, YearMonth};
pub use crate::chat::{CallbackEvent, ChatSurface, ConversationId, MessageId};
pub use crate::config::{
    ConfigError, DisplayMode, Locale, NavLabels, PickerConfig, Prompts, ReturnAs,
    DEFAULT_DATE_FORMAT, DEFAULT_PREFIX,
};
pub use crate::cursor::{transition, Cursor, Outcome, Rejection};
pub use crate::grid::{Cell, Grid};
pub use crate::picker::{
    DatePicker, Handled, OnDateSelected, PickerError, Selection, SelectionContext,
};
pub use crate::registry::{Dispatch, Registry, RegistryError};
pub use crate::store::{MemoryStore, StateStore, SELECTED_DATE_FIELD};
