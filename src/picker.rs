use crate::action::{Action, ActionCodec, TokenError};
use crate::chat::{CallbackEvent, ChatSurface, ConversationId, MessageId};
use crate::config::{ConfigError, DisplayMode, PickerConfig};
use crate::cursor::{transition, Cursor, Outcome};
use crate::grid::{Grid, Renderer};
use crate::store::{StateStore, SELECTED_DATE_FIELD};
use serde_json::Value;
use std::fmt;
use thiserror::Error;
use time::format_description::OwnedFormatItem;
use time::{Date, OffsetDateTime};

/// The value handed to the selection callback and written to the state
/// store
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Selection {
    Date(Date),
    /// The date rendered with the configured format
    Text(String),
}

impl Selection {
    /// The date, if the selection was not formatted as text
    pub fn date(&self) -> Option<Date> {
        match self {
            Selection::Date(d) => Some(*d),
            Selection::Text(_) => None,
        }
    }

    pub fn to_value(&self) -> Value {
        Value::String(self.to_string())
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::Date(d) => write!(f, "{d}"),
            Selection::Text(s) => f.write_str(s),
        }
    }
}

/// What the selection callback can see and do
pub struct SelectionContext<'a> {
    /// The button press that completed the selection
    pub event: &'a CallbackEvent,
    pub surface: &'a mut dyn ChatSurface,
}

impl fmt::Debug for SelectionContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionContext")
            .field("event", &self.event)
            .finish_non_exhaustive()
    }
}

pub type OnDateSelected =
    Box<dyn FnMut(Selection, &mut SelectionContext<'_>) -> anyhow::Result<()>>;

/// How a callback event was dealt with
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Handled {
    /// The token belongs to another picker
    NotMine,
    /// A no-op, malformed, stale or out-of-range press; nothing changed
    Ignored,
    /// The message now shows the given cursor
    Navigated(Cursor),
    /// A date was chosen and the callback has run
    Selected(Date),
}

#[derive(Debug, Error)]
pub enum PickerError {
    #[error("chat platform request failed")]
    Surface(#[source] anyhow::Error),
    #[error("conversation state store request failed")]
    Store(#[source] anyhow::Error),
    #[error("failed to serialize picker state")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to format selected date")]
    Format(#[from] time::error::Format),
    #[error("date selection callback failed")]
    Callback(#[source] anyhow::Error),
}

/// A date picker bound to one callback-data namespace.
///
/// The picker itself is stateless across conversations: each conversation's
/// [`Cursor`] lives in the [`StateStore`] passed to [`DatePicker::start()`]
/// and [`DatePicker::handle()`].
pub struct DatePicker {
    config: PickerConfig,
    codec: ActionCodec,
    format: Option<OwnedFormatItem>,
    on_date_selected: Option<OnDateSelected>,
    today: Option<Date>,
}

impl DatePicker {
    /// Validate `config` and build a picker.  Fails fast on any configuration
    /// error rather than on first use.
    pub fn new(config: PickerConfig) -> Result<DatePicker, ConfigError> {
        let format = config.validate()?;
        let codec = ActionCodec::new(config.namespace());
        Ok(DatePicker {
            config,
            codec,
            format,
            on_date_selected: None,
            today: None,
        })
    }

    /// Set the function to call once a date is chosen.  Errors it returns are
    /// passed back to the caller of [`DatePicker::handle()`].
    pub fn on_date_selected<F>(mut self, callback: F) -> Self
    where
        F: FnMut(Selection, &mut SelectionContext<'_>) -> anyhow::Result<()> + 'static,
    {
        self.on_date_selected = Some(Box::new(callback));
        self
    }

    /// Use a fixed date as "today" instead of the local date
    pub fn with_today(mut self, today: Date) -> Self {
        self.today = Some(today);
        self
    }

    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    pub fn prefix(&self) -> &str {
        self.codec.prefix()
    }

    pub fn codec(&self) -> &ActionCodec {
        &self.codec
    }

    pub fn today(&self) -> Date {
        self.today.unwrap_or_else(local_today)
    }

    pub fn initial_cursor(&self) -> Cursor {
        Cursor::initial(&self.config)
    }

    pub fn render(&self, cursor: Cursor) -> Grid {
        Renderer::new(&self.config, &self.codec, self.today()).render(cursor)
    }

    /// The message text shown with the grid for `cursor`
    pub fn prompt(&self, cursor: Cursor) -> String {
        let prompts = self.config.prompt_texts();
        match (self.config.display_mode(), cursor) {
            (DisplayMode::Inline, _) => prompts.select_date.clone(),
            (DisplayMode::Step, Cursor::YearSelect) => prompts.select_year.clone(),
            (DisplayMode::Step, Cursor::MonthSelect { year }) => prompts.month_prompt(year),
            (DisplayMode::Step, Cursor::DaySelect { month }) => {
                prompts.day_prompt(month, self.config.language())
            }
        }
    }

    /// Begin an interaction by sending the initial grid to `conversation`
    pub fn start(
        &self,
        conversation: &ConversationId,
        surface: &mut dyn ChatSurface,
        store: &mut dyn StateStore,
    ) -> Result<MessageId, PickerError> {
        let cursor = self.initial_cursor();
        let message = surface
            .send_grid(conversation, &self.prompt(cursor), &self.render(cursor))
            .map_err(PickerError::Surface)?;
        self.save_cursor(conversation, cursor, store)?;
        tracing::info!(prefix = %self.prefix(), %conversation, %message, ?cursor, "Started date picker");
        Ok(message)
    }

    /// Process a button press.  Tokens from other namespaces are left alone
    /// and reported as [`Handled::NotMine`].
    pub fn handle(
        &mut self,
        event: &CallbackEvent,
        surface: &mut dyn ChatSurface,
        store: &mut dyn StateStore,
    ) -> Result<Handled, PickerError> {
        let decoded = self.codec.decode(&event.data);
        if decoded == Err(TokenError::ForeignNamespace) {
            return Ok(Handled::NotMine);
        }
        surface.acknowledge(event).map_err(PickerError::Surface)?;
        let action = match decoded {
            Ok(Action::Noop) => {
                tracing::debug!(prefix = %self.prefix(), conversation = %event.conversation, "Ignoring press of disabled cell");
                return Ok(Handled::Ignored);
            }
            Ok(action) => action,
            Err(e) => {
                tracing::warn!(prefix = %self.prefix(), conversation = %event.conversation, data = %event.data, error = %e, "Ignoring malformed callback data");
                return Ok(Handled::Ignored);
            }
        };
        let cursor = self.load_cursor(&event.conversation, store)?;
        match transition(&self.config, cursor, action) {
            Ok(Outcome::Unchanged) => Ok(Handled::Ignored),
            Ok(Outcome::Show(next)) => {
                self.save_cursor(&event.conversation, next, store)?;
                let grid = self.render(next);
                let text = match self.config.display_mode() {
                    DisplayMode::Inline => None,
                    DisplayMode::Step => Some(self.prompt(next)),
                };
                surface
                    .edit_grid(&event.conversation, event.message, text.as_deref(), &grid)
                    .map_err(PickerError::Surface)?;
                tracing::debug!(prefix = %self.prefix(), conversation = %event.conversation, cursor = ?next, "Navigated");
                Ok(Handled::Navigated(next))
            }
            Ok(Outcome::Select(date)) => {
                self.finalize(event, date, surface, store)?;
                Ok(Handled::Selected(date))
            }
            Err(rejection) => {
                tracing::warn!(prefix = %self.prefix(), conversation = %event.conversation, ?action, ?cursor, %rejection, "Ignoring inapplicable action");
                Ok(Handled::Ignored)
            }
        }
    }

    fn finalize(
        &mut self,
        event: &CallbackEvent,
        date: Date,
        surface: &mut dyn ChatSurface,
        store: &mut dyn StateStore,
    ) -> Result<(), PickerError> {
        let selection = match &self.format {
            Some(format) => Selection::Text(date.format(format)?),
            None => Selection::Date(date),
        };
        surface
            .delete_message(&event.conversation, event.message)
            .map_err(PickerError::Surface)?;
        store
            .set(&event.conversation, SELECTED_DATE_FIELD, selection.to_value())
            .map_err(PickerError::Store)?;
        store
            .remove(&event.conversation, &self.cursor_field())
            .map_err(PickerError::Store)?;
        tracing::info!(prefix = %self.prefix(), conversation = %event.conversation, %date, "Date selected");
        if let Some(callback) = self.on_date_selected.as_mut() {
            let mut ctx = SelectionContext { event, surface };
            callback(selection, &mut ctx).map_err(PickerError::Callback)?;
        }
        Ok(())
    }

    fn cursor_field(&self) -> String {
        format!("{}{}cursor", self.prefix(), ActionCodec::SEPARATOR)
    }

    fn load_cursor(
        &self,
        conversation: &ConversationId,
        store: &dyn StateStore,
    ) -> Result<Cursor, PickerError> {
        let stored = store
            .get(conversation, &self.cursor_field())
            .map_err(PickerError::Store)?;
        let Some(value) = stored else {
            tracing::debug!(prefix = %self.prefix(), %conversation, "No stored cursor; assuming initial cursor");
            return Ok(self.initial_cursor());
        };
        match serde_json::from_value(value) {
            Ok(cursor) => Ok(cursor),
            Err(e) => {
                tracing::warn!(prefix = %self.prefix(), %conversation, error = %e, "Discarding unreadable stored cursor");
                Ok(self.initial_cursor())
            }
        }
    }

    fn save_cursor(
        &self,
        conversation: &ConversationId,
        cursor: Cursor,
        store: &mut dyn StateStore,
    ) -> Result<(), PickerError> {
        let value = serde_json::to_value(cursor)?;
        store
            .set(conversation, &self.cursor_field(), value)
            .map_err(PickerError::Store)
    }
}

impl fmt::Debug for DatePicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatePicker")
            .field("config", &self.config)
            .field("codec", &self.codec)
            .field("on_date_selected", &self.on_date_selected.is_some())
            .field("today", &self.today)
            .finish_non_exhaustive()
    }
}

fn local_today() -> Date {
    match OffsetDateTime::now_local() {
        Ok(now) => now.date(),
        Err(e) => {
            tracing::debug!(error = %e, "Could not determine local offset; using UTC date");
            OffsetDateTime::now_utc().date()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::YearMonth;
    use crate::config::ReturnAs;
    use crate::store::MemoryStore;
    use crate::testing::{press, RecordingSurface, SurfaceCall};
    use std::cell::RefCell;
    use std::rc::Rc;
    use time::macros::date;
    use time::Month;

    type Seen = Rc<RefCell<Vec<Selection>>>;

    fn ym(year: i32, month: Month) -> YearMonth {
        YearMonth::new(year, month).expect("valid month")
    }

    fn recording(picker: DatePicker) -> (DatePicker, Seen) {
        let seen: Seen = Rc::default();
        let sink = Rc::clone(&seen);
        let picker = picker.on_date_selected(move |selection, _ctx| {
            sink.borrow_mut().push(selection);
            Ok(())
        });
        (picker, seen)
    }

    fn inline_picker() -> DatePicker {
        DatePicker::new(PickerConfig::new(date!(2025 - 10 - 01), date!(2025 - 12 - 31)).prefix("dp1"))
            .expect("valid config")
            .with_today(date!(2025 - 10 - 17))
    }

    fn step_picker() -> DatePicker {
        DatePicker::new(
            PickerConfig::new(date!(2020 - 01 - 01), date!(2030 - 12 - 31))
                .mode(DisplayMode::Step)
                .prefix("dp2"),
        )
        .expect("valid config")
        .with_today(date!(2025 - 10 - 17))
    }

    #[test]
    fn test_construction_fails_fast() {
        let r = DatePicker::new(PickerConfig::new(date!(2025 - 12 - 31), date!(2025 - 10 - 01)));
        assert!(matches!(r, Err(ConfigError::InvertedRange { .. })));
    }

    #[test]
    fn test_inline_scenario() {
        let picker = inline_picker();
        let conv = ConversationId::new("chat");
        let mut surface = RecordingSurface::default();
        let mut store = MemoryStore::new();
        let msg = picker.start(&conv, &mut surface, &mut store).expect("start succeeds");
        let grid = surface.grid(msg).expect("grid sent");
        assert_eq!(grid.rows()[0][1].label(), "October 2025");
        assert!(!grid.rows()[0][0].is_enabled());
        assert!(grid.rows()[0][2].is_enabled());
        assert_eq!(surface.text(msg), Some("Pick a date:"));

        let mut picker = picker;
        for expected in [Month::November, Month::December] {
            let month = ym(2025, expected);
            let next = surface
                .press_action(msg, Action::NextMonth(month))
                .expect("next is enabled");
            let handled = picker
                .handle(&press(&conv, msg, next), &mut surface, &mut store)
                .expect("handle succeeds");
            assert_eq!(handled, Handled::Navigated(Cursor::DaySelect { month }));
        }
        let grid = surface.grid(msg).expect("grid still shown");
        assert_eq!(grid.rows()[0][1].label(), "December 2025");
        assert!(!grid.rows()[0][2].is_enabled());
        assert!(grid.rows()[0][0].is_enabled());
        // Inline navigation only replaces the buttons
        assert!(surface
            .calls
            .iter()
            .all(|c| !matches!(c, SurfaceCall::Edit { text: Some(_), .. })));
    }

    #[test]
    fn test_step_scenario() {
        let (mut picker, seen) = recording(step_picker());
        let conv = ConversationId::new("chat");
        let mut surface = RecordingSurface::default();
        let mut store = MemoryStore::new();
        let msg = picker.start(&conv, &mut surface, &mut store).expect("start succeeds");
        assert_eq!(surface.text(msg), Some("Pick a year:"));
        assert_eq!(surface.grid(msg).expect("grid sent").cells().count(), 11);

        let year = surface.press_label(msg, "2025").expect("2025 shown");
        picker
            .handle(&press(&conv, msg, year), &mut surface, &mut store)
            .expect("handle succeeds");
        assert_eq!(surface.text(msg), Some("Year: 2025. Pick a month:"));
        let grid = surface.grid(msg).expect("month grid");
        assert_eq!(grid.cells().filter(|c| c.is_enabled()).count(), 12);

        let march = surface.press_label(msg, "March").expect("March shown");
        let handled = picker
            .handle(&press(&conv, msg, march), &mut surface, &mut store)
            .expect("handle succeeds");
        assert_eq!(
            handled,
            Handled::Navigated(Cursor::DaySelect {
                month: ym(2025, Month::March)
            })
        );
        assert_eq!(surface.text(msg), Some("Month: 2025-03. Pick a day:"));
        let grid = surface.grid(msg).expect("day grid");
        assert_eq!(grid.rows()[0][1].label(), "March 2025");

        let day = surface.press_label(msg, "14").expect("14 shown");
        let handled = picker
            .handle(&press(&conv, msg, day), &mut surface, &mut store)
            .expect("handle succeeds");
        assert_eq!(handled, Handled::Selected(date!(2025 - 03 - 14)));
        assert_eq!(*seen.borrow(), [Selection::Date(date!(2025 - 03 - 14))]);
        assert_eq!(seen.borrow()[0].date(), Some(date!(2025 - 03 - 14)));
        assert!(surface.grid(msg).is_none(), "picker message is deleted");
        assert_eq!(
            store.get(&conv, SELECTED_DATE_FIELD).expect("get succeeds"),
            Some(Value::from("2025-03-14"))
        );
        assert_eq!(store.get(&conv, "dp2:cursor").expect("get succeeds"), None);
    }

    #[test]
    fn test_text_result() {
        let config = PickerConfig::new(date!(2025 - 10 - 01), date!(2025 - 12 - 31))
            .return_as(ReturnAs::Text(String::from("[year]-[month]-[day]")));
        let picker = DatePicker::new(config)
            .expect("valid config")
            .with_today(date!(2025 - 10 - 01));
        let (mut picker, seen) = recording(picker);
        let conv = ConversationId::new("chat");
        let mut surface = RecordingSurface::default();
        let mut store = MemoryStore::new();
        let msg = picker.start(&conv, &mut surface, &mut store).expect("start succeeds");
        let token = picker.codec().encode(Action::PickDay(date!(2025 - 10 - 15)));
        picker
            .handle(&press(&conv, msg, token), &mut surface, &mut store)
            .expect("handle succeeds");
        assert_eq!(*seen.borrow(), [Selection::Text(String::from("2025-10-15"))]);
        assert_eq!(
            store.get(&conv, SELECTED_DATE_FIELD).expect("get succeeds"),
            Some(Value::from("2025-10-15"))
        );
    }

    #[test]
    fn test_strftime_text_result() {
        let config = PickerConfig::new(date!(2025 - 10 - 01), date!(2025 - 12 - 31))
            .return_as(ReturnAs::Text(String::from("%Y-%m-%d")));
        let (mut picker, seen) = recording(DatePicker::new(config).expect("valid config"));
        let conv = ConversationId::new("chat");
        let mut surface = RecordingSurface::default();
        let mut store = MemoryStore::new();
        picker
            .handle(&press(&conv, MessageId(1), "dp:d:2025-10-15"), &mut surface, &mut store)
            .expect("handle succeeds");
        assert_eq!(*seen.borrow(), [Selection::Text(String::from("2025-10-15"))]);
        assert_eq!(seen.borrow()[0].date(), None);
    }

    #[test]
    fn test_custom_text_format() {
        let config = PickerConfig::new(date!(2025 - 10 - 01), date!(2025 - 12 - 31))
            .return_as(ReturnAs::Text(String::from("[day].[month].[year]")));
        let (mut picker, seen) = recording(DatePicker::new(config).expect("valid config"));
        let conv = ConversationId::new("chat");
        let mut surface = RecordingSurface::default();
        let mut store = MemoryStore::new();
        let token = picker.codec().encode(Action::PickDay(date!(2025 - 11 - 05)));
        picker
            .handle(&press(&conv, MessageId(1), token), &mut surface, &mut store)
            .expect("handle succeeds");
        assert_eq!(*seen.borrow(), [Selection::Text(String::from("05.11.2025"))]);
    }

    #[test]
    fn test_noop_is_harmless() {
        let (mut picker, seen) = recording(inline_picker());
        let conv = ConversationId::new("chat");
        let mut surface = RecordingSurface::default();
        let mut store = MemoryStore::new();
        let msg = picker.start(&conv, &mut surface, &mut store).expect("start succeeds");
        let before = store.clone();
        let calls = surface.calls.len();
        for _ in 0..3 {
            let handled = picker
                .handle(&press(&conv, msg, "dp1:_"), &mut surface, &mut store)
                .expect("handle succeeds");
            assert_eq!(handled, Handled::Ignored);
        }
        assert_eq!(store, before);
        assert_eq!(surface.acknowledged, 3);
        assert_eq!(surface.calls.len(), calls);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_foreign_token_not_consumed() {
        let mut picker = inline_picker();
        let conv = ConversationId::new("chat");
        let mut surface = RecordingSurface::default();
        let mut store = MemoryStore::new();
        for data in ["dp2:n", "dp:n", "dp11:_", "noop"] {
            let handled = picker
                .handle(&press(&conv, MessageId(1), data), &mut surface, &mut store)
                .expect("handle succeeds");
            assert_eq!(handled, Handled::NotMine);
        }
        assert_eq!(surface.acknowledged, 0);
    }

    #[test]
    fn test_out_of_range_selection_is_ignored() {
        let (mut picker, seen) = recording(inline_picker());
        let conv = ConversationId::new("chat");
        let mut surface = RecordingSurface::default();
        let mut store = MemoryStore::new();
        let msg = picker.start(&conv, &mut surface, &mut store).expect("start succeeds");
        let forged = picker.codec().encode(Action::PickDay(date!(2026 - 01 - 01)));
        let handled = picker
            .handle(&press(&conv, msg, forged), &mut surface, &mut store)
            .expect("handle succeeds");
        assert_eq!(handled, Handled::Ignored);
        assert!(seen.borrow().is_empty());
        assert!(surface.grid(msg).is_some());
        assert_eq!(store.get(&conv, SELECTED_DATE_FIELD).expect("get succeeds"), None);
    }

    #[test]
    fn test_malformed_token_is_ignored() {
        let mut picker = inline_picker();
        let conv = ConversationId::new("chat");
        let mut surface = RecordingSurface::default();
        let mut store = MemoryStore::new();
        let handled = picker
            .handle(&press(&conv, MessageId(1), "dp1:d:not-a-date"), &mut surface, &mut store)
            .expect("handle succeeds");
        assert_eq!(handled, Handled::Ignored);
        assert_eq!(surface.acknowledged, 1);
    }

    #[test]
    fn test_next_at_upper_bound_is_idempotent() {
        let mut picker = inline_picker();
        let conv = ConversationId::new("chat");
        let mut surface = RecordingSurface::default();
        let mut store = MemoryStore::new();
        let msg = picker.start(&conv, &mut surface, &mut store).expect("start succeeds");
        for data in ["dp1:n:2025-11", "dp1:n:2025-12"] {
            picker
                .handle(&press(&conv, msg, data), &mut surface, &mut store)
                .expect("handle succeeds");
        }
        let edits = surface.calls.len();
        let handled = picker
            .handle(&press(&conv, msg, "dp1:n:2026-01"), &mut surface, &mut store)
            .expect("handle succeeds");
        assert_eq!(handled, Handled::Ignored);
        assert_eq!(surface.calls.len(), edits);
        let cursor: Cursor = serde_json::from_value(
            store
                .get(&conv, "dp1:cursor")
                .expect("get succeeds")
                .expect("cursor stored"),
        )
        .expect("cursor deserializes");
        assert_eq!(
            cursor,
            Cursor::DaySelect {
                month: ym(2025, Month::December)
            }
        );
    }

    #[test]
    fn test_missing_cursor_falls_back_to_initial() {
        let mut picker = inline_picker();
        let conv = ConversationId::new("chat");
        let mut surface = RecordingSurface::default();
        let mut store = MemoryStore::new();
        let handled = picker
            .handle(&press(&conv, MessageId(7), "dp1:n:2025-11"), &mut surface, &mut store)
            .expect("handle succeeds");
        assert_eq!(
            handled,
            Handled::Navigated(Cursor::DaySelect {
                month: ym(2025, Month::November)
            })
        );
    }

    #[test]
    fn test_duplicate_terminal_event_invokes_callback_twice() {
        let (mut picker, seen) = recording(inline_picker());
        let conv = ConversationId::new("chat");
        let mut surface = RecordingSurface::default();
        let mut store = MemoryStore::new();
        let msg = picker.start(&conv, &mut surface, &mut store).expect("start succeeds");
        let event = press(&conv, msg, "dp1:d:2025-10-20");
        for _ in 0..2 {
            picker
                .handle(&event, &mut surface, &mut store)
                .expect("handle succeeds");
        }
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn test_callback_error_propagates() {
        let mut picker = inline_picker().on_date_selected(|_, _| anyhow::bail!("boom"));
        let conv = ConversationId::new("chat");
        let mut surface = RecordingSurface::default();
        let mut store = MemoryStore::new();
        let r = picker.handle(&press(&conv, MessageId(1), "dp1:d:2025-10-20"), &mut surface, &mut store);
        assert!(matches!(r, Err(PickerError::Callback(_))));
        // The selection was recorded before the callback ran
        assert_eq!(
            store.get(&conv, SELECTED_DATE_FIELD).expect("get succeeds"),
            Some(Value::from("2025-10-20"))
        );
    }

    #[test]
    fn test_callback_can_reply() {
        let mut picker = inline_picker().on_date_selected(|selection, ctx| {
            ctx.surface
                .send_text(&ctx.event.conversation, &format!("Selected {selection}"))?;
            Ok(())
        });
        let conv = ConversationId::new("chat");
        let mut surface = RecordingSurface::default();
        let mut store = MemoryStore::new();
        picker
            .handle(&press(&conv, MessageId(1), "dp1:t:2025-10-17"), &mut surface, &mut store)
            .expect("handle succeeds");
        assert!(surface
            .calls
            .iter()
            .any(|c| matches!(c, SurfaceCall::Text { text, .. } if text == "Selected 2025-10-17")));
    }

    #[test]
    fn test_conversations_are_independent() {
        let mut picker = inline_picker();
        let a = ConversationId::new("a");
        let b = ConversationId::new("b");
        let mut surface = RecordingSurface::default();
        let mut store = MemoryStore::new();
        let msg_a = picker.start(&a, &mut surface, &mut store).expect("start succeeds");
        let msg_b = picker.start(&b, &mut surface, &mut store).expect("start succeeds");
        picker
            .handle(&press(&a, msg_a, "dp1:n:2025-11"), &mut surface, &mut store)
            .expect("handle succeeds");
        let handled = picker
            .handle(&press(&b, msg_b, "dp1:n:2025-11"), &mut surface, &mut store)
            .expect("handle succeeds");
        assert_eq!(
            handled,
            Handled::Navigated(Cursor::DaySelect {
                month: ym(2025, Month::November)
            })
        );
    }

    #[test]
    fn test_two_live_messages_in_one_conversation() {
        let mut picker = inline_picker();
        let conv = ConversationId::new("chat");
        let mut surface = RecordingSurface::default();
        let mut store = MemoryStore::new();
        let first = picker.start(&conv, &mut surface, &mut store).expect("start succeeds");
        for expected in [Month::November, Month::December] {
            let next = surface
                .press_action(first, Action::NextMonth(ym(2025, expected)))
                .expect("next is enabled");
            picker
                .handle(&press(&conv, first, next), &mut surface, &mut store)
                .expect("handle succeeds");
        }
        // Starting again resets the stored cursor to October
        let second = picker.start(&conv, &mut surface, &mut store).expect("start succeeds");
        assert_eq!(
            surface.grid(second).expect("grid sent").rows()[0][1].label(),
            "October 2025"
        );

        let prev = surface
            .press_action(first, Action::PrevMonth(ym(2025, Month::November)))
            .expect("prev is enabled");
        let handled = picker
            .handle(&press(&conv, first, prev), &mut surface, &mut store)
            .expect("handle succeeds");
        assert_eq!(
            handled,
            Handled::Navigated(Cursor::DaySelect {
                month: ym(2025, Month::November)
            })
        );
        assert_eq!(
            surface.grid(first).expect("grid shown").rows()[0][1].label(),
            "November 2025"
        );
        assert_eq!(
            surface.grid(second).expect("grid shown").rows()[0][1].label(),
            "October 2025"
        );
    }

    #[test]
    fn test_duplicate_arrow_event_moves_once() {
        let mut picker = inline_picker();
        let conv = ConversationId::new("chat");
        let mut surface = RecordingSurface::default();
        let mut store = MemoryStore::new();
        let msg = picker.start(&conv, &mut surface, &mut store).expect("start succeeds");
        let next = surface
            .press_action(msg, Action::NextMonth(ym(2025, Month::November)))
            .expect("next is enabled");
        let event = press(&conv, msg, next);
        for _ in 0..2 {
            let handled = picker
                .handle(&event, &mut surface, &mut store)
                .expect("handle succeeds");
            assert_eq!(
                handled,
                Handled::Navigated(Cursor::DaySelect {
                    month: ym(2025, Month::November)
                })
            );
        }
        assert_eq!(
            surface.grid(msg).expect("grid shown").rows()[0][1].label(),
            "November 2025"
        );
    }

}
