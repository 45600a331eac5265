use crate::help::Help;
use crate::keyboard::ChatView;
use crate::theme::BASE_STYLE;
use crate::transcript::Transcript;
use chat_datepicker::{
    Action, CallbackEvent, Cell, ConversationId, DatePicker, Dispatch, Grid, Handled,
    MemoryStore, Registry, StateStore, SELECTED_DATE_FIELD,
};
use crossterm::event::{read, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget, DefaultTerminal};
use std::io::{self, Write};
use std::mem::discriminant;

/// A one-conversation chat rendered in the terminal, with a date picker
/// answering button presses made from the keyboard
#[derive(Debug)]
pub(crate) struct App {
    registry: Registry,
    store: MemoryStore,
    transcript: Transcript,
    conversation: ConversationId,
    prefix: String,
    /// Row and column of the focused button of the active message
    focus: (usize, usize),
    state: AppState,
}

impl App {
    pub(crate) fn new(picker: DatePicker) -> anyhow::Result<App> {
        let prefix = picker.prefix().to_owned();
        let picker = picker.on_date_selected(|selection, ctx| {
            ctx.surface.send_text(
                &ctx.event.conversation,
                &format!("Selected date: {selection}"),
            )?;
            Ok(())
        });
        let mut registry = Registry::new();
        registry.register(picker)?;
        let mut app = App {
            registry,
            store: MemoryStore::new(),
            transcript: Transcript::default(),
            conversation: ConversationId::new("terminal"),
            prefix,
            focus: (0, 0),
            state: AppState::Chatting,
        };
        app.restart()?;
        Ok(app)
    }

    pub(crate) fn run(&mut self, mut terminal: DefaultTerminal) -> anyhow::Result<()> {
        while !self.quitting() {
            terminal.draw(|frame| frame.render_widget(&*self, frame.area()))?;
            self.handle_input()?;
        }
        Ok(())
    }

    /// The value the picker last stored for the conversation
    pub(crate) fn selected_date(&self) -> anyhow::Result<Option<String>> {
        Ok(self
            .store
            .get(&self.conversation, SELECTED_DATE_FIELD)?
            .and_then(|v| v.as_str().map(ToOwned::to_owned)))
    }

    fn handle_input(&mut self) -> anyhow::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if let Some(KeyEvent {
            code, modifiers, ..
        }) = read()?.as_key_press_event()
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code)? {
                beep()?;
            }
        }
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key or a button that did
    // nothing
    fn handle_key(&mut self, key: KeyCode) -> anyhow::Result<bool> {
        match self.state {
            AppState::Chatting => match key {
                KeyCode::Char('h') | KeyCode::Left => Ok(self.move_left()),
                KeyCode::Char('l') | KeyCode::Right => Ok(self.move_right()),
                KeyCode::Char('k') | KeyCode::Up => Ok(self.move_up()),
                KeyCode::Char('j') | KeyCode::Down => Ok(self.move_down()),
                KeyCode::Enter | KeyCode::Char(' ') => self.press(),
                KeyCode::Char('s') => {
                    self.restart()?;
                    Ok(true)
                }
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.state = AppState::Quitting;
                    Ok(true)
                }
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    Ok(true)
                }
                _ => Ok(false),
            },
            AppState::Helping => {
                self.state = AppState::Chatting;
                Ok(true)
            }
            AppState::Quitting => Ok(false),
        }
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }

    /// Send a fresh picker message
    fn restart(&mut self) -> anyhow::Result<()> {
        self.registry.start(
            &self.prefix,
            &self.conversation,
            &mut self.transcript,
            &mut self.store,
        )?;
        self.focus = self.initial_focus();
        Ok(())
    }

    fn active_grid(&self) -> Option<&Grid> {
        self.transcript.active().and_then(|e| e.grid.as_ref())
    }

    fn focused_cell(&self) -> Option<&Cell> {
        let (row, col) = self.focus;
        self.active_grid()?.rows().get(row)?.get(col)
    }

    /// Focus the "today" button if there is one, else the first enabled
    /// button
    fn initial_focus(&self) -> (usize, usize) {
        let Some(grid) = self.active_grid() else {
            return (0, 0);
        };
        let positions = || {
            grid.rows().iter().enumerate().flat_map(|(r, row)| {
                row.iter().enumerate().map(move |(c, cell)| ((r, c), cell))
            })
        };
        positions()
            .find(|(_, cell)| matches!(cell.action(), Action::PickToday(_)))
            .or_else(|| positions().find(|(_, cell)| cell.is_enabled()))
            .map_or((0, 0), |(pos, _)| pos)
    }

    fn press(&mut self) -> anyhow::Result<bool> {
        let Some(entry) = self.transcript.active() else {
            return Ok(false);
        };
        let Some(cell) = self.focused_cell() else {
            return Ok(false);
        };
        let pressed = cell.action();
        let event = CallbackEvent {
            conversation: entry.conversation.clone(),
            message: entry.id,
            data: cell.callback_data().to_owned(),
        };
        match self
            .registry
            .dispatch(&event, &mut self.transcript, &mut self.store)?
        {
            Dispatch::Routed(Handled::Navigated(_)) => {
                // Keep focus on a month arrow that can be pressed again
                let same_button = self
                    .focused_cell()
                    .is_some_and(|c| discriminant(&c.action()) == discriminant(&pressed));
                if !same_button {
                    self.focus = self.initial_focus();
                }
                Ok(true)
            }
            Dispatch::Routed(Handled::Selected(_)) => {
                self.focus = self.initial_focus();
                Ok(true)
            }
            Dispatch::Routed(Handled::Ignored | Handled::NotMine) | Dispatch::Unrouted => Ok(false),
        }
    }

    fn row_len(&self, row: usize) -> Option<usize> {
        self.active_grid()?.rows().get(row).map(Vec::len)
    }

    fn move_left(&mut self) -> bool {
        match self.focus.1.checked_sub(1) {
            Some(col) => {
                self.focus.1 = col;
                true
            }
            None => false,
        }
    }

    fn move_right(&mut self) -> bool {
        let col = self.focus.1 + 1;
        if self.row_len(self.focus.0).is_some_and(|len| col < len) {
            self.focus.1 = col;
            true
        } else {
            false
        }
    }

    fn move_up(&mut self) -> bool {
        match self.focus.0.checked_sub(1) {
            Some(row) => self.move_to_row(row),
            None => false,
        }
    }

    fn move_down(&mut self) -> bool {
        self.move_to_row(self.focus.0 + 1)
    }

    fn move_to_row(&mut self, row: usize) -> bool {
        match self.row_len(row) {
            Some(len) if len > 0 => {
                self.focus = (row, self.focus.1.min(len - 1));
                true
            }
            _ => false,
        }
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        let focus = self.transcript.active().map(|_| self.focus);
        ChatView::new(&self.transcript, focus).render(area, buf);
        if self.state == AppState::Helping {
            Help(BASE_STYLE).render(area, buf);
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AppState {
    Chatting,
    Helping,
    Quitting,
}

fn beep() -> io::Result<()> {
    io::stdout().write_all(b"\x07")
}
