use crate::theme::{BUTTON_STYLE, DISABLED_STYLE, FOCUSED_STYLE, PROMPT_STYLE, REPLY_STYLE};
use crate::transcript::{Entry, Transcript};
use chat_datepicker::Cell;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    widgets::{Paragraph, Widget},
};

/// Width of the message column, roughly that of a phone-sized chat window
const CHAT_WIDTH: u16 = 42;

/// Columns between adjacent buttons in a row
const BUTTON_GAP: u16 = 1;

/// Renders a [`Transcript`] as a column of messages, drawing each message's
/// buttons beneath its text.  Only the newest message with buttons shows a
/// focused button.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ChatView<'a> {
    transcript: &'a Transcript,
    focus: Option<(usize, usize)>,
}

impl<'a> ChatView<'a> {
    pub(crate) fn new(transcript: &'a Transcript, focus: Option<(usize, usize)>) -> Self {
        ChatView { transcript, focus }
    }
}

impl Widget for ChatView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [area] = Layout::horizontal([CHAT_WIDTH.min(area.width)])
            .flex(Flex::Center)
            .areas(area);
        let entries = self.transcript.entries();
        // Show as many of the newest messages as fit
        let mut used = 0u16;
        let shown = entries
            .iter()
            .rev()
            .take_while(|e| {
                used = used.saturating_add(entry_height(e));
                used <= area.height
            })
            .count();
        let active = self.transcript.active().map(|e| e.id);
        let mut y = area.y;
        for entry in entries.iter().skip(entries.len() - shown) {
            let style = if entry.grid.is_some() {
                PROMPT_STYLE
            } else {
                REPLY_STYLE
            };
            Paragraph::new(entry.text.as_str())
                .style(style)
                .render(Rect::new(area.x, y, area.width, 1), buf);
            y += 1;
            if let Some(grid) = &entry.grid {
                let focus = self.focus.filter(|_| active == Some(entry.id));
                for (r, row) in grid.rows().iter().enumerate() {
                    let focused_col = focus.and_then(|(fr, fc)| (fr == r).then_some(fc));
                    draw_row(Rect::new(area.x, y, area.width, 1), row, focused_col, buf);
                    y += 1;
                }
            }
            y += 1;
        }
    }
}

fn entry_height(entry: &Entry) -> u16 {
    let rows = entry.grid.as_ref().map_or(0, |g| g.rows().len());
    u16::try_from(rows).unwrap_or(u16::MAX).saturating_add(2)
}

fn draw_row(area: Rect, row: &[Cell], focused_col: Option<usize>, buf: &mut Buffer) {
    let areas = Layout::horizontal(row.iter().map(|_| Constraint::Fill(1)))
        .spacing(BUTTON_GAP)
        .split(area);
    for (col, (cell, &rect)) in row.iter().zip(areas.iter()).enumerate() {
        let style = if focused_col == Some(col) {
            FOCUSED_STYLE
        } else if cell.is_enabled() {
            BUTTON_STYLE
        } else {
            DISABLED_STYLE
        };
        Paragraph::new(cell.label())
            .alignment(Alignment::Center)
            .style(style)
            .render(rect, buf);
    }
}
