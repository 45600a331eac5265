use ratatui::style::{Color, Modifier, Style};

pub(crate) const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

pub(crate) const PROMPT_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const REPLY_STYLE: Style = BASE_STYLE.fg(Color::LightGreen);

pub(crate) const BUTTON_STYLE: Style = Style::new().fg(Color::Black).bg(Color::Gray);

pub(crate) const DISABLED_STYLE: Style = Style::new().fg(Color::DarkGray).bg(Color::Black);

pub(crate) const FOCUSED_STYLE: Style = Style::new()
    .fg(Color::Black)
    .bg(Color::LightYellow)
    .add_modifier(Modifier::BOLD);
