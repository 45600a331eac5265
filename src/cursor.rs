//! Per-conversation navigation state and the pure transition function
//!
//! Given the same configuration, cursor and action, [`transition()`] always
//! produces the same result and performs no I/O; persisting the new cursor
//! and talking to the chat platform is left to the caller.

use crate::action::Action;
use crate::calendar::YearMonth;
use crate::config::{DisplayMode, PickerConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::Date;

/// What a conversation is currently looking at
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum Cursor {
    /// Step mode: the list of years in range
    YearSelect,
    /// Step mode: the twelve months of `year`
    MonthSelect { year: i32 },
    /// The day grid of a single month; the only stage in inline mode
    DaySelect { month: YearMonth },
}

impl Cursor {
    /// The cursor a freshly started picker shows
    pub fn initial(config: &PickerConfig) -> Cursor {
        match config.display_mode() {
            DisplayMode::Inline => Cursor::DaySelect {
                month: config.first_month(),
            },
            DisplayMode::Step => Cursor::YearSelect,
        }
    }

    pub fn focused_year(self) -> Option<i32> {
        match self {
            Cursor::YearSelect => None,
            Cursor::MonthSelect { year } => Some(year),
            Cursor::DaySelect { month } => Some(month.year()),
        }
    }

    pub fn focused_month(self) -> Option<YearMonth> {
        match self {
            Cursor::DaySelect { month } => Some(month),
            _ => None,
        }
    }
}

/// The successful result of applying an [`Action`] to a [`Cursor`]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Outcome {
    /// Nothing happens; used for disabled cells
    Unchanged,
    /// Move to the given cursor and re-render
    Show(Cursor),
    /// A concrete date was chosen
    Select(Date),
}

/// An action that is well-formed but cannot be applied.  These only arise
/// from stale or forged buttons, since the renderer never enables them.
#[derive(Clone, Copy, Debug, Eq, Error, Hash, PartialEq)]
pub enum Rejection {
    #[error("cannot move before {0}, the first month in range")]
    AtFirstMonth(YearMonth),
    #[error("cannot move past {0}, the last month in range")]
    AtLastMonth(YearMonth),
    #[error("year and month selection are only available in step mode")]
    InlineMode,
    #[error("year {0} is outside the selectable range")]
    YearOutOfRange(i32),
    #[error("month {0} has no selectable days")]
    MonthOutOfRange(YearMonth),
    #[error("date {0} is outside the selectable range")]
    DateOutOfRange(Date),
}

pub fn transition(
    config: &PickerConfig,
    cursor: Cursor,
    action: Action,
) -> Result<Outcome, Rejection> {
    match (action, cursor) {
        (Action::Noop, _) => Ok(Outcome::Unchanged),

        // Arrows name the month they lead to, so they ignore the stored cursor
        (Action::PrevMonth(month) | Action::NextMonth(month), _) => {
            if month < config.first_month() {
                Err(Rejection::AtFirstMonth(config.first_month()))
            } else if month > config.last_month() {
                Err(Rejection::AtLastMonth(config.last_month()))
            } else {
                Ok(Outcome::Show(Cursor::DaySelect { month }))
            }
        }

        (Action::PickYear(_) | Action::PickMonth(_), _)
            if config.display_mode() == DisplayMode::Inline =>
        {
            Err(Rejection::InlineMode)
        }

        (Action::PickYear(year), _) => {
            if config.years().contains(&year) {
                Ok(Outcome::Show(Cursor::MonthSelect { year }))
            } else {
                Err(Rejection::YearOutOfRange(year))
            }
        }

        (Action::PickMonth(month), _) => {
            if config.overlaps(month) {
                Ok(Outcome::Show(Cursor::DaySelect { month }))
            } else {
                Err(Rejection::MonthOutOfRange(month))
            }
        }

        (Action::PickDay(date) | Action::PickToday(date), _) => {
            if config.contains(date) {
                Ok(Outcome::Select(date))
            } else {
                Err(Rejection::DateOutOfRange(date))
            }
        }
    }
}
