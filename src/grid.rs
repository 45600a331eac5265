use crate::action::{Action, ActionCodec};
use crate::calendar::YearMonth;
use crate::config::PickerConfig;
use crate::cursor::Cursor;
use time::{Date, Month};

/// Number of buttons per row in the month and year lists
const LIST_COLUMNS: usize = 3;

/// One button of a [`Grid`]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Cell {
    label: String,
    action: Action,
    callback_data: String,
}

impl Cell {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn is_enabled(&self) -> bool {
        self.action != Action::Noop
    }

    /// The action token, or `None` for a disabled cell
    pub fn token(&self) -> Option<&str> {
        self.is_enabled().then_some(self.callback_data.as_str())
    }

    /// What to attach to the platform button.  Disabled cells carry this
    /// picker's no-op token, since most platforms require callback data on
    /// every button.
    pub fn callback_data(&self) -> &str {
        &self.callback_data
    }
}

/// An ordered set of button rows, ready to be handed to a chat platform
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.rows.iter().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The first cell with the given label
    pub fn find(&self, label: &str) -> Option<&Cell> {
        self.cells().find(|c| c.label == label)
    }

    /// Every date that can currently be picked from a day cell
    pub fn enabled_days(&self) -> Vec<Date> {
        self.cells()
            .filter_map(|c| match c.action {
                Action::PickDay(d) => Some(d),
                _ => None,
            })
            .collect()
    }

    /// The "today" shortcut, if shown
    pub fn today_cell(&self) -> Option<&Cell> {
        self.cells()
            .find(|c| matches!(c.action, Action::PickToday(_)))
    }
}

/// Builds grids for one picker.  Rendering is a pure function of the
/// configuration, the cursor and the date used as "today".
#[derive(Clone, Copy, Debug)]
pub(crate) struct Renderer<'a> {
    config: &'a PickerConfig,
    codec: &'a ActionCodec,
    today: Date,
}

impl<'a> Renderer<'a> {
    pub(crate) fn new(config: &'a PickerConfig, codec: &'a ActionCodec, today: Date) -> Self {
        Renderer {
            config,
            codec,
            today,
        }
    }

    pub(crate) fn render(&self, cursor: Cursor) -> Grid {
        match cursor {
            Cursor::YearSelect => self.year_grid(),
            Cursor::MonthSelect { year } => self.month_grid(year),
            Cursor::DaySelect { month } => self.day_grid(month),
        }
    }

    fn cell<S: Into<String>>(&self, label: S, action: Action) -> Cell {
        Cell {
            label: label.into(),
            action,
            callback_data: self.codec.encode(action),
        }
    }

    fn blank(&self) -> Cell {
        self.cell(self.config.labels().blank.as_str(), Action::Noop)
    }

    fn day_grid(&self, month: YearMonth) -> Grid {
        let labels = self.config.labels();
        let locale = self.config.language();
        let mut rows = Vec::with_capacity(9);

        let prev = match month.prev() {
            Some(p) if p >= self.config.first_month() => {
                self.cell(labels.prev.as_str(), Action::PrevMonth(p))
            }
            _ => self.blank(),
        };
        let next = match month.next() {
            Some(n) if n <= self.config.last_month() => {
                self.cell(labels.next.as_str(), Action::NextMonth(n))
            }
            _ => self.blank(),
        };
        let title = format!("{} {}", locale.month_name(month.month()), month.year());
        rows.push(vec![prev, self.cell(title, Action::Noop), next]);

        rows.push(
            locale
                .day_names()
                .iter()
                .map(|name| self.cell(name.as_str(), Action::Noop))
                .collect(),
        );

        for week in month.weeks() {
            rows.push(
                week.days()
                    .into_iter()
                    .map(|slot| match slot {
                        Some(date) if self.config.contains(date) => {
                            self.cell(date.day().to_string(), Action::PickDay(date))
                        }
                        Some(date) => self.cell(date.day().to_string(), Action::Noop),
                        None => self.blank(),
                    })
                    .collect(),
            );
        }

        if self.config.contains(self.today) {
            rows.push(vec![self.cell(
                self.config.today_label(),
                Action::PickToday(self.today),
            )]);
        }
        Grid { rows }
    }

    fn month_grid(&self, year: i32) -> Grid {
        let locale = self.config.language();
        let cells = MONTHS
            .iter()
            .map(|&m| {
                let name = locale.month_name(m);
                match YearMonth::new(year, m) {
                    Some(ym) if self.config.overlaps(ym) => self.cell(name, Action::PickMonth(ym)),
                    _ => self.cell(name, Action::Noop),
                }
            })
            .collect::<Vec<_>>();
        Grid {
            rows: cells.chunks(LIST_COLUMNS).map(<[Cell]>::to_vec).collect(),
        }
    }

    fn year_grid(&self) -> Grid {
        let cells = self
            .config
            .years()
            .map(|y| self.cell(y.to_string(), Action::PickYear(y)))
            .collect::<Vec<_>>();
        Grid {
            rows: cells.chunks(LIST_COLUMNS).map(<[Cell]>::to_vec).collect(),
        }
    }
}

static MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];
