mod weeks;
pub use self::weeks::Week;
pub(crate) use self::weeks::DAYS_IN_WEEK;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::successors;
use time::{Date, Month, Weekday};

/// A single month of a single year, ordered chronologically.
///
/// Internally this is the first day of the month, so every `YearMonth` is
/// guaranteed to be representable as a [`Date`].
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct YearMonth(Date);

impl YearMonth {
    /// Returns `None` if the first day of the given month cannot be
    /// represented
    pub fn new(year: i32, month: Month) -> Option<YearMonth> {
        Date::from_calendar_date(year, month, 1).ok().map(YearMonth)
    }

    /// The month containing `date`
    pub fn of(date: Date) -> YearMonth {
        YearMonth(date.replace_day(1).unwrap_or(date))
    }

    pub fn year(self) -> i32 {
        self.0.year()
    }

    pub fn month(self) -> Month {
        self.0.month()
    }

    pub fn first_day(self) -> Date {
        self.0
    }

    pub fn last_day(self) -> Date {
        self.days().last().unwrap_or(self.0)
    }

    /// The following month, or `None` at the end of time
    pub fn next(self) -> Option<YearMonth> {
        self.last_day().next_day().map(YearMonth)
    }

    /// The preceding month, or `None` at the start of time
    pub fn prev(self) -> Option<YearMonth> {
        self.0.previous_day().map(YearMonth::of)
    }

    pub fn contains(self, date: Date) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    /// Iterate over every day of the month in order
    pub fn days(self) -> impl Iterator<Item = Date> {
        let month = self.month();
        successors(Some(self.0), |d| d.next_day()).take_while(move |d| d.month() == month)
    }

    /// Lay the month out as calendar rows, Monday first.  The first and last
    /// rows may be partially filled.
    pub fn weeks(self) -> Vec<Week> {
        let mut weeks: Vec<Week> = Vec::with_capacity(6);
        for date in self.days() {
            if date.weekday() == Weekday::Monday || weeks.is_empty() {
                weeks.push(Week::new(date));
            } else if let Some(week) = weeks.last_mut() {
                week.set(date);
            }
        }
        weeks
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), u8::from(self.month()))
    }
}
