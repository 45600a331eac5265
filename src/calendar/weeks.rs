use time::{Date, Weekday};

pub(crate) const DAYS_IN_WEEK: usize = 7;

pub(super) trait WeekdayExt {
    fn index0(&self) -> usize;
}

impl WeekdayExt for Weekday {
    fn index0(&self) -> usize {
        self.number_days_from_monday().into()
    }
}

/// One row of a month layout, Monday first.  Slots for days belonging to a
/// neighboring month are `None`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
// Invariant: At least one element of the array is Some
pub struct Week([Option<Date>; DAYS_IN_WEEK]);

impl Week {
    pub(super) fn new(date: Date) -> Self {
        let mut this = Week([None; DAYS_IN_WEEK]);
        this.set(date);
        this
    }

    pub(super) fn set(&mut self, date: Date) {
        if let Some(slot) = self.0.get_mut(date.weekday().index0()) {
            *slot = Some(date);
        }
    }

    pub fn days(&self) -> [Option<Date>; DAYS_IN_WEEK] {
        self.0
    }

    pub fn get(&self, wd: Weekday) -> Option<Date> {
        self.0.get(wd.index0()).copied().flatten()
    }
}
