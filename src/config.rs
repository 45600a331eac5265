use crate::action::{ActionCodec, MAX_TOKEN_LEN};
use crate::calendar::{YearMonth, DAYS_IN_WEEK};
use std::ops::RangeInclusive;
use thiserror::Error;
use time::format_description::OwnedFormatItem;
use time::macros::date;
use time::{Date, Duration, Month};

pub(crate) const MONTHS_IN_YEAR: usize = 12;

/// Default prefix used when the integrator does not supply one
pub const DEFAULT_PREFIX: &str = "dp";

/// Default format for [`ReturnAs::Text`], equivalent to `%Y-%m-%d`
pub const DEFAULT_DATE_FORMAT: &str = "[year]-[month]-[day]";

/// How the picker walks the user to a date
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum DisplayMode {
    /// A single month grid with previous/next arrows, edited in place
    #[default]
    Inline,
    /// Year list, then month list, then day grid
    Step,
}

/// The shape of the value handed to the selection callback
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub enum ReturnAs {
    #[default]
    Date,
    /// Format the date with the given format: a `time` format description
    /// such as `[year]-[month]-[day]`, or a strftime string such as
    /// `%Y-%m-%d`
    Text(String),
}

/// Two dates that differ in every date component.  A result format that
/// renders both the same has no date in it.
const FORMAT_TRIAL_DATES: [Date; 2] = [date!(2000 - 01 - 01), date!(2011 - 12 - 25)];

/// `%`-style formats without `[` are read as strftime; everything else is a
/// `time` format description
fn is_strftime(format: &str) -> bool {
    format.contains('%') && !format.contains('[')
}

/// Localized month and weekday names
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Locale {
    month_names: Vec<String>,
    day_names: Vec<String>,
}

impl Locale {
    /// `month_names` starts at January and `day_names` starts at Monday.
    /// Lengths are checked when the picker is constructed.
    pub fn new<M, D>(month_names: M, day_names: D) -> Locale
    where
        M: IntoIterator,
        M::Item: Into<String>,
        D: IntoIterator,
        D::Item: Into<String>,
    {
        Locale {
            month_names: month_names.into_iter().map(Into::into).collect(),
            day_names: day_names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn english() -> Locale {
        Locale::new(
            [
                "January",
                "February",
                "March",
                "April",
                "May",
                "June",
                "July",
                "August",
                "September",
                "October",
                "November",
                "December",
            ],
            ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"],
        )
    }

    pub fn russian() -> Locale {
        Locale::new(
            [
                "Январь",
                "Февраль",
                "Март",
                "Апрель",
                "Май",
                "Июнь",
                "Июль",
                "Август",
                "Сентябрь",
                "Октябрь",
                "Ноябрь",
                "Декабрь",
            ],
            ["Пн", "Вт", "Ср", "Чт", "Пт", "Сб", "Вс"],
        )
    }

    pub fn month_name(&self, month: Month) -> &str {
        let i = usize::from(u8::from(month)) - 1;
        self.month_names.get(i).map_or("", String::as_str)
    }

    pub fn day_names(&self) -> &[String] {
        &self.day_names
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.month_names.len() != MONTHS_IN_YEAR {
            return Err(ConfigError::MonthNames(self.month_names.len()));
        }
        if self.day_names.len() != DAYS_IN_WEEK {
            return Err(ConfigError::DayNames(self.day_names.len()));
        }
        Ok(())
    }
}

impl Default for Locale {
    fn default() -> Locale {
        Locale::english()
    }
}

/// Message texts shown above the buttons at each stage.
///
/// `select_month` may contain `{year}`; `select_day` may contain `{year}`,
/// `{month}` (two digits) and `{month_name}`.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Prompts {
    pub select_date: String,
    pub select_year: String,
    pub select_month: String,
    pub select_day: String,
}

impl Prompts {
    pub fn english() -> Prompts {
        Prompts {
            select_date: String::from("Pick a date:"),
            select_year: String::from("Pick a year:"),
            select_month: String::from("Year: {year}. Pick a month:"),
            select_day: String::from("Month: {year}-{month}. Pick a day:"),
        }
    }

    pub fn russian() -> Prompts {
        Prompts {
            select_date: String::from("Выберите дату:"),
            select_year: String::from("Выберите год:"),
            select_month: String::from("Год: {year}. Выберите месяц:"),
            select_day: String::from("Месяц: {year}-{month}. Выберите день:"),
        }
    }

    pub(crate) fn month_prompt(&self, year: i32) -> String {
        fill(&self.select_month, &[("{year}", year.to_string())])
    }

    pub(crate) fn day_prompt(&self, month: YearMonth, locale: &Locale) -> String {
        fill(
            &self.select_day,
            &[
                ("{year}", month.year().to_string()),
                ("{month_name}", locale.month_name(month.month()).to_owned()),
                ("{month}", format!("{:02}", u8::from(month.month()))),
            ],
        )
    }
}

/// Substitute placeholders in one left-to-right pass, so inserted text is
/// never itself searched for placeholders
fn fill(template: &str, values: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(i) = rest.find('{') {
        let (before, tail) = rest.split_at(i);
        out.push_str(before);
        let placeholder = values
            .iter()
            .find_map(|(name, value)| Some((tail.strip_prefix(name)?, value)));
        match placeholder {
            Some((after, value)) => {
                out.push_str(value);
                rest = after;
            }
            None => {
                let (brace, after) = tail.split_at(1);
                out.push_str(brace);
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

impl Default for Prompts {
    fn default() -> Prompts {
        Prompts::english()
    }
}

/// Labels for the month navigation arrows and for empty cells
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct NavLabels {
    pub prev: String,
    pub next: String,
    pub blank: String,
}

impl Default for NavLabels {
    fn default() -> NavLabels {
        NavLabels {
            prev: String::from("◀️"),
            next: String::from("▶️"),
            blank: String::from(" "),
        }
    }
}

/// Immutable picker configuration, shared by every conversation using the
/// picker
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct PickerConfig {
    start: Date,
    end: Date,
    mode: DisplayMode,
    prefix: String,
    return_as: ReturnAs,
    locale: Locale,
    prompts: Prompts,
    button_today: String,
    nav_labels: NavLabels,
}

impl PickerConfig {
    /// Both bounds are inclusive
    pub fn new(start: Date, end: Date) -> PickerConfig {
        PickerConfig {
            start,
            end,
            mode: DisplayMode::default(),
            prefix: String::from(DEFAULT_PREFIX),
            return_as: ReturnAs::default(),
            locale: Locale::default(),
            prompts: Prompts::default(),
            button_today: String::from("Today"),
            nav_labels: NavLabels::default(),
        }
    }

    /// A range running from `today` through the same day a year (365 days)
    /// later
    pub fn from_today(today: Date) -> PickerConfig {
        let end = today.checked_add(Duration::days(365)).unwrap_or(Date::MAX);
        PickerConfig::new(today, end)
    }

    pub fn mode(mut self, mode: DisplayMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn return_as(mut self, return_as: ReturnAs) -> Self {
        self.return_as = return_as;
        self
    }

    pub fn locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn button_today<S: Into<String>>(mut self, label: S) -> Self {
        self.button_today = label.into();
        self
    }

    pub fn nav_labels(mut self, nav_labels: NavLabels) -> Self {
        self.nav_labels = nav_labels;
        self
    }

    pub fn start(&self) -> Date {
        self.start
    }

    pub fn end(&self) -> Date {
        self.end
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn namespace(&self) -> &str {
        &self.prefix
    }

    pub fn returns(&self) -> &ReturnAs {
        &self.return_as
    }

    pub fn language(&self) -> &Locale {
        &self.locale
    }

    pub fn prompt_texts(&self) -> &Prompts {
        &self.prompts
    }

    pub fn today_label(&self) -> &str {
        &self.button_today
    }

    pub fn labels(&self) -> &NavLabels {
        &self.nav_labels
    }

    /// The earliest month that may be displayed
    pub fn first_month(&self) -> YearMonth {
        YearMonth::of(self.start)
    }

    /// The latest month that may be displayed
    pub fn last_month(&self) -> YearMonth {
        YearMonth::of(self.end)
    }

    pub fn years(&self) -> RangeInclusive<i32> {
        self.start.year()..=self.end.year()
    }

    pub fn contains(&self, date: Date) -> bool {
        (self.start..=self.end).contains(&date)
    }

    /// Whether any day of `month` is selectable
    pub fn overlaps(&self, month: YearMonth) -> bool {
        month.first_day() <= self.end && self.start <= month.last_day()
    }

    /// Check every invariant and return the parsed result format, if any
    pub(crate) fn validate(&self) -> Result<Option<OwnedFormatItem>, ConfigError> {
        if self.start > self.end {
            return Err(ConfigError::InvertedRange {
                start: self.start,
                end: self.end,
            });
        }
        for year in [self.start.year(), self.end.year()] {
            if !(1..=9999).contains(&year) {
                return Err(ConfigError::YearOutOfRange(year));
            }
        }
        self.locale.validate()?;
        if self.prefix.is_empty() {
            return Err(ConfigError::EmptyPrefix);
        }
        if self.prefix.contains(ActionCodec::SEPARATOR) {
            return Err(ConfigError::PrefixSeparator(self.prefix.clone()));
        }
        let longest = ActionCodec::longest_token_len(&self.prefix);
        if longest > MAX_TOKEN_LEN {
            return Err(ConfigError::PrefixTooLong {
                prefix: self.prefix.clone(),
                token_len: longest,
            });
        }
        match &self.return_as {
            ReturnAs::Date => Ok(None),
            ReturnAs::Text(format) => {
                let parsed = if is_strftime(format) {
                    time::format_description::parse_strftime_owned(format)
                } else {
                    time::format_description::parse_owned::<2>(format)
                };
                let item = parsed.map_err(|source| ConfigError::InvalidFormat {
                    format: format.clone(),
                    source,
                })?;
                // Descriptions that parse but need more than a date, such as
                // "[hour]", fail here
                let [a, b] = FORMAT_TRIAL_DATES.map(|d| {
                    d.format(&item).map_err(|source| ConfigError::UnusableFormat {
                        format: format.clone(),
                        source,
                    })
                });
                if a? == b? {
                    return Err(ConfigError::ConstantFormat(format.clone()));
                }
                Ok(Some(item))
            }
        }
    }
}

/// Raised synchronously when a picker is constructed from a bad
/// configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("start date {start} is after end date {end}")]
    InvertedRange { start: Date, end: Date },
    #[error("year {0} is outside the supported range 1 through 9999")]
    YearOutOfRange(i32),
    #[error("expected 12 month names, got {0}")]
    MonthNames(usize),
    #[error("expected 7 day names, got {0}")]
    DayNames(usize),
    #[error("picker prefix must not be empty")]
    EmptyPrefix,
    #[error("picker prefix {0:?} must not contain ':'")]
    PrefixSeparator(String),
    #[error("picker prefix {prefix:?} yields {token_len}-byte callback tokens; at most 64 are allowed")]
    PrefixTooLong { prefix: String, token_len: usize },
    #[error("invalid date format {format:?}")]
    InvalidFormat {
        format: String,
        source: time::error::InvalidFormatDescription,
    },
    #[error("date format {0:?} contains no date components")]
    ConstantFormat(String),
    #[error("date format {format:?} cannot be applied to a date")]
    UnusableFormat {
        format: String,
        source: time::error::Format,
    },
}
