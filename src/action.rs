use crate::calendar::YearMonth;
use std::fmt;
use thiserror::Error;
use time::{format_description::FormatItem, macros::format_description, Date, Month};

/// Chat platforms cap button callback data; Telegram allows 64 bytes
pub const MAX_TOKEN_LEN: usize = 64;

static YMD_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Length of the longest tag-and-value tail, e.g. `:d:2025-10-15`
const LONGEST_TAIL_LEN: usize = ":d:YYYY-MM-DD".len();

/// A navigation or selection intent carried by a button
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Action {
    /// Pressed a disabled or decorative cell
    Noop,
    /// Show the day grid of the given month, the one before the month shown
    PrevMonth(YearMonth),
    /// Show the day grid of the given month, the one after the month shown
    NextMonth(YearMonth),
    PickYear(i32),
    PickMonth(YearMonth),
    PickDay(Date),
    /// The "today" shortcut.  The date is fixed when the grid is rendered.
    PickToday(Date),
}

impl Action {
    fn tag(self) -> &'static str {
        match self {
            Action::Noop => "_",
            Action::PrevMonth(_) => "p",
            Action::NextMonth(_) => "n",
            Action::PickYear(_) => "y",
            Action::PickMonth(_) => "m",
            Action::PickDay(_) => "d",
            Action::PickToday(_) => "t",
        }
    }
}

/// Converts [`Action`]s to and from the compact `<prefix>:<tag>[:<value>]`
/// strings stored in button callback data
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ActionCodec {
    prefix: String,
}

impl ActionCodec {
    pub const SEPARATOR: char = ':';

    pub fn new<S: Into<String>>(prefix: S) -> ActionCodec {
        ActionCodec {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub(crate) fn longest_token_len(prefix: &str) -> usize {
        prefix.len() + LONGEST_TAIL_LEN
    }

    /// The namespace a token claims to belong to, without checking that the
    /// rest of it is well-formed
    pub fn namespace_of(token: &str) -> Option<&str> {
        token
            .split_once(Self::SEPARATOR)
            .map(|(prefix, _)| prefix)
            .filter(|prefix| !prefix.is_empty())
    }

    pub fn owns(&self, token: &str) -> bool {
        Self::namespace_of(token) == Some(self.prefix.as_str())
    }

    pub fn encode(&self, action: Action) -> String {
        let sep = Self::SEPARATOR;
        let prefix = &self.prefix;
        let tag = action.tag();
        match action {
            Action::Noop => format!("{prefix}{sep}{tag}"),
            Action::PickYear(year) => format!("{prefix}{sep}{tag}{sep}{year:04}"),
            Action::PrevMonth(month) | Action::NextMonth(month) | Action::PickMonth(month) => {
                format!("{prefix}{sep}{tag}{sep}{month}")
            }
            Action::PickDay(date) | Action::PickToday(date) => {
                format!("{prefix}{sep}{tag}{sep}{}", Ymd(date))
            }
        }
    }

    pub fn decode(&self, token: &str) -> Result<Action, TokenError> {
        let Some(payload) = token
            .strip_prefix(self.prefix.as_str())
            .and_then(|rest| rest.strip_prefix(Self::SEPARATOR))
        else {
            return Err(TokenError::ForeignNamespace);
        };
        let (tag, value) = match payload.split_once(Self::SEPARATOR) {
            Some((tag, value)) => (tag, Some(value)),
            None => (payload, None),
        };
        let bad_value = |value: &str| TokenError::BadValue {
            tag: tag.to_owned(),
            value: value.to_owned(),
        };
        match (tag, value) {
            ("_", None) => Ok(Action::Noop),
            ("y", Some(v)) => v.parse::<i32>().map(Action::PickYear).map_err(|_| bad_value(v)),
            ("p", Some(v)) => parse_year_month(v)
                .map(Action::PrevMonth)
                .ok_or_else(|| bad_value(v)),
            ("n", Some(v)) => parse_year_month(v)
                .map(Action::NextMonth)
                .ok_or_else(|| bad_value(v)),
            ("m", Some(v)) => parse_year_month(v)
                .map(Action::PickMonth)
                .ok_or_else(|| bad_value(v)),
            ("d", Some(v)) => Date::parse(v, &YMD_FMT)
                .map(Action::PickDay)
                .map_err(|_| bad_value(v)),
            ("t", Some(v)) => Date::parse(v, &YMD_FMT)
                .map(Action::PickToday)
                .map_err(|_| bad_value(v)),
            ("_", Some(v)) => Err(bad_value(v)),
            ("p" | "n" | "y" | "m" | "d" | "t", None) => {
                Err(TokenError::MissingValue(tag.to_owned()))
            }
            _ => Err(TokenError::UnknownTag(tag.to_owned())),
        }
    }
}

fn parse_year_month(s: &str) -> Option<YearMonth> {
    let (year, month) = s.rsplit_once('-')?;
    let year = year.parse::<i32>().ok()?;
    let month = Month::try_from(month.parse::<u8>().ok()?).ok()?;
    YearMonth::new(year, month)
}

/// Zero-padded `YYYY-MM-DD`, matching `YMD_FMT` for years 1 through 9999
struct Ymd(Date);

impl fmt::Display for Ymd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.0.year(),
            u8::from(self.0.month()),
            self.0.day()
        )
    }
}

/// Why a callback token could not be turned into an [`Action`]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum TokenError {
    #[error("token belongs to a different picker")]
    ForeignNamespace,
    #[error("unknown action tag {0:?}")]
    UnknownTag(String),
    #[error("action tag {0:?} requires a value")]
    MissingValue(String),
    #[error("invalid value {value:?} for action tag {tag:?}")]
    BadValue { tag: String, value: String },
}
