mod app;
mod help;
mod keyboard;
mod theme;
mod transcript;
use crate::app::App;
use anyhow::Context;
use chat_datepicker::{
    ConfigError, DatePicker, DisplayMode, Locale, NavLabels, PickerConfig, Prompts, ReturnAs,
    DEFAULT_DATE_FORMAT,
};
use lexopt::{Arg, Parser, ValueExt};
use ratatui::DefaultTerminal;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use time::{format_description::FormatItem, macros::format_description, Date, OffsetDateTime};
use tracing_subscriber::EnvFilter;

static YMD_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run(Options),
    Help,
    Version,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct Options {
    mode: DisplayMode,
    start: Option<Date>,
    end: Option<Date>,
    prefix: Option<String>,
    string: bool,
    format: Option<String>,
    russian: bool,
    log_file: Option<PathBuf>,
}

impl Options {
    fn picker(&self, today: Date) -> Result<DatePicker, ConfigError> {
        let start = self.start.unwrap_or(today);
        let mut config = match self.end {
            Some(end) => PickerConfig::new(start, end),
            None => PickerConfig::from_today(start),
        };
        config = config.mode(self.mode).nav_labels(NavLabels {
            prev: String::from("<"),
            next: String::from(">"),
            blank: String::from(" "),
        });
        if let Some(prefix) = &self.prefix {
            config = config.prefix(prefix.as_str());
        }
        if let Some(format) = &self.format {
            config = config.return_as(ReturnAs::Text(format.clone()));
        } else if self.string {
            config = config.return_as(ReturnAs::Text(String::from(DEFAULT_DATE_FORMAT)));
        }
        if self.russian {
            config = config
                .locale(Locale::russian())
                .prompts(Prompts::russian())
                .button_today("Сегодня");
        }
        Ok(DatePicker::new(config)?.with_today(today))
    }
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut opts = Options::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('m') | Arg::Long("mode") => {
                    opts.mode = parser.value()?.parse_with(|s| match s {
                        "inline" => Ok(DisplayMode::Inline),
                        "step" => Ok(DisplayMode::Step),
                        _ => Err(format!("expected \"inline\" or \"step\", got {s:?}")),
                    })?;
                }
                Arg::Long("start") => {
                    opts.start = Some(parser.value()?.parse_with(|s| Date::parse(s, &YMD_FMT))?);
                }
                Arg::Long("end") => {
                    opts.end = Some(parser.value()?.parse_with(|s| Date::parse(s, &YMD_FMT))?);
                }
                Arg::Long("prefix") => opts.prefix = Some(parser.value()?.string()?),
                Arg::Long("string") => opts.string = true,
                Arg::Long("format") => opts.format = Some(parser.value()?.string()?),
                Arg::Long("russian") => opts.russian = true,
                Arg::Long("log-file") => opts.log_file = Some(PathBuf::from(parser.value()?)),
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run(opts))
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run(opts) => {
                if let Some(path) = &opts.log_file {
                    init_logging(path)?;
                }
                let today = OffsetDateTime::now_local()
                    .unwrap_or_else(|_| OffsetDateTime::now_utc())
                    .date();
                let picker = opts.picker(today).context("invalid date picker options")?;
                let mut app = App::new(picker)?;
                with_terminal(|mut terminal| {
                    terminal.hide_cursor().context("failed to hide cursor")?;
                    app.run(terminal)
                })?;
                if let Some(date) = app.selected_date()? {
                    println!("{date}");
                }
                Ok(())
            }
            Command::Help => {
                println!("Usage: chat-datepicker [<options>]");
                println!();
                println!("Try out a chat-bot date picker keyboard in the terminal");
                println!();
                println!("Options:");
                println!("  -m, --mode inline|step   Navigate by month (default) or pick year, month, then day");
                println!("      --start YYYY-MM-DD   Earliest selectable date [default: today]");
                println!("      --end YYYY-MM-DD     Latest selectable date [default: start + 365 days]");
                println!("      --prefix PREFIX      Namespace for button callback data [default: dp]");
                println!("      --string             Return the date as YYYY-MM-DD text");
                println!("      --format FORMAT      Return the date as text in this format");
                println!("      --russian            Use Russian month names and prompts");
                println!("      --log-file PATH      Write debug logs to PATH");
                println!("  -h, --help               Display this help message and exit");
                println!("  -V, --version            Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = func(terminal);
    ratatui::restore();
    r
}

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("chat_datepicker=debug"));
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_env_filter(filter)
        .init();
    Ok(())
}
