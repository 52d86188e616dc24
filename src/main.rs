mod app;
mod calendar;
mod help;
mod jumpto;
mod theme;
use crate::app::App;
use crate::calendar::{CompactCalendar, Configuration, ExtensionPolicy, WeekStart};
use crate::jumpto::YMD_FMT;
use anyhow::Context;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use flexi_logger::{FileSpec, Logger, LoggerHandle};
use lexopt::{Arg, Parser, ValueExt};
use log::warn;
use ratatui::DefaultTerminal;
use std::io;
use std::path::{Path, PathBuf};
use time::{
    format_description::FormatItem, macros::format_description, Date, OffsetDateTime, UtcOffset,
};

static OFFSET_FMT: &[FormatItem<'_>] =
    format_description!("[offset_hour sign:mandatory]:[offset_minute]");

const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run(Options),
    Help,
    Version,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct Options {
    selected: Option<Date>,
    today: Option<Date>,
    monday: bool,
    labels: Option<Vec<String>>,
    utc_offset: Option<UtcOffset>,
    lookahead: Option<usize>,
    log_file: Option<PathBuf>,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut opts = Options::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('t') | Arg::Long("today") => {
                    opts.today = Some(parser.value()?.parse_with(|s| Date::parse(s, &YMD_FMT))?);
                }
                Arg::Short('m') | Arg::Long("monday") => opts.monday = true,
                Arg::Short('l') | Arg::Long("labels") => {
                    let labels = parser.value()?.string()?;
                    opts.labels = Some(labels.split(',').map(String::from).collect());
                }
                Arg::Short('o') | Arg::Long("utc-offset") => {
                    opts.utc_offset = Some(
                        parser
                            .value()?
                            .parse_with(|s| UtcOffset::parse(s, &OFFSET_FMT))?,
                    );
                }
                Arg::Long("lookahead") => opts.lookahead = Some(parser.value()?.parse()?),
                Arg::Long("log-file") => opts.log_file = Some(PathBuf::from(parser.value()?)),
                Arg::Value(value) if opts.selected.is_none() => {
                    opts.selected = Some(value.parse_with(|s| Date::parse(s, &YMD_FMT))?);
                }
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run(opts))
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run(opts) => {
                let _logger = opts.log_file.as_deref().map(init_logging).transpose()?;
                let now = OffsetDateTime::now_local().context("failed to determine local time")?;
                let config = opts.configuration(now);
                let calendar = CompactCalendar::new(Vec::new(), &config)
                    .context("invalid calendar configuration")?;
                with_terminal(|mut terminal| {
                    terminal.hide_cursor().context("failed to hide cursor")?;
                    App::new(calendar, config).run(terminal)?;
                    Ok(())
                })
            }
            Command::Help => {
                println!("Usage: compactcal [<options>] [YYYY-MM-DD]");
                println!();
                println!("Two-week terminal calendar strip, opened with the given date selected");
                println!();
                println!("Options:");
                println!("  -t, --today <YYYY-MM-DD>");
                println!("                    Treat the given date as today");
                println!("  -m, --monday      Start weeks on Monday instead of Sunday");
                println!("  -l, --labels <S,M,T,W,T,F,S>");
                println!("                    Comma-separated weekday labels, Sunday first");
                println!("  -o, --utc-offset <+HH:MM>");
                println!("                    Reckon dates in the given UTC offset");
                println!("  --lookahead <DAYS>");
                println!("                    Load more dates when paging forwards with no");
                println!("                    more than this many days left (default: 14)");
                println!("  --log-file <PATH> Write log messages to the given file");
                println!("  -h, --help        Display this help message and exit");
                println!("  -V, --version     Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

impl Options {
    fn configuration(&self, now: OffsetDateTime) -> Configuration {
        let mut config = Configuration::new(now);
        if let Some(offset) = self.utc_offset {
            config = config.utc_offset(offset);
        }
        let offset = config.settings().utc_offset;
        if let Some(today) = self.today {
            config = config
                .today(today.midnight().assume_offset(offset))
                .selected(today.midnight().assume_offset(offset));
        }
        if let Some(selected) = self.selected {
            config = config.selected(selected.midnight().assume_offset(offset));
        }
        if self.monday {
            config = config.week_start(WeekStart::Monday);
        }
        if let Some(ref labels) = self.labels {
            config = config.weekday_labels(labels.clone());
        }
        if let Some(lookahead) = self.lookahead {
            config = config.extension_policy(ExtensionPolicy {
                lookahead,
                ..ExtensionPolicy::default()
            });
        }
        config
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

// Logging only goes to a file, as anything written to the terminal would
// garble the display.
fn init_logging(path: &Path) -> anyhow::Result<LoggerHandle> {
    Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?
        .log_to_file(FileSpec::try_from(path)?)
        .start()
        .context("failed to start logger")
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = execute!(io::stdout(), EnableMouseCapture)
        .context("failed to enable mouse capture")
        .and_then(|()| func(terminal));
    if let Err(e) = execute!(io::stdout(), DisableMouseCapture) {
        warn!("failed to disable mouse capture: {e}");
    }
    ratatui::restore();
    r
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime, offset};

    fn parse(args: &[&str]) -> Result<Command, lexopt::Error> {
        Command::from_parser(Parser::from_iter(
            std::iter::once("compactcal").chain(args.iter().copied()),
        ))
    }

    #[test]
    fn test_no_args() {
        assert_eq!(parse(&[]).unwrap(), Command::Run(Options::default()));
    }

    #[test]
    fn test_all_options() {
        let cmd = parse(&[
            "-m",
            "--today",
            "2024-06-12",
            "-l",
            "Su,Mo,Tu,We,Th,Fr,Sa",
            "-o",
            "+02:00",
            "--lookahead",
            "28",
            "--log-file",
            "cal.log",
            "2024-07-02",
        ])
        .unwrap();
        assert_eq!(
            cmd,
            Command::Run(Options {
                selected: Some(date!(2024 - 07 - 02)),
                today: Some(date!(2024 - 06 - 12)),
                monday: true,
                labels: Some(
                    ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"]
                        .map(String::from)
                        .to_vec()
                ),
                utc_offset: Some(offset!(+2)),
                lookahead: Some(28),
                log_file: Some(PathBuf::from("cal.log")),
            })
        );
    }

    #[test]
    fn test_help_and_version() {
        assert_eq!(parse(&["--help"]).unwrap(), Command::Help);
        assert_eq!(parse(&["-V", "2024-06-12"]).unwrap(), Command::Version);
    }

    #[test]
    fn test_bad_args() {
        assert!(parse(&["2024-13-01"]).is_err());
        assert!(parse(&["2024-06-12", "2024-06-13"]).is_err());
        assert!(parse(&["-o", "2"]).is_err());
        assert!(parse(&["--frobnicate"]).is_err());
        assert!(parse(&["--lookahead", "-1"]).is_err());
    }

    #[test]
    fn test_configuration() {
        let opts = Options {
            today: Some(date!(2024 - 06 - 12)),
            monday: true,
            utc_offset: Some(offset!(-5)),
            ..Options::default()
        };
        let config = opts.configuration(datetime!(2030-01-01 03:00 UTC));
        assert_eq!(config.today_date(), date!(2024 - 06 - 12));
        assert_eq!(config.selected_date(), date!(2024 - 06 - 12));
        assert_eq!(config.settings().week_start, WeekStart::Monday);
        assert_eq!(config.settings().utc_offset, offset!(-5));
        assert_eq!(config.policy(), ExtensionPolicy::default());
    }

    #[test]
    fn test_configuration_lookahead() {
        let opts = Options {
            lookahead: Some(28),
            ..Options::default()
        };
        let config = opts.configuration(datetime!(2024-06-12 09:00 UTC));
        assert_eq!(
            config.policy(),
            ExtensionPolicy {
                lookahead: 28,
                leading_edge: 0
            }
        );
    }

    #[test]
    fn test_configuration_defaults_to_now() {
        let config = Options::default().configuration(datetime!(2024-06-12 23:30 -04:00));
        assert_eq!(config.today_date(), date!(2024 - 06 - 12));
        assert_eq!(config.selected_date(), date!(2024 - 06 - 12));
    }
}
