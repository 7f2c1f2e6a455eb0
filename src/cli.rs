// File: ./src/cli.rs
//! Command-line surface: argument definitions and dispatch to the renderers.
use crate::config::{Config, RenderOptions, TextEncoding};
use crate::context::StandardContext;
use crate::controller::{Controller, NewEventArgs};
use crate::error::{AlmanacError, Result};
use crate::storage::CalendarCollection;
use clap::{ArgAction, Args, CommandFactory, Parser, Subcommand};
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "almanac",
    version,
    about = "Agendas and month views from local iCalendar collections"
)]
pub struct Cli {
    /// Configuration file to use instead of the platform default.
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Always emit ANSI colours.
    #[arg(long, global = true, overrides_with = "no_color")]
    pub color: bool,

    /// Never emit ANSI colours.
    #[arg(long = "no-color", global = true, overrides_with = "color")]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Month grid next to the agenda.
    Calendar(ViewArgs),
    /// The agenda only.
    Agenda(ViewArgs),
    /// Create an event from free text, e.g. `25.10. 18:00 20:00 Dinner :: at home`.
    New(NewArgs),
    /// Full-screen month and agenda browser.
    Interactive(CalendarSelection),
    /// Show the configured date and time formats applied to a sample timestamp.
    Printformats,
}

#[derive(Args, Debug, Clone, Default)]
pub struct CalendarSelection {
    /// Only use this calendar (repeatable).
    #[arg(short = 'a', long = "include-calendar", value_name = "CAL")]
    pub include: Vec<String>,

    /// Skip this calendar (repeatable).
    #[arg(short = 'd', long = "exclude-calendar", value_name = "CAL")]
    pub exclude: Vec<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ViewArgs {
    #[command(flatten)]
    pub calendars: CalendarSelection,

    /// Number of days shown per start date.
    #[arg(long)]
    pub days: Option<u32>,

    /// Start dates (default: today).
    pub dates: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct NewArgs {
    /// Calendar to store the event in (default: the configured default calendar).
    #[arg(short = 'a', long = "calendar", value_name = "CAL")]
    pub calendar: Option<String>,

    #[arg(short, long)]
    pub location: Option<String>,

    /// daily, weekly, monthly or yearly.
    #[arg(short, long)]
    pub repeat: Option<String>,

    /// Last date of the recurrence.
    #[arg(short, long)]
    pub until: Option<String>,

    #[arg(required = true, num_args = 1.., value_name = "DESCRIPTION")]
    pub description: Vec<String>,
}

impl Cli {
    /// Colour decision: explicit flags win, otherwise only when stdout is a terminal.
    pub fn use_color(&self) -> bool {
        if self.no_color {
            false
        } else if self.color {
            true
        } else {
            io::stdout().is_terminal()
        }
    }

    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

/// Maps the configured `default_command` onto a subcommand.
pub fn default_command(name: &str) -> Result<Command> {
    match name.trim() {
        "" => Err(AlmanacError::Usage(
            Cli::command().render_usage().to_string(),
        )),
        "calendar" => Ok(Command::Calendar(ViewArgs::default())),
        "agenda" => Ok(Command::Agenda(ViewArgs::default())),
        "interactive" => Ok(Command::Interactive(CalendarSelection::default())),
        "printformats" => Ok(Command::Printformats),
        other => Err(AlmanacError::InvalidArgument(format!(
            "unknown default_command '{}'",
            other
        ))),
    }
}

fn encode_output(encoding: TextEncoding, text: &str) -> Vec<u8> {
    let mut bytes = encoding.encode(text);
    bytes.push(b'\n');
    bytes
}

fn write_output(encoding: TextEncoding, text: &str) -> Result<()> {
    let bytes = encode_output(encoding, text);
    let mut stdout = io::stdout().lock();
    stdout.write_all(&bytes)?;
    stdout.flush()?;
    Ok(())
}

fn render_options(config: &Config, args: &ViewArgs, color: bool) -> RenderOptions {
    let mut options = RenderOptions::from_config(config, chrono::Local::now().date_naive());
    options.dates = args.dates.clone();
    if args.days.is_some() {
        options.days = args.days;
    }
    options.color = color;
    options
}

pub fn run(cli: Cli) -> Result<()> {
    let ctx = StandardContext::new(cli.config.clone());
    let config = Config::load(&ctx)?;
    let color = cli.use_color();

    let command = match cli.command.clone() {
        Some(command) => command,
        None => default_command(&config.default.default_command)?,
    };
    log::debug!("Running {:?}", command);

    let controller = Controller::new(&config);
    match command {
        Command::Calendar(args) => {
            let source = CalendarCollection::from_config(
                &config,
                &args.calendars.include,
                &args.calendars.exclude,
            )?;
            let options = render_options(&config, &args, color);
            let text = controller.month_with_agenda(&source, &options)?;
            write_output(options.encoding, &text)
        }
        Command::Agenda(args) => {
            let source = CalendarCollection::from_config(
                &config,
                &args.calendars.include,
                &args.calendars.exclude,
            )?;
            let options = render_options(&config, &args, color);
            let text = controller.agenda_only(&source, &options)?;
            write_output(options.encoding, &text)
        }
        Command::New(args) => {
            let mut source = CalendarCollection::from_config(&config, &[], &[])?;
            let extras = NewEventArgs {
                calendar: args.calendar,
                location: args.location,
                repeat: args.repeat,
                until: args.until,
            };
            let today = chrono::Local::now().date_naive();
            match controller.new_from_string(&mut source, &args.description, &extras, today)? {
                Some(text) => write_output(config.locale.encoding, &text),
                None => Ok(()),
            }
        }
        Command::Interactive(selection) => interactive(&config, &selection),
        Command::Printformats => {
            write_output(config.locale.encoding, &controller.print_formats())
        }
    }
}

#[cfg(feature = "tui")]
fn interactive(config: &Config, selection: &CalendarSelection) -> Result<()> {
    let source = CalendarCollection::from_config(config, &selection.include, &selection.exclude)?;
    crate::tui::run(config, &source)
}

#[cfg(not(feature = "tui"))]
fn interactive(_config: &Config, _selection: &CalendarSelection) -> Result<()> {
    Err(AlmanacError::InvalidArgument(
        "this build has no interactive mode (enable the `tui` feature)".to_string(),
    ))
}
