// File: ./src/config.rs
// Handles configuration loading and defaults.
use crate::context::{AppContext, expand_home};
use crate::error::{AlmanacError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use strum::{Display, EnumString};

fn default_timeformat() -> String {
    "%H:%M".to_string()
}
fn default_dateformat() -> String {
    "%d.%m.".to_string()
}
fn default_longdateformat() -> String {
    "%d.%m.%Y".to_string()
}
fn default_datetimeformat() -> String {
    "%d.%m. %H:%M".to_string()
}
fn default_longdatetimeformat() -> String {
    "%d.%m.%Y %H:%M".to_string()
}
fn default_event_duration() -> u32 {
    60
}
fn default_dayevent_duration() -> u32 {
    1
}
fn default_command() -> String {
    "calendar".to_string()
}
fn default_days() -> u32 {
    2
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekNumbers {
    #[default]
    Off,
    Left,
    Right,
}

/// What `new` prints after an event was stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrintNew {
    #[default]
    None,
    Event,
    Path,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
#[strum(ascii_case_insensitive)]
pub enum TextEncoding {
    #[default]
    #[strum(serialize = "utf-8", serialize = "utf8")]
    Utf8,
    #[strum(serialize = "ascii", serialize = "us-ascii")]
    Ascii,
    #[strum(serialize = "latin-1", serialize = "latin1", serialize = "iso-8859-1")]
    Latin1,
}

impl TryFrom<String> for TextEncoding {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        TextEncoding::from_str(value.trim()).map_err(|_| format!("unknown encoding '{}'", value))
    }
}

impl From<TextEncoding> for String {
    fn from(value: TextEncoding) -> Self {
        value.to_string()
    }
}

impl TextEncoding {
    /// Encodes text for output. Characters the encoding cannot represent become `?`.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        match self {
            TextEncoding::Utf8 => text.as_bytes().to_vec(),
            TextEncoding::Ascii => text
                .chars()
                .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
                .collect(),
            TextEncoding::Latin1 => text
                .chars()
                .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
                .collect(),
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct CalendarConfig {
    pub path: PathBuf,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub read_only: bool,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct Locale {
    #[serde(default = "default_timeformat")]
    pub timeformat: String,
    #[serde(default = "default_dateformat")]
    pub dateformat: String,
    #[serde(default = "default_longdateformat")]
    pub longdateformat: String,
    #[serde(default = "default_datetimeformat")]
    pub datetimeformat: String,
    #[serde(default = "default_longdatetimeformat")]
    pub longdatetimeformat: String,
    /// 0 = Monday ... 6 = Sunday
    #[serde(default)]
    pub firstweekday: u8,
    #[serde(default)]
    pub weeknumbers: WeekNumbers,
    #[serde(default)]
    pub encoding: TextEncoding,
    /// Minutes
    #[serde(default = "default_event_duration")]
    pub default_event_duration: u32,
    /// Days
    #[serde(default = "default_dayevent_duration")]
    pub default_dayevent_duration: u32,
}

impl Default for Locale {
    fn default() -> Self {
        Self {
            timeformat: default_timeformat(),
            dateformat: default_dateformat(),
            longdateformat: default_longdateformat(),
            datetimeformat: default_datetimeformat(),
            longdatetimeformat: default_longdatetimeformat(),
            firstweekday: 0,
            weeknumbers: WeekNumbers::Off,
            encoding: TextEncoding::Utf8,
            default_event_duration: default_event_duration(),
            default_dayevent_duration: default_dayevent_duration(),
        }
    }
}

impl Locale {
    /// The strftime formats by config key.
    pub fn formats(&self) -> [(&'static str, &str); 5] {
        [
            ("longdatetimeformat", &self.longdatetimeformat),
            ("datetimeformat", &self.datetimeformat),
            ("longdateformat", &self.longdateformat),
            ("dateformat", &self.dateformat),
            ("timeformat", &self.timeformat),
        ]
    }

    /// Rejects formats chrono cannot render. Formatting with them later would panic.
    pub fn validate(&self) -> Result<()> {
        for (key, fmt) in self.formats() {
            if StrftimeItems::new(fmt).any(|item| matches!(item, Item::Error)) {
                return Err(AlmanacError::Config(anyhow::anyhow!(
                    "invalid {} '{}' in [locale]",
                    key,
                    fmt
                )));
            }
        }
        Ok(())
    }

    pub fn first_weekday(&self) -> Weekday {
        match self.firstweekday % 7 {
            0 => Weekday::Mon,
            1 => Weekday::Tue,
            2 => Weekday::Wed,
            3 => Weekday::Thu,
            4 => Weekday::Fri,
            5 => Weekday::Sat,
            _ => Weekday::Sun,
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct DefaultSection {
    #[serde(default = "default_command")]
    pub default_command: String,
    #[serde(default)]
    pub default_calendar: Option<String>,
    #[serde(default)]
    pub show_all_days: bool,
    #[serde(default = "default_days")]
    pub days: u32,
    #[serde(default)]
    pub print_new: PrintNew,
}

impl Default for DefaultSection {
    fn default() -> Self {
        Self {
            default_command: default_command(),
            default_calendar: None,
            show_all_days: false,
            days: default_days(),
            print_new: PrintNew::None,
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct Config {
    #[serde(default)]
    pub calendars: BTreeMap<String, CalendarConfig>,
    #[serde(default)]
    pub locale: Locale,
    #[serde(default)]
    pub default: DefaultSection,
}

impl Config {
    /// Load the configuration from disk using an explicit context.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path().map_err(AlmanacError::Config)?;

        if !path.exists() {
            return Err(AlmanacError::Config(anyhow::anyhow!(
                "Config file not found: '{}'",
                path.display()
            )));
        }

        let contents = fs::read_to_string(&path).map_err(|e| {
            AlmanacError::Config(anyhow::anyhow!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let mut config = Self::from_toml(&contents).map_err(|e| match e {
            AlmanacError::Config(inner) => AlmanacError::Config(
                inner.context(format!("Failed to parse config file '{}'", path.display())),
            ),
            other => other,
        })?;
        for cal in config.calendars.values_mut() {
            cal.path = expand_home(&cal.path);
        }
        log::debug!(
            "Loaded config '{}' with {} calendar(s)",
            path.display(),
            config.calendars.len()
        );
        Ok(config)
    }

    /// Parses and validates configuration text.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).map_err(|e| AlmanacError::Config(anyhow::Error::new(e)))?;
        if config.calendars.is_empty() {
            return Err(AlmanacError::NoCalendars);
        }
        config.locale.validate()?;
        if let Some(name) = &config.default.default_calendar
            && !config.calendars.contains_key(name)
        {
            return Err(AlmanacError::Config(anyhow::anyhow!(
                "default_calendar '{}' is not a configured calendar",
                name
            )));
        }
        Ok(config)
    }

    /// The calendar new events go to when none is named explicitly.
    pub fn default_calendar_name(&self) -> Option<&str> {
        self.default
            .default_calendar
            .as_deref()
            .or_else(|| self.calendars.keys().next().map(String::as_str))
    }
}

/// The enumerated per-invocation render request.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub dates: Vec<String>,
    pub days: Option<u32>,
    /// Overrides the detected terminal width when set.
    pub width: Option<usize>,
    pub show_all_days: bool,
    pub first_weekday: Weekday,
    pub week_numbers: WeekNumbers,
    pub encoding: TextEncoding,
    pub color: bool,
    /// Reference "today"; injected so rendering stays deterministic under test.
    pub today: NaiveDate,
}

impl RenderOptions {
    pub fn from_config(config: &Config, today: NaiveDate) -> Self {
        Self {
            dates: Vec::new(),
            days: Some(config.default.days),
            width: None,
            show_all_days: config.default.show_all_days,
            first_weekday: config.locale.first_weekday(),
            week_numbers: config.locale.weeknumbers,
            encoding: config.locale.encoding,
            color: false,
            today,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TestContext;

    const MINIMAL: &str = r#"
[calendars.one]
path = "/tmp/one"
"#;

    #[test]
    fn minimal_config_uses_defaults() {
        let cfg = Config::from_toml(MINIMAL).unwrap();
        assert_eq!(cfg.locale.timeformat, "%H:%M");
        assert_eq!(cfg.locale.longdateformat, "%d.%m.%Y");
        assert_eq!(cfg.default.days, 2);
        assert!(!cfg.default.show_all_days);
        assert_eq!(cfg.default.print_new, PrintNew::None);
        assert_eq!(cfg.locale.encoding, TextEncoding::Utf8);
        assert_eq!(cfg.default_calendar_name(), Some("one"));
    }

    #[test]
    fn full_config_parses() {
        let text = r##"
[calendars.home]
path = "/tmp/home"
color = "dark blue"

[calendars.work]
path = "/tmp/work"
color = "#ff0000"
read_only = true

[locale]
firstweekday = 6
weeknumbers = "right"
encoding = "Latin1"

[default]
default_command = "agenda"
default_calendar = "work"
show_all_days = true
days = 9
print_new = "path"
"##;
        let cfg = Config::from_toml(text).unwrap();
        assert_eq!(cfg.calendars.len(), 2);
        assert!(cfg.calendars["work"].read_only);
        assert_eq!(cfg.locale.first_weekday(), Weekday::Sun);
        assert_eq!(cfg.locale.weeknumbers, WeekNumbers::Right);
        assert_eq!(cfg.locale.encoding, TextEncoding::Latin1);
        assert_eq!(cfg.default_calendar_name(), Some("work"));
        assert_eq!(cfg.default.print_new, PrintNew::Path);
    }

    #[test]
    fn no_calendars_is_rejected() {
        let err = Config::from_toml("[locale]\n").unwrap_err();
        assert!(matches!(err, AlmanacError::NoCalendars));
    }

    #[test]
    fn invalid_formats_are_rejected() {
        let text = format!("{}\n[locale]\nlongdateformat = \"%d.%m.%Q\"\n", MINIMAL);
        let err = Config::from_toml(&text).unwrap_err();
        assert!(matches!(err, AlmanacError::Config(_)));
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("longdateformat"));

        let text = format!("{}\n[locale]\ntimeformat = \"%H:%\"\n", MINIMAL);
        assert!(Config::from_toml(&text).is_err());
    }

    #[test]
    fn unknown_default_calendar_is_rejected() {
        let text = format!("{}\n[default]\ndefault_calendar = \"nope\"\n", MINIMAL);
        assert!(matches!(
            Config::from_toml(&text),
            Err(AlmanacError::Config(_))
        ));
    }

    #[test]
    fn unknown_encoding_is_rejected() {
        let text = format!("{}\n[locale]\nencoding = \"ebcdic\"\n", MINIMAL);
        assert!(Config::from_toml(&text).is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let ctx = TestContext::new();
        let err = Config::load(&ctx).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn load_reads_from_context() {
        let ctx = TestContext::new();
        let path = ctx.get_config_file_path().unwrap();
        fs::write(&path, MINIMAL).unwrap();
        let cfg = Config::load(&ctx).unwrap();
        assert!(cfg.calendars.contains_key("one"));
    }

    #[test]
    fn encodings_replace_unrepresentable_chars() {
        assert_eq!(TextEncoding::Ascii.encode("a→b"), b"a?b".to_vec());
        assert_eq!(TextEncoding::Latin1.encode("é⟳"), vec![0xe9, b'?']);
        assert_eq!(TextEncoding::Utf8.encode("é"), "é".as_bytes().to_vec());
    }
}
