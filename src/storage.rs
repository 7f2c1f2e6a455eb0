// Manages local calendar directories (one `.ics` file per item).
use crate::color;
use crate::config::Config;
use crate::error::{AlmanacError, Result};
use crate::model::adapter::events_from_ics;
use crate::model::Event;
use chrono::{NaiveDate, NaiveDateTime};
use crossterm::style::Color;
use fs2::FileExt;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const ICS_EXTENSION: &str = "ics";

/// Read access to events plus the single write operation `new` needs.
pub trait EventSource {
    /// All-day events overlapping `date`, in source order.
    fn allday_events_on(&self, date: NaiveDate) -> Vec<Event>;

    /// Timed events overlapping the closed interval `[start, end]`, in source order.
    fn timed_events_between(&self, start: NaiveDateTime, end: NaiveDateTime) -> Vec<Event>;

    fn default_calendar_name(&self) -> Option<&str>;

    fn calendar_path(&self, name: &str) -> Option<PathBuf>;

    /// Stores a new event and returns the file it was written to.
    fn insert(&mut self, event: Event) -> Result<PathBuf>;
}

/// In-memory event source. Used when an explicit list of events replaces the
/// calendar query, and in tests.
#[derive(Debug, Clone, Default)]
pub struct EventList {
    pub events: Vec<Event>,
}

impl EventList {
    pub fn new(events: Vec<Event>) -> Self {
        Self { events }
    }
}

impl EventSource for EventList {
    fn allday_events_on(&self, date: NaiveDate) -> Vec<Event> {
        self.events
            .iter()
            .filter(|e| e.is_all_day() && e.occurs_on(date))
            .cloned()
            .collect()
    }

    fn timed_events_between(&self, start: NaiveDateTime, end: NaiveDateTime) -> Vec<Event> {
        self.events
            .iter()
            .filter(|e| !e.is_all_day() && e.overlaps(start, end))
            .cloned()
            .collect()
    }

    fn default_calendar_name(&self) -> Option<&str> {
        None
    }

    fn calendar_path(&self, _name: &str) -> Option<PathBuf> {
        None
    }

    fn insert(&mut self, event: Event) -> Result<PathBuf> {
        let path = PathBuf::from(&event.href);
        self.events.push(event);
        Ok(path)
    }
}

#[derive(Debug, Clone)]
pub struct LocalCalendar {
    pub name: String,
    pub path: PathBuf,
    pub color: Option<Color>,
    pub read_only: bool,
    pub events: Vec<Event>,
}

impl LocalCalendar {
    /// Reads every `.ics` file of the directory. Broken files are skipped.
    pub fn load(name: &str, path: &Path, color: Option<Color>, read_only: bool) -> Result<Self> {
        let mut calendar = Self {
            name: name.to_string(),
            path: path.to_path_buf(),
            color,
            read_only,
            events: Vec::new(),
        };
        if !path.exists() {
            log::warn!(
                "Calendar '{}': directory '{}' does not exist",
                name,
                path.display()
            );
            return Ok(calendar);
        }

        let mut files: Vec<PathBuf> = fs::read_dir(path)
            .map_err(|e| {
                AlmanacError::Storage(anyhow::anyhow!(
                    "Failed to read calendar directory '{}': {}",
                    path.display(),
                    e
                ))
            })?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == ICS_EXTENSION))
            .collect();
        files.sort();

        for file in files {
            let href = file
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            let raw = match fs::read(&file) {
                Ok(bytes) => String::from_utf8_lossy(&bytes).to_string(),
                Err(e) => {
                    log::warn!("Skipping '{}': {}", file.display(), e);
                    continue;
                }
            };
            match events_from_ics(&raw, name, &href, color) {
                Ok(events) if events.is_empty() => {
                    log::debug!("No VEVENT in '{}'", file.display());
                }
                Ok(events) => calendar.events.extend(events),
                Err(e) => log::warn!("Skipping '{}': {}", file.display(), e),
            }
        }
        log::debug!(
            "Calendar '{}': loaded {} event(s) from '{}'",
            name,
            calendar.events.len(),
            path.display()
        );
        Ok(calendar)
    }
}

/// The configured calendars, loaded eagerly.
#[derive(Debug, Clone, Default)]
pub struct CalendarCollection {
    pub calendars: BTreeMap<String, LocalCalendar>,
    default_calendar: Option<String>,
}

impl CalendarCollection {
    /// Loads the calendars of `config`. `include` restricts the set (empty = all),
    /// `exclude` removes names from it. Unknown names are rejected.
    pub fn from_config(config: &Config, include: &[String], exclude: &[String]) -> Result<Self> {
        for name in include.iter().chain(exclude) {
            if !config.calendars.contains_key(name) {
                return Err(AlmanacError::UnknownCalendar(name.clone()));
            }
        }

        let mut calendars = BTreeMap::new();
        for (name, cal_cfg) in &config.calendars {
            if (!include.is_empty() && !include.contains(name)) || exclude.contains(name) {
                continue;
            }
            let color = color::resolve(cal_cfg.color.as_deref());
            let cal = LocalCalendar::load(name, &cal_cfg.path, color, cal_cfg.read_only)?;
            calendars.insert(name.clone(), cal);
        }

        let default_calendar = config
            .default_calendar_name()
            .filter(|name| calendars.contains_key(*name))
            .or_else(|| calendars.keys().next().map(String::as_str))
            .map(str::to_string);

        Ok(Self {
            calendars,
            default_calendar,
        })
    }

    fn all_events(&self) -> impl Iterator<Item = &Event> {
        self.calendars.values().flat_map(|c| c.events.iter())
    }

    /// Helper to get a sidecar lock file path
    fn get_lock_path(file_path: &Path) -> PathBuf {
        let mut lock_path = file_path.to_path_buf();
        if let Some(ext) = lock_path.extension() {
            let mut new_ext = ext.to_os_string();
            new_ext.push(".lock");
            lock_path.set_extension(new_ext);
        } else {
            lock_path.set_extension("lock");
        }
        lock_path
    }

    pub fn with_lock<F, T>(file_path: &Path, f: F) -> anyhow::Result<T>
    where
        F: FnOnce() -> anyhow::Result<T>,
    {
        let lock_path = Self::get_lock_path(file_path);
        let file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        file.lock_exclusive()?;
        let result = f();
        file.unlock()?;
        result
    }

    /// Atomic write: Write to .tmp file then rename
    pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> anyhow::Result<()> {
        let path = path.as_ref();
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, contents)?;
        fs::rename(tmp_path, path)?;
        Ok(())
    }
}

impl EventSource for CalendarCollection {
    fn allday_events_on(&self, date: NaiveDate) -> Vec<Event> {
        self.all_events()
            .filter(|e| e.is_all_day() && e.occurs_on(date))
            .cloned()
            .collect()
    }

    fn timed_events_between(&self, start: NaiveDateTime, end: NaiveDateTime) -> Vec<Event> {
        self.all_events()
            .filter(|e| !e.is_all_day() && e.overlaps(start, end))
            .cloned()
            .collect()
    }

    fn default_calendar_name(&self) -> Option<&str> {
        self.default_calendar.as_deref()
    }

    fn calendar_path(&self, name: &str) -> Option<PathBuf> {
        self.calendars.get(name).map(|c| c.path.clone())
    }

    fn insert(&mut self, mut event: Event) -> Result<PathBuf> {
        let calendar = self
            .calendars
            .get_mut(&event.calendar)
            .ok_or_else(|| AlmanacError::UnknownCalendar(event.calendar.clone()))?;
        if calendar.read_only {
            return Err(AlmanacError::ReadOnlyCalendar(calendar.name.clone()));
        }

        fs::create_dir_all(&calendar.path)?;
        let path = calendar.path.join(&event.href);
        let ics = event.to_ics();
        // One sidecar per calendar directory (`<dir>.lock`), kept outside the vdir.
        Self::with_lock(&calendar.path, || {
            if path.exists() {
                anyhow::bail!("'{}' already exists", path.display());
            }
            Self::atomic_write(&path, &ics)
        })
        .map_err(|e| {
            AlmanacError::Storage(e.context(format!("Failed to write '{}'", path.display())))
        })?;
        log::info!("Stored event '{}' at '{}'", event.summary, path.display());

        if event.color.is_none() {
            event.color = calendar.color;
        }
        calendar.events.push(event);
        Ok(path)
    }
}
