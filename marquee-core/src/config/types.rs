//! Configuration type definitions
//!
//! These types represent the board configuration. They are built from the
//! embedded TOML file at boot (see [`super::parse`]) and are read-only
//! afterwards, except for the intervals the scheduler copies out.

use heapless::{String, Vec};

use crate::modes::{ModeKind, SessionMode};
use crate::traits::Geometry;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum length of a mode parameter in the auto sequence or daily schedule
pub const MAX_PARAM_LEN: usize = 24;

/// Maximum entries in the auto sequence
pub const MAX_AUTO_ENTRIES: usize = 16;

/// Maximum entries in the daily schedule
pub const MAX_SCHEDULE_ENTRIES: usize = 16;

/// Minutes in a day
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Errors raised while building configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Invalid section header
    InvalidSection,
    /// Invalid value type
    InvalidValue,
    /// Mode name that no mode answers to
    UnknownMode,
    /// Too many items (exceeded heapless capacity)
    TooManyItems,
    /// Time of day not in HH:MM form
    InvalidTime,
    /// Auto sequence or daily schedule points at a composite mode
    CompositeTarget(ModeKind),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::InvalidSection => f.write_str("invalid section header"),
            ConfigError::InvalidValue => f.write_str("invalid value"),
            ConfigError::UnknownMode => f.write_str("unknown mode"),
            ConfigError::TooManyItems => f.write_str("too many items"),
            ConfigError::InvalidTime => f.write_str("time must be HH:MM"),
            ConfigError::CompositeTarget(kind) => {
                write!(f, "{} mode cannot be scheduled by another mode", kind)
            }
        }
    }
}

/// Display hardware configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayConfig {
    /// Characters per row
    pub cols: u8,
    /// Rows on the panel
    pub rows: u8,
    /// 7-bit I2C address of the PCF8574 backpack
    pub i2c_address: u8,
}

impl DisplayConfig {
    pub fn geometry(&self) -> Geometry {
        Geometry {
            cols: self.cols,
            rows: self.rows,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            cols: 20,
            rows: 4,
            i2c_address: 0x27,
        }
    }
}

/// A mode plus the raw parameter text it should be prepared with
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ModeEntry {
    pub mode: ModeKind,
    pub params: Option<String<MAX_PARAM_LEN>>,
}

impl ModeEntry {
    pub fn new(mode: ModeKind) -> Self {
        Self { mode, params: None }
    }

    /// Entry with a parameter; text longer than [`MAX_PARAM_LEN`] is rejected
    pub fn with_params(mode: ModeKind, params: &str) -> Result<Self, ConfigError> {
        let params = String::try_from(params).map_err(|_| ConfigError::InvalidValue)?;
        Ok(Self {
            mode,
            params: Some(params),
        })
    }

    pub fn params(&self) -> Option<&str> {
        self.params.as_deref()
    }
}

/// One slot of the daily schedule
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScheduleEntry {
    /// Local time the slot starts, in minutes since midnight
    pub minute_of_day: u16,
    pub entry: ModeEntry,
}

impl ScheduleEntry {
    /// Parse an "HH:MM" time into minutes since midnight
    pub fn parse_time(value: &str) -> Result<u16, ConfigError> {
        let (hours, minutes) = value.split_once(':').ok_or(ConfigError::InvalidTime)?;
        let hours: u16 = hours.trim().parse().map_err(|_| ConfigError::InvalidTime)?;
        let minutes: u16 = minutes.trim().parse().map_err(|_| ConfigError::InvalidTime)?;
        if hours > 23 || minutes > 59 {
            return Err(ConfigError::InvalidTime);
        }
        Ok(hours * 60 + minutes)
    }
}

/// Auto-cycle configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AutoConfig {
    /// Seconds each entry stays on screen
    pub interval_s: u32,
    pub sequence: Vec<ModeEntry, MAX_AUTO_ENTRIES>,
}

impl Default for AutoConfig {
    fn default() -> Self {
        let mut sequence = Vec::new();
        for (mode, params) in [
            (ModeKind::Time, None),
            (ModeKind::Weather, None),
            (ModeKind::Weather, Some("tomorrow")),
            (ModeKind::Ascii, None),
            (ModeKind::Quotes, None),
            (ModeKind::Temperature, None),
        ] {
            let entry = match params {
                Some(p) => ModeEntry {
                    mode,
                    params: String::try_from(p).ok(),
                },
                None => ModeEntry::new(mode),
            };
            let _ = sequence.push(entry);
        }
        Self {
            interval_s: 30,
            sequence,
        }
    }
}

/// Default daily schedule
pub fn default_schedule() -> Vec<ScheduleEntry, MAX_SCHEDULE_ENTRIES> {
    let mut schedule = Vec::new();
    for (minute_of_day, mode, params) in [
        (8 * 60, ModeKind::Greetings, None),
        (12 * 60, ModeKind::Weather, None),
        (18 * 60, ModeKind::Quotes, None),
        (21 * 60, ModeKind::Weather, Some("tomorrow")),
        (22 * 60, ModeKind::Time, None),
    ] {
        let entry = ModeEntry {
            mode,
            params: params.and_then(|p| String::try_from(p).ok()),
        };
        let _ = schedule.push(ScheduleEntry {
            minute_of_day,
            entry,
        });
    }
    schedule
}

/// Weather location
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LocationConfig {
    pub latitude: f32,
    pub longitude: f32,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            latitude: 38.7223,
            longitude: -9.1393,
        }
    }
}

/// Per-mode auto-refresh intervals in seconds
///
/// A mode without an interval is rendered only when switched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RefreshIntervals {
    seconds: [Option<u32>; ModeKind::COUNT],
}

impl RefreshIntervals {
    /// No mode refreshes
    pub const fn none() -> Self {
        Self {
            seconds: [None; ModeKind::COUNT],
        }
    }

    pub fn get(&self, kind: ModeKind) -> Option<u32> {
        self.seconds[kind.index()]
    }

    pub fn set(&mut self, kind: ModeKind, seconds: u32) {
        self.seconds[kind.index()] = Some(seconds);
    }

    pub fn clear(&mut self, kind: ModeKind) {
        self.seconds[kind.index()] = None;
    }
}

impl Default for RefreshIntervals {
    fn default() -> Self {
        let mut intervals = Self::none();
        for kind in [
            ModeKind::Weather,
            ModeKind::Ascii,
            ModeKind::Greetings,
            ModeKind::Quotes,
            ModeKind::Temperature,
            ModeKind::Sentences,
        ] {
            intervals.set(kind, 15 * 60);
        }
        intervals.set(ModeKind::Daily, 60);
        intervals.set(ModeKind::Auto, 1);
        intervals.set(ModeKind::Timer, 1);
        intervals.set(ModeKind::Countdown, 1);
        intervals.set(ModeKind::Time, 1);
        intervals
    }
}

/// Complete board configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    pub display: DisplayConfig,
    /// Mode entered at boot
    pub default_mode: SessionMode,
    /// Seconds between transport polls
    pub poll_interval_s: u32,
    /// Chat that receives log lines
    pub log_chat_id: i64,
    /// Local time offset from UTC
    pub utc_offset_minutes: i32,
    /// Arm the hardware watchdog
    pub watchdog: bool,
    pub location: LocationConfig,
    pub refresh: RefreshIntervals,
    pub auto: AutoConfig,
    pub daily: Vec<ScheduleEntry, MAX_SCHEDULE_ENTRIES>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            display: DisplayConfig::default(),
            default_mode: SessionMode::Mode(ModeKind::Auto),
            poll_interval_s: 5,
            log_chat_id: 0,
            utc_offset_minutes: 0,
            watchdog: false,
            location: LocationConfig::default(),
            refresh: RefreshIntervals::default(),
            auto: AutoConfig::default(),
            daily: default_schedule(),
        }
    }
}
