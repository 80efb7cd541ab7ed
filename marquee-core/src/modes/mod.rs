//! Display modes
//!
//! A mode turns its parameters into something on the panel. Every mode goes
//! through the same three stages when it is switched to:
//!
//! 1. `prepare` turns the raw command parameter into [`ModeParams`]
//! 2. `validate` rejects parameters the mode cannot use
//! 3. `render` draws, and is called again on every refresh
//!
//! Composite modes ([`auto`], [`daily`]) do not draw themselves; their
//! render stage names another mode through [`Rendered::Delegate`] and the
//! registry runs that mode in their place.

pub mod ascii;
pub mod auto;
pub mod countdown;
pub mod daily;
pub mod phrases;
pub mod registry;
pub mod sentences;
pub mod temperature;
pub mod time;
pub mod timer;
pub mod weather;

pub use registry::Modes;

use alloc::string::String;
use chrono::NaiveDate;

use crate::config::ModeEntry;
use crate::context::Context;
use crate::traits::{DisplayError, SensorError, SourceError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Every display mode the board knows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ModeKind {
    Weather,
    Ascii,
    Countdown,
    Timer,
    Time,
    Auto,
    Greetings,
    Quotes,
    Daily,
    Temperature,
    Sentences,
}

impl ModeKind {
    pub const COUNT: usize = 11;

    pub const ALL: [ModeKind; Self::COUNT] = [
        ModeKind::Weather,
        ModeKind::Ascii,
        ModeKind::Countdown,
        ModeKind::Timer,
        ModeKind::Time,
        ModeKind::Auto,
        ModeKind::Greetings,
        ModeKind::Quotes,
        ModeKind::Daily,
        ModeKind::Temperature,
        ModeKind::Sentences,
    ];

    /// Position in [`ModeKind::ALL`], for per-mode tables
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Name used after the `/` sigil
    pub const fn command_name(self) -> &'static str {
        match self {
            ModeKind::Weather => "weather",
            ModeKind::Ascii => "ascii",
            ModeKind::Countdown => "countdown",
            ModeKind::Timer => "timer",
            ModeKind::Time => "time",
            ModeKind::Auto => "auto",
            ModeKind::Greetings => "greetings",
            ModeKind::Quotes => "quotes",
            ModeKind::Daily => "daily",
            ModeKind::Temperature => "temp",
            ModeKind::Sentences => "sentences",
        }
    }

    pub fn from_command(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.command_name() == name)
    }

    /// Whether the panel is cleared before the first render after a switch
    pub const fn needs_clear(self) -> bool {
        matches!(
            self,
            ModeKind::Countdown
                | ModeKind::Timer
                | ModeKind::Time
                | ModeKind::Auto
                | ModeKind::Sentences
        )
    }

    /// Whether the mode delegates its render stage to another mode
    pub const fn is_composite(self) -> bool {
        matches!(self, ModeKind::Auto | ModeKind::Daily)
    }
}

impl core::fmt::Display for ModeKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.command_name())
    }
}

/// What the session is currently showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SessionMode {
    /// Plain text left on the panel; never refreshed
    Message,
    Mode(ModeKind),
}

impl SessionMode {
    pub fn name(self) -> &'static str {
        match self {
            SessionMode::Message => "message",
            SessionMode::Mode(kind) => kind.command_name(),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "message" => Some(SessionMode::Message),
            other => ModeKind::from_command(other).map(SessionMode::Mode),
        }
    }

    pub fn kind(self) -> Option<ModeKind> {
        match self {
            SessionMode::Message => None,
            SessionMode::Mode(kind) => Some(kind),
        }
    }
}

impl core::fmt::Display for SessionMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Parameters a mode was prepared with
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModeParams {
    #[default]
    None,
    /// Free-form selector, e.g. `tomorrow` or an art name
    Text(String),
    /// Countdown target
    Date(NaiveDate),
    /// Timer end, Unix milliseconds
    Deadline(u64),
    /// Auto-cycle switch interval override
    Seconds(u32),
    /// Raw text `prepare` could not interpret
    Rejected(String),
}

impl ModeParams {
    /// Selector text, if the params are [`ModeParams::Text`]
    pub fn text(&self) -> Option<&str> {
        match self {
            ModeParams::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, ModeParams::None)
    }
}

impl core::fmt::Display for ModeParams {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ModeParams::None => Ok(()),
            ModeParams::Text(text) | ModeParams::Rejected(text) => f.write_str(text),
            ModeParams::Date(date) => write!(f, "{}", date),
            ModeParams::Deadline(ms) => write!(f, "until {}", ms),
            ModeParams::Seconds(seconds) => write!(f, "{}s", seconds),
        }
    }
}

/// Outcome of a render call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    /// Something was written to the panel
    Drawn,
    /// Nothing to do this time
    Idle,
    /// Composite modes only: run this mode in my place
    Delegate(ModeEntry),
}

/// Mode failures
///
/// None of these escape the registry; they end up in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModeError {
    /// Parameters rejected; carries the usage line
    InvalidParams(&'static str),
    /// Panel write failed
    Display(DisplayError),
    /// Upstream data unavailable
    Source(SourceError),
    /// Temperature read failed
    Sensor(SensorError),
    /// Composite mode delegated to another composite
    DelegationDepth,
}

impl core::fmt::Display for ModeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ModeError::InvalidParams(usage) => f.write_str(usage),
            ModeError::Display(e) => write!(f, "{}", e),
            ModeError::Source(e) => write!(f, "{}", e),
            ModeError::Sensor(e) => write!(f, "{}", e),
            ModeError::DelegationDepth => f.write_str("composite modes cannot be nested"),
        }
    }
}

impl From<DisplayError> for ModeError {
    fn from(e: DisplayError) -> Self {
        ModeError::Display(e)
    }
}

impl From<SourceError> for ModeError {
    fn from(e: SourceError) -> Self {
        ModeError::Source(e)
    }
}

impl From<SensorError> for ModeError {
    fn from(e: SensorError) -> Self {
        ModeError::Sensor(e)
    }
}

/// A display mode
pub trait Mode {
    fn kind(&self) -> ModeKind;

    /// Turn the raw command parameter into typed params
    ///
    /// Stateful modes may also reset themselves here.
    fn prepare(&mut self, raw: Option<&str>, _now_ms: u64) -> ModeParams {
        match raw {
            Some(raw) => ModeParams::Text(String::from(raw)),
            None => ModeParams::None,
        }
    }

    fn validate(&self, _params: &ModeParams) -> Result<(), ModeError> {
        Ok(())
    }

    fn render(&mut self, ctx: &mut Context<'_>, params: &ModeParams)
        -> Result<Rendered, ModeError>;
}

/// Pick an index in `0..len` from a timestamp
///
/// Spreads consecutive timestamps across the range so renders a second
/// apart do not land on neighbouring items. `len` must be non-zero.
pub(crate) fn pick_index(now_ms: u64, len: usize) -> usize {
    // splitmix64 finaliser
    let mut z = now_ms.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^= z >> 31;
    (z % len as u64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_names_round_trip() {
        for kind in ModeKind::ALL {
            assert_eq!(ModeKind::from_command(kind.command_name()), Some(kind));
        }
        assert_eq!(ModeKind::from_command("temperature"), None);
        assert_eq!(ModeKind::from_command("help"), None);
    }

    #[test]
    fn test_index_matches_table_position() {
        for (i, kind) in ModeKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn test_composites() {
        let composites: Vec<_> = ModeKind::ALL
            .iter()
            .filter(|k| k.is_composite())
            .collect();
        assert_eq!(composites, vec![&ModeKind::Auto, &ModeKind::Daily]);
    }

    #[test]
    fn test_session_mode_names() {
        assert_eq!(SessionMode::from_name("message"), Some(SessionMode::Message));
        assert_eq!(
            SessionMode::from_name("temp"),
            Some(SessionMode::Mode(ModeKind::Temperature))
        );
        assert_eq!(SessionMode::Mode(ModeKind::Daily).to_string(), "daily");
    }

    #[test]
    fn test_pick_index_in_range() {
        for now in (0..10_000u64).step_by(997) {
            assert!(pick_index(now, 7) < 7);
        }
        assert_eq!(pick_index(42, 1), 0);
    }
}
