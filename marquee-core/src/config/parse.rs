//! Simple TOML parser for board configuration
//!
//! This is a minimal TOML parser that handles only the subset needed for
//! Marquee configuration. It does NOT support the full TOML spec.
//!
//! Supported features:
//! - Key = value pairs (string, integer, float, boolean, 0x-prefixed hex)
//! - [section] headers
//! - Arrays of inline tables, which may span several lines:
//!   sequence = [{ mode = "time" }, { mode = "weather", params = "tomorrow" }]
//! - Comments (# ...)
//!
//! NOT supported:
//! - Multi-line strings
//! - Datetime values
//! - Nested inline tables
//! - Dotted keys
//!
//! Keys the parser does not know are ignored. Sections that are present
//! override the defaults in [`Config::default`] key by key; an array value
//! replaces the whole default list.

use alloc::string::String;
use heapless::Vec;

use super::types::{
    Config, ConfigError, ModeEntry, ScheduleEntry, MAX_AUTO_ENTRIES, MAX_SCHEDULE_ENTRIES,
};
use crate::modes::{ModeKind, SessionMode};

/// Most inline tables accepted in one array
const MAX_TABLES: usize = 16;

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Display,
    Bot,
    Location,
    Refresh,
    Auto,
    Daily,
}

/// Parse TOML configuration into [`Config`]
pub fn parse_config(input: &str) -> Result<Config, ConfigError> {
    let mut config = Config::default();
    let mut section = Section::Root;

    // Array value still waiting for its closing bracket
    let mut pending: Option<(&str, String)> = None;

    for line in input.lines() {
        let line = strip_comment(line).trim();

        if let Some((key, mut value)) = pending.take() {
            value.push(' ');
            value.push_str(line);
            if brackets_balanced(&value) {
                apply_value(section, key, &value, &mut config)?;
            } else {
                pending = Some((key, value));
            }
            continue;
        }

        // Skip empty lines and comments
        if line.is_empty() {
            continue;
        }

        // Check for section header
        if line.starts_with('[') && line.ends_with(']') && !line.contains('=') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        // Parse key = value
        if let Some((key, value)) = parse_key_value(line) {
            if brackets_balanced(value) {
                apply_value(section, key, value, &mut config)?;
            } else {
                pending = Some((key, String::from(value)));
            }
        }
    }

    if pending.is_some() {
        return Err(ConfigError::InvalidValue);
    }

    check_targets(&config)?;
    Ok(config)
}

/// Reject composite modes inside the auto sequence or daily schedule
pub fn check_targets(config: &Config) -> Result<(), ConfigError> {
    let targets = config
        .auto
        .sequence
        .iter()
        .chain(config.daily.iter().map(|slot| &slot.entry));
    for entry in targets {
        if entry.mode.is_composite() {
            return Err(ConfigError::CompositeTarget(entry.mode));
        }
    }
    Ok(())
}

fn parse_section_header(header: &str) -> Result<Section, ConfigError> {
    match header.trim() {
        "display" => Ok(Section::Display),
        "bot" => Ok(Section::Bot),
        "location" => Ok(Section::Location),
        "refresh" => Ok(Section::Refresh),
        "auto" => Ok(Section::Auto),
        "daily" => Ok(Section::Daily),
        _ => Err(ConfigError::InvalidSection),
    }
}

/// Remove a trailing comment, leaving `#` inside strings alone
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

fn brackets_balanced(value: &str) -> bool {
    let mut depth = 0i32;
    let mut in_string = false;
    for c in value.chars() {
        match c {
            '"' => in_string = !in_string,
            '[' if !in_string => depth += 1,
            ']' if !in_string => depth -= 1,
            _ => {}
        }
    }
    depth <= 0
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> &str {
    let value = value.trim();
    if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
        &value[1..value.len() - 1]
    } else {
        // Allow unquoted strings for simple values
        value
    }
}

/// Parse an integer value
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue)
}

/// Parse a strictly positive number of seconds
fn parse_seconds(value: &str) -> Result<u32, ConfigError> {
    match parse_int::<u32>(value)? {
        0 => Err(ConfigError::InvalidValue),
        seconds => Ok(seconds),
    }
}

/// Parse an I2C address, decimal or 0x-prefixed hex
fn parse_address(value: &str) -> Result<u8, ConfigError> {
    let value = value.trim();
    let address = match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => u8::from_str_radix(hex, 16).map_err(|_| ConfigError::InvalidValue)?,
        None => parse_int(value)?,
    };
    if address > 0x7F {
        return Err(ConfigError::InvalidValue);
    }
    Ok(address)
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ConfigError> {
    match value.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConfigError::InvalidValue),
    }
}

/// Mode names as written in the config; `temperature` is accepted for `temp`
fn parse_mode(name: &str) -> Result<ModeKind, ConfigError> {
    match name {
        "temperature" => Ok(ModeKind::Temperature),
        other => ModeKind::from_command(other).ok_or(ConfigError::UnknownMode),
    }
}

/// Split `[{ ... }, { ... }]` into the bodies of its inline tables
fn split_tables(value: &str) -> Result<Vec<&str, MAX_TABLES>, ConfigError> {
    let value = value.trim();
    if !value.starts_with('[') || !value.ends_with(']') {
        return Err(ConfigError::InvalidValue);
    }
    let inner = &value[1..value.len() - 1];

    let mut tables = Vec::new();
    let mut depth = 0;
    let mut start = 0;

    for (i, c) in inner.char_indices() {
        match c {
            '{' => {
                if depth == 0 {
                    start = i + 1;
                }
                depth += 1;
            }
            '}' => {
                depth -= 1;
                if depth == 0 {
                    tables
                        .push(&inner[start..i])
                        .map_err(|_| ConfigError::TooManyItems)?;
                }
            }
            _ => {}
        }
    }

    if depth != 0 {
        return Err(ConfigError::InvalidValue);
    }
    Ok(tables)
}

/// Fields of one inline table body
#[derive(Default)]
struct TableFields<'a> {
    mode: Option<&'a str>,
    params: Option<&'a str>,
    time: Option<&'a str>,
}

fn parse_table(body: &str) -> TableFields<'_> {
    let mut fields = TableFields::default();
    for part in body.split(',') {
        if let Some((key, value)) = parse_key_value(part.trim()) {
            let value = parse_string(value);
            match key {
                "mode" => fields.mode = Some(value),
                "params" => fields.params = Some(value),
                "time" => fields.time = Some(value),
                _ => {}
            }
        }
    }
    fields
}

fn mode_entry(fields: &TableFields<'_>) -> Result<ModeEntry, ConfigError> {
    let mode = parse_mode(fields.mode.ok_or(ConfigError::InvalidValue)?)?;
    match fields.params {
        Some(params) => ModeEntry::with_params(mode, params),
        None => Ok(ModeEntry::new(mode)),
    }
}

fn parse_sequence(value: &str) -> Result<Vec<ModeEntry, MAX_AUTO_ENTRIES>, ConfigError> {
    let mut sequence = Vec::new();
    for body in split_tables(value)? {
        let entry = mode_entry(&parse_table(body))?;
        sequence.push(entry).map_err(|_| ConfigError::TooManyItems)?;
    }
    Ok(sequence)
}

fn parse_schedule(value: &str) -> Result<Vec<ScheduleEntry, MAX_SCHEDULE_ENTRIES>, ConfigError> {
    let mut schedule = Vec::new();
    for body in split_tables(value)? {
        let fields = parse_table(body);
        let minute_of_day = ScheduleEntry::parse_time(fields.time.ok_or(ConfigError::InvalidTime)?)?;
        let entry = mode_entry(&fields)?;
        schedule
            .push(ScheduleEntry {
                minute_of_day,
                entry,
            })
            .map_err(|_| ConfigError::TooManyItems)?;
    }
    Ok(schedule)
}

/// Apply a parsed value to the appropriate config field
fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut Config,
) -> Result<(), ConfigError> {
    match section {
        Section::Display => match key {
            "cols" => config.display.cols = parse_int(value)?,
            "rows" => config.display.rows = parse_int(value)?,
            "i2c_address" => config.display.i2c_address = parse_address(value)?,
            _ => {}
        },
        Section::Bot => match key {
            "default_mode" => {
                config.default_mode =
                    SessionMode::from_name(parse_string(value)).ok_or(ConfigError::UnknownMode)?;
            }
            "poll_interval_s" => config.poll_interval_s = parse_seconds(value)?,
            "log_chat_id" => config.log_chat_id = parse_int(value)?,
            "utc_offset_minutes" => config.utc_offset_minutes = parse_int(value)?,
            "watchdog" => config.watchdog = parse_bool(value)?,
            _ => {}
        },
        Section::Location => match key {
            "latitude" => config.location.latitude = parse_int(value)?,
            "longitude" => config.location.longitude = parse_int(value)?,
            _ => {}
        },
        Section::Refresh => {
            let kind = parse_mode(key)?;
            match parse_int::<u32>(value)? {
                0 => config.refresh.clear(kind),
                seconds => config.refresh.set(kind, seconds),
            }
        }
        Section::Auto => match key {
            "interval_s" => config.auto.interval_s = parse_seconds(value)?,
            "sequence" => config.auto.sequence = parse_sequence(value)?,
            _ => {}
        },
        Section::Daily => {
            if key == "schedule" {
                config.daily = parse_schedule(value)?;
            }
        }
        Section::Root => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
# Sample board
[display]
cols = 16
rows = 2
i2c_address = 0x3F

[bot]
default_mode = "daily"
poll_interval_s = 10
log_chat_id = -100123456  # group chat
utc_offset_minutes = 60
watchdog = true

[location]
latitude = 41.1579
longitude = -8.6291

[refresh]
weather = 600
temperature = 120
time = 0

[auto]
interval_s = 45
sequence = [
    { mode = "time", params = "s" },
    { mode = "quotes" },
]

[daily]
schedule = [{ time = "07:30", mode = "weather" }, { time = "20:00", mode = "weather", params = "tomorrow" }]
"#;

    #[test]
    fn test_parse_sample() {
        let config = parse_config(SAMPLE).unwrap();

        assert_eq!(config.display.cols, 16);
        assert_eq!(config.display.rows, 2);
        assert_eq!(config.display.i2c_address, 0x3F);

        assert_eq!(config.default_mode, SessionMode::Mode(ModeKind::Daily));
        assert_eq!(config.poll_interval_s, 10);
        assert_eq!(config.log_chat_id, -100_123_456);
        assert_eq!(config.utc_offset_minutes, 60);
        assert!(config.watchdog);

        assert!((config.location.latitude - 41.1579).abs() < 1e-4);

        assert_eq!(config.refresh.get(ModeKind::Weather), Some(600));
        assert_eq!(config.refresh.get(ModeKind::Temperature), Some(120));
        assert_eq!(config.refresh.get(ModeKind::Time), None);
        // Untouched keys keep their defaults
        assert_eq!(config.refresh.get(ModeKind::Auto), Some(1));

        assert_eq!(config.auto.interval_s, 45);
        assert_eq!(config.auto.sequence.len(), 2);
        assert_eq!(config.auto.sequence[0].mode, ModeKind::Time);
        assert_eq!(config.auto.sequence[0].params(), Some("s"));

        assert_eq!(config.daily.len(), 2);
        assert_eq!(config.daily[0].minute_of_day, 450);
        assert_eq!(config.daily[1].entry.params(), Some("tomorrow"));
    }

    #[test]
    fn test_empty_input_gives_defaults() {
        assert_eq!(parse_config("").unwrap(), Config::default());
    }

    #[test]
    fn test_unknown_section() {
        assert_eq!(
            parse_config("[stepper]\nrpm = 5"),
            Err(ConfigError::InvalidSection)
        );
    }

    #[test]
    fn test_unknown_mode() {
        let input = "[auto]\nsequence = [{ mode = \"fireworks\" }]";
        assert_eq!(parse_config(input), Err(ConfigError::UnknownMode));
    }

    #[test]
    fn test_composite_target_rejected() {
        let input = "[daily]\nschedule = [{ time = \"08:00\", mode = \"auto\" }]";
        assert_eq!(
            parse_config(input),
            Err(ConfigError::CompositeTarget(ModeKind::Auto))
        );
    }

    #[test]
    fn test_unterminated_array() {
        let input = "[auto]\nsequence = [\n{ mode = \"time\" },\n";
        assert_eq!(parse_config(input), Err(ConfigError::InvalidValue));
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        assert_eq!(
            parse_config("[bot]\npoll_interval_s = 0"),
            Err(ConfigError::InvalidValue)
        );
    }

    #[test]
    fn test_strip_comment_keeps_hash_in_string() {
        assert_eq!(strip_comment(r##"params = "#1" # note"##), r##"params = "#1" "##);
    }

    #[test]
    fn test_parse_address() {
        assert_eq!(parse_address("0x27"), Ok(0x27));
        assert_eq!(parse_address("39"), Ok(39));
        assert_eq!(parse_address("0x80"), Err(ConfigError::InvalidValue));
    }
}
