//! Build script for marquee-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates marquee.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Names `/command` and the config files accept for each mode
const MODES: &[&str] = &[
    "weather",
    "ascii",
    "countdown",
    "timer",
    "time",
    "auto",
    "greetings",
    "quotes",
    "daily",
    "temp",
    "temperature",
    "sentences",
];

/// Modes that pick another mode and so cannot be picked themselves
const COMPOSITE: &[&str] = &["auto", "daily"];

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).expect("create memory.x");
    f.write_all(memory_x).expect("write memory.x");

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate marquee.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=marquee.toml");

    let config_path = Path::new("marquee.toml");
    if !config_path.exists() {
        fail(
            "marquee.toml not found!",
            &[
                "The firmware embeds marquee.toml at build time.".to_string(),
                "Create one in the marquee-firmware directory.".to_string(),
            ],
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read marquee.toml", &[e.to_string()]),
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => fail(
            "Invalid TOML syntax in marquee.toml",
            &e.to_string().lines().map(str::to_string).collect::<Vec<_>>(),
        ),
    };

    let mut errors = Vec::new();
    validate_sections(&config, &mut errors);
    validate_display(&config, &mut errors);
    validate_bot(&config, &mut errors);
    validate_refresh(&config, &mut errors);
    validate_auto(&config, &mut errors);
    validate_daily(&config, &mut errors);

    if !errors.is_empty() {
        fail("Invalid configuration in marquee.toml", &errors);
    }

    println!("cargo:warning=marquee.toml validated successfully");
}

/// Abort the build with a boxed error listing
fn fail(title: &str, lines: &[String]) -> ! {
    let body = lines
        .iter()
        .map(|line| {
            let line = if line.len() > 62 {
                format!("{}...", &line[..59])
            } else {
                line.clone()
            };
            format!("║  • {:<62} ║", line)
        })
        .collect::<Vec<_>>()
        .join("\n");

    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title, body
    );
}

fn validate_sections(config: &toml::Value, errors: &mut Vec<String>) {
    const KNOWN: &[&str] = &["display", "bot", "location", "refresh", "auto", "daily"];

    let Some(table) = config.as_table() else {
        errors.push("top level must be a table".to_string());
        return;
    };

    for required in ["display", "bot"] {
        if !table.contains_key(required) {
            errors.push(format!("Missing [{}] section", required));
        }
    }
    for key in table.keys() {
        if !KNOWN.contains(&key.as_str()) {
            errors.push(format!("Unknown section [{}]", key));
        }
    }
}

fn validate_display(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(display) = config.get("display") else {
        return;
    };

    for (key, max) in [("cols", 40), ("rows", 4)] {
        match display.get(key).and_then(toml::Value::as_integer) {
            Some(v) if (1..=max).contains(&v) => {}
            Some(_) => errors.push(format!("[display] {} must be 1-{}", key, max)),
            None => errors.push(format!("[display] missing '{}'", key)),
        }
    }

    if let Some(addr) = display.get("i2c_address") {
        match addr.as_integer() {
            Some(v) if (0..=0x7F).contains(&v) => {}
            _ => errors.push("[display] i2c_address must be a 7-bit address".to_string()),
        }
    }
}

fn validate_bot(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(bot) = config.get("bot") else {
        return;
    };

    if let Some(mode) = bot.get("default_mode") {
        match mode.as_str() {
            Some(name) if name == "message" || MODES.contains(&name) => {}
            _ => errors.push("[bot] default_mode names no mode".to_string()),
        }
    }

    if let Some(poll) = bot.get("poll_interval_s") {
        if !matches!(poll.as_integer(), Some(v) if v > 0) {
            errors.push("[bot] poll_interval_s must be a positive integer".to_string());
        }
    }

    if let Some(offset) = bot.get("utc_offset_minutes") {
        if !matches!(offset.as_integer(), Some(v) if (-720..=840).contains(&v)) {
            errors.push("[bot] utc_offset_minutes must be -720..=840".to_string());
        }
    }
}

fn validate_refresh(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(refresh) = config.get("refresh").and_then(toml::Value::as_table) else {
        return;
    };

    for (mode, seconds) in refresh {
        if !MODES.contains(&mode.as_str()) {
            errors.push(format!("[refresh] unknown mode '{}'", mode));
        }
        if !matches!(seconds.as_integer(), Some(v) if v >= 0) {
            errors.push(format!("[refresh] {} must be seconds (0 = never)", mode));
        }
    }
}

fn validate_auto(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(auto) = config.get("auto") else {
        return;
    };

    if let Some(interval) = auto.get("interval_s") {
        if !matches!(interval.as_integer(), Some(v) if v > 0) {
            errors.push("[auto] interval_s must be a positive integer".to_string());
        }
    }

    match auto.get("sequence") {
        Some(toml::Value::Array(entries)) => {
            for (i, entry) in entries.iter().enumerate() {
                validate_target(&format!("[auto] sequence entry {}", i), entry, errors);
            }
        }
        Some(_) => errors.push("[auto] sequence must be an array".to_string()),
        None => {}
    }
}

fn validate_daily(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(daily) = config.get("daily") else {
        return;
    };

    match daily.get("schedule") {
        Some(toml::Value::Array(entries)) => {
            for (i, entry) in entries.iter().enumerate() {
                let context = format!("[daily] schedule entry {}", i);
                match entry.get("time").and_then(toml::Value::as_str) {
                    Some(time) if is_clock_time(time) => {}
                    Some(time) => errors.push(format!("{} time '{}' is not HH:MM", context, time)),
                    None => errors.push(format!("{} missing 'time'", context)),
                }
                validate_target(&context, entry, errors);
            }
        }
        Some(_) => errors.push("[daily] schedule must be an array".to_string()),
        None => {}
    }
}

/// Check the `mode` (and `params`) of one auto or daily entry
fn validate_target(context: &str, entry: &toml::Value, errors: &mut Vec<String>) {
    if !entry.is_table() {
        errors.push(format!("{} must be a table", context));
        return;
    }

    match entry.get("mode").and_then(toml::Value::as_str) {
        Some(mode) if COMPOSITE.contains(&mode) => {
            errors.push(format!("{} cannot run '{}' mode", context, mode));
        }
        Some(mode) if MODES.contains(&mode) => {}
        Some(mode) => errors.push(format!("{} unknown mode '{}'", context, mode)),
        None => errors.push(format!("{} missing 'mode'", context)),
    }

    if let Some(params) = entry.get("params") {
        match params.as_str() {
            Some(p) if p.len() <= 24 => {}
            Some(_) => errors.push(format!("{} params longer than 24 bytes", context)),
            None => errors.push(format!("{} params must be a string", context)),
        }
    }
}

fn is_clock_time(value: &str) -> bool {
    let Some((h, m)) = value.split_once(':') else {
        return false;
    };
    h.len() == 2
        && m.len() == 2
        && matches!(h.parse::<u8>(), Ok(h) if h < 24)
        && matches!(m.parse::<u8>(), Ok(m) if m < 60)
}
