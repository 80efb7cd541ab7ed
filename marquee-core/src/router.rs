//! Command routing
//!
//! Every inbound chat message goes through [`route`]:
//!
//! 1. Text without the `/` sigil is shown as-is, word-wrapped
//! 2. System commands act immediately (`/on`, `/poll 30`, `/reboot`)
//! 3. Mode names switch the session to that mode (`/weather tomorrow`)
//! 4. Anything else is logged as unknown
//!
//! Only mode switches and `/clear` change the session; they do so by
//! returning a [`Switch`].

use alloc::format;
use alloc::string::String;
use core::fmt::Write;

use crate::config::{Config, RefreshIntervals};
use crate::context::Context;
use crate::modes::{ModeKind, ModeParams, Modes, SessionMode};
use crate::traits::DisplayError;

pub const HELP_TEXT: &str = "Available commands:
/start - Show this help message
/help - Show this help message
/on - Turn backlight on
/off - Turn backlight off
/blink - Blink LCD backlight
/clear - Clear display
/temp - Show Pico temperature
/ascii - Show ASCII art
/greetings - Show greetings
/quotes - Show quotes
/weather [today|tomorrow] - Show weather
/time [m|s|ms] - Show time
/countdown YYYY-MM-DD - Countdown to date
/timer <minutes> - Start timer (default: 5 min)
/auto <seconds> - Auto cycle modes
/daily - Daily schedule mode
/sentences - Show a sentence
/poll <seconds> - Set poll interval
/interval <seconds> - Set mode update interval
/reboot - Reboot the device
<text> - Display custom message";

const POLL_USAGE: &str = "Invalid poll command. Use: /poll <seconds>";
const INTERVAL_USAGE: &str = "Invalid interval command. Use: /interval <seconds>";

/// Timing knobs the operator can change at run time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Intervals {
    pub poll_interval_s: u32,
    pub refresh: RefreshIntervals,
}

impl Intervals {
    pub fn from_config(config: &Config) -> Self {
        Self {
            poll_interval_s: config.poll_interval_s,
            refresh: config.refresh,
        }
    }

    pub fn poll_ms(&self) -> u64 {
        u64::from(self.poll_interval_s) * 1000
    }

    /// Refresh interval of `mode`; `None` means never refreshed
    pub fn refresh_ms(&self, mode: SessionMode) -> Option<u64> {
        mode.kind()
            .and_then(|kind| self.refresh.get(kind))
            .map(|seconds| u64::from(seconds) * 1000)
    }
}

/// New session state produced by a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Switch {
    pub mode: SessionMode,
    pub params: ModeParams,
    /// When the new mode was last drawn; 0 if it never was
    pub refreshed_at_ms: u64,
}

/// Commands that act on the board rather than select a mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SystemCommand {
    On,
    Off,
    Blink,
    Clear,
    Poll,
    Interval,
    Reboot,
    Help,
}

impl SystemCommand {
    pub fn from_command(name: &str) -> Option<Self> {
        match name {
            "on" => Some(SystemCommand::On),
            "off" => Some(SystemCommand::Off),
            "blink" => Some(SystemCommand::Blink),
            "clear" => Some(SystemCommand::Clear),
            "poll" => Some(SystemCommand::Poll),
            "interval" => Some(SystemCommand::Interval),
            "reboot" => Some(SystemCommand::Reboot),
            "help" | "start" => Some(SystemCommand::Help),
            _ => None,
        }
    }
}

/// A `/command params` message taken apart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command<'a> {
    /// First token after the sigil, without any `@botname` suffix
    pub name: &'a str,
    /// Rest of the message, trimmed and lower-cased; `None` when empty
    pub params: Option<String>,
}

/// Split a sigil-prefixed message; `None` for plain text
pub fn parse_command(message: &str) -> Option<Command<'_>> {
    let rest = message.strip_prefix('/')?;
    let (token, tail) = match rest.find(char::is_whitespace) {
        Some(i) => (&rest[..i], &rest[i..]),
        None => (rest, ""),
    };
    let name = token.split('@').next().unwrap_or(token);
    let tail = tail.trim();
    let params = (!tail.is_empty()).then(|| tail.to_lowercase());
    Some(Command { name, params })
}

/// Route one inbound message
///
/// `current` is the session mode at the time the message arrived and
/// `sender_id` the chat it came from.
pub fn route(
    ctx: &mut Context<'_>,
    modes: &mut Modes,
    intervals: &mut Intervals,
    message: &str,
    current: SessionMode,
    sender_id: i64,
) -> Option<Switch> {
    let Some(command) = parse_command(message) else {
        let shown = ctx.show(message, true);
        report(ctx, shown);
        return None;
    };
    ctx.logger
        .trace(&format!("Command /{} from chat {}", command.name, sender_id));

    if let Some(system) = SystemCommand::from_command(command.name) {
        return run_system(ctx, intervals, system, command.params.as_deref(), current);
    }

    if let Some(kind) = ModeKind::from_command(command.name) {
        return switch_mode(ctx, modes, kind, command.params.as_deref());
    }

    ctx.log(&format!("Unknown command: {}", message));
    None
}

fn report(ctx: &mut Context<'_>, result: Result<(), DisplayError>) {
    if let Err(e) = result {
        ctx.log(&format!("Error displaying message: {}", e));
    }
}

fn switch_mode(
    ctx: &mut Context<'_>,
    modes: &mut Modes,
    kind: ModeKind,
    raw: Option<&str>,
) -> Option<Switch> {
    let params = match modes.prepare(kind, raw, ctx.now_ms()) {
        Ok(params) => params,
        Err(e) => {
            ctx.log(&format!("{}", e));
            return None;
        }
    };

    if kind.needs_clear() {
        let cleared = ctx.display.clear();
        report(ctx, cleared);
    }

    let mut line = format!("Switched to {} mode", kind);
    if !params.is_none() {
        let _ = write!(line, ": params = {}", params);
    }
    ctx.log(&line);

    modes.render(ctx, kind, &params);

    Some(Switch {
        mode: SessionMode::Mode(kind),
        params,
        refreshed_at_ms: ctx.now_ms(),
    })
}

fn parse_seconds(params: Option<&str>) -> Option<u32> {
    params?.parse().ok().filter(|seconds| *seconds > 0)
}

/// Seconds shown as minutes with two decimals
struct Minutes(u32);

impl core::fmt::Display for Minutes {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let hundredths = (u64::from(self.0) * 100 + 30) / 60;
        write!(f, "{}.{:02}", hundredths / 100, hundredths % 100)
    }
}

fn run_system(
    ctx: &mut Context<'_>,
    intervals: &mut Intervals,
    command: SystemCommand,
    params: Option<&str>,
    current: SessionMode,
) -> Option<Switch> {
    match command {
        SystemCommand::On => {
            let result = ctx.display.backlight(true);
            report(ctx, result);
            ctx.log("Backlight turned on. Press /off to turn it off.");
        }
        SystemCommand::Off => {
            let result = ctx.display.backlight(false);
            report(ctx, result);
            ctx.log("Backlight turned off. Press /on to turn it on.");
        }
        SystemCommand::Blink => {
            ctx.log("Blinking LCD");
            let result = ctx.blink();
            report(ctx, result);
        }
        SystemCommand::Clear => {
            let result = ctx.display.clear();
            report(ctx, result);
            ctx.log("Display cleared");
            return Some(Switch {
                mode: SessionMode::Message,
                params: ModeParams::None,
                refreshed_at_ms: 0,
            });
        }
        SystemCommand::Poll => match parse_seconds(params) {
            Some(seconds) => {
                intervals.poll_interval_s = seconds;
                ctx.log(&format!(
                    "Poll interval set to {} seconds ({} minutes)",
                    seconds,
                    Minutes(seconds)
                ));
            }
            None => ctx.log(POLL_USAGE),
        },
        SystemCommand::Interval => match (current.kind(), parse_seconds(params)) {
            (None, _) => ctx.log("Message mode has no update interval"),
            (Some(kind), Some(seconds)) => {
                intervals.refresh.set(kind, seconds);
                ctx.log(&format!(
                    "Update interval for {} mode set to {} seconds ({} minutes)",
                    kind,
                    seconds,
                    Minutes(seconds)
                ));
            }
            (Some(_), None) => ctx.log(INTERVAL_USAGE),
        },
        SystemCommand::Reboot => {
            ctx.log("Rebooting device...");
            ctx.system.reboot();
        }
        SystemCommand::Help => ctx.log(HELP_TEXT),
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Rig;

    const NOW: u64 = 1_766_572_200_000;

    struct Harness {
        rig: Rig,
        modes: Modes,
        intervals: Intervals,
    }

    impl Harness {
        fn new() -> Self {
            let config = Config::default();
            let mut rig = Rig::new();
            rig.clock.now = NOW;
            Self {
                rig,
                modes: Modes::new(&config).unwrap(),
                intervals: Intervals::from_config(&config),
            }
        }

        fn route(&mut self, message: &str, current: SessionMode) -> Option<Switch> {
            route(
                &mut self.rig.ctx(),
                &mut self.modes,
                &mut self.intervals,
                message,
                current,
                42,
            )
        }
    }

    const AUTO: SessionMode = SessionMode::Mode(ModeKind::Auto);

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("hello"), None);
        assert_eq!(
            parse_command("/weather@marquee_bot  Tomorrow "),
            Some(Command {
                name: "weather",
                params: Some("tomorrow".into())
            })
        );
        assert_eq!(
            parse_command("/help"),
            Some(Command {
                name: "help",
                params: None
            })
        );
    }

    #[test]
    fn test_timer_switch() {
        let mut h = Harness::new();
        let switch = h.route("/timer 10", AUTO).unwrap();

        assert_eq!(switch.mode, SessionMode::Mode(ModeKind::Timer));
        assert_eq!(switch.params, ModeParams::Deadline(NOW + 600_000));
        assert_eq!(switch.refreshed_at_ms, NOW);
        assert_eq!(h.rig.display.clears, 1);
        assert_eq!(
            h.rig.logger.lines[0],
            format!("Switched to timer mode: params = until {}", NOW + 600_000)
        );
        assert!(h.modes.timer().is_running());
    }

    #[test]
    fn test_unknown_command() {
        let mut h = Harness::new();
        assert_eq!(h.route("/bogus", AUTO), None);
        assert_eq!(h.rig.logger.lines, vec!["Unknown command: /bogus"]);
    }

    #[test]
    fn test_plain_text_is_shown_without_switching() {
        let mut h = Harness::new();
        assert_eq!(h.route("hello", AUTO), None);
        assert_eq!(h.rig.display.trimmed()[0], "hello");
        assert!(h.rig.logger.lines.is_empty());
    }

    #[test]
    fn test_invalid_params_abort_switch() {
        let mut h = Harness::new();
        assert_eq!(h.route("/countdown not-a-date", AUTO), None);
        assert_eq!(
            h.rig.logger.lines,
            vec!["Invalid date format. Use: /countdown YYYY-MM-DD"]
        );
        assert_eq!(h.rig.display.clears, 0);
        assert_eq!(h.rig.display.writes, 0);
    }

    #[test]
    fn test_mode_without_clear_keeps_panel() {
        let mut h = Harness::new();
        let switch = h.route("/weather@marquee_bot TOMORROW", AUTO).unwrap();

        assert_eq!(switch.params, ModeParams::Text("tomorrow".into()));
        assert_eq!(h.rig.display.clears, 0);
        assert!(h.rig.display.trimmed()[0].starts_with("Amanha: "));
        assert_eq!(
            h.rig.logger.lines,
            vec!["Switched to weather mode: params = tomorrow"]
        );
    }

    #[test]
    fn test_switch_survives_render_failure() {
        let mut h = Harness::new();
        h.rig.sentences.next = Err(crate::traits::SourceError::Unavailable);
        let switch = h.route("/sentences", AUTO).unwrap();

        assert_eq!(switch.mode, SessionMode::Mode(ModeKind::Sentences));
        assert_eq!(
            h.rig.logger.lines,
            vec![
                "Switched to sentences mode",
                "Error displaying sentences: source unavailable"
            ]
        );
    }

    #[test]
    fn test_clear_returns_to_message_mode() {
        let mut h = Harness::new();
        let switch = h.route("/clear", AUTO).unwrap();
        assert_eq!(
            switch,
            Switch {
                mode: SessionMode::Message,
                params: ModeParams::None,
                refreshed_at_ms: 0
            }
        );
        assert_eq!(h.rig.display.clears, 1);
        assert_eq!(h.rig.logger.lines, vec!["Display cleared"]);
    }

    #[test]
    fn test_backlight_commands() {
        let mut h = Harness::new();
        assert_eq!(h.route("/off", AUTO), None);
        assert_eq!(h.route("/on", AUTO), None);
        assert_eq!(h.rig.display.backlight_changes, vec![false, true]);
        assert_eq!(
            h.rig.logger.lines,
            vec![
                "Backlight turned off. Press /on to turn it on.",
                "Backlight turned on. Press /off to turn it off."
            ]
        );
    }

    #[test]
    fn test_blink() {
        let mut h = Harness::new();
        h.route("/blink", AUTO);
        assert_eq!(h.rig.logger.lines, vec!["Blinking LCD"]);
        assert_eq!(h.rig.display.backlight_changes.len(), 10);
    }

    #[test]
    fn test_poll() {
        let mut h = Harness::new();
        h.route("/poll 10", AUTO);
        assert_eq!(h.intervals.poll_interval_s, 10);
        assert_eq!(
            h.rig.logger.lines,
            vec!["Poll interval set to 10 seconds (0.17 minutes)"]
        );

        for bad in ["/poll", "/poll 0", "/poll often"] {
            h.route(bad, AUTO);
        }
        assert_eq!(h.intervals.poll_interval_s, 10);
        assert_eq!(h.rig.logger.lines[1..], [POLL_USAGE, POLL_USAGE, POLL_USAGE]);
    }

    #[test]
    fn test_interval_applies_to_current_mode() {
        let mut h = Harness::new();
        h.route("/interval 90", SessionMode::Mode(ModeKind::Weather));
        assert_eq!(h.intervals.refresh.get(ModeKind::Weather), Some(90));
        assert_eq!(
            h.rig.logger.lines,
            vec!["Update interval for weather mode set to 90 seconds (1.50 minutes)"]
        );

        h.route("/interval 90", SessionMode::Message);
        assert_eq!(h.rig.logger.lines[1], "Message mode has no update interval");

        h.route("/interval", SessionMode::Mode(ModeKind::Weather));
        assert_eq!(h.rig.logger.lines[2], INTERVAL_USAGE);
    }

    #[test]
    fn test_reboot() {
        let mut h = Harness::new();
        h.route("/reboot", AUTO);
        assert_eq!(h.rig.system.reboots, 1);
        assert_eq!(h.rig.logger.lines, vec!["Rebooting device..."]);
    }

    #[test]
    fn test_help_and_start() {
        let mut h = Harness::new();
        h.route("/help", AUTO);
        h.route("/start", AUTO);
        assert_eq!(h.rig.logger.lines, vec![HELP_TEXT, HELP_TEXT]);
        for kind in ModeKind::ALL {
            assert!(HELP_TEXT.contains(&format!("/{}", kind.command_name())));
        }
    }

    #[test]
    fn test_minutes_formatting() {
        assert_eq!(Minutes(45).to_string(), "0.75");
        assert_eq!(Minutes(900).to_string(), "15.00");
    }
}
